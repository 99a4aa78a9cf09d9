//! CLI module for the sign recognition relay

pub mod serve;

use clap::{Parser, Subcommand};

/// Traffic-sign recognition relay over multimodal LLM providers
#[derive(Parser)]
#[command(name = "signrelay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
}
