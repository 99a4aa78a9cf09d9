mod app_config;

pub use app_config::{
    AppConfig, HttpConfig, ImageryConfig, LogFormat, LoggingConfig, PromptsConfig,
    ReconcileConfig, ServerConfig,
};
