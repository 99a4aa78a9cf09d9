//! External imagery integration (Mapillary Graph API)

mod mapillary;

pub use mapillary::MapillaryAcquirer;
