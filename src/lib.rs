pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::AppConfig;

pub use adapters::{
    firebase::FirebaseAuthBackend, nominatim::NominatimProvider, reviews::SyntheticReviewSource,
    storage::LocalStorage,
};
pub use crate::core::{
    auth::AuthService, carousel::Carousel, location::LocationProvider,
    search::{PlaceSearchService, SearchSession},
};
pub use utils::error::{AppError, Result};
