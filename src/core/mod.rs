pub mod auth;
pub mod carousel;
pub mod classify;
pub mod location;
pub mod search;

pub use crate::domain::model::{Category, Coordinate, Place, SearchOutcome, SearchState};
pub use crate::domain::ports::{AuthBackend, LocationSource, PlaceSearchProvider, ReviewSource};
pub use crate::utils::error::Result;
