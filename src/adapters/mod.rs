// Adapters layer: concrete implementations for external systems (http, storage, device).

pub mod dialer;
pub mod firebase;
pub mod location;
pub mod nominatim;
pub mod preferences;
pub mod reviews;
pub mod storage;
