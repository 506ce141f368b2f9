pub mod cache;
pub mod catalog;
pub mod handlers;
pub mod models;
pub mod propagation;
pub mod service;
pub mod source;

pub use cache::TleCache;
pub use models::{SatelliteCategory, SatellitePosition, SatelliteView, TleRecord};
pub use propagation::Sgp4Propagator;
pub use service::SatelliteService;
pub use source::CelestrakClient;
