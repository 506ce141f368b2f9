pub mod handlers;
pub mod models;
pub mod service;

pub use models::{KpIndexReading, KpLevel};
pub use service::SpaceWeatherService;
