//! Pure insight engines over already-fetched weather and space weather.
//!
//! Nothing in here performs I/O; callers pass the location-local `now`.

pub mod alerts;
pub mod clock;
pub mod impact;
pub mod thresholds;
pub mod viewing_window;
pub mod visibility;

pub use alerts::{generate_alerts, Alert, AlertInput, AlertSeverity, AlertType};
pub use impact::{analyze_impacts, ImpactAnalysis, ImpactChain, ImpactSeverity};
pub use viewing_window::{compute_best_viewing_window, ViewingWindow};
pub use visibility::{compute_visibility_score, VisibilityRating};
