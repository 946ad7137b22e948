//! Opening-hours evaluation.

pub mod evaluator;
pub mod status;

pub use evaluator::{AvailabilityConfig, AvailabilityEvaluator, is_open_now};
pub use status::OpeningStatus;
