//! API Module - the boundary exposed to the hosting interface

pub mod engine_status;
pub mod predict;

// Re-export common types
pub use engine_status::{get_status, EngineStatus};
pub use predict::{handle_predict, PredictRequest, PredictResponse, Rejection};
