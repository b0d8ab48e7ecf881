//! Logic Module - the feature-preparation and inference pipeline
//!
//! - `features/` - feature schema, record assembly, prepared vector
//! - `encoders` - categorical encoding against the fitted vocabulary
//! - `scaler` - numeric standardization with column verification
//! - `model/` - classifier invocation and result interpretation
//! - `artifacts` - loading and load-once ownership of the fitted artifacts
//! - `pipeline` - the stages wired in order

pub mod artifacts;
pub mod encoders;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod scaler;
