//! Features Module - Feature Schema and Assembly
//!
//! The schema the artifacts were fitted on lives in `layout`; `record` builds
//! a complete visit record from collected input; `vector` is the prepared
//! classifier input.

pub mod layout;
pub mod record;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_VERSION, NUMERIC_COUNT};
pub use record::{FeatureRecord, SchemaError, VisitorInput};
pub use vector::FeatureVector;
