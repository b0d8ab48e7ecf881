//! Model Module - Classifier Invocation and Result Interpretation
//!
//! The classifier sits behind a trait so the pipeline can run against the
//! ONNX session in production and a fixed stub in tests.

pub mod inference;
pub mod interpret;

// Re-export common types
pub use inference::{Classifier, InferenceError, OnnxClassifier};
pub use interpret::Likelihood;
