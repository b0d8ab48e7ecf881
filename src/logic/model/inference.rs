//! Inference Stage - ONNX Runtime Integration
//!
//! Runs the trained classifier on one fully prepared feature vector. The
//! classifier sits behind a trait so the serving pipeline does not care which
//! runtime produced the score.

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array2;
use once_cell::sync::OnceCell;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::RwLock;

use crate::logic::features::layout::FEATURE_COUNT;
use crate::logic::features::vector::FeatureVector;

// ============================================================================
// STATE
// ============================================================================

/// Latency stats (microseconds)
static LATENCY_SUM: AtomicU64 = AtomicU64::new(0);
static PREDICTION_COUNT: AtomicU64 = AtomicU64::new(0);

/// One-time ONNX Runtime environment init
static ORT_INIT: OnceCell<()> = OnceCell::new();

fn ensure_runtime() -> Result<(), InferenceError> {
    ORT_INIT
        .get_or_try_init(|| {
            ort::init()
                .commit()
                .map(|_| ())
                .map_err(|e| InferenceError(format!("Failed to init ONNX Runtime: {}", e)))
        })
        .map(|_| ())
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// One fully prepared record in, one purchase-likelihood scalar out.
///
/// Implementations should return a calibrated class-1 probability where the
/// underlying model exposes one; the serving layer clamps whatever comes back
/// into [0, 1] before display either way.
pub trait Classifier: Send + Sync {
    fn predict(&self, vector: &FeatureVector) -> Result<f32, InferenceError>;

    /// Short runtime description for status reporting
    fn describe(&self) -> &str;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// The trained classifier behind an ONNX Runtime session
pub struct OnnxClassifier {
    session: RwLock<Session>,
    input_name: String,
    /// Preferred output carrying class probabilities, if the export has one
    probabilities_output: Option<String>,
    /// Fallback output (raw score or hard label)
    fallback_output: Option<String>,
}

impl OnnxClassifier {
    /// Build a session from raw model bytes
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, InferenceError> {
        ensure_runtime()?;

        log::info!("Loading ONNX classifier ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // Prefer the export's probabilities output; anything named like a
        // hard label is only a last resort.
        let probabilities_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone());

        let fallback_output = session
            .outputs
            .iter()
            .find(|o| !o.name.contains("label"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone());

        log::info!(
            "ONNX classifier ready (input: {}, probabilities: {:?}, fallback: {:?})",
            input_name,
            probabilities_output,
            fallback_output
        );

        Ok(Self {
            session: RwLock::new(session),
            input_name,
            probabilities_output,
            fallback_output,
        })
    }

    fn run_session(&self, vector: &FeatureVector) -> Result<f32, InferenceError> {
        // Input tensor, shape [1, FEATURE_COUNT]
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), vector.values.to_vec())
            .map_err(|e| InferenceError(format!("Failed to create input array: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Failed to create tensor: {}", e)))?;

        // Write lock: session.run takes &mut
        let mut session = self.session.write();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        for name in [&self.probabilities_output, &self.fallback_output]
            .into_iter()
            .flatten()
        {
            if let Some(output) = outputs.get(name.as_str()) {
                if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                    let dims: Vec<i64> = shape.iter().copied().collect();
                    return Ok(scalar_from_tensor(&dims, data));
                }
            }
        }

        Err(InferenceError(
            "No extractable f32 output in model".to_string(),
        ))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, vector: &FeatureVector) -> Result<f32, InferenceError> {
        vector
            .validate()
            .map_err(|e| InferenceError(format!("Stale feature vector: {}", e)))?;
        self.run_session(vector)
    }

    fn describe(&self) -> &str {
        "ONNX Runtime (CPU)"
    }
}

/// Pick the class-1 probability out of a classifier output tensor.
/// Handles [1, n_classes], [1, 1] and flat shapes.
fn scalar_from_tensor(dims: &[i64], data: &[f32]) -> f32 {
    let class_count = match dims {
        [_, n] => *n as usize,
        [n] => *n as usize,
        _ => data.len(),
    };

    if class_count >= 2 && data.len() >= 2 {
        data[1]
    } else {
        data.first().copied().unwrap_or(0.0)
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Run the classifier on one prepared record and clamp the result into [0, 1].
///
/// The clamp is a display-safety measure: an export that emits a hard 0/1
/// class label still renders as a probability-like value. It does not make an
/// uncalibrated score calibrated.
pub fn predict_probability(
    classifier: &dyn Classifier,
    vector: &FeatureVector,
) -> Result<f32, InferenceError> {
    let start = std::time::Instant::now();

    let raw = classifier.predict(vector)?;
    let probability = raw.clamp(0.0, 1.0);

    let elapsed = start.elapsed().as_micros() as u64;
    LATENCY_SUM.fetch_add(elapsed, Ordering::Relaxed);
    PREDICTION_COUNT.fetch_add(1, Ordering::Relaxed);

    log::debug!(
        "Prediction complete (raw: {:.4}, clamped: {:.4}, {}us)",
        raw,
        probability,
        elapsed
    );

    Ok(probability)
}

/// (prediction count, average latency in milliseconds)
pub fn inference_metrics() -> (u64, f32) {
    let sum = LATENCY_SUM.load(Ordering::Relaxed);
    let count = PREDICTION_COUNT.load(Ordering::Relaxed);
    let avg_ms = if count > 0 {
        (sum as f32 / count as f32) / 1000.0
    } else {
        0.0
    };
    (count, avg_ms)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Classifier returning a fixed raw score
    struct FixedClassifier(f32);

    impl Classifier for FixedClassifier {
        fn predict(&self, _vector: &FeatureVector) -> Result<f32, InferenceError> {
            Ok(self.0)
        }

        fn describe(&self) -> &str {
            "fixed"
        }
    }

    fn vector() -> FeatureVector {
        FeatureVector::from_values([0.0; FEATURE_COUNT])
    }

    #[test]
    fn test_output_clamped_into_unit_interval() {
        for (raw, expected) in [(-5.0, 0.0), (0.5, 0.5), (1.0, 1.0), (2.0, 1.0)] {
            let classifier = FixedClassifier(raw);
            let p = predict_probability(&classifier, &vector()).unwrap();
            assert_eq!(p, expected, "raw {} should clamp to {}", raw, expected);
        }
    }

    #[test]
    fn test_classifier_failure_propagates() {
        struct FailingClassifier;
        impl Classifier for FailingClassifier {
            fn predict(&self, _vector: &FeatureVector) -> Result<f32, InferenceError> {
                Err(InferenceError("boom".to_string()))
            }
            fn describe(&self) -> &str {
                "failing"
            }
        }

        assert!(predict_probability(&FailingClassifier, &vector()).is_err());
    }

    #[test]
    fn test_metrics_accumulate() {
        let before = inference_metrics().0;
        let _ = predict_probability(&FixedClassifier(0.5), &vector());
        assert!(inference_metrics().0 > before);
    }

    #[test]
    fn test_scalar_from_class_probability_tensor() {
        // [1, 2] probabilities -> class 1
        assert_eq!(scalar_from_tensor(&[1, 2], &[0.25, 0.75]), 0.75);
        // [1, 1] single score
        assert_eq!(scalar_from_tensor(&[1, 1], &[0.4]), 0.4);
        // flat [2]
        assert_eq!(scalar_from_tensor(&[2], &[0.1, 0.9]), 0.9);
        // empty fallback
        assert_eq!(scalar_from_tensor(&[0], &[]), 0.0);
    }
}
