//! Numeric Scaler Stage
//!
//! Applies the standardization fitted at training time to exactly the 10
//! numeric columns. Column correspondence is verified by name on every
//! transform rather than trusted positionally: a reordered artifact would
//! otherwise produce silently wrong inputs for the classifier.

use serde::{Deserialize, Serialize};

use super::encoders::EncodedRecord;
use super::features::layout::{numeric_features, NUMERIC_COUNT};
use super::features::vector::FeatureVector;

/// Smallest scale divisor, same guard as a zero-variance column gets at fit time
const MIN_SCALE: f32 = 1e-8;

// ============================================================================
// SCALER ARTIFACT
// ============================================================================

/// Fitted per-column standardization parameters.
/// Read-only after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_version: u8,
    pub layout_hash: u32,
    /// Column names in the order the parameters were fitted
    pub columns: Vec<String>,
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

impl StandardScaler {
    /// A do-nothing scaler over the current numeric layout (mean 0, scale 1)
    pub fn identity() -> Self {
        use super::features::layout::{layout_hash, FEATURE_VERSION};
        Self {
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            columns: numeric_features().iter().map(|s| s.to_string()).collect(),
            mean: vec![0.0; NUMERIC_COUNT],
            scale: vec![1.0; NUMERIC_COUNT],
        }
    }

    /// Verify this scaler's columns line up with the numeric layout
    fn verify_shape(&self) -> Result<(), ScalerShapeError> {
        let expected = numeric_features();

        if self.columns.len() != expected.len() {
            return Err(ScalerShapeError::ColumnCount {
                expected: expected.len(),
                actual: self.columns.len(),
            });
        }

        for (index, (have, want)) in self.columns.iter().zip(expected.iter()).enumerate() {
            if have != want {
                return Err(ScalerShapeError::ColumnMismatch {
                    index,
                    expected: want.to_string(),
                    actual: have.clone(),
                });
            }
        }

        if self.mean.len() != expected.len() || self.scale.len() != expected.len() {
            return Err(ScalerShapeError::ParamLength {
                expected: expected.len(),
                mean: self.mean.len(),
                scale: self.scale.len(),
            });
        }

        Ok(())
    }

    /// Apply the fitted transform to the numeric columns only.
    ///
    /// Encoded categorical codes pass through numerically unchanged.
    pub fn transform(&self, record: &EncodedRecord) -> Result<FeatureVector, ScalerShapeError> {
        self.verify_shape()?;

        let mut values = record.values;
        for i in 0..NUMERIC_COUNT {
            let scale = self.scale[i].max(MIN_SCALE);
            values[i] = (values[i] - self.mean[i]) / scale;
        }

        Ok(FeatureVector::from_values(values))
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// The scaler artifact does not fit the numeric layout - artifact/schema
/// drift that requires regenerating the artifacts
#[derive(Debug, Clone)]
pub enum ScalerShapeError {
    ColumnCount {
        expected: usize,
        actual: usize,
    },
    ColumnMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    ParamLength {
        expected: usize,
        mean: usize,
        scale: usize,
    },
}

impl std::fmt::Display for ScalerShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalerShapeError::ColumnCount { expected, actual } => {
                write!(
                    f,
                    "Scaler shape error: expected {} numeric columns, artifact has {}",
                    expected, actual
                )
            }
            ScalerShapeError::ColumnMismatch {
                index,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Scaler shape error: column {} should be '{}', artifact has '{}'",
                    index, expected, actual
                )
            }
            ScalerShapeError::ParamLength {
                expected,
                mean,
                scale,
            } => {
                write!(
                    f,
                    "Scaler shape error: expected {} params, artifact has {} means / {} scales",
                    expected, mean, scale
                )
            }
        }
    }
}

impl std::error::Error for ScalerShapeError {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::FEATURE_COUNT;

    fn encoded_record() -> EncodedRecord {
        let mut values = [0.0f32; FEATURE_COUNT];
        // Numerics
        values[..NUMERIC_COUNT]
            .copy_from_slice(&[2.0, 0.0, 1.0, 0.0, 50.0, 0.0, 0.02, 0.05, 20.0, 0.0]);
        // Encoded categorical codes
        values[NUMERIC_COUNT] = 4.0;
        values[NUMERIC_COUNT + 1] = 2.0;
        values[NUMERIC_COUNT + 2] = 0.0;
        EncodedRecord { values }
    }

    fn fitted_scaler() -> StandardScaler {
        let mut scaler = StandardScaler::identity();
        scaler.mean = vec![1.0; NUMERIC_COUNT];
        scaler.scale = vec![2.0; NUMERIC_COUNT];
        scaler
    }

    #[test]
    fn test_transform_scales_numeric_columns() {
        let vector = fitted_scaler().transform(&encoded_record()).unwrap();

        // (2 - 1) / 2, (0 - 1) / 2, (50 - 1) / 2, ...
        assert_eq!(vector.values[0], 0.5);
        assert_eq!(vector.values[1], -0.5);
        assert_eq!(vector.values[4], 24.5);
        assert_eq!(vector.values[8], 9.5);
    }

    #[test]
    fn test_transform_leaves_categorical_untouched() {
        let record = encoded_record();
        let vector = fitted_scaler().transform(&record).unwrap();

        assert_eq!(vector.values[NUMERIC_COUNT], 4.0);
        assert_eq!(vector.values[NUMERIC_COUNT + 1], 2.0);
        assert_eq!(vector.values[NUMERIC_COUNT + 2], 0.0);
    }

    #[test]
    fn test_identity_transform_is_noop() {
        let record = encoded_record();
        let vector = StandardScaler::identity().transform(&record).unwrap();
        assert_eq!(vector.values, record.values);
    }

    #[test]
    fn test_column_count_rejected() {
        let mut scaler = StandardScaler::identity();
        scaler.columns.pop();

        match scaler.transform(&encoded_record()) {
            Err(ScalerShapeError::ColumnCount { expected, actual }) => {
                assert_eq!(expected, NUMERIC_COUNT);
                assert_eq!(actual, NUMERIC_COUNT - 1);
            }
            other => panic!("expected ColumnCount error, got {:?}", other),
        }
    }

    #[test]
    fn test_reordered_columns_rejected() {
        let mut scaler = StandardScaler::identity();
        scaler.columns.swap(0, 1);

        match scaler.transform(&encoded_record()) {
            Err(ScalerShapeError::ColumnMismatch { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected ColumnMismatch error, got {:?}", other),
        }
    }

    #[test]
    fn test_param_length_rejected() {
        let mut scaler = StandardScaler::identity();
        scaler.scale.pop();

        assert!(matches!(
            scaler.transform(&encoded_record()),
            Err(ScalerShapeError::ParamLength { .. })
        ));
    }

    #[test]
    fn test_zero_scale_guarded() {
        let mut scaler = StandardScaler::identity();
        scaler.scale[0] = 0.0;

        let vector = scaler.transform(&encoded_record()).unwrap();
        assert!(vector.values[0].is_finite());
    }
}
