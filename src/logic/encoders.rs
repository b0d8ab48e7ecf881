//! Categorical Encoder Stage
//!
//! Maps categorical string values to the integer codes the classifier was
//! trained on, using the vocabulary learned at fit time. Fields the encoder
//! artifact omits pass through (the value must then already be numeric text);
//! a value the fitted vocabulary has never seen is a hard error, because an
//! arbitrary code would silently corrupt scaling and inference downstream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::features::layout::{categorical_features, FEATURE_COUNT, NUMERIC_COUNT};
use super::features::record::FeatureRecord;

// ============================================================================
// LABEL ENCODER
// ============================================================================

/// A fitted label mapping for one categorical column.
/// Code = index into the class list, fixed at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<S: Into<String>>(classes: Vec<S>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Look up the code for a category value, None if out of vocabulary
    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.classes.iter().position(|c| c == value).map(|i| i as u32)
    }
}

// ============================================================================
// ENCODER SET
// ============================================================================

/// The encoder artifact: per-column fitted vocabularies.
/// Read-only after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSet {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub fields: BTreeMap<String, LabelEncoder>,
}

/// What the encoder set can do for one column
#[derive(Debug, Clone, Copy)]
pub enum FieldCapability<'a> {
    /// A vocabulary was fitted for this column
    Fitted(&'a LabelEncoder),
    /// The artifact omits this column; its value passes through unchanged
    Passthrough,
}

impl EncoderSet {
    /// The enumerated per-column capability
    pub fn capability(&self, field: &str) -> FieldCapability<'_> {
        match self.fields.get(field) {
            Some(encoder) => FieldCapability::Fitted(encoder),
            None => FieldCapability::Passthrough,
        }
    }

    /// Column names the artifact carries that the layout does not know.
    /// Harmless for encoding (they are never consulted) but worth a warning.
    pub fn unknown_fields(&self) -> Vec<&str> {
        self.fields
            .keys()
            .filter(|name| !categorical_features().iter().any(|&c| c == name.as_str()))
            .map(|name| name.as_str())
            .collect()
    }
}

// ============================================================================
// ENCODED RECORD
// ============================================================================

/// A FeatureRecord with its categorical columns replaced by integer codes.
/// Numeric columns are still raw (unscaled) at this point.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    pub values: [f32; FEATURE_COUNT],
}

impl EncodedRecord {
    /// The numeric columns, in layout order
    pub fn numeric_slice(&self) -> &[f32] {
        &self.values[..NUMERIC_COUNT]
    }

    /// The encoded categorical codes, in layout order
    pub fn categorical_slice(&self) -> &[f32] {
        &self.values[NUMERIC_COUNT..]
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// A category value the fitted vocabulary cannot encode
#[derive(Debug, Clone)]
pub struct UnknownCategoryError {
    pub field: String,
    pub value: String,
}

impl std::fmt::Display for UnknownCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown category value '{}' for field '{}'",
            self.value, self.field
        )
    }
}

impl std::error::Error for UnknownCategoryError {}

// ============================================================================
// ENCODING
// ============================================================================

/// Replace each categorical value with its fitted integer code.
///
/// Deterministic: the same (record, encoder set) pair always encodes to the
/// same output.
pub fn encode(
    record: &FeatureRecord,
    encoders: &EncoderSet,
) -> Result<EncodedRecord, UnknownCategoryError> {
    let mut values = [0.0f32; FEATURE_COUNT];
    values[..NUMERIC_COUNT].copy_from_slice(&record.numeric_values());

    for (offset, (field, raw)) in record.categorical_values().into_iter().enumerate() {
        let code = match encoders.capability(field) {
            FieldCapability::Fitted(encoder) => {
                encoder.code_of(raw).ok_or_else(|| UnknownCategoryError {
                    field: field.to_string(),
                    value: raw.to_string(),
                })? as f32
            }
            // No fitted vocabulary: the value must already be numeric text
            // (e.g. a column pre-encoded upstream of this service).
            FieldCapability::Passthrough => {
                raw.trim().parse::<f32>().map_err(|_| UnknownCategoryError {
                    field: field.to_string(),
                    value: raw.to_string(),
                })?
            }
        };
        values[NUMERIC_COUNT + offset] = code;
    }

    Ok(EncodedRecord { values })
}

// ============================================================================
// TESTS
// ============================================================================
