//! Feature Vector - the fully prepared classifier input
//!
//! A versioned `[f32; 13]` in layout order: encoded categorical codes in the
//! categorical columns, scaled values in the numeric columns. Carries the
//! layout version and hash so a stale vector can be rejected instead of
//! silently fed to the model.

use serde::{Deserialize, Serialize};
use super::layout::{
    layout_hash, validate_layout, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
    LayoutMismatchError,
};

/// Versioned feature vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in the order defined by FEATURE_LAYOUT
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from values anchored to the current layout
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        super::layout::feature_index(name).and_then(|i| self.values.get(i).copied())
    }

    /// Validate that this vector is compatible with the current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Named view of the values for debug logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_anchors_layout() {
        let vector = FeatureVector::from_values([0.5; FEATURE_COUNT]);
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
        assert!(vector.validate().is_ok());
    }

    #[test]
    fn test_get_by_name() {
        let mut values = [0.0; FEATURE_COUNT];
        values[8] = 20.0;
        let vector = FeatureVector::from_values(values);
        assert_eq!(vector.get_by_name("PageValues"), Some(20.0));
        assert_eq!(vector.get_by_name("Revenue"), None);
    }

    #[test]
    fn test_stale_vector_rejected() {
        let mut vector = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        vector.version += 1;
        assert!(vector.validate().is_err());
    }

    #[test]
    fn test_to_log_entry() {
        let vector = FeatureVector::from_values([1.0; FEATURE_COUNT]);
        let log = vector.to_log_entry();
        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["named_values"]["Administrative"], 1.0);
    }
}
