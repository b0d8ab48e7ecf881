//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The scaler and encoder artifacts embed the version and hash they were
//! fitted against; a mismatch means the artifacts must be regenerated.

use crc32fast::Hasher;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in the exact column order the artifacts were fitted on.
/// This is the SINGLE SOURCE OF TRUTH for feature layout.
///
/// Numeric columns come first, categorical columns last.
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Page activity (0-5) ===
    "Administrative",            // 0: Count of administrative pages visited
    "Administrative_Duration",   // 1: Seconds spent on administrative pages
    "Informational",             // 2: Count of informational pages visited
    "Informational_Duration",    // 3: Seconds spent on informational pages
    "ProductRelated",            // 4: Count of product pages visited
    "ProductRelated_Duration",   // 5: Seconds spent on product pages

    // === Rates and values (6-8) ===
    "BounceRates",               // 6: Average bounce rate of visited pages
    "ExitRates",                 // 7: Average exit rate of visited pages
    "PageValues",                // 8: Average page value of visited pages

    // === Calendar (9) ===
    "SpecialDay",                // 9: Proximity to a special day (0-1)

    // === Categorical (10-12) ===
    "Month",                     // 10: Visit month
    "VisitorType",               // 11: Returning_Visitor / New_Visitor / Other
    "Weekend",                   // 12: TRUE / FALSE
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 13;

/// Number of numeric features (the leading columns of FEATURE_LAYOUT)
pub const NUMERIC_COUNT: usize = 10;

/// The numeric columns, in the order the scaler was fitted on
pub fn numeric_features() -> &'static [&'static str] {
    &FEATURE_LAYOUT[..NUMERIC_COUNT]
}

/// The categorical columns, in layout order
pub fn categorical_features() -> &'static [&'static str] {
    &FEATURE_LAYOUT[NUMERIC_COUNT..]
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches against fitted artifacts
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all feature names in order
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when an artifact's feature layout doesn't match the current one
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that an artifact was fitted against the current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 13);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
        assert_eq!(numeric_features().len(), NUMERIC_COUNT);
        assert_eq!(categorical_features().len(), FEATURE_COUNT - NUMERIC_COUNT);
    }

    #[test]
    fn test_numeric_categorical_split() {
        assert_eq!(numeric_features()[0], "Administrative");
        assert_eq!(numeric_features()[NUMERIC_COUNT - 1], "SpecialDay");
        assert_eq!(categorical_features(), &["Month", "VisitorType", "Weekend"]);
    }

    #[test]
    fn test_layout_hash_consistency() {
        // Hash should be consistent across calls
        let hash1 = compute_layout_hash();
        let hash2 = compute_layout_hash();
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_layout_hash_non_zero() {
        let hash = layout_hash();
        assert_ne!(hash, 0);
    }

    #[test]
    fn test_validate_layout_success() {
        let result = validate_layout(FEATURE_VERSION, layout_hash());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_layout_version_mismatch() {
        let result = validate_layout(FEATURE_VERSION + 1, layout_hash());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_layout_hash_mismatch() {
        let result = validate_layout(FEATURE_VERSION, layout_hash() ^ 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("Administrative"), Some(0));
        assert_eq!(feature_index("SpecialDay"), Some(9));
        assert_eq!(feature_index("Weekend"), Some(12));
        assert_eq!(feature_index("Revenue"), None);
    }

}
