//! Feature Record - assembling a complete visit record from collected input
//!
//! The interface collects 10 of the 13 fitted columns; the three page-duration
//! columns paired with the activity counts are not asked for and default to
//! zero. The record is a fixed-schema struct so a missing or extra column is a
//! type error, not a runtime surprise; the remaining dynamic checks (finite
//! numerics, non-empty categories) live in `assemble`.

use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, NUMERIC_COUNT};

// ============================================================================
// COLLECTED INPUT
// ============================================================================

/// The fields the interface collects for one prediction.
///
/// Range validation (e.g. `administrative` in 0..=30) is the collecting
/// interface's job and is not repeated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VisitorInput {
    pub administrative: u32,
    pub informational: u32,
    pub product_related: u32,
    pub bounce_rates: f32,
    pub exit_rates: f32,
    pub page_values: f32,
    pub special_day: f32,
    pub month: String,
    pub visitor_type: String,
    pub weekend: String,
}

// ============================================================================
// FEATURE RECORD
// ============================================================================

/// One complete website visit, all 13 fitted columns present.
/// Field order mirrors FEATURE_LAYOUT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub administrative: f32,
    pub administrative_duration: f32,
    pub informational: f32,
    pub informational_duration: f32,
    pub product_related: f32,
    pub product_related_duration: f32,
    pub bounce_rates: f32,
    pub exit_rates: f32,
    pub page_values: f32,
    pub special_day: f32,
    pub month: String,
    pub visitor_type: String,
    pub weekend: String,
}

impl FeatureRecord {
    /// The numeric columns in layout order
    pub fn numeric_values(&self) -> [f32; NUMERIC_COUNT] {
        [
            self.administrative,
            self.administrative_duration,
            self.informational,
            self.informational_duration,
            self.product_related,
            self.product_related_duration,
            self.bounce_rates,
            self.exit_rates,
            self.page_values,
            self.special_day,
        ]
    }

    /// The categorical columns in layout order, as (column, value) pairs
    pub fn categorical_values(&self) -> [(&'static str, &str); FEATURE_COUNT - NUMERIC_COUNT] {
        [
            ("Month", self.month.as_str()),
            ("VisitorType", self.visitor_type.as_str()),
            ("Weekend", self.weekend.as_str()),
        ]
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Caller-side contract violation detected at the assembler boundary
#[derive(Debug, Clone)]
pub enum SchemaError {
    /// A numeric field holds NaN or infinity
    NonFinite { field: &'static str, value: f32 },
    /// A categorical field is present but empty
    EmptyCategory { field: &'static str },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::NonFinite { field, value } => {
                write!(f, "Schema error: field '{}' is not finite ({})", field, value)
            }
            SchemaError::EmptyCategory { field } => {
                write!(f, "Schema error: categorical field '{}' is empty", field)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

// ============================================================================
// ASSEMBLY
// ============================================================================

fn require_finite(field: &'static str, value: f32) -> Result<f32, SchemaError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SchemaError::NonFinite { field, value })
    }
}

fn require_category(field: &'static str, value: &str) -> Result<String, SchemaError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchemaError::EmptyCategory { field });
    }
    Ok(trimmed.to_string())
}

/// Build a complete FeatureRecord from collected input.
///
/// Columns the interface does not collect (the `*_Duration` trio) are filled
/// with zero, the neutral default the artifacts were also fed at serving time.
pub fn assemble(input: &VisitorInput) -> Result<FeatureRecord, SchemaError> {
    Ok(FeatureRecord {
        administrative: input.administrative as f32,
        administrative_duration: 0.0,
        informational: input.informational as f32,
        informational_duration: 0.0,
        product_related: input.product_related as f32,
        product_related_duration: 0.0,
        bounce_rates: require_finite("BounceRates", input.bounce_rates)?,
        exit_rates: require_finite("ExitRates", input.exit_rates)?,
        page_values: require_finite("PageValues", input.page_values)?,
        special_day: require_finite("SpecialDay", input.special_day)?,
        month: require_category("Month", &input.month)?,
        visitor_type: require_category("VisitorType", &input.visitor_type)?,
        weekend: require_category("Weekend", &input.weekend)?,
    })
}
