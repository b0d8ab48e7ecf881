//! Integration tests for feature assembly
//!
//! Exercises the assembler against the layout: every fitted column present,
//! un-collected durations defaulted, schema violations rejected.

#[cfg(test)]
mod assembler_tests {
    use crate::logic::features::{
        layout::{categorical_features, numeric_features, FEATURE_COUNT, NUMERIC_COUNT},
        record::{assemble, SchemaError, VisitorInput},
    };

    fn sample_input() -> VisitorInput {
        VisitorInput {
            administrative: 2,
            informational: 1,
            product_related: 50,
            bounce_rates: 0.02,
            exit_rates: 0.05,
            page_values: 20.0,
            special_day: 0.0,
            month: "Jan".to_string(),
            visitor_type: "Returning_Visitor".to_string(),
            weekend: "FALSE".to_string(),
        }
    }

    /// The assembled record exposes exactly the 13 fitted columns
    #[test]
    fn test_assembled_record_is_complete() {
        let record = assemble(&sample_input()).unwrap();

        let numeric = record.numeric_values();
        let categorical = record.categorical_values();

        assert_eq!(numeric.len(), NUMERIC_COUNT);
        assert_eq!(categorical.len(), FEATURE_COUNT - NUMERIC_COUNT);
        assert_eq!(numeric.len() + categorical.len(), FEATURE_COUNT);

        // Categorical pairs come out under their layout names, in layout order
        let names: Vec<&str> = categorical.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, categorical_features());
    }

    /// Columns the interface does not collect default to zero
    #[test]
    fn test_duration_columns_default_to_zero() {
        let record = assemble(&sample_input()).unwrap();

        assert_eq!(record.administrative_duration, 0.0);
        assert_eq!(record.informational_duration, 0.0);
        assert_eq!(record.product_related_duration, 0.0);

        // And they sit at the fitted positions
        assert_eq!(numeric_features()[1], "Administrative_Duration");
        assert_eq!(record.numeric_values()[1], 0.0);
        assert_eq!(numeric_features()[3], "Informational_Duration");
        assert_eq!(record.numeric_values()[3], 0.0);
        assert_eq!(numeric_features()[5], "ProductRelated_Duration");
        assert_eq!(record.numeric_values()[5], 0.0);
    }

    /// Collected values land in the right columns
    #[test]
    fn test_collected_values_positioned() {
        let record = assemble(&sample_input()).unwrap();
        let numeric = record.numeric_values();

        assert_eq!(numeric[0], 2.0); // Administrative
        assert_eq!(numeric[2], 1.0); // Informational
        assert_eq!(numeric[4], 50.0); // ProductRelated
        assert_eq!(numeric[6], 0.02); // BounceRates
        assert_eq!(numeric[7], 0.05); // ExitRates
        assert_eq!(numeric[8], 20.0); // PageValues
        assert_eq!(numeric[9], 0.0); // SpecialDay
    }

    #[test]
    fn test_non_finite_numeric_rejected() {
        let mut input = sample_input();
        input.bounce_rates = f32::NAN;

        match assemble(&input) {
            Err(SchemaError::NonFinite { field, .. }) => assert_eq!(field, "BounceRates"),
            other => panic!("expected NonFinite error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_category_rejected() {
        let mut input = sample_input();
        input.visitor_type = "  ".to_string();

        match assemble(&input) {
            Err(SchemaError::EmptyCategory { field }) => assert_eq!(field, "VisitorType"),
            other => panic!("expected EmptyCategory error, got {:?}", other),
        }
    }

    #[test]
    fn test_category_values_trimmed() {
        let mut input = sample_input();
        input.month = " Jan ".to_string();

        let record = assemble(&input).unwrap();
        assert_eq!(record.month, "Jan");
    }

    /// Missing request fields are rejected at the serde boundary
    #[test]
    fn test_missing_field_rejected_by_serde() {
        let json = r#"{"administrative": 2, "informational": 1}"#;
        let parsed: Result<VisitorInput, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    /// Unknown request fields are rejected too
    #[test]
    fn test_unknown_field_rejected_by_serde() {
        let json = r#"{
            "administrative": 2, "informational": 1, "productRelated": 50,
            "bounceRates": 0.02, "exitRates": 0.05, "pageValues": 20.0,
            "specialDay": 0.0, "month": "Jan",
            "visitorType": "Returning_Visitor", "weekend": "FALSE",
            "revenue": true
        }"#;
        let parsed: Result<VisitorInput, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }
}
