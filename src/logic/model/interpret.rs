//! Result Interpreter - qualitative bucketing of the purchase probability
//!
//! A total, pure function over [0, 1]: fixed thresholds, no failure modes.

use serde::{Deserialize, Serialize};

/// Probabilities strictly above this are a high likelihood of purchase
pub const HIGH_THRESHOLD: f32 = 0.6;

/// Probabilities strictly above this (and at most HIGH_THRESHOLD) are moderate
pub const MODERATE_THRESHOLD: f32 = 0.3;

/// Qualitative purchase-likelihood bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    High,
    Moderate,
    Low,
}

impl Likelihood {
    /// Display message for the bucket
    pub fn message(&self) -> &'static str {
        match self {
            Likelihood::High => "high likelihood of purchase",
            Likelihood::Moderate => "moderate likelihood",
            Likelihood::Low => "low likelihood",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Likelihood::High => "high",
            Likelihood::Moderate => "moderate",
            Likelihood::Low => "low",
        }
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a clamped probability
pub fn interpret(probability: f32) -> Likelihood {
    if probability > HIGH_THRESHOLD {
        Likelihood::High
    } else if probability > MODERATE_THRESHOLD {
        Likelihood::Moderate
    } else {
        Likelihood::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(interpret(0.61), Likelihood::High);
        assert_eq!(interpret(0.6), Likelihood::Moderate);
        assert_eq!(interpret(0.31), Likelihood::Moderate);
        assert_eq!(interpret(0.3), Likelihood::Low);
        assert_eq!(interpret(0.0), Likelihood::Low);
        assert_eq!(interpret(1.0), Likelihood::High);
    }

    #[test]
    fn test_messages() {
        assert_eq!(interpret(0.9).message(), "high likelihood of purchase");
        assert_eq!(interpret(0.5).message(), "moderate likelihood");
        assert_eq!(interpret(0.1).message(), "low likelihood");
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(serde_json::to_string(&Likelihood::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&Likelihood::Moderate).unwrap(),
            "\"moderate\""
        );
        assert_eq!(serde_json::to_string(&Likelihood::Low).unwrap(), "\"low\"");
    }
}
