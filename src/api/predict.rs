//! Prediction boundary - the surface the interface collaborator calls
//!
//! The only place error kinds collapse into user-facing messages. The kind is
//! logged with a per-request id before collapsing, so observability keeps the
//! taxonomy even though the caller sees one of three rejections.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::model::interpret::Likelihood;
use crate::logic::pipeline::{self, PredictError};

/// The structured prediction request
pub use crate::logic::features::record::VisitorInput as PredictRequest;

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Clamped purchase probability in [0, 1]
    pub probability: f32,
    /// Qualitative bucket: "high" | "moderate" | "low"
    pub label: Likelihood,
    /// Display message for the bucket
    pub message: String,
}

/// A rejected request, collapsed to a user-facing message
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    /// "artifacts_unavailable" | "unsupported_category" | "internal"
    pub error: &'static str,
    pub message: String,
}

impl Rejection {
    fn artifacts_unavailable() -> Self {
        Self {
            error: "artifacts_unavailable",
            message: "Prediction artifacts are unavailable. Check that the model, scaler and \
                      encoder files are present."
                .to_string(),
        }
    }

    fn unsupported_category(field: &str, value: &str) -> Self {
        Self {
            error: "unsupported_category",
            message: format!("Unsupported category value '{}' for {}.", value, field),
        }
    }

    fn internal() -> Self {
        Self {
            error: "internal",
            message: "An unexpected error occurred while making the prediction.".to_string(),
        }
    }

    /// A request that could not even be parsed - a caller bug, reported like
    /// any other internal failure
    pub fn malformed() -> Self {
        Self::internal()
    }

    fn from_error(err: &PredictError) -> Self {
        match err {
            PredictError::Artifact(_) => Self::artifacts_unavailable(),
            PredictError::UnknownCategory(cat) => Self::unsupported_category(&cat.field, &cat.value),
            // Schema, scaler-shape and inference failures are internal:
            // nothing the visitor can correct
            PredictError::Schema(_)
            | PredictError::ScalerShape(_)
            | PredictError::Inference(_) => Self::internal(),
        }
    }
}

// ============================================================================
// HANDLER
// ============================================================================

/// Serve one prediction request against the loaded artifacts
pub fn handle_predict(request: &PredictRequest) -> Result<PredictResponse, Rejection> {
    let request_id = Uuid::new_v4();
    log::debug!("[{}] prediction request received", request_id);

    match pipeline::predict_with_loaded(request) {
        Ok(prediction) => {
            log::info!(
                "[{}] prediction: {:.4} ({})",
                request_id,
                prediction.probability,
                prediction.likelihood
            );
            Ok(PredictResponse {
                probability: prediction.probability,
                label: prediction.likelihood,
                message: prediction.likelihood.message().to_string(),
            })
        }
        Err(err) => {
            log::error!(
                "[{}] prediction failed (kind: {}): {}",
                request_id,
                err.kind(),
                err
            );
            Err(Rejection::from_error(&err))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
