//! Prediction Pipeline - the stages wired in order
//!
//! raw input → assembled record → encoded record → scaled vector →
//! probability → qualitative bucket. Strictly sequential, stateless per
//! request, fail-fast: any stage error aborts the request with no partial
//! result.

use serde::Serialize;

use super::artifacts::{self, ArtifactError, ArtifactSet};
use super::encoders::{self, UnknownCategoryError};
use super::features::record::{self, SchemaError, VisitorInput};
use super::model::inference::{self, InferenceError};
use super::model::interpret::{self, Likelihood};
use super::scaler::ScalerShapeError;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Everything a prediction request can fail with, one variant per stage
#[derive(Debug)]
pub enum PredictError {
    Artifact(ArtifactError),
    Schema(SchemaError),
    UnknownCategory(UnknownCategoryError),
    ScalerShape(ScalerShapeError),
    Inference(InferenceError),
}

impl PredictError {
    /// Stable kind tag for boundary logging
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Artifact(ArtifactError::NotFound { .. }) => "artifact_not_found",
            PredictError::Artifact(ArtifactError::Load { .. }) => "artifact_load",
            PredictError::Artifact(ArtifactError::NotLoaded) => "artifact_not_loaded",
            PredictError::Schema(_) => "schema",
            PredictError::UnknownCategory(_) => "unknown_category",
            PredictError::ScalerShape(_) => "scaler_shape",
            PredictError::Inference(_) => "inference",
        }
    }
}

impl std::fmt::Display for PredictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictError::Artifact(e) => e.fmt(f),
            PredictError::Schema(e) => e.fmt(f),
            PredictError::UnknownCategory(e) => e.fmt(f),
            PredictError::ScalerShape(e) => e.fmt(f),
            PredictError::Inference(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for PredictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictError::Artifact(e) => Some(e),
            PredictError::Schema(e) => Some(e),
            PredictError::UnknownCategory(e) => Some(e),
            PredictError::ScalerShape(e) => Some(e),
            PredictError::Inference(e) => Some(e),
        }
    }
}

impl From<ArtifactError> for PredictError {
    fn from(err: ArtifactError) -> Self {
        PredictError::Artifact(err)
    }
}

impl From<SchemaError> for PredictError {
    fn from(err: SchemaError) -> Self {
        PredictError::Schema(err)
    }
}

impl From<UnknownCategoryError> for PredictError {
    fn from(err: UnknownCategoryError) -> Self {
        PredictError::UnknownCategory(err)
    }
}

impl From<ScalerShapeError> for PredictError {
    fn from(err: ScalerShapeError) -> Self {
        PredictError::ScalerShape(err)
    }
}

impl From<InferenceError> for PredictError {
    fn from(err: InferenceError) -> Self {
        PredictError::Inference(err)
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// One prediction: a clamped probability plus its qualitative bucket.
/// Ephemeral - never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub probability: f32,
    pub likelihood: Likelihood,
}

/// Run the full pipeline against an explicit artifact set
pub fn predict(
    artifacts: &ArtifactSet,
    input: &VisitorInput,
) -> Result<Prediction, PredictError> {
    let record = record::assemble(input)?;
    let encoded = encoders::encode(&record, &artifacts.encoders)?;
    let vector = artifacts.scaler.transform(&encoded)?;
    log::trace!("Prepared vector: {}", vector.to_log_entry());

    let probability = inference::predict_probability(artifacts.classifier.as_ref(), &vector)?;
    let likelihood = interpret::interpret(probability);

    Ok(Prediction {
        probability,
        likelihood,
    })
}

/// Run the pipeline against the process-wide artifact store
pub fn predict_with_loaded(input: &VisitorInput) -> Result<Prediction, PredictError> {
    artifacts::with_artifacts(|set| predict(set, input))?
}

// ============================================================================
// TESTS
// ============================================================================
