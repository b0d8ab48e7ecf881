//! Engine status snapshot for the hosting interface

use serde::{Deserialize, Serialize};

use crate::logic::artifacts;
use crate::logic::features::layout::{layout_hash, FEATURE_COUNT, FEATURE_VERSION};
use crate::logic::model::inference::inference_metrics;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,

    pub artifacts: ArtifactStatus,
    pub inference: InferenceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactStatus {
    pub loaded: bool,
    pub dir: Option<String>,
    pub model_fingerprint: Option<String>,
    pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceStatus {
    pub engine: Option<String>,
    pub prediction_count: u64,
    pub avg_latency_ms: f32,
}

/// Collect the current status
pub fn get_status() -> EngineStatus {
    let metadata = artifacts::metadata();
    let (prediction_count, avg_latency_ms) = inference_metrics();

    EngineStatus {
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        feature_count: FEATURE_COUNT,
        artifacts: ArtifactStatus {
            loaded: metadata.is_some(),
            dir: metadata
                .as_ref()
                .map(|m| m.dir.display().to_string()),
            model_fingerprint: metadata.as_ref().map(|m| m.model_fingerprint.clone()),
            loaded_at: metadata.as_ref().map(|m| m.loaded_at),
        },
        inference: InferenceStatus {
            engine: artifacts::engine_description(),
            prediction_count,
            avg_latency_ms,
        },
    }
}
