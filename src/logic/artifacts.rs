//! Artifact Loader - the three fitted artifacts and their lifecycle
//!
//! The classifier, scaler and encoder set are produced by the training
//! pipeline, versioned against the feature layout, and immutable here. They
//! load once at startup into a process-wide store and are shared read-only
//! across requests; reloading is an explicit re-`init`, never an accident.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants;
use crate::logic::encoders::EncoderSet;
use crate::logic::features::layout::validate_layout;
use crate::logic::model::inference::{Classifier, OnnxClassifier};
use crate::logic::scaler::StandardScaler;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum ArtifactError {
    /// The named blob is absent from storage
    NotFound { name: &'static str, path: PathBuf },
    /// The named blob exists but cannot be used (corrupt, incompatible layout,
    /// unreadable)
    Load { name: &'static str, reason: String },
    /// No artifacts have been installed in the process-wide store
    NotLoaded,
}

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactError::NotFound { name, path } => {
                write!(f, "Artifact '{}' not found at {}", name, path.display())
            }
            ArtifactError::Load { name, reason } => {
                write!(f, "Failed to load artifact '{}': {}", name, reason)
            }
            ArtifactError::NotLoaded => write!(f, "Artifacts not loaded"),
        }
    }
}

impl std::error::Error for ArtifactError {}

// ============================================================================
// ARTIFACT SET
// ============================================================================

/// Load-time metadata for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub dir: PathBuf,
    /// SHA-256 of the model blob
    pub model_fingerprint: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// The three artifacts, owned by the serving process for its lifetime
pub struct ArtifactSet {
    pub classifier: Box<dyn Classifier>,
    pub scaler: StandardScaler,
    pub encoders: EncoderSet,
    pub metadata: ArtifactMetadata,
}

// ============================================================================
// LOADING
// ============================================================================

fn require_file(name: &'static str, path: &Path) -> Result<(), ArtifactError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ArtifactError::NotFound {
            name,
            path: path.to_path_buf(),
        })
    }
}

/// Load and validate the scaler artifact
pub fn load_scaler(path: &Path) -> Result<StandardScaler, ArtifactError> {
    require_file("scaler", path)?;

    let data = fs::read_to_string(path).map_err(|e| ArtifactError::Load {
        name: "scaler",
        reason: e.to_string(),
    })?;

    let scaler: StandardScaler = serde_json::from_str(&data).map_err(|e| ArtifactError::Load {
        name: "scaler",
        reason: e.to_string(),
    })?;

    validate_layout(scaler.feature_version, scaler.layout_hash).map_err(|e| {
        ArtifactError::Load {
            name: "scaler",
            reason: e.to_string(),
        }
    })?;

    Ok(scaler)
}

/// Load and validate the encoder-set artifact
pub fn load_encoders(path: &Path) -> Result<EncoderSet, ArtifactError> {
    require_file("encoders", path)?;

    let data = fs::read_to_string(path).map_err(|e| ArtifactError::Load {
        name: "encoders",
        reason: e.to_string(),
    })?;

    let encoders: EncoderSet = serde_json::from_str(&data).map_err(|e| ArtifactError::Load {
        name: "encoders",
        reason: e.to_string(),
    })?;

    validate_layout(encoders.feature_version, encoders.layout_hash).map_err(|e| {
        ArtifactError::Load {
            name: "encoders",
            reason: e.to_string(),
        }
    })?;

    let unknown = encoders.unknown_fields();
    if !unknown.is_empty() {
        log::warn!("Encoder artifact carries unknown fields: {:?}", unknown);
    }

    Ok(encoders)
}

/// Load the classifier artifact, returning it with its SHA-256 fingerprint
pub fn load_classifier(path: &Path) -> Result<(OnnxClassifier, String), ArtifactError> {
    require_file("classifier", path)?;

    let bytes = fs::read(path).map_err(|e| ArtifactError::Load {
        name: "classifier",
        reason: e.to_string(),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let fingerprint = hex::encode(hasher.finalize());

    let classifier = OnnxClassifier::from_bytes(&bytes).map_err(|e| ArtifactError::Load {
        name: "classifier",
        reason: e.to_string(),
    })?;

    Ok((classifier, fingerprint))
}

/// Load all three artifacts from a directory
pub fn load_artifacts(dir: &Path) -> Result<ArtifactSet, ArtifactError> {
    log::info!("Loading artifacts from {}", dir.display());

    let (classifier, fingerprint) = load_classifier(&dir.join(constants::MODEL_FILE))?;
    let scaler = load_scaler(&dir.join(constants::SCALER_FILE))?;
    let encoders = load_encoders(&dir.join(constants::ENCODERS_FILE))?;

    log::info!(
        "Artifacts loaded (model sha256: {}, encoder fields: {})",
        fingerprint,
        encoders.fields.len()
    );

    Ok(ArtifactSet {
        classifier: Box::new(classifier),
        scaler,
        encoders,
        metadata: ArtifactMetadata {
            dir: dir.to_path_buf(),
            model_fingerprint: fingerprint,
            loaded_at: chrono::Utc::now(),
        },
    })
}

// ============================================================================
// PROCESS-WIDE STORE (load once, read many)
// ============================================================================

static ARTIFACTS: RwLock<Option<ArtifactSet>> = RwLock::new(None);

/// Load artifacts into the process-wide store. Calling again replaces the
/// loaded set wholesale; requests never observe a partial swap.
pub fn init(dir: &Path) -> Result<(), ArtifactError> {
    let set = load_artifacts(dir)?;
    *ARTIFACTS.write() = Some(set);
    Ok(())
}

/// Whether the store holds a loaded artifact set
pub fn is_loaded() -> bool {
    ARTIFACTS.read().is_some()
}

/// Run `f` against the loaded artifacts, or fail if none are installed
pub fn with_artifacts<T>(f: impl FnOnce(&ArtifactSet) -> T) -> Result<T, ArtifactError> {
    match ARTIFACTS.read().as_ref() {
        Some(set) => Ok(f(set)),
        None => Err(ArtifactError::NotLoaded),
    }
}

/// Snapshot of the loaded set's metadata
pub fn metadata() -> Option<ArtifactMetadata> {
    ARTIFACTS.read().as_ref().map(|set| set.metadata.clone())
}

/// Runtime description of the loaded classifier
pub fn engine_description() -> Option<String> {
    ARTIFACTS
        .read()
        .as_ref()
        .map(|set| set.classifier.describe().to_string())
}

// ============================================================================
// TESTS
// ============================================================================
