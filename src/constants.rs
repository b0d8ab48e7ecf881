//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change artifact locations, only edit this file.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Shopper-Predict";

/// Classifier artifact file name (ONNX export of the trained model)
pub const MODEL_FILE: &str = "model_online_shoppers.onnx";

/// Numeric scaler artifact file name
pub const SCALER_FILE: &str = "scaler_online_shoppers.json";

/// Categorical encoder set artifact file name
pub const ENCODERS_FILE: &str = "encoders_online_shoppers.json";

/// Environment variable overriding the artifact directory
pub const ARTIFACT_DIR_ENV: &str = "SHOPPER_ARTIFACT_DIR";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get the artifact directory from environment or use the platform default
pub fn get_artifact_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ARTIFACT_DIR_ENV) {
        return PathBuf::from(dir);
    }

    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shopper-predict")
        .join("artifacts")
}
