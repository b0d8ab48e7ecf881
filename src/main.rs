//! Shopper Predict Core - Main Entry Point
//!
//! Host shell for the prediction pipeline: loads the fitted artifacts once,
//! reads one JSON prediction request from stdin and writes the JSON response
//! (or rejection) to stdout. The interface that renders input widgets and
//! charts lives outside this process.

mod api;
mod logic;
pub mod constants;

use std::io::Read;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let artifact_dir = constants::get_artifact_dir();
    match logic::artifacts::init(&artifact_dir) {
        Ok(()) => log::info!("Artifacts loaded from {}", artifact_dir.display()),
        // Keep serving: every request will be rejected with a distinct
        // "artifacts unavailable" message rather than crashing the host
        Err(e) => log::warn!("Artifact init: {}", e),
    }

    match serde_json::to_string(&api::get_status()) {
        Ok(status) => log::debug!("Engine status: {}", status),
        Err(e) => log::debug!("Engine status unavailable: {}", e),
    }

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        log::error!("Failed to read request from stdin: {}", e);
        print_json(&api::Rejection::malformed());
        return;
    }

    match serde_json::from_str::<api::PredictRequest>(&input) {
        Ok(request) => match api::handle_predict(&request) {
            Ok(response) => print_json(&response),
            Err(rejection) => print_json(&rejection),
        },
        Err(e) => {
            log::error!("Malformed prediction request: {}", e);
            print_json(&api::Rejection::malformed());
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize response: {}", e),
    }
}
