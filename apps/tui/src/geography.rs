use prefmap_core::{LoadOutcome, MapError};
use tracing::{debug, info};

/// Read the boundary dataset from an `http(s)://` URL or a local path.
///
/// A single attempt; HTTP error statuses count as failures.
pub async fn fetch_body(source: &str) -> Result<String, MapError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        info!(source, "downloading prefecture boundaries");
        let response = reqwest::get(source)
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| MapError::LoadFailure(format!("request to {source} failed: {e}")))?;
        response
            .text()
            .await
            .map_err(|e| MapError::LoadFailure(format!("reading {source} failed: {e}")))
    } else {
        debug!(source, "reading prefecture boundaries from disk");
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| MapError::LoadFailure(format!("reading {source} failed: {e}")))
    }
}

/// Fetch and parse in one go. Never fails; a failure is an outcome.
pub async fn load(source: &str) -> LoadOutcome {
    let outcome = LoadOutcome::from_body(fetch_body(source).await);
    if let LoadOutcome::Loaded { features, .. } = &outcome {
        info!(regions = features.len(), "prefecture boundaries loaded");
    }
    outcome
}
