//! Hostaway API client
//!
//! Fetches the raw `/v1/reviews` payload. Every failure mode degrades to
//! the mock payload shipped in the data directory, and an unreadable mock
//! degrades to an empty but valid envelope, so the route layer always
//! receives something the normalizer can work with.

use std::path::Path;

use revly_common::config::HostawayCredentials;
use revly_common::{Error, Result};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::AppState;

const HOSTAWAY_BASE_URL: &str = "https://api.hostaway.com";
const HOSTAWAY_SANDBOX_URL: &str = "https://api.sandbox.hostaway.com";
const REVIEW_FETCH_LIMIT: u32 = 100;
const MOCK_DATA_FILE: &str = "mocked-hostaway.json";

/// Fetch the raw Hostaway reviews payload, falling back to mock data on
/// missing credentials, API failure, or an empty live result.
pub async fn fetch_raw(state: &AppState) -> Value {
    let Some(credentials) = &state.config.hostaway else {
        info!("using mock Hostaway data (no API credentials)");
        return load_mock(&state.config.data_dir).await;
    };

    match fetch_live(state, credentials).await {
        Ok(payload) => {
            let count = payload
                .get("result")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            if count == 0 {
                info!("Hostaway API returned no results, falling back to mock data");
                return load_mock(&state.config.data_dir).await;
            }
            info!("fetched {count} reviews from Hostaway API");
            payload
        }
        Err(err) => {
            error!(error = %err, "Hostaway API fetch failed, falling back to mock data");
            load_mock(&state.config.data_dir).await
        }
    }
}

async fn fetch_live(state: &AppState, credentials: &HostawayCredentials) -> Result<Value> {
    let base_url = if state.config.use_sandbox {
        HOSTAWAY_SANDBOX_URL
    } else {
        HOSTAWAY_BASE_URL
    };
    let url = format!(
        "{base_url}/v1/reviews?accountId={}&limit={REVIEW_FETCH_LIMIT}",
        credentials.account_id
    );

    let response = state
        .http
        .get(&url)
        .bearer_auth(&credentials.access_token)
        .header("Cache-control", "no-cache")
        .send()
        .await
        .map_err(|err| Error::Upstream(format!("Hostaway request failed: {err}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Upstream(format!(
            "Hostaway API error: {status} {body}"
        )));
    }

    let payload: Value = response
        .json()
        .await
        .map_err(|err| Error::Upstream(format!("Hostaway response not JSON: {err}")))?;

    // The API reports errors inside a 200 envelope
    if payload.get("status").and_then(Value::as_str) == Some("fail") {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(Error::Upstream(format!("Hostaway API error: {message}")));
    }

    Ok(payload)
}

/// Load the mock payload from the data directory; unreadable mock data
/// yields an empty valid envelope.
async fn load_mock(data_dir: &Path) -> Value {
    let path = data_dir.join(MOCK_DATA_FILE);
    match tokio::fs::read(&path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(payload) => payload,
            Err(err) => {
                error!(path = %path.display(), error = %err, "mock Hostaway data is not valid JSON");
                empty_envelope()
            }
        },
        Err(err) => {
            error!(path = %path.display(), error = %err, "failed to load mock Hostaway data");
            empty_envelope()
        }
    }
}

fn empty_envelope() -> Value {
    json!({ "status": "success", "result": [] })
}

#[cfg(test)]
mod tests {
    use revly_common::config::Config;

    use super::*;

    #[tokio::test]
    async fn test_missing_mock_file_yields_empty_envelope() {
        let dir = tempfile::tempdir().expect("tempdir");
        let payload = load_mock(dir.path()).await;
        assert_eq!(payload["status"], "success");
        assert_eq!(payload["result"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_fetch_without_credentials_uses_mock() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(MOCK_DATA_FILE),
            r#"{"status":"success","result":[{"id":1,"rating":8,"submittedAt":"2024-02-01 00:00:00","listingName":"Loft"}]}"#,
        )
        .expect("writes mock");

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let state = AppState::new(config);

        let payload = fetch_raw(&state).await;
        assert_eq!(payload["result"].as_array().map(Vec::len), Some(1));
    }
}
