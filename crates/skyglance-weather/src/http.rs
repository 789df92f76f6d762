//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::models::ApiErrorBody;
use crate::types::WeatherError;

/// Build a client, applying `timeout` when one is configured.
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, WeatherError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Decode a success body, or turn a failure status into `WeatherError::Provider`
/// carrying the provider's `message` when the body has one.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, WeatherError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        return serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    tracing::debug!("Provider returned {}: {:?}", status, message);
    Err(WeatherError::Provider {
        status: status.as_u16(),
        message,
    })
}
