//! HTTP gateway to the downstream analyzer service.

use serde_json::Value;

/// Sends one repo scan request to the analyzer at `url`.
///
/// Single POST with the API key in the `x-api-key` header and `payload` as
/// the JSON body. The raw response comes back unmodified; status handling
/// and any retry policy belong to the caller.
pub async fn send_scan_request(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    payload: &Value,
) -> reqwest::Result<reqwest::Response> {
    client
        .post(url)
        .header("x-api-key", api_key)
        .json(payload)
        .send()
        .await
}
