use gloo_net::http::Request;

use mathboard_shared::protocol::calculate_url;
use mathboard_shared::{CalculateRequest, CalculateResponse, ClientConfig, SubmitError};

/// Posts one canvas to the recognizer.
pub async fn submit(
    api_url: &str,
    request: &CalculateRequest,
) -> Result<CalculateResponse, SubmitError> {
    let url = calculate_url(api_url);
    log::debug!(
        "sending data url={url} image_bytes={} vars={}",
        request.image.len(),
        request.dict_of_vars.len()
    );
    let response = Request::post(&url)
        .json(request)
        .map_err(|error| SubmitError::Request(error.to_string()))?
        .send()
        .await
        .map_err(|error| SubmitError::Network(error.to_string()))?;
    if !response.ok() {
        return Err(SubmitError::Status(response.status()));
    }
    response
        .json::<CalculateResponse>()
        .await
        .map_err(|error| SubmitError::Decode(error.to_string()))
}

/// Fetches the deploy-time configuration from the host, if it serves one.
pub async fn fetch_config() -> Option<ClientConfig> {
    let response = Request::get("config.json").send().await.ok()?;
    if !response.ok() {
        return None;
    }
    response.json::<ClientConfig>().await.ok()
}
