//! Shared HTTP plumbing for the remote providers

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::game::ai::error::{ProviderError, ProviderResult};

/// Longest error body kept in [`ProviderError::Status`]
const MAX_ERROR_BODY: usize = 500;

/// Client with the request timeout applied
pub fn build_client(timeout: Duration) -> ProviderResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// POST a JSON body and decode the JSON response
///
/// Any non-2xx status is an error carrying (a prefix of) the body text.
pub async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: reqwest::Url,
    bearer: Option<&str>,
    body: &B,
) -> ProviderResult<Value> {
    let mut headers = HeaderMap::new();
    if let Some(token) = bearer {
        let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
            ProviderError::InvalidEndpoint {
                endpoint: url.to_string(),
                message: format!("API key is not a valid header value: {}", e),
            }
        })?;
        headers.insert(AUTHORIZATION, value);
    }

    debug!("[AI] POST {}", url.path());
    let response = client.post(url).headers(headers).json(body).send().await?;

    let status = response.status();
    if !status.is_success() {
        let mut text = response.text().await.unwrap_or_default();
        truncate_on_char_boundary(&mut text, MAX_ERROR_BODY);
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(response.json::<Value>().await?)
}

/// Text at a JSON pointer, or a `MissingField` error naming it
pub fn text_at<'a>(value: &'a Value, pointer: &'static str) -> ProviderResult<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or(ProviderError::MissingField { field: pointer })
}

fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
