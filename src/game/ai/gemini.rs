//! Gemini `generateContent` provider
//!
//! `POST {endpoint}?key={apiKey}` with
//! `{contents:[{parts:[{text}]}], generationConfig:{temperature}}`; the reply
//! is `candidates[0].content.parts[0].text`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::game::ai::error::{ProviderError, ProviderResult};
use crate::game::ai::http::{post_json, text_at};
use crate::game::ai::parse::extract_move;
use crate::game::ai::prompt::gemini_prompt;
use crate::game::ai::provider::{MoveProvider, MoveRequest};

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

/// Remote provider speaking the Gemini API
pub struct GeminiProvider {
    client: reqwest::Client,
    name: String,
    endpoint: String,
    temperature: f32,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiProvider {
    /// `api_key` is `None` when the environment variable was unset; every
    /// request then fails with [`ProviderError::MissingApiKey`].
    pub fn new(
        client: reqwest::Client,
        name: impl Into<String>,
        endpoint: impl Into<String>,
        temperature: f32,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            endpoint: endpoint.into(),
            temperature,
            api_key,
            api_key_env: api_key_env.into(),
        }
    }

    fn url(&self, key: &str) -> ProviderResult<reqwest::Url> {
        reqwest::Url::parse_with_params(&self.endpoint, &[("key", key)]).map_err(|e| {
            ProviderError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl MoveProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_move(&self, request: &MoveRequest) -> ProviderResult<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider: self.name.clone(),
                env_var: self.api_key_env.clone(),
            })?;

        let prompt = gemini_prompt(request);
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        info!("[AI] Asking {} for a move (ply {})", self.name, request.ply);
        let response = post_json(&self.client, self.url(key)?, None, &body).await?;
        let reply = text_at(&response, "/candidates/0/content/parts/0/text")?;
        extract_move(&self.name, reply)
    }
}
