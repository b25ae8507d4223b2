//! Chat-completions provider (Together and other OpenAI-style endpoints)
//!
//! `POST {endpoint}` with `Authorization: Bearer {apiKey}` and
//! `{model, messages:[system, user], temperature, max_tokens}`; the reply is
//! `choices[0].message.content`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::game::ai::error::{ProviderError, ProviderResult};
use crate::game::ai::http::{post_json, text_at};
use crate::game::ai::parse::extract_move;
use crate::game::ai::prompt::{chat_user_prompt, CHAT_SYSTEM_PROMPT};
use crate::game::ai::provider::{MoveProvider, MoveRequest};

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

/// Remote provider speaking the chat-completions API
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    name: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: Option<String>,
    api_key_env: String,
}

impl ChatCompletionsProvider {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: reqwest::Client,
        name: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            temperature,
            max_tokens,
            api_key,
            api_key_env: api_key_env.into(),
        }
    }
}

#[async_trait]
impl MoveProvider for ChatCompletionsProvider {
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
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| ProviderError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;

        let user_prompt = chat_user_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: CHAT_SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        info!("[AI] Asking {} for a move (ply {})", self.name, request.ply);
        let response = post_json(&self.client, url, Some(key), &body).await?;
        let reply = text_at(&response, "/choices/0/message/content")?;
        extract_move(&self.name, reply)
    }
}
