//! OpenAI 兼容的对话客户端（`/chat/completions`）

use actix_web::web::Bytes;
use futures_util::{StreamExt, future, stream::BoxStream};
use serde::Serialize;
use std::time::Duration;

use super::sse::SseDecoder;
use crate::config::AiConfig;
use crate::errors::{PaperHubError, Result};
use crate::models::chat::requests::{ChatMessage, ChatRole};

const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn wire_messages<'a>(system: &'a str, messages: &'a [ChatMessage]) -> Vec<WireMessage<'a>> {
    std::iter::once(WireMessage {
        role: "system",
        content: system,
    })
    .chain(messages.iter().map(|m| WireMessage {
        role: match m.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        },
        content: &m.content,
    }))
    .collect()
}

impl ChatClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout.max(1)))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PaperHubError::external_api(format!("HTTP 客户端创建失败: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(
        &self,
        system: &str,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response> {
        let body = CompletionRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: wire_messages(system, messages),
            stream,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaperHubError::external_api(format!("AI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => PaperHubError::external_api("AI service is busy, please try again later"),
                _ => PaperHubError::external_api(format!("AI service error ({status}): {text}")),
            });
        }
        Ok(response)
    }

    /// 一次性返回完整回答
    pub async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String> {
        let response = self.send(system, messages, false).await?;
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PaperHubError::external_api(format!("AI response invalid: {e}")))?;

        value
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| PaperHubError::external_api("AI response has no content"))
    }

    /// 流式返回文本增量
    pub async fn stream(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<BoxStream<'static, Result<Bytes>>> {
        let response = self.send(system, messages, true).await?;
        let mut decoder = SseDecoder::new();

        let deltas = response
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => Ok(Bytes::from(decoder.push(&bytes).concat())),
                Err(e) => Err(PaperHubError::external_api(format!("AI stream interrupted: {e}"))),
            })
            .filter(|item| future::ready(!matches!(item, Ok(bytes) if bytes.is_empty())))
            .boxed();

        Ok(deltas)
    }
}
