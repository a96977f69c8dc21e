use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::CompletionService;
use crate::config::AiConfig;

const SYSTEM_PROMPT: &str =
    "You are a careful personal finance assistant. Answer in plain text without markdown.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    content: Option<String>,
}

/// OpenAI-compatible chat completions endpoint over blocking HTTP.
pub(crate) struct HttpCompletion {
    client: reqwest::blocking::Client,
    config: AiConfig,
}

impl HttpCompletion {
    pub(crate) fn new(config: AiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }
}

impl CompletionService for HttpCompletion {
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.2,
        };

        tracing::debug!(url = %self.config.url, model = %self.config.model, "sending completion request");
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .context("Completion request failed")?;

        let status = response.status();
        let body = response.text().context("Failed to read completion response")?;
        if !status.is_success() {
            anyhow::bail!("Completion API error {status}: {body}");
        }

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).context("Completion response is not valid JSON")?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Completion response has no content"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_response_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  15/06/2024|Coffee|4.50|Expense \n"}},{"message":{"content":"other"}}]}"#;
        assert_eq!(
            parse_response(body).unwrap(),
            "15/06/2024|Coffee|4.50|Expense"
        );
    }

    #[test]
    fn test_parse_response_empty_content() {
        assert!(parse_response(r#"{"choices":[{"message":{"content":"   "}}]}"#).is_err());
        assert!(parse_response(r#"{"choices":[{"message":{"content":null}}]}"#).is_err());
        assert!(parse_response(r#"{"choices":[]}"#).is_err());
    }

    #[test]
    fn test_parse_response_not_json() {
        assert!(parse_response("<html>bad gateway</html>").is_err());
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.2,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }
}
