use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Reasoning, ReasoningContext, ReasoningError, ReasoningProvider};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You explain BSWD funding review scores to administrators. \
The score is deterministic and correct; explain it, never dispute it. \
Respond ONLY with a JSON object of the form \
{\"reasoning\": string, \"risk_factors\": [string]} and no other fields. \
Keep reasoning to at most three sentences and cite dollar amounts.";

/// Chat Completions backed reasoning. Requires an API key at construction.
pub struct OpenAiReasoning {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiReasoning {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ReasoningError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bswd-review/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .map_err(|err| ReasoningError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        })
    }

    /// Point the client at a compatible endpoint (proxies, local gateways).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ReasoningProvider for OpenAiReasoning {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, context: &ReasoningContext) -> Result<Reasoning, ReasoningError> {
        if self.api_key.trim().is_empty() {
            return Err(ReasoningError::NotConfigured);
        }

        let facts = serde_json::to_string(context)
            .map_err(|err| ReasoningError::Malformed(err.to_string()))?;
        let user = format!("Explain this scored application:\n{facts}");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.3,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ReasoningError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReasoningError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| ReasoningError::Malformed(err.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ReasoningError::Malformed("response has no content".to_string()))?;

        decode_reasoning(&content)
    }
}

/// Strict decode of provider output. Anything but the exact schema is rejected.
pub(crate) fn decode_reasoning(content: &str) -> Result<Reasoning, ReasoningError> {
    let payload = strip_code_fence(content);
    let reasoning: Reasoning = serde_json::from_str(payload)
        .map_err(|err| ReasoningError::Malformed(err.to_string()))?;

    if reasoning.reasoning.trim().is_empty() {
        return Err(ReasoningError::Malformed("reasoning is empty".to_string()));
    }
    if reasoning
        .risk_factors
        .iter()
        .any(|factor| factor.trim().is_empty())
    {
        return Err(ReasoningError::Malformed(
            "risk factors contain an empty entry".to_string(),
        ));
    }

    Ok(Reasoning {
        reasoning: reasoning.reasoning.trim().to_string(),
        risk_factors: reasoning.risk_factors,
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // drop the optional language tag on the opening fence
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
