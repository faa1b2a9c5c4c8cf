use std::error::Error;

use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Parameters of one chat-completion call: a fixed system instruction, a
/// templated user message, an optional token cap and a temperature.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatCompletionReply {
    choices: Vec<ChatChoice>,
}

/// A trait, necessary for every entity that will answer prompts.
/// The binary uses [`OpenAiClient`]; tests substitute canned repliers.
#[allow(async_fn_in_trait)]
pub trait ChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, Box<dyn Error>>;
}

/// Client for a hosted chat-completion endpoint speaking the OpenAI wire shape.
pub struct OpenAiClient {
    http: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(http: Client, api_base: String, api_key: String, model: String) -> Self {
        OpenAiClient {
            http,
            api_base,
            api_key,
            model,
        }
    }
}

impl ChatModel for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, Box<dyn Error>> {
        info!("Sending completion request to model {}", self.model);
        let mut payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user}
            ],
            "n": 1,
            "temperature": request.temperature,
        });
        if let Some(cap) = request.max_tokens {
            payload["max_tokens"] = json!(cap);
        }

        let request_url = format!("{}/chat/completions", self.api_base);
        let response = self
            .http
            .post(request_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        let reply: ChatCompletionReply = response.json().await?;
        debug!("Model returned {} choice(s)", reply.choices.len());

        let first = reply
            .choices
            .into_iter()
            .next()
            .ok_or("model reply contained no choices")?;
        Ok(first.message.content.trim().to_string())
    }
}

/// Return the JSON body of a reply, unwrapping one Markdown code fence if the
/// model added it. No other repair is attempted; callers parse the result and
/// surface any failure as-is.
pub fn extract_json_payload(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_payload_passes_bare_json_through() {
        assert_eq!(extract_json_payload("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_payload_unwraps_fenced_reply() {
        let fenced = "```json\n{\"sessions\": []}\n```";
        assert_eq!(extract_json_payload(fenced), "{\"sessions\": []}");
    }

    #[test]
    fn extract_json_payload_unwraps_fence_without_language_tag() {
        let fenced = "```\n{\"available\": true}\n```";
        assert_eq!(extract_json_payload(fenced), "{\"available\": true}");
    }
}
