//! Chat-completions wire format

use flexui_core::OracleSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Request body for `POST {base_url}/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Single user-turn, non-streaming request
    #[must_use]
    pub fn single_turn(settings: &'a OracleSettings, prompt: &'a str) -> Self {
        Self {
            model: &settings.model,
            messages: vec![WireMessage {
                role: "user",
                content: prompt,
            }],
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if non-blank
    #[must_use]
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

/// Join the API root and the completions route
#[must_use]
pub fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_body_shape() {
        let settings = OracleSettings::default();
        let body = serde_json::to_value(ChatCompletionRequest::single_turn(&settings, "hi")).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "meta/llama-3.3-70b-instruct",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.2_f32,
                "top_p": 0.7_f32,
                "max_tokens": 2048,
                "stream": false
            })
        );
    }

    #[test]
    fn url_joining() {
        assert_eq!(
            completions_url("https://integrate.api.nvidia.com/v1"),
            "https://integrate.api.nvidia.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:8000/v1/"),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn first_choice_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "x",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"a\": 1}"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.into_content().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn empty_replies() {
        for body in [
            json!({"choices": []}),
            json!({}),
            json!({"choices": [{"message": {"role": "assistant", "content": null}}]}),
            json!({"choices": [{"message": {"role": "assistant", "content": "  \n"}}]}),
        ] {
            let response: ChatCompletionResponse = serde_json::from_value(body).unwrap();
            assert_eq!(response.into_content(), None);
        }
    }
}
