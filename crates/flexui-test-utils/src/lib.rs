//! Testing utilities for the flexui workspace
//!
//! Shared document fixtures and scripted oracles.

#![allow(missing_docs)]

use async_trait::async_trait;
use flexui_core::{Oracle, OracleError};
use flexui_schema::{Breakpoint, FlexibleContent};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;

/// Styles object with all six breakpoints, `default` set to `base`
pub fn styles_with_default(base: Value) -> Value {
    let mut styles = serde_json::Map::new();
    for breakpoint in Breakpoint::ALL {
        let value = if breakpoint == Breakpoint::Default {
            base.clone()
        } else {
            json!({})
        };
        styles.insert(breakpoint.name().to_string(), value);
    }
    Value::Object(styles)
}

/// Stacked single-section document
pub fn hero_document_json() -> Value {
    json!({
        "layout": {"type": "stacked"},
        "sections": {
            "hero": {
                "id": "hero",
                "name": "Hero",
                "components": [
                    {"id": "headline", "type": "text",
                     "styles": styles_with_default(json!({"fontSize": "16px", "color": "#111"})),
                     "properties": {"content": "Welcome"}, "visible": true},
                    {"id": "subheadline", "type": "text",
                     "styles": styles_with_default(json!({"fontSize": "14px"})),
                     "properties": {"content": "Sign up today"}, "visible": true},
                    {"id": "cta", "type": "button",
                     "styles": styles_with_default(json!({"backgroundColor": "#0050ff"})),
                     "properties": {"content": "Join", "action": "submit"}, "visible": true}
                ],
                "styles": styles_with_default(json!({"padding": "24px"})),
                "layout": "vertical"
            }
        },
        "metadata": {"version": 1}
    })
}

pub fn hero_document() -> FlexibleContent {
    FlexibleContent::from_value(&hero_document_json()).unwrap()
}

/// Split-layout document with an image slot and a form slot
pub fn split_document_json() -> Value {
    json!({
        "layout": {
            "type": "split",
            "slot_mapping": {"media": "left", "form": "right"},
            "custom_properties": {"split_ratio": "40/60", "mobile_stack_direction": "left_first"}
        },
        "sections": {
            "media": {
                "id": "media",
                "name": "Media",
                "components": [
                    {"id": "hero_img", "type": "image",
                     "properties": {"src": "/hero.png", "alt": "Hero"}}
                ],
                "layout": "vertical"
            },
            "form": {
                "id": "form",
                "name": "Form",
                "components": [
                    {"id": "title", "type": "text", "properties": {"content": "Get 10% off"}},
                    {"id": "email", "type": "input",
                     "properties": {"input_type": "email", "placeholder": "you@example.com", "required": true}},
                    {"id": "phone", "type": "input",
                     "properties": {"input_type": "tel", "placeholder": "Phone"}},
                    {"id": "submit", "type": "button",
                     "properties": {"content": "Claim", "action": "submit"}}
                ],
                "layout": "vertical"
            }
        }
    })
}

pub fn split_document() -> FlexibleContent {
    FlexibleContent::from_value(&split_document_json()).unwrap()
}

/// Oracle that replays queued replies and records every prompt
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(reply.into()));
        self
    }

    /// Queue a failure
    pub fn with_error(self, error: OracleError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or(Err(OracleError::EmptyResponse))
    }
}

/// Oracle that always fails with the same error
#[derive(Debug, Clone)]
pub struct FailingOracle(pub OracleError);

#[async_trait]
impl Oracle for FailingOracle {
    async fn generate(&self, _prompt: &str) -> Result<String, OracleError> {
        Err(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_valid() {
        assert_eq!(hero_document().component_count(), 3);
        let split = split_document();
        assert_eq!(split.section_in_slot("right").map(|s| s.id.as_str()), Some("form"));
        assert!(split.layout.split_config().is_ok());
    }
}
