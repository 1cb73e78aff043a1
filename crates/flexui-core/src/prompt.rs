//! Prompt construction
//!
//! The prompt embeds the pretty-printed document and the instruction, and
//! restricts changes to a single component when a target is known.

use crate::types::TargetComponent;
use flexui_schema::{FlexibleContent, SchemaError};
use std::fmt::Write as _;

const STRUCTURE_NOTES: &[&str] = &[
    "FlexibleContent contains layout config and sections",
    "Sections contain components with styles and properties",
    "Components have types (text, image, button, input, etc.) and responsive styles",
    "Styles are organized by breakpoints (default, max-sm, max-md, max-lg, max-xl, max-2xl)",
    "Each breakpoint can have CSS-like style properties",
];

const DEFAULT_RULES: &[&str] = &[
    "Keep all existing structure intact unless specifically requested to change",
    "Apply changes to the appropriate component/section based on the instruction",
    "Use proper CSS property names and values",
    "If changing font size, use CSS units like 'px', 'rem', 'em'",
    "If changing colors, use valid CSS color values",
    "If changing dimensions, use CSS units like 'px', '%', 'rem', 'em', 'pt'",
    "If the instruction is unclear about which component to modify, apply to all relevant components",
];

/// Builds oracle prompts
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    rules: Vec<String>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.iter().map(|r| (*r).to_string()).collect(),
        }
    }
}

impl PromptBuilder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a numbered rule
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Build the prompt for one modification
    ///
    /// # Errors
    /// Returns [`SchemaError::Encode`] if the document cannot be serialized
    pub fn build(
        &self,
        document: &FlexibleContent,
        instruction: &str,
        target: Option<&TargetComponent>,
    ) -> Result<String, SchemaError> {
        let json = document.to_json_pretty()?;
        let mut prompt = String::with_capacity(json.len() + 1024);

        prompt.push_str(
            "You are a UI modification assistant. You need to modify a JSON structure based on user instructions.\n\n",
        );
        prompt.push_str("The JSON follows this structure:\n");
        for note in STRUCTURE_NOTES {
            let _ = writeln!(prompt, "- {note}");
        }
        let _ = write!(
            prompt,
            "\nCURRENT JSON STRUCTURE:\n{json}\n\nUSER INSTRUCTION: \"{instruction}\"\n\n"
        );

        if let Some(target) = target {
            let id = &target.component_id;
            match &target.section_id {
                Some(section) => {
                    let _ = write!(
                        prompt,
                        "TARGET COMPONENT: \"{id}\" in section \"{section}\"\nOnly modify the component with id \"{id}\" in section \"{section}\". Components with the same id in other sections, and every other component, section and layout setting, must stay exactly as they are.\n\n"
                    );
                }
                None => {
                    let _ = write!(
                        prompt,
                        "TARGET COMPONENT: \"{id}\"\nOnly modify the component with id \"{id}\". Every other component, section and layout setting must stay exactly as it is.\n\n"
                    );
                }
            }
        }

        prompt.push_str("Please provide the modified JSON structure. Make sure to:\n");
        for (i, rule) in self.rules.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {rule}", i + 1);
        }
        prompt.push_str(
            "\nRESPOND ONLY WITH THE MODIFIED JSON STRUCTURE - NO EXPLANATIONS OR ADDITIONAL TEXT.\n",
        );
        Ok(prompt)
    }
}
