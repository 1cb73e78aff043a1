//! Submitted form values checked against a document's input components
//!
//! Only visible `input` components participate. Checks run in order
//! (required, then email, then phone) and a later failure replaces an
//! earlier message for the same field.

use crate::component::ComponentType;
use crate::document::FlexibleContent;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";

// Literal patterns; a typo panics on first use and in `patterns_compile`
#[allow(clippy::expect_used)]
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[allow(clippy::expect_used)]
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,}$").expect("phone pattern compiles"));

/// Outcome of [`validate_form_data`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    /// Component id → message, in document order
    pub errors: IndexMap<String, String>,
}

impl FormValidation {
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn error_for(&self, component_id: &str) -> Option<&str> {
        self.errors.get(component_id).map(String::as_str)
    }
}

/// Check submitted values (keyed by component id) against the document
#[must_use]
pub fn validate_form_data(
    form_data: &IndexMap<String, String>,
    document: &FlexibleContent,
) -> FormValidation {
    let mut result = FormValidation::default();

    let inputs = document
        .components()
        .filter(|c| c.component_type == ComponentType::Input && c.visible);

    for input in inputs {
        let Some(props) = input.input_properties() else {
            continue;
        };
        let value = form_data.get(&input.id).map(String::as_str).unwrap_or_default();

        if props.is_required() && value.trim().is_empty() {
            result.errors.insert(input.id.clone(), REQUIRED_MESSAGE.to_string());
        }
        if value.is_empty() {
            continue;
        }
        match props.input_type.as_deref() {
            Some("email") if !EMAIL_RE.is_match(value) => {
                result.errors.insert(input.id.clone(), EMAIL_MESSAGE.to_string());
            }
            Some("tel") if !PHONE_RE.is_match(value) => {
                result.errors.insert(input.id.clone(), PHONE_MESSAGE.to_string());
            }
            _ => {}
        }
    }

    result
}
