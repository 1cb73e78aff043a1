//! Request, response and outcome types

use chrono::{DateTime, Utc};
use flexui_schema::{ComponentAddress, DocumentDiff, DocumentHash, FlexibleContent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use ulid::Ulid;

/// Unique modification request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One chat turn; only the last turn's content is used as the instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[inline]
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Narrows a modification to one component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum TargetAddress {
    /// Component id, used as-is
    Id(String),
    /// Dotted path resolved against the input document
    Path(String),
}

impl Display for TargetAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id '{id}'"),
            Self::Path(path) => write!(f, "path '{path}'"),
        }
    }
}

/// Modification request as received at the service boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationRequest {
    /// The caller's current document, not yet validated
    pub current_json: Value,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_component_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_component_id: Option<String>,
}

impl ModificationRequest {
    /// Single-instruction request
    #[must_use]
    pub fn new(current_json: Value, instruction: impl Into<String>) -> Self {
        Self {
            current_json,
            messages: vec![ChatMessage::user(instruction)],
            selected_component_path: None,
            target_component_id: None,
        }
    }

    /// With selected component path
    #[inline]
    #[must_use]
    pub fn with_selected_path(mut self, path: impl Into<String>) -> Self {
        self.selected_component_path = Some(path.into());
        self
    }

    /// With explicit target component id
    #[inline]
    #[must_use]
    pub fn with_target_id(mut self, id: impl Into<String>) -> Self {
        self.target_component_id = Some(id.into());
        self
    }

    /// Last message's content, if there is one
    #[must_use]
    pub fn instruction(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }

    /// Explicit id wins over the selected path; blank values are ignored
    #[must_use]
    pub fn target(&self) -> Option<TargetAddress> {
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        non_blank(&self.target_component_id)
            .map(TargetAddress::Id)
            .or_else(|| non_blank(&self.selected_component_path).map(TargetAddress::Path))
    }
}

/// The component a modification is restricted to
///
/// Component ids are unique only within a section. `section_id` is `None`
/// when an explicit id is absent from the document or is used by more than
/// one section; the restriction then applies to the id alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetComponent {
    pub section_id: Option<String>,
    pub component_id: String,
}

impl TargetComponent {
    /// Target an explicit id, locating its section when that is unambiguous
    #[must_use]
    pub fn locate(document: &FlexibleContent, component_id: &str) -> Self {
        let mut owners = document
            .sections
            .values()
            .filter(|section| section.component(component_id).is_some());
        let section_id = match (owners.next(), owners.next()) {
            (Some(section), None) => Some(section.id.clone()),
            _ => None,
        };
        Self {
            section_id,
            component_id: component_id.to_string(),
        }
    }

    /// True if `(section_id, component_id)` names this target
    #[must_use]
    pub fn matches(&self, section_id: &str, component_id: &str) -> bool {
        component_id == self.component_id
            && self.section_id.as_deref().map_or(true, |s| s == section_id)
    }
}

impl From<ComponentAddress> for TargetComponent {
    fn from(address: ComponentAddress) -> Self {
        Self {
            section_id: Some(address.section_id),
            component_id: address.component_id,
        }
    }
}

impl Display for TargetComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.section_id {
            Some(section) => write!(f, "{section}.{}", self.component_id),
            None => f.write_str(&self.component_id),
        }
    }
}

/// Response returned at the service boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationResponse {
    /// Human-readable change summary
    pub ai_message: String,
    pub modified_json: Value,
}

/// Non-fatal condition noticed while applying a modification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModificationWarning {
    /// Path did not resolve; the instruction went out undirected
    TargetNotFound {
        path: String,
        /// Heuristic label derived from the path, never used as a directive
        fallback_label: Option<String>,
    },
    /// A targeted modification also changed other parts of the document
    UntargetedChanges {
        target: TargetComponent,
        /// `section.component` of each other changed component, first seen first
        components: Vec<String>,
        /// Layout, metadata or section-level settings changed too
        structure_changed: bool,
    },
}

impl Display for ModificationWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound {
                path,
                fallback_label: Some(label),
            } => write!(
                f,
                "target path '{path}' did not resolve (unverified guess: '{label}')"
            ),
            Self::TargetNotFound { path, .. } => {
                write!(f, "target path '{path}' did not resolve")
            }
            Self::UntargetedChanges {
                target,
                components,
                structure_changed,
            } => {
                let mut changed = components.clone();
                if *structure_changed {
                    changed.push("layout or section settings".to_string());
                }
                write!(
                    f,
                    "modification targeted '{target}' but also changed: {}",
                    changed.join(", ")
                )
            }
        }
    }
}

/// A successful modification
#[derive(Debug, Clone)]
pub struct ModificationOutcome {
    pub request_id: RequestId,
    /// The new, validated document
    pub document: FlexibleContent,
    pub summary: String,
    /// Component the instruction was restricted to
    pub target: Option<TargetComponent>,
    /// Extraction strategy that recovered the reply
    pub strategy: &'static str,
    pub before: DocumentHash,
    pub after: DocumentHash,
    pub diff: DocumentDiff,
    pub warnings: Vec<ModificationWarning>,
    pub applied_at: DateTime<Utc>,
}

impl ModificationOutcome {
    /// True if the oracle returned the document unchanged
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}
