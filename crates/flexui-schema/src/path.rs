//! Component addressing by dotted path
//!
//! A component address has exactly four segments:
//! `sections.<section id>.components.<index>`. The section id is looked up
//! literally, so a section whose id is `"2"` is still reachable. The index
//! must be a non-negative integer into that section's component list.
//!
//! Resolution is advisory: it never mutates the document and never fails
//! loudly. Any other shape, an unknown section or an out-of-range index
//! yields `None`.

use crate::component::is_component_record;
use crate::document::FlexibleContent;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// A component qualified by the section that holds it
///
/// Component ids are only unique within a section, so this pair is the
/// unambiguous identity of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentAddress {
    pub section_id: String,
    pub component_id: String,
}

impl ComponentAddress {
    #[inline]
    #[must_use]
    pub fn new(section_id: impl Into<String>, component_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            component_id: component_id.into(),
        }
    }
}

impl Display for ComponentAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section_id, self.component_id)
    }
}

/// Resolve a path to the section and component it addresses
///
/// # Examples
/// ```
/// # use flexui_schema::{resolve_component, Component, ComponentType, FlexibleContent, LayoutConfig, LayoutType, Section};
/// let doc = FlexibleContent::new(LayoutConfig::new(LayoutType::Stacked)).with_section(
///     Section::new("hero", "Hero").with_component(Component::new("headline", ComponentType::Text)),
/// );
/// let address = resolve_component(&doc, "sections.hero.components.0").unwrap();
/// assert_eq!(address.to_string(), "hero.headline");
/// ```
#[must_use]
pub fn resolve_component(document: &FlexibleContent, path: &str) -> Option<ComponentAddress> {
    let (section_key, index) = split_address(path)?;
    let section = document.sections.get(section_key)?;
    let component = section.components.get(index)?;
    Some(ComponentAddress::new(section.id.clone(), component.id.clone()))
}

/// Resolve a path to the id of the component it addresses
///
/// # Examples
/// ```
/// # use flexui_schema::{resolve_component_id, Component, ComponentType, FlexibleContent, LayoutConfig, LayoutType, Section};
/// let doc = FlexibleContent::new(LayoutConfig::new(LayoutType::Stacked)).with_section(
///     Section::new("hero", "Hero").with_component(Component::new("headline", ComponentType::Text)),
/// );
/// assert_eq!(resolve_component_id(&doc, "sections.hero.components.0").as_deref(), Some("headline"));
/// assert_eq!(resolve_component_id(&doc, "sections.hero.components.9"), None);
/// ```
#[must_use]
pub fn resolve_component_id(document: &FlexibleContent, path: &str) -> Option<String> {
    resolve_component(document, path).map(|address| address.component_id)
}

/// Resolve a path against an already-serialized document
///
/// Useful when the caller only holds raw JSON that may not validate. The
/// addressed element must look like a component record (an `id` string
/// and a known `type`).
#[must_use]
pub fn resolve_in_value(root: &Value, path: &str) -> Option<String> {
    let (section_key, index) = split_address(path)?;
    let record = root
        .get("sections")?
        .get(section_key)?
        .get("components")?
        .as_array()?
        .get(index)?
        .as_object()?;
    if !is_component_record(record) {
        return None;
    }
    record.get("id").and_then(Value::as_str).map(str::to_string)
}

/// `sections.<key>.components.<index>` into `(key, index)`
fn split_address(path: &str) -> Option<(&str, usize)> {
    match parse_segments(path)?.as_slice() {
        ["sections", section, "components", index] if index.bytes().all(|b| b.is_ascii_digit()) => {
            Some((*section, index.parse().ok()?))
        }
        _ => None,
    }
}

fn parse_segments(path: &str) -> Option<Vec<&str>> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split('.').map(str::trim).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Heuristic label `{section}_component_{index}` derived from a path
///
/// Used only when a path names a section and a numeric index but cannot be
/// walked structurally. The label is **not** checked against the document
/// and may not match any real component id; prefer
/// [`resolve_component_id`] whenever the document is available.
///
/// The section is the segment following `sections` (or the first segment
/// when the path does not start with `sections`); the index is the last
/// integer segment.
///
/// # Examples
/// ```
/// # use flexui_schema::fallback_component_label;
/// assert_eq!(fallback_component_label("sections.hero.components.2").as_deref(), Some("hero_component_2"));
/// assert_eq!(fallback_component_label("hero.3").as_deref(), Some("hero_component_3"));
/// assert_eq!(fallback_component_label("sections.hero"), None);
/// ```
#[must_use]
pub fn fallback_component_label(path: &str) -> Option<String> {
    let segments = parse_segments(path)?;
    let section = match segments.iter().position(|s| *s == "sections") {
        Some(i) => segments.get(i + 1)?,
        None => segments.first()?,
    };
    if section.parse::<usize>().is_ok() {
        return None;
    }
    let index = segments.iter().rev().find_map(|s| s.parse::<usize>().ok())?;
    Some(format!("{section}_component_{index}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentType};
    use crate::layout::{LayoutConfig, LayoutType};
    use crate::section::Section;

    fn doc() -> FlexibleContent {
        FlexibleContent::new(LayoutConfig::new(LayoutType::Stacked))
            .with_section(
                Section::new("hero", "Hero")
                    .with_component(Component::new("headline", ComponentType::Text))
                    .with_component(Component::new("cta", ComponentType::Button)),
            )
            .with_section(
                Section::new("2", "Numbered")
                    .with_component(Component::new("spacer", ComponentType::Spacer)),
            )
    }

    #[test]
    fn resolves_structural_paths() {
        let doc = doc();
        assert_eq!(
            resolve_component_id(&doc, "sections.hero.components.1").as_deref(),
            Some("cta")
        );
        assert_eq!(
            resolve_component_id(&doc, " sections.hero.components.0 ").as_deref(),
            Some("headline")
        );
    }

    #[test]
    fn numeric_section_ids_are_map_keys() {
        assert_eq!(
            resolve_component_id(&doc(), "sections.2.components.0").as_deref(),
            Some("spacer")
        );
    }

    #[test]
    fn misses_return_none() {
        let doc = doc();
        for path in [
            "",
            "sections",
            "sections.hero",
            "sections.hero.components",
            "sections.hero.components.7",
            "sections.hero.components.-1",
            "sections.hero.components.first",
            "sections.hero.components.0.id",
            "sections.hero.components.0.properties",
            "sections.missing.components.0",
            "sections..hero",
            "layout.type.0",
            "metadata",
        ] {
            assert_eq!(resolve_component_id(&doc, path), None, "path {path:?}");
        }
    }

    #[test]
    fn section_records_are_not_components() {
        // sections have an id but no component type
        assert_eq!(resolve_component_id(&doc(), "sections.hero"), None);
    }

    #[test]
    fn address_names_owning_section() {
        let doc = doc();
        assert_eq!(
            resolve_component(&doc, "sections.hero.components.1"),
            Some(ComponentAddress::new("hero", "cta"))
        );
        let spacer = resolve_component(&doc, "sections.2.components.0").unwrap();
        assert_eq!(spacer.to_string(), "2.spacer");
    }

    #[test]
    fn nested_component_lookalikes_do_not_resolve() {
        // a component-shaped record reachable through arbitrary keys
        let raw = serde_json::json!({
            "sections": {"hero": {"id": "hero", "components": [{
                "id": "headline",
                "type": "text",
                "properties": {
                    "child": {"id": "inner", "type": "button"},
                    "components": [{"id": "nested", "type": "text"}]
                }
            }]}},
            "metadata": {"components": [{"id": "stray", "type": "text"}]}
        });
        for path in [
            "sections.hero.components.0.properties.child",
            "sections.hero.components.0.properties.components.0",
            "metadata.components.0",
            "sections.hero.components.+0",
        ] {
            assert_eq!(resolve_in_value(&raw, path), None, "path {path:?}");
        }
        assert_eq!(
            resolve_in_value(&raw, "sections.hero.components.0").as_deref(),
            Some("headline")
        );
    }

    #[test]
    fn raw_value_resolution() {
        let raw = serde_json::json!({"sections": {"s": {"components": [{"id": "x", "type": "custom"}]}}});
        assert_eq!(resolve_in_value(&raw, "sections.s.components.0").as_deref(), Some("x"));
    }

    #[test]
    fn fallback_label_is_heuristic() {
        assert_eq!(
            fallback_component_label("sections.form.components.4").as_deref(),
            Some("form_component_4")
        );
        assert_eq!(fallback_component_label("sections.0.components.1"), None);
        assert_eq!(fallback_component_label("form"), None);
        assert_eq!(fallback_component_label(""), None);
    }
}
