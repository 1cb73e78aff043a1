//! FlexibleContent: the document root
//!
//! # Invariants
//! - every breakpoint-keyed map holds all six breakpoints (by type)
//! - each `sections` key equals the section's own `id`
//! - component ids are unique within their section
//! - `layout.slot_mapping` only references existing sections
//! - `layout.custom_properties` fits the shape implied by `layout.type`
//!
//! [`FlexibleContent::from_value`] decodes and then validates, so a value
//! that parses is always a valid document. [`FlexibleContent::validate`]
//! re-checks the cross-field invariants for documents built in code.

use crate::breakpoint::{Breakpoint, StyleDeclarations};
use crate::component::Component;
use crate::decode::{as_object, optional_open_map, required, OpenMap};
use crate::error::{FieldPath, SchemaError};
use crate::layout::LayoutConfig;
use crate::section::Section;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Flexible content structure: layout, sections and opaque metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FlexibleContent {
    pub layout: LayoutConfig,
    /// Section id → section, in document order
    pub sections: IndexMap<String, Section>,
    /// Passed through untouched
    pub metadata: OpenMap,
}

/// Where a component lives inside a document
#[derive(Debug, Clone, Copy)]
pub struct ComponentLocation<'a> {
    pub section: &'a Section,
    pub index: usize,
    pub component: &'a Component,
}

impl FlexibleContent {
    /// Create an empty document with the given layout
    #[inline]
    #[must_use]
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Append a section keyed by its own id
    #[inline]
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.insert(section.id.clone(), section);
        self
    }

    /// Parse and validate a document from JSON text
    ///
    /// # Errors
    /// - [`SchemaError::Syntax`] if the text is not JSON
    /// - any structural [`SchemaError`] from [`Self::from_value`]
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Decode and validate a document from a JSON value
    ///
    /// # Errors
    /// Returns [`SchemaError`] naming the offending field path
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let root = FieldPath::root();
        let map = as_object(value, &root)?;

        let layout = LayoutConfig::decode(required(map, "layout", &root)?, &root.child("layout"))?;

        let sections_path = root.child("sections");
        let sections = as_object(required(map, "sections", &root)?, &sections_path)?
            .iter()
            .map(|(key, section)| {
                Section::decode(section, &sections_path.child(key.as_str()))
                    .map(|s| (key.clone(), s))
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;

        let metadata = optional_open_map(map, "metadata", &root)?;

        let document = Self {
            layout,
            sections,
            metadata,
        };
        document.validate()?;
        Ok(document)
    }

    /// Encode as a JSON value (exact structural inverse of [`Self::from_value`])
    ///
    /// # Errors
    /// Returns [`SchemaError::Encode`] if serialization fails
    pub fn to_value(&self) -> Result<Value, SchemaError> {
        serde_json::to_value(self).map_err(SchemaError::Encode)
    }

    /// Encode as pretty-printed JSON text
    ///
    /// # Errors
    /// Returns [`SchemaError::Encode`] if serialization fails
    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        serde_json::to_string_pretty(self).map_err(SchemaError::Encode)
    }

    /// Check cross-field invariants
    ///
    /// # Errors
    /// Returns the first [`SchemaError::Invariant`] found, or a decode
    /// error from the layout's typed custom properties
    pub fn validate(&self) -> Result<(), SchemaError> {
        let sections_path = FieldPath::root().child("sections");
        for (key, section) in &self.sections {
            let path = sections_path.child(key.as_str());
            if key != &section.id {
                return Err(SchemaError::invariant(
                    path.child("id"),
                    format!("section id '{}' does not match its key '{key}'", section.id),
                ));
            }
            section.validate(&path)?;
        }

        let slots_path = FieldPath::root().child("layout").child("slot_mapping");
        for section_id in self.layout.slot_mapping.keys() {
            if !self.sections.contains_key(section_id) {
                return Err(SchemaError::invariant(
                    slots_path.child(section_id.as_str()),
                    format!("slot mapping references unknown section '{section_id}'"),
                ));
            }
        }

        self.layout.validate_custom_properties()
    }

    /// All components in document order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.sections.values().flat_map(|s| s.components.iter())
    }

    /// Total number of components
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.sections.values().map(|s| s.components.len()).sum()
    }

    /// Locate a component by id (first match in document order)
    ///
    /// Ids are only unique per section; use [`Self::component_in`] when the
    /// section is known.
    #[must_use]
    pub fn find_component(&self, id: &str) -> Option<ComponentLocation<'_>> {
        self.sections.values().find_map(|section| {
            section.position_of(id).map(|index| ComponentLocation {
                section,
                index,
                component: &section.components[index],
            })
        })
    }

    /// Component by section id and component id
    #[must_use]
    pub fn component_in(&self, section_id: &str, component_id: &str) -> Option<&Component> {
        self.sections.get(section_id)?.component(component_id)
    }

    /// Mutable component by id (first match in document order)
    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.sections
            .values_mut()
            .find_map(|section| section.component_mut(id))
    }

    /// Structural address of a component, as accepted by the path resolver
    ///
    /// # Examples
    /// `sections.hero.components.0`
    #[must_use]
    pub fn component_path(&self, id: &str) -> Option<String> {
        self.find_component(id)
            .map(|loc| format!("sections.{}.components.{}", loc.section.id, loc.index))
    }

    /// Section occupying a layout slot
    #[must_use]
    pub fn section_in_slot(&self, slot: &str) -> Option<&Section> {
        self.layout
            .section_for_slot(slot)
            .and_then(|id| self.sections.get(id))
    }

    /// Effective styles of a component at a breakpoint
    #[must_use]
    pub fn resolved_component_styles(
        &self,
        id: &str,
        breakpoint: Breakpoint,
    ) -> Option<StyleDeclarations> {
        self.find_component(id)
            .map(|loc| loc.component.styles.resolve(breakpoint))
    }
}

impl<'de> Deserialize<'de> for FlexibleContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use crate::layout::LayoutType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn empty_styles() -> Value {
        json!({"default": {}, "max-sm": {}, "max-md": {}, "max-lg": {}, "max-xl": {}, "max-2xl": {}})
    }

    fn sample() -> Value {
        json!({
            "layout": {
                "type": "split",
                "slot_mapping": {"image": "left", "form": "right"},
                "custom_properties": {"split_ratio": "40/60"}
            },
            "sections": {
                "image": {
                    "id": "image",
                    "name": "Image",
                    "components": [
                        {"id": "hero_img", "type": "image", "styles": empty_styles(),
                         "properties": {"src": "/a.png", "alt": "A"}, "visible": true}
                    ],
                    "styles": empty_styles(),
                    "layout": "vertical"
                },
                "form": {
                    "id": "form",
                    "name": "Form",
                    "components": [
                        {"id": "headline", "type": "text", "styles": empty_styles(),
                         "properties": {"content": "Join us"}, "visible": true},
                        {"id": "email", "type": "input", "styles": empty_styles(),
                         "properties": {"input_type": "email", "required": true}, "visible": true}
                    ],
                    "styles": empty_styles(),
                    "layout": "vertical"
                }
            },
            "metadata": {"version": 3}
        })
    }

    #[test]
    fn parse_sample() {
        let doc = FlexibleContent::from_value(&sample()).unwrap();
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.component_count(), 3);
        assert_eq!(doc.layout.layout_type, LayoutType::Split);
        assert_eq!(doc.metadata["version"], json!(3));
    }

    #[test]
    fn serialize_is_structural_inverse() {
        let original = sample();
        let doc = FlexibleContent::from_value(&original).unwrap();
        assert_eq!(doc.to_value().unwrap(), original);
        assert_eq!(FlexibleContent::from_value(&doc.to_value().unwrap()).unwrap(), doc);
    }

    #[test]
    fn missing_sections_is_schema_error() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("sections");
        let err = FlexibleContent::from_value(&value).unwrap_err();
        assert_eq!(err.to_string(), "sections: missing required field");
    }

    #[test]
    fn section_key_must_match_id() {
        let mut value = sample();
        value["sections"]["form"]["id"] = json!("signup");
        let err = FlexibleContent::from_value(&value).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "sections.form.id");
    }

    #[test]
    fn slot_mapping_must_reference_sections() {
        let mut value = sample();
        value["layout"]["slot_mapping"]["ghost"] = json!("left");
        let err = FlexibleContent::from_value(&value).unwrap_err();
        assert!(err.to_string().contains("unknown section 'ghost'"));
    }

    #[test]
    fn split_custom_properties_are_checked() {
        let mut value = sample();
        value["layout"]["custom_properties"]["split_ratio"] = json!(42);
        let err = FlexibleContent::from_value(&value).unwrap_err();
        assert_eq!(
            err.path().unwrap().to_string(),
            "layout.custom_properties.split_ratio"
        );
    }

    #[test]
    fn stacked_layout_accepts_any_custom_properties() {
        let mut value = sample();
        value["layout"]["type"] = json!("stacked");
        value["layout"]["custom_properties"]["split_ratio"] = json!(42);
        assert!(FlexibleContent::from_value(&value).is_ok());
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = FlexibleContent::from_json_str("{\"layout\": ").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax(_)));
    }

    #[test]
    fn component_addressing_helpers() {
        let doc = FlexibleContent::from_value(&sample()).unwrap();

        let loc = doc.find_component("email").unwrap();
        assert_eq!(loc.section.id, "form");
        assert_eq!(loc.index, 1);
        assert_eq!(
            doc.component_path("email").as_deref(),
            Some("sections.form.components.1")
        );
        assert_eq!(doc.section_in_slot("left").unwrap().id, "image");
        assert!(doc.component_in("image", "email").is_none());
    }

    #[test]
    fn built_documents_validate() {
        let doc = FlexibleContent::new(LayoutConfig::new(LayoutType::Stacked)).with_section(
            Section::new("hero", "Hero").with_component(Component::new("headline", ComponentType::Text)),
        );
        assert!(doc.validate().is_ok());

        let mut broken = doc.clone();
        broken.layout = broken.layout.with_slot("missing", "top");
        assert!(broken.validate().is_err());
    }

    #[test]
    fn serde_deserialize_validates() {
        let text = serde_json::to_string(&sample()).unwrap();
        let doc: FlexibleContent = serde_json::from_str(&text).unwrap();
        assert_eq!(doc.sections.len(), 2);

        let result: Result<FlexibleContent, _> = serde_json::from_str(r#"{"layout": {}}"#);
        assert!(result.is_err());
    }
}
