//! Components and their per-type property payloads
//!
//! The `properties` object is polymorphic: its shape depends on the
//! component's `type`. Known shapes decode into typed structs; every key the
//! struct does not know about is kept in `extra` so oracle-added fields
//! survive re-serialization. Types without a known shape keep their
//! properties as an opaque ordered map.

use crate::breakpoint::{decode_styles, ResponsiveStyles};
use crate::decode::{
    as_object, decode_enum, extra_fields, open_map, optional_bool, optional_str, required,
    required_str, OpenMap, SchemaEnum,
};
use crate::error::{FieldPath, SchemaError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// Closed set of component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Text,
    Image,
    Button,
    QuizOption,
    Input,
    ProductCard,
    DiscountDisplay,
    Divider,
    Spacer,
    Custom,
}

impl SchemaEnum for ComponentType {
    const KIND: &'static str = "component type";
    const ALL: &'static [Self] = &[
        ComponentType::Text,
        ComponentType::Image,
        ComponentType::Button,
        ComponentType::QuizOption,
        ComponentType::Input,
        ComponentType::ProductCard,
        ComponentType::DiscountDisplay,
        ComponentType::Divider,
        ComponentType::Spacer,
        ComponentType::Custom,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Text => "text",
            ComponentType::Image => "image",
            ComponentType::Button => "button",
            ComponentType::QuizOption => "quiz_option",
            ComponentType::Input => "input",
            ComponentType::ProductCard => "product_card",
            ComponentType::DiscountDisplay => "discount_display",
            ComponentType::Divider => "divider",
            ComponentType::Spacer => "spacer",
            ComponentType::Custom => "custom",
        }
    }
}

impl Display for ComponentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Properties of `text` components
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// e.g. `close`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(flatten)]
    pub extra: OpenMap,
}

/// Properties of `button` components
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ButtonProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// e.g. `submit`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(flatten)]
    pub extra: OpenMap,
}

/// Properties of `input` components
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputProperties {
    /// `email`, `name`, `tel`, `quiz`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(flatten)]
    pub extra: OpenMap,
}

impl InputProperties {
    /// Whether a value must be supplied (absent means optional)
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Properties of `image` components
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: OpenMap,
}

/// Properties of `quiz_option` components
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuizOptionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(flatten)]
    pub extra: OpenMap,
}

const TEXT_KEYS: &[&str] = &["content", "font", "action"];
const BUTTON_KEYS: &[&str] = &["content", "action", "font"];
const INPUT_KEYS: &[&str] = &["input_type", "placeholder", "required", "font"];
const IMAGE_KEYS: &[&str] = &["src", "alt"];
const QUIZ_OPTION_KEYS: &[&str] = &["action", "content", "field_type", "font"];

/// Type-dependent property payload
///
/// The variant is selected by the owning component's [`ComponentType`];
/// [`Component::validate`] rejects a variant that disagrees with the type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentProperties {
    Text(TextProperties),
    Button(ButtonProperties),
    Input(InputProperties),
    Image(ImageProperties),
    QuizOption(QuizOptionProperties),
    /// Types without a known shape
    Opaque(OpenMap),
}

impl ComponentProperties {
    /// Empty payload of the shape implied by `component_type`
    #[must_use]
    pub fn empty_for(component_type: ComponentType) -> Self {
        match component_type {
            ComponentType::Text => Self::Text(TextProperties::default()),
            ComponentType::Button => Self::Button(ButtonProperties::default()),
            ComponentType::Input => Self::Input(InputProperties::default()),
            ComponentType::Image => Self::Image(ImageProperties::default()),
            ComponentType::QuizOption => Self::QuizOption(QuizOptionProperties::default()),
            ComponentType::ProductCard
            | ComponentType::DiscountDisplay
            | ComponentType::Divider
            | ComponentType::Spacer
            | ComponentType::Custom => Self::Opaque(OpenMap::new()),
        }
    }

    /// Check that the payload shape belongs to `component_type`
    #[must_use]
    pub fn matches(&self, component_type: ComponentType) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(&Self::empty_for(component_type))
    }

    /// Decode `value` strictly against the shape implied by `component_type`
    ///
    /// # Errors
    /// Returns [`SchemaError`] if a known key carries the wrong JSON kind
    pub fn decode(
        component_type: ComponentType,
        value: &Value,
        path: &FieldPath,
    ) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        Ok(match component_type {
            ComponentType::Text => Self::Text(TextProperties {
                content: optional_str(map, "content", path)?,
                font: optional_str(map, "font", path)?,
                action: optional_str(map, "action", path)?,
                extra: extra_fields(map, TEXT_KEYS),
            }),
            ComponentType::Button => Self::Button(ButtonProperties {
                content: optional_str(map, "content", path)?,
                action: optional_str(map, "action", path)?,
                font: optional_str(map, "font", path)?,
                extra: extra_fields(map, BUTTON_KEYS),
            }),
            ComponentType::Input => Self::Input(InputProperties {
                input_type: optional_str(map, "input_type", path)?,
                placeholder: optional_str(map, "placeholder", path)?,
                required: optional_bool(map, "required", path)?,
                font: optional_str(map, "font", path)?,
                extra: extra_fields(map, INPUT_KEYS),
            }),
            ComponentType::Image => Self::Image(ImageProperties {
                src: optional_str(map, "src", path)?,
                alt: optional_str(map, "alt", path)?,
                extra: extra_fields(map, IMAGE_KEYS),
            }),
            ComponentType::QuizOption => Self::QuizOption(QuizOptionProperties {
                action: optional_str(map, "action", path)?,
                content: optional_str(map, "content", path)?,
                field_type: optional_str(map, "field_type", path)?,
                font: optional_str(map, "font", path)?,
                extra: extra_fields(map, QUIZ_OPTION_KEYS),
            }),
            _ => Self::Opaque(open_map(value, path)?),
        })
    }

    /// Keys with a typed field in this shape (empty for opaque payloads)
    #[must_use]
    pub fn known_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Text(_) => TEXT_KEYS,
            Self::Button(_) => BUTTON_KEYS,
            Self::Input(_) => INPUT_KEYS,
            Self::Image(_) => IMAGE_KEYS,
            Self::QuizOption(_) => QUIZ_OPTION_KEYS,
            Self::Opaque(_) => &[],
        }
    }

    /// Keys the oracle added beyond the known shape
    #[must_use]
    pub fn extra(&self) -> &OpenMap {
        match self {
            Self::Text(p) => &p.extra,
            Self::Button(p) => &p.extra,
            Self::Input(p) => &p.extra,
            Self::Image(p) => &p.extra,
            Self::QuizOption(p) => &p.extra,
            Self::Opaque(map) => map,
        }
    }
}

/// A single renderable element inside a section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    /// Unique within the owning section
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub styles: ResponsiveStyles,
    pub properties: ComponentProperties,
    pub visible: bool,
}

impl Component {
    /// Create a visible component with empty styles and properties
    #[must_use]
    pub fn new(id: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            id: id.into(),
            component_type,
            styles: ResponsiveStyles::default(),
            properties: ComponentProperties::empty_for(component_type),
            visible: true,
        }
    }

    /// With properties
    #[inline]
    #[must_use]
    pub fn with_properties(mut self, properties: ComponentProperties) -> Self {
        self.properties = properties;
        self
    }

    /// With styles
    #[inline]
    #[must_use]
    pub fn with_styles(mut self, styles: ResponsiveStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Text content, for types that carry one
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.properties {
            ComponentProperties::Text(p) => p.content.as_deref(),
            ComponentProperties::Button(p) => p.content.as_deref(),
            ComponentProperties::QuizOption(p) => p.content.as_deref(),
            _ => None,
        }
    }

    /// Font family, for types that carry one
    #[must_use]
    pub fn font(&self) -> Option<&str> {
        match &self.properties {
            ComponentProperties::Text(p) => p.font.as_deref(),
            ComponentProperties::Button(p) => p.font.as_deref(),
            ComponentProperties::Input(p) => p.font.as_deref(),
            ComponentProperties::QuizOption(p) => p.font.as_deref(),
            _ => None,
        }
    }

    /// Click action (`close`, `submit`, ...), for types that carry one
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        match &self.properties {
            ComponentProperties::Text(p) => p.action.as_deref(),
            ComponentProperties::Button(p) => p.action.as_deref(),
            ComponentProperties::QuizOption(p) => p.action.as_deref(),
            _ => None,
        }
    }

    /// Input properties, if this is an `input` component
    #[must_use]
    pub fn input_properties(&self) -> Option<&InputProperties> {
        match &self.properties {
            ComponentProperties::Input(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        let id = required_str(map, "id", path)?;
        let component_type: ComponentType =
            decode_enum(required(map, "type", path)?, &path.child("type"))?;

        let styles = match map.get("styles") {
            None => ResponsiveStyles::default(),
            Some(value) => decode_styles(value, &path.child("styles"))?,
        };

        let properties = match map.get("properties") {
            None => ComponentProperties::empty_for(component_type),
            Some(value) => {
                ComponentProperties::decode(component_type, value, &path.child("properties"))?
            }
        };

        let visible = optional_bool(map, "visible", path)?.unwrap_or(true);

        Ok(Self {
            id,
            component_type,
            styles,
            properties,
            visible,
        })
    }

    /// Check component-local invariants
    ///
    /// # Errors
    /// Returns [`SchemaError::Invariant`] for an empty id, a property
    /// payload whose shape belongs to another type, or an extra property key
    /// that shadows a typed field
    pub fn validate(&self, path: &FieldPath) -> Result<(), SchemaError> {
        if self.id.trim().is_empty() {
            return Err(SchemaError::invariant(
                path.child("id"),
                "component id must not be empty",
            ));
        }
        if !self.properties.matches(self.component_type) {
            return Err(SchemaError::invariant(
                path.child("properties"),
                format!(
                    "properties shape does not match component type '{}'",
                    self.component_type
                ),
            ));
        }
        let known = self.properties.known_keys();
        if let Some(key) = self.properties.extra().keys().find(|k| known.contains(&k.as_str())) {
            return Err(SchemaError::invariant(
                path.child("properties").child(key.as_str()),
                format!("extra property '{key}' shadows a typed field"),
            ));
        }
        Ok(())
    }
}

/// True if `map` looks like a serialized component (has an `id` string and
/// a known `type`)
pub(crate) fn is_component_record(map: &Map<String, Value>) -> bool {
    map.get("id").is_some_and(Value::is_string)
        && map
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| ComponentType::from_name(t).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::Breakpoint;
    use serde_json::json;

    fn path() -> FieldPath {
        FieldPath::root().child("c")
    }

    #[test]
    fn decode_text_component_with_defaults() {
        let value = json!({"id": "headline", "type": "text", "properties": {"content": "Hi"}});
        let component = Component::decode(&value, &path()).unwrap();

        assert_eq!(component.id, "headline");
        assert_eq!(component.component_type, ComponentType::Text);
        assert_eq!(component.content(), Some("Hi"));
        assert!(component.visible);
        assert!(component.styles.is_empty());
    }

    #[test]
    fn decode_rejects_unknown_type() {
        let value = json!({"id": "x", "type": "carousel"});
        let err = Component::decode(&value, &path()).unwrap_err();

        match err {
            SchemaError::UnknownVariant { path, value, .. } => {
                assert_eq!(path.to_string(), "c.type");
                assert_eq!(value, "carousel");
            }
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_missing_id() {
        let value = json!({"type": "text"});
        let err = Component::decode(&value, &path()).unwrap_err();
        assert_eq!(err.to_string(), "c.id: missing required field");
    }

    #[test]
    fn known_property_with_wrong_kind_fails() {
        let value = json!({"id": "email", "type": "input", "properties": {"required": "yes"}});
        let err = Component::decode(&value, &path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "c.properties.required: expected boolean, found string"
        );
    }

    #[test]
    fn unknown_property_keys_survive_serialization() {
        let value = json!({
            "id": "cta",
            "type": "button",
            "properties": {"content": "Go", "href": "/next", "tracking": {"id": 7}}
        });
        let component = Component::decode(&value, &path()).unwrap();
        assert_eq!(component.properties.extra().len(), 2);

        let out = serde_json::to_value(&component).unwrap();
        assert_eq!(out["properties"]["href"], json!("/next"));
        assert_eq!(out["properties"]["tracking"]["id"], json!(7));
        assert_eq!(out["properties"]["content"], json!("Go"));
    }

    #[test]
    fn opaque_properties_for_unshaped_types() {
        let value = json!({"id": "card", "type": "product_card", "properties": {"sku": "A1"}});
        let component = Component::decode(&value, &path()).unwrap();
        assert!(matches!(component.properties, ComponentProperties::Opaque(_)));
        assert_eq!(component.content(), None);
    }

    #[test]
    fn validate_rejects_mismatched_properties() {
        let component = Component::new("x", ComponentType::Image)
            .with_properties(ComponentProperties::Text(TextProperties::default()));
        let err = component.validate(&path()).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "c.properties");
    }

    #[test]
    fn serializes_with_wire_names() {
        let mut component = Component::new("q1", ComponentType::QuizOption);
        component
            .styles
            .get_mut(Breakpoint::Default)
            .insert("padding".into(), json!("4px"));
        let out = serde_json::to_value(&component).unwrap();

        assert_eq!(out["type"], json!("quiz_option"));
        assert_eq!(out["styles"]["default"]["padding"], json!("4px"));
        assert_eq!(out["visible"], json!(true));
        assert_eq!(out["properties"], json!({}));
    }

    #[test]
    fn component_record_detection() {
        let value = json!({"id": "a", "type": "divider"});
        assert!(is_component_record(value.as_object().unwrap()));

        let section = json!({"id": "hero", "name": "Hero", "components": []});
        assert!(!is_component_record(section.as_object().unwrap()));
    }

    #[test]
    fn validate_rejects_extra_key_shadowing_typed_field() {
        let mut properties = TextProperties {
            content: Some("real".into()),
            ..TextProperties::default()
        };
        properties.extra.insert("content".into(), json!("shadow"));
        let component = Component::new("headline", ComponentType::Text)
            .with_properties(ComponentProperties::Text(properties));

        let err = component.validate(&path()).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "c.properties.content");

        let mut clean = component.clone();
        if let ComponentProperties::Text(p) = &mut clean.properties {
            p.extra.shift_remove("content");
            p.extra.insert("href".into(), json!("/next"));
        }
        assert!(clean.validate(&path()).is_ok());
    }
}
