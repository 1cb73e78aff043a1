//! Sections: named, ordered groups of components

use crate::breakpoint::{decode_styles, ResponsiveStyles};
use crate::component::Component;
use crate::decode::{as_array, as_object, optional_enum, required, required_str, SchemaEnum};
use crate::error::{FieldPath, SchemaError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// How a section arranges its components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLayout {
    #[default]
    Vertical,
    Horizontal,
    Grid,
}

impl SchemaEnum for SectionLayout {
    const KIND: &'static str = "section layout";
    const ALL: &'static [Self] = &[
        SectionLayout::Vertical,
        SectionLayout::Horizontal,
        SectionLayout::Grid,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SectionLayout::Vertical => "vertical",
            SectionLayout::Horizontal => "horizontal",
            SectionLayout::Grid => "grid",
        }
    }
}

/// A section containing components in rendering order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub components: Vec<Component>,
    pub styles: ResponsiveStyles,
    pub layout: SectionLayout,
}

impl Section {
    /// Create an empty vertical section
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            components: Vec::new(),
            styles: ResponsiveStyles::default(),
            layout: SectionLayout::default(),
        }
    }

    /// Append a component
    #[inline]
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// With layout
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: SectionLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Component by id
    #[must_use]
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Mutable component by id
    pub fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Position of a component in rendering order
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }

    pub(crate) fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        let id = required_str(map, "id", path)?;
        let name = required_str(map, "name", path)?;

        let components_path = path.child("components");
        let components = as_array(required(map, "components", path)?, &components_path)?
            .iter()
            .enumerate()
            .map(|(i, c)| Component::decode(c, &components_path.index(i)))
            .collect::<Result<Vec<_>, _>>()?;

        let styles = match map.get("styles") {
            None => ResponsiveStyles::default(),
            Some(value) => decode_styles(value, &path.child("styles"))?,
        };
        let layout = optional_enum(map, "layout", path, SectionLayout::default())?;

        Ok(Self {
            id,
            name,
            components,
            styles,
            layout,
        })
    }

    /// Check section-local invariants
    ///
    /// # Errors
    /// Returns [`SchemaError::Invariant`] for an empty id, a duplicate
    /// component id, or an invalid component
    pub fn validate(&self, path: &FieldPath) -> Result<(), SchemaError> {
        if self.id.trim().is_empty() {
            return Err(SchemaError::invariant(
                path.child("id"),
                "section id must not be empty",
            ));
        }

        let mut seen = HashSet::with_capacity(self.components.len());
        let components_path = path.child("components");
        for (i, component) in self.components.iter().enumerate() {
            let component_path = components_path.index(i);
            component.validate(&component_path)?;
            if !seen.insert(component.id.as_str()) {
                return Err(SchemaError::invariant(
                    component_path.child("id"),
                    format!(
                        "duplicate component id '{}' in section '{}'",
                        component.id, self.id
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use serde_json::json;

    #[test]
    fn decode_defaults_layout_to_vertical() {
        let value = json!({"id": "hero", "name": "Hero", "components": []});
        let section = Section::decode(&value, &FieldPath::root()).unwrap();
        assert_eq!(section.layout, SectionLayout::Vertical);
        assert!(section.components.is_empty());
    }

    #[test]
    fn decode_reports_component_index() {
        let value = json!({
            "id": "hero",
            "name": "Hero",
            "components": [{"id": "a", "type": "text"}, {"id": "b", "type": "video"}]
        });
        let path = FieldPath::root().child("sections").child("hero");
        let err = Section::decode(&value, &path).unwrap_err();
        assert_eq!(
            err.path().unwrap().to_string(),
            "sections.hero.components.1.type"
        );
    }

    #[test]
    fn decode_rejects_unknown_layout() {
        let value = json!({"id": "s", "name": "S", "components": [], "layout": "masonry"});
        let err = Section::decode(&value, &FieldPath::root()).unwrap_err();
        assert!(err.to_string().contains("unknown section layout 'masonry'"));
    }

    #[test]
    fn validate_rejects_duplicate_component_ids() {
        let section = Section::new("hero", "Hero")
            .with_component(Component::new("a", ComponentType::Text))
            .with_component(Component::new("a", ComponentType::Button));

        let err = section.validate(&FieldPath::root()).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "components.1.id");
    }

    #[test]
    fn lookup_by_id() {
        let section = Section::new("hero", "Hero")
            .with_component(Component::new("a", ComponentType::Text))
            .with_component(Component::new("b", ComponentType::Divider));

        assert_eq!(section.position_of("b"), Some(1));
        assert!(section.component("missing").is_none());
    }
}
