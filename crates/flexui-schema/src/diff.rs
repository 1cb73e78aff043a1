//! Component-level differences between two documents
//!
//! Used to summarize what a modification actually changed and to spot
//! changes that escaped a targeted instruction.

use crate::document::FlexibleContent;
use crate::section::Section;
use std::fmt::{self, Display, Formatter};

/// Kind of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
        })
    }
}

/// One changed section or component
///
/// `component_id` is `None` for changes to the section itself (name,
/// styles, layout or component order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub section_id: String,
    pub component_id: Option<String>,
    pub kind: ChangeKind,
}

impl Display for DocumentChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.component_id {
            Some(component) => write!(f, "{} component '{}' in section '{}'", self.kind, component, self.section_id),
            None => write!(f, "{} section '{}'", self.kind, self.section_id),
        }
    }
}

/// Differences between two documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDiff {
    pub changes: Vec<DocumentChange>,
    pub layout_changed: bool,
    pub metadata_changed: bool,
}

impl DocumentDiff {
    /// True when the documents are equal
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && !self.layout_changed && !self.metadata_changed
    }

    /// `(section id, component id)` of every added, removed or modified
    /// component
    pub fn touched_components(&self) -> impl Iterator<Item = (&str, &str)> {
        self.changes.iter().filter_map(|c| {
            c.component_id
                .as_deref()
                .map(|component| (c.section_id.as_str(), component))
        })
    }

    /// True if nothing other than the given component changed
    ///
    /// Component ids repeat across sections. With `section_id` set only
    /// that section's component counts as the target; with `None` a
    /// component of that id in any section does.
    #[must_use]
    pub fn touches_only(&self, section_id: Option<&str>, component_id: &str) -> bool {
        !self.layout_changed
            && !self.metadata_changed
            && self
                .changes
                .iter()
                .all(|c| c.is_component(section_id, component_id))
    }
}

impl DocumentChange {
    /// True if this change is to the given component
    #[must_use]
    pub fn is_component(&self, section_id: Option<&str>, component_id: &str) -> bool {
        self.component_id.as_deref() == Some(component_id)
            && section_id.map_or(true, |s| s == self.section_id)
    }
}

/// Compare two documents section by section, component by component
#[must_use]
pub fn diff_documents(before: &FlexibleContent, after: &FlexibleContent) -> DocumentDiff {
    let mut changes = Vec::new();

    for (id, old) in &before.sections {
        match after.sections.get(id) {
            None => changes.push(DocumentChange {
                section_id: id.clone(),
                component_id: None,
                kind: ChangeKind::Removed,
            }),
            Some(new) => diff_section(old, new, &mut changes),
        }
    }
    for id in after.sections.keys() {
        if !before.sections.contains_key(id) {
            changes.push(DocumentChange {
                section_id: id.clone(),
                component_id: None,
                kind: ChangeKind::Added,
            });
        }
    }

    DocumentDiff {
        changes,
        layout_changed: before.layout != after.layout,
        metadata_changed: before.metadata != after.metadata,
    }
}

fn diff_section(old: &Section, new: &Section, changes: &mut Vec<DocumentChange>) {
    let order_changed = old
        .components
        .iter()
        .map(|c| &c.id)
        .ne(new.components.iter().map(|c| &c.id));
    if old.name != new.name || old.styles != new.styles || old.layout != new.layout || order_changed {
        changes.push(DocumentChange {
            section_id: old.id.clone(),
            component_id: None,
            kind: ChangeKind::Modified,
        });
    }

    let mut push = |component_id: &str, kind| {
        changes.push(DocumentChange {
            section_id: old.id.clone(),
            component_id: Some(component_id.to_string()),
            kind,
        });
    };

    for component in &old.components {
        match new.component(&component.id) {
            None => push(&component.id, ChangeKind::Removed),
            Some(updated) if updated != component => push(&component.id, ChangeKind::Modified),
            Some(_) => {}
        }
    }
    for component in &new.components {
        if old.component(&component.id).is_none() {
            push(&component.id, ChangeKind::Added);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::Breakpoint;
    use crate::component::{Component, ComponentType};
    use crate::layout::{LayoutConfig, LayoutType};
    use serde_json::json;

    fn doc() -> FlexibleContent {
        FlexibleContent::new(LayoutConfig::new(LayoutType::Stacked)).with_section(
            Section::new("hero", "Hero")
                .with_component(Component::new("headline", ComponentType::Text))
                .with_component(Component::new("cta", ComponentType::Button)),
        )
    }

    #[test]
    fn identical_documents_have_empty_diff() {
        assert!(diff_documents(&doc(), &doc()).is_empty());
    }

    #[test]
    fn single_style_change() {
        let before = doc();
        let mut after = before.clone();
        after
            .component_mut("headline")
            .unwrap()
            .styles
            .get_mut(Breakpoint::Default)
            .insert("fontSize".into(), json!("24px"));

        let diff = diff_documents(&before, &after);
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::Modified);
        assert!(diff.touches_only(Some("hero"), "headline"));
        assert!(diff.touches_only(None, "headline"));
        assert!(!diff.touches_only(Some("hero"), "cta"));
        assert!(!diff.touches_only(Some("footer"), "headline"));
        assert_eq!(
            diff.changes[0].to_string(),
            "modified component 'headline' in section 'hero'"
        );
    }

    #[test]
    fn added_and_removed_components() {
        let before = doc();
        let mut after = before.clone();
        let section = after.sections.get_mut("hero").unwrap();
        section.components.retain(|c| c.id != "cta");
        section.components.push(Component::new("divider", ComponentType::Divider));

        let diff = diff_documents(&before, &after);
        let touched: Vec<_> = diff.touched_components().collect();
        assert!(touched.contains(&("hero", "cta")));
        assert!(touched.contains(&("hero", "divider")));
        // component order changed too
        assert!(diff.changes.iter().any(|c| c.component_id.is_none()));
    }

    #[test]
    fn same_id_in_another_section_is_not_the_target() {
        let before = doc().with_section(
            Section::new("footer", "Footer")
                .with_component(Component::new("headline", ComponentType::Text)),
        );
        let mut after = before.clone();
        after.sections.get_mut("footer").unwrap().components[0]
            .styles
            .get_mut(Breakpoint::Default)
            .insert("color".into(), json!("red"));

        let diff = diff_documents(&before, &after);
        assert!(!diff.touches_only(Some("hero"), "headline"));
        assert!(diff.touches_only(Some("footer"), "headline"));
        assert_eq!(
            diff.touched_components().collect::<Vec<_>>(),
            vec![("footer", "headline")]
        );
    }

    #[test]
    fn section_changes() {
        let before = doc();
        let after = before.clone().with_section(Section::new("footer", "Footer"));
        let diff = diff_documents(&before, &after);
        assert_eq!(
            diff.changes,
            vec![DocumentChange {
                section_id: "footer".into(),
                component_id: None,
                kind: ChangeKind::Added,
            }]
        );
        assert!(diff_documents(&after, &before).changes[0].kind == ChangeKind::Removed);
    }
}
