//! flexui Schema - typed FlexibleContent documents
//!
//! A FlexibleContent document describes a responsive UI:
//! - a layout (split or stacked) with slot assignments
//! - named sections, each an ordered list of components
//! - per-breakpoint style maps on every section and component
//! - opaque metadata that is carried through untouched
//!
//! Parsing is strict: [`FlexibleContent::from_json_str`] either returns a
//! document that satisfies every structural invariant or a [`SchemaError`]
//! naming the offending field path. Serialization is its exact inverse.
//!
//! # Example
//!
//! ```rust
//! use flexui_schema::{Breakpoint, FlexibleContent};
//!
//! # fn example() -> Result<(), flexui_schema::SchemaError> {
//! let text = r#"{
//!     "layout": {"type": "stacked", "slot_mapping": {}, "custom_properties": {}},
//!     "sections": {
//!         "hero": {"id": "hero", "name": "Hero", "components": [
//!             {"id": "headline", "type": "text", "properties": {"content": "Hello"}}
//!         ]}
//!     }
//! }"#;
//! let doc = FlexibleContent::from_json_str(text)?;
//! assert_eq!(doc.component_path("headline").as_deref(), Some("sections.hero.components.0"));
//! assert!(doc.resolved_component_styles("headline", Breakpoint::MaxSm).is_some());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod decode;

pub mod breakpoint;
pub mod component;
pub mod diff;
pub mod document;
pub mod error;
pub mod form;
pub mod hash;
pub mod layout;
pub mod path;
pub mod section;

// Re-exports for convenience
pub use breakpoint::{Breakpoint, BreakpointMap, ResponsiveStyles, StyleDeclarations};
pub use component::{
    ButtonProperties, Component, ComponentProperties, ComponentType, ImageProperties,
    InputProperties, QuizOptionProperties, TextProperties,
};
pub use decode::{OpenMap, SchemaEnum};
pub use diff::{diff_documents, ChangeKind, DocumentChange, DocumentDiff};
pub use document::{ComponentLocation, FlexibleContent};
pub use error::{FieldPath, SchemaError};
pub use form::{validate_form_data, FormValidation};
pub use hash::DocumentHash;
pub use layout::{
    GradientConfig, GradientStop, LayoutConfig, LayoutConfigError, LayoutType,
    PopupCloseButtonConfig, PopupConfig, PopupOverlayConfig, SplitLayoutConfig, SplitRatio,
    ViewportConfig,
};
pub use path::{
    fallback_component_label, resolve_component, resolve_component_id, resolve_in_value,
    ComponentAddress,
};
pub use section::{Section, SectionLayout};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with FlexibleContent documents
    pub use crate::{
        resolve_component_id, Breakpoint, Component, ComponentType, DocumentHash,
        FlexibleContent, LayoutConfig, LayoutType, SchemaError, Section,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
