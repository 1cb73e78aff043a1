//! Responsive breakpoints and breakpoint-keyed maps
//!
//! Every styled entity carries a [`BreakpointMap`] holding one entry per
//! [`Breakpoint`]. The map is total by construction: there is no way to
//! represent a missing breakpoint, so decoding rejects documents that omit
//! one.

use crate::decode::{as_object, OpenMap, SchemaEnum};
use crate::error::{FieldPath, SchemaError};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Responsive viewport tier, ordered by decreasing viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    /// Base styles, applied at every width
    Default = 0,
    /// `width < 40rem`
    MaxSm = 1,
    /// `width < 48rem`
    MaxMd = 2,
    /// `width < 64rem`
    MaxLg = 3,
    /// `width < 80rem`
    MaxXl = 4,
    /// `width < 96rem`
    Max2xl = 5,
}

impl Breakpoint {
    /// All breakpoints, widest first
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Default,
        Breakpoint::MaxSm,
        Breakpoint::MaxMd,
        Breakpoint::MaxLg,
        Breakpoint::MaxXl,
        Breakpoint::Max2xl,
    ];

    /// Wire name (`default`, `max-sm`, ...)
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Breakpoint::Default => "default",
            Breakpoint::MaxSm => "max-sm",
            Breakpoint::MaxMd => "max-md",
            Breakpoint::MaxLg => "max-lg",
            Breakpoint::MaxXl => "max-xl",
            Breakpoint::Max2xl => "max-2xl",
        }
    }

    /// Inclusive upper viewport width in CSS pixels
    ///
    /// `None` for [`Breakpoint::Default`], which has no upper bound.
    #[inline]
    #[must_use]
    pub const fn max_width_px(self) -> Option<u32> {
        match self {
            Breakpoint::Default => None,
            Breakpoint::MaxSm => Some(639),
            Breakpoint::MaxMd => Some(767),
            Breakpoint::MaxLg => Some(1023),
            Breakpoint::MaxXl => Some(1279),
            Breakpoint::Max2xl => Some(1535),
        }
    }

    /// Most specific breakpoint matching a viewport width
    ///
    /// # Examples
    /// ```
    /// # use flexui_schema::Breakpoint;
    /// assert_eq!(Breakpoint::for_viewport_width(375), Breakpoint::MaxSm);
    /// assert_eq!(Breakpoint::for_viewport_width(1000), Breakpoint::MaxLg);
    /// assert_eq!(Breakpoint::for_viewport_width(1920), Breakpoint::Default);
    /// ```
    #[must_use]
    pub fn for_viewport_width(width_px: u32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .skip(1)
            .find(|bp| bp.max_width_px().is_some_and(|max| width_px <= max))
            .unwrap_or(Breakpoint::Default)
    }

    #[inline]
    const fn position(self) -> usize {
        self as usize
    }
}

impl SchemaEnum for Breakpoint {
    const KIND: &'static str = "breakpoint";
    const ALL: &'static [Self] = &Breakpoint::ALL;

    fn as_str(&self) -> &'static str {
        self.name()
    }
}

impl Display for Breakpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Breakpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// CSS-like declarations for one breakpoint
///
/// Keys are free-form property names; values are arbitrary JSON.
pub type StyleDeclarations = OpenMap;

/// Per-breakpoint style declarations
pub type ResponsiveStyles = BreakpointMap<StyleDeclarations>;

/// Total map from [`Breakpoint`] to `T`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BreakpointMap<T> {
    values: [T; 6],
}

impl<T> BreakpointMap<T> {
    /// Build a map by computing each entry
    #[inline]
    pub fn from_fn(f: impl FnMut(Breakpoint) -> T) -> Self {
        Self {
            values: Breakpoint::ALL.map(f),
        }
    }

    /// Build a map by computing each entry, stopping at the first error
    ///
    /// # Errors
    /// Returns the first error produced by `f`
    pub fn try_from_fn<E>(mut f: impl FnMut(Breakpoint) -> Result<T, E>) -> Result<Self, E> {
        let [a, b, c, d, e, g] = Breakpoint::ALL;
        Ok(Self {
            values: [f(a)?, f(b)?, f(c)?, f(d)?, f(e)?, f(g)?],
        })
    }

    /// Entry for a breakpoint
    #[inline]
    #[must_use]
    pub fn get(&self, breakpoint: Breakpoint) -> &T {
        &self.values[breakpoint.position()]
    }

    /// Mutable entry for a breakpoint
    #[inline]
    pub fn get_mut(&mut self, breakpoint: Breakpoint) -> &mut T {
        &mut self.values[breakpoint.position()]
    }

    /// Replace an entry, returning the previous value
    #[inline]
    pub fn set(&mut self, breakpoint: Breakpoint, value: T) -> T {
        std::mem::replace(&mut self.values[breakpoint.position()], value)
    }

    /// Entries in breakpoint order
    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &T)> {
        Breakpoint::ALL.into_iter().zip(self.values.iter())
    }

    /// Transform every entry
    #[must_use]
    pub fn map<U>(&self, mut f: impl FnMut(Breakpoint, &T) -> U) -> BreakpointMap<U> {
        BreakpointMap::from_fn(|bp| f(bp, self.get(bp)))
    }
}

impl BreakpointMap<StyleDeclarations> {
    /// Effective declarations at a breakpoint
    ///
    /// Starts from the `default` declarations and overlays the requested
    /// breakpoint's declarations on top.
    #[must_use]
    pub fn resolve(&self, breakpoint: Breakpoint) -> StyleDeclarations {
        let mut resolved = self.get(Breakpoint::Default).clone();
        if breakpoint != Breakpoint::Default {
            for (key, value) in self.get(breakpoint) {
                resolved.insert(key.clone(), value.clone());
            }
        }
        resolved
    }

    /// True when no breakpoint carries any declaration
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(StyleDeclarations::is_empty)
    }
}

impl<T: Serialize> Serialize for BreakpointMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (breakpoint, value) in self.iter() {
            map.serialize_entry(breakpoint.name(), value)?;
        }
        map.end()
    }
}

/// Decode a breakpoint-keyed object, requiring all six keys
pub(crate) fn decode_breakpoint_map<T>(
    value: &Value,
    path: &FieldPath,
    mut decode_entry: impl FnMut(&Value, &FieldPath) -> Result<T, SchemaError>,
) -> Result<BreakpointMap<T>, SchemaError> {
    let map = as_object(value, path)?;

    if let Some(unknown) = map.keys().find(|k| Breakpoint::from_name(k).is_none()) {
        return Err(SchemaError::UnknownVariant {
            path: path.child(unknown.as_str()),
            kind: Breakpoint::KIND,
            value: unknown.clone(),
            allowed: Breakpoint::allowed(),
        });
    }

    BreakpointMap::try_from_fn(|bp| {
        let entry = map.get(bp.name()).ok_or_else(|| SchemaError::MissingBreakpoint {
            path: path.clone(),
            breakpoint: bp,
        })?;
        decode_entry(entry, &path.child(bp.name()))
    })
}

/// Decode a `styles` object
pub(crate) fn decode_styles(value: &Value, path: &FieldPath) -> Result<ResponsiveStyles, SchemaError> {
    decode_breakpoint_map(value, path, crate::decode::open_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn breakpoints_are_ordered_widest_first() {
        let widths: Vec<_> = Breakpoint::ALL
            .iter()
            .filter_map(|bp| bp.max_width_px())
            .collect();
        assert_eq!(widths, vec![639, 767, 1023, 1279, 1535]);
    }

    #[test]
    fn viewport_width_picks_narrowest_match() {
        assert_eq!(Breakpoint::for_viewport_width(639), Breakpoint::MaxSm);
        assert_eq!(Breakpoint::for_viewport_width(640), Breakpoint::MaxMd);
        assert_eq!(Breakpoint::for_viewport_width(1535), Breakpoint::Max2xl);
        assert_eq!(Breakpoint::for_viewport_width(1536), Breakpoint::Default);
    }

    #[test]
    fn from_name_roundtrip() {
        for bp in Breakpoint::ALL {
            assert_eq!(Breakpoint::from_name(bp.name()), Some(bp));
        }
        assert_eq!(Breakpoint::from_name("max-3xl"), None);
    }

    #[test]
    fn resolve_overlays_breakpoint_on_default() {
        let mut styles = ResponsiveStyles::default();
        styles
            .get_mut(Breakpoint::Default)
            .insert("fontSize".into(), json!("16px"));
        styles
            .get_mut(Breakpoint::Default)
            .insert("color".into(), json!("#000"));
        styles
            .get_mut(Breakpoint::MaxSm)
            .insert("fontSize".into(), json!("12px"));

        let small = styles.resolve(Breakpoint::MaxSm);
        assert_eq!(small["fontSize"], json!("12px"));
        assert_eq!(small["color"], json!("#000"));

        let large = styles.resolve(Breakpoint::MaxXl);
        assert_eq!(large["fontSize"], json!("16px"));
    }

    #[test]
    fn serializes_all_six_keys_in_order() {
        let styles = ResponsiveStyles::default();
        let value = serde_json::to_value(&styles).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["default", "max-sm", "max-md", "max-lg", "max-xl", "max-2xl"]
        );
    }

    #[test]
    fn decode_rejects_missing_breakpoint() {
        let value = json!({"default": {}, "max-sm": {}, "max-md": {}, "max-lg": {}, "max-xl": {}});
        let err = decode_styles(&value, &FieldPath::root().child("styles")).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingBreakpoint {
                breakpoint: Breakpoint::Max2xl,
                ..
            }
        ));
    }

    #[test]
    fn decode_rejects_unknown_breakpoint() {
        let value = json!({
            "default": {}, "max-sm": {}, "max-md": {}, "max-lg": {}, "max-xl": {}, "max-2xl": {},
            "tablet": {}
        });
        let err = decode_styles(&value, &FieldPath::root().child("styles")).unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "styles.tablet");
    }
}
