//! Document-level layout configuration
//!
//! `custom_properties` is stored as an open map and interpreted according to
//! the layout type. For split layouts it decodes into [`SplitLayoutConfig`];
//! decoding fails closed on any present field of the wrong shape. An empty
//! map is the one case that yields the defaults.

use crate::breakpoint::{decode_breakpoint_map, Breakpoint, BreakpointMap};
use crate::decode::{
    as_array, as_object, decode_enum, mismatch, optional_enum, optional_f64, optional_open_map,
    optional_str, optional_u64, required, required_str, OpenMap, SchemaEnum,
};
use crate::error::{FieldPath, SchemaError};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// How sections are arranged in the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Split,
    Stacked,
}

impl SchemaEnum for LayoutType {
    const KIND: &'static str = "layout type";
    const ALL: &'static [Self] = &[LayoutType::Split, LayoutType::Stacked];

    fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Split => "split",
            LayoutType::Stacked => "stacked",
        }
    }
}

impl Display for LayoutType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors when reading typed custom properties
#[derive(Debug, thiserror::Error)]
pub enum LayoutConfigError {
    /// Typed view requested for the wrong layout type
    #[error("layout type is '{0}', not split")]
    NotSplit(LayoutType),

    /// Custom properties do not match the typed shape
    #[error(transparent)]
    Decode(#[from] SchemaError),
}

/// Defines how sections are arranged
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LayoutConfig {
    #[serde(rename = "type")]
    pub layout_type: LayoutType,
    /// Section id → slot name
    pub slot_mapping: IndexMap<String, String>,
    /// Interpreted according to `layout_type`
    pub custom_properties: OpenMap,
}

impl LayoutConfig {
    /// Create layout with no slots and no custom properties
    #[inline]
    #[must_use]
    pub fn new(layout_type: LayoutType) -> Self {
        Self {
            layout_type,
            ..Self::default()
        }
    }

    /// Map a section into a slot
    #[inline]
    #[must_use]
    pub fn with_slot(mut self, section_id: impl Into<String>, slot: impl Into<String>) -> Self {
        self.slot_mapping.insert(section_id.into(), slot.into());
        self
    }

    /// Section id assigned to a slot (first match in mapping order)
    #[must_use]
    pub fn section_for_slot(&self, slot: &str) -> Option<&str> {
        self.slot_mapping
            .iter()
            .find(|(_, s)| s.as_str() == slot)
            .map(|(section, _)| section.as_str())
    }

    /// Typed split-layout configuration
    ///
    /// # Errors
    /// - [`LayoutConfigError::NotSplit`] for stacked layouts
    /// - [`LayoutConfigError::Decode`] if a present field has the wrong shape
    pub fn split_config(&self) -> Result<SplitLayoutConfig, LayoutConfigError> {
        if self.layout_type != LayoutType::Split {
            return Err(LayoutConfigError::NotSplit(self.layout_type));
        }
        if self.custom_properties.is_empty() {
            return Ok(SplitLayoutConfig::default());
        }
        let map: Map<String, Value> = self
            .custom_properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let path = FieldPath::root().child("layout").child("custom_properties");
        Ok(SplitLayoutConfig::decode_map(&map, &path)?)
    }

    /// Replace custom properties with a typed split configuration
    ///
    /// # Errors
    /// Returns [`SchemaError::Encode`] if the configuration cannot be encoded
    pub fn set_split_config(&mut self, config: &SplitLayoutConfig) -> Result<(), SchemaError> {
        let value = serde_json::to_value(config).map_err(SchemaError::Encode)?;
        self.custom_properties = crate::decode::open_map(&value, &FieldPath::root())?;
        Ok(())
    }

    pub(crate) fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        let layout_type = optional_enum(map, "type", path, LayoutType::default())?;

        let slot_path = path.child("slot_mapping");
        let slot_mapping = match map.get("slot_mapping") {
            None => IndexMap::new(),
            Some(value) => as_object(value, &slot_path)?
                .iter()
                .map(|(section, slot)| {
                    slot.as_str()
                        .map(|s| (section.clone(), s.to_string()))
                        .ok_or_else(|| mismatch(&slot_path.child(section.as_str()), "string", slot))
                })
                .collect::<Result<IndexMap<_, _>, _>>()?,
        };

        let custom_properties = optional_open_map(map, "custom_properties", path)?;

        Ok(Self {
            layout_type,
            slot_mapping,
            custom_properties,
        })
    }

    /// Check that custom properties fit the layout type
    ///
    /// Slot references are checked by the owning document, which knows the
    /// section ids.
    pub(crate) fn validate_custom_properties(&self) -> Result<(), SchemaError> {
        match self.split_config() {
            Ok(_) | Err(LayoutConfigError::NotSplit(_)) => Ok(()),
            Err(LayoutConfigError::Decode(err)) => Err(err),
        }
    }
}

/// Split ratio, either uniform or with per-breakpoint overrides
#[derive(Debug, Clone, PartialEq)]
pub enum SplitRatio {
    /// `"left/right"`, e.g. `"50/50"`
    Uniform(String),
    /// `default` plus optional per-breakpoint overrides
    Responsive {
        default: String,
        overrides: IndexMap<Breakpoint, String>,
    },
}

impl SplitRatio {
    /// Ratio in effect at a breakpoint
    #[must_use]
    pub fn ratio_for(&self, breakpoint: Breakpoint) -> &str {
        match self {
            Self::Uniform(ratio) => ratio,
            Self::Responsive { default, overrides } => overrides
                .get(&breakpoint)
                .map_or(default.as_str(), String::as_str),
        }
    }

    /// Flex weights for the left and right slots at a breakpoint
    ///
    /// A zero weight collapses that slot (`"100/0"`). Falls back to
    /// `(50.0, 50.0)` unless the ratio is two finite, non-negative numbers
    /// separated by `/` that are not both zero.
    #[must_use]
    pub fn flex_weights(&self, breakpoint: Breakpoint) -> (f64, f64) {
        parse_ratio(self.ratio_for(breakpoint)).unwrap_or((50.0, 50.0))
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        match value {
            Value::String(ratio) => Ok(Self::Uniform(ratio.clone())),
            Value::Object(map) => {
                let default = required_str(map, "default", path)?;
                let mut overrides = IndexMap::new();
                for (key, ratio) in map {
                    if key == "default" {
                        continue;
                    }
                    let key_path = path.child(key.as_str());
                    let breakpoint: Breakpoint = decode_enum(&Value::String(key.clone()), &key_path)?;
                    let ratio = ratio
                        .as_str()
                        .ok_or_else(|| mismatch(&key_path, "string", ratio))?;
                    overrides.insert(breakpoint, ratio.to_string());
                }
                Ok(Self::Responsive { default, overrides })
            }
            other => Err(mismatch(path, "string or object", other)),
        }
    }
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self::Uniform("50/50".to_string())
    }
}

impl Serialize for SplitRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Uniform(ratio) => serializer.serialize_str(ratio),
            Self::Responsive { default, overrides } => {
                let mut map = serializer.serialize_map(Some(overrides.len() + 1))?;
                map.serialize_entry("default", default)?;
                for (breakpoint, ratio) in overrides {
                    map.serialize_entry(breakpoint.name(), ratio)?;
                }
                map.end()
            }
        }
    }
}

fn parse_ratio(ratio: &str) -> Option<(f64, f64)> {
    let (left, right) = ratio.split_once('/')?;
    let left: f64 = left.trim().parse().ok()?;
    let right: f64 = right.trim().parse().ok()?;
    let usable = |w: f64| w.is_finite() && w >= 0.0;
    (usable(left) && usable(right) && left + right > 0.0).then_some((left, right))
}

/// Configuration specific to split layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitLayoutConfig {
    pub split_ratio: SplitRatio,
    /// `right_first` or `left_first`
    pub mobile_stack_direction: String,
    pub popup_config: PopupConfig,
}

impl Default for SplitLayoutConfig {
    fn default() -> Self {
        Self {
            split_ratio: SplitRatio::default(),
            mobile_stack_direction: "right_first".to_string(),
            popup_config: PopupConfig::default(),
        }
    }
}

impl SplitLayoutConfig {
    fn decode_map(map: &Map<String, Value>, path: &FieldPath) -> Result<Self, SchemaError> {
        let defaults = Self::default();
        Ok(Self {
            split_ratio: match map.get("split_ratio") {
                None => defaults.split_ratio,
                Some(value) => SplitRatio::decode(value, &path.child("split_ratio"))?,
            },
            mobile_stack_direction: optional_str(map, "mobile_stack_direction", path)?
                .unwrap_or(defaults.mobile_stack_direction),
            popup_config: match map.get("popup_config") {
                None => defaults.popup_config,
                Some(value) => PopupConfig::decode(value, &path.child("popup_config"))?,
            },
        })
    }
}

/// Popup size at one breakpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportConfig {
    pub width: String,
    pub height: String,
}

impl ViewportConfig {
    /// Create viewport size
    #[inline]
    #[must_use]
    pub fn new(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }

    fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        let defaults = Self::default();
        Ok(Self {
            width: optional_str(map, "width", path)?.unwrap_or(defaults.width),
            height: optional_str(map, "height", path)?.unwrap_or(defaults.height),
        })
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::new("80%", "70dvh")
    }
}

/// Popup overlay appearance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupOverlayConfig {
    pub background_color: String,
    pub backdrop_filter: String,
    pub box_shadow: String,
    pub border_radius: String,
}

impl Default for PopupOverlayConfig {
    fn default() -> Self {
        Self {
            background_color: "rgba(0,0,0,0.6)".to_string(),
            backdrop_filter: "blur(3px)".to_string(),
            box_shadow: "0 0 10px 0 rgba(0,0,0,0.3)".to_string(),
            border_radius: "8px".to_string(),
        }
    }
}

impl PopupOverlayConfig {
    fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        let d = Self::default();
        Ok(Self {
            background_color: optional_str(map, "background_color", path)?
                .unwrap_or(d.background_color),
            backdrop_filter: optional_str(map, "backdrop_filter", path)?
                .unwrap_or(d.backdrop_filter),
            box_shadow: optional_str(map, "box_shadow", path)?.unwrap_or(d.box_shadow),
            border_radius: optional_str(map, "border_radius", path)?.unwrap_or(d.border_radius),
        })
    }
}

/// Popup close button appearance and reveal delay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupCloseButtonConfig {
    pub position: String,
    pub color: String,
    pub size: String,
    /// Milliseconds before the button appears
    pub delay: u64,
    pub opacity: f64,
}

impl Default for PopupCloseButtonConfig {
    fn default() -> Self {
        Self {
            position: "right".to_string(),
            color: "#333333".to_string(),
            size: "24px".to_string(),
            delay: 1000,
            opacity: 0.5,
        }
    }
}

impl PopupCloseButtonConfig {
    fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        let d = Self::default();
        Ok(Self {
            position: optional_str(map, "position", path)?.unwrap_or(d.position),
            color: optional_str(map, "color", path)?.unwrap_or(d.color),
            size: optional_str(map, "size", path)?.unwrap_or(d.size),
            delay: optional_u64(map, "delay", path)?.unwrap_or(d.delay),
            opacity: optional_f64(map, "opacity", path)?.unwrap_or(d.opacity),
        })
    }
}

/// Gradient color stop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    /// Percentage, 0-100
    pub position: u64,
    pub color: String,
}

/// Gradient background
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientConfig {
    /// `linear` or `radial`
    #[serde(rename = "type")]
    pub gradient_type: String,
    pub direction: String,
    pub stops: Vec<GradientStop>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            gradient_type: "linear".to_string(),
            direction: "to bottom".to_string(),
            stops: Vec::new(),
        }
    }
}

impl GradientConfig {
    fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        let d = Self::default();
        let stops = match map.get("stops") {
            None => d.stops,
            Some(value) => {
                let stops_path = path.child("stops");
                as_array(value, &stops_path)?
                    .iter()
                    .enumerate()
                    .map(|(i, stop)| {
                        let stop_path = stops_path.index(i);
                        let stop_map = as_object(stop, &stop_path)?;
                        let position = required(stop_map, "position", &stop_path)?;
                        let position = position
                            .as_u64()
                            .filter(|p| *p <= 100)
                            .ok_or_else(|| {
                                mismatch(&stop_path.child("position"), "integer 0-100", position)
                            })?;
                        Ok(GradientStop {
                            position,
                            color: required_str(stop_map, "color", &stop_path)?,
                        })
                    })
                    .collect::<Result<Vec<_>, SchemaError>>()?
            }
        };
        Ok(Self {
            gradient_type: optional_str(map, "type", path)?.unwrap_or(d.gradient_type),
            direction: optional_str(map, "direction", path)?.unwrap_or(d.direction),
            stops,
        })
    }
}

/// Popup container configuration with responsive sizes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupConfig {
    pub responsive: BreakpointMap<ViewportConfig>,
    pub overlay: PopupOverlayConfig,
    pub close_button: PopupCloseButtonConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<GradientConfig>,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            responsive: BreakpointMap::from_fn(|bp| match bp {
                Breakpoint::Default | Breakpoint::MaxSm => ViewportConfig::new("88%", "70dvh"),
                Breakpoint::MaxMd => ViewportConfig::new("55%", "40dvh"),
                Breakpoint::MaxLg => ViewportConfig::new("65%", "50dvh"),
                Breakpoint::MaxXl => ViewportConfig::new("60%", "50dvh"),
                Breakpoint::Max2xl => ViewportConfig::new("45%", "50dvh"),
            }),
            overlay: PopupOverlayConfig::default(),
            close_button: PopupCloseButtonConfig::default(),
            gradient: None,
        }
    }
}

impl PopupConfig {
    fn decode(value: &Value, path: &FieldPath) -> Result<Self, SchemaError> {
        let map = as_object(value, path)?;
        let d = Self::default();
        Ok(Self {
            responsive: match map.get("responsive") {
                None => d.responsive,
                Some(value) => decode_breakpoint_map(
                    value,
                    &path.child("responsive"),
                    ViewportConfig::decode,
                )?,
            },
            overlay: match map.get("overlay") {
                None => d.overlay,
                Some(value) => PopupOverlayConfig::decode(value, &path.child("overlay"))?,
            },
            close_button: match map.get("close_button") {
                None => d.close_button,
                Some(value) => PopupCloseButtonConfig::decode(value, &path.child("close_button"))?,
            },
            gradient: match map.get("gradient") {
                None | Some(Value::Null) => None,
                Some(value) => Some(GradientConfig::decode(value, &path.child("gradient"))?),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn split_with(custom: Value) -> LayoutConfig {
        LayoutConfig::decode(
            &json!({"type": "split", "custom_properties": custom}),
            &FieldPath::root().child("layout"),
        )
        .unwrap()
    }

    #[test]
    fn empty_custom_properties_yield_defaults() {
        let layout = split_with(json!({}));
        let config = layout.split_config().unwrap();
        assert_eq!(config, SplitLayoutConfig::default());
        assert_eq!(config.popup_config.responsive.get(Breakpoint::MaxMd).width, "55%");
    }

    #[test]
    fn stacked_layout_has_no_split_config() {
        let layout = LayoutConfig::new(LayoutType::Stacked);
        assert!(matches!(
            layout.split_config(),
            Err(LayoutConfigError::NotSplit(LayoutType::Stacked))
        ));
    }

    #[test]
    fn wrong_shape_fails_closed() {
        let layout = split_with(json!({"popup_config": {"close_button": {"delay": "soon"}}}));
        let err = layout.split_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "layout.custom_properties.popup_config.close_button.delay: expected non-negative integer, found string"
        );
    }

    #[test]
    fn partial_popup_responsive_map_is_rejected() {
        let layout = split_with(json!({
            "popup_config": {"responsive": {"default": {"width": "90%", "height": "60dvh"}}}
        }));
        assert!(matches!(
            layout.split_config(),
            Err(LayoutConfigError::Decode(SchemaError::MissingBreakpoint { .. }))
        ));
    }

    #[test]
    fn responsive_split_ratio() {
        let layout = split_with(json!({"split_ratio": {"default": "40/60", "max-sm": "100/0"}}));
        let config = layout.split_config().unwrap();

        assert_eq!(config.split_ratio.ratio_for(Breakpoint::MaxSm), "100/0");
        assert_eq!(config.split_ratio.ratio_for(Breakpoint::MaxLg), "40/60");
        assert_eq!(config.split_ratio.flex_weights(Breakpoint::MaxLg), (40.0, 60.0));
        assert_eq!(config.split_ratio.flex_weights(Breakpoint::MaxSm), (100.0, 0.0));
    }

    #[test]
    fn ratio_parsing_edges() {
        assert_eq!(parse_ratio("0/100"), Some((0.0, 100.0)));
        assert_eq!(parse_ratio(" 30 / 70 "), Some((30.0, 70.0)));
        for bad in ["0/0", "-10/110", "inf/1", "NaN/1", "60", "a/b", ""] {
            assert_eq!(parse_ratio(bad), None, "ratio {bad:?}");
        }
    }

    #[test]
    fn split_config_roundtrips_through_custom_properties() {
        let mut config = SplitLayoutConfig {
            mobile_stack_direction: "left_first".to_string(),
            ..SplitLayoutConfig::default()
        };
        config.popup_config.gradient = Some(GradientConfig {
            stops: vec![GradientStop {
                position: 0,
                color: "#fff".to_string(),
            }],
            ..GradientConfig::default()
        });

        let mut layout = LayoutConfig::new(LayoutType::Split);
        layout.set_split_config(&config).unwrap();
        assert_eq!(layout.split_config().unwrap(), config);
    }

    #[test]
    fn slot_lookup() {
        let layout = LayoutConfig::new(LayoutType::Split)
            .with_slot("image", "left")
            .with_slot("form", "right");
        assert_eq!(layout.section_for_slot("right"), Some("form"));
        assert_eq!(layout.section_for_slot("top"), None);
    }

    #[test]
    fn slot_values_must_be_strings() {
        let err = LayoutConfig::decode(
            &json!({"type": "split", "slot_mapping": {"hero": 1}}),
            &FieldPath::root().child("layout"),
        )
        .unwrap_err();
        assert_eq!(err.path().unwrap().to_string(), "layout.slot_mapping.hero");
    }
}
