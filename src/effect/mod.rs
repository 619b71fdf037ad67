//! Named visual effects and their overlay stacks.
//!
//! An effect is an ordered list of [`OverlayDescriptor`]s drawn between the
//! slide's base image and its caption bubble:
//!
//! ```text
//! Base Image
//!     │
//!     ▼
//! ┌───────────────┐
//! │ Overlay 0..n  │ ◄── effect_layers(key), in list order, pointer events off
//! └──────┬────────┘
//!        │
//!        ▼
//! ┌───────────────┐
//! │ Caption bubble│
//! └───────────────┘
//! ```
//!
//! The catalog is static data. [`effect_layers`] depends on nothing but the
//! key, so the editor preview and the profile renderer always receive the
//! same stack for the same key.

pub mod raster;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use raster::apply_effect;

// ============================================================================
// EffectKey
// ============================================================================

/// The closed set of effects a slide can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum EffectKey {
    #[default]
    None,
    Warm,
    Cool,
    Sepia,
    Contrast,
    Vintage,
    Soft,
}

impl EffectKey {
    pub const ALL: [EffectKey; 7] = [
        EffectKey::None,
        EffectKey::Warm,
        EffectKey::Cool,
        EffectKey::Sepia,
        EffectKey::Contrast,
        EffectKey::Vintage,
        EffectKey::Soft,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Sepia => "sepia",
            Self::Contrast => "contrast",
            Self::Vintage => "vintage",
            Self::Soft => "soft",
        }
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown effect: {s}"))
    }
}

// ============================================================================
// Overlay Descriptors
// ============================================================================

/// Which way a linear gradient runs, from its first stop to its last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    TopToBottom,
    BottomToTop,
    LeftToRight,
    TopLeftToBottomRight,
}

/// One color stop of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    /// Position along the gradient, `0.0..=1.0`.
    pub offset: f32,
    pub color: [u8; 3],
    pub opacity: f32,
}

const fn stop(offset: f32, color: [u8; 3], opacity: f32) -> ColorStop {
    ColorStop {
        offset,
        color,
        opacity,
    }
}

/// The three kinds of overlay an effect is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Gradient,
    Tint,
    Blur,
}

/// A single overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayDescriptor {
    /// A linear gradient across the whole slide.
    #[serde(rename = "gradient")]
    LinearGradient {
        direction: GradientDirection,
        stops: &'static [ColorStop],
    },
    /// A flat scrim of one color.
    Tint { color: [u8; 3], opacity: f32 },
    /// A backdrop blur of the layers below.
    Blur { intensity: u8 },
}

impl OverlayDescriptor {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::LinearGradient { .. } => OverlayKind::Gradient,
            Self::Tint { .. } => OverlayKind::Tint,
            Self::Blur { .. } => OverlayKind::Blur,
        }
    }

    /// Overlays never receive touches; the caption above them does.
    pub fn intercepts_pointer(&self) -> bool {
        false
    }
}

// ============================================================================
// Catalog
// ============================================================================

static WARM: &[OverlayDescriptor] = &[
    OverlayDescriptor::LinearGradient {
        direction: GradientDirection::TopToBottom,
        stops: &[stop(0.0, [255, 170, 90], 0.18), stop(1.0, [255, 120, 60], 0.28)],
    },
    OverlayDescriptor::Tint {
        color: [255, 200, 150],
        opacity: 0.08,
    },
];

static COOL: &[OverlayDescriptor] = &[OverlayDescriptor::LinearGradient {
    direction: GradientDirection::TopToBottom,
    stops: &[stop(0.0, [90, 160, 255], 0.20), stop(1.0, [40, 80, 200], 0.30)],
}];

static SEPIA: &[OverlayDescriptor] = &[OverlayDescriptor::Tint {
    color: [112, 66, 20],
    opacity: 0.35,
}];

static CONTRAST: &[OverlayDescriptor] = &[
    OverlayDescriptor::LinearGradient {
        direction: GradientDirection::BottomToTop,
        stops: &[
            stop(0.0, [0, 0, 0], 0.55),
            stop(0.5, [0, 0, 0], 0.15),
            stop(1.0, [0, 0, 0], 0.0),
        ],
    },
    OverlayDescriptor::Tint {
        color: [0, 0, 0],
        opacity: 0.12,
    },
];

static VINTAGE: &[OverlayDescriptor] = &[
    OverlayDescriptor::Tint {
        color: [240, 220, 180],
        opacity: 0.22,
    },
    OverlayDescriptor::LinearGradient {
        direction: GradientDirection::TopLeftToBottomRight,
        stops: &[stop(0.0, [60, 40, 20], 0.0), stop(1.0, [60, 40, 20], 0.35)],
    },
];

static SOFT: &[OverlayDescriptor] = &[
    OverlayDescriptor::Blur { intensity: 12 },
    OverlayDescriptor::Tint {
        color: [255, 255, 255],
        opacity: 0.12,
    },
];

/// The overlay stack for an effect, bottom-most layer first.
pub fn effect_layers(key: EffectKey) -> &'static [OverlayDescriptor] {
    match key {
        EffectKey::None => &[],
        EffectKey::Warm => WARM,
        EffectKey::Cool => COOL,
        EffectKey::Sepia => SEPIA,
        EffectKey::Contrast => CONTRAST,
        EffectKey::Vintage => VINTAGE,
        EffectKey::Soft => SOFT,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_has_no_layers() {
        assert!(effect_layers(EffectKey::None).is_empty());
    }

    #[test]
    fn every_other_key_has_layers() {
        for key in EffectKey::ALL.into_iter().filter(|k| *k != EffectKey::None) {
            assert!(!effect_layers(key).is_empty(), "{key} has no layers");
        }
    }

    #[test]
    fn sepia_is_a_single_flat_tint() {
        let layers = effect_layers(EffectKey::Sepia);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].kind(), OverlayKind::Tint);
    }

    #[test]
    fn lookups_are_stable() {
        for key in EffectKey::ALL {
            let first = effect_layers(key);
            let second = effect_layers(key);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn overlays_never_take_pointer_events() {
        for key in EffectKey::ALL {
            assert!(effect_layers(key).iter().all(|l| !l.intercepts_pointer()));
        }
    }

    #[test]
    fn gradient_stops_are_ordered() {
        for key in EffectKey::ALL {
            for layer in effect_layers(key) {
                if let OverlayDescriptor::LinearGradient { stops, .. } = layer {
                    assert!(stops.windows(2).all(|w| w[0].offset <= w[1].offset));
                    assert_eq!(stops.first().map(|s| s.offset), Some(0.0));
                    assert_eq!(stops.last().map(|s| s.offset), Some(1.0));
                }
            }
        }
    }

    #[test]
    fn key_string_roundtrip() {
        for key in EffectKey::ALL {
            assert_eq!(key.as_str().parse::<EffectKey>(), Ok(key));
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{key}\""));
        }
        assert!("glitter".parse::<EffectKey>().is_err());
    }

    #[test]
    fn descriptors_serialize_with_kind_tag() {
        let json = serde_json::to_string(effect_layers(EffectKey::Soft)).unwrap();
        assert!(json.contains("\"kind\":\"blur\""));
        assert!(json.contains("\"kind\":\"tint\""));
    }

    #[test]
    fn descriptor_tag_matches_overlay_kind() {
        for key in EffectKey::ALL {
            for layer in effect_layers(key) {
                let value = serde_json::to_value(layer).unwrap();
                let kind = serde_json::to_value(layer.kind()).unwrap();
                assert_eq!(value["kind"], kind, "{key}");
            }
        }
    }
}
