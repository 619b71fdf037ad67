//! Serializable configuration for hosts.
//!
//! The editor and the profile view frame the same slide with different
//! chrome, so each carries its own [`ChromeLayout`].
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "editorChrome": { "headerHeight": 56, "avatarDiameter": 0, "footerHeight": 72, "sidePadding": 12 },
//!   "viewerChrome": { "headerHeight": 44, "avatarDiameter": 64, "footerHeight": 24, "sidePadding": 16 },
//!   "captionFontSize": 18,
//!   "export": { "platform": "ios", "jpegQuality": 90 },
//!   "forceCaptionPosition": null
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoverError, CoverResult};
use crate::geometry::{NormalizedPosition, SafeInsets};

// ============================================================================
// ChromeLayout
// ============================================================================

/// Fixed UI that sits on top of a slide in one host view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeLayout {
    /// Height of the header bar along the top edge.
    pub header_height: f32,
    /// Diameter of an avatar stacked directly below the header, or 0.
    #[serde(default)]
    pub avatar_diameter: f32,
    /// Height of toolbars or buttons along the bottom edge.
    #[serde(default)]
    pub footer_height: f32,
    /// Horizontal padding on both sides.
    #[serde(default)]
    pub side_padding: f32,
}

impl ChromeLayout {
    /// Chrome of the slide editor: toolbar on top, picker strip below.
    pub const EDITOR: Self = Self {
        header_height: 56.0,
        avatar_diameter: 0.0,
        footer_height: 72.0,
        side_padding: 12.0,
    };

    /// Chrome of the profile view: profile header plus avatar overlay.
    pub const VIEWER: Self = Self {
        header_height: 44.0,
        avatar_diameter: 64.0,
        footer_height: 24.0,
        side_padding: 16.0,
    };

    /// The per-edge insets a caption must stay clear of.
    pub fn safe_insets(&self) -> SafeInsets {
        SafeInsets::new(
            self.header_height + self.avatar_diameter,
            self.side_padding,
            self.footer_height,
            self.side_padding,
        )
    }
}

// ============================================================================
// Export Configuration
// ============================================================================

/// Target platform, which bounds how large an export may be rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ios,
    Android,
    Desktop,
}

impl Platform {
    /// Widest image the platform may resize to without memory pressure.
    pub fn hard_cap_width(self) -> u32 {
        match self {
            Self::Ios => 4096,
            Self::Android => 8192,
            Self::Desktop => 16384,
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "desktop" => Ok(Self::Desktop),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Settings for the export step of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    #[serde(default)]
    pub platform: Platform,

    /// JPEG quality factor, 1-100.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Overrides the platform's hard cap when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_cap_width: Option<u32>,
}

impl ExportConfig {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    /// The effective width ceiling.
    pub fn width_cap(&self) -> u32 {
        self.hard_cap_width
            .unwrap_or_else(|| self.platform.hard_cap_width())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            jpeg_quality: default_jpeg_quality(),
            hard_cap_width: None,
        }
    }
}

fn default_jpeg_quality() -> u8 {
    90
}

// ============================================================================
// CompositionConfig
// ============================================================================

/// Everything a host needs to lay out, render and export slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionConfig {
    pub editor_chrome: ChromeLayout,
    pub viewer_chrome: ChromeLayout,

    /// Caption font size in pixels.
    pub caption_font_size: f32,

    pub export: ExportConfig,

    /// When set, the profile view draws every caption at this position and
    /// ignores the per-slide stored position. The editor is unaffected.
    pub force_caption_position: Option<NormalizedPosition>,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            editor_chrome: ChromeLayout::EDITOR,
            viewer_chrome: ChromeLayout::VIEWER,
            caption_font_size: 18.0,
            export: ExportConfig::default(),
            force_caption_position: None,
        }
    }
}

impl CompositionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> CoverResult<Self> {
        serde_json::from_str(json).map_err(|e| CoverError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> CoverResult<String> {
        serde_json::to_string(self).map_err(|e| CoverError::Config(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> CoverResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoverError::Config(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = CompositionConfig::from_json("{}").unwrap();
        assert_eq!(config, CompositionConfig::default());
    }

    #[test]
    fn json_roundtrip_keeps_overrides() {
        let mut config = CompositionConfig::new();
        config.caption_font_size = 22.0;
        config.export = ExportConfig::for_platform(Platform::Android);
        config.force_caption_position = Some(NormalizedPosition::new(0.1, 0.7));

        let json = config.to_json_pretty().unwrap();
        assert!(json.contains("\"captionFontSize\""));
        assert!(json.contains("\"android\""));

        let restored = CompositionConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = CompositionConfig::from_json("{\"captionFontSize\": \"big\"}").unwrap_err();
        assert!(matches!(err, CoverError::Config(_)));
    }

    #[test]
    fn chrome_insets() {
        let insets = ChromeLayout::VIEWER.safe_insets();
        assert_eq!(insets.top, 108.0);
        assert_eq!(insets.bottom, 24.0);
        assert_eq!(insets.left, 16.0);
        assert_eq!(insets.right, 16.0);
    }

    #[test]
    fn platform_caps_differ() {
        assert!(Platform::Ios.hard_cap_width() < Platform::Android.hard_cap_width());
        let mut export = ExportConfig::for_platform(Platform::Android);
        assert_eq!(export.width_cap(), 8192);
        export.hard_cap_width = Some(2048);
        assert_eq!(export.width_cap(), 2048);
    }

    #[test]
    fn partial_chrome_uses_field_defaults() {
        let config =
            CompositionConfig::from_json(r#"{"viewerChrome": {"headerHeight": 30}}"#).unwrap();
        assert_eq!(config.viewer_chrome.header_height, 30.0);
        assert_eq!(config.viewer_chrome.avatar_diameter, 0.0);
        assert_eq!(config.editor_chrome, ChromeLayout::EDITOR);
    }
}
