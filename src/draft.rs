//! In-memory, unsaved slide edits.

use serde::{Deserialize, Serialize};

use crate::color::TextColor;
use crate::effect::EffectKey;
use crate::font::DEFAULT_FONT_KEY;
use crate::geometry::NormalizedPosition;
use crate::service::PickedImage;
use crate::state::PersistedSlide;

// ============================================================================
// ImageRef
// ============================================================================

/// What a slide's background image slot holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ImageRef {
    /// Nothing was ever set.
    #[default]
    Empty,
    /// A freshly picked local image that has not been uploaded.
    Local(PickedImage),
    /// An image the server already stores.
    Remote(String),
    /// The user removed the image; the server must be told to drop it.
    Cleared,
}

impl ImageRef {
    /// Returns true if the slot shows an image.
    pub fn has_image(&self) -> bool {
        matches!(self, Self::Local(_) | Self::Remote(_))
    }

    /// The URI to display, if any.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Local(picked) => Some(&picked.uri),
            Self::Remote(url) => Some(url),
            Self::Empty | Self::Cleared => None,
        }
    }
}

// ============================================================================
// QualityPreset
// ============================================================================

/// Export resolution for a slide image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityPreset {
    #[default]
    #[serde(rename = "original")]
    Original,
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "2K")]
    Qhd2k,
    #[serde(rename = "4K")]
    Uhd4k,
    #[serde(rename = "8K")]
    Uhd8k,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 5] = [
        QualityPreset::Original,
        QualityPreset::Hd1080,
        QualityPreset::Qhd2k,
        QualityPreset::Uhd4k,
        QualityPreset::Uhd8k,
    ];

    /// Target export width, or `None` to keep the source as is.
    pub fn target_width(self) -> Option<u32> {
        match self {
            Self::Original => None,
            Self::Hd1080 => Some(1920),
            Self::Qhd2k => Some(2560),
            Self::Uhd4k => Some(3840),
            Self::Uhd8k => Some(7680),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Hd1080 => "1080p",
            Self::Qhd2k => "2K",
            Self::Uhd4k => "4K",
            Self::Uhd8k => "8K",
        }
    }
}

impl std::str::FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown quality preset: {s}"))
    }
}

// ============================================================================
// SlideDraft
// ============================================================================

/// Everything the user can edit on one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDraft {
    pub image: ImageRef,
    pub caption: Option<String>,
    pub text_color: TextColor,
    pub font_key: String,
    pub position: NormalizedPosition,
    pub effect: EffectKey,
    pub quality: QualityPreset,
}

impl Default for SlideDraft {
    fn default() -> Self {
        Self {
            image: ImageRef::Empty,
            caption: None,
            text_color: TextColor::default(),
            font_key: DEFAULT_FONT_KEY.to_string(),
            position: NormalizedPosition::DEFAULT,
            effect: EffectKey::None,
            quality: QualityPreset::Original,
        }
    }
}

impl SlideDraft {
    /// Seeds a draft from the last saved state.
    pub fn from_persisted(slide: &PersistedSlide) -> Self {
        Self {
            image: slide
                .image
                .clone()
                .map_or(ImageRef::Empty, ImageRef::Remote),
            caption: (!slide.caption.is_empty()).then(|| slide.caption.clone()),
            text_color: slide.text_color.clone(),
            font_key: slide.font_key.clone(),
            position: slide.position,
            effect: slide.effect,
            quality: QualityPreset::Original,
        }
    }

    /// Replaces the image with a newly picked one.
    pub fn with_picked_image(&self, picked: PickedImage) -> Self {
        Self {
            image: ImageRef::Local(picked),
            ..self.clone()
        }
    }

    /// Removes the image and its caption, effect and quality.
    ///
    /// Color, font and position survive so a re-added image keeps the
    /// user's styling.
    pub fn cleared(&self) -> Self {
        Self {
            image: ImageRef::Cleared,
            caption: None,
            effect: EffectKey::None,
            quality: QualityPreset::Original,
            ..self.clone()
        }
    }

    /// The caption to submit: empty when unset.
    pub fn caption_text(&self) -> &str {
        self.caption.as_deref().unwrap_or("")
    }
}

// ============================================================================
// Tests
// ============================================================================
