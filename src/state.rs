//! Server-side shapes: what the profile renderer reads and what a save
//! returns.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "slides": [
//!     {
//!       "image": "https://cdn.example/cover/0.jpg",
//!       "caption": "hello",
//!       "textColor": "#FFFFFF",
//!       "fontKey": "inter-700",
//!       "position": { "x": 0.06, "y": 0.24 },
//!       "effect": "warm"
//!     },
//!     {},
//!     {}
//!   ],
//!   "caption": "profile caption",
//!   "bibliography": "about me"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::SLIDE_COUNT;
use crate::color::TextColor;
use crate::draft::{ImageRef, SlideDraft};
use crate::effect::EffectKey;
use crate::font::DEFAULT_FONT_KEY;
use crate::geometry::NormalizedPosition;

// ============================================================================
// PersistedSlide
// ============================================================================

/// One slide as the server stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PersistedSlide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub caption: String,
    pub text_color: TextColor,
    pub font_key: String,
    pub position: NormalizedPosition,
    pub effect: EffectKey,
}

impl Default for PersistedSlide {
    fn default() -> Self {
        Self {
            image: None,
            caption: String::new(),
            text_color: TextColor::default(),
            font_key: DEFAULT_FONT_KEY.to_string(),
            position: NormalizedPosition::DEFAULT,
            effect: EffectKey::None,
        }
    }
}

// ============================================================================
// CoverState
// ============================================================================

/// The authoritative cover of a profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CoverState {
    pub slides: [PersistedSlide; SLIDE_COUNT],

    /// Profile-level caption echoed by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bibliography: Option<String>,
}

impl CoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Builds the state that follows a successful save.
    ///
    /// Image URLs, the profile caption and the bibliography come from the
    /// response. Per-slide styling comes from the drafts that were submitted.
    /// A slot the response does not mention keeps its remote image, drops a
    /// cleared one, and keeps the previous URL for an upload the server did
    /// not echo.
    pub fn reconcile(
        &self,
        submitted: &[SlideDraft; SLIDE_COUNT],
        response: &CoverSaveResponse,
    ) -> Self {
        let slides = std::array::from_fn(|i| {
            let draft = &submitted[i];
            let image = match response.results.iter().find(|r| r.index == i) {
                Some(result) => result.image.clone(),
                None => match &draft.image {
                    ImageRef::Remote(url) => Some(url.clone()),
                    ImageRef::Local(_) => self.slides[i].image.clone(),
                    ImageRef::Empty | ImageRef::Cleared => None,
                },
            };
            PersistedSlide {
                image,
                caption: draft.caption_text().to_string(),
                text_color: draft.text_color.clone(),
                font_key: draft.font_key.clone(),
                position: draft.position,
                effect: draft.effect,
            }
        });

        Self {
            slides,
            caption: response.caption.clone(),
            bibliography: response.bibliography.clone(),
        }
    }
}

// ============================================================================
// Save Response
// ============================================================================

/// The image the server stored for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SlideResult {
    pub index: usize,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body returned by `POST cover-slides`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CoverSaveResponse {
    pub results: Vec<SlideResult>,
    pub caption: Option<String>,
    pub bibliography: Option<String>,
}

impl CoverSaveResponse {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::PickedImage;

    #[test]
    fn empty_state_deserializes() {
        let state = CoverState::from_json("{}").unwrap();
        assert_eq!(state, CoverState::default());
        assert_eq!(state.slides[0].font_key, DEFAULT_FONT_KEY);
    }

    #[test]
    fn partial_slides_fill_defaults() {
        let json = r#"{"slides": [{"image": "https://cdn/a.jpg", "effect": "sepia"}, {}, {}]}"#;
        let state = CoverState::from_json(json).unwrap();
        assert_eq!(state.slides[0].image.as_deref(), Some("https://cdn/a.jpg"));
        assert_eq!(state.slides[0].effect, EffectKey::Sepia);
        assert_eq!(state.slides[0].position, NormalizedPosition::DEFAULT);
        assert_eq!(state.slides[1], PersistedSlide::default());
    }

    #[test]
    fn state_json_uses_camel_case() {
        let json = CoverState::new().to_json().unwrap();
        assert!(json.contains("\"textColor\""));
        assert!(json.contains("\"fontKey\""));
        assert!(!json.contains("\"bibliography\""));
    }

    #[test]
    fn response_parses() {
        let json = r#"{
            "results": [
                {"index": 0, "image": "https://cdn/0.jpg"},
                {"index": 1, "image": null}
            ],
            "caption": "c",
            "bibliography": "b"
        }"#;
        let response = CoverSaveResponse::from_json(json).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].image, None);
        assert_eq!(response.caption.as_deref(), Some("c"));
    }

    #[test]
    fn null_image_in_response_empties_slot() {
        let previous = CoverState {
            slides: std::array::from_fn(|i| PersistedSlide {
                image: Some(format!("https://cdn/old{i}.jpg")),
                ..PersistedSlide::default()
            }),
            ..CoverState::default()
        };
        let drafts: [SlideDraft; SLIDE_COUNT] =
            std::array::from_fn(|i| SlideDraft::from_persisted(&previous.slides[i]));
        let response =
            CoverSaveResponse::from_json(r#"{"results": [{"index": 1, "image": null}]}"#).unwrap();

        let next = previous.reconcile(&drafts, &response);
        assert_eq!(next.slides[1].image, None);
        assert_eq!(next.slides[0].image.as_deref(), Some("https://cdn/old0.jpg"));
        assert_eq!(next.slides[2].image.as_deref(), Some("https://cdn/old2.jpg"));
    }

    #[test]
    fn reconcile_prefers_server_images_and_draft_styling() {
        let previous = CoverState {
            slides: [
                PersistedSlide {
                    image: Some("https://cdn/old0.jpg".into()),
                    ..PersistedSlide::default()
                },
                PersistedSlide {
                    image: Some("https://cdn/old1.jpg".into()),
                    ..PersistedSlide::default()
                },
                PersistedSlide {
                    image: Some("https://cdn/old2.jpg".into()),
                    ..PersistedSlide::default()
                },
            ],
            caption: Some("old".into()),
            bibliography: Some("old bio".into()),
        };

        let mut drafts: [SlideDraft; SLIDE_COUNT] =
            std::array::from_fn(|i| SlideDraft::from_persisted(&previous.slides[i]));
        drafts[0] = drafts[0].with_picked_image(PickedImage {
            uri: "file:///new.jpg".into(),
            width: 10,
            height: 10,
        });
        drafts[0].caption = Some("fresh".into());
        drafts[0].effect = EffectKey::Warm;
        drafts[1] = drafts[1].cleared();

        let response = CoverSaveResponse {
            results: vec![SlideResult {
                index: 0,
                image: Some("https://cdn/new0.jpg".into()),
            }],
            caption: Some("new".into()),
            bibliography: None,
        };

        let next = previous.reconcile(&drafts, &response);
        assert_eq!(next.slides[0].image.as_deref(), Some("https://cdn/new0.jpg"));
        assert_eq!(next.slides[0].caption, "fresh");
        assert_eq!(next.slides[0].effect, EffectKey::Warm);
        assert_eq!(next.slides[1].image, None);
        assert_eq!(next.slides[2].image.as_deref(), Some("https://cdn/old2.jpg"));
        assert_eq!(next.caption.as_deref(), Some("new"));
        assert_eq!(next.bibliography, None);
    }
}
