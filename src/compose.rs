//! Slide composition shared by the editor preview and the profile renderer.
//!
//! Both hosts run the same steps with their own chrome: wrap the caption for
//! the viewport's bubble width, clamp the stored position into the host's
//! safe zone, and attach the effect's overlay stack. Using one function for
//! both is what keeps a preview and a re-render identical.

use crate::color::TextColor;
use crate::draft::SlideDraft;
use crate::effect::{EffectKey, OverlayDescriptor, effect_layers};
use crate::font::{FontStyle, resolve_font};
use crate::geometry::{NormalizedPosition, PixelPosition, SafeInsets, SizePx, clamp_to_safe_zone};
use crate::state::PersistedSlide;
use crate::text::layout_bubble;

// ============================================================================
// SlideView
// ============================================================================

/// Borrowed, host-independent view of one slide's content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideView<'a> {
    pub image: Option<&'a str>,
    pub caption: &'a str,
    pub text_color: &'a TextColor,
    pub font_key: &'a str,
    pub position: NormalizedPosition,
    pub effect: EffectKey,
}

impl<'a> From<&'a SlideDraft> for SlideView<'a> {
    fn from(draft: &'a SlideDraft) -> Self {
        Self {
            image: draft.image.uri(),
            caption: draft.caption_text(),
            text_color: &draft.text_color,
            font_key: &draft.font_key,
            position: draft.position,
            effect: draft.effect,
        }
    }
}

impl<'a> From<&'a PersistedSlide> for SlideView<'a> {
    fn from(slide: &'a PersistedSlide) -> Self {
        Self {
            image: slide.image.as_deref(),
            caption: &slide.caption,
            text_color: &slide.text_color,
            font_key: &slide.font_key,
            position: slide.position,
            effect: slide.effect,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// The positioned text bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionBubble {
    /// Caption with break markers inserted.
    pub text: String,
    /// Top-left corner in container pixels, inside the safe zone.
    pub origin: PixelPosition,
    pub size: SizePx,
    pub line_count: usize,
    pub color: [u8; 3],
    pub font: &'static FontStyle,
}

/// Everything a host needs to draw one slide, bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlide {
    pub image: Option<String>,
    pub effect: EffectKey,
    /// Drawn above the image and below the caption, in order.
    pub overlays: &'static [OverlayDescriptor],
    pub caption: Option<CaptionBubble>,
}

/// Composes a slide for a host with the given safe insets.
///
/// Blank captions produce no bubble. An empty container still composes; the
/// bubble then sits at the origin until the host has been laid out.
pub fn compose_slide(
    view: SlideView<'_>,
    insets: SafeInsets,
    container: SizePx,
    viewport_width: f32,
    font_size: f32,
) -> RenderedSlide {
    let caption = (!view.caption.trim().is_empty()).then(|| {
        let layout = layout_bubble(view.caption, font_size, viewport_width);
        let origin = clamp_to_safe_zone(view.position, container, layout.size, insets);
        CaptionBubble {
            text: layout.text,
            origin,
            size: layout.size,
            line_count: layout.line_count,
            color: view.text_color.to_rgb(),
            font: resolve_font(view.font_key),
        }
    });

    RenderedSlide {
        image: view.image.map(str::to_owned),
        effect: view.effect,
        overlays: effect_layers(view.effect),
        caption,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChromeLayout;
    use crate::text::BREAK_MARKER;

    const CONTAINER: SizePx = SizePx {
        width: 390.0,
        height: 700.0,
    };

    fn slide(caption: &str) -> PersistedSlide {
        PersistedSlide {
            image: Some("https://cdn/a.jpg".into()),
            caption: caption.into(),
            ..PersistedSlide::default()
        }
    }

    #[test]
    fn blank_caption_has_no_bubble() {
        let rendered = compose_slide(
            SlideView::from(&slide("   ")),
            ChromeLayout::VIEWER.safe_insets(),
            CONTAINER,
            390.0,
            18.0,
        );
        assert!(rendered.caption.is_none());
        assert_eq!(rendered.image.as_deref(), Some("https://cdn/a.jpg"));
    }

    #[test]
    fn bubble_respects_safe_zone() {
        let mut persisted = slide("hello there");
        persisted.position = NormalizedPosition::new(0.0, 0.0);
        let insets = ChromeLayout::VIEWER.safe_insets();

        let rendered = compose_slide(SlideView::from(&persisted), insets, CONTAINER, 390.0, 18.0);
        let origin = rendered.caption.unwrap().origin;
        assert!((origin.x - insets.left).abs() < 1e-3);
        assert!((origin.y - insets.top).abs() < 1e-3);
    }

    #[test]
    fn same_stored_position_differs_by_host_chrome() {
        let mut persisted = slide("hello");
        persisted.position = NormalizedPosition::new(0.0, 0.0);
        let view = SlideView::from(&persisted);

        let editor_insets = ChromeLayout::EDITOR.safe_insets();
        let viewer_insets = ChromeLayout::VIEWER.safe_insets();
        let editor = compose_slide(view, editor_insets, CONTAINER, 390.0, 18.0);
        let viewer = compose_slide(view, viewer_insets, CONTAINER, 390.0, 18.0);
        assert_ne!(editor.caption.unwrap().origin, viewer.caption.unwrap().origin);
    }

    #[test]
    fn long_captions_are_wrapped() {
        let persisted = slide(&"a".repeat(200));
        let rendered = compose_slide(
            SlideView::from(&persisted),
            SafeInsets::default(),
            CONTAINER,
            390.0,
            18.0,
        );
        let bubble = rendered.caption.unwrap();
        assert!(bubble.text.contains(BREAK_MARKER));
        assert!(bubble.line_count > 1);
    }

    #[test]
    fn draft_and_persisted_views_match() {
        let persisted = PersistedSlide {
            effect: EffectKey::Vintage,
            ..slide("same")
        };
        let draft = SlideDraft::from_persisted(&persisted);
        let insets = ChromeLayout::EDITOR.safe_insets();

        let a = compose_slide(SlideView::from(&persisted), insets, CONTAINER, 390.0, 18.0);
        let b = compose_slide(SlideView::from(&draft), insets, CONTAINER, 390.0, 18.0);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_font_falls_back() {
        let persisted = PersistedSlide {
            font_key: "comic-sans-900".into(),
            ..slide("hi")
        };
        let rendered = compose_slide(
            SlideView::from(&persisted),
            SafeInsets::default(),
            CONTAINER,
            390.0,
            18.0,
        );
        assert_eq!(rendered.caption.unwrap().font.key, "inter-700");
    }
}
