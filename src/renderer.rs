//! Read-only rendering of a saved cover in the profile view.
//!
//! The profile view has its own chrome (header and avatar instead of the
//! editor toolbar), so it derives its own safe zone and bubble width and runs
//! the same composition as the editor preview.

use crate::SLIDE_COUNT;
use crate::compose::{RenderedSlide, SlideView, compose_slide};
use crate::config::CompositionConfig;
use crate::geometry::SizePx;
use crate::state::{CoverState, PersistedSlide};

/// Renders persisted slides with the viewer's chrome.
#[derive(Debug, Clone, Default)]
pub struct SlideRenderer {
    config: CompositionConfig,
}

impl SlideRenderer {
    pub fn new(config: CompositionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Renders one slide.
    ///
    /// With `forceCaptionPosition` configured, the stored position is
    /// ignored in favor of the configured one.
    pub fn render_slide(
        &self,
        slide: &PersistedSlide,
        container: SizePx,
        viewport_width: f32,
    ) -> RenderedSlide {
        let mut view = SlideView::from(slide);
        if let Some(forced) = self.config.force_caption_position {
            view.position = forced;
        }
        compose_slide(
            view,
            self.config.viewer_chrome.safe_insets(),
            container,
            viewport_width,
            self.config.caption_font_size,
        )
    }

    /// Renders all slides of a cover.
    pub fn render_cover(
        &self,
        state: &CoverState,
        container: SizePx,
        viewport_width: f32,
    ) -> [RenderedSlide; SLIDE_COUNT] {
        std::array::from_fn(|i| self.render_slide(&state.slides[i], container, viewport_width))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::SlideEditor;
    use crate::effect::{EffectKey, OverlayDescriptor, effect_layers};
    use crate::geometry::{NormalizedPosition, PixelPosition};

    const CONTAINER: SizePx = SizePx {
        width: 390.0,
        height: 700.0,
    };

    fn slide(effect: EffectKey, position: NormalizedPosition) -> PersistedSlide {
        PersistedSlide {
            image: Some("https://cdn/s.jpg".into()),
            caption: "hi there".into(),
            position,
            effect,
            ..PersistedSlide::default()
        }
    }

    #[test]
    fn sepia_matches_between_editor_and_profile() {
        let state = CoverState {
            slides: std::array::from_fn(|_| slide(EffectKey::Sepia, NormalizedPosition::DEFAULT)),
            ..CoverState::default()
        };
        let config = CompositionConfig::default();

        let editor = SlideEditor::open(state.clone(), config.clone());
        let preview = editor.preview(0, CONTAINER, 390.0).unwrap();
        let rendered = SlideRenderer::new(config).render_slide(&state.slides[0], CONTAINER, 390.0);

        assert_eq!(preview.overlays, rendered.overlays);
        assert_eq!(rendered.overlays.len(), 1);
        assert!(matches!(rendered.overlays[0], OverlayDescriptor::Tint { .. }));
    }

    #[test]
    fn viewer_chrome_is_respected() {
        let renderer = SlideRenderer::default();
        let rendered = renderer.render_slide(
            &slide(EffectKey::None, NormalizedPosition::new(0.0, 0.0)),
            CONTAINER,
            390.0,
        );
        let insets = renderer.config().viewer_chrome.safe_insets();
        let origin = rendered.caption.unwrap().origin;
        assert!((origin.x - insets.left).abs() < 1e-3);
        assert!((origin.y - insets.top).abs() < 1e-3);
    }

    #[test]
    fn forced_position_overrides_stored() {
        let config = CompositionConfig {
            force_caption_position: Some(NormalizedPosition::new(0.05, 0.5)),
            ..CompositionConfig::default()
        };
        let renderer = SlideRenderer::new(config);
        let a = renderer.render_slide(
            &slide(EffectKey::None, NormalizedPosition::new(0.0, 0.2)),
            CONTAINER,
            390.0,
        );
        let b = renderer.render_slide(
            &slide(EffectKey::None, NormalizedPosition::new(0.0, 0.9)),
            CONTAINER,
            390.0,
        );
        assert_eq!(a.caption.unwrap().origin, b.caption.unwrap().origin);
    }

    #[test]
    fn renders_every_slide() {
        let mut state = CoverState::new();
        state.slides[1] = slide(EffectKey::Cool, NormalizedPosition::DEFAULT);
        let rendered = SlideRenderer::default().render_cover(&state, CONTAINER, 390.0);

        assert!(rendered[0].image.is_none());
        assert!(rendered[0].caption.is_none());
        assert_eq!(rendered[1].overlays, effect_layers(EffectKey::Cool));
        assert!(rendered[1].caption.is_some());
    }

    #[test]
    fn narrow_viewer_rewraps_caption() {
        let persisted = PersistedSlide {
            caption: "word ".repeat(20).trim_end().to_string(),
            ..slide(EffectKey::None, NormalizedPosition::DEFAULT)
        };
        let state = CoverState {
            slides: std::array::from_fn(|_| persisted.clone()),
            ..CoverState::default()
        };
        let config = CompositionConfig::default();

        let editor = SlideEditor::open(state, config.clone());
        let preview = editor.preview(0, CONTAINER, 390.0).unwrap().caption.unwrap();
        let viewer = SlideRenderer::new(config)
            .render_slide(&persisted, SizePx::new(240.0, 700.0), 240.0)
            .caption
            .unwrap();

        assert!(viewer.line_count > preview.line_count);
        assert_ne!(viewer.text, preview.text);
        assert!(viewer.size.width < preview.size.width);
    }

    #[test]
    fn zero_size_container_does_not_panic() {
        let rendered = SlideRenderer::default().render_slide(
            &slide(EffectKey::Soft, NormalizedPosition::DEFAULT),
            SizePx::default(),
            0.0,
        );
        assert_eq!(rendered.caption.unwrap().origin, PixelPosition::default());
    }
}
