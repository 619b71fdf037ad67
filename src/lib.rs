//! cover-composer: caption placement, effects and saving for profile cover
//! slides
//!
//! A profile cover is three slides, each a background image with a
//! draggable caption bubble and an optional visual effect. This crate holds
//! the layout and state logic shared by the slide editor and the read-only
//! profile view. Drawing is left to the host.
//!
//! # Example
//!
//! ```
//! use cover_composer::{
//!     CompositionConfig, CoverState, EditorAction, EffectKey, SizePx, SlideEditor, SlideRenderer,
//! };
//!
//! let config = CompositionConfig::default();
//! let mut editor = SlideEditor::open(CoverState::new(), config.clone());
//!
//! editor.dispatch(EditorAction::BeginEdit(0));
//! editor.set_caption(0, "hello from the cover").unwrap();
//! editor.set_effect(0, EffectKey::Sepia).unwrap();
//!
//! let container = SizePx::new(390.0, 700.0);
//! let preview = editor.preview(0, container, 390.0).unwrap();
//! assert!(preview.caption.is_some());
//!
//! // The profile view renders persisted state with its own chrome.
//! let renderer = SlideRenderer::new(config);
//! let slides = renderer.render_cover(editor.persisted(), container, 390.0);
//! assert!(slides[0].caption.is_none());
//! ```
//!
//! # Saving
//!
//! Saving needs a [`TokenProvider`], a [`CoverSlidesClient`] and an
//! [`AssetLoader`]. With the `http` feature, `HttpCoverSlidesClient`
//! posts to a real endpoint.
//!
//! ```no_run
//! # async fn run() -> cover_composer::CoverResult<()> {
//! use cover_composer::{CompositionConfig, CoverState, FsAssetLoader, SlideEditor, StaticToken};
//! # struct Client;
//! # #[async_trait::async_trait]
//! # impl cover_composer::CoverSlidesClient for Client {
//! #     async fn submit(&self, _: &str, _: cover_composer::MultipartPayload)
//! #         -> cover_composer::CoverResult<cover_composer::CoverSaveResponse> { unimplemented!() }
//! # }
//! # let client = Client;
//!
//! let mut editor = SlideEditor::open(CoverState::new(), CompositionConfig::default());
//! editor.save(&client, &StaticToken::new("token"), &FsAssetLoader).await?;
//! # Ok(())
//! # }
//! ```

mod color;
mod compose;
mod config;
mod draft;
mod drag;
mod editor;
mod error;
mod export;
mod font;
mod geometry;
mod payload;
mod renderer;
mod service;
mod state;
mod text;

pub mod effect;

#[cfg(feature = "http")]
mod http;

/// Number of slides in a cover.
pub const SLIDE_COUNT: usize = 3;

pub use color::TextColor;
pub use compose::{CaptionBubble, RenderedSlide, SlideView, compose_slide};
pub use config::{ChromeLayout, CompositionConfig, ExportConfig, Platform};
pub use draft::{ImageRef, QualityPreset, SlideDraft};
pub use drag::{DragController, DragEvent};
pub use editor::{
    EditorAction, EditorMode, PendingSave, PickerKind, SaveOutcome, SlideEditor, reduce,
};
pub use effect::{EffectKey, OverlayDescriptor, OverlayKind, apply_effect, effect_layers};
pub use error::{CoverError, CoverResult};
pub use export::{ExportedImage, Exporter};
pub use font::{DEFAULT_FONT_KEY, FontStyle, font_catalog, font_style, resolve_font};
pub use geometry::{NormalizedPosition, PixelPosition, SafeInsets, SizePx, clamp_to_safe_zone};
pub use payload::{FieldValue, MultipartPayload, PayloadField, build_payload};
pub use renderer::SlideRenderer;
pub use service::{
    AssetLoader, CoverSlidesClient, FsAssetLoader, PickResult, PickedImage, StaticToken,
    TokenProvider,
};
pub use state::{CoverSaveResponse, CoverState, PersistedSlide, SlideResult};
pub use text::{
    AverageGlyphWidth, BREAK_MARKER, BubbleLayout, TextMeasure, bubble_width, layout_bubble,
    strip_breaks, wrap_to_fit, wrap_to_fit_measured,
};

#[cfg(feature = "http")]
pub use http::HttpCoverSlidesClient;
