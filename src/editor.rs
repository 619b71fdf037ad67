//! The slide editor: three drafts, the interaction mode, and saving.
//!
//! # Modes
//!
//! Text editing, picker panels and dragging all claim the same screen space
//! and gestures, so at most one of them is active. They are one
//! [`EditorMode`] driven by the pure [`reduce`] function:
//!
//! ```text
//!   Idle ──BeginEdit(i)──► Editing(i) ──DragStarted(i)──► Dragging(i)
//!    ▲                       │    ▲                           │
//!    │                       │    └────────DragEnded──────────┘
//!    ├──────EndEdit──────────┘
//!    └──ClosePicker── Picking(i, kind) ◄──OpenPicker(i, kind)── any but Dragging
//! ```
//!
//! # Saving
//!
//! A save is split so the editor is not borrowed across the network await:
//! [`SlideEditor::begin_save`] snapshots the drafts and takes the in-flight
//! lock, [`PendingSave::submit`] talks to the server, and
//! [`SlideEditor::apply_save`] folds the response back in. [`SlideEditor::save`]
//! runs all three.
//!
//! # Example
//!
//! ```
//! use cover_composer::{CompositionConfig, CoverState, EditorAction, SlideEditor};
//!
//! let mut editor = SlideEditor::open(CoverState::new(), CompositionConfig::default());
//! editor.dispatch(EditorAction::BeginEdit(0));
//! editor.set_caption(0, "hello").unwrap();
//! assert!(!editor.can_page());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::SLIDE_COUNT;
use crate::color::TextColor;
use crate::compose::{RenderedSlide, SlideView, compose_slide};
use crate::config::CompositionConfig;
use crate::draft::{QualityPreset, SlideDraft};
use crate::drag::{DragController, DragEvent};
use crate::effect::EffectKey;
use crate::error::{CoverError, CoverResult};
use crate::export::Exporter;
use crate::font::font_style;
use crate::geometry::{NormalizedPosition, PixelPosition, SizePx};
use crate::payload::build_payload;
use crate::service::{AssetLoader, CoverSlidesClient, PickResult, TokenProvider};
use crate::state::{CoverSaveResponse, CoverState};
use crate::text::{layout_bubble, strip_breaks};

// ============================================================================
// Mode
// ============================================================================

/// Auxiliary picker panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerKind {
    Colors,
    Fonts,
    Effects,
}

/// What the editor is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Idle,
    /// Typing into a slide's caption.
    Editing(usize),
    /// A picker panel is open for a slide.
    Picking(usize, PickerKind),
    /// The caption bubble of a slide is being dragged.
    Dragging(usize),
}

impl EditorMode {
    /// The slide the mode refers to, if any.
    pub fn slot(self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Editing(i) | Self::Picking(i, _) | Self::Dragging(i) => Some(i),
        }
    }

    /// The open picker, if any.
    pub fn open_picker(self) -> Option<(usize, PickerKind)> {
        match self {
            Self::Picking(i, kind) => Some((i, kind)),
            _ => None,
        }
    }

    /// The slide whose bubble may be dragged.
    pub fn drag_slot(self) -> Option<usize> {
        match self {
            Self::Editing(i) | Self::Dragging(i) => Some(i),
            _ => None,
        }
    }
}

/// Inputs to [`reduce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    BeginEdit(usize),
    EndEdit,
    OpenPicker(usize, PickerKind),
    /// Opens the picker, or closes it if it is already the open one.
    TogglePicker(usize, PickerKind),
    ClosePicker,
    DragStarted(usize),
    DragEnded,
}

/// Computes the next mode. Actions that do not apply leave the mode as is.
///
/// A drag in progress is only ended by `DragEnded`.
pub fn reduce(mode: EditorMode, action: EditorAction) -> EditorMode {
    use EditorAction as A;
    use EditorMode as M;

    match (mode, action) {
        (M::Dragging(i), A::DragEnded) => M::Editing(i),
        (M::Dragging(_), _) => mode,

        (_, A::BeginEdit(i)) => M::Editing(i),
        (M::Editing(_), A::EndEdit) => M::Idle,

        (M::Picking(i, open), A::TogglePicker(j, kind)) if i == j && open == kind => M::Idle,
        (_, A::OpenPicker(i, kind) | A::TogglePicker(i, kind)) => M::Picking(i, kind),
        (M::Picking(..), A::ClosePicker) => M::Idle,

        (M::Editing(i), A::DragStarted(j)) if i == j => M::Dragging(i),

        _ => mode,
    }
}

// ============================================================================
// Save
// ============================================================================

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The server accepted the save and the editor now shows its state.
    Saved,
    /// Another save is still pending; this one was ignored.
    AlreadyInFlight,
}

/// Holds the in-flight flag until dropped.
#[derive(Debug)]
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A save that has been started but not yet applied.
///
/// The editor stays locked against other saves until this is dropped or
/// passed to [`SlideEditor::apply_save`]. Dropping the future returned by
/// [`submit`](Self::submit) does not recall a request already sent.
#[derive(Debug)]
pub struct PendingSave {
    drafts: [SlideDraft; SLIDE_COUNT],
    exporter: Exporter,
    _in_flight: InFlight,
}

impl PendingSave {
    /// The drafts as they were when the save started.
    pub fn drafts(&self) -> &[SlideDraft; SLIDE_COUNT] {
        &self.drafts
    }

    /// Builds the payload and submits it.
    ///
    /// Fails with [`CoverError::NotAuthenticated`] before any work when there
    /// is no token.
    pub async fn submit(
        &self,
        client: &impl CoverSlidesClient,
        tokens: &impl TokenProvider,
        loader: &impl AssetLoader,
    ) -> CoverResult<CoverSaveResponse> {
        let Some(token) = tokens.bearer_token().await.filter(|t| !t.is_empty()) else {
            tracing::warn!("no auth token, cover save aborted");
            return Err(CoverError::NotAuthenticated);
        };

        let payload = build_payload(&self.drafts, &self.exporter, loader)?;
        tracing::info!(fields = payload.len(), "saving cover slides");

        client
            .submit(&token, payload)
            .await
            .inspect_err(|err| tracing::warn!(%err, "cover save failed"))
    }
}

// ============================================================================
// SlideEditor
// ============================================================================

/// Edits the three slides of a profile cover.
#[derive(Debug)]
pub struct SlideEditor {
    config: CompositionConfig,
    exporter: Exporter,
    persisted: CoverState,
    drafts: [SlideDraft; SLIDE_COUNT],
    drags: [DragController; SLIDE_COUNT],
    mode: EditorMode,
    selected: usize,
    saving: Arc<AtomicBool>,
}

impl SlideEditor {
    /// Opens the editor on the last saved state.
    pub fn open(state: CoverState, config: CompositionConfig) -> Self {
        Self {
            exporter: Exporter::new(config.export),
            config,
            drafts: seed_drafts(&state),
            persisted: state,
            drags: Default::default(),
            mode: EditorMode::Idle,
            selected: 0,
            saving: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The slide paged into view.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn drafts(&self) -> &[SlideDraft; SLIDE_COUNT] {
        &self.drafts
    }

    pub fn draft(&self, index: usize) -> Option<&SlideDraft> {
        self.drafts.get(index)
    }

    /// The last state confirmed by the server.
    pub fn persisted(&self) -> &CoverState {
        &self.persisted
    }

    pub fn drag(&self, index: usize) -> Option<&DragController> {
        self.drags.get(index)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Whether paging between slides is allowed.
    pub fn can_page(&self) -> bool {
        self.mode == EditorMode::Idle
    }

    /// Returns true if drafts differ from the last saved state.
    pub fn is_dirty(&self) -> bool {
        self.drafts != seed_drafts(&self.persisted)
    }

    // ------------------------------------------------------------------------
    // Mode
    // ------------------------------------------------------------------------

    /// Applies an action and returns any drag events it caused.
    ///
    /// Indices past the last slide are ignored.
    pub fn dispatch(&mut self, action: EditorAction) -> Vec<DragEvent> {
        let target = match action {
            EditorAction::BeginEdit(i)
            | EditorAction::OpenPicker(i, _)
            | EditorAction::TogglePicker(i, _)
            | EditorAction::DragStarted(i) => Some(i),
            EditorAction::EndEdit | EditorAction::ClosePicker | EditorAction::DragEnded => None,
        };
        if target.is_some_and(|i| i >= SLIDE_COUNT) {
            return Vec::new();
        }
        if let EditorAction::DragStarted(i) = action {
            return self.begin_drag(i).ok().flatten().into_iter().collect();
        }
        if action == EditorAction::DragEnded {
            return match self.mode {
                EditorMode::Dragging(i) => self.end_drag(i).unwrap_or_default(),
                _ => Vec::new(),
            };
        }
        self.set_mode(reduce(self.mode, action))
    }

    fn set_mode(&mut self, next: EditorMode) -> Vec<DragEvent> {
        if next != self.mode {
            tracing::debug!(from = ?self.mode, to = ?next, "editor mode changed");
            self.mode = next;
        }
        self.sync_drags()
    }

    /// Enables dragging only on the slide being edited.
    fn sync_drags(&mut self) -> Vec<DragEvent> {
        let allowed = self.mode.drag_slot();
        let mut events = Vec::new();
        for index in 0..SLIDE_COUNT {
            let slot_events = self.drags[index].set_enabled(allowed == Some(index));
            self.apply_drag_events(index, &slot_events);
            events.extend(slot_events);
        }
        events
    }

    /// Pages to a slide. Refused unless the editor is idle.
    pub fn select(&mut self, index: usize) -> CoverResult<bool> {
        check_index(index)?;
        if !self.can_page() {
            return Ok(false);
        }
        self.selected = index;
        Ok(true)
    }

    // ------------------------------------------------------------------------
    // Draft edits
    // ------------------------------------------------------------------------

    fn update_draft(
        &mut self,
        index: usize,
        edit: impl FnOnce(&SlideDraft) -> SlideDraft,
    ) -> CoverResult<()> {
        check_index(index)?;
        let mut next = self.drafts.clone();
        next[index] = edit(&self.drafts[index]);
        self.drafts = next;
        Ok(())
    }

    /// Applies the picker result. Returns false when the user cancelled.
    pub fn pick_image(&mut self, index: usize, result: PickResult) -> CoverResult<bool> {
        match result {
            PickResult::Picked(picked) => {
                self.update_draft(index, |draft| draft.with_picked_image(picked))?;
                Ok(true)
            }
            PickResult::Cancelled => {
                check_index(index)?;
                Ok(false)
            }
        }
    }

    /// Removes a slide's image and its caption, effect and quality.
    pub fn clear_image(&mut self, index: usize) -> CoverResult<()> {
        self.update_draft(index, SlideDraft::cleared)
    }

    /// Sets the caption. Break markers from an earlier wrap are removed.
    pub fn set_caption(&mut self, index: usize, text: &str) -> CoverResult<()> {
        let text = strip_breaks(text);
        self.update_draft(index, |draft| SlideDraft {
            caption: (!text.is_empty()).then_some(text),
            ..draft.clone()
        })
    }

    pub fn set_text_color(&mut self, index: usize, color: TextColor) -> CoverResult<()> {
        self.update_draft(index, |draft| SlideDraft {
            text_color: color,
            ..draft.clone()
        })
    }

    /// Sets the caption font. Keys outside the catalog are rejected.
    pub fn set_font(&mut self, index: usize, key: &str) -> CoverResult<()> {
        let style = font_style(key).ok_or_else(|| CoverError::UnknownFont(key.to_string()))?;
        self.update_draft(index, |draft| SlideDraft {
            font_key: style.key.clone(),
            ..draft.clone()
        })
    }

    pub fn set_effect(&mut self, index: usize, effect: EffectKey) -> CoverResult<()> {
        self.update_draft(index, |draft| SlideDraft {
            effect,
            ..draft.clone()
        })
    }

    pub fn set_quality(&mut self, index: usize, quality: QualityPreset) -> CoverResult<()> {
        self.update_draft(index, |draft| SlideDraft {
            quality,
            ..draft.clone()
        })
    }

    /// Stores a normalized caption position and moves the bubble there.
    pub fn set_position(&mut self, index: usize, position: NormalizedPosition) -> CoverResult<()> {
        self.update_draft(index, |draft| SlideDraft {
            position,
            ..draft.clone()
        })?;
        let insets = self.config.editor_chrome.safe_insets();
        self.drags[index].place(position, insets);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Layout and dragging
    // ------------------------------------------------------------------------

    /// Records a slide's measured size and places its bubble from the draft.
    pub fn layout_slide(
        &mut self,
        index: usize,
        container: SizePx,
        viewport_width: f32,
    ) -> CoverResult<()> {
        check_index(index)?;
        let draft = &self.drafts[index];
        let bubble = layout_bubble(
            draft.caption_text(),
            self.config.caption_font_size,
            viewport_width,
        );
        let position = draft.position;
        let insets = self.config.editor_chrome.safe_insets();

        let drag = &mut self.drags[index];
        drag.set_layout(container, bubble.size);
        drag.place(position, insets);
        Ok(())
    }

    /// Starts dragging a slide's bubble. Only allowed while editing that slide.
    pub fn begin_drag(&mut self, index: usize) -> CoverResult<Option<DragEvent>> {
        check_index(index)?;
        let next = reduce(self.mode, EditorAction::DragStarted(index));
        if next != EditorMode::Dragging(index) {
            return Ok(None);
        }
        let Some(event) = self.drags[index].begin() else {
            return Ok(None);
        };
        self.set_mode(next);
        Ok(Some(event))
    }

    /// Moves the bubble being dragged by the gesture's total translation.
    pub fn drag_moved(
        &mut self,
        index: usize,
        dx: f32,
        dy: f32,
    ) -> CoverResult<Option<PixelPosition>> {
        check_index(index)?;
        Ok(self.drags[index].update(dx, dy))
    }

    /// Ends a drag (release, cancel or failure) and stores the new position.
    pub fn end_drag(&mut self, index: usize) -> CoverResult<Vec<DragEvent>> {
        check_index(index)?;
        let events = self.drags[index].end();
        self.apply_drag_events(index, &events);
        if self.mode == EditorMode::Dragging(index) {
            let next = reduce(self.mode, EditorAction::DragEnded);
            self.set_mode(next);
        }
        Ok(events)
    }

    fn apply_drag_events(&mut self, index: usize, events: &[DragEvent]) {
        for event in events {
            if let DragEvent::PositionChanged(position) = *event {
                let mut next = self.drafts.clone();
                next[index].position = position;
                self.drafts = next;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Preview
    // ------------------------------------------------------------------------

    /// Composes a slide the way the editor shows it.
    ///
    /// While the bubble is being dragged it is drawn at the live pointer
    /// position instead of the stored one.
    pub fn preview(
        &self,
        index: usize,
        container: SizePx,
        viewport_width: f32,
    ) -> CoverResult<RenderedSlide> {
        check_index(index)?;
        let mut rendered = compose_slide(
            SlideView::from(&self.drafts[index]),
            self.config.editor_chrome.safe_insets(),
            container,
            viewport_width,
            self.config.caption_font_size,
        );
        let drag = &self.drags[index];
        if drag.is_dragging() {
            if let Some(caption) = rendered.caption.as_mut() {
                caption.origin = drag.position();
            }
        }
        Ok(rendered)
    }

    /// Throws away unsaved edits and returns to idle.
    ///
    /// A drag in progress is finished first, so its release cannot write a
    /// position back into the restored drafts.
    pub fn discard(&mut self) -> Vec<DragEvent> {
        let events = self.set_mode(EditorMode::Idle);
        self.drafts = seed_drafts(&self.persisted);
        let insets = self.config.editor_chrome.safe_insets();
        for (drag, draft) in self.drags.iter_mut().zip(&self.drafts) {
            drag.place(draft.position, insets);
        }
        events
    }

    // ------------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------------

    /// Starts a save. Returns `None` while another save is pending.
    pub fn begin_save(&self) -> Option<PendingSave> {
        let Some(in_flight) = InFlight::acquire(&self.saving) else {
            tracing::debug!("save ignored, another save is in flight");
            return None;
        };
        Some(PendingSave {
            drafts: self.drafts.clone(),
            exporter: self.exporter,
            _in_flight: in_flight,
        })
    }

    /// Makes the server's response the new saved state and reseeds drafts.
    ///
    /// The mode, selection and drag state are left alone.
    pub fn apply_save(&mut self, pending: PendingSave, response: CoverSaveResponse) {
        self.persisted = self.persisted.reconcile(&pending.drafts, &response);
        self.drafts = seed_drafts(&self.persisted);
        tracing::info!(slides = response.results.len(), "cover slides saved");
    }

    /// Saves all slides in one request.
    ///
    /// On error the drafts are kept so the user can retry.
    pub async fn save(
        &mut self,
        client: &impl CoverSlidesClient,
        tokens: &impl TokenProvider,
        loader: &impl AssetLoader,
    ) -> CoverResult<SaveOutcome> {
        let Some(pending) = self.begin_save() else {
            return Ok(SaveOutcome::AlreadyInFlight);
        };
        let response = pending.submit(client, tokens, loader).await?;
        self.apply_save(pending, response);
        Ok(SaveOutcome::Saved)
    }
}

fn seed_drafts(state: &CoverState) -> [SlideDraft; SLIDE_COUNT] {
    std::array::from_fn(|i| SlideDraft::from_persisted(&state.slides[i]))
}

fn check_index(index: usize) -> CoverResult<()> {
    if index < SLIDE_COUNT {
        Ok(())
    } else {
        Err(CoverError::SlideIndex(index))
    }
}

// ============================================================================
// Tests
// ============================================================================
