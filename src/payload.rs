//! The multipart body of a `POST cover-slides` request.
//!
//! Per slot `i`:
//!
//! | field | when |
//! |---|---|
//! | `slide{i}` | a newly picked image (binary) |
//! | `slide{i}_clear` | `"1"` when the user removed the image |
//! | `slide{i}_caption` | always, possibly empty |
//! | `slide{i}_text_x`, `slide{i}_text_y` | always |
//! | `slide{i}_color`, `slide{i}_font`, `slide{i}_effect` | always |
//!
//! A slot whose image is untouched sends neither `slide{i}` nor
//! `slide{i}_clear`, which is how the server tells "untouched" from
//! "intentionally emptied".

use crate::SLIDE_COUNT;
use crate::draft::{ImageRef, SlideDraft};
use crate::error::CoverResult;
use crate::export::Exporter;
use crate::service::AssetLoader;

/// Value of a single multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File {
        file_name: String,
        mime: &'static str,
        bytes: Vec<u8>,
    },
}

/// A named multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadField {
    pub name: String,
    pub value: FieldValue,
}

/// An ordered list of multipart fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultipartPayload {
    fields: Vec<PayloadField>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(PayloadField {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        });
    }

    pub fn push_file(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: &'static str,
        bytes: Vec<u8>,
    ) {
        self.fields.push(PayloadField {
            name: name.into(),
            value: FieldValue::File {
                file_name: file_name.into(),
                mime,
                bytes,
            },
        });
    }

    pub fn fields(&self) -> &[PayloadField] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<PayloadField> {
        self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The value of a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(value) => Some(value),
            FieldValue::File { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builds the save payload for all slots.
///
/// New local images are loaded and run through the exporter. Reading a
/// local image is the only failure: the save is aborted and the drafts are
/// left as they are.
pub fn build_payload(
    drafts: &[SlideDraft; SLIDE_COUNT],
    exporter: &Exporter,
    loader: &impl AssetLoader,
) -> CoverResult<MultipartPayload> {
    let mut payload = MultipartPayload::new();

    for (i, draft) in drafts.iter().enumerate() {
        match &draft.image {
            ImageRef::Local(picked) => {
                let source = loader.load(&picked.uri)?;
                let exported = exporter.upscale(source, draft.quality);
                tracing::debug!(
                    slot = i,
                    preset = draft.quality.as_str(),
                    transcoded = exported.transcoded,
                    "attaching slide image"
                );
                let file_name = format!("slide{i}.{}", exported.extension());
                payload.push_file(format!("slide{i}"), file_name, exported.mime, exported.bytes);
            }
            ImageRef::Cleared => payload.push_text(format!("slide{i}_clear"), "1"),
            ImageRef::Empty | ImageRef::Remote(_) => {}
        }

        payload.push_text(format!("slide{i}_caption"), draft.caption_text());
        payload.push_text(format!("slide{i}_text_x"), draft.position.x.to_string());
        payload.push_text(format!("slide{i}_text_y"), draft.position.y.to_string());
        payload.push_text(format!("slide{i}_color"), draft.text_color.as_str());
        payload.push_text(format!("slide{i}_font"), draft.font_key.as_str());
        payload.push_text(format!("slide{i}_effect"), draft.effect.as_str());
    }

    Ok(payload)
}

// ============================================================================
// Tests
// ============================================================================
