//! Collaborators supplied by the host application.
//!
//! The engine never reads ambient state: the auth token, the persistence
//! endpoint and local file access are all passed in through these traits.

use std::path::Path;

use crate::error::{CoverError, CoverResult};
use crate::payload::MultipartPayload;
use crate::state::CoverSaveResponse;

// ============================================================================
// Image Picker
// ============================================================================

/// An image chosen through the platform picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub uri: String,
    pub width: u32,
    pub height: u32,
}

/// Outcome of presenting the image picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    Picked(PickedImage),
    /// The user backed out. Not an error.
    Cancelled,
}

// ============================================================================
// Auth
// ============================================================================

/// Supplies the bearer token for each request.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns `None` when the user is not logged in.
    async fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// The `POST cover-slides` endpoint.
#[async_trait::async_trait]
pub trait CoverSlidesClient: Send + Sync {
    /// Submits all slots in one request.
    async fn submit(
        &self,
        token: &str,
        payload: MultipartPayload,
    ) -> CoverResult<CoverSaveResponse>;
}

// ============================================================================
// Local Assets
// ============================================================================

/// Reads the bytes behind a picked image URI.
pub trait AssetLoader {
    fn load(&self, uri: &str) -> CoverResult<Vec<u8>>;
}

/// Loads `file://` URIs and plain paths from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetLoader;

impl AssetLoader for FsAssetLoader {
    fn load(&self, uri: &str) -> CoverResult<Vec<u8>> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        std::fs::read(Path::new(path)).map_err(|e| CoverError::asset(uri, e))
    }
}
