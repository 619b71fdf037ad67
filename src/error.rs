//! Error type shared by the editor, export pipeline and service adapters.

/// Result alias used throughout the crate.
pub type CoverResult<T> = Result<T, CoverError>;

/// Errors surfaced by cover composition operations.
///
/// Geometry never produces errors: degenerate layouts are absorbed by
/// skipping the affected update. Transcode failures are recovered inside
/// [`Exporter::upscale`](crate::Exporter::upscale) and never escape it.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    /// No bearer token was available for a request that needs one.
    #[error("not logged in")]
    NotAuthenticated,

    /// The request to the persistence endpoint could not be completed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The persistence endpoint returned a non-success status.
    #[error("server rejected the save: status {status}")]
    ServerStatus { status: u16, body: String },

    /// The server response could not be decoded.
    #[error("response parse failed: {0}")]
    ResponseParse(String),

    /// A local image could not be read.
    #[error("could not read image {uri}: {message}")]
    Asset { uri: String, message: String },

    /// A font key that is not in the catalog.
    #[error("unknown font key: {0}")]
    UnknownFont(String),

    /// A slide index outside `0..SLIDE_COUNT`.
    #[error("slide index {0} out of range")]
    SlideIndex(usize),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Decoding, resizing or encoding an export image failed.
    #[error("transcode failed: {0}")]
    Transcode(String),
}

impl CoverError {
    pub fn asset(uri: impl Into<String>, message: impl ToString) -> Self {
        Self::Asset {
            uri: uri.into(),
            message: message.to_string(),
        }
    }

    /// Returns true for failures the host should show as a non-blocking
    /// notice while keeping the drafts for a retry.
    pub fn is_user_notice(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated
                | Self::Transport(_)
                | Self::ServerStatus { .. }
                | Self::ResponseParse(_)
                | Self::Asset { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_stable() {
        assert_eq!(CoverError::NotAuthenticated.to_string(), "not logged in");
        assert!(
            CoverError::ServerStatus {
                status: 502,
                body: String::new()
            }
            .to_string()
            .contains("502")
        );
        assert!(
            CoverError::asset("file:///a.png", "missing")
                .to_string()
                .contains("file:///a.png")
        );
    }

    #[test]
    fn programmer_errors_are_not_notices() {
        assert!(CoverError::Transport("timeout".into()).is_user_notice());
        assert!(CoverError::NotAuthenticated.is_user_notice());
        assert!(!CoverError::SlideIndex(7).is_user_notice());
        assert!(!CoverError::UnknownFont("x".into()).is_user_notice());
    }
}
