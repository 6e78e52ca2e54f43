use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the questionnaire and the profile store.
///
/// Absence (an unknown user id or question id) is not an error: lookups
/// return `Option` instead.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Every violation found in a response set, in the order they were found.
    #[error("Invalid responses: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Profile for user {0} not found")]
    NotFound(String),

    #[error("Unknown profile field: {0}")]
    UnknownField(String),

    #[error("profile store I/O failed ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("profile store contains invalid JSON ({}): {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ProfileError {
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Whether the caller sent bad input (as opposed to a storage failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnknownField(_))
    }
}
