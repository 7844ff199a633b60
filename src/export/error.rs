use std::io;

use ntex::http::StatusCode;
use thiserror::Error;

/// Everything that stops an export. None of them is retried.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Caller is not an administrator or the form nonce is missing, expired or forged
    #[error("Permission denied.")]
    PermissionDenied,

    /// The filter matched no posts, nothing was archived
    #[error("No posts found for the selected criteria.")]
    NotFound,

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// HTML to Markdown conversion failed for one post
    #[error("Error converting post {slug} to markdown: {source}")]
    Conversion {
        slug: String,
        #[source]
        source: io::Error,
    },

    /// Temporary storage or archive write failure
    #[error("Could not create ZIP archive: {0}")]
    Io(#[from] io::Error),
}

impl ExportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExportError::PermissionDenied => StatusCode::FORBIDDEN,
            ExportError::NotFound => StatusCode::NOT_FOUND,
            ExportError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ExportError::Conversion { .. } | ExportError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the operator
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Io(_) => "Could not create ZIP archive.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ExportError::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ExportError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ExportError::InvalidFilter("x".to_string()).status_code(), StatusCode::BAD_REQUEST);
        let io_error = ExportError::Io(io::Error::new(ErrorKind::Other, "disk full"));
        assert_eq!(io_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(ExportError::PermissionDenied.user_message(), "Permission denied.");
        assert_eq!(ExportError::NotFound.user_message(), "No posts found for the selected criteria.");
        let io_error = ExportError::Io(io::Error::new(ErrorKind::Other, "/tmp/secret/path"));
        assert_eq!(io_error.user_message(), "Could not create ZIP archive.");
    }
}
