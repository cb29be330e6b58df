use thiserror::Error;

/// Failures surfaced by the panel API boundary.
///
/// Every non-2xx status is mapped here by [`ApiError::from_status`]; both the
/// reqwest transport and the test fake go through that single mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401: the API key is invalid or expired.
    #[error("Unauthorized: API key rejected by the panel")]
    Unauthorized,

    /// HTTP 403: the API key has no access to the target server.
    #[error("Forbidden: no access to {path}")]
    Forbidden { path: String },

    /// HTTP 404: server, task or backup id does not exist.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// HTTP 409: the panel rejected the task details.
    #[error("Invalid task details: {message}")]
    Conflict { message: String },

    /// HTTP 500.
    #[error("Panel server error: {message}")]
    ServerSide { message: String },

    #[error("Unrecognized HTTP status {status}")]
    UnrecognizedStatus { status: u16 },

    /// Connect, TLS, timeout and body-read failures.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed JSON from panel: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Map a non-success HTTP status to its typed error.
    pub fn from_status(status: u16, path: &str, body: &str) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden {
                path: path.to_string(),
            },
            404 => ApiError::NotFound {
                path: path.to_string(),
            },
            409 => ApiError::Conflict {
                message: body.to_string(),
            },
            500 => ApiError::ServerSide {
                message: body.to_string(),
            },
            other => ApiError::UnrecognizedStatus { status: other },
        }
    }

    /// Short error code string for logs and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Forbidden { .. } => "NO_SERVER_ACCESS",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Conflict { .. } => "INVALID_TASK_DETAILS",
            ApiError::ServerSide { .. } => "SERVER_SIDE_ERROR",
            ApiError::UnrecognizedStatus { .. } => "UNRECOGNIZED_STATUS",
            ApiError::Http(_) => "TRANSPORT_ERROR",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// The HTTP status this error was built from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Conflict { .. } => Some(409),
            ApiError::ServerSide { .. } => Some(500),
            ApiError::UnrecognizedStatus { status } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) | ApiError::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_known_codes() {
        assert!(matches!(ApiError::from_status(401, "/x", ""), ApiError::Unauthorized));
        assert!(matches!(
            ApiError::from_status(403, "/x", ""),
            ApiError::Forbidden { .. }
        ));
        assert!(matches!(
            ApiError::from_status(404, "/x", ""),
            ApiError::NotFound { ref path } if path == "/x"
        ));
        assert!(matches!(
            ApiError::from_status(409, "/x", "bad timing"),
            ApiError::Conflict { ref message } if message == "bad timing"
        ));
        assert!(matches!(
            ApiError::from_status(500, "/x", "boom"),
            ApiError::ServerSide { .. }
        ));
    }

    #[test]
    fn unknown_status_keeps_raw_code() {
        let err = ApiError::from_status(418, "/x", "");
        assert!(matches!(err, ApiError::UnrecognizedStatus { status: 418 }));
        assert_eq!(err.status(), Some(418));
        assert_eq!(err.code(), "UNRECOGNIZED_STATUS");
    }
}
