use thiserror::Error;
use warden_core::ApiError;

/// Errors from the server, console and backup gateways.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The response body did not match the expected shape.
    #[error("Unexpected {what} payload: {reason}")]
    UnexpectedPayload { what: &'static str, reason: String },

    #[error("Console command is empty")]
    EmptyCommand,

    #[error("Server action {0} cannot be sent")]
    InvalidAction(warden_core::ServerAction),
}

impl ServerError {
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Api(e) => e.code(),
            ServerError::UnexpectedPayload { .. } => "UNEXPECTED_PAYLOAD",
            ServerError::EmptyCommand => "EMPTY_COMMAND",
            ServerError::InvalidAction(_) => "INVALID_SERVER_ACTION",
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    what: &'static str,
    body: serde_json::Value,
) -> Result<T> {
    serde_json::from_value(body).map_err(|e| ServerError::UnexpectedPayload {
        what,
        reason: e.to_string(),
    })
}

/// Accept either a bare array or an object wrapping it under `key`.
pub(crate) fn unwrap_list(
    what: &'static str,
    key: &str,
    body: serde_json::Value,
) -> Result<serde_json::Value> {
    match body {
        serde_json::Value::Array(items) => Ok(serde_json::Value::Array(items)),
        serde_json::Value::Object(mut obj) => {
            obj.remove(key).ok_or_else(|| ServerError::UnexpectedPayload {
                what,
                reason: format!("missing {key} field"),
            })
        }
        other => Err(ServerError::UnexpectedPayload {
            what,
            reason: format!("not a list: {other}"),
        }),
    }
}
