use reqwest::StatusCode;
use roomdesk_core::ClientError;
use serde::Deserialize;

/// Error body shapes the API is known to send.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Pull the human-readable message out of an error response, if any.
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Map a non-success response onto the client taxonomy, preferring the
/// server's own message where the category shows it to the user.
pub fn from_status(status: StatusCode, body: &str) -> ClientError {
    let message = server_message(body);
    match status {
        StatusCode::UNAUTHORIZED => ClientError::AuthRequired(
            message.unwrap_or_else(|| "Authentication required. Please log in.".to_string()),
        ),
        StatusCode::FORBIDDEN => ClientError::Forbidden(
            message.unwrap_or_else(|| "Access denied.".to_string()),
        ),
        StatusCode::NOT_FOUND => ClientError::NotFound(
            message.unwrap_or_else(|| "Resource not found.".to_string()),
        ),
        StatusCode::PAYLOAD_TOO_LARGE => ClientError::Validation(
            message.unwrap_or_else(|| "Request is too large.".to_string()),
        ),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(message.unwrap_or_else(|| "Invalid request.".to_string()))
        }
        _ => ClientError::Server(format!(
            "{}: {}",
            status,
            message.unwrap_or_else(|| "no details".to_string())
        )),
    }
}

/// Failures before any status was received.
pub fn from_transport(err: reqwest::Error) -> ClientError {
    if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else {
        ClientError::Transport(err.to_string())
    }
}
