pub mod access;
pub mod backend;
pub mod routes;
pub mod session;

pub use access::{AccessState, Requirement, ViewPermission};
pub use backend::BookingBackend;
pub use routes::{Navigator, Page, Route};
pub use session::{MemoryStorage, Session, SessionEvent, SessionSnapshot, SessionStorage};

/// Failures surfaced to the views as transient notifications. None of them
/// is fatal to a view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Authentication required: {0}")]
    AuthRequired(String),
    #[error("Access denied: {0}")]
    Forbidden(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Text for the toast shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => "Network error. Please check your connection.".to_string(),
            ClientError::AuthRequired(_) => "Authentication required. Please log in.".to_string(),
            ClientError::Forbidden(msg) | ClientError::Validation(msg) | ClientError::NotFound(msg) => {
                msg.clone()
            }
            ClientError::Server(_) => "Server error. Please try again later.".to_string(),
            ClientError::Decode(_) => "Unexpected response from the server.".to_string(),
            ClientError::Storage(_) => "Could not access session storage.".to_string(),
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, ClientError::AuthRequired(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = ClientError::Validation("Invalid dates".to_string());
        assert_eq!(err.user_message(), "Invalid dates");
        let err = ClientError::Server("500 from upstream".to_string());
        assert_eq!(err.user_message(), "Server error. Please try again later.");
        assert!(ClientError::AuthRequired("no token".into()).is_auth_required());
    }
}
