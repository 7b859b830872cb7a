use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;

use crate::store::StoreError;

/// Everything a handler can answer with. The display string is the response
/// body; internal causes are logged before collapsing to [`AuthError::Internal`]
/// and never reach the client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing or empty username/password, or an unreadable request body.
    #[error("Username and password required")]
    Validation,

    /// The requested username is taken.
    #[error("User already exists")]
    DuplicateUsername,

    /// Unknown username or wrong password. Deliberately one variant for
    /// both, so responses cannot be used to enumerate usernames.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Anything unexpected. The body stays generic.
    #[error("Server error")]
    Internal,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation => StatusCode::BAD_REQUEST,
            AuthError::DuplicateUsername => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> AuthError {
        match err {
            StoreError::DuplicateUsername => AuthError::DuplicateUsername,
            other => {
                error!("storage failure: {}", other);
                AuthError::Internal
            }
        }
    }
}

impl From<BlockingError> for AuthError {
    fn from(err: BlockingError) -> AuthError {
        error!("blocking pool failure: {}", err);
        AuthError::Internal
    }
}
