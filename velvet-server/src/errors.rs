use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;
use velvet_core::{AuthError, DatabaseError, StorageError, TokenError};

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Input failed schema validation, carries the per-field violations
    #[error("Request body is invalid")]
    Validation(ValidationErrors),
    /// The request itself is unusable (unparseable body, bad upload)
    #[error("{0}")]
    BadRequest(String),
    /// Missing, malformed, or unverifiable bearer token
    #[error("Invalid or missing token")]
    Unauthenticated,
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Valid token, insufficient role
    #[error("Admin privileges required")]
    Forbidden,
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    /// A delegate failed, the details are logged and never leaked
    #[error("Internal server error")]
    Upstream(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound {
                resource: _,
                identifier: _,
            } => StatusCode::NOT_FOUND,
            Self::Conflict {
                resource: _,
                field: _,
                value: _,
            } => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::Validation(errors) => json!({
                "error": self.to_string(),
                "fields": errors,
            }),
            Self::Upstream(internal) => {
                error!("Upstream failure: {internal}");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (self.as_status_code(), Json(body)).into_response()
    }
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            e => Self::Upstream(e.to_string()),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Db(e) => e.into(),
            e => Self::Upstream(e.to_string()),
        }
    }
}

impl From<TokenError> for ServerError {
    fn from(_: TokenError) -> Self {
        Self::Unauthenticated
    }
}

impl From<StorageError> for ServerError {
    fn from(value: StorageError) -> Self {
        Self::Upstream(value.to_string())
    }
}
