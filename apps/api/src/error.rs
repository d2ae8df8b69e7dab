//! # Service Errors
//!
//! The error taxonomy every handler speaks, and its HTTP rendering.
//!
//! ## Mapping
//! ```text
//! ┌──────────────────────────────┬─────────────────────┬────────┐
//! │ Source                       │ ServiceError        │ Status │
//! ├──────────────────────────────┼─────────────────────┼────────┤
//! │ CoreError::Validation        │ Validation          │ 400    │
//! │ DbError::CheckViolation      │ Validation          │ 400    │
//! │ bad JSON / bad path          │ Validation          │ 400    │
//! │ CoreError::NotFound          │ NotFound            │ 404    │
//! │ CoreError::InsufficientStock │ InsufficientStock   │ 409    │
//! │ CoreError::InvalidOrderStatus│ Conflict            │ 409    │
//! │ CoreError::Conflict          │ Conflict            │ 409    │
//! │ DbError::ForeignKeyViolation │ Conflict            │ 409    │
//! │ Busy / pool / timeout        │ Unavailable         │ 503    │
//! │ anything else                │ Internal            │ 500    │
//! └──────────────────────────────┴─────────────────────┴────────┘
//! ```
//!
//! Every response body has the shape `{"error": <code>, "message": <text>}`.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hotcoffee_core::CoreError;
use hotcoffee_db::DbError;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{error, warn};

/// Result alias for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InsufficientStock(String),

    /// Retriable: the store was busy or the call ran out of time.
    #[error("{0}")]
    Unavailable(String),

    /// Details are logged, never returned.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) | ServiceError::InsufficientStock(_) => StatusCode::CONFLICT,
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::InsufficientStock(_) => "insufficient_stock",
            ServiceError::Unavailable(_) => "unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_))
    }

    /// Translate a repository failure, tagging the log line with `op`.
    pub fn from_db(op: &'static str, err: DbError) -> Self {
        let mapped = match err {
            DbError::Domain(core) => match core {
                CoreError::Validation(v) => ServiceError::Validation(v.to_string()),
                e @ CoreError::NotFound { .. } => ServiceError::NotFound(e.to_string()),
                e @ CoreError::InsufficientStock { .. } => {
                    ServiceError::InsufficientStock(e.to_string())
                }
                e @ (CoreError::InvalidOrderStatus { .. } | CoreError::Conflict(_)) => {
                    ServiceError::Conflict(e.to_string())
                }
            },
            e @ DbError::NotFound { .. } => ServiceError::NotFound(e.to_string()),
            e @ DbError::ForeignKeyViolation { .. } => ServiceError::Conflict(e.to_string()),
            e @ DbError::CheckViolation { .. } => ServiceError::Validation(e.to_string()),
            e if e.is_retriable() => {
                warn!(op, error = %e, "store unavailable");
                return ServiceError::Unavailable(format!("{op}: database is busy, retry later"));
            }
            e => {
                error!(op, error = %e, "database operation failed");
                return ServiceError::Internal(format!("{op} failed"));
            }
        };

        warn!(op, code = mapped.code(), reason = %mapped, "request rejected");
        mapped
    }
}

/// Render a `{error, message}` body with the given status.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.code(), self.to_string())
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// `Json<T>` whose rejection is a [`ServiceError::Validation`].
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ServiceError {
    ServiceError::Validation(rejection.body_text())
}

/// Numeric `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(IdPath(id)),
            Err(_) => Err(ServiceError::Validation(
                "id must be an integer".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotcoffee_core::{OrderStatus, Quantity, ValidationError};

    #[test]
    fn test_domain_mapping() {
        let cases = [
            (
                DbError::from(ValidationError::Required {
                    field: "name".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                DbError::Domain(CoreError::not_found("Order", 9)),
                StatusCode::NOT_FOUND,
            ),
            (
                DbError::Domain(CoreError::InsufficientStock {
                    ingredient_id: 1,
                    ingredient: "Milk".into(),
                    available: Quantity::from_units(100),
                    requested: Quantity::from_units(200),
                }),
                StatusCode::CONFLICT,
            ),
            (
                DbError::Domain(CoreError::InvalidOrderStatus {
                    order_id: 1,
                    current_status: OrderStatus::Closed,
                }),
                StatusCode::CONFLICT,
            ),
            (DbError::not_found("Order", 3), StatusCode::NOT_FOUND),
            (
                DbError::ForeignKeyViolation {
                    message: "FOREIGN KEY constraint failed".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                DbError::CheckViolation {
                    message: "quantity_milli".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (DbError::Busy, StatusCode::SERVICE_UNAVAILABLE),
            (DbError::PoolExhausted, StatusCode::SERVICE_UNAVAILABLE),
            (
                DbError::QueryFailed("syntax".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ServiceError::from_db("test", err).status(), status);
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            ServiceError::InsufficientStock(String::new()).code(),
            "insufficient_stock"
        );
        assert_eq!(ServiceError::Conflict(String::new()).code(), "conflict");
        assert!(ServiceError::Unavailable(String::new()).is_retriable());
        assert!(!ServiceError::Internal(String::new()).is_retriable());
    }

    #[test]
    fn test_internal_hides_details() {
        let err = ServiceError::from_db("list orders", DbError::Internal("disk I/O".into()));
        assert_eq!(err.to_string(), "list orders failed");
    }
}
