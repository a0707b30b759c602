//! Error taxonomy for the economy core.
//!
//! Every failure a handler can surface is one of these variants, each with a
//! stable reason code. Business-rule rejections (insufficient funds/inventory/
//! quantity) always mean the transaction was rolled back with no partial
//! effect; `Concurrency` is the only variant a client may safely retry.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::storage::catalog::TemplateStoreError;

/// Result alias used across the crate
pub type EconomyResult<T> = Result<T, EconomyError>;

#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    /// Malformed input, rejected before any I/O
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no recipe produces '{0}'")]
    NoSuchRecipe(String),
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: f64, need: f64 },
    #[error("insufficient inventory of '{item}': have {have}, need {need}")]
    InsufficientInventory { item: String, have: f64, need: f64 },
    #[error("not enough '{0}' to craft with")]
    InsufficientIngredient(String),
    #[error("requested {requested} but listing holds {available}")]
    InsufficientQuantity { requested: f64, available: f64 },
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// Reward weight table is empty or was never built
    #[error("reward table not initialized")]
    NotInitialized,
    /// Lock/busy contention in the storage layer; safe to retry whole-operation
    #[error("storage contention: {0}")]
    Concurrency(String),
    /// A constraint the code guarantees was still violated; never absorbed
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("storage error: {0}")]
    Storage(sqlx::Error),
    #[error("catalog error: {0}")]
    Catalog(#[from] TemplateStoreError),
}

impl EconomyError {
    /// Stable machine-readable reason code
    pub fn reason_code(&self) -> &'static str {
        match self {
            EconomyError::Validation(_) => "VALIDATION",
            EconomyError::NotFound(_) => "NOT_FOUND",
            EconomyError::NoSuchRecipe(_) => "NO_SUCH_RECIPE",
            EconomyError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            EconomyError::InsufficientInventory { .. } => "INSUFFICIENT_INVENTORY",
            EconomyError::InsufficientIngredient(_) => "INSUFFICIENT_INGREDIENT",
            EconomyError::InsufficientQuantity { .. } => "INSUFFICIENT_QUANTITY",
            EconomyError::Forbidden(_) => "FORBIDDEN",
            EconomyError::InvalidOperation(_) => "INVALID_OPERATION",
            EconomyError::NotInitialized => "NOT_INITIALIZED",
            EconomyError::Concurrency(_) => "CONCURRENCY",
            EconomyError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            EconomyError::Storage(_) => "STORAGE",
            EconomyError::Catalog(_) => "CATALOG",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            EconomyError::Validation(_)
            | EconomyError::InsufficientFunds { .. }
            | EconomyError::InsufficientInventory { .. }
            | EconomyError::InsufficientIngredient(_)
            | EconomyError::InsufficientQuantity { .. } => StatusCode::BAD_REQUEST,
            EconomyError::NotFound(_) | EconomyError::NoSuchRecipe(_) => StatusCode::NOT_FOUND,
            EconomyError::Forbidden(_) => StatusCode::FORBIDDEN,
            EconomyError::InvalidOperation(_) => StatusCode::CONFLICT,
            EconomyError::NotInitialized | EconomyError::Concurrency(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            EconomyError::InvariantViolation(_)
            | EconomyError::Storage(_)
            | EconomyError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for EconomyError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            let msg = db.message();
            // SQLITE_BUSY / SQLITE_LOCKED surface as lock messages
            if msg.contains("locked") || msg.contains("busy") {
                return EconomyError::Concurrency(msg.to_string());
            }
            // CHECK constraints back up the in-transaction validation
            if msg.contains("CHECK constraint failed") {
                return EconomyError::InvariantViolation(msg.to_string());
            }
        }
        if matches!(err, sqlx::Error::RowNotFound) {
            return EconomyError::NotFound("row".to_string());
        }
        EconomyError::Storage(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    code: &'static str,
    message: String,
}

impl IntoResponse for EconomyError {
    fn into_response(self) -> Response {
        if matches!(self, EconomyError::InvariantViolation(_)) {
            error!("invariant violation surfaced to client: {}", self);
        }
        let status = self.status_code();
        let body = ErrorBody {
            status: status.as_u16(),
            code: self.reason_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_stable() {
        assert_eq!(
            EconomyError::InsufficientFunds { have: 1.0, need: 2.0 }.reason_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            EconomyError::Validation("bad".into()).reason_code(),
            "VALIDATION"
        );
        assert_eq!(EconomyError::NotInitialized.reason_code(), "NOT_INITIALIZED");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            EconomyError::Forbidden("not yours".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EconomyError::InvalidOperation("self purchase".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EconomyError::Concurrency("database is locked".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
