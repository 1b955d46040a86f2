use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use houndwear_core::DomainError;
use houndwear_infra::catalog_store::StoreError;
use houndwear_infra::reconcile::ReconcileError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation { field, message } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "field": field,
                "message": message,
            })),
        )
            .into_response(),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        other => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            other.to_string(),
        ),
    }
}

/// Reconciliation failures keep their structure on the wire: a partial
/// write reports the failing size, the committed prefix, and the skipped
/// suffix so the admin client can retry exactly what is missing.
pub fn reconcile_error_to_response(err: ReconcileError) -> axum::response::Response {
    match err {
        ReconcileError::Domain(e) => domain_error_to_response(e),
        ReconcileError::Store(e) => store_error_to_response(e),
        ReconcileError::PartialWrite {
            size,
            committed,
            skipped,
            source,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({
                "error": "partial_write",
                "message": source.to_string(),
                "size": size,
                "committed": committed,
                "skipped": skipped,
            })),
        )
            .into_response(),
    }
}
