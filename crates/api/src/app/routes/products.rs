//! Product detail and quantity-bounds routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use houndwear_core::{ProductId, Size};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/:id", get(detail))
        .route("/:id/bounds", get(bounds))
}

/// `GET /products/:id` — product fields plus the in-stock size list and
/// the size the selector should preselect.
pub async fn detail(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.query.product_detail(id).await {
        Ok(Some(detail)) => (StatusCode::OK, Json(dto::detail_to_json(&detail))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `GET /products/:id/bounds?size=M` — the allowed quantity range for one
/// size, read fresh from stock. Clients rebind on every size change.
pub async fn bounds(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::BoundsQuery>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let size: Size = match query.size.parse() {
        Ok(size) => size,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.guard.bounds_for(id, size).await {
        Ok(bounds) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "size": size,
                "min": bounds.min,
                "max": bounds.max,
                "in_stock": bounds.permits_purchase(),
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
