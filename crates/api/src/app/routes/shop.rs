//! Shopper-facing catalog routes: filtered listing and facets.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list))
        .route("/facets", get(facets))
}

/// `GET /shop?search=&category=&size=` — filtered listing, recomputed from
/// live rows on every call. The response echoes the applied params so the
/// view round-trips into a shareable query string.
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ShopQuery>,
) -> axum::response::Response {
    let params = match query.into_filter() {
        Ok(params) => params,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.query.filter(&params).await {
        Ok(items) => (
            StatusCode::OK,
            Json(dto::shop_page_to_json(&params, &items)),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `GET /shop/facets` — category and in-stock size facets with the "All"
/// sentinels first.
pub async fn facets(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.query.facets().await {
        Ok(facets) => (StatusCode::OK, Json(facets)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
