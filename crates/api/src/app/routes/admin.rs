//! Admin routes: product create/edit (stock reconciliation), the product
//! table, and best-seller membership.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use houndwear_catalog::{BestSellerSet, ProductSubmission};
use houndwear_core::ProductId;
use houndwear_infra::catalog_store::CatalogStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route("/products/:id", put(update_product))
        .route("/products/:id/best", post(toggle_best_seller))
        .route("/best-sellers", get(best_sellers))
}

/// `POST /admin/products` — validate the submission and create the product
/// with one stock row per size.
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ProductSubmission>,
) -> axum::response::Response {
    match services.reconciler.create(body).await {
        Ok((product, report)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "product": dto::product_to_json(&product),
                "report": report,
            })),
        )
            .into_response(),
        Err(e) => errors::reconcile_error_to_response(e),
    }
}

/// `PUT /admin/products/:id` — converge an existing product's fields and
/// stock rows to the submission.
pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProductSubmission>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.reconciler.reconcile(id, body).await {
        Ok(report) => (StatusCode::OK, Json(serde_json::json!({ "report": report })))
            .into_response(),
        Err(e) => errors::reconcile_error_to_response(e),
    }
}

/// `GET /admin/products` — the product table: every product with its size
/// rows, total stock, discounted price, and best-seller flag.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.query.admin_products().await {
        Ok(rows) => {
            let items = rows.iter().map(dto::admin_row_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `GET /admin/best-sellers` — membership in stored order.
pub async fn best_sellers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.best_sellers().await {
        Ok(ids) => (StatusCode::OK, Json(serde_json::json!({ "ids": ids }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `POST /admin/products/:id/best` — flip best-seller membership.
///
/// Turning a sixth product on is rejected with the capacity invariant;
/// turning one off always succeeds. The change is saved wholesale and
/// announced on the catalog bus.
pub async fn toggle_best_seller(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store.get_product(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    let stored = match services.store.best_sellers().await {
        Ok(ids) => ids,
        Err(e) => return errors::store_error_to_response(e),
    };
    let mut set = match BestSellerSet::from_ids(stored) {
        Ok(set) => set,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let featured = match set.toggle(id) {
        Ok(featured) => featured,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store.save_best_sellers(set.ids()).await {
        return errors::store_error_to_response(e);
    }
    services.publish_best_sellers_changed(id, featured);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "product_id": id,
            "featured": featured,
        })),
    )
        .into_response()
}
