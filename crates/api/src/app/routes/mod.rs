use axum::{Router, routing::get};

pub mod admin;
pub mod products;
pub mod shop;
pub mod system;

/// Router for everything except the bare health probe.
pub fn router() -> Router {
    Router::new()
        .route("/stream", get(system::stream))
        .nest("/shop", shop::router())
        .nest("/products", products::router())
        .nest("/admin", admin::router())
}
