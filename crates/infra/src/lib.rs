//! Infrastructure layer: catalog storage adapters and the store-coupled
//! services that keep stock, catalog reads, and the cart consistent.

pub mod catalog_store;
pub mod reconcile;
pub mod query;
pub mod guard;
pub mod fence;
pub mod cart_file;
pub mod session;
