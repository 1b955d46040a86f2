//! `houndwear-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod price;
pub mod size;

pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use price::Price;
pub use size::Size;
