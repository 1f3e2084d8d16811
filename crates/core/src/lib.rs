//! `flashstock-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod sku;

pub use error::{DomainError, DomainResult};
pub use id::{RequesterId, ReservationId};
pub use sku::Sku;
