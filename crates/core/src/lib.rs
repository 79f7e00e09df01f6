//! `coffeedocket-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, MenuAddonId, MenuItemId, MenuSizeId, StaffId, TransactionId};
pub use money::Money;
