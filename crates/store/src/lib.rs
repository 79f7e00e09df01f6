//! `coffeedocket-store` — the storage/identity boundary.
//!
//! The original deployment delegated persistence and identity to a hosted
//! backend; here that collaborator is a set of traits. `InMemoryStore` and
//! `InMemoryIdentityProvider` are the dev/test doubles; `PostgresStore`
//! (feature `postgres`) is the persistent backend. The schema for the
//! Postgres backend lives in `schema.sql` next to this crate.

pub mod customers;
pub mod error;
pub mod identity;
pub mod memory;
pub mod menu;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod transactions;

pub use customers::{CustomerPatch, CustomerStore};
pub use error::StoreError;
pub use identity::{
    IdentityAccount, IdentityAdminUpdate, IdentityProvider, IdentityUpdate,
};
pub use memory::{InMemoryIdentityProvider, InMemoryStore};
pub use menu::{MenuAddonPatch, MenuItemPatch, MenuSizePatch, MenuStore};
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
pub use transactions::TransactionStore;
