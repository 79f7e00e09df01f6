//! `coffeedocket-ledger` — customer records, the immutable transaction log,
//! and the balance arithmetic applied on each transaction.

pub mod apply;
pub mod customer;
pub mod transaction;

pub use apply::{apply_transaction, check_serve_allowed, OverdraftPolicy};
pub use customer::{Customer, CustomerStatus, NewCustomer};
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
