use async_trait::async_trait;

use coffeedocket_core::CustomerId;
use coffeedocket_ledger::{Customer, Transaction, TransactionDraft};

use crate::error::StoreError;

/// Transaction log operations.
///
/// The log is append-only: there is deliberately no update or delete here.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Atomically record a transaction and apply its effect to the customer.
    ///
    /// Either both the log entry and the updated customer row persist, or
    /// neither does. Concurrent transactions against the same customer
    /// serialize (the balance reflects every event exactly once). The
    /// overdraft guard runs inside the same critical section so a racing
    /// serve cannot slip past it.
    async fn apply_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<(Transaction, Customer), StoreError>;

    /// A customer's history, newest first.
    async fn list_transactions_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Full history across customers, newest first.
    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError>;
}
