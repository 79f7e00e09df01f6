use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use coffeedocket_core::CustomerId;
use coffeedocket_ledger::{Customer, CustomerStatus};

use crate::error::StoreError;

/// Partial profile update. `None` fields keep their current value;
/// `Some(None)` on the nullable fields clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub status: Option<CustomerStatus>,
    pub notify_email: Option<bool>,
    pub notify_sms: Option<bool>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self == &CustomerPatch::default()
    }
}

/// Customer table operations.
///
/// `list` and `search` return rows in descending creation order. `search`
/// is a case-insensitive substring match over first name, last name, and
/// email; an empty query is the unfiltered list.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn insert_customer(&self, customer: Customer) -> Result<Customer, StoreError>;

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, StoreError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;

    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, StoreError>;

    /// Exact, case-sensitive email lookup (the duplicate-signup pre-check).
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError>;

    async fn update_customer(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Customer, StoreError>;

    /// Hard delete. The identity cascade is orchestrated by the caller.
    async fn delete_customer(&self, id: CustomerId) -> Result<(), StoreError>;
}

/// Apply a patch to a snapshot; shared by both backends so the merge
/// semantics cannot drift apart.
pub(crate) fn merge_patch(customer: &mut Customer, patch: CustomerPatch) {
    if let Some(first_name) = patch.first_name {
        customer.first_name = first_name;
    }
    if let Some(last_name) = patch.last_name {
        customer.last_name = last_name;
    }
    if let Some(email) = patch.email {
        customer.email = email;
    }
    if let Some(phone) = patch.phone {
        customer.phone = phone;
    }
    if let Some(status) = patch.status {
        customer.status = status;
    }
    if let Some(notify_email) = patch.notify_email {
        customer.notify_email = notify_email;
    }
    if let Some(notify_sms) = patch.notify_sms {
        customer.notify_sms = notify_sms;
    }
}
