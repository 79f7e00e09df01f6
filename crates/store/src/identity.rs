//! Identity provider boundary.
//!
//! Auth protocol internals (hashing, token refresh, email delivery) belong to
//! the external identity service and stay behind this trait. The `admin_*`
//! operations correspond to the provider's privileged surface and are only
//! reachable through admin-gated routes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coffeedocket_auth::Role;

use crate::error::StoreError;

/// An account held by the identity provider.
///
/// Customer accounts carry no role; staff/admin accounts carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAccount {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
}

/// Self-service account update (email and/or password).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Privileged account update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAdminUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. `account_id` lets the caller link the account to
    /// an application row (a customer id) so deletes can cascade.
    async fn sign_up(
        &self,
        account_id: Uuid,
        email: &str,
        password: &str,
        display_name: &str,
        role: Option<Role>,
    ) -> Result<IdentityAccount, StoreError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, StoreError>;

    async fn sign_out(&self, account_id: Uuid) -> Result<(), StoreError>;

    /// Request a password reset. Succeeds silently for unknown emails so the
    /// endpoint does not leak which addresses have accounts.
    async fn reset_password_for_email(&self, email: &str) -> Result<(), StoreError>;

    async fn update_user(
        &self,
        account_id: Uuid,
        update: IdentityUpdate,
    ) -> Result<IdentityAccount, StoreError>;

    async fn admin_list_users(&self) -> Result<Vec<IdentityAccount>, StoreError>;

    async fn admin_delete_user(&self, account_id: Uuid) -> Result<(), StoreError>;

    async fn admin_update_user(
        &self,
        account_id: Uuid,
        update: IdentityAdminUpdate,
    ) -> Result<IdentityAccount, StoreError>;
}
