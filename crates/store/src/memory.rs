//! In-memory store and identity double.
//!
//! The dev/test stand-in for the hosted backend. A single mutex guards all
//! tables, which makes the record-transaction-and-update-customer pair
//! trivially atomic and serialized.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use coffeedocket_auth::Role;
use coffeedocket_core::{CustomerId, MenuAddonId, MenuItemId, MenuSizeId};
use coffeedocket_ledger::{
    apply_transaction, check_serve_allowed, Customer, OverdraftPolicy, Transaction,
    TransactionDraft, TransactionKind,
};
use coffeedocket_menu::{MenuAddon, MenuItem, MenuSize};

use crate::customers::{merge_patch, CustomerPatch, CustomerStore};
use crate::error::StoreError;
use crate::identity::{
    IdentityAccount, IdentityAdminUpdate, IdentityProvider, IdentityUpdate,
};
use crate::menu::{MenuAddonPatch, MenuItemPatch, MenuSizePatch, MenuStore};
use crate::transactions::TransactionStore;

#[derive(Default)]
struct State {
    customers: HashMap<CustomerId, Customer>,
    transactions: Vec<Transaction>,
    items: HashMap<MenuItemId, MenuItem>,
    sizes: HashMap<MenuSizeId, MenuSize>,
    addons: HashMap<MenuAddonId, MenuAddon>,
}

pub struct InMemoryStore {
    state: Mutex<State>,
    policy: OverdraftPolicy,
}

impl InMemoryStore {
    pub fn new(policy: OverdraftPolicy) -> Self {
        Self {
            state: Mutex::new(State::default()),
            policy,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(OverdraftPolicy::default())
    }
}

fn newest_first<T, F: Fn(&T) -> chrono::DateTime<Utc>>(mut rows: Vec<T>, created_at: F) -> Vec<T> {
    rows.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    rows
}

#[async_trait]
impl CustomerStore for InMemoryStore {
    async fn insert_customer(&self, customer: Customer) -> Result<Customer, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, StoreError> {
        let state = self.state.lock().unwrap();
        state.customers.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(newest_first(
            state.customers.values().cloned().collect(),
            |c| c.created_at,
        ))
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, StoreError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list_customers().await;
        }
        let state = self.state.lock().unwrap();
        let matches = state
            .customers
            .values()
            .filter(|c| {
                c.first_name.to_lowercase().contains(&needle)
                    || c.last_name.to_lowercase().contains(&needle)
                    || c.email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        Ok(newest_first(matches, |c| c.created_at))
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .customers
            .values()
            .find(|c| c.email.as_deref() == Some(email))
            .cloned())
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Customer, StoreError> {
        let mut state = self.state.lock().unwrap();
        let customer = state.customers.get_mut(&id).ok_or(StoreError::NotFound)?;
        merge_patch(customer, patch);
        customer.updated_at = Utc::now();
        customer.version += 1;
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .customers
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn apply_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<(Transaction, Customer), StoreError> {
        draft.validate()?;
        let mut state = self.state.lock().unwrap();
        let customer = state
            .customers
            .get_mut(&draft.customer_id)
            .ok_or(StoreError::NotFound)?;

        if draft.kind == TransactionKind::Serve {
            check_serve_allowed(customer, draft.coffee_count, self.policy)?;
        }

        let now = Utc::now();
        let tx = Transaction::from_draft(draft, now)?;
        apply_transaction(customer, &tx, now)?;
        let updated = customer.clone();
        state.transactions.push(tx.clone());
        Ok((tx, updated))
    }

    async fn list_transactions_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(newest_first(
            state
                .transactions
                .iter()
                .filter(|t| t.customer_id == customer_id)
                .cloned()
                .collect(),
            |t| t.created_at,
        ))
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(newest_first(state.transactions.clone(), |t| t.created_at))
    }
}

#[async_trait]
impl MenuStore for InMemoryStore {
    async fn insert_item(&self, item: MenuItem) -> Result<MenuItem, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: MenuItemId) -> Result<MenuItem, StoreError> {
        let state = self.state.lock().unwrap();
        state.items.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(newest_first(state.items.values().cloned().collect(), |i| {
            i.created_at
        }))
    }

    async fn update_item(
        &self,
        id: MenuItemId,
        patch: MenuItemPatch,
    ) -> Result<MenuItem, StoreError> {
        let mut state = self.state.lock().unwrap();
        let item = state.items.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(price) = patch.price {
            item.price = price;
        }
        if let Some(available) = patch.available {
            item.available = available;
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete_item(&self, id: MenuItemId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.items.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn insert_size(&self, size: MenuSize) -> Result<MenuSize, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.sizes.insert(size.id, size.clone());
        Ok(size)
    }

    async fn get_size(&self, id: MenuSizeId) -> Result<MenuSize, StoreError> {
        let state = self.state.lock().unwrap();
        state.sizes.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_sizes(&self) -> Result<Vec<MenuSize>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(newest_first(state.sizes.values().cloned().collect(), |s| {
            s.created_at
        }))
    }

    async fn update_size(
        &self,
        id: MenuSizeId,
        patch: MenuSizePatch,
    ) -> Result<MenuSize, StoreError> {
        let mut state = self.state.lock().unwrap();
        let size = state.sizes.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            size.name = name;
        }
        if let Some(price_modifier) = patch.price_modifier {
            size.price_modifier = price_modifier;
        }
        if let Some(available) = patch.available {
            size.available = available;
        }
        size.updated_at = Utc::now();
        Ok(size.clone())
    }

    async fn delete_size(&self, id: MenuSizeId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.sizes.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn insert_addon(&self, addon: MenuAddon) -> Result<MenuAddon, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.addons.insert(addon.id, addon.clone());
        Ok(addon)
    }

    async fn get_addon(&self, id: MenuAddonId) -> Result<MenuAddon, StoreError> {
        let state = self.state.lock().unwrap();
        state.addons.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_addons(&self) -> Result<Vec<MenuAddon>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(newest_first(state.addons.values().cloned().collect(), |a| {
            a.created_at
        }))
    }

    async fn update_addon(
        &self,
        id: MenuAddonId,
        patch: MenuAddonPatch,
    ) -> Result<MenuAddon, StoreError> {
        let mut state = self.state.lock().unwrap();
        let addon = state.addons.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            addon.name = name;
        }
        if let Some(price_modifier) = patch.price_modifier {
            addon.price_modifier = price_modifier;
        }
        if let Some(available) = patch.available {
            addon.available = available;
        }
        addon.updated_at = Utc::now();
        Ok(addon.clone())
    }

    async fn delete_addon(&self, id: MenuAddonId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .addons
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

struct AccountRecord {
    account: IdentityAccount,
    password: String,
}

/// Identity test double. Stores passwords in the clear; never use outside
/// dev/test wiring.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<Uuid, AccountRecord>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(
        &self,
        account_id: Uuid,
        email: &str,
        password: &str,
        display_name: &str,
        role: Option<Role>,
    ) -> Result<IdentityAccount, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|r| r.account.email == email) {
            return Err(StoreError::conflict(format!(
                "an account already exists for {email}"
            )));
        }
        let account = IdentityAccount {
            id: account_id,
            email: email.to_string(),
            display_name: display_name.to_string(),
            role,
            created_at: Utc::now(),
        };
        accounts.insert(
            account_id,
            AccountRecord {
                account: account.clone(),
                password: password.to_string(),
            },
        );
        Ok(account)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        accounts
            .values()
            .find(|r| r.account.email == email && r.password == password)
            .map(|r| r.account.clone())
            .ok_or(StoreError::InvalidCredentials)
    }

    async fn sign_out(&self, _account_id: Uuid) -> Result<(), StoreError> {
        // Tokens are stateless; nothing to revoke in the double.
        Ok(())
    }

    async fn reset_password_for_email(&self, _email: &str) -> Result<(), StoreError> {
        // The real provider sends an email; the double acknowledges silently
        // regardless, so existence of an account is not observable.
        Ok(())
    }

    async fn update_user(
        &self,
        account_id: Uuid,
        update: IdentityUpdate,
    ) -> Result<IdentityAccount, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(email) = &update.email {
            if accounts
                .iter()
                .any(|(id, r)| *id != account_id && r.account.email == *email)
            {
                return Err(StoreError::conflict(format!(
                    "an account already exists for {email}"
                )));
            }
        }
        let record = accounts.get_mut(&account_id).ok_or(StoreError::NotFound)?;
        if let Some(email) = update.email {
            record.account.email = email;
        }
        if let Some(password) = update.password {
            record.password = password;
        }
        Ok(record.account.clone())
    }

    async fn admin_list_users(&self) -> Result<Vec<IdentityAccount>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        let mut all: Vec<_> = accounts.values().map(|r| r.account.clone()).collect();
        all.sort_by_key(|a| std::cmp::Reverse(a.created_at));
        Ok(all)
    }

    async fn admin_delete_user(&self, account_id: Uuid) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        accounts
            .remove(&account_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn admin_update_user(
        &self,
        account_id: Uuid,
        update: IdentityAdminUpdate,
    ) -> Result<IdentityAccount, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let record = accounts.get_mut(&account_id).ok_or(StoreError::NotFound)?;
        if let Some(email) = update.email {
            record.account.email = email;
        }
        if let Some(display_name) = update.display_name {
            record.account.display_name = display_name;
        }
        if let Some(role) = update.role {
            record.account.role = Some(role);
        }
        Ok(record.account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeedocket_core::{Money, StaffId};
    use coffeedocket_ledger::NewCustomer;

    async fn seed_customer(
        store: &InMemoryStore,
        first: &str,
        last: &str,
        email: Option<&str>,
    ) -> Customer {
        let customer = NewCustomer {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.map(str::to_string),
            phone: None,
            notify_email: false,
            notify_sms: false,
        }
        .into_customer(CustomerId::new(), Utc::now())
        .unwrap();
        store.insert_customer(customer).await.unwrap()
    }

    fn draft(customer_id: CustomerId, kind: TransactionKind, count: i64) -> TransactionDraft {
        TransactionDraft {
            customer_id,
            staff_id: StaffId::new(),
            kind,
            coffee_count: count,
            amount: None,
            drink: None,
            size: None,
            addons: vec![],
            discount: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn apply_transaction_updates_customer_and_log_together() {
        let store = InMemoryStore::default();
        let c = seed_customer(&store, "Ada", "Lovelace", Some("ada@example.com")).await;

        store
            .apply_transaction(draft(c.id, TransactionKind::Topup, 10))
            .await
            .unwrap();
        let (tx, updated) = store
            .apply_transaction(draft(c.id, TransactionKind::Serve, 1))
            .await
            .unwrap();

        assert_eq!(updated.balance, 9);
        assert_eq!(updated.visit_count, 1);
        assert_eq!(tx.kind, TransactionKind::Serve);

        let history = store.list_transactions_for_customer(c.id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn serve_rejected_when_overdrawn_and_nothing_recorded() {
        let store = InMemoryStore::default();
        let c = seed_customer(&store, "Ada", "Lovelace", None).await;

        let err = store
            .apply_transaction(draft(c.id, TransactionKind::Serve, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // The failed serve left no trace: no log entry, no counter movement.
        assert!(store.list_transactions().await.unwrap().is_empty());
        let fresh = store.get_customer(c.id).await.unwrap();
        assert_eq!(fresh.balance, 0);
        assert_eq!(fresh.visit_count, 0);
    }

    #[tokio::test]
    async fn allow_overdraw_policy_lets_balance_go_negative() {
        let store = InMemoryStore::new(OverdraftPolicy::AllowOverdraw);
        let c = seed_customer(&store, "Ada", "Lovelace", None).await;

        let (_, updated) = store
            .apply_transaction(draft(c.id, TransactionKind::Serve, 2))
            .await
            .unwrap();
        assert_eq!(updated.balance, -2);
    }

    #[tokio::test]
    async fn transaction_against_unknown_customer_is_not_found() {
        let store = InMemoryStore::default();
        let err = store
            .apply_transaction(draft(CustomerId::new(), TransactionKind::Topup, 1))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn search_matches_name_and_email_case_insensitively() {
        let store = InMemoryStore::default();
        seed_customer(&store, "Ada", "Lovelace", Some("ada@example.com")).await;
        seed_customer(&store, "Grace", "Hopper", Some("grace@navy.mil")).await;

        let hits = store.search_customers("LOVEL").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name, "Ada");

        let hits = store.search_customers("navy").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name, "Grace");

        assert!(store.search_customers("nobody").await.unwrap().is_empty());
        // Cleared query returns the full list.
        assert_eq!(store.search_customers("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive_exact() {
        let store = InMemoryStore::default();
        seed_customer(&store, "Ada", "Lovelace", Some("Ada@Example.com")).await;

        assert!(store
            .find_customer_by_email("Ada@Example.com")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_customer_by_email("ada@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deleted_customer_is_gone() {
        let store = InMemoryStore::default();
        let c = seed_customer(&store, "Ada", "Lovelace", None).await;
        store.delete_customer(c.id).await.unwrap();
        assert_eq!(store.get_customer(c.id).await.unwrap_err(), StoreError::NotFound);
        assert_eq!(
            store.delete_customer(c.id).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn patch_updates_only_named_fields() {
        let store = InMemoryStore::default();
        let c = seed_customer(&store, "Ada", "Lovelace", Some("ada@example.com")).await;

        let updated = store
            .update_customer(
                c.id,
                CustomerPatch {
                    phone: Some(Some("+1555".to_string())),
                    notify_sms: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.phone.as_deref(), Some("+1555"));
        assert!(updated.notify_sms);
        assert_eq!(updated.version, c.version + 1);
    }

    #[tokio::test]
    async fn identity_double_signup_signin_delete() {
        let idp = InMemoryIdentityProvider::new();
        let id = Uuid::now_v7();
        idp.sign_up(id, "ada@example.com", "hunter2", "Ada Lovelace", None)
            .await
            .unwrap();

        // Duplicate email rejected.
        let err = idp
            .sign_up(Uuid::now_v7(), "ada@example.com", "x", "Imposter", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        assert!(idp
            .sign_in_with_password("ada@example.com", "wrong")
            .await
            .is_err());
        let account = idp
            .sign_in_with_password("ada@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(account.id, id);

        idp.admin_delete_user(id).await.unwrap();
        assert!(idp
            .sign_in_with_password("ada@example.com", "hunter2")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn menu_crud_round_trip() {
        use coffeedocket_menu::NewMenuItem;

        let store = InMemoryStore::default();
        let item = NewMenuItem {
            name: "flat white".to_string(),
            category: "espresso".to_string(),
            price: Money::from_cents(420).unwrap(),
            available: true,
        }
        .into_item(MenuItemId::new(), Utc::now())
        .unwrap();

        let inserted = store.insert_item(item).await.unwrap();
        let patched = store
            .update_item(
                inserted.id,
                MenuItemPatch {
                    available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!patched.available);
        assert_eq!(patched.name, "flat white");

        store.delete_item(inserted.id).await.unwrap();
        assert_eq!(
            store.get_item(inserted.id).await.unwrap_err(),
            StoreError::NotFound
        );
    }
}
