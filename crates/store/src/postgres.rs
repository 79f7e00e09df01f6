//! Postgres-backed store (feature `postgres`).
//!
//! The ledger write path is the one place that needs care: the transaction
//! insert and the customer update run inside a single SQL transaction, and
//! the customer update is a compare-and-swap on `version`. A contended row
//! is retried a bounded number of times before surfacing a conflict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::warn;

use coffeedocket_core::{
    CustomerId, MenuAddonId, MenuItemId, MenuSizeId, Money, StaffId, TransactionId,
};
use coffeedocket_ledger::{
    apply_transaction, check_serve_allowed, Customer, CustomerStatus, OverdraftPolicy,
    Transaction, TransactionDraft, TransactionKind,
};
use coffeedocket_menu::{MenuAddon, MenuItem, MenuSize};

use crate::customers::{merge_patch, CustomerPatch, CustomerStore};
use crate::error::StoreError;
use crate::menu::{MenuAddonPatch, MenuItemPatch, MenuSizePatch, MenuStore};
use crate::transactions::TransactionStore;

/// Bounded optimistic-concurrency retries on the customer row.
const MAX_CAS_ATTEMPTS: u32 = 3;

pub struct PostgresStore {
    pool: PgPool,
    policy: OverdraftPolicy,
}

impl PostgresStore {
    pub fn new(pool: PgPool, policy: OverdraftPolicy) -> Self {
        Self { pool, policy }
    }
}

fn money_from_cents(cents: i64, column: &str) -> Result<Money, StoreError> {
    Money::from_cents(cents)
        .map_err(|e| StoreError::Unavailable(format!("corrupt {column} column: {e}")))
}

fn status_from_str(s: &str) -> Result<CustomerStatus, StoreError> {
    match s {
        "active" => Ok(CustomerStatus::Active),
        "inactive" => Ok(CustomerStatus::Inactive),
        other => Err(StoreError::Unavailable(format!(
            "corrupt status column: {other:?}"
        ))),
    }
}

fn status_to_str(status: CustomerStatus) -> &'static str {
    match status {
        CustomerStatus::Active => "active",
        CustomerStatus::Inactive => "inactive",
    }
}

fn customer_from_row(row: &sqlx::postgres::PgRow) -> Result<Customer, StoreError> {
    Ok(Customer {
        id: CustomerId::from_uuid(row.try_get("id")?),
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        balance: row.try_get("balance")?,
        total_spent: money_from_cents(row.try_get("total_spent_cents")?, "total_spent_cents")?,
        visit_count: row.try_get("visit_count")?,
        status: status_from_str(row.try_get::<String, _>("status")?.as_str())?,
        notify_email: row.try_get("notify_email")?,
        notify_sms: row.try_get("notify_sms")?,
        last_visit: row.try_get::<Option<DateTime<Utc>>, _>("last_visit")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}

fn transaction_from_row(row: &sqlx::postgres::PgRow) -> Result<Transaction, StoreError> {
    let kind: String = row.try_get("kind")?;
    let amount: Option<i64> = row.try_get("amount_cents")?;
    let discount: Option<i64> = row.try_get("discount_cents")?;
    Ok(Transaction {
        id: TransactionId::from_uuid(row.try_get("id")?),
        customer_id: CustomerId::from_uuid(row.try_get("customer_id")?),
        staff_id: StaffId::from_uuid(row.try_get("staff_id")?),
        kind: kind
            .parse::<TransactionKind>()
            .map_err(|e| StoreError::Unavailable(format!("corrupt kind column: {e}")))?,
        coffee_count: row.try_get("coffee_count")?,
        amount: amount
            .map(|c| money_from_cents(c, "amount_cents"))
            .transpose()?,
        drink: row.try_get("drink")?,
        size: row.try_get("size")?,
        addons: row.try_get("addons")?,
        discount: discount
            .map(|c| money_from_cents(c, "discount_cents"))
            .transpose()?,
        notes: row.try_get("notes")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn item_from_row(row: &sqlx::postgres::PgRow) -> Result<MenuItem, StoreError> {
    Ok(MenuItem {
        id: MenuItemId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        price: money_from_cents(row.try_get("price_cents")?, "price_cents")?,
        available: row.try_get("available")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn size_from_row(row: &sqlx::postgres::PgRow) -> Result<MenuSize, StoreError> {
    Ok(MenuSize {
        id: MenuSizeId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        price_modifier: money_from_cents(row.try_get("price_modifier_cents")?, "price_modifier_cents")?,
        available: row.try_get("available")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn addon_from_row(row: &sqlx::postgres::PgRow) -> Result<MenuAddon, StoreError> {
    Ok(MenuAddon {
        id: MenuAddonId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        price_modifier: money_from_cents(row.try_get("price_modifier_cents")?, "price_modifier_cents")?,
        available: row.try_get("available")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CustomerStore for PostgresStore {
    async fn insert_customer(&self, customer: Customer) -> Result<Customer, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, first_name, last_name, email, phone,
                balance, total_spent_cents, visit_count, status,
                notify_email, notify_sms, last_visit, created_at, updated_at, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.balance)
        .bind(customer.total_spent.cents())
        .bind(customer.visit_count)
        .bind(status_to_str(customer.status))
        .bind(customer.notify_email)
        .bind(customer.notify_sms)
        .bind(customer.last_visit)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .bind(customer.version)
        .execute(&self.pool)
        .await?;
        Ok(customer)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Customer, StoreError> {
        let row = sqlx::query("SELECT * FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        customer_from_row(&row)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query("SELECT * FROM customers ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(customer_from_row).collect()
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, StoreError> {
        let needle = query.trim();
        if needle.is_empty() {
            return self.list_customers().await;
        }
        let pattern = format!("%{needle}%");
        let rows = sqlx::query(
            r#"
            SELECT * FROM customers
            WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(customer_from_row).collect()
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query("SELECT * FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(customer_from_row).transpose()
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Customer, StoreError> {
        for _attempt in 0..MAX_CAS_ATTEMPTS {
            let mut customer = self.get_customer(id).await?;
            let expected_version = customer.version;
            merge_patch(&mut customer, patch.clone());
            customer.updated_at = Utc::now();
            customer.version += 1;

            let result = sqlx::query(
                r#"
                UPDATE customers SET
                    first_name = $1, last_name = $2, email = $3, phone = $4,
                    status = $5, notify_email = $6, notify_sms = $7,
                    updated_at = $8, version = $9
                WHERE id = $10 AND version = $11
                "#,
            )
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .bind(&customer.phone)
            .bind(status_to_str(customer.status))
            .bind(customer.notify_email)
            .bind(customer.notify_sms)
            .bind(customer.updated_at)
            .bind(customer.version)
            .bind(id.as_uuid())
            .bind(expected_version)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 1 {
                return Ok(customer);
            }
            warn!(customer_id = %id, "customer row changed under profile update, retrying");
        }
        Err(StoreError::conflict(
            "customer row kept changing under update, please retry",
        ))
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for PostgresStore {
    async fn apply_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<(Transaction, Customer), StoreError> {
        draft.validate()?;

        for _attempt in 0..MAX_CAS_ATTEMPTS {
            let customer = self.get_customer(draft.customer_id).await?;
            let expected_version = customer.version;

            if draft.kind == TransactionKind::Serve {
                check_serve_allowed(&customer, draft.coffee_count, self.policy)?;
            }

            let now = Utc::now();
            let tx = Transaction::from_draft(draft.clone(), now)?;
            let mut updated = customer;
            apply_transaction(&mut updated, &tx, now)?;

            let mut db_tx = self.pool.begin().await?;

            sqlx::query(
                r#"
                INSERT INTO transactions (
                    id, customer_id, staff_id, kind, coffee_count,
                    amount_cents, drink, size, addons, discount_cents,
                    notes, description, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(tx.id.as_uuid())
            .bind(tx.customer_id.as_uuid())
            .bind(tx.staff_id.as_uuid())
            .bind(tx.kind.as_str())
            .bind(tx.coffee_count)
            .bind(tx.amount.map(|m| m.cents()))
            .bind(&tx.drink)
            .bind(&tx.size)
            .bind(&tx.addons)
            .bind(tx.discount.map(|m| m.cents()))
            .bind(&tx.notes)
            .bind(&tx.description)
            .bind(tx.created_at)
            .execute(&mut *db_tx)
            .await?;

            let result = sqlx::query(
                r#"
                UPDATE customers SET
                    balance = $1, total_spent_cents = $2, visit_count = $3,
                    last_visit = $4, updated_at = $5, version = $6
                WHERE id = $7 AND version = $8
                "#,
            )
            .bind(updated.balance)
            .bind(updated.total_spent.cents())
            .bind(updated.visit_count)
            .bind(updated.last_visit)
            .bind(updated.updated_at)
            .bind(updated.version)
            .bind(updated.id.as_uuid())
            .bind(expected_version)
            .execute(&mut *db_tx)
            .await?;

            if result.rows_affected() == 1 {
                db_tx.commit().await?;
                return Ok((tx, updated));
            }

            // Lost the race: roll the insert back too and re-read.
            db_tx.rollback().await?;
            warn!(customer_id = %draft.customer_id, "customer row contended, retrying ledger write");
        }

        Err(StoreError::conflict(
            "customer balance is contended, please retry",
        ))
    }

    async fn list_transactions_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM transactions WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(transaction_from_row).collect()
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query("SELECT * FROM transactions ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(transaction_from_row).collect()
    }
}

#[async_trait]
impl MenuStore for PostgresStore {
    async fn insert_item(&self, item: MenuItem) -> Result<MenuItem, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, name, category, price_cents, available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price.cents())
        .bind(item.available)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(item)
    }

    async fn get_item(&self, id: MenuItemId) -> Result<MenuItem, StoreError> {
        let row = sqlx::query("SELECT * FROM menu_items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        item_from_row(&row)
    }

    async fn list_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        let rows = sqlx::query("SELECT * FROM menu_items ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(item_from_row).collect()
    }

    async fn update_item(
        &self,
        id: MenuItemId,
        patch: MenuItemPatch,
    ) -> Result<MenuItem, StoreError> {
        let mut item = self.get_item(id).await?;
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

        sqlx::query(
            r#"
            UPDATE menu_items SET name = $1, category = $2, price_cents = $3,
                available = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price.cents())
        .bind(item.available)
        .bind(item.updated_at)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(item)
    }

    async fn delete_item(&self, id: MenuItemId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_size(&self, size: MenuSize) -> Result<MenuSize, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO menu_sizes (id, name, price_modifier_cents, available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(size.id.as_uuid())
        .bind(&size.name)
        .bind(size.price_modifier.cents())
        .bind(size.available)
        .bind(size.created_at)
        .bind(size.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(size)
    }

    async fn get_size(&self, id: MenuSizeId) -> Result<MenuSize, StoreError> {
        let row = sqlx::query("SELECT * FROM menu_sizes WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        size_from_row(&row)
    }

    async fn list_sizes(&self) -> Result<Vec<MenuSize>, StoreError> {
        let rows = sqlx::query("SELECT * FROM menu_sizes ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(size_from_row).collect()
    }

    async fn update_size(
        &self,
        id: MenuSizeId,
        patch: MenuSizePatch,
    ) -> Result<MenuSize, StoreError> {
        let mut size = self.get_size(id).await?;
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

        sqlx::query(
            r#"
            UPDATE menu_sizes SET name = $1, price_modifier_cents = $2,
                available = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&size.name)
        .bind(size.price_modifier.cents())
        .bind(size.available)
        .bind(size.updated_at)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(size)
    }

    async fn delete_size(&self, id: MenuSizeId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM menu_sizes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_addon(&self, addon: MenuAddon) -> Result<MenuAddon, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO menu_addons (id, name, price_modifier_cents, available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(addon.id.as_uuid())
        .bind(&addon.name)
        .bind(addon.price_modifier.cents())
        .bind(addon.available)
        .bind(addon.created_at)
        .bind(addon.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(addon)
    }

    async fn get_addon(&self, id: MenuAddonId) -> Result<MenuAddon, StoreError> {
        let row = sqlx::query("SELECT * FROM menu_addons WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        addon_from_row(&row)
    }

    async fn list_addons(&self) -> Result<Vec<MenuAddon>, StoreError> {
        let rows = sqlx::query("SELECT * FROM menu_addons ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(addon_from_row).collect()
    }

    async fn update_addon(
        &self,
        id: MenuAddonId,
        patch: MenuAddonPatch,
    ) -> Result<MenuAddon, StoreError> {
        let mut addon = self.get_addon(id).await?;
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

        sqlx::query(
            r#"
            UPDATE menu_addons SET name = $1, price_modifier_cents = $2,
                available = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&addon.name)
        .bind(addon.price_modifier.cents())
        .bind(addon.available)
        .bind(addon.updated_at)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(addon)
    }

    async fn delete_addon(&self, id: MenuAddonId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM menu_addons WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
