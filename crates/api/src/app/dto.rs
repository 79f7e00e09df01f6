//! Request/response DTOs.
//!
//! Wire JSON is camelCase; the persisted shapes stay snake_case. Money
//! crosses the wire as integer cents.

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use coffeedocket_ledger::{Customer, Transaction};
use coffeedocket_menu::{MenuAddon, MenuItem, MenuSize, PriceQuote};
use coffeedocket_store::IdentityAccount;

/// Distinguishes an absent field (keep) from an explicit `null` (clear).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// ── Customers ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notify_email: bool,
    #[serde(default)]
    pub notify_sms: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    pub status: Option<String>,
    pub notify_email: Option<bool>,
    pub notify_sms: Option<bool>,
}

pub fn customer_to_json(c: &Customer) -> Value {
    json!({
        "id": c.id.to_string(),
        "firstName": c.first_name,
        "lastName": c.last_name,
        "email": c.email,
        "phone": c.phone,
        "balance": c.balance,
        "totalSpentCents": c.total_spent.cents(),
        "visitCount": c.visit_count,
        "status": c.status,
        "notifyEmail": c.notify_email,
        "notifySms": c.notify_sms,
        "lastVisit": c.last_visit,
        "createdAt": c.created_at,
        "updatedAt": c.updated_at,
    })
}

// ── Transactions ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub kind: String,
    pub coffee_count: i64,
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default)]
    pub drink: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub addons: Vec<String>,
    #[serde(default)]
    pub discount_cents: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn transaction_to_json(t: &Transaction) -> Value {
    json!({
        "id": t.id.to_string(),
        "customerId": t.customer_id.to_string(),
        "staffId": t.staff_id.to_string(),
        "kind": t.kind.as_str(),
        "coffeeCount": t.coffee_count,
        "amountCents": t.amount.map(|m| m.cents()),
        "drink": t.drink,
        "size": t.size,
        "addons": t.addons,
        "discountCents": t.discount.map(|m| m.cents()),
        "notes": t.notes,
        "description": t.description,
        "createdAt": t.created_at,
    })
}

// ── Menu ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    #[serde(default = "default_true")]
    pub available: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModifierRequest {
    pub name: String,
    pub price_modifier_cents: i64,
    #[serde(default = "default_true")]
    pub available: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateModifierRequest {
    pub name: Option<String>,
    pub price_modifier_cents: Option<i64>,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub item_id: String,
    #[serde(default)]
    pub size_id: Option<String>,
    #[serde(default)]
    pub addon_ids: Vec<String>,
    #[serde(default)]
    pub discount_cents: Option<i64>,
}

fn default_true() -> bool {
    true
}

pub fn item_to_json(i: &MenuItem) -> Value {
    json!({
        "id": i.id.to_string(),
        "name": i.name,
        "category": i.category,
        "priceCents": i.price.cents(),
        "available": i.available,
        "createdAt": i.created_at,
        "updatedAt": i.updated_at,
    })
}

pub fn size_to_json(s: &MenuSize) -> Value {
    json!({
        "id": s.id.to_string(),
        "name": s.name,
        "priceModifierCents": s.price_modifier.cents(),
        "available": s.available,
        "createdAt": s.created_at,
        "updatedAt": s.updated_at,
    })
}

pub fn addon_to_json(a: &MenuAddon) -> Value {
    json!({
        "id": a.id.to_string(),
        "name": a.name,
        "priceModifierCents": a.price_modifier.cents(),
        "available": a.available,
        "createdAt": a.created_at,
        "updatedAt": a.updated_at,
    })
}

pub fn quote_to_json(q: &PriceQuote) -> Value {
    json!({
        "baseCents": q.base.cents(),
        "sizeModifierCents": q.size_modifier.cents(),
        "addonsTotalCents": q.addons_total.cents(),
        "discountCents": q.discount.cents(),
        "totalCents": q.total.cents(),
    })
}

// ── Auth / identity ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notify_email: bool,
    #[serde(default)]
    pub notify_sms: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAdminUserRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
}

pub fn account_to_json(a: &IdentityAccount) -> Value {
    json!({
        "id": a.id.to_string(),
        "email": a.email,
        "displayName": a.display_name,
        "role": a.role.map(|r| r.as_str()),
        "createdAt": a.created_at,
    })
}
