//! Menu catalog endpoints: items, sizes, addons, and price quoting.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use coffeedocket_core::{MenuAddonId, MenuItemId, MenuSizeId, Money};
use coffeedocket_menu::{quote_price, NewMenuAddon, NewMenuItem, NewMenuSize};
use coffeedocket_store::{MenuAddonPatch, MenuItemPatch, MenuSizePatch, StoreError};

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", axum::routing::patch(update_item).delete(delete_item))
        .route("/sizes", get(list_sizes).post(create_size))
        .route("/sizes/:id", axum::routing::patch(update_size).delete(delete_size))
        .route("/addons", get(list_addons).post(create_addon))
        .route("/addons/:id", axum::routing::patch(update_addon).delete(delete_addon))
        .route("/quote", post(quote))
}

fn money(cents: i64, field: &str) -> Result<Money, axum::response::Response> {
    Money::from_cents(cents).map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{field} cannot be negative"),
        )
    })
}

fn invalid_id(what: &str) -> axum::response::Response {
    errors::json_error(
        StatusCode::BAD_REQUEST,
        "invalid_id",
        format!("invalid {what} id"),
    )
}

// ── Items ────────────────────────────────────────────────────────────────

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.menu.list_items().await {
        Ok(items) => {
            let items: Vec<_> = items.iter().map(dto::item_to_json).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateMenuItemRequest>,
) -> axum::response::Response {
    let price = match money(body.price_cents, "priceCents") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let new = NewMenuItem {
        name: body.name,
        category: body.category,
        price,
        available: body.available,
    };
    let item = match new.into_item(MenuItemId::new(), Utc::now()) {
        Ok(item) => item,
        Err(e) => return errors::store_error_to_response(StoreError::from(e)),
    };

    match services.menu.insert_item(item).await {
        Ok(item) => (StatusCode::CREATED, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateMenuItemRequest>,
) -> axum::response::Response {
    let id: MenuItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("menu item"),
    };

    let price = match body.price_cents.map(|c| money(c, "priceCents")).transpose() {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let patch = MenuItemPatch {
        name: body.name,
        category: body.category,
        price,
        available: body.available,
    };

    match services.menu.update_item(id, patch).await {
        Ok(item) => Json(dto::item_to_json(&item)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MenuItemId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("menu item"),
    };

    match services.menu.delete_item(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

// ── Sizes ────────────────────────────────────────────────────────────────

pub async fn list_sizes(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.menu.list_sizes().await {
        Ok(sizes) => {
            let items: Vec<_> = sizes.iter().map(dto::size_to_json).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_size(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateModifierRequest>,
) -> axum::response::Response {
    let price_modifier = match money(body.price_modifier_cents, "priceModifierCents") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let new = NewMenuSize {
        name: body.name,
        price_modifier,
        available: body.available,
    };
    let size = match new.into_size(MenuSizeId::new(), Utc::now()) {
        Ok(size) => size,
        Err(e) => return errors::store_error_to_response(StoreError::from(e)),
    };

    match services.menu.insert_size(size).await {
        Ok(size) => (StatusCode::CREATED, Json(dto::size_to_json(&size))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_size(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateModifierRequest>,
) -> axum::response::Response {
    let id: MenuSizeId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("menu size"),
    };

    let price_modifier = match body
        .price_modifier_cents
        .map(|c| money(c, "priceModifierCents"))
        .transpose()
    {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let patch = MenuSizePatch {
        name: body.name,
        price_modifier,
        available: body.available,
    };

    match services.menu.update_size(id, patch).await {
        Ok(size) => Json(dto::size_to_json(&size)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_size(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MenuSizeId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("menu size"),
    };

    match services.menu.delete_size(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

// ── Addons ───────────────────────────────────────────────────────────────

pub async fn list_addons(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.menu.list_addons().await {
        Ok(addons) => {
            let items: Vec<_> = addons.iter().map(dto::addon_to_json).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_addon(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateModifierRequest>,
) -> axum::response::Response {
    let price_modifier = match money(body.price_modifier_cents, "priceModifierCents") {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let new = NewMenuAddon {
        name: body.name,
        price_modifier,
        available: body.available,
    };
    let addon = match new.into_addon(MenuAddonId::new(), Utc::now()) {
        Ok(addon) => addon,
        Err(e) => return errors::store_error_to_response(StoreError::from(e)),
    };

    match services.menu.insert_addon(addon).await {
        Ok(addon) => (StatusCode::CREATED, Json(dto::addon_to_json(&addon))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_addon(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateModifierRequest>,
) -> axum::response::Response {
    let id: MenuAddonId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("menu addon"),
    };

    let price_modifier = match body
        .price_modifier_cents
        .map(|c| money(c, "priceModifierCents"))
        .transpose()
    {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let patch = MenuAddonPatch {
        name: body.name,
        price_modifier,
        available: body.available,
    };

    match services.menu.update_addon(id, patch).await {
        Ok(addon) => Json(dto::addon_to_json(&addon)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_addon(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MenuAddonId = match id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("menu addon"),
    };

    match services.menu.delete_addon(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

// ── Quote ────────────────────────────────────────────────────────────────

/// POST /menu/quote — price a drink from catalog rows.
pub async fn quote(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::QuoteRequest>,
) -> axum::response::Response {
    let item_id: MenuItemId = match body.item_id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("menu item"),
    };

    let item = match services.menu.get_item(item_id).await {
        Ok(item) => item,
        Err(e) => return errors::store_error_to_response(e),
    };

    let size = match &body.size_id {
        Some(raw) => {
            let id: MenuSizeId = match raw.parse() {
                Ok(id) => id,
                Err(_) => return invalid_id("menu size"),
            };
            match services.menu.get_size(id).await {
                Ok(size) => Some(size),
                Err(e) => return errors::store_error_to_response(e),
            }
        }
        None => None,
    };

    let mut addons = Vec::with_capacity(body.addon_ids.len());
    for raw in &body.addon_ids {
        let id: MenuAddonId = match raw.parse() {
            Ok(id) => id,
            Err(_) => return invalid_id("menu addon"),
        };
        match services.menu.get_addon(id).await {
            Ok(addon) => addons.push(addon),
            Err(e) => return errors::store_error_to_response(e),
        }
    }

    let discount = match body.discount_cents.map(|c| money(c, "discountCents")).transpose() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let addon_refs: Vec<_> = addons.iter().collect();
    match quote_price(&item, size.as_ref(), &addon_refs, discount) {
        Ok(quote) => Json(dto::quote_to_json(&quote)).into_response(),
        Err(e) => errors::store_error_to_response(StoreError::from(e)),
    }
}
