use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use coffeedocket_core::{MenuAddonId, MenuItemId, MenuSizeId, Money};
use coffeedocket_menu::{MenuAddon, MenuItem, MenuSize};

use crate::error::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSizePatch {
    pub name: Option<String>,
    pub price_modifier: Option<Money>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuAddonPatch {
    pub name: Option<String>,
    pub price_modifier: Option<Money>,
    pub available: Option<bool>,
}

/// Menu catalog operations (items, sizes, addons).
///
/// Catalog rows are independent of the transaction log; deleting one never
/// rewrites history, which stores copied name strings.
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn insert_item(&self, item: MenuItem) -> Result<MenuItem, StoreError>;
    async fn get_item(&self, id: MenuItemId) -> Result<MenuItem, StoreError>;
    async fn list_items(&self) -> Result<Vec<MenuItem>, StoreError>;
    async fn update_item(&self, id: MenuItemId, patch: MenuItemPatch)
        -> Result<MenuItem, StoreError>;
    async fn delete_item(&self, id: MenuItemId) -> Result<(), StoreError>;

    async fn insert_size(&self, size: MenuSize) -> Result<MenuSize, StoreError>;
    async fn get_size(&self, id: MenuSizeId) -> Result<MenuSize, StoreError>;
    async fn list_sizes(&self) -> Result<Vec<MenuSize>, StoreError>;
    async fn update_size(&self, id: MenuSizeId, patch: MenuSizePatch)
        -> Result<MenuSize, StoreError>;
    async fn delete_size(&self, id: MenuSizeId) -> Result<(), StoreError>;

    async fn insert_addon(&self, addon: MenuAddon) -> Result<MenuAddon, StoreError>;
    async fn get_addon(&self, id: MenuAddonId) -> Result<MenuAddon, StoreError>;
    async fn list_addons(&self) -> Result<Vec<MenuAddon>, StoreError>;
    async fn update_addon(
        &self,
        id: MenuAddonId,
        patch: MenuAddonPatch,
    ) -> Result<MenuAddon, StoreError>;
    async fn delete_addon(&self, id: MenuAddonId) -> Result<(), StoreError>;
}
