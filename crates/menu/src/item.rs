use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coffeedocket_core::{DomainError, DomainResult, MenuAddonId, MenuItemId, MenuSizeId, Money};

/// A drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A size option with a price modifier on top of the item price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSize {
    pub id: MenuSizeId,
    pub name: String,
    pub price_modifier: Money,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An addon (extra shot, syrup, alternative milk) with a price modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuAddon {
    pub id: MenuAddonId,
    pub name: String,
    pub price_modifier: Money,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuSize {
    pub name: String,
    pub price_modifier: Money,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuAddon {
    pub name: String,
    pub price_modifier: Money,
    pub available: bool,
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

impl NewMenuItem {
    pub fn into_item(self, id: MenuItemId, now: DateTime<Utc>) -> DomainResult<MenuItem> {
        validate_name(&self.name)?;
        Ok(MenuItem {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            available: self.available,
            created_at: now,
            updated_at: now,
        })
    }
}

impl NewMenuSize {
    pub fn into_size(self, id: MenuSizeId, now: DateTime<Utc>) -> DomainResult<MenuSize> {
        validate_name(&self.name)?;
        Ok(MenuSize {
            id,
            name: self.name,
            price_modifier: self.price_modifier,
            available: self.available,
            created_at: now,
            updated_at: now,
        })
    }
}

impl NewMenuAddon {
    pub fn into_addon(self, id: MenuAddonId, now: DateTime<Utc>) -> DomainResult<MenuAddon> {
        validate_name(&self.name)?;
        Ok(MenuAddon {
            id,
            name: self.name,
            price_modifier: self.price_modifier,
            available: self.available,
            created_at: now,
            updated_at: now,
        })
    }
}
