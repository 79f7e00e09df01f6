//! Price quoting for a drink order.

use serde::{Deserialize, Serialize};

use coffeedocket_core::{DomainResult, Money};

use crate::item::{MenuAddon, MenuItem, MenuSize};

/// Result of pricing a drink: the line components and the final total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base: Money,
    pub size_modifier: Money,
    pub addons_total: Money,
    pub discount: Money,
    pub total: Money,
}

/// Item price + size modifier + addon modifiers, minus discount, floored at zero.
pub fn quote_price(
    item: &MenuItem,
    size: Option<&MenuSize>,
    addons: &[&MenuAddon],
    discount: Option<Money>,
) -> DomainResult<PriceQuote> {
    let size_modifier = size.map(|s| s.price_modifier).unwrap_or(Money::ZERO);

    let mut addons_total = Money::ZERO;
    for addon in addons {
        addons_total = addons_total.add(addon.price_modifier)?;
    }

    let discount = discount.unwrap_or(Money::ZERO);
    let gross = item.price.add(size_modifier)?.add(addons_total)?;
    let total = gross.saturating_sub(discount);

    Ok(PriceQuote {
        base: item.price,
        size_modifier,
        addons_total,
        discount,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{NewMenuAddon, NewMenuItem, NewMenuSize};
    use chrono::Utc;
    use coffeedocket_core::{MenuAddonId, MenuItemId, MenuSizeId};

    fn cents(c: i64) -> Money {
        Money::from_cents(c).unwrap()
    }

    fn item(price: i64) -> MenuItem {
        NewMenuItem {
            name: "cappuccino".to_string(),
            category: "espresso".to_string(),
            price: cents(price),
            available: true,
        }
        .into_item(MenuItemId::new(), Utc::now())
        .unwrap()
    }

    fn size(modifier: i64) -> MenuSize {
        NewMenuSize {
            name: "large".to_string(),
            price_modifier: cents(modifier),
            available: true,
        }
        .into_size(MenuSizeId::new(), Utc::now())
        .unwrap()
    }

    fn addon(modifier: i64) -> MenuAddon {
        NewMenuAddon {
            name: "oat milk".to_string(),
            price_modifier: cents(modifier),
            available: true,
        }
        .into_addon(MenuAddonId::new(), Utc::now())
        .unwrap()
    }

    #[test]
    fn base_price_only() {
        let quote = quote_price(&item(400), None, &[], None).unwrap();
        assert_eq!(quote.total, cents(400));
    }

    #[test]
    fn size_and_addons_stack() {
        let s = size(50);
        let a1 = addon(60);
        let a2 = addon(30);
        let quote = quote_price(&item(400), Some(&s), &[&a1, &a2], None).unwrap();
        assert_eq!(quote.size_modifier, cents(50));
        assert_eq!(quote.addons_total, cents(90));
        assert_eq!(quote.total, cents(540));
    }

    #[test]
    fn discount_floors_at_zero() {
        let quote = quote_price(&item(300), None, &[], Some(cents(500))).unwrap();
        assert_eq!(quote.total, Money::ZERO);
    }
}
