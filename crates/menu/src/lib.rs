//! `coffeedocket-menu` — the drinks catalog: items, sizes, addons, pricing.
//!
//! Catalog rows are independent entities. Transactions copy name strings out
//! of the catalog at serve time, so deleting a row never rewrites history.

pub mod item;
pub mod pricing;

pub use item::{MenuAddon, MenuItem, MenuSize, NewMenuAddon, NewMenuItem, NewMenuSize};
pub use pricing::{quote_price, PriceQuote};
