//! Static catalog tables and lookups.
//!
//! The shop sells from two immutable tables: game passes (the main catalog)
//! and a small generic product catalog. Both share the [`ItemId`] space so a
//! single cart can hold entries from either without identifier collisions.
//! Uniqueness is a data-entry responsibility and is checked by the tests in
//! this module, not at runtime.

mod game_passes;
pub mod links;
mod products;
mod tracks;

use serde::Serialize;

use crate::types::{Badge, GamePassCategory, GamePassStatus, ItemId, Platform, Price};

pub use game_passes::game_passes;
pub use products::products;
pub use tracks::{Track, tracks};

/// Filter value that selects every game pass.
pub const ALL_GAME_PASSES: &str = "All";

/// Filter value that selects every product.
pub const ALL_PRODUCTS: &str = "All Products";

/// Products shown before the first "load more".
pub const PRODUCT_PAGE_SIZE: usize = 8;

/// Products revealed by each "load more".
pub const PRODUCT_PAGE_STEP: usize = 4;

/// A generic catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub description: String,
    pub category: String,
    /// Price before discount, shown struck through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Only `NEW` or `SALE` are used for products.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

/// A digital entitlement redeemed on an external platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePass {
    pub id: ItemId,
    pub name: String,
    /// Robux for Roblox passes.
    pub price: Price,
    /// Formatted price (e.g. "25 RS", "Coming Soon").
    pub price_display: String,
    pub image: String,
    pub description: String,
    pub category: GamePassCategory,
    pub platform: Platform,
    /// Platform-side identifier used for verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    pub status: GamePassStatus,
    /// Star rating, 0-5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl GamePass {
    /// External id to verify before adding to a cart.
    ///
    /// Only Roblox passes with a known id are verified.
    #[must_use]
    pub fn verification_target(&self) -> Option<&str> {
        match (self.platform, self.external_id.as_deref()) {
            (Platform::Roblox, Some(id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }
}

/// A borrowed entry from either catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntry<'a> {
    Product(&'a Product),
    GamePass(&'a GamePass),
}

impl CatalogEntry<'_> {
    #[must_use]
    pub const fn id(&self) -> ItemId {
        match self {
            Self::Product(p) => p.id,
            Self::GamePass(g) => g.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Product(p) => &p.name,
            Self::GamePass(g) => &g.name,
        }
    }

    /// See [`GamePass::verification_target`]. Products are never verified.
    #[must_use]
    pub fn verification_target(&self) -> Option<&str> {
        match self {
            Self::Product(_) => None,
            Self::GamePass(g) => g.verification_target(),
        }
    }
}

/// Game pass filter values: `"All"` followed by each category in table order.
#[must_use]
pub fn game_pass_categories() -> Vec<String> {
    let mut categories = vec![ALL_GAME_PASSES.to_string()];
    for pass in game_passes() {
        let name = pass.category.name();
        if !categories.iter().any(|c| c == name) {
            categories.push(name.to_string());
        }
    }
    categories
}

/// Game passes in `category`, or all of them for `"All"`.
///
/// Unknown categories select nothing.
#[must_use]
pub fn game_passes_by_category(category: &str) -> Vec<&'static GamePass> {
    if category == ALL_GAME_PASSES {
        return game_passes().iter().collect();
    }
    game_passes()
        .iter()
        .filter(|pass| pass.category.name() == category)
        .collect()
}

/// Product filter values shown above the product grid.
#[must_use]
pub fn product_categories() -> &'static [&'static str] {
    &[ALL_PRODUCTS, "Clothing", "Accessories", "Shoes", "Home Decor"]
}

/// Products in `category`, or all of them for `"All Products"`.
#[must_use]
pub fn products_by_category(category: &str) -> Vec<&'static Product> {
    if category == ALL_PRODUCTS {
        return products().iter().collect();
    }
    products()
        .iter()
        .filter(|product| product.category == category)
        .collect()
}

#[must_use]
pub fn find_game_pass(id: ItemId) -> Option<&'static GamePass> {
    game_passes().iter().find(|pass| pass.id == id)
}

#[must_use]
pub fn find_product(id: ItemId) -> Option<&'static Product> {
    products().iter().find(|product| product.id == id)
}

/// Look an id up in either catalog, game passes first.
#[must_use]
pub fn find_item(id: ItemId) -> Option<CatalogEntry<'static>> {
    find_game_pass(id)
        .map(CatalogEntry::GamePass)
        .or_else(|| find_product(id).map(CatalogEntry::Product))
}

/// One page of the product grid.
///
/// Starts at [`PRODUCT_PAGE_SIZE`] and grows by [`PRODUCT_PAGE_STEP`] per
/// "load more", never beyond the filtered list.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub category: String,
    pub products: Vec<&'static Product>,
    pub visible: usize,
    pub total: usize,
}

impl ProductPage {
    /// Build a page for `category` with `visible` items requested.
    ///
    /// `None` means the initial page size.
    #[must_use]
    pub fn new(category: &str, visible: Option<usize>) -> Self {
        let filtered = products_by_category(category);
        let total = filtered.len();
        let visible = visible.unwrap_or(PRODUCT_PAGE_SIZE).min(total);
        Self {
            category: category.to_string(),
            products: filtered.into_iter().take(visible).collect(),
            visible,
            total,
        }
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.visible < self.total
    }

    /// Visible count after one more "load more".
    #[must_use]
    pub fn next_visible(&self) -> usize {
        (self.visible + PRODUCT_PAGE_STEP).min(self.total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ids_unique_across_catalogs() {
        let mut seen = HashSet::new();
        for id in game_passes()
            .iter()
            .map(|g| g.id)
            .chain(products().iter().map(|p| p.id))
        {
            assert!(seen.insert(id), "duplicate catalog id {id}");
        }
    }

    #[test]
    fn test_game_pass_categories_in_table_order() {
        assert_eq!(game_pass_categories(), vec!["All", "Dusk", "Donation"]);
    }

    #[test]
    fn test_game_passes_by_category() {
        assert_eq!(game_passes_by_category("All").len(), game_passes().len());
        let donations = game_passes_by_category("Donation");
        assert_eq!(donations.len(), 7);
        assert!(
            donations
                .iter()
                .all(|g| g.category == GamePassCategory::Donation)
        );
        assert!(game_passes_by_category("Weapons").is_empty());
    }

    #[test]
    fn test_products_by_category() {
        assert_eq!(products_by_category(ALL_PRODUCTS).len(), 12);
        assert_eq!(products_by_category("Accessories").len(), 5);
        assert_eq!(products_by_category("Shoes").len(), 2);
    }

    #[test]
    fn test_find_item_prefers_matching_catalog() {
        let pass = find_item(ItemId::new(3)).unwrap();
        assert!(matches!(pass, CatalogEntry::GamePass(_)));
        assert_eq!(pass.name(), "Donation - Basic");

        let product = find_item(ItemId::new(101)).unwrap();
        assert!(matches!(product, CatalogEntry::Product(_)));

        assert!(find_item(ItemId::new(2)).is_none());
        assert!(find_item(ItemId::new(999)).is_none());
    }

    #[test]
    fn test_verification_target_only_roblox_with_id() {
        let basic = find_game_pass(ItemId::new(3)).unwrap();
        assert_eq!(basic.verification_target(), Some("956035778"));

        let dusk = find_game_pass(ItemId::new(1)).unwrap();
        assert_eq!(dusk.platform, Platform::Scratch);
        assert!(dusk.verification_target().is_none());

        let product = find_item(ItemId::new(105)).unwrap();
        assert!(product.verification_target().is_none());
    }

    #[test]
    fn test_product_page_load_more() {
        let page = ProductPage::new(ALL_PRODUCTS, None);
        assert_eq!(page.products.len(), 8);
        assert!(page.has_more());
        assert_eq!(page.next_visible(), 12);

        let page = ProductPage::new(ALL_PRODUCTS, Some(page.next_visible()));
        assert_eq!(page.products.len(), 12);
        assert!(!page.has_more());
        assert_eq!(page.next_visible(), 12);
    }

    #[test]
    fn test_product_page_caps_at_filtered_length() {
        let page = ProductPage::new("Shoes", Some(50));
        assert_eq!(page.visible, 2);
        assert!(!page.has_more());
    }
}
