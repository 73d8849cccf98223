//! Cart store with derived totals.
//!
//! [`CartStore`] is the authoritative list of line items for one visitor.
//! It owns its storage backend and writes the full item list under
//! [`keys::CART`] after every mutation. Totals are never stored; they are
//! recomputed from the items on each read.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, GamePass, Product};
use crate::storage::{KeyValueStore, keys};
use crate::types::{Badge, GamePassStatus, ItemId, Platform, Price};

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 100;

/// Shipping charged at or below the threshold.
pub const FLAT_SHIPPING_FEE: i64 = 10;

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub description: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    /// Always at least 1 while the item is in a cart.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GamePassStatus>,
}

impl CartItem {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            badge: product.badge,
            quantity: 1,
            platform: None,
            status: None,
        }
    }
}

impl From<&GamePass> for CartItem {
    fn from(pass: &GamePass) -> Self {
        Self {
            id: pass.id,
            name: pass.name.clone(),
            price: pass.price,
            image: pass.image.clone(),
            description: pass.description.clone(),
            category: pass.category.name().to_string(),
            badge: pass.badge,
            quantity: 1,
            platform: Some(pass.platform),
            status: Some(pass.status),
        }
    }
}

impl From<CatalogEntry<'_>> for CartItem {
    fn from(entry: CatalogEntry<'_>) -> Self {
        match entry {
            CatalogEntry::Product(product) => product.into(),
            CatalogEntry::GamePass(pass) => pass.into(),
        }
    }
}

/// Derived cart amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_items: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl CartTotals {
    /// Compute totals for a list of items.
    #[must_use]
    pub fn of(items: &[CartItem]) -> Self {
        let total_items = items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.quantity));
        let subtotal: Price = items.iter().map(CartItem::line_total).sum();
        let shipping = shipping_for(subtotal);
        Self {
            total_items,
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

/// Shipping fee for a subtotal: free strictly above the threshold.
#[must_use]
pub fn shipping_for(subtotal: Price) -> Price {
    if subtotal > Price::whole(FREE_SHIPPING_THRESHOLD) {
        Price::ZERO
    } else {
        Price::whole(FLAT_SHIPPING_FEE)
    }
}

/// Cart for one visitor, persisted through `S`.
#[derive(Debug)]
pub struct CartStore<S: KeyValueStore> {
    items: Vec<CartItem>,
    storage: S,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Load the persisted cart from `storage`.
    ///
    /// A missing value is an empty cart. A value that does not parse is
    /// removed from storage and also treated as an empty cart.
    pub fn load(mut storage: S) -> Self {
        let items = match storage.get(keys::CART) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => normalize(items),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse stored cart, discarding it");
                    if let Err(e) = storage.remove(keys::CART) {
                        tracing::warn!(error = %e, "Failed to clear stored cart");
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart");
                Vec::new()
            }
        };

        Self { items, storage }
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Add one unit of `item`.
    ///
    /// An existing entry with the same id gains one unit; otherwise the item
    /// is appended with quantity 1 regardless of the quantity it carries.
    pub fn add_to_cart(&mut self, item: impl Into<CartItem>) {
        let item = item.into();
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem { quantity: 1, ..item });
        }
        self.persist();
    }

    /// Remove the entry for `id`. No-op if absent.
    pub fn remove_from_cart(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
        self.persist();
    }

    /// Set the quantity for `id`. Zero or negative removes the entry.
    pub fn update_quantity(&mut self, id: ItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity;
        }
        self.persist();
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.totals().total_items
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.totals().subtotal
    }

    #[must_use]
    pub fn shipping(&self) -> Price {
        self.totals().shipping
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.totals().total
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::of(&self.items)
    }

    /// Give back the storage backend, e.g. to flush a session snapshot.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => {
                if let Err(e) = self.storage.set(keys::CART, json) {
                    tracing::warn!(error = %e, "Failed to persist cart");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize cart"),
        }
    }
}

/// Drop zero-quantity rows and merge duplicate ids from hand-edited data.
fn normalize(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());
    for item in items.into_iter().filter(|item| item.quantity > 0) {
        if let Some(existing) = merged.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            merged.push(item);
        }
    }
    merged
}
