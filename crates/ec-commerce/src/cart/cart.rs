//! Cart and line item types.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default maximum quantity allowed per line item.
pub const DEFAULT_MAX_QUANTITY_PER_ITEM: i64 = 99;

/// A user's shopping cart.
///
/// `subtotal` and `item_count` are derived from the items and recomputed
/// after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart, in the order they were first added.
    pub items: Vec<CartItem>,
    /// Sum of line totals.
    pub subtotal: i64,
    /// Sum of quantities.
    pub item_count: i64,
    /// Time of the last mutation.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart.
    ///
    /// Adding a product already in the cart increases its quantity; the name
    /// and price snapshot from the first add are kept.
    ///
    /// Returns an error if:
    /// - Quantity is not positive
    /// - The resulting quantity would exceed `max_quantity`
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        max_quantity: i64,
    ) -> Result<&CartItem, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        let product_id = product.product_id();
        let index = match self.position(&product_id) {
            Some(index) => {
                let existing = &mut self.items[index];
                let new_quantity = existing
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CommerceError::QuantityExceedsLimit(i64::MAX, max_quantity))?;
                if new_quantity > max_quantity {
                    return Err(CommerceError::QuantityExceedsLimit(new_quantity, max_quantity));
                }
                existing.set_quantity(new_quantity);
                index
            }
            None => {
                if quantity > max_quantity {
                    return Err(CommerceError::QuantityExceedsLimit(quantity, max_quantity));
                }
                self.items.push(CartItem::snapshot(product, quantity));
                self.items.len() - 1
            }
        };

        self.recalculate();
        Ok(&self.items[index])
    }

    /// Set an item's quantity.
    ///
    /// A quantity of 0 removes the item.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        max_quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity < 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > max_quantity {
            return Err(CommerceError::QuantityExceedsLimit(quantity, max_quantity));
        }

        let index = self
            .position(product_id)
            .ok_or_else(|| CommerceError::CartItemNotFound(product_id.to_string()))?;

        if quantity == 0 {
            self.items.remove(index);
        } else {
            self.items[index].set_quantity(quantity);
        }
        self.recalculate();
        Ok(())
    }

    /// Remove an item from the cart.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<CartItem, CommerceError> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CommerceError::CartItemNotFound(product_id.to_string()))?;
        let removed = self.items.remove(index);
        self.recalculate();
        Ok(removed)
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by product id.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.product_id == product_id)
    }

    fn recalculate(&mut self) {
        self.subtotal = self.items.iter().map(|i| i.line_total).sum();
        self.item_count = self.items.iter().map(|i| i.quantity).sum();
        self.updated_at = Some(Utc::now());
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product in this line.
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price at the time it was added.
    pub price: i64,
    /// Quantity.
    pub quantity: i64,
    /// Product image URL.
    pub image_url: Option<String>,
    /// Unit price times quantity.
    pub line_total: i64,
}

impl CartItem {
    /// Snapshot a product into a new line.
    pub fn snapshot(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.product_id(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            image_url: product.image_url.clone(),
            line_total: product.price.saturating_mul(quantity),
        }
    }

    fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.line_total = self.price.saturating_mul(quantity);
    }
}
