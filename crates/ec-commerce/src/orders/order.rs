//! Order types.

use crate::cart::{Cart, CartItem};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use ec_store::{Entity, EntityMeta, FieldValue};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting confirmation.
    #[default]
    Pending,
    /// Order confirmed and being prepared.
    Confirmed,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Statuses reachable in one step from this one.
    pub fn next_statuses(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
            OrderStatus::Confirmed => &[OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Shipped => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    /// Check if the order may move to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.next_statuses().is_empty()
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        self.can_transition_to(OrderStatus::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(CommerceError::Validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Customer details captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCustomer {
    pub email: String,
    pub name: String,
}

impl CheckoutCustomer {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Identity and timestamps.
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Customer user ID.
    pub user_id: UserId,
    /// Customer email.
    pub customer_email: String,
    /// Customer display name.
    pub customer_name: String,
    /// Items in the order.
    pub items: Vec<OrderItem>,
    /// Sum of line totals.
    pub total: i64,
    /// Order status.
    pub status: OrderStatus,
}

impl Order {
    /// Build a pending order from checkout input.
    pub fn from_input(input: NewOrder) -> Self {
        let total = input.items.iter().map(|i| i.line_total).sum();
        Self {
            meta: EntityMeta::new(),
            user_id: input.user_id,
            customer_email: input.customer.email,
            customer_name: input.customer.name,
            items: input.items,
            total,
            status: OrderStatus::Pending,
        }
    }

    /// Copy of this order with a new status.
    pub fn with_status(&self, status: OrderStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn order_id(&self) -> OrderId {
        OrderId::new(self.meta.id())
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

impl Entity for Order {
    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "user_id" => Some(self.user_id.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            "customer_email" => Some(self.customer_email.as_str().into()),
            _ => None,
        }
    }
}

/// A line in an order, copied from the cart at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub line_total: i64,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            line_total: item.line_total,
        }
    }
}

/// Input for creating an order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub customer: CheckoutCustomer,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Snapshot a cart's lines for checkout.
    pub fn from_cart(user_id: UserId, customer: CheckoutCustomer, cart: &Cart) -> Self {
        Self {
            user_id,
            customer,
            items: cart.items.iter().map(OrderItem::from).collect(),
        }
    }
}
