//! Order service.

use super::order::{CheckoutCustomer, NewOrder, Order, OrderStatus};
use crate::cart::CartService;
use crate::error::CommerceError;
use crate::ids::UserId;
use crate::pagination::{PageSettings, Pagination};
use ec_store::{CrudRepository, EntityStore, Filter, FindParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Order listing query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderQuery {
    /// Only orders placed by this user.
    pub user_id: Option<UserId>,
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub limit: Option<usize>,
}

impl OrderQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    fn filter(&self) -> Option<Filter> {
        if self.user_id.is_none() && self.status.is_none() {
            return None;
        }
        Some(
            Filter::new()
                .with_opt("user_id", self.user_id.as_ref().map(UserId::as_str))
                .with_opt("status", self.status.map(|s| s.as_str())),
        )
    }
}

/// One page of orders, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

/// Checkout and order management.
pub struct OrderService {
    repo: CrudRepository<Order, NewOrder, OrderStatus>,
    carts: Arc<CartService>,
    pages: PageSettings,
}

impl OrderService {
    pub fn new(carts: Arc<CartService>, pages: PageSettings) -> Self {
        Self {
            repo: CrudRepository::new(
                Arc::new(EntityStore::new()),
                Order::from_input,
                |existing: &Order, status: OrderStatus| existing.with_status(status),
            ),
            carts,
            pages,
        }
    }

    /// Place an order from the user's current cart.
    ///
    /// The cart is taken out of the cart store in one step, so concurrent
    /// checkouts of the same cart produce at most one order and a line added
    /// afterwards stays in a fresh cart.
    pub fn create_order(
        &self,
        user_id: &UserId,
        customer: CheckoutCustomer,
    ) -> Result<Order, CommerceError> {
        let cart = self.carts.take_cart(user_id);
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let order = self
            .repo
            .create(NewOrder::from_cart(user_id.clone(), customer, &cart));

        tracing::info!(
            order_id = %order.meta.id(),
            user_id = %user_id,
            total = order.total,
            items = order.items.len(),
            "order created"
        );
        Ok(order)
    }

    /// List orders matching the query.
    pub fn get_orders(&self, query: &OrderQuery) -> OrderPage {
        let (page, limit) = self.pages.resolve(query.page, query.limit);
        let filter = query.filter();
        let pagination = Pagination::new(page, limit, self.repo.count(filter.as_ref()));

        let mut params = FindParams::new(limit, pagination.offset());
        params.filter = filter;

        OrderPage {
            orders: self.repo.find_all(&params),
            pagination,
        }
    }

    pub fn get_order_by_id(&self, id: &str) -> Result<Order, CommerceError> {
        self.repo
            .find_by_id(id)
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))
    }

    /// Move an order to a new status along the allowed transitions.
    ///
    /// The transition check runs under the same lock as the write, so two
    /// racing changes cannot both pass it.
    pub fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let order = self
            .repo
            .try_update(id, status, |current: &Order, next: &OrderStatus| {
                if current.status.can_transition_to(*next) {
                    Ok(())
                } else {
                    Err(CommerceError::InvalidStatusTransition {
                        from: current.status.as_str().to_string(),
                        to: next.as_str().to_string(),
                    })
                }
            })
            .map_err(|_| CommerceError::OrderNotFound(id.to_string()))?
            .inspect_err(|err| {
                tracing::warn!(order_id = %id, error = %err, "rejected order status change")
            })?;

        tracing::info!(order_id = %id, status = status.as_str(), "order status updated");
        Ok(order)
    }

    pub fn count(&self) -> usize {
        self.repo.count(None)
    }

    /// Remove every order.
    pub fn reset(&self) {
        self.repo.store().reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogService, DEMO_PRODUCT_ID};
    use crate::events::CartEvents;
    use crate::ids::ProductId;

    fn services() -> (Arc<CartService>, OrderService) {
        let catalog = Arc::new(CatalogService::with_demo_data(PageSettings::default()));
        let carts = Arc::new(CartService::new(catalog, CartEvents::default(), 99));
        let orders = OrderService::new(carts.clone(), PageSettings::default());
        (carts, orders)
    }

    fn customer() -> CheckoutCustomer {
        CheckoutCustomer::new("buyer@example.com", "Demo Buyer")
    }

    #[test]
    fn test_empty_cart_rejected() {
        let (_, orders) = services();
        let err = orders
            .create_order(&UserId::new("u1"), customer())
            .unwrap_err();
        assert_eq!(err, CommerceError::EmptyCart);
        assert_eq!(orders.count(), 0);
    }

    #[test]
    fn test_create_order_clears_cart() {
        let (carts, orders) = services();
        let user = UserId::new("u1");
        carts
            .add_to_cart(&user, &ProductId::new(DEMO_PRODUCT_ID), 2)
            .unwrap();

        let order = orders.create_order(&user, customer()).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, 3600);
        assert_eq!(order.customer_email, "buyer@example.com");
        assert!(carts.get_cart(&user).is_empty());
    }

    #[test]
    fn test_status_transition_rejected() {
        let (carts, orders) = services();
        let user = UserId::new("u1");
        carts
            .add_to_cart(&user, &ProductId::new(DEMO_PRODUCT_ID), 1)
            .unwrap();
        let order = orders.create_order(&user, customer()).unwrap();

        let err = orders
            .update_order_status(order.meta.id(), OrderStatus::Delivered)
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidStatusTransition { .. }));
        assert_eq!(
            orders.get_order_by_id(order.meta.id()).unwrap().status,
            OrderStatus::Pending
        );
    }

    #[test]
    fn test_update_unknown_order() {
        let (_, orders) = services();
        let err = orders
            .update_order_status("missing", OrderStatus::Confirmed)
            .unwrap_err();
        assert_eq!(err, CommerceError::OrderNotFound("missing".into()));
    }

    #[test]
    fn test_query_filter() {
        assert!(OrderQuery::default().filter().is_none());

        let filter = OrderQuery {
            status: Some(OrderStatus::Shipped),
            ..Default::default()
        }
        .filter()
        .unwrap();
        assert_eq!(filter.len(), 1);
    }
}
