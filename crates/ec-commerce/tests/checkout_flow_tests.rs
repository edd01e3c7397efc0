//! End-to-end domain flows across catalog, cart and orders.

use ec_commerce::prelude::*;
use std::sync::Arc;

struct Shop {
    catalog: Arc<CatalogService>,
    carts: Arc<CartService>,
    orders: OrderService,
    events: CartEvents,
}

fn shop() -> Shop {
    let events = CartEvents::default();
    let catalog = Arc::new(CatalogService::with_demo_data(PageSettings::default()));
    let carts = Arc::new(CartService::new(
        catalog.clone(),
        events.clone(),
        DEFAULT_MAX_QUANTITY_PER_ITEM,
    ));
    let orders = OrderService::new(carts.clone(), PageSettings::default());
    Shop {
        catalog,
        carts,
        orders,
        events,
    }
}

fn customer() -> CheckoutCustomer {
    CheckoutCustomer::new("buyer@example.com", "Demo Buyer")
}

#[test]
fn buyer_checkout_flow() {
    let shop = shop();
    let buyer = UserId::new("user-buyer");

    let listing = shop.catalog.get_products(&ProductQuery::published());
    let first = &listing.products[0];
    let second = &listing.products[1];

    shop.carts.add_to_cart(&buyer, &first.product_id(), 1).unwrap();
    shop.carts.add_to_cart(&buyer, &second.product_id(), 2).unwrap();
    let cart = shop.carts.add_to_cart(&buyer, &first.product_id(), 1).unwrap();

    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.item_count, 4);
    assert_eq!(cart.subtotal, first.price * 2 + second.price * 2);

    let order = shop.orders.create_order(&buyer, customer()).unwrap();
    assert_eq!(order.total, cart.subtotal);
    assert_eq!(order.items.len(), 2);
    assert!(shop.carts.get_cart(&buyer).is_empty());

    let mine = shop.orders.get_orders(&OrderQuery::for_user(buyer.clone()));
    assert_eq!(mine.pagination.total, 1);
    assert_eq!(mine.orders[0], order);
}

#[test]
fn admin_moves_order_through_lifecycle() {
    let shop = shop();
    let buyer = UserId::new("user-buyer");
    shop.carts
        .add_to_cart(&buyer, &ProductId::new(DEMO_PRODUCT_ID), 1)
        .unwrap();
    let order = shop.orders.create_order(&buyer, customer()).unwrap();
    let id = order.meta.id().to_string();

    let mut last_update = order.meta.updated_at();
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let updated = shop.orders.update_order_status(&id, status).unwrap();
        assert_eq!(updated.status, status);
        assert_eq!(updated.meta.created_at(), order.meta.created_at());
        assert!(updated.meta.updated_at() > last_update);
        last_update = updated.meta.updated_at();
    }

    let err = shop
        .orders
        .update_order_status(&id, OrderStatus::Cancelled)
        .unwrap_err();
    assert_eq!(
        err,
        CommerceError::InvalidStatusTransition {
            from: "delivered".into(),
            to: "cancelled".into(),
        }
    );
}

#[test]
fn cancelled_orders_are_terminal() {
    let shop = shop();
    let buyer = UserId::new("user-buyer");
    shop.carts
        .add_to_cart(&buyer, &ProductId::new(DEMO_PRODUCT_ID), 1)
        .unwrap();
    let order = shop.orders.create_order(&buyer, customer()).unwrap();
    let id = order.meta.id();

    shop.orders
        .update_order_status(id, OrderStatus::Cancelled)
        .unwrap();
    assert!(shop
        .orders
        .update_order_status(id, OrderStatus::Confirmed)
        .is_err());
}

#[test]
fn orders_filter_by_user_and_status() {
    let shop = shop();
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    for user in [&alice, &bob, &alice] {
        shop.carts
            .add_to_cart(user, &ProductId::new(DEMO_PRODUCT_ID), 1)
            .unwrap();
        shop.orders.create_order(user, customer()).unwrap();
    }

    let alices = shop.orders.get_orders(&OrderQuery::for_user(alice.clone()));
    assert_eq!(alices.pagination.total, 2);
    assert!(alices.orders.iter().all(|o| o.user_id == alice));
    assert!(alices.orders[0].meta.created_at() >= alices.orders[1].meta.created_at());

    let first = alices.orders[0].meta.id().to_string();
    shop.orders
        .update_order_status(&first, OrderStatus::Confirmed)
        .unwrap();

    let confirmed = shop.orders.get_orders(&OrderQuery {
        user_id: Some(alice),
        status: Some(OrderStatus::Confirmed),
        ..Default::default()
    });
    assert_eq!(confirmed.pagination.total, 1);
    assert_eq!(confirmed.orders[0].meta.id(), first);

    assert_eq!(shop.orders.get_orders(&OrderQuery::default()).pagination.total, 3);
}

#[test]
fn archived_product_cannot_be_added() {
    let shop = shop();
    let product = shop
        .catalog
        .update_product(DEMO_PRODUCT_ID, ProductPatch::status(ProductStatus::Archived))
        .unwrap();

    let err = shop
        .carts
        .add_to_cart(&UserId::new("u"), &product.product_id(), 1)
        .unwrap_err();
    assert_eq!(err, CommerceError::ProductUnavailable(DEMO_PRODUCT_ID.into()));
}

#[test]
fn admin_product_crud() {
    let shop = shop();
    let before = shop.catalog.count(None);

    let widget = shop
        .catalog
        .create_product(NewProduct::new("Widget", 1000))
        .unwrap();
    assert_eq!(widget.status, ProductStatus::Draft);
    assert_eq!(shop.catalog.count(None), before + 1);

    let published = shop
        .catalog
        .update_product(widget.meta.id(), ProductPatch::status(ProductStatus::Published))
        .unwrap();
    assert_eq!(published.name, "Widget");
    assert_eq!(published.price, 1000);

    // Newest product leads the published listing.
    let listing = shop.catalog.get_products(&ProductQuery::published());
    assert_eq!(listing.products[0].meta.id(), widget.meta.id());

    assert!(shop.catalog.delete_product(widget.meta.id()));
    assert_eq!(shop.catalog.count(None), before);
}

#[tokio::test]
async fn checkout_publishes_cart_cleared_event() {
    let shop = shop();
    let buyer = UserId::new("user-buyer");
    shop.carts
        .add_to_cart(&buyer, &ProductId::new(DEMO_PRODUCT_ID), 3)
        .unwrap();

    let mut rx = shop.events.subscribe();
    shop.orders.create_order(&buyer, customer()).unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        CartEvent::Updated {
            user_id: buyer,
            item_count: 0,
        }
    );
}

#[test]
fn reset_restores_demo_state() {
    let shop = shop();
    let buyer = UserId::new("user-buyer");
    shop.catalog.delete_product(DEMO_PRODUCT_ID);
    shop.catalog
        .create_product(NewProduct::new("Extra", 1))
        .unwrap();
    shop.carts
        .add_to_cart(&buyer, &ProductId::new("550e8400-e29b-41d4-a716-446655440001"), 1)
        .unwrap();
    shop.orders.create_order(&buyer, customer()).unwrap();

    shop.catalog.reset();
    shop.carts.reset();
    shop.orders.reset();

    assert_eq!(
        shop.catalog.get_products(&ProductQuery::default()).products,
        {
            let mut seed = demo_products();
            seed.reverse();
            seed
        }
    );
    assert_eq!(shop.orders.count(), 0);
    assert!(shop.carts.get_cart(&buyer).is_empty());
}

fn race<R: Send>(workers: usize, task: impl Fn(usize) -> R + Sync) -> Vec<R> {
    let barrier = std::sync::Barrier::new(workers);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|i| {
                let barrier = &barrier;
                let task = &task;
                scope.spawn(move || {
                    barrier.wait();
                    task(i)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect()
    })
}

#[test]
fn concurrent_status_changes_follow_transition_table() {
    for _ in 0..200 {
        let shop = shop();
        let buyer = UserId::new("user-buyer");
        shop.carts
            .add_to_cart(&buyer, &ProductId::new(DEMO_PRODUCT_ID), 1)
            .unwrap();
        let order = shop.orders.create_order(&buyer, customer()).unwrap();
        let id = order.meta.id().to_string();
        shop.orders
            .update_order_status(&id, OrderStatus::Confirmed)
            .unwrap();

        // Shipped and cancelled are both reachable from confirmed but not
        // from each other, so exactly one request may win.
        let results = race(8, |i| {
            let next = if i % 2 == 0 {
                OrderStatus::Shipped
            } else {
                OrderStatus::Cancelled
            };
            shop.orders.update_order_status(&id, next)
        });

        let accepted: Vec<OrderStatus> = results
            .iter()
            .filter_map(|r| r.as_ref().ok().map(|o| o.status))
            .collect();
        assert_eq!(accepted.len(), 1, "accepted {accepted:?}");
        assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
            r,
            Err(CommerceError::InvalidStatusTransition { .. })
        )));
        assert_eq!(
            shop.orders.get_order_by_id(&id).unwrap().status,
            accepted[0]
        );
    }
}

#[test]
fn concurrent_checkouts_place_one_order() {
    for _ in 0..200 {
        let shop = shop();
        let buyer = UserId::new("user-buyer");
        shop.carts
            .add_to_cart(&buyer, &ProductId::new(DEMO_PRODUCT_ID), 2)
            .unwrap();

        let results = race(4, |_| shop.orders.create_order(&buyer, customer()));

        let placed = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(placed, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == CommerceError::EmptyCart));
        assert_eq!(shop.orders.count(), 1);
    }
}

#[test]
fn line_added_during_checkout_is_kept() {
    for _ in 0..200 {
        let shop = shop();
        let buyer = UserId::new("user-buyer");
        let tote = ProductId::new("550e8400-e29b-41d4-a716-446655440001");
        shop.carts
            .add_to_cart(&buyer, &ProductId::new(DEMO_PRODUCT_ID), 1)
            .unwrap();

        race(2, |i| {
            if i == 0 {
                shop.orders.create_order(&buyer, customer()).map(|_| ())
            } else {
                shop.carts.add_to_cart(&buyer, &tote, 1).map(|_| ())
            }
        });

        // The tote line is either in the placed order or still in the cart.
        let ordered: i64 = shop
            .orders
            .get_orders(&OrderQuery::for_user(buyer.clone()))
            .orders
            .iter()
            .flat_map(|o| o.items.iter())
            .filter(|item| item.product_id == tote)
            .map(|item| item.quantity)
            .sum();
        let in_cart = shop
            .carts
            .get_cart(&buyer)
            .get_item(&tote)
            .map_or(0, |item| item.quantity);
        assert_eq!(ordered + in_cart, 1);
    }
}
