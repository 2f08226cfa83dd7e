use checkout_orchestrator::checkout::{
    compute_total, CheckoutError, CheckoutStage, RecordingObserver,
};
use checkout_orchestrator::lifecycle::{CheckoutConfig, CheckoutSystem, StartupError};
use checkout_orchestrator::model::{Address, CartLine, CreditCardInfo, PlaceOrderRequest};
use checkout_orchestrator::money::Money;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

fn request(user_id: &str, currency: &str) -> PlaceOrderRequest {
    PlaceOrderRequest {
        user_id: user_id.to_string(),
        user_currency: currency.to_string(),
        address: Address {
            street_address: "1600 Amphitheatre Parkway".to_string(),
            city: "Mountain View".to_string(),
            state: "CA".to_string(),
            country: "United States".to_string(),
            zip_code: 94043,
        },
        email: "someone@example.com".to_string(),
        credit_card: CreditCardInfo {
            credit_card_number: "4432801561520454".to_string(),
            credit_card_cvv: 672,
            credit_card_expiration_year: 2039,
            credit_card_expiration_month: 1,
        },
    }
}

fn system() -> CheckoutSystem {
    CheckoutSystem::new(&CheckoutConfig::default()).expect("Failed to start system")
}

async fn fill_cart(system: &CheckoutSystem, user_id: &str) {
    system
        .cart
        .add_item(user_id, CartLine::new("OLJCESPC7Z", 1))
        .await
        .expect("Failed to add item");
    system
        .cart
        .add_item(user_id, CartLine::new("6E92ZMYYFZ", 1))
        .await
        .expect("Failed to add item");
    // Accumulates onto the first line
    system
        .cart
        .add_item(user_id, CartLine::new("OLJCESPC7Z", 1))
        .await
        .expect("Failed to add item");
}

/// Full end-to-end checkout with all real actors.
#[tokio::test]
async fn test_full_checkout_in_usd() {
    let system = system();
    fill_cart(&system, "alice").await;

    let order = system
        .checkout
        .place_order(request("alice", "USD"))
        .await
        .expect("Checkout failed");

    assert!(uuid::Uuid::parse_str(&order.order_id).is_ok());
    assert_eq!(order.shipping_cost, Money::new("USD", 8, 990_000_000));
    let lines: Vec<(&str, i32, &Money)> = order
        .items
        .iter()
        .map(|i| (i.item.product_id.as_str(), i.item.quantity, &i.cost))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("OLJCESPC7Z", 2, &Money::new("USD", 19, 990_000_000)),
            ("6E92ZMYYFZ", 1, &Money::new("USD", 8, 990_000_000)),
        ]
    );
    let total = compute_total("USD", &order.shipping_cost, &order.items).unwrap();
    assert_eq!(total, Money::new("USD", 57, 960_000_000));

    // Tracking id salt is "1600 Amphitheatre Parkway, Mountain View, CA" (44 chars)
    let parts: Vec<&str> = order.shipping_tracking_id.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert!(parts[1].starts_with("44") && parts[1].len() == 5);
    assert!(parts[2].starts_with("22") && parts[2].len() == 9);

    let cart = system.cart.get_cart("alice").await.unwrap();
    assert!(cart.is_empty(), "Cart should be emptied after checkout");

    system.shutdown().await.expect("Failed to shutdown system");
}

#[tokio::test]
async fn test_checkout_in_eur_converts_exactly() {
    let system = system();
    fill_cart(&system, "bob").await;

    let order = system
        .checkout
        .place_order(request("bob", "EUR"))
        .await
        .expect("Checkout failed");

    // 19.99 USD and 8.99 USD at 1.1305 USD per EUR, truncated to nanos
    assert_eq!(order.items[0].cost, Money::new("EUR", 17, 682_441_397));
    assert_eq!(order.items[1].cost, Money::new("EUR", 7, 952_233_524));
    assert_eq!(order.shipping_cost, Money::new("EUR", 7, 952_233_524));
    assert!(order.items.iter().all(|i| i.cost.is_valid()));

    system.shutdown().await.expect("Failed to shutdown system");
}

#[tokio::test]
async fn test_expired_card_keeps_cart() {
    let system = system();
    fill_cart(&system, "carol").await;

    let mut req = request("carol", "USD");
    req.credit_card.credit_card_expiration_year = 2020;
    let err = system.checkout.place_order(req).await.unwrap_err();

    assert!(matches!(err, CheckoutError::InvalidCard { .. }), "{err}");
    let cart = system.cart.get_cart("carol").await.unwrap();
    assert_eq!(cart.len(), 2, "Cart must survive a failed charge");

    system.shutdown().await.expect("Failed to shutdown system");
}

#[tokio::test]
async fn test_unknown_product_and_currency() {
    let observer = Arc::new(RecordingObserver::new());
    let system = CheckoutSystem::with_observer(&CheckoutConfig::default(), observer.clone())
        .expect("Failed to start system");

    system
        .cart
        .add_item("dave", CartLine::new("NOPE", 1))
        .await
        .unwrap();
    let err = system
        .checkout
        .place_order(request("dave", "USD"))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::NotFound { ref subject, .. } if subject == "NOPE"));

    system.cart.empty_cart("dave").await.unwrap();
    let err = system
        .checkout
        .place_order(request("dave", "XYZ"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::UnsupportedCurrency { ref subject, .. } if subject == "shipping"
    ));

    assert_eq!(observer.failures().len(), 2);
    assert!(!observer.stages().contains(&CheckoutStage::Charged));

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Checkouts for different users run concurrently and stay isolated.
#[tokio::test]
async fn test_concurrent_checkouts() {
    let system = system();
    let users: Vec<String> = (0..5).map(|i| format!("user_{i}")).collect();
    for (i, user) in users.iter().enumerate() {
        system
            .cart
            .add_item(user, CartLine::new("9SIQT8TOJO", i as i32 + 1))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for user in &users {
        let checkout = system.checkout.clone();
        let req = request(user, "JPY");
        handles.push(tokio::spawn(async move { checkout.place_order(req).await }));
    }

    let mut order_ids = HashSet::new();
    for (i, handle) in handles.into_iter().enumerate() {
        let order = handle.await.unwrap().expect("Checkout failed");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].item.quantity, i as i32 + 1);
        assert_eq!(order.items[0].cost.currency_code, "JPY");
        order_ids.insert(order.order_id);
    }
    assert_eq!(order_ids.len(), users.len());

    for user in &users {
        assert!(system.cart.get_cart(user).await.unwrap().is_empty());
    }

    system.shutdown().await.expect("Failed to shutdown system");
}

#[tokio::test]
async fn test_catalog_and_currency_queries() {
    let system = system();

    assert_eq!(system.catalog.list_products().await.unwrap().len(), 9);
    let found = system.catalog.search_products("MUG").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "6E92ZMYYFZ");

    let codes = system.currency.supported_currencies().await.unwrap();
    assert!(codes.contains(&"EUR".to_string()) && codes.contains(&"USD".to_string()));

    system.shutdown().await.expect("Failed to shutdown system");
}

#[tokio::test]
async fn test_missing_catalog_file_fails_startup() {
    let config = CheckoutConfig {
        catalog_path: Some(PathBuf::from("/definitely/not/here/products.json")),
        ..CheckoutConfig::default()
    };
    match CheckoutSystem::new(&config) {
        Err(StartupError::Io { path, .. }) => assert!(path.ends_with("products.json")),
        Err(other) => panic!("Expected Io error, got {other}"),
        Ok(_) => panic!("Startup should fail"),
    }
}
