//! Saga tests: a real `CheckoutService` against scripted collaborators.

use checkout_orchestrator::checkout::{
    CancelHandle, CheckoutError, CheckoutEvent, CheckoutService, CheckoutStage, Collaborators,
    RecordingObserver,
};
use checkout_orchestrator::clients::{
    CartClient, CatalogClient, CurrencyClient, EmailClient, PaymentClient, ShippingClient,
};
use checkout_orchestrator::framework::mock::MockClient;
use checkout_orchestrator::framework::{FrameworkError, Service, ServiceClient};
use checkout_orchestrator::model::{Address, CartLine, CreditCardInfo, PlaceOrderRequest, Product};
use checkout_orchestrator::money::Money;
use checkout_orchestrator::services::{
    CartError, CartRequest, CartResponse, CartStore, CatalogError, CatalogResponse,
    CurrencyConverter, CurrencyError, CurrencyResponse, EmailError, EmailNotifier, EmailResponse,
    PaymentError, PaymentGateway, PaymentRequest, PaymentResponse, ProductCatalog, ShippingError,
    ShippingRequest, ShippingResponse, ShippingService,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    cart: MockClient<CartStore>,
    catalog: MockClient<ProductCatalog>,
    currency: MockClient<CurrencyConverter>,
    shipping: MockClient<ShippingService>,
    payment: MockClient<PaymentGateway>,
    email: MockClient<EmailNotifier>,
    observer: Arc<RecordingObserver>,
    timeout: Option<Duration>,
}

impl Harness {
    fn new() -> Self {
        Self {
            cart: MockClient::new(),
            catalog: MockClient::new(),
            currency: MockClient::new(),
            shipping: MockClient::new(),
            payment: MockClient::new(),
            email: MockClient::new(),
            observer: Arc::new(RecordingObserver::new()),
            timeout: None,
        }
    }

    fn client<S: Service>(&self, mock: &MockClient<S>) -> ServiceClient<S>
    where
        S::Request: Clone,
    {
        match self.timeout {
            Some(limit) => mock.client().with_timeout(limit),
            None => mock.client(),
        }
    }

    fn service(&self) -> CheckoutService {
        CheckoutService::new(
            Collaborators {
                cart: CartClient::new(self.client(&self.cart)),
                catalog: CatalogClient::new(self.client(&self.catalog)),
                currency: CurrencyClient::new(self.client(&self.currency)),
                shipping: ShippingClient::new(self.client(&self.shipping)),
                payment: PaymentClient::new(self.client(&self.payment)),
                email: EmailClient::new(self.client(&self.email)),
            },
            self.observer.clone(),
        )
    }

    fn verify(&self) {
        self.cart.verify();
        self.catalog.verify();
        self.currency.verify();
        self.shipping.verify();
        self.payment.verify();
        self.email.verify();
    }
}

fn usd(units: i64, nanos: i32) -> Money {
    Money::new("USD", units, nanos)
}

fn eur(units: i64, nanos: i32) -> Money {
    Money::new("EUR", units, nanos)
}

fn request(currency: &str) -> PlaceOrderRequest {
    request_for("user_1", currency)
}

fn request_for(user_id: &str, currency: &str) -> PlaceOrderRequest {
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

fn charged_amount(payment: &MockClient<PaymentGateway>) -> Money {
    match payment.requests().as_slice() {
        [PaymentRequest::Charge { amount, .. }] => amount.clone(),
        other => panic!("Expected one charge, got {other:?}"),
    }
}

/// Scripts a one-line cart (2 x Sunglasses) priced in EUR up to the charge.
fn script_priced_cart(h: &mut Harness) {
    h.cart
        .expect_call()
        .return_ok(CartResponse::Cart(vec![CartLine::new("OLJCESPC7Z", 2)]));
    h.catalog
        .expect_call()
        .return_ok(CatalogResponse::Product(Product::new(
            "OLJCESPC7Z",
            "Sunglasses",
            usd(19, 990_000_000),
        )));
    h.currency
        .expect_call()
        .return_ok(CurrencyResponse::Converted(eur(17, 680_000_000)));
    h.shipping
        .expect_call()
        .return_ok(ShippingResponse::Quote(usd(8, 990_000_000)));
    h.currency
        .expect_call()
        .return_ok(CurrencyResponse::Converted(eur(7, 950_000_000)));
}

fn script_after_charge(h: &mut Harness) {
    h.payment.expect_call().return_ok(PaymentResponse::Charged {
        transaction_id: "txn-1".to_string(),
    });
    h.shipping.expect_call().return_ok(ShippingResponse::Shipped {
        tracking_id: "AB-441234-221234567".to_string(),
    });
}

#[tokio::test]
async fn test_happy_path_charges_items_plus_shipping() {
    let mut h = Harness::new();
    script_priced_cart(&mut h);
    script_after_charge(&mut h);
    h.cart.expect_call().return_ok(CartResponse::Emptied);
    h.email.expect_call().return_ok(EmailResponse::Sent);

    let order = h.service().place_order(request("EUR")).await.unwrap();

    assert!(!order.order_id.is_empty());
    assert_eq!(order.shipping_tracking_id, "AB-441234-221234567");
    assert_eq!(order.shipping_cost, eur(7, 950_000_000));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].cost, eur(17, 680_000_000));
    // 2 x 17.68 + 7.95
    assert_eq!(charged_amount(&h.payment), eur(43, 310_000_000));

    assert_eq!(
        h.observer.stages(),
        vec![
            CheckoutStage::Start,
            CheckoutStage::CartFetched,
            CheckoutStage::Priced,
            CheckoutStage::Totaled,
            CheckoutStage::Charged,
            CheckoutStage::Shipped,
            CheckoutStage::CartCleared,
            CheckoutStage::Notified,
            CheckoutStage::Done,
        ]
    );
    assert!(h.observer.failures().is_empty());

    match h.cart.requests().last() {
        Some(CartRequest::EmptyCart { user_id }) => assert_eq!(user_id, "user_1"),
        other => panic!("Expected EmptyCart, got {other:?}"),
    }
    h.verify();
}

#[tokio::test]
async fn test_empty_cart_charges_shipping_only() {
    let mut h = Harness::new();
    h.cart.expect_call().return_ok(CartResponse::Cart(vec![]));
    h.shipping
        .expect_call()
        .return_ok(ShippingResponse::Quote(usd(8, 990_000_000)));
    h.currency
        .expect_call()
        .return_ok(CurrencyResponse::Converted(usd(8, 990_000_000)));
    script_after_charge(&mut h);
    h.cart.expect_call().return_ok(CartResponse::Emptied);
    h.email.expect_call().return_ok(EmailResponse::Sent);

    let order = h.service().place_order(request("USD")).await.unwrap();

    assert!(order.items.is_empty());
    assert_eq!(charged_amount(&h.payment), usd(8, 990_000_000));
    assert_eq!(h.catalog.call_count(), 0);
    h.verify();
}

#[tokio::test]
async fn test_failed_charge_never_ships_or_clears() {
    let mut h = Harness::new();
    script_priced_cart(&mut h);
    h.payment
        .expect_call()
        .return_err(PaymentError::InvalidCard("number failed validation".into()));

    let err = h.service().place_order(request("EUR")).await.unwrap_err();

    match &err {
        CheckoutError::InvalidCard { subject, reason } => {
            assert_eq!(subject, "user_1");
            assert!(reason.contains("failed validation"));
        }
        other => panic!("Expected InvalidCard, got {other:?}"),
    }
    assert!(err.is_fatal());
    // Only the quote reached shipping, only the fetch reached the cart
    assert!(matches!(
        h.shipping.requests().as_slice(),
        [ShippingRequest::GetQuote { .. }]
    ));
    assert!(matches!(h.cart.requests().as_slice(), [CartRequest::GetCart { .. }]));
    assert_eq!(h.email.call_count(), 0);
    assert_eq!(h.observer.failures(), vec![err]);
    h.verify();
}

#[tokio::test]
async fn test_failed_email_still_returns_order() {
    let mut h = Harness::new();
    script_priced_cart(&mut h);
    script_after_charge(&mut h);
    h.cart.expect_call().return_ok(CartResponse::Emptied);
    h.email
        .expect_call()
        .return_err(EmailError::InvalidRecipient("someone@example.com".into()));

    let order = h.service().place_order(request("EUR")).await.unwrap();

    assert!(!order.order_id.is_empty());
    assert_eq!(order.shipping_tracking_id, "AB-441234-221234567");
    match h.observer.failures().as_slice() {
        [CheckoutError::NotificationFailed { subject, .. }] => {
            assert_eq!(subject, "someone@example.com")
        }
        other => panic!("Expected one NotificationFailed, got {other:?}"),
    }
    let stages = h.observer.stages();
    assert!(stages.contains(&CheckoutStage::CartCleared));
    assert!(!stages.contains(&CheckoutStage::Notified));
    assert_eq!(stages.last(), Some(&CheckoutStage::Done));
    h.verify();
}

#[tokio::test]
async fn test_failed_cart_clear_still_returns_order() {
    let mut h = Harness::new();
    script_priced_cart(&mut h);
    script_after_charge(&mut h);
    h.cart
        .expect_call()
        .return_err(CartError::Transport(FrameworkError::ActorClosed));
    h.email.expect_call().return_ok(EmailResponse::Sent);

    let order = h.service().place_order(request("EUR")).await.unwrap();

    assert_eq!(order.items.len(), 1);
    let failures = h.observer.failures();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], CheckoutError::CartClearFailed { .. }));
    assert!(!failures[0].is_fatal());
    assert_eq!(h.email.call_count(), 1);
    let stages = h.observer.stages();
    assert!(!stages.contains(&CheckoutStage::CartCleared));
    assert!(stages.contains(&CheckoutStage::Notified));
    h.verify();
}

#[tokio::test]
async fn test_failed_shipment_after_charge_is_fatal() {
    let mut h = Harness::new();
    script_priced_cart(&mut h);
    h.payment.expect_call().return_ok(PaymentResponse::Charged {
        transaction_id: "txn-1".to_string(),
    });
    h.shipping
        .expect_call()
        .return_err(ShippingError::InvalidAddress("nowhere".into()));

    let err = h.service().place_order(request("EUR")).await.unwrap_err();

    match &err {
        CheckoutError::ShippingFailed { subject, reason } => {
            assert_eq!(subject, "user_1");
            assert!(reason.contains("nowhere"), "{reason}");
        }
        other => panic!("Expected ShippingFailed, got {other:?}"),
    }
    assert!(err.is_fatal());
    assert_eq!(h.payment.call_count(), 1);
    // The cart is kept and no confirmation goes out
    assert!(matches!(h.cart.requests().as_slice(), [CartRequest::GetCart { .. }]));
    assert_eq!(h.email.call_count(), 0);
    assert_eq!(h.observer.stages().last(), Some(&CheckoutStage::Charged));
    h.verify();
}

#[tokio::test]
async fn test_unreachable_payment_is_declined() {
    let mut h = Harness::new();
    script_priced_cart(&mut h);
    h.payment
        .expect_call()
        .return_err(PaymentError::Transport(FrameworkError::ActorClosed));

    let err = h.service().place_order(request("EUR")).await.unwrap_err();

    assert!(
        matches!(err, CheckoutError::PaymentDeclined { ref subject, .. } if subject == "user_1"),
        "{err:?}"
    );
    assert!(matches!(
        h.shipping.requests().as_slice(),
        [ShippingRequest::GetQuote { .. }]
    ));
    assert_eq!(h.email.call_count(), 0);
    h.verify();
}

#[tokio::test]
async fn test_missing_product_stops_before_quote() {
    let mut h = Harness::new();
    h.cart
        .expect_call()
        .return_ok(CartResponse::Cart(vec![CartLine::new("MISSING", 1)]));
    h.catalog
        .expect_call()
        .return_err(CatalogError::NotFound("MISSING".into()));

    let err = h.service().place_order(request("EUR")).await.unwrap_err();

    assert!(matches!(err, CheckoutError::NotFound { ref subject, .. } if subject == "MISSING"));
    assert_eq!(h.shipping.call_count(), 0);
    assert_eq!(h.currency.call_count(), 0);
    assert_eq!(h.payment.call_count(), 0);
    h.verify();
}

#[tokio::test]
async fn test_unsupported_currency_names_product() {
    let mut h = Harness::new();
    h.cart
        .expect_call()
        .return_ok(CartResponse::Cart(vec![CartLine::new("OLJCESPC7Z", 1)]));
    h.catalog
        .expect_call()
        .return_ok(CatalogResponse::Product(Product::new(
            "OLJCESPC7Z",
            "Sunglasses",
            usd(19, 990_000_000),
        )));
    h.currency
        .expect_call()
        .return_err(CurrencyError::Unsupported("XXX".into()));

    let err = h.service().place_order(request("XXX")).await.unwrap_err();

    match err {
        CheckoutError::UnsupportedCurrency { subject, reason } => {
            assert_eq!(subject, "OLJCESPC7Z");
            assert!(reason.contains("XXX"));
        }
        other => panic!("Expected UnsupportedCurrency, got {other:?}"),
    }
    assert_eq!(h.payment.call_count(), 0);
    h.verify();
}

#[tokio::test]
async fn test_converter_answering_wrong_currency_is_fatal() {
    let mut h = Harness::new();
    h.cart.expect_call().return_ok(CartResponse::Cart(vec![]));
    h.shipping
        .expect_call()
        .return_ok(ShippingResponse::Quote(usd(8, 990_000_000)));
    // Asked for EUR, answered in USD
    h.currency
        .expect_call()
        .return_ok(CurrencyResponse::Converted(usd(8, 990_000_000)));

    let err = h.service().place_order(request("EUR")).await.unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::ConversionFailed { ref subject, .. } if subject == "shipping"
    ));
    assert_eq!(h.payment.call_count(), 0);
    h.verify();
}

#[tokio::test]
async fn test_cancel_while_pricing_skips_charge() {
    let mut h = Harness::new();
    h.cart.expect_call().return_ok(CartResponse::Cart(vec![]));
    h.shipping
        .expect_call()
        .return_ok(ShippingResponse::Quote(usd(8, 990_000_000)));
    h.currency.expect_call().never_reply();

    let handle = CancelHandle::new();
    let signal = handle.signal();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    let err = h
        .service()
        .place_order_with_cancel(request("EUR"), &signal)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::Cancelled {
            stage: CheckoutStage::CartFetched
        }
    );
    assert_eq!(h.payment.call_count(), 0);
    assert!(!h.observer.stages().contains(&CheckoutStage::Totaled));
}

#[tokio::test]
async fn test_cancel_during_charge_waits_for_payment() {
    let mut h = Harness::new();
    script_priced_cart(&mut h);
    h.payment.expect_call().return_ok_after(
        Duration::from_millis(50),
        PaymentResponse::Charged {
            transaction_id: "txn-1".to_string(),
        },
    );

    let handle = CancelHandle::new();
    let signal = handle.signal();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    let err = h
        .service()
        .place_order_with_cancel(request("EUR"), &signal)
        .await
        .unwrap_err();

    // The charge went through, so the reported stage says so
    assert_eq!(
        err,
        CheckoutError::Cancelled {
            stage: CheckoutStage::Charged
        }
    );
    assert_eq!(h.payment.call_count(), 1);
    assert!(h.observer.stages().contains(&CheckoutStage::Charged));
    assert!(matches!(
        h.shipping.requests().as_slice(),
        [ShippingRequest::GetQuote { .. }]
    ));
    h.verify();
}

#[tokio::test]
async fn test_cancel_after_shipment_still_returns_order() {
    let mut h = Harness::new();
    script_priced_cart(&mut h);
    script_after_charge(&mut h);
    h.cart.expect_call().return_ok(CartResponse::Emptied);
    h.email.expect_call().never_reply();

    let handle = CancelHandle::new();
    let signal = handle.signal();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    let order = h
        .service()
        .place_order_with_cancel(request("EUR"), &signal)
        .await
        .unwrap();

    assert_eq!(order.shipping_tracking_id, "AB-441234-221234567");
    assert_eq!(
        h.observer.failures(),
        vec![CheckoutError::Cancelled {
            stage: CheckoutStage::CartCleared
        }]
    );
    let stages = h.observer.stages();
    assert!(!stages.contains(&CheckoutStage::Notified));
    assert_eq!(stages.last(), Some(&CheckoutStage::Done));
    h.verify();
}

#[tokio::test]
async fn test_cancelled_before_start_calls_nothing() {
    let h = Harness::new();
    let handle = CancelHandle::new();
    handle.cancel();

    let err = h
        .service()
        .place_order_with_cancel(request("EUR"), &handle.signal())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::Cancelled {
            stage: CheckoutStage::Start
        }
    );
    assert_eq!(h.cart.call_count(), 0);
    h.verify();
}

#[tokio::test]
async fn test_timed_out_quote_is_quote_failure() {
    let mut h = Harness::new();
    h.timeout = Some(Duration::from_millis(30));
    h.cart.expect_call().return_ok(CartResponse::Cart(vec![]));
    h.shipping.expect_call().never_reply();

    let err = h.service().place_order(request("USD")).await.unwrap_err();

    match err {
        CheckoutError::QuoteFailed { subject, reason } => {
            assert_eq!(subject, "user_1");
            assert!(reason.contains("timed out"), "{reason}");
        }
        other => panic!("Expected QuoteFailed, got {other:?}"),
    }
    assert_eq!(h.payment.call_count(), 0);
}

/// Two users failing at the same time each get their own order id and error.
#[tokio::test]
async fn test_concurrent_failures_are_reported_per_order() {
    let mut h = Harness::new();
    for _ in 0..2 {
        h.cart
            .expect_call()
            .return_err(CartError::Transport(FrameworkError::ActorDropped));
    }
    let service = h.service();

    let tasks: Vec<_> = ["user_1", "user_2"]
        .into_iter()
        .map(|user| {
            let service = service.clone();
            tokio::spawn(async move { service.place_order(request_for(user, "USD")).await })
        })
        .collect();
    let mut subjects = HashSet::new();
    for task in tasks {
        match task.await.unwrap() {
            Err(CheckoutError::CartUnavailable { subject, .. }) => {
                subjects.insert(subject);
            }
            other => panic!("Expected CartUnavailable, got {other:?}"),
        }
    }
    assert_eq!(subjects, HashSet::from(["user_1".to_string(), "user_2".to_string()]));

    let fetched: HashSet<String> = h
        .cart
        .requests()
        .into_iter()
        .map(|r| match r {
            CartRequest::GetCart { user_id } => user_id,
            other => panic!("Expected GetCart, got {other:?}"),
        })
        .collect();
    assert_eq!(fetched, subjects);

    let order_ids: HashSet<String> = h
        .observer
        .events()
        .into_iter()
        .map(|e| match e {
            CheckoutEvent::Stage { order_id, .. } | CheckoutEvent::Failure { order_id, .. } => {
                order_id
            }
        })
        .collect();
    assert_eq!(order_ids.len(), 2);
    assert_eq!(h.observer.failures().len(), 2);
    h.verify();
}
