//! Demo: start every collaborator, fill a cart and check it out in euros.

use checkout_orchestrator::lifecycle::{setup_tracing, CheckoutConfig, CheckoutSystem};
use checkout_orchestrator::model::{Address, CartLine, CreditCardInfo, PlaceOrderRequest};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = CheckoutConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting checkout demo");

    let system = CheckoutSystem::new(&config).map_err(|e| e.to_string())?;

    let user_id = "demo-user";
    let span = tracing::info_span!("cart_setup");
    async {
        for line in [CartLine::new("OLJCESPC7Z", 2), CartLine::new("6E92ZMYYFZ", 1)] {
            system
                .cart
                .add_item(user_id, line)
                .await
                .map_err(|e| e.to_string())?;
        }
        info!("Cart filled");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let request = PlaceOrderRequest {
        user_id: user_id.to_string(),
        user_currency: "EUR".to_string(),
        address: Address {
            street_address: "1600 Amphitheatre Parkway".to_string(),
            city: "Mountain View".to_string(),
            state: "CA".to_string(),
            country: "United States".to_string(),
            zip_code: 94043,
        },
        email: "someone@example.com".to_string(),
        credit_card: CreditCardInfo {
            credit_card_number: "4432-8015-6152-0454".to_string(),
            credit_card_cvv: 672,
            credit_card_expiration_year: 2039,
            credit_card_expiration_month: 1,
        },
    };

    match system.checkout.place_order(request).await {
        Ok(order) => {
            for item in &order.items {
                info!(
                    product_id = %item.item.product_id,
                    quantity = item.item.quantity,
                    unit_cost = %item.cost,
                    "Line"
                );
            }
            info!(
                order_id = %order.order_id,
                tracking_id = %order.shipping_tracking_id,
                shipping = %order.shipping_cost,
                "Order placed successfully"
            );
        }
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
