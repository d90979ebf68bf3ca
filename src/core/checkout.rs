use crate::core::cart::CartService;
use crate::domain::model::{CardInput, CustomerInfo, GatewayStatus, OrderConfirmation};
use crate::domain::ports::{PaymentGateway, Storage};
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{require_form_field, validate_email, Validate};
use rust_decimal::Decimal;

impl Validate for CustomerInfo {
    fn validate(&self) -> Result<()> {
        require_form_field("name", &self.name)?;
        require_form_field("email", &self.email)?;
        validate_email(&self.email)?;
        require_form_field("phone number", &self.phone)?;
        Ok(())
    }
}

/// Collects customer info, charges the cart total through the gateway, and clears the cart.
pub struct CheckoutService<G: PaymentGateway> {
    gateway: G,
}

impl<G: PaymentGateway> CheckoutService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Status line shown above the card form.
    pub fn status_message(&self) -> String {
        match self.gateway.status() {
            GatewayStatus::Ready => "Secure payment ready".to_string(),
            GatewayStatus::Unavailable { reason } => {
                format!("Payment system unavailable: {}", reason)
            }
        }
    }

    /// Runs the payment. The cart is cleared only after a successful charge.
    ///
    /// Once the charge goes through the confirmation is always returned; a
    /// cart that cannot be cleared afterwards is only logged.
    pub async fn checkout<S: Storage>(
        &self,
        cart: &mut CartService<S>,
        customer: &CustomerInfo,
        card: &CardInput,
    ) -> Result<OrderConfirmation> {
        if cart.is_empty() {
            return Err(ShopError::validation("Your cart is empty"));
        }
        customer.validate()?;

        let total = cart.total();
        if total <= Decimal::ZERO {
            return Err(ShopError::validation(format!(
                "Cart total must be positive to check out (got {:.2})",
                total
            )));
        }

        if let GatewayStatus::Unavailable { reason } = self.gateway.status() {
            tracing::warn!("Checkout blocked, gateway unavailable: {}", reason);
            return Err(ShopError::GatewayUnavailable { reason });
        }

        tracing::info!("💳 Tokenizing card for {}", customer.email);
        let token = self.gateway.tokenize(card).await?;

        tracing::info!("💳 Charging {:.2}", total);
        let receipt = self.gateway.charge(&token, total, customer).await?;

        let confirmation = OrderConfirmation {
            order_id: format!("ORD-{}", receipt.payment_id),
            customer: customer.clone(),
            items: cart.items().to_vec(),
            total,
            receipt,
            created_at: chrono::Utc::now(),
        };

        tracing::info!(
            order_id = %confirmation.order_id,
            items = confirmation.items.len(),
            "✅ Booking confirmed: {}",
            serde_json::to_string(&confirmation)?
        );

        if let Err(e) = cart.clear().await {
            tracing::warn!(
                order_id = %confirmation.order_id,
                "⚠️ Payment captured but the cart could not be cleared: {}",
                e
            );
        }
        Ok(confirmation)
    }
}
