use crate::domain::model::{FulfillmentMethod, OrderLine, OrderPayload, WebhookResult};
use crate::domain::ports::OrderWebhook;
use crate::utils::error::{Result, ShopError};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub name: &'static str,
    pub price_cents: i64,
}

impl Product {
    pub fn price(&self) -> Decimal {
        Decimal::new(self.price_cents, 2)
    }
}

static PRODUCTS: &[Product] = &[
    Product { name: "Sparklers (12 pack)", price_cents: 599 },
    Product { name: "Fountain Assortment", price_cents: 2499 },
    Product { name: "Roman Candles (6 pack)", price_cents: 1299 },
    Product { name: "500g Cake", price_cents: 8999 },
    Product { name: "Family Pack", price_cents: 14999 },
];

pub fn products() -> &'static [Product] {
    PRODUCTS
}

pub fn find_product(name: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

impl OrderLine {
    pub fn new(name: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
            subtotal: price * Decimal::from(quantity),
        }
    }
}

/// A validated intake-form order, ready to post to the spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FireworksOrder {
    customer_name: String,
    fulfillment: FulfillmentMethod,
    lines: Vec<OrderLine>,
}

impl FireworksOrder {
    /// Lines with zero quantity are dropped; at least one must remain.
    pub fn new(
        customer_name: &str,
        fulfillment: FulfillmentMethod,
        lines: Vec<OrderLine>,
    ) -> Result<Self> {
        if customer_name.trim().is_empty() {
            return Err(ShopError::validation("Please enter your name"));
        }
        let lines: Vec<_> = lines.into_iter().filter(|l| l.quantity > 0).collect();
        if lines.is_empty() {
            return Err(ShopError::validation("Please add at least one item to your order"));
        }
        Ok(Self {
            customer_name: customer_name.trim().to_string(),
            fulfillment,
            lines,
        })
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn to_payload(&self) -> OrderPayload {
        OrderPayload {
            customer_name: self.customer_name.clone(),
            fulfillment_method: self.fulfillment,
            timestamp: chrono::Utc::now(),
            total: self.total(),
            items: self.lines.clone(),
        }
    }
}

/// Posts the order and turns a `result: "error"` reply into an error.
pub async fn submit_order<W: OrderWebhook>(webhook: &W, order: &FireworksOrder) -> Result<String> {
    let payload = order.to_payload();
    tracing::info!(
        "🎆 Submitting order for {} ({} line(s), total {:.2})",
        payload.customer_name,
        payload.items.len(),
        payload.total
    );

    let response = webhook.submit(&payload).await?;
    match response.result {
        WebhookResult::Success => {
            tracing::info!("Order accepted: {}", response.message);
            Ok(response.message)
        }
        WebhookResult::Error => {
            tracing::error!("Order rejected by webhook: {}", response.message);
            Err(ShopError::WebhookError {
                message: response.message,
            })
        }
    }
}
