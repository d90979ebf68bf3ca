use crate::domain::model::{
    CardInput, CartEvent, CartItem, ChargeReceipt, CustomerInfo, GatewayStatus, OrderPayload,
    PaymentToken, WebhookResponse,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Key/value persistence with whole-value overwrite semantics (browser local storage).
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn write(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
}

/// External payment processor boundary.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn status(&self) -> GatewayStatus;
    async fn tokenize(&self, card: &CardInput) -> Result<PaymentToken>;
    async fn charge(
        &self,
        token: &PaymentToken,
        amount: Decimal,
        customer: &CustomerInfo,
    ) -> Result<ChargeReceipt>;
}

#[async_trait]
pub trait OrderWebhook: Send + Sync {
    async fn submit(&self, payload: &OrderPayload) -> Result<WebhookResponse>;
}

/// Render-side subscriber; called after every cart mutation with the new item list.
pub trait CartObserver: Send {
    fn on_cart_changed(&mut self, event: &CartEvent, items: &[CartItem]);
}
