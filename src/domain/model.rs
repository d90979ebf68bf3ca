use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Time-ordered cart line id (epoch millis at creation, bumped to stay unique).
pub type ItemId = i64;

/// One line in the cart. Discount lines carry a negative `unit_price`.
///
/// Field names on the wire match the stored layout
/// `{id, service, duration, price}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    #[serde(rename = "service")]
    pub service_name: String,
    #[serde(rename = "duration")]
    pub duration_label: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    Added(CartItem),
    Removed(ItemId),
    Cleared,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Massage,
    Facial,
    Addon,
    Membership,
}

impl CatalogKind {
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Massage => "massage",
            CatalogKind::Facial => "facial",
            CatalogKind::Addon => "add-on",
            CatalogKind::Membership => "membership",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceOption {
    pub label: &'static str,
    pub price_cents: i64,
}

impl PriceOption {
    pub fn price(&self) -> Decimal {
        Decimal::new(self.price_cents, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: CatalogKind,
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [PriceOption],
}

impl CatalogEntry {
    pub fn has_single_option(&self) -> bool {
        self.options.len() == 1
    }

    pub fn option(&self, label: &str) -> Option<&'static PriceOption> {
        self.options.iter().find(|o| o.label.eq_ignore_ascii_case(label))
    }

    /// Lowest price across the options ("from $X" on the menu).
    pub fn starting_price(&self) -> Decimal {
        self.options
            .iter()
            .map(PriceOption::price)
            .min()
            .unwrap_or(Decimal::ZERO)
    }
}

/// A catalog entry pinned to one of its price options.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedService {
    pub name: String,
    pub duration_label: String,
    pub price: Decimal,
}

impl SelectedService {
    pub fn from_entry(entry: &CatalogEntry, option: &PriceOption) -> Self {
        Self {
            name: entry.name.to_string(),
            duration_label: option.label.to_string(),
            price: option.price(),
        }
    }
}

/// Builder-only selection; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageSelection {
    pub massage: Option<SelectedService>,
    pub facial: Option<SelectedService>,
    /// 以名稱為鍵的集合，保留點選順序
    pub addons: Vec<SelectedService>,
    pub membership: Option<SelectedService>,
    pub notes: Option<String>,
}

impl PackageSelection {
    /// Priced components in cart order: massage, facial, add-ons, membership.
    pub fn priced_components(&self) -> Vec<&SelectedService> {
        self.massage
            .iter()
            .chain(self.facial.iter())
            .chain(self.addons.iter())
            .chain(self.membership.iter())
            .collect()
    }

    pub fn prices(&self) -> Vec<Decimal> {
        self.priced_components().iter().map(|s| s.price).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.priced_components().is_empty()
    }

    pub fn has_addon(&self, name: &str) -> bool {
        self.addons.iter().any(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub item_count: usize,
    pub subtotal: Decimal,
    pub discount_rate: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

/// Raw card details as typed into the payment form.
#[derive(Clone, PartialEq)]
pub struct CardInput {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
    pub postal_code: String,
}

impl std::fmt::Debug for CardInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last4: String = self
            .number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        f.debug_struct("CardInput")
            .field("number", &format!("****{}", last4))
            .finish_non_exhaustive()
    }
}

/// Opaque single-use reference returned by tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    Ready,
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeReceipt {
    pub payment_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub card_last4: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
    pub customer: CustomerInfo,
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub receipt: ChargeReceipt,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentMethod {
    Pickup,
    Delivery,
}

impl std::str::FromStr for FulfillmentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            other => Err(format!("unknown fulfillment method '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

/// Body POSTed to the order spreadsheet webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer_name: String,
    pub fulfillment_method: FulfillmentMethod,
    pub timestamp: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookResult {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub result: WebhookResult,
    #[serde(default)]
    pub message: String,
}
