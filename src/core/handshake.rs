use crate::core::pricing::round_money;
use crate::utils::error::{Result, ShopError};
use rust_decimal::Decimal;
use std::str::FromStr;
use url::Url;

/// `?checkout=true&total=<amount>` carried from the cart to the contact page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationParams {
    pub total: Decimal,
}

impl ContinuationParams {
    pub fn new(total: Decimal) -> Self {
        Self {
            total: round_money(total),
        }
    }

    /// Returns `None` unless `checkout=true` and `total` is a decimal.
    pub fn from_url(url: &Url) -> Option<Self> {
        let mut checkout = false;
        let mut total = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "checkout" => checkout = value == "true",
                "total" => total = Decimal::from_str(value.trim()).ok(),
                _ => {}
            }
        }
        if !checkout {
            return None;
        }
        total.map(Self::new)
    }

    pub fn parse(url: &str) -> Result<Option<Self>> {
        let url = Url::parse(url).map_err(|e| ShopError::validation(format!("Invalid URL '{}': {}", url, e)))?;
        Ok(Self::from_url(&url))
    }

    /// Appends the handshake parameters to `base`, replacing any earlier ones.
    pub fn apply_to(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let kept: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(k, _)| k != "checkout" && k != "total")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (k, v) in &kept {
                query.append_pair(k, v);
            }
            query
                .append_pair("checkout", "true")
                .append_pair("total", &format!("{:.2}", self.total));
        }
        url
    }

    /// Text dropped into the contact form's message box.
    pub fn prefill_message(&self) -> String {
        format!(
            "I'd like to complete my booking. Cart total: ${:.2}",
            self.total
        )
    }
}
