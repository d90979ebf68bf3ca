use crate::domain::model::Quote;
use rust_decimal::{Decimal, RoundingStrategy};

/// (minimum item count, discount percent), highest tier first.
const TIERS: [(usize, i64); 2] = [(5, 15), (3, 10)];

/// Discount rate for a package of `item_count` services. Thresholds are inclusive.
pub fn discount_rate(item_count: usize) -> Decimal {
    TIERS
        .iter()
        .find(|(min, _)| item_count >= *min)
        .map(|(_, pct)| Decimal::new(*pct, 2))
        .unwrap_or(Decimal::ZERO)
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Prices a package. Both the builder summary and the add-to-cart path go through here.
pub fn quote(prices: &[Decimal]) -> Quote {
    let subtotal: Decimal = prices.iter().copied().sum();
    let rate = discount_rate(prices.len());
    let discount = round_money(subtotal * rate);

    Quote {
        item_count: prices.len(),
        subtotal,
        discount_rate: rate,
        discount,
        total: subtotal - discount,
    }
}

impl Quote {
    /// Whole-number percentage for display ("10% off").
    pub fn discount_percent(&self) -> Decimal {
        (self.discount_rate * Decimal::ONE_HUNDRED).normalize()
    }
}
