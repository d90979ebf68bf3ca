use crate::domain::model::{CardInput, ChargeReceipt, CustomerInfo, GatewayStatus, PaymentToken};
use crate::domain::ports::PaymentGateway;
use crate::utils::error::{Result, ShopError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;

/// Stand-in for the hosted card SDK: checks the card locally and approves after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    application_id: String,
    location_id: String,
    approval_delay: Duration,
}

impl SimulatedGateway {
    pub fn new(
        application_id: impl Into<String>,
        location_id: impl Into<String>,
        approval_delay: Duration,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            location_id: location_id.into(),
            approval_delay,
        }
    }
}

fn digits(number: &str) -> Vec<u32> {
    number.chars().filter_map(|c| c.to_digit(10)).collect()
}

pub fn luhn_valid(number: &str) -> bool {
    if number.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '-')) {
        return false;
    }
    let digits = digits(number);
    if !(12..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn expiry_valid(expiry: &str) -> bool {
    let Some((month, year)) = expiry.trim().split_once('/') else {
        return false;
    };
    let month_ok = matches!(month.parse::<u32>(), Ok(1..=12));
    let year_ok = year.len() == 2 && year.chars().all(|c| c.is_ascii_digit());
    month_ok && year_ok
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    fn status(&self) -> GatewayStatus {
        if self.application_id.trim().is_empty() || self.location_id.trim().is_empty() {
            return GatewayStatus::Unavailable {
                reason: "payment credentials are not configured".to_string(),
            };
        }
        GatewayStatus::Ready
    }

    async fn tokenize(&self, card: &CardInput) -> Result<PaymentToken> {
        if !luhn_valid(&card.number) {
            return Err(ShopError::PaymentError {
                message: "Card number is invalid".to_string(),
            });
        }
        if !expiry_valid(&card.expiry) {
            return Err(ShopError::PaymentError {
                message: "Expiration date must be MM/YY".to_string(),
            });
        }
        let cvv = digits(&card.cvv);
        if !(3..=4).contains(&cvv.len()) || cvv.len() != card.cvv.trim().len() {
            return Err(ShopError::PaymentError {
                message: "Security code is invalid".to_string(),
            });
        }

        let number = digits(&card.number);
        let last4: String = number[number.len() - 4..]
            .iter()
            .map(|d| char::from_digit(*d, 10).unwrap_or('0'))
            .collect();
        let nonce = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();

        tracing::debug!("Tokenized card ****{} at {}", last4, self.location_id);
        Ok(PaymentToken(format!("cnon:{}:{}:{:x}", self.location_id, last4, nonce)))
    }

    async fn charge(
        &self,
        token: &PaymentToken,
        amount: Decimal,
        customer: &CustomerInfo,
    ) -> Result<ChargeReceipt> {
        let mut parts = token.0.split(':');
        let (Some("cnon"), Some(_location), Some(last4), Some(nonce)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ShopError::PaymentError {
                message: "Payment token was not issued by this gateway".to_string(),
            });
        };

        tokio::time::sleep(self.approval_delay).await;

        tracing::info!(
            "Simulated charge of {:.2} for {} approved (app {})",
            amount,
            customer.email,
            self.application_id
        );
        Ok(ChargeReceipt {
            payment_id: nonce.to_uppercase(),
            amount,
            card_last4: last4.to_string(),
        })
    }
}

/// Used when the card SDK could not be loaded; every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableGateway {
    reason: String,
}

impl UnavailableGateway {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> ShopError {
        ShopError::GatewayUnavailable {
            reason: self.reason.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for UnavailableGateway {
    fn status(&self) -> GatewayStatus {
        GatewayStatus::Unavailable {
            reason: self.reason.clone(),
        }
    }

    async fn tokenize(&self, _card: &CardInput) -> Result<PaymentToken> {
        Err(self.error())
    }

    async fn charge(
        &self,
        _token: &PaymentToken,
        _amount: Decimal,
        _customer: &CustomerInfo,
    ) -> Result<ChargeReceipt> {
        Err(self.error())
    }
}
