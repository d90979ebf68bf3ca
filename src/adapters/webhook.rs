use crate::domain::model::{OrderPayload, WebhookResponse};
use crate::domain::ports::OrderWebhook;
use crate::utils::error::{Result, ShopError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Spreadsheet order webhook over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOrderWebhook {
    client: Client,
    endpoint: String,
}

impl HttpOrderWebhook {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl OrderWebhook for HttpOrderWebhook {
    async fn submit(&self, payload: &OrderPayload) -> Result<WebhookResponse> {
        tracing::debug!("POST {} ({} items)", self.endpoint, payload.items.len());
        let response = self.client.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        tracing::debug!("Webhook response status: {}", status);
        if !status.is_success() {
            return Err(ShopError::WebhookError {
                message: format!("endpoint returned HTTP {}", status),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<WebhookResponse>(&body).map_err(|e| ShopError::WebhookError {
            message: format!("unexpected response body ({}): {}", e, body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fireworks::{submit_order, FireworksOrder};
    use crate::domain::model::{FulfillmentMethod, OrderLine, WebhookResult};
    use httpmock::prelude::*;
    use rust_decimal::Decimal;

    fn order() -> FireworksOrder {
        FireworksOrder::new(
            "Sam",
            FulfillmentMethod::Pickup,
            vec![OrderLine::new("500g Cake", 2, Decimal::new(8999, 2))],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_submit_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/exec")
                .json_body_partial(
                    r#"{"customerName":"Sam","fulfillmentMethod":"pickup","total":179.98}"#,
                );
            then.status(200)
                .json_body(serde_json::json!({"result": "success", "message": "Row 12 added"}));
        });

        let webhook = HttpOrderWebhook::new(server.url("/exec"), Duration::from_secs(5)).unwrap();
        let response = webhook.submit(&order().to_payload()).await.unwrap();

        mock.assert();
        assert_eq!(response.result, WebhookResult::Success);
        assert_eq!(response.message, "Row 12 added");
    }

    #[tokio::test]
    async fn test_error_result_becomes_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/exec");
            then.status(200)
                .json_body(serde_json::json!({"result": "error", "message": "Sheet locked"}));
        });

        let webhook = HttpOrderWebhook::new(server.url("/exec"), Duration::from_secs(5)).unwrap();
        let err = submit_order(&webhook, &order()).await.unwrap_err();
        assert!(matches!(err, ShopError::WebhookError { ref message } if message == "Sheet locked"));
    }

    #[tokio::test]
    async fn test_http_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/exec");
            then.status(502);
        });

        let webhook = HttpOrderWebhook::new(server.url("/exec"), Duration::from_secs(5)).unwrap();
        let err = webhook.submit(&order().to_payload()).await.unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_garbage_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/exec");
            then.status(200).body("<html>Moved</html>");
        });

        let webhook = HttpOrderWebhook::new(server.url("/exec"), Duration::from_secs(5)).unwrap();
        assert!(webhook.submit(&order().to_payload()).await.is_err());
    }
}
