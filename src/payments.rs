//! Payment provider collaborator
//!
//! The checkout engine only ever sees the `PaymentProvider` trait; the
//! production implementation talks to a Stripe-style HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle returned by the provider for a created payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug)]
pub struct PaymentError(pub String);

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PaymentError {}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent for `amount_minor` minor currency units.
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Stripe-style HTTP implementation.
pub struct HttpPaymentProvider {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpPaymentProvider {
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            secret_key: secret_key.into(),
        }
    }
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.base_url);

        // Idempotency key guards against double charges on network retries.
        let idempotency_key = uuid::Uuid::new_v4().to_string();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .header("Idempotency-Key", idempotency_key)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", currency.to_string()),
            ])
            .send()
            .await
            .map_err(|e| PaymentError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("payment intent creation failed: {} {}", status, body);
            return Err(PaymentError(format!(
                "payment intent creation failed with status {}",
                status
            )));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError(e.to_string()))
    }
}
