//! Mercado Pago REST Client

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{PaymentError, Result};
use crate::preference::{Preference, PreferenceRequest, PreferenceResponse};

/// Payment-preference API capability (Strategy pattern)
///
/// [`MercadoPagoClient`] talks to the real API; [`crate::MockPaymentClient`]
/// stands in for it in tests.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Create a checkout preference
    ///
    /// Fails with [`PaymentError::MissingField`] when the API answers without
    /// an `id` or `init_point`.
    async fn create_preference(&self, request: &PreferenceRequest) -> Result<Preference>;

    /// Provider name
    fn name(&self) -> &str;
}

/// Mercado Pago client configuration
#[derive(Clone, Debug)]
pub struct MercadoPagoConfig {
    /// Private access token (`TEST-...` or `APP_USR-...`)
    pub access_token: String,

    /// API base URL
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MercadoPagoConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://api.mercadopago.com";

    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_base: Self::DEFAULT_API_BASE.into(),
            timeout_secs: 30,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var("MERCADOPAGO_ACCESS_TOKEN")
            .map_err(|_| PaymentError::Config("MERCADOPAGO_ACCESS_TOKEN not set".into()))?;
        let api_base = std::env::var("MERCADOPAGO_API_BASE")
            .unwrap_or_else(|_| Self::DEFAULT_API_BASE.into());
        let timeout_secs = std::env::var("MERCADOPAGO_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            access_token,
            api_base,
            timeout_secs,
        })
    }

    fn preferences_url(&self) -> String {
        format!("{}/checkout/preferences", self.api_base.trim_end_matches('/'))
    }
}

/// Mercado Pago preferences client
pub struct MercadoPagoClient {
    http: reqwest::Client,
    config: MercadoPagoConfig,
}

impl MercadoPagoClient {
    pub fn new(config: MercadoPagoConfig) -> Result<Self> {
        if config.access_token.trim().is_empty() {
            return Err(PaymentError::Config("Mercado Pago access token is empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(MercadoPagoConfig::from_env()?)
    }

    pub fn config(&self) -> &MercadoPagoConfig {
        &self.config
    }
}

#[async_trait]
impl PaymentClient for MercadoPagoClient {
    async fn create_preference(&self, request: &PreferenceRequest) -> Result<Preference> {
        let response = self
            .http
            .post(self.config.preferences_url())
            .bearer_auth(&self.config.access_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        response.json::<PreferenceResponse>().await?.try_into()
    }

    fn name(&self) -> &str {
        "mercadopago"
    }
}

/// Pull the human-readable message out of an API error body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_url() {
        let mut config = MercadoPagoConfig::new("TEST-token");
        assert_eq!(config.preferences_url(), "https://api.mercadopago.com/checkout/preferences");

        config.api_base = "http://localhost:9000/".into();
        assert_eq!(config.preferences_url(), "http://localhost:9000/checkout/preferences");
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = MercadoPagoClient::new(MercadoPagoConfig::new("  "));
        assert!(matches!(result, Err(PaymentError::Config(_))));
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"message":"invalid access token","error":"unauthorized","status":401}"#),
            "invalid access token"
        );
        assert_eq!(api_error_message("Bad Gateway\n"), "Bad Gateway");
    }
}
