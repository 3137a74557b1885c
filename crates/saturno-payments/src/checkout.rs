//! Checkout Session Creator
//!
//! Turns a caller's `{amount, title, email}` into a Mercado Pago preference
//! and hands back the hosted checkout URL.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::client::PaymentClient;
use crate::error::CallableError;
use crate::preference::{AutoReturn, BackUrls, Payer, PreferenceItem, PreferenceRequest};

pub(crate) const MISSING_ARGUMENTS: &str =
    r#"La función debe ser llamada con los argumentos "amount", "title" y "email"."#;
pub(crate) const PREFERENCE_FAILED: &str = "No se pudo crear la preferencia de Mercado Pago.";

/// Fixed parts of every preference
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// ISO currency code for the line item
    pub currency_id: String,

    pub back_urls: BackUrls,
}

impl CheckoutSettings {
    pub const DEFAULT_CURRENCY: &'static str = "MXN";
    pub const DEFAULT_BACK_URL: &'static str =
        "https://console.firebase.google.com/project/saturnotrcventasdb/overview";

    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.into());

        Self {
            currency_id: var("CHECKOUT_CURRENCY", &defaults.currency_id),
            back_urls: BackUrls {
                success: var("CHECKOUT_SUCCESS_URL", &defaults.back_urls.success),
                failure: var("CHECKOUT_FAILURE_URL", &defaults.back_urls.failure),
                pending: var("CHECKOUT_PENDING_URL", &defaults.back_urls.pending),
            },
        }
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            currency_id: Self::DEFAULT_CURRENCY.into(),
            back_urls: BackUrls::uniform(Self::DEFAULT_BACK_URL),
        }
    }
}

/// Raw callable payload
///
/// Fields stay untyped: missing, `null` and empty values are all reported the
/// same way, and present values reach the payment API exactly as sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub amount: Value,

    #[serde(default)]
    pub title: Value,

    #[serde(default)]
    pub email: Value,
}

/// A request that passed the presence check
#[derive(Clone, Debug, PartialEq)]
pub struct ValidCheckout {
    pub amount: Value,
    pub title: Value,
    pub email: Value,
}

impl CheckoutRequest {
    pub fn new(amount: impl Into<Value>, title: impl Into<Value>, email: impl Into<Value>) -> Self {
        Self {
            amount: amount.into(),
            title: title.into(),
            email: email.into(),
        }
    }

    /// Presence check on all three fields
    ///
    /// Nothing else is checked: a negative amount, a string amount or a
    /// non-string title goes through to the payment API, which decides.
    pub fn validate(&self) -> Result<ValidCheckout, CallableError> {
        if !(is_truthy(&self.amount) && is_truthy(&self.title) && is_truthy(&self.email)) {
            return Err(CallableError::invalid_argument(MISSING_ARGUMENTS));
        }

        Ok(ValidCheckout {
            amount: self.amount.clone(),
            title: self.title.clone(),
            email: self.email.clone(),
        })
    }
}

/// JavaScript truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Successful callable result
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub preference_id: String,
    pub checkout_url: String,
}

/// Creates checkout sessions against a [`PaymentClient`]
pub struct CheckoutService<P: PaymentClient + ?Sized> {
    client: Arc<P>,
    settings: CheckoutSettings,
}

impl<P: PaymentClient + ?Sized> CheckoutService<P> {
    pub const fn new(client: Arc<P>, settings: CheckoutSettings) -> Self {
        Self { client, settings }
    }

    /// Build the preference body for a validated request
    pub fn build_preference(&self, checkout: &ValidCheckout) -> PreferenceRequest {
        PreferenceRequest {
            items: vec![PreferenceItem {
                title: checkout.title.clone(),
                quantity: 1,
                currency_id: self.settings.currency_id.clone(),
                unit_price: checkout.amount.clone(),
            }],
            payer: Payer {
                email: checkout.email.clone(),
            },
            back_urls: self.settings.back_urls.clone(),
            auto_return: AutoReturn::Approved,
        }
    }

    /// Validate, create the preference, return its id and checkout URL
    pub async fn create_payment_preference(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CallableError> {
        let checkout = request.validate()?;
        self.submit(&checkout).await
    }

    /// Create the preference for an already validated request
    pub async fn submit(&self, checkout: &ValidCheckout) -> Result<CheckoutSession, CallableError> {
        let preference = self.build_preference(checkout);

        tracing::info!(
            provider = self.client.name(),
            title = %checkout.title,
            amount = %checkout.amount,
            currency = %self.settings.currency_id,
            "Creating payment preference"
        );
        tracing::debug!(body = ?preference, "Preference request");

        let created = self.client.create_preference(&preference).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create payment preference");
            CallableError::internal(PREFERENCE_FAILED).with_details(e.to_string())
        })?;

        tracing::info!(
            preference_id = %created.id,
            checkout_url = %created.init_point,
            "Payment preference created"
        );

        Ok(CheckoutSession {
            preference_id: created.id,
            checkout_url: created.init_point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::mock::MockPaymentClient;
    use serde_json::json;

    fn service(client: &Arc<MockPaymentClient>) -> CheckoutService<MockPaymentClient> {
        CheckoutService::new(client.clone(), CheckoutSettings::default())
    }

    #[tokio::test]
    async fn test_valid_request_returns_session() {
        let client = Arc::new(MockPaymentClient::created("pref-123", "https://mp.example/init/pref-123"));

        let session = service(&client)
            .create_payment_preference(&CheckoutRequest::new(150, "Frappé", "ana@example.com"))
            .await
            .unwrap();

        assert_eq!(session.preference_id, "pref-123");
        assert_eq!(session.checkout_url, "https://mp.example/init/pref-123");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_preference_body() {
        let client = Arc::new(MockPaymentClient::created("p", "u"));

        service(&client)
            .create_payment_preference(&CheckoutRequest::new(49.9, "Latte", "ana@example.com"))
            .await
            .unwrap();

        let sent = client.requests().remove(0);
        assert_eq!(sent.items.len(), 1);
        assert_eq!(sent.items[0].title, "Latte");
        assert_eq!(sent.items[0].quantity, 1);
        assert_eq!(sent.items[0].currency_id, "MXN");
        assert_eq!(sent.items[0].unit_price, json!(49.9));
        assert_eq!(sent.payer.email, "ana@example.com");
        assert_eq!(sent.back_urls, BackUrls::uniform(CheckoutSettings::DEFAULT_BACK_URL));
        assert_eq!(sent.auto_return, AutoReturn::Approved);
    }

    #[tokio::test]
    async fn test_missing_fields_never_reach_api() {
        let client = Arc::new(MockPaymentClient::created("p", "u"));
        let service = service(&client);

        let cases = [
            json!({"title": "Latte", "email": "ana@example.com"}),
            json!({"amount": 0, "title": "Latte", "email": "ana@example.com"}),
            json!({"amount": 10, "title": "", "email": "ana@example.com"}),
            json!({"amount": 10, "title": "Latte", "email": null}),
            json!({"amount": 10, "title": "Latte"}),
            json!({}),
        ];

        for case in cases {
            let request: CheckoutRequest = serde_json::from_value(case.clone()).unwrap();
            let err = service.create_payment_preference(&request).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidArgument, "case {case}");
            assert_eq!(err.message, MISSING_ARGUMENTS);
        }

        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_api_failure_becomes_internal() {
        let client = Arc::new(MockPaymentClient::rejecting(401, "invalid access token"));

        let err = service(&client)
            .create_payment_preference(&CheckoutRequest::new(10, "Latte", "ana@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, PREFERENCE_FAILED);
        let details = err.details.unwrap();
        assert!(details.as_str().unwrap().contains("invalid access token"));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_non_numeric_amount_is_left_to_the_api() {
        let client = Arc::new(MockPaymentClient::rejecting(400, "unit_price must be a number"));

        let err = service(&client)
            .create_payment_preference(&CheckoutRequest::new("lots", "Latte", "ana@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.requests()[0].items[0].unit_price, json!("lots"));
    }

    #[tokio::test]
    async fn test_values_forwarded_unchanged() {
        let client = Arc::new(MockPaymentClient::created("p", "u"));

        service(&client)
            .create_payment_preference(&CheckoutRequest::new("12.50", 7, "ana@example.com"))
            .await
            .unwrap();

        let sent = client.requests().remove(0);
        assert_eq!(sent.items[0].unit_price, json!("12.50"));
        assert_eq!(sent.items[0].title, json!(7));

        let checkout = CheckoutRequest::new(-5, "Refund", "ana@example.com").validate().unwrap();
        assert_eq!(checkout.amount, json!(-5));
    }

    #[tokio::test]
    async fn test_missing_checkout_url_becomes_internal() {
        let client = Arc::new(MockPaymentClient::without_init_point("pref-9"));

        let err = service(&client)
            .create_payment_preference(&CheckoutRequest::new(10, "Latte", "ana@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, PREFERENCE_FAILED);
        assert!(err.details.unwrap().as_str().unwrap().contains("init_point"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!({})));
    }
}
