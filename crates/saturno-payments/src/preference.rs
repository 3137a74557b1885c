//! Checkout Preference Types
//!
//! Request and response shapes of `POST /checkout/preferences`.
//!
//! Caller-supplied values (`title`, `unit_price`, `email`) are carried as raw
//! JSON: Mercado Pago is the one that judges their type and range.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PaymentError;

/// Preference creation request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub payer: Payer,
    pub back_urls: BackUrls,
    pub auto_return: AutoReturn,
}

/// A single line item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreferenceItem {
    pub title: Value,
    pub quantity: u32,
    pub currency_id: String,
    pub unit_price: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    pub email: Value,
}

/// Where the buyer lands after leaving the hosted checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

impl BackUrls {
    /// Same URL for every result
    pub fn uniform(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            success: url.clone(),
            failure: url.clone(),
            pending: url,
        }
    }
}

/// When to send the buyer back automatically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoReturn {
    Approved,
}

/// Preference as it comes off the wire
///
/// Only the fields we use are modelled; the rest is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceResponse {
    #[serde(default)]
    pub id: Option<String>,

    /// Hosted checkout URL
    #[serde(default)]
    pub init_point: Option<String>,
}

/// A created preference
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preference {
    pub id: String,
    pub init_point: String,
}

impl TryFrom<PreferenceResponse> for Preference {
    type Error = PaymentError;

    fn try_from(response: PreferenceResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: response.id.ok_or(PaymentError::MissingField("id"))?,
            init_point: response
                .init_point
                .ok_or(PaymentError::MissingField("init_point"))?,
        })
    }
}
