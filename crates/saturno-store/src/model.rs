//! Sale and Customer Records
//!
//! Wire names follow the documents as the point-of-sale app writes them
//! (`clienteId`, `productoNombre`, `timestamp`, camelCase customer fields).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Customer document key (`customers/{id}`)
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Document path inside the store
    pub fn path(&self) -> String {
        format!("customers/{}", self.0)
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Generated sale document key (`sales/{id}`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    /// Generate a new 20-character auto id
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(hex[..20].to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the id out of a `sales/{id}` document path
    pub fn from_path(path: &str) -> Option<Self> {
        let id = path.trim_start_matches('/').strip_prefix("sales/")?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Self(id.to_string()))
    }
}

impl std::fmt::Display for SaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of a sale document, as written by the point-of-sale flow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    /// Optional reference to the buying customer
    #[serde(rename = "clienteId", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,

    /// Product (drink) sold
    #[serde(rename = "productoNombre")]
    pub product_name: String,

    /// When the sale happened
    pub timestamp: DateTime<Utc>,
}

impl NewSale {
    pub fn new(
        customer_id: Option<CustomerId>,
        product_name: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_id,
            product_name: product_name.into(),
            timestamp,
        }
    }

    /// Customer reference, treating an empty id as no reference
    pub fn customer(&self) -> Option<&CustomerId> {
        self.customer_id.as_ref().filter(|id| !id.as_str().is_empty())
    }

    pub fn with_id(self, id: SaleId) -> Sale {
        Sale {
            id,
            customer_id: self.customer_id,
            product_name: self.product_name,
            timestamp: self.timestamp,
        }
    }
}

/// A stored sale
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "saleId")]
    pub id: SaleId,

    #[serde(rename = "clienteId", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,

    #[serde(rename = "productoNombre")]
    pub product_name: String,

    pub timestamp: DateTime<Utc>,
}

/// Customer document
///
/// Only the visit statistics are typed; every other field is carried in
/// `extra` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Set once, by the first sale processed for this customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_visit: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_drink: Option<String>,

    /// Most frequent product over the customer's sale history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_drink: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    /// Apply a partial update in place
    pub fn apply(&mut self, update: &CustomerUpdate) {
        self.last_visit = Some(update.last_visit);
        self.last_drink = Some(update.last_drink.clone());

        if let Some(first_visit) = update.first_visit {
            self.first_visit = Some(first_visit);
        }
        if let Some(ref favorite) = update.favorite_drink {
            self.favorite_drink = Some(favorite.clone());
        }
    }
}

/// A customer document plus the revision it was read at
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub revision: u64,
    pub customer: Customer,
}

/// Partial update written by the stats aggregator
///
/// `None` fields are left untouched on the stored document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub last_visit: DateTime<Utc>,

    pub last_drink: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_visit: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_drink: Option<String>,
}

/// Write precondition for [`crate::DocumentStore::update_customer`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precondition {
    /// Document must exist
    Exists,

    /// Document must exist and still be at this revision
    Revision(u64),
}
