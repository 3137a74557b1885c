//! # saturno-store
//!
//! Document store abstraction for the saturno loyalty backend.
//!
//! Two collections matter here:
//!
//! ```text
//! sales/{saleId}          customers/{clienteId}
//! ┌──────────────────┐    ┌──────────────────────┐
//! │ clienteId ───────┼───▶│ firstVisit           │
//! │ productoNombre   │    │ lastVisit            │
//! │ timestamp        │    │ lastDrink            │
//! └──────────────────┘    │ favoriteDrink        │
//!                         │ ..anything else      │
//!                         └──────────────────────┘
//! ```
//!
//! Sales are written by the point-of-sale flow and never change. Customers are
//! only touched through partial updates ([`CustomerUpdate`]), so fields this
//! crate knows nothing about survive every write.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use saturno_store::{DocumentStore, MemoryStore, NewSale};
//!
//! let store = MemoryStore::new();
//! let mut events = store.subscribe();
//!
//! store.create_sale(NewSale::new(Some("c-1".into()), "Latte", Utc::now())).await?;
//! let created = events.recv().await?; // SaleCreated for sales/{id}
//! ```

mod error;
mod event;
mod memory;
mod model;

pub use error::{Result, StoreError};
pub use event::SaleCreated;
pub use memory::MemoryStore;
pub use model::{
    Customer, CustomerId, CustomerSnapshot, CustomerUpdate, NewSale, Precondition, Sale,
    SaleId,
};

use async_trait::async_trait;

/// Document store capability (Strategy pattern)
///
/// Implemented by [`MemoryStore`] for development and tests; a hosted document
/// database plugs in behind the same trait.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a customer document together with its current revision
    async fn get_customer(&self, id: &CustomerId) -> Result<Option<CustomerSnapshot>>;

    /// Create or replace a customer document
    async fn put_customer(&self, id: &CustomerId, customer: Customer) -> Result<CustomerSnapshot>;

    /// Apply a partial update to an existing customer document
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist and
    /// with [`StoreError::RevisionConflict`] if the precondition no longer holds.
    async fn update_customer(
        &self,
        id: &CustomerId,
        update: &CustomerUpdate,
        precondition: Precondition,
    ) -> Result<u64>;

    /// Fetch a single sale
    async fn get_sale(&self, id: &SaleId) -> Result<Option<Sale>>;

    /// All sales whose `clienteId` equals `customer`, ordered by sale id
    async fn sales_for_customer(&self, customer: &CustomerId) -> Result<Vec<Sale>>;

    /// Insert a new sale under a generated id
    async fn create_sale(&self, sale: NewSale) -> Result<Sale>;
}
