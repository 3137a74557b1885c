//! In-memory Document Store
//!
//! For development and tests. Doubles as a trigger source: every sale insert
//! is broadcast as a [`SaleCreated`] event to current subscribers.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tokio::sync::broadcast;

use crate::DocumentStore;
use crate::error::{Result, StoreError};
use crate::event::SaleCreated;
use crate::model::{
    Customer, CustomerId, CustomerSnapshot, CustomerUpdate, NewSale, Precondition, Sale, SaleId,
};

const EVENT_CAPACITY: usize = 256;

/// In-memory store keyed like the hosted collections
pub struct MemoryStore {
    customers: RwLock<BTreeMap<CustomerId, (u64, Customer)>>,
    sales: RwLock<BTreeMap<SaleId, Sale>>,
    events: broadcast::Sender<SaleCreated>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            customers: RwLock::new(BTreeMap::new()),
            sales: RwLock::new(BTreeMap::new()),
            events,
        }
    }

    /// Receive a [`SaleCreated`] event for every sale inserted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SaleCreated> {
        self.events.subscribe()
    }

    /// Insert a sale under a caller-chosen id without firing the trigger
    ///
    /// Used to seed history.
    pub fn insert_sale(&self, id: SaleId, sale: NewSale) -> Result<Sale> {
        let sale = sale.with_id(id);
        self.sales.write()?.insert(sale.id.clone(), sale.clone());
        Ok(sale)
    }

    /// Number of stored sales
    pub fn sale_count(&self) -> Result<usize> {
        Ok(self.sales.read()?.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_customer(&self, id: &CustomerId) -> Result<Option<CustomerSnapshot>> {
        let customers = self.customers.read()?;
        Ok(customers.get(id).map(|(revision, customer)| CustomerSnapshot {
            id: id.clone(),
            revision: *revision,
            customer: customer.clone(),
        }))
    }

    async fn put_customer(&self, id: &CustomerId, customer: Customer) -> Result<CustomerSnapshot> {
        let mut customers = self.customers.write()?;
        let revision = customers.get(id).map_or(1, |(revision, _)| revision + 1);
        customers.insert(id.clone(), (revision, customer.clone()));

        Ok(CustomerSnapshot {
            id: id.clone(),
            revision,
            customer,
        })
    }

    async fn update_customer(
        &self,
        id: &CustomerId,
        update: &CustomerUpdate,
        precondition: Precondition,
    ) -> Result<u64> {
        let mut customers = self.customers.write()?;
        let (revision, customer) = customers
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.path()))?;

        if let Precondition::Revision(expected) = precondition
            && *revision != expected
        {
            return Err(StoreError::RevisionConflict {
                path: id.path(),
                expected,
                actual: *revision,
            });
        }

        customer.apply(update);
        *revision += 1;
        Ok(*revision)
    }

    async fn get_sale(&self, id: &SaleId) -> Result<Option<Sale>> {
        Ok(self.sales.read()?.get(id).cloned())
    }

    async fn sales_for_customer(&self, customer: &CustomerId) -> Result<Vec<Sale>> {
        let sales = self.sales.read()?;
        Ok(sales
            .values()
            .filter(|sale| sale.customer_id.as_ref() == Some(customer))
            .cloned()
            .collect())
    }

    async fn create_sale(&self, sale: NewSale) -> Result<Sale> {
        let sale = self.insert_sale(SaleId::generate(), sale)?;

        if self.events.send(SaleCreated::from(&sale)).is_err() {
            tracing::debug!(sale_id = %sale.id, "No trigger subscribers for created sale");
        }

        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn update(drink: &str) -> CustomerUpdate {
        CustomerUpdate {
            last_visit: Utc::now(),
            last_drink: drink.into(),
            first_visit: None,
            favorite_drink: None,
        }
    }

    #[tokio::test]
    async fn test_put_and_get_customer() {
        let store = MemoryStore::new();
        let id = CustomerId::from("c-1");

        assert!(store.get_customer(&id).await.unwrap().is_none());

        let snapshot = store.put_customer(&id, Customer::default()).await.unwrap();
        assert_eq!(snapshot.revision, 1);

        let fetched = store.get_customer(&id).await.unwrap().unwrap();
        assert_eq!(fetched, snapshot);
    }

    #[tokio::test]
    async fn test_update_missing_customer_fails() {
        let store = MemoryStore::new();
        let result = store
            .update_customer(&CustomerId::from("ghost"), &update("Latte"), Precondition::Exists)
            .await;

        assert!(matches!(result, Err(StoreError::NotFound(path)) if path == "customers/ghost"));
    }

    #[tokio::test]
    async fn test_update_checks_revision() {
        let store = MemoryStore::new();
        let id = CustomerId::from("c-1");
        store.put_customer(&id, Customer::default()).await.unwrap();

        let revision = store
            .update_customer(&id, &update("Latte"), Precondition::Revision(1))
            .await
            .unwrap();
        assert_eq!(revision, 2);

        let stale = store
            .update_customer(&id, &update("Mocha"), Precondition::Revision(1))
            .await
            .unwrap_err();
        assert!(stale.is_conflict());

        let stored = store.get_customer(&id).await.unwrap().unwrap();
        assert_eq!(stored.customer.last_drink.as_deref(), Some("Latte"));
    }

    #[tokio::test]
    async fn test_sales_query_filters_by_customer() {
        let store = MemoryStore::new();
        let ana = CustomerId::from("ana");
        let now = Utc::now();

        store.insert_sale(SaleId::from_string("b"), NewSale::new(Some(ana.clone()), "Mocha", now)).unwrap();
        store.insert_sale(SaleId::from_string("a"), NewSale::new(Some(ana.clone()), "Latte", now)).unwrap();
        store.insert_sale(SaleId::from_string("c"), NewSale::new(Some("luis".into()), "Latte", now)).unwrap();
        store.insert_sale(SaleId::from_string("d"), NewSale::new(None, "Latte", now)).unwrap();

        let sales = store.sales_for_customer(&ana).await.unwrap();
        let ids: Vec<_> = sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.sale_count().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_create_sale_broadcasts_event() {
        let store = MemoryStore::new();
        let mut events = store.subscribe();

        let sale = store
            .create_sale(NewSale::new(Some("ana".into()), "Latte", Utc::now()))
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.sale_id, sale.id);
        assert_eq!(event.data.unwrap().product_name, "Latte");
        assert!(store.get_sale(&sale.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_sale_without_subscribers() {
        let store = MemoryStore::new();
        let sale = store
            .create_sale(NewSale::new(None, "Latte", Utc::now()))
            .await
            .unwrap();
        assert!(store.get_sale(&sale.id).await.unwrap().is_some());
    }
}
