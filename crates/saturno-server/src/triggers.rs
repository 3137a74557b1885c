//! In-process Trigger Dispatch
//!
//! Subscribes to the store's sale events and runs one aggregator invocation per
//! event on its own task, the way a hosted trigger would.

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use saturno_stats::CustomerStatsAggregator;
use saturno_store::{DocumentStore, SaleCreated};

/// Spawn the dispatcher; it exits when the event channel closes
pub fn spawn_sale_trigger<S>(
    mut events: broadcast::Receiver<SaleCreated>,
    aggregator: Arc<CustomerStatsAggregator<S>>,
) -> JoinHandle<()>
where
    S: DocumentStore + 'static,
{
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let aggregator = aggregator.clone();
                    tokio::spawn(async move {
                        let sale_id = event.sale_id.clone();
                        let outcome = aggregator.handle(event).await;
                        tracing::debug!(sale_id = %sale_id, outcome = outcome.kind(), "Sale trigger finished");
                    });
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Sale trigger lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::info!("Sale trigger stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use saturno_store::{Customer, CustomerId, MemoryStore, NewSale};
    use std::time::Duration;

    #[tokio::test]
    async fn test_created_sale_updates_customer() {
        let store = Arc::new(MemoryStore::new());
        let aggregator = Arc::new(CustomerStatsAggregator::new(store.clone()));
        let _dispatcher = spawn_sale_trigger(store.subscribe(), aggregator);

        let ana = CustomerId::from("ana");
        store.put_customer(&ana, Customer::default()).await.unwrap();
        let at = Utc.with_ymd_and_hms(2024, 7, 13, 9, 30, 0).unwrap();
        store
            .create_sale(NewSale::new(Some(ana.clone()), "Latte", at))
            .await
            .unwrap();

        let customer = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let snapshot = store.get_customer(&ana).await.unwrap().unwrap();
                if snapshot.customer.last_visit.is_some() {
                    return snapshot.customer;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(customer.first_visit, Some(at));
        assert_eq!(customer.favorite_drink.as_deref(), Some("Latte"));
    }
}
