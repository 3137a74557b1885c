//! Application State

use std::sync::Arc;

use saturno_payments::{CheckoutService, PaymentClient};
use saturno_stats::CustomerStatsAggregator;
use saturno_store::MemoryStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store backing customers and sales
    pub store: Arc<MemoryStore>,

    /// Sale-created trigger handler
    pub aggregator: Arc<CustomerStatsAggregator<MemoryStore>>,

    /// Checkout service (None if payments are not configured)
    pub checkout: Option<Arc<CheckoutService<dyn PaymentClient>>>,
}
