//! Customer Stats Aggregator
//!
//! Runs once per created sale document and rewrites the buying customer's
//! visit statistics from their complete sale history.

use serde::Serialize;
use std::sync::Arc;

use saturno_store::{
    CustomerId, CustomerUpdate, DocumentStore, NewSale, Precondition, SaleCreated, StoreError,
};

use crate::stats::build_update;

/// Aggregator settings
#[derive(Clone, Debug)]
pub struct AggregatorConfig {
    /// Recompute attempts when the customer document changes under us
    ///
    /// `1` means a single conditional write and no second try.
    pub max_attempts: u32,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// What a single trigger invocation ended up doing
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AggregationOutcome {
    /// Event carried no document data
    NoData,

    /// Sale has no customer reference
    NoCustomer,

    /// Referenced customer document does not exist
    CustomerNotFound { customer_id: CustomerId },

    /// Customer document updated
    Updated {
        customer_id: CustomerId,
        update: CustomerUpdate,
        revision: u64,
    },

    /// Store failure, logged and dropped
    Failed {
        customer_id: CustomerId,
        reason: String,
    },
}

impl AggregationOutcome {
    /// Short name used in logs and trigger responses
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::NoCustomer => "no_customer",
            Self::CustomerNotFound { .. } => "customer_not_found",
            Self::Updated { .. } => "updated",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Recomputes customer aggregates on sale creation
pub struct CustomerStatsAggregator<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    config: AggregatorConfig,
}

impl<S: DocumentStore + ?Sized> CustomerStatsAggregator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, AggregatorConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: AggregatorConfig) -> Self {
        Self { store, config }
    }

    /// Handle one sale-created event
    ///
    /// Never fails: store errors are logged and reported as
    /// [`AggregationOutcome::Failed`], since a trigger has no caller to answer.
    pub async fn handle(&self, event: SaleCreated) -> AggregationOutcome {
        let SaleCreated { sale_id, data } = event;

        let Some(sale) = data else {
            tracing::warn!(sale_id = %sale_id, "No data associated with the sale event");
            return AggregationOutcome::NoData;
        };

        let Some(customer_id) = sale.customer().cloned() else {
            tracing::debug!(sale_id = %sale_id, "Sale has no customer, skipping");
            return AggregationOutcome::NoCustomer;
        };

        match self.recompute(&customer_id, &sale).await {
            Ok(Some((update, revision))) => {
                tracing::info!(
                    sale_id = %sale_id,
                    customer_id = %customer_id,
                    favorite = ?update.favorite_drink,
                    first_visit = update.first_visit.is_some(),
                    "Customer stats updated"
                );
                AggregationOutcome::Updated {
                    customer_id,
                    update,
                    revision,
                }
            }
            Ok(None) => {
                tracing::warn!(
                    sale_id = %sale_id,
                    customer_id = %customer_id,
                    "Customer referenced by sale does not exist"
                );
                AggregationOutcome::CustomerNotFound { customer_id }
            }
            Err(e) => {
                tracing::error!(
                    sale_id = %sale_id,
                    customer_id = %customer_id,
                    error = %e,
                    "Failed to update customer stats"
                );
                AggregationOutcome::Failed {
                    customer_id,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Read, recompute and conditionally write, starting over on conflict
    async fn recompute(
        &self,
        customer_id: &CustomerId,
        sale: &NewSale,
    ) -> Result<Option<(CustomerUpdate, u64)>, StoreError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.recompute_once(customer_id, sale).await {
                Err(e) if e.is_conflict() && attempt < max_attempts => {
                    tracing::warn!(
                        customer_id = %customer_id,
                        attempt,
                        "Customer changed during recompute, retrying"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn recompute_once(
        &self,
        customer_id: &CustomerId,
        sale: &NewSale,
    ) -> Result<Option<(CustomerUpdate, u64)>, StoreError> {
        let Some(snapshot) = self.store.get_customer(customer_id).await? else {
            return Ok(None);
        };

        let history = self.store.sales_for_customer(customer_id).await?;
        let update = build_update(&snapshot.customer, sale, &history);

        let revision = self
            .store
            .update_customer(customer_id, &update, Precondition::Revision(snapshot.revision))
            .await?;

        Ok(Some((update, revision)))
    }
}
