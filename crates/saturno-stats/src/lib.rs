//! # saturno-stats
//!
//! Customer statistics recomputed on every new sale.
//!
//! ```text
//! sales/{id} created
//!        │
//!        ▼
//!  ┌───────────┐  no data / no customer / unknown customer
//!  │  intake   │──────────────────────────────────────────▶ done (no-op)
//!  └─────┬─────┘
//!        ▼
//!  ┌───────────┐   ┌──────────────────────┐   ┌──────────────────────┐
//!  │  lookup   │──▶│ query customer sales │──▶│ conditional update   │
//!  └───────────┘   └──────────────────────┘   └──────────────────────┘
//! ```
//!
//! Every aggregate is derived from the full sale history, never incremented,
//! so redelivered events and retried writes converge on the same document.

mod aggregator;
pub mod stats;

pub use aggregator::{AggregationOutcome, AggregatorConfig, CustomerStatsAggregator};
pub use stats::{build_update, favorite_product};
