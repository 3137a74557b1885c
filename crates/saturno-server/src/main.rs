//! saturno HTTP Server
//!
//! Hosts the two saturno handlers behind axum:
//!
//! - the `createPaymentPreference` callable (Mercado Pago checkout)
//! - the `sales` document-created trigger (customer stats aggregation)
//!
//! Sales recorded through the development data routes fire the trigger
//! in-process; externally delivered trigger events arrive over HTTP.

mod config;
mod error;
mod handlers;
mod routes;
mod state;
mod triggers;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use saturno_payments::{CheckoutService, CheckoutSettings, MercadoPagoClient, PaymentClient};
use saturno_stats::CustomerStatsAggregator;
use saturno_store::MemoryStore;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Store and stats trigger
    let store = Arc::new(MemoryStore::new());
    let aggregator = Arc::new(CustomerStatsAggregator::with_config(
        store.clone(),
        config.aggregator(),
    ));
    let _sale_trigger = triggers::spawn_sale_trigger(store.subscribe(), aggregator.clone());

    tracing::info!(max_attempts = config.stats_max_attempts, "✓ Sale trigger listening");

    // Initialize payments
    let checkout = match MercadoPagoClient::from_env() {
        Ok(client) => {
            let settings = CheckoutSettings::from_env();
            tracing::info!(
                api_base = %client.config().api_base,
                currency = %settings.currency_id,
                "✓ Mercado Pago configured"
            );
            let client: Arc<dyn PaymentClient> = Arc::new(client);
            Some(Arc::new(CheckoutService::new(client, settings)))
        }
        Err(e) => {
            tracing::warn!("⚠ Mercado Pago not configured - payments disabled ({})", e);
            tracing::warn!("  Set MERCADOPAGO_ACCESS_TOKEN in .env");
            None
        }
    };

    let state = AppState {
        store,
        aggregator,
        checkout,
    };

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("🚀 saturno server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                  - Health check");
    tracing::info!("  POST /createPaymentPreference - Checkout callable");
    tracing::info!("  POST /triggers/sales/created  - Sale trigger");
    tracing::info!("  PUT  /api/customers/{{id}}      - Upsert customer");
    tracing::info!("  GET  /api/customers/{{id}}      - Fetch customer");
    tracing::info!("  POST /api/sales               - Record sale");

    axum::serve(listener, app).await?;

    Ok(())
}
