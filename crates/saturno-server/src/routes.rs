//! Router

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    create_payment_preference, create_sale, get_customer, health_check, put_customer,
    sale_created_trigger,
};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))

        // Callable
        .route("/createPaymentPreference", post(create_payment_preference))

        // Triggers
        .route("/triggers/sales/created", post(sale_created_trigger))

        // Development data
        .route("/api/customers/{id}", put(put_customer).get(get_customer))
        .route("/api/sales", post(create_sale))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
