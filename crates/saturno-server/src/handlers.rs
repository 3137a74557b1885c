//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use saturno_payments::{CallableError, CheckoutRequest, CheckoutSession};
use saturno_store::{Customer, CustomerId, DocumentStore, NewSale, Sale, SaleCreated, SaleId};

use crate::error::{ApiError, CallableFailure};
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
}

/// Callable request envelope for the checkout callable
#[derive(Debug, Deserialize)]
pub struct CheckoutCall {
    #[serde(default)]
    pub data: CheckoutRequest,
}

/// Callable success envelope
#[derive(Debug, Serialize)]
pub struct CallableResult<T> {
    pub result: T,
}

/// Document-created event as delivered by the trigger source
#[derive(Debug, Deserialize)]
pub struct DocumentCreated {
    /// Document path, `sales/{saleId}`
    pub document: String,

    /// Document snapshot, if attached
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: CustomerId,
    pub revision: u64,
    pub document: Customer,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.checkout.is_some(),
    })
}

/// Checkout callable: `{"data": {amount, title, email}}` → `{"result": {preferenceId, checkoutUrl}}`
pub async fn create_payment_preference(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutCall>, JsonRejection>,
) -> Result<Json<CallableResult<CheckoutSession>>, CallableFailure> {
    let Json(call) = payload.map_err(|e| {
        tracing::warn!(error = %e, "Rejected callable body");
        CallableError::invalid_argument(format!("Invalid request body: {}", e.body_text()))
    })?;

    let valid = call.data.validate()?;

    let checkout = state
        .checkout
        .as_ref()
        .ok_or_else(|| CallableError::unavailable("Payments not configured"))?;

    let session = checkout.submit(&valid).await?;

    Ok(Json(CallableResult { result: session }))
}

/// Sale-created trigger endpoint
///
/// Answers 200 for every well-addressed event, whatever the aggregator did:
/// failures are logged, never handed back to the trigger source.
pub async fn sale_created_trigger(
    State(state): State<AppState>,
    Json(event): Json<DocumentCreated>,
) -> Result<Json<Value>, ApiError> {
    let sale_id = SaleId::from_path(&event.document)
        .ok_or_else(|| ApiError::InvalidDocument(event.document.clone()))?;

    let data = match event.value.map(serde_json::from_value::<NewSale>).transpose() {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(sale_id = %sale_id, error = %e, "Malformed sale document");
            return Ok(Json(json!({ "saleId": sale_id, "outcome": "malformed" })));
        }
    };

    let outcome = state.aggregator.handle(SaleCreated::new(sale_id.clone(), data)).await;

    Ok(Json(json!({
        "saleId": sale_id,
        "outcome": outcome.kind(),
        "detail": outcome,
    })))
}

/// Create or replace a customer document
pub async fn put_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(customer): Json<Customer>,
) -> Result<Json<CustomerView>, ApiError> {
    let snapshot = state.store.put_customer(&CustomerId::new(id), customer).await?;

    Ok(Json(CustomerView {
        id: snapshot.id,
        revision: snapshot.revision,
        document: snapshot.customer,
    }))
}

/// Fetch a customer document
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerView>, ApiError> {
    let id = CustomerId::new(id);
    let snapshot = state
        .store
        .get_customer(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(id.path()))?;

    Ok(Json(CustomerView {
        id: snapshot.id,
        revision: snapshot.revision,
        document: snapshot.customer,
    }))
}

/// Record a sale; the sale trigger fires asynchronously
pub async fn create_sale(
    State(state): State<AppState>,
    Json(sale): Json<NewSale>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let sale = state.store.create_sale(sale).await?;

    tracing::info!(sale_id = %sale.id, customer_id = ?sale.customer_id, "Sale recorded");

    Ok((StatusCode::CREATED, Json(sale)))
}
