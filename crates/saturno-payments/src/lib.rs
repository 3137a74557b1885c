//! # saturno-payments
//!
//! Mercado Pago checkout for the saturno loyalty app.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐ {amount,title,email} ┌──────────────────┐ preference ┌──────────────┐
//! │  POS / app  │─────────────────────▶│ CheckoutService  │───────────▶│ Mercado Pago │
//! │             │◀─────────────────────│                  │◀───────────│              │
//! └─────────────┘ {preferenceId,       └──────────────────┘ id,        └──────────────┘
//!                  checkoutUrl}                             init_point
//! ```
//!
//! The buyer is then sent to `checkoutUrl` (the hosted checkout) and comes back
//! through one of the configured back URLs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use saturno_payments::{CheckoutRequest, CheckoutService, CheckoutSettings, MercadoPagoClient};
//!
//! let client = Arc::new(MercadoPagoClient::from_env()?);
//! let service = CheckoutService::new(client, CheckoutSettings::from_env());
//!
//! let session = service
//!     .create_payment_preference(&CheckoutRequest::new(55, "Latte", "ana@example.com"))
//!     .await?;
//!
//! // Redirect buyer to: session.checkout_url
//! ```

mod checkout;
mod client;
mod error;
mod mock;
mod preference;

pub use checkout::{CheckoutRequest, CheckoutService, CheckoutSession, CheckoutSettings, ValidCheckout};
pub use client::{MercadoPagoClient, MercadoPagoConfig, PaymentClient};
pub use error::{CallableError, ErrorCode, PaymentError, Result};
pub use mock::MockPaymentClient;
pub use preference::{
    AutoReturn, BackUrls, Payer, Preference, PreferenceItem, PreferenceRequest,
    PreferenceResponse,
};
