//! Mock Payment Client
//!
//! For tests and local runs without credentials. Records every request it
//! receives.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::client::PaymentClient;
use crate::error::{PaymentError, Result};
use crate::preference::{Preference, PreferenceRequest, PreferenceResponse};

/// Canned reply of the mock
#[derive(Clone, Debug)]
enum Reply {
    Created(PreferenceResponse),
    Rejected { status: u16, message: String },
}

/// Mock payment client with a fixed reply
pub struct MockPaymentClient {
    reply: Reply,
    requests: Mutex<Vec<PreferenceRequest>>,
}

impl MockPaymentClient {
    /// Answer every request with this preference
    pub fn created(id: impl Into<String>, init_point: impl Into<String>) -> Self {
        Self::with_reply(Reply::Created(PreferenceResponse {
            id: Some(id.into()),
            init_point: Some(init_point.into()),
        }))
    }

    /// Answer with a preference that has no checkout URL
    pub fn without_init_point(id: impl Into<String>) -> Self {
        Self::with_reply(Reply::Created(PreferenceResponse {
            id: Some(id.into()),
            init_point: None,
        }))
    }

    /// Fail every request with an API error
    pub fn rejecting(status: u16, message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Rejected {
            status,
            message: message.into(),
        })
    }

    const fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<PreferenceRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl PaymentClient for MockPaymentClient {
    async fn create_preference(&self, request: &PreferenceRequest) -> Result<Preference> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match &self.reply {
            Reply::Created(response) => Preference::try_from(response.clone()),
            Reply::Rejected { status, message } => Err(PaymentError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
