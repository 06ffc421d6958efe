//! The external system that receives submitted orders.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::SubmissionPayload;

/// What is known about a delivered order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The request went out but the response could not be inspected.
    Unverified,
    /// The sink answered with a success status.
    Confirmed { status: u16 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The request never completed (unreachable host, DNS, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The sink answered with a non-success status. Only reported by sinks
    /// that verify the response.
    #[error("order sink rejected the order with status {status}")]
    Rejected { status: u16 },

    #[error("cannot encode order: {0}")]
    Encode(String),

    #[error("order sink is not configured: {0}")]
    NotConfigured(String),
}

/// Accepts one order per call.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<Delivery, SinkError>;
}
