//! Transport seam
//!
//! The byte-level console connection (framing, authentication, reconnects) lives outside
//! this crate. Everything here only needs "send a command line, get the response text".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by the transport collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("console connection closed")]
    Disconnected,
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("command failed: {0}")]
    Failed(String),
}

/// Request/response execution against the admin console.
#[async_trait]
pub trait RconTransport: Send + Sync {
    /// Send one command line and return the raw response text.
    async fn execute(&self, command: &str) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: RconTransport + ?Sized> RconTransport for Arc<T> {
    async fn execute(&self, command: &str) -> Result<String, TransportError> {
        (**self).execute(command).await
    }
}
