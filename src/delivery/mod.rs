//! Delivery of posting batches to per-user destinations.
//!
//! The messaging platform itself sits behind the [`Messenger`] trait; the
//! core only needs to resolve a destination reference, check that sending is
//! permitted, and hand over one formatted message.

pub mod deliverer;
pub mod webhook_messenger;

use async_trait::async_trait;

pub use deliverer::Deliverer;
pub use webhook_messenger::WebhookMessenger;

/// Failure at the platform boundary while sending one message.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("destination refused the message")]
    Forbidden,

    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Capability-checked send sink provided by the messaging platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Whether the destination reference points at a known target.
    async fn resolve(&self, destination: &str) -> bool;

    /// Whether this process may send into the destination.
    async fn can_send(&self, destination: &str) -> bool;

    async fn send(&self, destination: &str, text: &str) -> Result<(), SendError>;
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DeliveryError {
    #[error("Destination `{destination}` could not be resolved.")]
    UnresolvedDestination { destination: String },

    #[error("Not permitted to send to destination `{destination}`.")]
    PermissionDenied { destination: String },

    #[error("Failed to send to destination `{destination}`: {source}")]
    TransportError {
        destination: String,
        #[source]
        source: SendError,
    },
}

/// Result of one successful delivery cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { count: usize },
    /// Nothing fresh to send. Still a successful cycle for watermark purposes.
    NoContent,
}
