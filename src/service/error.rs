use crate::database::error::DatabaseError;
use crate::delivery::DeliveryError;
use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    /// The fixed number of concurrent subscribers has been reached.
    #[error("The maximum number of subscribers has been reached.")]
    CapacityExceeded,

    #[error("{msg}")]
    ValidationError { msg: String },

    #[error("DatabaseError: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("ProviderError: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("DeliveryError: {0}")]
    DeliveryError(#[from] DeliveryError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError { msg: msg.into() }
    }
}
