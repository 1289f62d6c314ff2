//! Query construction and result fetching against the job search provider.

pub mod error;
pub mod freshness;
pub mod jsearch;
pub mod model;

pub use error::ProviderError;
pub use jsearch::JSearchClient;
pub use model::Posting;
pub use model::RawPosting;
pub use model::SearchCriteria;
