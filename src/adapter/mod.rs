pub mod backend;
pub mod envelope;
pub mod indexing;
pub mod site;

pub use backend::{BackendClient, BackendConfig};
pub use indexing::IndexingClient;
pub use site::HttpSiteFetcher;
