// sitewatch-api: Async client for the remote "sites" collection.
//
// The `SiteGateway` trait is the narrow seam the core crate consumes;
// `HttpGateway` is the JSON/REST implementation used in production.

pub mod error;
pub mod gateway;
pub mod http;
pub mod models;
pub mod transport;

pub use error::Error;
pub use gateway::SiteGateway;
pub use http::HttpGateway;
pub use models::{CreateSite, RecordId, SiteRecord, StatusPatch};
pub use transport::TransportConfig;
