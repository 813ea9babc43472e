// armctl-api: Async Rust client for the Azure Resource Manager network and resources APIs

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod network;
pub mod profile;
pub mod resources;
pub mod response;
pub mod transport;

pub use auth::{AccessToken, AuthStrategy, Credentials, ServicePrincipal};
pub use client::ArmClient;
pub use error::Error;
pub use profile::ApiProfile;
pub use response::OperationResponse;
pub use transport::{TlsMode, TransportConfig};

pub use reqwest::StatusCode;
