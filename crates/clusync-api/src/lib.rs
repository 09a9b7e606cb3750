// clusync-api: Async Rust client for the storage cluster administrative REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod files;
mod network;
mod nfs;
mod quotas;
mod services;
mod smb;
mod snapshots;
mod tenants;
mod users;

pub use client::ClusterClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
