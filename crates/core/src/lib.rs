//! sonic-core - Core library for the sonic CLI
//!
//! This library provides the client side of a CDN management API: session
//! persistence, the authenticated HTTP transport, the per-resource client
//! operations, and the normalized outcome types the CLI renders.

pub mod api;
pub mod error;
pub mod outcome;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use api::{
    connect, select_items, AssetDeleteOption, AssetFile, Bucket, CdnClient, LoginCredentials,
    SelectItem, User,
};
pub use error::{Error, Result};
pub use outcome::{Outcome, Severity};
pub use session::{Connection, Session, SessionStore};
pub use transport::Transport;
