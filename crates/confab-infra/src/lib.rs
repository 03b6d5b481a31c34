//! Infrastructure implementations for Confab.
//!
//! Concrete adapters for the ports in `confab-core`: reqwest gateways for the
//! session and completion services, the JSON snapshot file, plus config
//! loading and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod snapshot;
