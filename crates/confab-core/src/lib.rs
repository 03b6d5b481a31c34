//! Session store and port definitions for Confab.
//!
//! This crate defines the "ports" (gateway and snapshot traits) that the
//! infrastructure layer implements, and the `SessionStore` that drives them.
//! It depends only on `confab-types` -- never on `confab-infra` or any HTTP
//! or filesystem crate.

pub mod event;
pub mod gateway;
pub mod snapshot;
pub mod store;

pub use store::SessionStore;
