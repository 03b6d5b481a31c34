//! Shared domain types for Confab.
//!
//! This crate contains the data model used across the Confab client:
//! Message, Mask, Session, the store's serializable state, completion wire
//! shapes, configuration, store events, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod completion;
pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod mask;
pub mod message;
pub mod state;
