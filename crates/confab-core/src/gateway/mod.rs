//! Ports to the two remote services the store depends on.
//!
//! Both gateways are stateless request/response translators; the
//! implementations live in confab-infra.

pub mod completion;
pub mod session;

pub use completion::CompletionGateway;
pub use session::SessionGateway;
