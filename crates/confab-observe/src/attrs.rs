//! Span and event field names shared across Confab crates.
//!
//! Completion calls follow the OpenTelemetry GenAI semantic conventions so an
//! exported trace reads the same as any other LLM client's.

// --- GenAI semantic conventions ---

/// The name of the operation being performed (always "chat" here).
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The model ID requested (e.g., "deepseek-chat").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// Base URL of the completion service.
pub const SERVER_ADDRESS: &str = "server.address";

pub const OP_CHAT: &str = "chat";

// --- Store fields ---

pub const SESSION_ID: &str = "confab.session.id";

pub const SESSION_INDEX: &str = "confab.session.index";

/// Name of the CLI command being run (e.g., "send", "delete").
pub const COMMAND: &str = "confab.command";
