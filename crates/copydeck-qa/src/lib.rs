//! Copydeck QA.
//!
//! Serializes a parsed project into a context block, asks a language model
//! to review it, and validates the structured report that comes back. A
//! chat mode streams free-text answers about the same project.

pub mod anthropic;
pub mod context;
pub mod error;
pub mod prompts;
pub mod provider;
pub mod rate_limit;
pub mod report;
pub mod service;

pub use anthropic::AnthropicProvider;
pub use context::project_context;
pub use error::{QaError, QaResult};
pub use provider::{
    LlmError, LlmMessage, LlmProvider, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk,
    MessageRole, TokenUsage,
};
pub use rate_limit::{FixedWindowStore, RateDecision, RateLimitStore, ANONYMOUS};
pub use report::{parse_report, QaIssue, QaReport, QaSummary, Severity};
pub use service::{chat_messages, ChatStream, ChatTurn, QaService};
