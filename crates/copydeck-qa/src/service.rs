//! QA service: batch review and streamed chat over a project.

use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use copydeck_common_config::QaConfig;
use copydeck_common_core::ProjectData;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::context::project_context;
use crate::error::{QaError, QaResult};
use crate::prompts::{batch_prompt, chat_preamble};
use crate::provider::{LlmMessage, LlmProvider, LlmRequest};
use crate::rate_limit::{FixedWindowStore, RateDecision, RateLimitStore};
use crate::report::{parse_report, QaReport};

/// Streamed chat reply, one text fragment per item.
pub type ChatStream = Pin<Box<dyn Stream<Item = QaResult<String>> + Send>>;

/// A prior turn of the conversation as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    fn to_message(&self) -> Option<LlmMessage> {
        if self.role.trim().is_empty() || self.content.is_empty() {
            return None;
        }
        match self.role.as_str() {
            "user" => Some(LlmMessage::user(&self.content)),
            "assistant" => Some(LlmMessage::assistant(&self.content)),
            other => {
                debug!(role = other, "Dropping chat turn with unsupported role");
                None
            }
        }
    }
}

/// Build the message list for a chat request: preamble, filtered history, then the new message.
pub fn chat_messages(context: &str, history: &[ChatTurn], message: &str) -> Vec<LlmMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(LlmMessage::user(chat_preamble(context)));
    messages.extend(history.iter().filter_map(ChatTurn::to_message));
    messages.push(LlmMessage::user(message));
    messages
}

/// Runs QA requests against a provider, gated per caller by a rate-limit store.
pub struct QaService {
    provider: Arc<dyn LlmProvider>,
    limiter: Arc<dyn RateLimitStore>,
    config: QaConfig,
}

impl QaService {
    /// Service with an in-memory rate limiter built from `config`.
    pub fn new(provider: Arc<dyn LlmProvider>, config: QaConfig) -> Self {
        let limiter = Arc::new(FixedWindowStore::new(config.rate_limit));
        Self::with_limiter(provider, limiter, config)
    }

    pub fn with_limiter(
        provider: Arc<dyn LlmProvider>,
        limiter: Arc<dyn RateLimitStore>,
        config: QaConfig,
    ) -> Self {
        Self {
            provider,
            limiter,
            config,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn admit(&self, caller: &str) -> QaResult<()> {
        match self.limiter.check(caller) {
            RateDecision::Allowed { remaining } => {
                debug!(caller, remaining, "QA request admitted");
                Ok(())
            }
            RateDecision::Limited { retry_after } => Err(QaError::RateLimited {
                caller: caller.to_string(),
                retry_after,
            }),
        }
    }

    /// Review the whole project and return a structured report.
    #[instrument(skip(self, project), fields(provider = self.provider.name()))]
    pub async fn run_batch(&self, caller: &str, project: &ProjectData) -> QaResult<QaReport> {
        self.admit(caller)?;

        let context = project_context(project);
        debug!(
            markets = project.markets().len(),
            items = project.item_count(),
            "Requesting batch review"
        );
        let request = LlmRequest {
            model: self.config.model.clone(),
            messages: vec![LlmMessage::user(batch_prompt(&context))],
            max_tokens: Some(self.config.max_tokens_batch),
            system_prompt: None,
        };

        let response = self.provider.complete(request).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Batch review received"
        );

        let report = parse_report(&response.content)?;
        info!(issues = report.issues.len(), "Batch review complete");
        Ok(report)
    }

    /// Ask a question about the project; the reply arrives as a stream of text fragments.
    #[instrument(skip(self, project, history, message), fields(provider = self.provider.name()))]
    pub async fn chat(
        &self,
        caller: &str,
        project: &ProjectData,
        history: &[ChatTurn],
        message: &str,
    ) -> QaResult<ChatStream> {
        if message.trim().is_empty() {
            return Err(QaError::EmptyMessage);
        }
        self.admit(caller)?;

        let context = project_context(project);
        let request = LlmRequest {
            model: self.config.model.clone(),
            messages: chat_messages(&context, history, message),
            max_tokens: Some(self.config.max_tokens_chat),
            system_prompt: None,
        };

        let mut chunks = self.provider.complete_stream(request).await?;
        let replies = stream! {
            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(chunk) => {
                        if !chunk.delta.is_empty() {
                            yield Ok(chunk.delta);
                        }
                        if chunk.is_complete {
                            return;
                        }
                    }
                    Err(e) => {
                        yield Err(QaError::Provider(e));
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(replies))
    }

    /// Run a chat request and gather the whole reply.
    pub async fn chat_to_string(
        &self,
        caller: &str,
        project: &ProjectData,
        history: &[ChatTurn],
        message: &str,
    ) -> QaResult<String> {
        let mut replies = self.chat(caller, project, history, message).await?;
        let mut reply = String::new();
        while let Some(fragment) = replies.next().await {
            reply.push_str(&fragment?);
        }
        Ok(reply)
    }
}
