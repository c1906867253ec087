//! Grounded chat response composition

use std::sync::Arc;

use crate::providers::GenerativeProvider;

use super::prompt::{PromptBuilder, DEFAULT_STYLE_INSTRUCTION};
use super::quota;
use super::structured::{self, SessionIntro};

/// Composes assistant replies from retrieved context.
///
/// Generation never fails upward: a provider error is replaced by the quota
/// wait-time message, which the caller persists as the assistant reply.
pub struct ResponseComposer {
    llm: Arc<dyn GenerativeProvider>,
}

impl ResponseComposer {
    pub fn new(llm: Arc<dyn GenerativeProvider>) -> Self {
        Self { llm }
    }

    /// Compose a reply to a question against assembled source context
    pub async fn compose(
        &self,
        question: &str,
        context: &str,
        style_instruction: Option<&str>,
    ) -> String {
        let style = style_instruction.unwrap_or(DEFAULT_STYLE_INSTRUCTION);
        let prompt = PromptBuilder::build_chat_prompt(question, context, style);

        match self.llm.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Chat generation failed: {}", e);
                quota::chat_quota_message(chrono::Utc::now())
            }
        }
    }

    /// Generate a session title and welcome summary from combined document
    /// summaries, falling back to fixed defaults when the model misbehaves
    pub async fn compose_session_intro(&self, combined_summaries: &str) -> SessionIntro {
        let prompt = PromptBuilder::build_session_intro_prompt(combined_summaries);

        match self.llm.generate(&prompt).await {
            Ok(raw) => structured::parse_session_intro(&raw),
            Err(e) => {
                tracing::warn!("Session intro generation failed: {}", e);
                SessionIntro::default()
            }
        }
    }
}
