//! Document summarization behind the local rate limiter

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::GenerativeProvider;

use super::prompt::PromptBuilder;
use super::quota;
use super::ratelimit::SlidingWindowLimiter;

/// Message raised when the local limiter rejects a request
pub const LOCAL_LIMIT_MESSAGE: &str =
    "429: Too many requests. Please wait a minute and try again.";

/// Generates 3-bullet document summaries.
///
/// Every call passes through the local sliding-window limiter first, so a
/// burst of uploads cannot burn the daily provider quota.
pub struct SummaryGateway {
    llm: Arc<dyn GenerativeProvider>,
    limiter: Arc<SlidingWindowLimiter>,
}

impl SummaryGateway {
    pub fn new(llm: Arc<dyn GenerativeProvider>, limiter: Arc<SlidingWindowLimiter>) -> Self {
        Self { llm, limiter }
    }

    /// Summarize a text, failing fast with `RateLimited` when either the
    /// local limiter or the provider quota rejects the call
    pub async fn summarize(&self, text: &str) -> Result<String> {
        if !self.limiter.try_acquire() {
            return Err(Error::RateLimited(LOCAL_LIMIT_MESSAGE.to_string()));
        }

        let prompt = PromptBuilder::build_summary_prompt(text);
        self.llm.generate(&prompt).await
    }

    /// Summarize a text, degrading to a placeholder instead of failing.
    ///
    /// Rate limits become the daily-quota wait message; any other failure
    /// leaves the document without a summary.
    pub async fn summarize_or_placeholder(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        match self.summarize(text).await {
            Ok(summary) => Some(summary),
            Err(e) if e.is_rate_limited() => {
                tracing::warn!("Summary rate limited: {}", e);
                Some(quota::summary_quota_message(chrono::Utc::now()))
            }
            Err(e) => {
                tracing::warn!("Summary generation failed: {}", e);
                None
            }
        }
    }
}
