//! Prompt construction and LLM-backed generation

pub mod composer;
pub mod prompt;
pub mod quota;
pub mod ratelimit;
pub mod structured;
pub mod summary;

pub use composer::ResponseComposer;
pub use prompt::PromptBuilder;
pub use ratelimit::SlidingWindowLimiter;
pub use structured::SessionIntro;
pub use summary::SummaryGateway;
