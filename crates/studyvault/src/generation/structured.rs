//! Best-effort recovery of structured JSON from LLM output

use serde::Deserialize;

/// Fallback title when the model's JSON cannot be recovered
pub const FALLBACK_TITLE: &str = "Study Session";
/// Fallback opening summary when the model's JSON cannot be recovered
pub const FALLBACK_SUMMARY: &str = "I've loaded your files. How can I help you with them?";

/// Title and opening summary generated when a session is created
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionIntro {
    pub title: String,
    pub summary: String,
}

impl Default for SessionIntro {
    fn default() -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            summary: FALLBACK_SUMMARY.to_string(),
        }
    }
}

/// Models wrap JSON in markdown fences or chat around it; strip the fences
/// and cut from the first '{' to the last '}' before parsing.
fn clean_json_block(raw: &str) -> Option<String> {
    let mut text = raw.trim();

    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }
    let text = text.trim();

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(text[start..=end].to_string())
}

/// Parse a session intro from raw model output, falling back to the fixed
/// defaults when nothing parseable can be recovered.
pub fn parse_session_intro(raw: &str) -> SessionIntro {
    let parsed = clean_json_block(raw)
        .and_then(|block| serde_json::from_str::<SessionIntro>(&block).ok());

    match parsed {
        Some(intro) => intro,
        None => {
            tracing::warn!("Could not recover session intro JSON, using fallback");
            SessionIntro::default()
        }
    }
}
