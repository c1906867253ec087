//! Prompt templates for summaries, grounded chat, and session intros

/// Fixed refusal for questions the sources cannot answer.
///
/// The guardrail instructs the model to emit this string verbatim so the
/// frontend can pattern-match on it.
pub const REFUSAL_MESSAGE: &str =
    "I cannot find information about this topic in the provided sources. Please ask something related to your materials.";

/// Style applied when the request carries no style instruction
pub const DEFAULT_STYLE_INSTRUCTION: &str = "Keep it concise and direct (approx 2 sentences).";

/// Session intro input is capped so a pile of long summaries cannot blow the
/// prompt budget
pub const MAX_INTRO_INPUT_CHARS: usize = 5000;

/// Prompt builder for vault generation tasks
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build a document summary prompt
    pub fn build_summary_prompt(text: &str) -> String {
        format!(
            "Summarize the following text in 3 concise bullet points:\n\n{}",
            text
        )
    }

    /// Build the grounded chat prompt with the relevance guardrail and
    /// hybrid gap-filling rules
    pub fn build_chat_prompt(question: &str, context: &str, style_instruction: &str) -> String {
        format!(
            r#"You are a strict academic tutor. Your job is to help the student understand their own study materials.

SOURCE MATERIALS:
{context}

RELEVANCE GUARDRAIL:
- First decide whether the question relates to the SOURCE MATERIALS above.
- If it does NOT relate to them, reply with exactly this sentence and nothing else:
"{refusal}"

HYBRID ANSWERING:
- Ground your answer in the SOURCE MATERIALS wherever they cover the question.
- If the materials only partially cover it, fill the gaps from your general knowledge.
- Blend sourced and general content seamlessly. Never announce which parts came from where, and never add meta-commentary about the sources.

FORMATTING:
- Bold key terms.
- Use bullet points for lists or multi-part answers.
- Adhere to the TARGET LENGTH below.

TARGET LENGTH: {style}

QUESTION: {question}"#,
            context = context,
            refusal = REFUSAL_MESSAGE,
            style = style_instruction,
            question = question
        )
    }

    /// Build the session intro prompt asking for raw JSON
    pub fn build_session_intro_prompt(combined_summaries: &str) -> String {
        let input: String = combined_summaries.chars().take(MAX_INTRO_INPUT_CHARS).collect();
        format!(
            r#"Based on the following document summaries, produce a short session title and a one-or-two sentence welcome summary for a study session about these documents.

DOCUMENT SUMMARIES:
{input}

Respond with raw JSON only, no markdown, no code fences, in exactly this shape:
{{"title": "...", "summary": "..."}}"#,
            input = input
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_embeds_text() {
        let prompt = PromptBuilder::build_summary_prompt("cell biology notes");
        assert!(prompt.starts_with("Summarize the following text in 3 concise bullet points:"));
        assert!(prompt.contains("cell biology notes"));
    }

    #[test]
    fn chat_prompt_carries_guardrail_and_style() {
        let prompt =
            PromptBuilder::build_chat_prompt("What is mitosis?", "some context", "Three bullets.");
        assert!(prompt.contains(REFUSAL_MESSAGE));
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("TARGET LENGTH: Three bullets."));
        assert!(prompt.contains("QUESTION: What is mitosis?"));
    }

    #[test]
    fn intro_prompt_truncates_input() {
        let long = "s".repeat(MAX_INTRO_INPUT_CHARS + 1000);
        let prompt = PromptBuilder::build_session_intro_prompt(&long);
        // Shorter than input plus template, so the cap took effect
        assert!(prompt.len() < MAX_INTRO_INPUT_CHARS + 600);
        assert!(prompt.contains("raw JSON"));
    }
}
