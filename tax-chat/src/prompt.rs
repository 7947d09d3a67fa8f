use std::path::Path;

use tracing::info;

use crate::config::ConfigError;

const INSTRUCTIONS: &str = "\
You are a professional Australian tax and accounting assistant. Your answers must be:

1. Professional: use correct business terminology while staying clear.
2. Concise: keep replies under 30 words unless more detail is asked for.
3. Accurate: base every answer on the knowledge base below.
4. Context-aware: take the earlier conversation into account.

Rules:
- Reply to the user's latest question only, with a single answer.
- Never write out further turns of the conversation.
- Never begin a line with \"User:\" or \"Assistant:\".
- Do not use emojis or casual language.
- If unsure, or the question needs personal advice, suggest booking a consultation.
- End with a relevant follow-up question or next step where it helps.";

/// The fixed system prompt sent ahead of every conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt(String);

impl SystemPrompt {
    /// Combines the fixed instructions with `knowledge_base`.
    pub fn new(knowledge_base: &str) -> Self {
        Self(format!(
            "{INSTRUCTIONS}\n\nKnowledge base:\n{}",
            knowledge_base.trim()
        ))
    }

    /// Reads the knowledge base once at start-up.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let knowledge_base =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        info!(
            path = %path.display(),
            bytes = knowledge_base.len(),
            "loaded knowledge base"
        );
        Ok(Self::new(&knowledge_base))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_instructions_then_knowledge() {
        let prompt = SystemPrompt::new("\n  The Medicare levy is 2%.\n");

        let text = prompt.as_str();
        assert!(text.starts_with("You are a professional Australian tax"));
        assert!(text.ends_with("Knowledge base:\nThe Medicare levy is 2%."));
    }

    #[test]
    fn bundled_knowledge_base_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("knowledge_base.txt");

        let prompt = SystemPrompt::load(&path).unwrap();

        assert!(prompt.as_str().contains("Low Income Tax Offset"));
    }

    #[test]
    fn missing_knowledge_base_is_read_error() {
        let err = SystemPrompt::load(Path::new("/no/such/knowledge.txt")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
