//! Prompt library for the AI backends
//!
//! Prompts are markdown files under `prompts/`, embedded at compile time.
//! Template variables use mustache-style `{{var}}` markers so the prompt
//! text can carry literal JSON braces unescaped.

use std::collections::HashMap;

/// Embedded prompt content (compiled into binary)
mod defaults {
    pub const STRUCTURE_STATEMENT: &str = include_str!("../../../prompts/structure_statement.md");
    pub const CATEGORIZE_TRANSACTIONS: &str =
        include_str!("../../../prompts/categorize_transactions.md");
    pub const TRANSCRIBE_STATEMENT: &str =
        include_str!("../../../prompts/transcribe_statement.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    StructureStatement,
    CategorizeTransactions,
    TranscribeStatement,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructureStatement => "structure_statement",
            Self::CategorizeTransactions => "categorize_transactions",
            Self::TranscribeStatement => "transcribe_statement",
        }
    }

    /// Get the embedded content for this prompt
    pub fn content(&self) -> &'static str {
        match self {
            Self::StructureStatement => defaults::STRUCTURE_STATEMENT,
            Self::CategorizeTransactions => defaults::CATEGORIZE_TRANSACTIONS,
            Self::TranscribeStatement => defaults::TRANSCRIBE_STATEMENT,
        }
    }

    /// Render the prompt with template variables replaced
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        let mut result = self.content().to_string();
        for (key, value) in vars {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        result
    }
}

/// Structuring prompt with the raw statement text embedded.
pub fn structuring_prompt(text: &str) -> String {
    PromptId::StructureStatement.render(&HashMap::from([("text", text)]))
}

/// Categorization prompt with the transaction list embedded as JSON.
pub fn categorization_prompt(transactions_json: &str) -> String {
    PromptId::CategorizeTransactions.render(&HashMap::from([("transactions", transactions_json)]))
}

/// Vision prompt asking for a verbatim transcription of a statement image.
pub fn transcription_prompt() -> &'static str {
    PromptId::TranscribeStatement.content()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structuring_prompt_embeds_text() {
        let prompt = structuring_prompt("ХААН БАНК 2024-01");
        assert!(prompt.contains("ХААН БАНК 2024-01"));
        assert!(!prompt.contains("{{text}}"));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn categorization_prompt_keeps_literal_braces() {
        let prompt = categorization_prompt(r#"[{"description": "Taxi"}]"#);
        assert!(prompt.contains(r#"[{"description": "Taxi"}]"#));
        // The return-shape example is prompt text, not a template variable.
        assert!(prompt.contains(r#"{"categorized_transactions": [...]}"#));
        assert!(prompt.contains("Food & Dining"));
    }

    #[test]
    fn all_prompts_have_content() {
        for id in [
            PromptId::StructureStatement,
            PromptId::CategorizeTransactions,
            PromptId::TranscribeStatement,
        ] {
            assert!(!id.content().trim().is_empty(), "{} is empty", id.as_str());
        }
    }
}
