//! Summarization oracle boundary.
//!
//! The oracle is an opaque external text-to-summary function with a
//! latency and failure profile — an LLM call. The pipeline only depends
//! on the [`Oracle`] trait, so tests script it and the CLI plugs in the
//! Anthropic-backed [`claude::ClaudeOracle`].

pub mod claude;

use async_trait::async_trait;
use thiserror::Error;

pub use claude::ClaudeOracle;

/// Oracle call errors. Per-call: a failing section call never aborts its
/// sibling tasks; the section is recorded as failed instead.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("missing API credentials: {0}")]
    MissingCredentials(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request error: {0}")]
    Request(String),

    #[error("oracle call timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;

/// An extracted table rendered to plain text, appended to prompts.
#[derive(Debug, Clone)]
pub struct TableText {
    pub label: String,
    pub text: String,
}

/// The external summarization call.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Summarize one section's text (plus the document's tables) into a
    /// free-form summary string.
    async fn summarize(&self, section_name: &str, text: &str, tables: &[TableText])
        -> Result<String>;
}

/// Build the per-section analyst prompt.
pub fn section_prompt(section_name: &str, text: &str, tables: &[TableText]) -> String {
    let mut prompt = format!(
        "You are an expert document analyst in research.\n\n\
         Document Section ({section_name}):\n{text}\n"
    );

    for (i, table) in tables.iter().enumerate() {
        prompt.push_str(&format!("\nTable {} ({}):\n{}\n", i + 1, table.label, table.text));
    }

    prompt.push_str(
        "\n---\nInstructions:\n\
         1. Provide a detailed summary of this chunk.\n\
         2. If any table is related, explain its significance and key results to the section.\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_prompt_contains_name_and_text() {
        let prompt = section_prompt("Methods", "We measured things.", &[]);
        assert!(prompt.contains("Document Section (Methods):"));
        assert!(prompt.contains("We measured things."));
        assert!(prompt.contains("Instructions:"));
    }

    #[test]
    fn section_prompt_appends_numbered_tables() {
        let tables = vec![
            TableText { label: "table_1".into(), text: "| a | b |".into() },
            TableText { label: "table_2".into(), text: "| c | d |".into() },
        ];
        let prompt = section_prompt("Results", "body", &tables);
        assert!(prompt.contains("Table 1 (table_1):"));
        assert!(prompt.contains("Table 2 (table_2):"));
        assert!(prompt.contains("| c | d |"));
    }

    #[test]
    fn errors_render_helpful_messages() {
        let err = OracleError::Api { status: 429, message: "quota exceeded".into() };
        assert!(err.to_string().contains("429"));
        assert!(OracleError::Timeout.to_string().contains("timed out"));
    }
}
