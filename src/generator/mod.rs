//! SQL generation seam and model-output cleanup.
//!
//! The generative model lives behind the [`SqlGenerator`] trait; the service
//! only sees the raw text it returns. [`strip_model_artifacts`] removes the
//! decorations models habitually add (markdown fences, a `SQL:` label,
//! trailing semicolons) before the text reaches the safety gate.

pub mod prompt;

use crate::error::GenerationError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

pub use prompt::build_prompt;

/// Async SQL generation collaborator.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    /// Generate candidate SQL from a fully constructed prompt.
    ///
    /// The returned text is untrusted and goes through cleanup and the safety
    /// gate before anything executes.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

static SQL_FENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```sql\n?").expect("Invalid regex: sql fence pattern"));

static FENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\n?").expect("Invalid regex: fence pattern"));

static SQL_LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^sql:\s*").expect("Invalid regex: sql label pattern"));

static TRAILING_SEMICOLON_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r";+$").expect("Invalid regex: trailing semicolon pattern"));

/// Strip markdown code fences, a leading `SQL:` label, and trailing
/// semicolons from raw model output.
///
/// The safety gate tolerates a single trailing semicolon, but stripping here
/// keeps the displayed SQL clean; the executor gets exactly one appended
/// back.
pub fn strip_model_artifacts(raw: &str) -> String {
    let text = raw.trim();
    let text = SQL_FENCE_REGEX.replace_all(text, "");
    let text = FENCE_REGEX.replace_all(&text, "");
    let text = SQL_LABEL_REGEX.replace(text.trim(), "");
    TRAILING_SEMICOLON_REGEX
        .replace(text.trim(), "")
        .trim()
        .to_string()
}
