//! Consistency-voting title generation.

use std::sync::Arc;

use crate::metrics;

use super::client::{CompletionClient, ProviderError};

/// Errors that can occur while generating a title.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The provider call itself failed; there is no candidate to vote on.
    #[error("title generation failed: {0}")]
    Provider(#[from] ProviderError),

    /// Three calls produced three distinct titles; the provider's output is
    /// unstable for this input and none of the candidates can be trusted.
    #[error("provider returned inconsistent titles for {path}")]
    Inconsistent { path: String, candidates: [String; 3] },
}

/// Generates a normalized display title for a media file path.
///
/// Each generation issues up to three provider calls and accepts a title
/// only once two of them agree on the exact trimmed text. Transport errors
/// are not retried; three calls is the most a single path ever costs.
pub struct TitleGenerator {
    client: Arc<dyn CompletionClient>,
}

impl TitleGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    fn build_prompt(path: &str) -> String {
        format!(
            "Normalize the following file name into an Infuse-compatible title. \
             For movies use 'Movie Title (Year)'. For TV episodes use 'Show Title SXXEYY'. \
             Return only the normalized title without extension. File name: {path}"
        )
    }

    async fn attempt(&self, prompt: &str, attempt: u8) -> Result<String, ProviderError> {
        metrics::PROVIDER_CALLS.inc();
        let text = self.client.complete(prompt).await?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        tracing::debug!(attempt, title = %text, "title candidate");
        Ok(text)
    }

    /// Generate a title for `path` under the consistency vote.
    pub async fn generate(&self, path: &str) -> Result<String, GenerateError> {
        let prompt = Self::build_prompt(path);

        let first = self.attempt(&prompt, 1).await?;
        let second = self.attempt(&prompt, 2).await?;
        if second == first {
            return Ok(first);
        }

        let third = self.attempt(&prompt, 3).await?;
        if third == first {
            return Ok(first);
        }
        if third == second {
            return Ok(second);
        }

        tracing::warn!(
            path,
            first = %first,
            second = %second,
            third = %third,
            "inconsistent title candidates"
        );
        Err(GenerateError::Inconsistent {
            path: path.to_string(),
            candidates: [first, second, third],
        })
    }
}
