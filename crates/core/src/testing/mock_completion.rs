//! Mock completion client with scripted responses.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::titlegen::{CompletionClient, ProviderError};

/// Scripted completion client.
///
/// Responses are served from a queue in order; once the queue is exhausted
/// the client either repeats a constant fallback (see [`always`]) or fails.
/// Every call is counted, which is what the voting and idempotency tests
/// assert on.
///
/// [`always`]: Self::always
pub struct MockCompletionClient {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: Option<String>,
    calls: AtomicUsize,
}

impl MockCompletionClient {
    /// Client that answers every call with the same text.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Client that serves `responses` in order, then fails.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_script(responses.into_iter().map(|s| Ok(s.into())).collect())
    }

    /// Client with a full success/failure script, then failing when
    /// exhausted. `Err` entries surface as transport errors.
    pub fn with_script(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match scripted {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ProviderError::Http(message)),
            None => match &self.fallback {
                Some(text) => Ok(text.clone()),
                None => Err(ProviderError::Http("script exhausted".to_string())),
            },
        }
    }
}
