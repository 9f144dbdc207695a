// SPDX-License-Identifier: Apache-2.0

use super::provider::{CompletionProvider, ProviderError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned completion backend for tests and offline runs.
#[derive(Debug)]
pub struct FakeCompletion {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl FakeCompletion {
    #[must_use]
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.reply
            .clone()
            .ok_or_else(|| ProviderError::Http("connection refused".to_string()))
    }
}
