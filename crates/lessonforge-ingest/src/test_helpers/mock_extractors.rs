use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use lessonforge_core::models::MimeCategory;

use crate::extract::RemoteExtractor;

/// Scriptable extraction backend that records every call.
pub struct MockRemoteExtractor {
    result: Result<String, String>,
    calls: Arc<Mutex<Vec<(String, MimeCategory)>>>,
}

impl MockRemoteExtractor {
    pub fn succeeding(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Recorded (file_name, category) pairs in call order.
    pub fn calls(&self) -> Vec<(String, MimeCategory)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteExtractor for MockRemoteExtractor {
    async fn extract_text(
        &self,
        file_name: &str,
        category: MimeCategory,
        _data: &[u8],
    ) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((file_name.to_string(), category));

        match &self.result {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(anyhow!("{}", message)),
        }
    }
}
