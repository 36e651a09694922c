//! In-crate fakes for the collaborator traits, shared by the unit tests.

use crate::models::{IngestionOutcome, PendingDocument};
use crate::traits::{ClientError, DocumentSource, EmbeddingClient, TextGenerator};
use async_trait::async_trait;
use std::sync::Mutex;

/// Embeds text as keyword occurrence counts: one dimension per keyword.
/// Deterministic and fully controllable from test inputs.
pub(crate) struct KeywordEmbedder {
    keywords: Vec<&'static str>,
}

impl KeywordEmbedder {
    pub(crate) fn new(keywords: Vec<&'static str>) -> Self {
        Self { keywords }
    }

    pub(crate) fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

#[async_trait]
impl EmbeddingClient for KeywordEmbedder {
    fn dimensions(&self) -> usize {
        self.keywords.len()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError> {
        let lowered = text.to_lowercase();
        Ok(self
            .keywords
            .iter()
            .map(|keyword| lowered.matches(keyword).count() as f32)
            .collect())
    }
}

/// Embeds like a constant client but fails permanently whenever the text
/// contains `marker`.
pub(crate) struct MarkerEmbedder {
    dimensions: usize,
    marker: &'static str,
}

impl MarkerEmbedder {
    pub(crate) fn new(dimensions: usize, marker: &'static str) -> Self {
        Self { dimensions, marker }
    }
}

#[async_trait]
impl EmbeddingClient for MarkerEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError> {
        if text.contains(self.marker) {
            return Err(ClientError::Permanent(format!(
                "refusing text containing {:?}",
                self.marker
            )));
        }
        let mut vector = vec![0.0; self.dimensions];
        vector[text.len() % self.dimensions] = 1.0;
        Ok(vector)
    }
}

/// Returns a canned answer and records every prompt it was given.
pub(crate) struct ScriptedGenerator {
    pub(crate) response: String,
    pub(crate) prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }
}

/// Serves a fixed batch of pending documents and records status updates.
pub(crate) struct RecordingSource {
    documents: Vec<PendingDocument>,
    acknowledged: Mutex<Vec<(String, IngestionOutcome)>>,
}

impl RecordingSource {
    pub(crate) fn with_documents(documents: Vec<PendingDocument>) -> Self {
        Self {
            documents,
            acknowledged: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn acknowledged(&self) -> Vec<(String, IngestionOutcome)> {
        self.acknowledged.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentSource for RecordingSource {
    async fn pending_documents(&self) -> Result<Vec<PendingDocument>, ClientError> {
        Ok(self.documents.clone())
    }

    async fn mark_processed(
        &self,
        doc_id: &str,
        outcome: IngestionOutcome,
    ) -> Result<(), ClientError> {
        self.acknowledged
            .lock()
            .unwrap()
            .push((doc_id.to_string(), outcome));
        Ok(())
    }
}
