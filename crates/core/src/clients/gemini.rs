use crate::embeddings::DEFAULT_EMBEDDING_DIMENSIONS;
use crate::traits::{ClientError, EmbeddingClient, TextGenerator};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";

/// Hosted embedding and text-generation client for Gemini-style REST
/// endpoints (`:embedContent` / `:generateContent`).
///
/// HTTP failures are classified into the shared taxonomy: 408, 429, and
/// 5xx responses (and network-level errors) are transient; any other
/// non-success status is permanent.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
    generation_model: String,
    dimensions: usize,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = model.into();
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    async fn post_model(
        &self,
        model: &str,
        operation: &str,
        body: Value,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/models/{}:{}", self.base_url, model, operation);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|error| ClientError::Transient(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &details));
        }

        response
            .json()
            .await
            .map_err(|error| ClientError::Permanent(format!("invalid json body: {error}")))
    }
}

fn classify_status(status: StatusCode, details: &str) -> ClientError {
    let message = format!("http {status}: {details}");
    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        ClientError::Transient(message)
    } else {
        ClientError::Permanent(message)
    }
}

#[async_trait]
impl EmbeddingClient for GeminiClient {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError> {
        let body = json!({
            "content": { "parts": [{ "text": text }] }
        });
        let parsed = self
            .post_model(&self.embedding_model, "embedContent", body)
            .await?;

        let values = parsed
            .pointer("/embedding/values")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ClientError::Permanent("embedding response missing /embedding/values".to_string())
            })?;

        let vector: Vec<f32> = values
            .iter()
            .map(|value| value.as_f64().unwrap_or(0.0) as f32)
            .collect();

        if vector.len() != self.dimensions {
            return Err(ClientError::Permanent(format!(
                "embedding has {} components, expected {}",
                vector.len(),
                self.dimensions
            )));
        }
        Ok(vector)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let parsed = self
            .post_model(&self.generation_model, "generateContent", body)
            .await?;

        parsed
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(|text| text.to_string())
            .ok_or_else(|| {
                ClientError::Permanent("generation response missing candidate text".to_string())
            })
    }
}
