use crate::error::QueryError;
use crate::retry::RetryPolicy;
use crate::traits::TextGenerator;
use serde_json::Value;
use std::sync::Arc;

/// Closed category set used for routing. Responses outside the set map to
/// [`DocumentCategory::Unknown`] explicitly rather than being silently
/// coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentCategory {
    Hr,
    Invoice,
    PurchaseOrder,
    Engineering,
    Safety,
    Compliance,
    GeneralOperations,
    Unknown,
}

impl DocumentCategory {
    pub const KNOWN: [DocumentCategory; 7] = [
        DocumentCategory::Hr,
        DocumentCategory::Invoice,
        DocumentCategory::PurchaseOrder,
        DocumentCategory::Engineering,
        DocumentCategory::Safety,
        DocumentCategory::Compliance,
        DocumentCategory::GeneralOperations,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::Hr => "HR Document",
            DocumentCategory::Invoice => "Invoice",
            DocumentCategory::PurchaseOrder => "Purchase Order",
            DocumentCategory::Engineering => "Engineering Document",
            DocumentCategory::Safety => "Safety Document",
            DocumentCategory::Compliance => "Compliance Document",
            DocumentCategory::GeneralOperations => "General Operations Document",
            DocumentCategory::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label.trim()))
            .unwrap_or(DocumentCategory::Unknown)
    }
}

/// Destination team for a classified document.
pub fn route_document(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::Hr => "HR Department",
        DocumentCategory::Invoice => "Finance Team",
        DocumentCategory::PurchaseOrder => "Procurement Team",
        DocumentCategory::Engineering => "Engineering Manager",
        DocumentCategory::Safety => "Safety Officer",
        DocumentCategory::Compliance => "Compliance Department",
        DocumentCategory::GeneralOperations => "Operations Manager",
        DocumentCategory::Unknown => "General Review Team",
    }
}

/// Document-level helpers layered on the text-generation collaborator:
/// summary, classification, and key-field extraction.
pub struct DocumentAnalyzer {
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl DocumentAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn summarize(&self, text: &str) -> Result<String, QueryError> {
        let prompt = format!(
            "Summarize the following document in 5-7 crisp bullet points.\n\
             Focus on key actionable points, deadlines, and important entities.\n\
             \n\
             Document:\n\
             {text}\n"
        );
        self.generate(&prompt).await
    }

    pub async fn classify(&self, text: &str) -> Result<DocumentCategory, QueryError> {
        let labels = DocumentCategory::KNOWN
            .iter()
            .map(|category| category.label())
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = format!(
            "Classify the document into ONE category from this list:\n\
             {labels}\n\
             \n\
             Document:\n\
             {text}\n\
             \n\
             Respond with only the category name.\n"
        );

        let response = self.generate(&prompt).await?;
        Ok(DocumentCategory::from_label(&response))
    }

    /// Asks for structured key-value pairs as raw JSON. An unparsable
    /// response surfaces as [`QueryError::MalformedResponse`] instead of
    /// being folded into a degraded success value.
    pub async fn extract_key_fields(&self, text: &str) -> Result<Value, QueryError> {
        let prompt = format!(
            "Extract key-value pairs from the following document.\n\
             Return the result as a VALID JSON object (no markdown formatting, just raw JSON)\n\
             with the following fields (if present): DocumentType, ReferenceNumber, Date,\n\
             TotalAmount, BuyerName, SellerName, ContactPerson, Items.\n\
             If a field is not found, use null.\n\
             \n\
             Document:\n\
             {text}\n"
        );

        let response = self.generate(&prompt).await?;
        serde_json::from_str(strip_code_fences(&response))
            .map_err(|error| QueryError::MalformedResponse(error.to_string()))
    }

    async fn generate(&self, prompt: &str) -> Result<String, QueryError> {
        self.retry
            .run(|| self.generator.generate(prompt))
            .await
            .map_err(QueryError::Generation)
    }
}

/// Models often wrap JSON in a markdown fence despite instructions.
fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}
