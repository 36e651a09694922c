use crate::error::QueryError;
use crate::models::GroundedAnswer;
use crate::retry::RetryPolicy;
use crate::search::GlobalSearch;
use crate::traits::TextGenerator;
use std::sync::Arc;

/// Sentinel the generator is instructed to emit when the retrieved context
/// does not contain the answer.
pub const NO_ANSWER_SENTINEL: &str = "Information not present.";

/// Answers a question from retrieved context across all ingested
/// documents: run global search, concatenate the hit texts in ranked
/// order, and issue exactly one generation call framed to answer strictly
/// from that context.
///
/// Grounding is a property of the prompt, not of the retrieval code;
/// treat it as best effort rather than a hard guarantee against
/// fabricated answers.
pub struct MultiDocAnswerer {
    search: GlobalSearch,
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl MultiDocAnswerer {
    pub fn new(search: GlobalSearch, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            search,
            generator,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn answer(&self, question: &str, top_k: usize) -> Result<GroundedAnswer, QueryError> {
        let hits = self.search.search(question, top_k).await?;

        let context = hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = build_grounded_prompt(&context, question);

        tracing::debug!(top_k, used_chunks = hits.len(), "assembling grounded answer");
        let answer = self
            .retry
            .run(|| self.generator.generate(&prompt))
            .await
            .map_err(QueryError::Generation)?;

        Ok(GroundedAnswer {
            answer,
            used_chunks: hits,
        })
    }
}

fn build_grounded_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a document assistant. Use ONLY the following context to answer the question.\n\
         If the answer is not found in the context, reply with \"{NO_ANSWER_SENTINEL}\"\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {question}\n"
    )
}
