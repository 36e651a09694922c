mod gemini;

pub use gemini::{
    GeminiClient, DEFAULT_EMBEDDING_MODEL, DEFAULT_GEMINI_BASE_URL, DEFAULT_GENERATION_MODEL,
};
