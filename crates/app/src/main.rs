use chrono::Utc;
use clap::{Parser, Subcommand};
use corpus_rag_core::{
    discover_text_files, ChunkingConfig, DocumentAnalyzer, DocumentIngestor, EmbeddingClient,
    GeminiClient, GlobalSearch, HashEmbedder, IngestionReport, MetadataStore, MultiDocAnswerer,
    SearchHit, SimilarityEngine, TextGenerator, VectorIndex, DEFAULT_CHUNK_OVERLAP,
    DEFAULT_CHUNK_SIZE, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_EMBED_CONCURRENCY, DEFAULT_GEMINI_BASE_URL, DEFAULT_GENERATION_MODEL,
};
use corpus_rag_core::route_document;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "corpus-rag", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Gemini-compatible API base URL.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    gemini_url: String,

    /// API key for the hosted embedding/generation backend.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "")]
    api_key: String,

    /// Embedding model name.
    #[arg(long, default_value = DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,

    /// Generation model name.
    #[arg(long, default_value = DEFAULT_GENERATION_MODEL)]
    generation_model: String,

    /// Embedding dimension.
    #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIMENSIONS)]
    dimensions: usize,

    /// Use the deterministic local embedder instead of the hosted one.
    #[arg(long, default_value_t = false)]
    local_embedder: bool,

    /// Chunk window size in chars.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Chunk overlap in chars.
    #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,

    /// Concurrent embedding calls during ingestion.
    #[arg(long, default_value_t = DEFAULT_EMBED_CONCURRENCY)]
    max_concurrency: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a folder of .txt/.md documents and print per-file reports.
    Ingest {
        /// Folder that contains documents, searched recursively.
        #[arg(long)]
        folder: String,
    },
    /// Ingest a folder, then run a raw chunk-level search.
    Search {
        #[arg(long)]
        folder: String,
        /// Search query.
        #[arg(long)]
        query: String,
        /// Number of chunk hits to return.
        #[arg(long, default_value = "5")]
        top_k: usize,
    },
    /// Ingest a folder, then find documents similar to the given text.
    Similar {
        #[arg(long)]
        folder: String,
        /// Text to compare against the corpus.
        #[arg(long)]
        text: String,
        /// Number of distinct documents to return.
        #[arg(long, default_value = "5")]
        top_k: usize,
        /// Raw hits fetched per requested document before deduplication.
        #[arg(long, default_value = "1")]
        fetch_multiplier: usize,
    },
    /// Ingest a folder, then answer a question from the retrieved context.
    Ask {
        #[arg(long)]
        folder: String,
        /// Question to answer from the corpus.
        #[arg(long)]
        question: String,
        /// Number of chunks to ground the answer on.
        #[arg(long, default_value = "5")]
        top_k: usize,
    },
    /// Summarize, classify, route, and extract key fields from one file.
    Analyze {
        /// Document to analyze.
        #[arg(long)]
        file: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let gemini = Arc::new(
        GeminiClient::new(&cli.gemini_url, &cli.api_key)
            .with_embedding_model(&cli.embedding_model)
            .with_generation_model(&cli.generation_model)
            .with_dimensions(cli.dimensions),
    );
    let embedder: Arc<dyn EmbeddingClient> = if cli.local_embedder {
        Arc::new(HashEmbedder::new(cli.dimensions))
    } else {
        Arc::clone(&gemini) as Arc<dyn EmbeddingClient>
    };
    let generator: Arc<dyn TextGenerator> = Arc::clone(&gemini) as Arc<dyn TextGenerator>;

    let index = Arc::new(VectorIndex::new(cli.dimensions));
    let metadata = MetadataStore::new();
    let chunking = ChunkingConfig::new(cli.chunk_size, cli.chunk_overlap)?;
    let ingestor = DocumentIngestor::new(Arc::clone(&index), Arc::clone(&embedder))
        .with_chunking(chunking)
        .with_max_concurrency(cli.max_concurrency);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        "corpus-rag boot"
    );

    match cli.command {
        Command::Ingest { folder } => {
            let reports = ingest_folder(&folder, &ingestor, &metadata).await?;
            for report in &reports {
                println!(
                    "{}: {:?} ({} chunks, {} indexed, {} failed)",
                    report.doc_id,
                    report.outcome(),
                    report.chunk_count,
                    report.indexed.len(),
                    report.failed.len()
                );
                for failure in &report.failed {
                    println!("  chunk {} failed: {}", failure.chunk_id, failure.reason);
                }
            }
            println!(
                "{} document(s) ingested, {} entries indexed at {}",
                metadata.len(),
                index.len(),
                Utc::now().to_rfc3339()
            );
        }
        Command::Search { folder, query, top_k } => {
            ingest_folder(&folder, &ingestor, &metadata).await?;
            let search = GlobalSearch::new(Arc::clone(&index), Arc::clone(&embedder));
            let hits = search.search(&query, top_k).await?;
            println!("query: {query}");
            print_hits(&hits);
        }
        Command::Similar {
            folder,
            text,
            top_k,
            fetch_multiplier,
        } => {
            ingest_folder(&folder, &ingestor, &metadata).await?;
            let engine = SimilarityEngine::new(Arc::clone(&index), Arc::clone(&embedder))
                .with_raw_fetch_multiplier(fetch_multiplier);
            let hits = engine.find_similar_documents(&text, top_k).await?;
            println!("{} similar document(s)", hits.len());
            for hit in &hits {
                let doc_id = hit.doc_id().unwrap_or("<unattributed>");
                println!("[{doc_id}] score={:.4}", hit.score);
                if let Some(record) = metadata.get(doc_id) {
                    println!("  metadata={record}");
                }
            }
        }
        Command::Ask {
            folder,
            question,
            top_k,
        } => {
            ingest_folder(&folder, &ingestor, &metadata).await?;
            let answerer = MultiDocAnswerer::new(
                GlobalSearch::new(Arc::clone(&index), Arc::clone(&embedder)),
                Arc::clone(&generator),
            );
            let grounded = answerer.answer(&question, top_k).await?;
            println!("question: {question}");
            println!("answer: {}", grounded.answer);
            println!("grounded on {} chunk(s):", grounded.used_chunks.len());
            print_hits(&grounded.used_chunks);
        }
        Command::Analyze { file } => {
            let text = std::fs::read_to_string(&file)?;
            let analyzer = DocumentAnalyzer::new(Arc::clone(&generator));

            let summary = analyzer.summarize(&text).await?;
            let category = analyzer.classify(&text).await?;
            println!("summary:\n{summary}");
            println!("category: {}", category.label());
            println!("route_to: {}", route_document(category));
            match analyzer.extract_key_fields(&text).await {
                Ok(fields) => println!("key_fields: {fields:#}"),
                Err(error) => warn!(%error, "key field extraction failed"),
            }
        }
    }

    Ok(())
}

/// Ingests every text file under `folder`, keyed by file stem. Unreadable
/// files (missing, not valid UTF-8) are reported and skipped rather than
/// indexed as placeholder content.
async fn ingest_folder(
    folder: &str,
    ingestor: &DocumentIngestor,
    metadata: &MetadataStore,
) -> anyhow::Result<Vec<IngestionReport>> {
    let files = discover_text_files(Path::new(folder));
    if files.is_empty() {
        anyhow::bail!("no .txt or .md files found in {folder}");
    }

    let mut reports = Vec::new();
    for path in files {
        let doc_id = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => {
                warn!(path = %path.display(), "skipping file without a usable name");
                continue;
            }
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping unreadable document");
                continue;
            }
        };

        let report = ingestor.ingest(&text, &doc_id).await?;
        metadata.add(
            &doc_id,
            json!({
                "source_path": path.to_string_lossy(),
                "chars": text.chars().count(),
                "ingested_at": Utc::now().to_rfc3339(),
            }),
        )?;
        reports.push(report);
    }
    Ok(reports)
}

fn print_hits(hits: &[SearchHit]) {
    for hit in hits {
        match &hit.metadata {
            Some(meta) => println!(
                "[{} chunk {}] score={:.4}",
                meta.doc_id, meta.chunk_id, hit.score
            ),
            None => println!("[unattributed] score={:.4}", hit.score),
        }
        println!("  {}", hit.text);
    }
}
