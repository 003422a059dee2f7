use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use embed::{EmbeddingProvider, create_generator};
use extract::{CompositeEntityExtractor, EntityDeduplicator};
use ingest::{FileReader, generate_doc_id};
use pipeline::{DocumentProcessor, PipelineConfig};

#[derive(Parser)]
#[command(name = "ner-pipeline", version, about = "Entity extraction and chunk embedding pipeline")]
struct Cli {
    /// JSON file with pipeline settings; unset fields keep their defaults
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Settings preset, used when no config file is given
    #[arg(long, value_enum, default_value = "balanced", global = true)]
    mode: OperationMode,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Pretty-print the JSON result
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OperationMode {
    Fast,
    Balanced,
    Accurate,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a .txt/.md file, annotate every chunk and embed it
    Process {
        path: PathBuf,

        #[arg(long)]
        chunk_size: Option<usize>,

        #[arg(long)]
        chunk_overlap: Option<usize>,

        #[command(flatten)]
        labels: LabelArgs,

        #[command(flatten)]
        embedding: EmbeddingArgs,
    },

    /// Extract entities from and embed a single text
    Text {
        text: String,

        #[command(flatten)]
        labels: LabelArgs,

        #[command(flatten)]
        embedding: EmbeddingArgs,
    },

    /// List entities of an LLM response that its request does not mention, and the reverse
    Check {
        /// Prompt and context sent to the model
        #[arg(long)]
        request: String,

        /// The model's answer
        #[arg(long)]
        response: String,

        #[command(flatten)]
        labels: LabelArgs,
    },

    /// Extract entities only; no embedding backend needed
    Extract {
        text: String,

        #[command(flatten)]
        labels: LabelArgs,
    },
}

#[derive(Args)]
struct LabelArgs {
    /// Entity label to extract (repeatable); defaults to the configured set
    #[arg(long = "entity-type", short = 't')]
    entity_types: Vec<String>,
}

#[derive(Args)]
struct EmbeddingArgs {
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Embedding server base URL
    #[arg(long)]
    embedding_url: Option<String>,

    #[arg(long)]
    embedding_model: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Ollama,
    OpenaiCompatible,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => match cli.mode {
            OperationMode::Fast => PipelineConfig::fast(),
            OperationMode::Balanced => PipelineConfig::default(),
            OperationMode::Accurate => PipelineConfig::accurate(),
        },
    };

    // No learned model is bundled with the binary, so only pattern sources run.
    let extractor = Arc::new(
        CompositeEntityExtractor::patterns_only()
            .with_deduplicator(EntityDeduplicator::new(config.dedup.threshold)),
    );

    let output = match cli.command {
        Commands::Process {
            path,
            chunk_size,
            chunk_overlap,
            labels,
            embedding,
        } => {
            embedding.apply(&mut config);
            let processor = build_processor(extractor, config)?;

            let text = FileReader::read_file(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let document_id = generate_doc_id(&path.to_string_lossy());
            info!(document_id = %document_id, path = %path.display(), "Processing document");

            let chunking = processor.config().chunking;
            let result = processor
                .chunk_and_process(
                    &document_id,
                    &text,
                    chunk_size.unwrap_or(chunking.chunk_size),
                    chunk_overlap.unwrap_or(chunking.chunk_overlap),
                    &labels.entity_types,
                )
                .await
                .context("Document processing failed")?;

            serde_json::to_value(&result)?
        }

        Commands::Text {
            text,
            labels,
            embedding,
        } => {
            embedding.apply(&mut config);
            let processor = build_processor(extractor, config)?;

            let result = processor
                .process_text(&text, &labels.entity_types)
                .await
                .context("Text processing failed")?;

            serde_json::to_value(&result)?
        }

        Commands::Check {
            request,
            response,
            labels,
        } => {
            // The embedding backend is configured but never called here.
            let processor = build_processor(extractor, config)?;
            let diff = processor
                .check_hallucinations(&request, &response, &labels.entity_types)
                .await
                .context("Hallucination check failed")?;

            serde_json::to_value(&diff)?
        }

        Commands::Extract { text, labels } => {
            let entity_types = if labels.entity_types.is_empty() {
                config.ner.entity_types.clone()
            } else {
                labels.entity_types
            };
            let entities = extractor
                .extract(&text, &entity_types)
                .context("Entity extraction failed")?;

            serde_json::json!({ "entities": entities })
        }
    };

    print_json(&output, cli.pretty)
}

impl EmbeddingArgs {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(provider) = self.provider {
            config.embedding.provider = match provider {
                ProviderArg::Ollama => EmbeddingProvider::Ollama,
                ProviderArg::OpenaiCompatible => EmbeddingProvider::OpenAiCompatible,
            };
        }
        if let Some(url) = self.embedding_url {
            config.embedding.base_url = url;
        }
        if let Some(model) = self.embedding_model {
            config.embedding.model = model;
        }
    }
}

fn build_processor(
    extractor: Arc<CompositeEntityExtractor>,
    config: PipelineConfig,
) -> Result<DocumentProcessor> {
    let embedder =
        create_generator(&config.embedding).context("Failed to create embedding generator")?;
    info!(
        backend = embedder.name(),
        model = %config.embedding.model,
        url = %config.embedding.url(),
        "Embedding backend ready"
    );

    DocumentProcessor::new(extractor, embedder, config).context("Invalid pipeline configuration")
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}
