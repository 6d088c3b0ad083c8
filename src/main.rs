use anyhow::Context;
use clap::{Parser, Subcommand};
use simrank_api::{RestApi, SearchService};
use simrank_core::{HashEmbedder, DEFAULT_HASH_DIM};
use simrank_similarity::EngineConfig;
use simrank_storage::{Catalog, EmbeddingPipeline, EmbeddingStore, EmbeddingType, DEFAULT_BATCH_SIZE};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Similar title and keyword recommendation for a video catalog
#[derive(Parser, Debug)]
#[command(name = "simrank")]
#[command(about = "Similar title and keyword recommendation", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Video catalog (JSON array); defaults to <data_dir>/videos.json
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Embedding snapshot; defaults to <data_dir>/embeddings.bin
    #[arg(long, global = true)]
    embeddings: Option<PathBuf>,

    /// Engine configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dimension of the hash embedder
    #[arg(long, default_value_t = DEFAULT_HASH_DIM, global = true)]
    embed_dim: usize,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8000)]
        http_port: u16,
    },
    /// Rank catalog titles against a query and print JSON
    Rank {
        query: String,
        #[arg(short, long)]
        method: Option<String>,
        #[arg(short = 't', long, default_value = "title")]
        embedding_type: EmbeddingType,
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Rank the tag vocabulary against a query and print JSON
    Keywords {
        query: String,
        #[arg(short, long)]
        method: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Embed catalog videos missing a vector and save the snapshot
    Embed {
        /// Embedding types to generate
        #[arg(long, value_delimiter = ',', default_value = "title,title_tags,title_desc,full_text")]
        types: Vec<EmbeddingType>,
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
}

struct Paths {
    catalog: PathBuf,
    embeddings: PathBuf,
}

impl Paths {
    fn from_args(args: &Args) -> Self {
        Self {
            catalog: args.catalog.clone().unwrap_or_else(|| args.data_dir.join("videos.json")),
            embeddings: args
                .embeddings
                .clone()
                .unwrap_or_else(|| args.data_dir.join("embeddings.bin")),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    anyhow::ensure!(args.embed_dim > 0, "--embed-dim must be positive");
    let config = load_config(args.config.as_deref())?;
    let paths = Paths::from_args(&args);

    let catalog = Arc::new(load_catalog(&paths.catalog)?);
    let embeddings = Arc::new(
        EmbeddingStore::open(&paths.embeddings)
            .with_context(|| format!("failed to open embeddings {:?}", paths.embeddings))?,
    );
    let embedder = Arc::new(HashEmbedder::new(args.embed_dim));

    match args.command {
        Command::Serve { http_port } => {
            info!("Starting simrank v{}", env!("CARGO_PKG_VERSION"));
            info!("Data directory: {:?}", args.data_dir);
            let service = Arc::new(SearchService::new(catalog, embeddings, embedder, config)?);
            serve(service, http_port).await
        }
        Command::Rank {
            query,
            method,
            embedding_type,
            limit,
            threshold,
        } => {
            let service = SearchService::new(catalog, embeddings, embedder, config)?;
            let response = service.similar_search(&query, method.as_deref(), embedding_type, limit, threshold)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Keywords { query, method, limit } => {
            let service = SearchService::new(catalog, embeddings, embedder, config)?;
            let response = service.similar_keywords(&query, method.as_deref(), limit)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Embed { types, batch_size } => {
            let report = EmbeddingPipeline::new(catalog.as_ref(), &embeddings, embedder.as_ref())
                .with_batch_size(batch_size)
                .run(&types)?;
            info!("Embedded {} vectors", report.total_embedded());
            embeddings.save(&paths.embeddings)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("failed to read config {:?}", path))?;
            Ok(EngineConfig::from_json(&json)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    if path.exists() {
        Ok(Catalog::load_json(path)?)
    } else {
        warn!("Catalog {:?} not found, starting empty", path);
        Ok(Catalog::new())
    }
}

async fn serve(service: Arc<SearchService>, http_port: u16) -> anyhow::Result<()> {
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(service, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
