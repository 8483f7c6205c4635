use anyhow::{bail, Context, Result};
use sabor::cli::{chat::run_chat, output::Output, Cli, Commands};
use sabor::rag::indexing::{index_knowledge_base, IndexOptions};
use sabor::utils::toml_config::{LogFormat, LoggingConfig, SaborConfig};
use sabor::{
    ChatSession, EmbeddingService, LocalVectorStore, OpenAIEmbeddings, Provider, RagEngine,
    VectorStoreManager,
};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    let mut config = SaborConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    config.apply_env_overrides(|key| std::env::var(key).ok())?;

    init_tracing(&config.logging, cli.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli, config))
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let default_filter = if verbose {
        "info,sabor=debug,sabor_vector=debug".to_string()
    } else {
        logging.level.clone()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run(cli: Cli, config: SaborConfig) -> Result<()> {
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command() {
        Commands::Chat { no_sources } => {
            let engine = Arc::new(build_engine(&config).await?);
            let mut session = ChatSession::new(engine);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_chat(&mut session, stdin, &output, &config.assistant, !no_sources).await?;
        }

        Commands::Ask {
            question,
            top_k,
            json,
        } => {
            if question.trim().is_empty() {
                bail!("The question must not be empty");
            }
            let engine = build_engine(&config).await?;
            let result = engine.query(&question, top_k, cli.verbose).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                if let Some(error) = &result.error {
                    output.error(&format!("Error: {}", error));
                }
                output.answer(&config.assistant.restaurant_name, &result, true);
            }
        }

        Commands::Index {
            path,
            chunk_size,
            chunk_overlap,
            batch_size,
            reset,
        } => {
            let options = IndexOptions {
                knowledge_base_path: path.unwrap_or_else(|| config.rag.knowledge_base_path.clone()),
                chunk_size: chunk_size.unwrap_or(config.rag.chunk_size),
                chunk_overlap: chunk_overlap.unwrap_or(config.rag.chunk_overlap),
                batch_size: batch_size.unwrap_or(config.embedding.batch_size),
                reset,
            };

            let api_key = config.api_key(|key| std::env::var(key).ok())?;
            let manager = open_manager(&config, api_key).await?;

            output.header("Indexando base de conocimiento");
            output.kv("Directorio", &options.knowledge_base_path.display().to_string());
            output.kv(
                "Chunks",
                &format!(
                    "{} caracteres, overlap {}",
                    options.chunk_size, options.chunk_overlap
                ),
            );
            if options.reset {
                output.warning("Se borrará la base vectorial antes de indexar");
            }

            let summary = index_knowledge_base(&manager, &options).await?;
            let report = &summary.report;

            output.kv("Documentos antes", &summary.documents_before.to_string());
            output.kv(
                "Agregados",
                &format!("{} de {}", report.added, summary.chunks),
            );
            output.kv("Tokens", &report.tokens_used.to_string());
            output.kv("Costo estimado", &format!("${:.6} USD", report.estimated_cost));
            output.kv("Tiempo", &format!("{:.2}s", report.elapsed.as_secs_f64()));
            output.kv("Documentos después", &summary.documents_after.to_string());

            if report.added == 0 {
                output.error("No se agregaron documentos");
            } else if summary.is_complete() {
                output.success("Indexación completa");
            } else {
                output.warning(&format!(
                    "{} lote(s) fallaron; revisa los logs",
                    report.failed_batches
                ));
            }
        }

        Commands::Stats => {
            let manager = open_manager(&config, offline_key(&config)).await?;
            let stats = manager.get_collection_stats().await?;

            output.header("Colección");
            output.kv("Nombre", &stats.collection_name);
            output.kv("Documentos", &stats.total_documents.to_string());
            output.kv(
                "Directorio",
                stats.persist_directory.as_deref().unwrap_or("(memoria)"),
            );
        }

        Commands::Reset { yes } => {
            if !yes && !confirm(&output, "¿Borrar toda la base vectorial?") {
                output.info("Cancelado");
                return Ok(());
            }
            let manager = open_manager(&config, offline_key(&config)).await?;
            manager.reset_database().await?;
            output.success("Base vectorial reiniciada");
        }

        Commands::Config => {
            output.header("Configuración efectiva");
            println!("{}", toml::to_string_pretty(&config)?);
            let key_state = match config.api_key(|key| std::env::var(key).ok()) {
                Ok(_) => "definida",
                Err(_) => "NO definida",
            };
            output.kv(&config.llm.api_key_env, key_state);
        }
    }

    Ok(())
}

/// Stats and reset never call the embedding service, so a missing key is fine.
fn offline_key(config: &SaborConfig) -> String {
    config
        .api_key(|key| std::env::var(key).ok())
        .unwrap_or_default()
}

async fn open_manager(config: &SaborConfig, api_key: String) -> Result<Arc<VectorStoreManager>> {
    let store = Arc::new(LocalVectorStore::open(Some(config.vector_store.directory.clone())).await?);
    let embedder: Arc<dyn EmbeddingService> = Arc::new(OpenAIEmbeddings::new(
        api_key,
        config.llm.api_base.clone(),
        config.embedding.model.clone(),
    ));

    let manager = VectorStoreManager::new(
        store,
        embedder,
        config.vector_store.collection_name.clone(),
        config.costs.embedding_per_1k,
    )
    .await?;

    Ok(Arc::new(manager))
}

async fn build_engine(config: &SaborConfig) -> Result<RagEngine> {
    let api_key = config.api_key(|key| std::env::var(key).ok())?;
    let manager = open_manager(config, api_key.clone()).await?;

    let stats = manager.get_collection_stats().await?;
    if stats.total_documents == 0 {
        tracing::warn!(
            collection = %stats.collection_name,
            "Collection is empty, run `sabor index` first"
        );
    }

    let provider = Provider::OpenAI {
        api_key,
        api_base: config.llm.api_base.clone(),
        model: config.llm.chat_model.clone(),
    };
    info!(provider = provider.name(), model = provider.model(), "RAG engine ready");

    Ok(RagEngine::from_config(manager, provider.create_client(), config))
}

fn confirm(output: &Output, message: &str) -> bool {
    output.warning(message);
    print!("  [s/N]: ");
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        matches!(input.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes")
    } else {
        false
    }
}
