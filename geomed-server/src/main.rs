//! geomed-server - Healthcare Professional Location Inference Service
//!
//! Combines a PubMed evidence lookup with an LLM inference step to predict
//! the likely country (constituent nation for the UK), city, specialty, and
//! doctor-status of a named healthcare professional, persisting every
//! prediction with full provenance.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use geomed_server::config::resolve_llm_settings;
use geomed_server::services::llm_client::LlmClient;
use geomed_server::services::pipeline::PredictionPipeline;
use geomed_server::services::pubmed_client::PubMedClient;
use geomed_server::store::SqlitePredictionStore;
use geomed_server::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(
    name = "geomed-server",
    about = "GeoMed healthcare professional location inference service"
)]
struct Cli {
    /// Data folder holding the SQLite database
    #[arg(long)]
    data_dir: Option<String>,

    /// Port to listen on
    #[arg(long, env = "GEOMED_PORT", default_value_t = 5740)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting geomed-server v{}", env!("CARGO_PKG_VERSION"));

    // Resolve data folder and open the database
    let data_dir = geomed_common::config::resolve_data_dir(cli.data_dir.as_deref());
    let db_path = geomed_common::config::database_path(&data_dir);
    info!("Database: {}", db_path.display());

    let db_pool = geomed_server::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Resolve LLM settings; startup fails early with guidance when the API
    // key is missing rather than at first prediction.
    let toml_config = geomed_common::config::load_toml_config().unwrap_or_default();
    let llm_settings = resolve_llm_settings(&toml_config)?;
    info!(model = %llm_settings.model, "LLM service configured");

    // Assemble pipeline collaborators
    let pubmed = match std::env::var("GEOMED_PUBMED_BASE_URL").ok() {
        Some(base_url) => PubMedClient::with_base_url(base_url)?,
        None => PubMedClient::new()?,
    };
    let llm = LlmClient::new(llm_settings)?;
    let store = SqlitePredictionStore::new(db_pool.clone());

    let pipeline = Arc::new(PredictionPipeline::new(
        Arc::new(pubmed),
        Arc::new(llm),
        Arc::new(store),
    ));

    let state = AppState::new(db_pool, pipeline);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", cli.port)).await?;
    info!("Listening on http://127.0.0.1:{}", cli.port);
    info!("Health check: http://127.0.0.1:{}/health", cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
