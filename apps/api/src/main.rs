mod config;
mod db;
mod directory;
mod errors;
mod llm_client;
mod models;
mod ranking;
mod recommendation;
mod routes;
mod scoring;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ScoringBackend};
use crate::db::create_pool;
use crate::directory::PgDirectory;
use crate::llm_client::LlmClient;
use crate::ranking::prompts::RESUME_RANKING_PROMPT;
use crate::ranking::ranker::ResumeRanker;
use crate::recommendation::prompts::RECOMMENDATION_PROMPT;
use crate::recommendation::recommender::JobRecommender;
use crate::routes::build_router;
use crate::scoring::heuristic::HeuristicScorer;
use crate::scoring::llm::LlmScorer;
use crate::scoring::ScoringModel;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Campus API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let directory = Arc::new(PgDirectory::new(db));

    // Initialize scoring models (one per feature prompt when LLM-backed)
    let (recommend_model, rank_model) = build_models(&config)?;
    info!(
        "Scoring backend: {} (concurrency: {:?}, timeout: {:?}, applied jobs: {:?})",
        recommend_model.backend(),
        config.scoring.concurrency,
        config.scoring.timeout,
        config.scoring.applied_jobs
    );

    // Build app state
    let state = AppState {
        recommender: Arc::new(JobRecommender::new(recommend_model, config.scoring.clone())),
        ranker: Arc::new(ResumeRanker::new(rank_model, config.scoring.clone())),
        catalog: directory.clone(),
        profiles: directory,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Returns the recommendation model and the resume ranking model.
fn build_models(config: &Config) -> Result<(Arc<dyn ScoringModel>, Arc<dyn ScoringModel>)> {
    let models: (Arc<dyn ScoringModel>, Arc<dyn ScoringModel>) = match config.scoring_backend {
        ScoringBackend::Heuristic => (Arc::new(HeuristicScorer), Arc::new(HeuristicScorer)),
        ScoringBackend::Llm => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the llm scoring backend")?;
            let llm = LlmClient::new(api_key, config.scoring_model.clone())?;
            info!("LLM client initialized (model: {})", llm.model());
            (
                Arc::new(LlmScorer::new(llm.clone(), RECOMMENDATION_PROMPT)),
                Arc::new(LlmScorer::new(llm, RESUME_RANKING_PROMPT)),
            )
        }
    };
    Ok(models)
}
