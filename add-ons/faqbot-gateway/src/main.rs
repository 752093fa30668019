//! Axum-based HTTP front door for the FAQ bot. Config-driven via BotConfig.

mod handlers;

use axum::{
    extract::State,
    http::Method,
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use faqbot_core::{BotConfig, Chatbot, KnowledgeStore, Lexicon, SessionController};
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<BotConfig>,
    /// Single critical section for every turn (knowledge reads and saves).
    pub(crate) bot: Arc<Mutex<Chatbot>>,
    /// Conversations waiting for a taught answer, by id.
    pub(crate) sessions: Arc<DashMap<String, SessionController>>,
}

impl AppState {
    pub(crate) fn new(config: BotConfig, bot: Chatbot) -> Self {
        Self {
            config: Arc::new(config),
            bot: Arc::new(Mutex::new(bot)),
            sessions: Arc::new(DashMap::new()),
        }
    }
}

/// Pre-flight check: config, knowledge file and word lists load, and the port is free.
fn run_verify() -> Result<(), String> {
    let config = BotConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking knowledge file {}... ", config.knowledge_path);
    let store = KnowledgeStore::open_path(&config.knowledge_path).map_err(|e| format!("Knowledge file unusable: {}", e))?;
    println!("OK ({} pairs)", store.len());

    print!("Checking word lists... ");
    let lexicon = Lexicon::load(&config).map_err(|e| format!("Word list unusable: {}", e))?;
    println!(
        "OK ({} banned, {} keywords)",
        lexicon.banned().len(),
        lexicon.keywords().len()
    );

    print!("Checking {}:{}... ", config.host, config.port);
    match std::net::TcpListener::bind((config.host.as_str(), config.port)) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", config.port, e));
        }
    }

    println!("\nAll checks passed. Ready to start {}.", config.app_name);
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[faqbot-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = serve().await {
        tracing::error!(target: "faqbot::gateway", error = %e, "Gateway stopped");
        std::process::exit(1);
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = BotConfig::load()?;
    let bot = Chatbot::from_config(&config)?;
    let state = AppState::new(config, bot);

    let listener = tokio::net::TcpListener::bind((state.config.host.as_str(), state.config.port)).await?;
    tracing::info!(
        target: "faqbot::gateway",
        "{} listening on {}",
        state.config.app_name,
        listener.local_addr()?
    );
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}

fn build_app(state: AppState) -> Router {
    // The form page may be opened from another local origin during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::ask::index))
        .route("/ask", post(handlers::ask::ask))
        .route("/v1/turn", post(handlers::ask::turn))
        .route("/v1/grades", post(handlers::grades::grades))
        .route("/v1/status", get(status))
        .route("/api/v1/health", get(health))
        .with_state(state)
        .layer(cors)
}

/// GET /api/v1/health – liveness check for scripts.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/status – app identity, knowledge size and pending learning exchanges.
async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let pairs = state.bot.lock().unwrap_or_else(PoisonError::into_inner).store().len();
    Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "match_cutoff": state.config.match_cutoff,
        "pairs": pairs,
        "conversations": state.sessions.len(),
    }))
}
