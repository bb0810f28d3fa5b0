//! # Quill Web Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod flash;
mod handlers;
mod middleware;
mod state;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = AppConfig::from_env();

    let Some(db_config) = config.database.clone() else {
        tracing::error!("DATABASE_URL is not set; the blog cannot start without its store");
        std::process::exit(1);
    };

    tracing::info!("Starting Quill on {}:{}", config.host, config.port);

    // Build application state
    let state = match AppState::new(&config, &db_config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application state: {e}");
            std::process::exit(1);
        }
    };

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,web_server=debug,quill_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
