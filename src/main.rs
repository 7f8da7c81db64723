use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use questionnaire_api::config::AppConfig;
use questionnaire_api::database::Database;
use questionnaire_api::handlers::AppState;
use questionnaire_api::routes::configure_routes;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "questionnaire-api",
    version,
    about = "Questionnaire response collection service"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("questionnaire_api=info".parse().expect("valid directive")),
        )
        .init();

    tracing::info!("Starting questionnaire-api");

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    }
    .map_err(|e| std::io::Error::other(format!("Failed to load configuration: {e}")))?;

    // A service without its store can serve nothing useful; fail fast
    let database = Arc::new(Database::new(&config.database.path).map_err(|e| {
        tracing::error!("Failed to initialize database: {e}");
        std::io::Error::other(e.to_string())
    })?);
    tracing::info!("Database initialized at {:?}", config.database.path);

    let config = Arc::new(config);
    let app_state = web::Data::new(AppState {
        database,
        config: Arc::clone(&config),
    });

    let server_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting HTTP server on {server_addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(configure_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
