mod colors;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod source;
mod validation;

use config::{Config, SourceKind};
use db::Db;
use ntex::web;
use ntex_cors::Cors;
use source::{SheetsSource, SqliteSource, TableSource};
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn TableSource>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn open_source(config: &Config) -> Result<Arc<dyn TableSource>, io::Error> {
    match config.source {
        SourceKind::Sheets => {
            let sheets = SheetsSource::new(config).map_err(io::Error::other)?;
            Ok(Arc::new(sheets))
        }
        SourceKind::Sqlite => {
            let db = Db::open(&config.database_path).map_err(io::Error::other)?;
            let sqlite = SqliteSource::new(Arc::new(db));
            if let Some(path) = &config.seed_path {
                let id = config.spreadsheet_id.as_deref().ok_or_else(|| {
                    io::Error::other("SEED_PATH needs GOOGLE_SHEETS_SPREADSHEET_ID to key the snapshots")
                })?;
                let sheets = sqlite.seed_from_file(id, path).map_err(io::Error::other)?;
                info!(path = %path, sheets, "loaded seed file");
            }
            Ok(Arc::new(sqlite))
        }
    }
}

#[ntex::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let config = Config::from_env().map_err(io::Error::other)?;
    let bind = format!("{}:{}", config.host, config.port);
    // The Sheets client owns a blocking HTTP runtime; build it off the async workers.
    let source = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || open_source(&config))
            .await
            .map_err(io::Error::other)??
    };

    info!(
        bind = %bind,
        source = ?config.source,
        spreadsheet = %config.masked_spreadsheet_id(),
        default_sheet = %config.default_sheet,
        "sales leaderboard server starting"
    );

    let state = Arc::new(AppState { config, source });

    web::HttpServer::new(move || {
        web::App::new()
            .state(state.clone())
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            .route("/api/health", web::get().to(health))
            .route("/api/filters", web::get().to(handlers::leaderboard::get_filters))
            .route("/api/leaderboard", web::get().to(handlers::leaderboard::get_leaderboard))
            .route(
                "/api/leaderboard/search",
                web::get().to(handlers::leaderboard::search_leaderboard),
            )
            .route("/api/header", web::get().to(handlers::leaderboard::get_header_label))
    })
    .bind(bind)?
    .run()
    .await
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
