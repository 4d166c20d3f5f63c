use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use school_radius::config::Settings;
use school_radius::routes::{self, AppState};
use school_radius::services::{
    Clipboard, DatasetCache, DatasetLoader, DisabledClipboard, FlavourLookup, FlavourTable,
    SessionStore, SystemClipboard,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path errors (malformed session ids)
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(settings: &Settings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn load_flavour(settings: &Settings) -> Option<Arc<dyn FlavourLookup>> {
    let path = settings.data.flavour_path.as_deref()?;
    match FlavourTable::load(path) {
        Ok(table) => {
            info!("Flavour table loaded from {}", path);
            Some(Arc::new(table))
        }
        Err(e) => {
            warn!("Flavour table unavailable ({}), continuing without it", e);
            None
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings);

    info!("Starting school radius search service...");

    let loader = DatasetLoader::new(&settings.data.base, settings.data.fetch_timeout_secs)
        .map_err(|e| {
            error!("Failed to initialise dataset loader: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;

    info!("Dataset source: {:?}", loader.source());

    let datasets = Arc::new(DatasetCache::new(
        loader,
        settings.data.max_regions,
        settings.data.cache_ttl_secs,
    ));

    let sessions = SessionStore::new(
        settings.session.max_sessions,
        settings.session.idle_timeout_secs,
    );

    let clipboard: Arc<dyn Clipboard> = if settings.clipboard.enabled {
        Arc::new(SystemClipboard)
    } else {
        Arc::new(DisabledClipboard)
    };

    info!(
        "Sessions expire after {}s idle, host clipboard {}",
        settings.session.idle_timeout_secs,
        if settings.clipboard.enabled { "enabled" } else { "disabled" }
    );

    let flavour = load_flavour(&settings);

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    let app_state = AppState {
        settings: Arc::new(settings),
        datasets,
        sessions,
        clipboard,
        flavour,
    };

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
