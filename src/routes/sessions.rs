use actix_web::{http::header, web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use crate::config::Settings;
use crate::core::SearchError;
use crate::models::{
    CopyResponse, CreateSessionRequest, FilterRequest, HealthResponse, SearchRequest,
    SectorFilter, SessionResponse, ToggleRequest,
};
use crate::routes::error::ApiError;
use crate::services::{Clipboard, DatasetCache, FlavourLookup, SessionStore, SharedSession};
use crate::session::SearchSession;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub datasets: Arc<DatasetCache>,
    pub sessions: SessionStore,
    pub clipboard: Arc<dyn Clipboard>,
    pub flavour: Option<Arc<dyn FlavourLookup>>,
}

impl AppState {
    async fn session(&self, id: Uuid) -> Result<SharedSession, ApiError> {
        self.sessions.get(&id).await.ok_or(ApiError::SessionNotFound(id))
    }
}

/// Configure all session routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/sessions", web::post().to(create_session))
        .route("/sessions/{id}", web::delete().to(delete_session))
        .route("/sessions/{id}/search", web::post().to(run_search))
        .route("/sessions/{id}/filter", web::post().to(set_filter))
        .route("/sessions/{id}/selection", web::get().to(get_selection))
        .route("/sessions/{id}/selection/toggle", web::post().to(toggle_row))
        .route("/sessions/{id}/selection/all", web::post().to(select_all))
        .route("/sessions/{id}/selection/clear", web::post().to(clear_selection))
        .route("/sessions/{id}/copy", web::post().to(copy_emails))
        .route("/sessions/{id}/export.csv", web::get().to(download_csv));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        regions_cached: state.datasets.region_count(),
        timestamp: chrono::Utc::now(),
    })
}

/// Open a session
///
/// POST /api/v1/sessions
///
/// Request body:
/// ```json
/// { "region": "nsw" }
/// ```
async fn create_session(
    state: web::Data<AppState>,
    req: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let dataset = state.datasets.get_or_load(&req.region).await.map_err(|e| {
        tracing::error!("Failed to load dataset for {}: {}", req.region, e);
        ApiError::from(e)
    })?;

    let region_name = state.settings.region_name(&dataset.region);
    let message = if dataset.is_loaded() {
        format!("Loaded {} schools for {}.", dataset.schools.len(), region_name)
    } else {
        format!("{} dataset not loaded yet.", region_name)
    };

    let session = SearchSession::new(region_name.clone(), Arc::clone(&dataset))
        .with_flavour(state.flavour.clone());
    let session_id = state.sessions.insert(session).await;

    tracing::info!("Session {} opened for {}", session_id, dataset.region);

    Ok(HttpResponse::Created().json(SessionResponse {
        session_id,
        region: dataset.region.clone(),
        region_name,
        school_count: dataset.schools.len(),
        message,
    }))
}

async fn delete_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if state.sessions.remove(&id).await {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

/// Radius search
///
/// POST /api/v1/sessions/{id}/search
///
/// Request body:
/// ```json
/// { "location": "2300", "radiusKm": 10, "sector": "all" }
/// ```
async fn run_search(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session(path.into_inner()).await?;
    let mut session = session.lock().await;

    let radius_km = match check_search(&req, &state.settings) {
        Ok(radius_km) => radius_km,
        Err(e) => {
            // A rejected search still discards the previous result
            session.reset();
            tracing::info!("Search for {:?} rejected: {}", req.location, e);
            return Err(e);
        }
    };

    if let Err(e) = session.search(&req.location, radius_km, SectorFilter::parse(&req.sector)) {
        tracing::info!("Search for {:?} failed: {}", req.location, e);
        return Err(e.into());
    }

    let view = session.view().ok_or(SearchError::NoSearch)?;
    Ok(HttpResponse::Ok().json(view))
}

/// Validate the request body and return the radius to search with
fn check_search(req: &SearchRequest, settings: &Settings) -> Result<f64, ApiError> {
    req.validate()?;

    let limits = &settings.search;
    let radius_km = req.radius_km.unwrap_or(limits.default_radius_km);
    if radius_km > limits.max_radius_km {
        return Err(SearchError::Input(format!(
            "Radius must be at most {} km.",
            limits.max_radius_km
        ))
        .into());
    }
    Ok(radius_km)
}

async fn set_filter(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<FilterRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session(path.into_inner()).await?;
    let mut session = session.lock().await;

    session.set_emails_only(req.emails_only);

    let view = session.view().ok_or(SearchError::NoSearch)?;
    Ok(HttpResponse::Ok().json(view))
}

async fn get_selection(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session(path.into_inner()).await?;
    let session = session.lock().await;
    Ok(HttpResponse::Ok().json(session.selection_state()))
}

async fn toggle_row(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ToggleRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session(path.into_inner()).await?;
    let mut session = session.lock().await;
    Ok(HttpResponse::Ok().json(session.toggle(req.index)))
}

async fn select_all(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session(path.into_inner()).await?;
    let mut session = session.lock().await;
    Ok(HttpResponse::Ok().json(session.select_all()))
}

async fn clear_selection(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session(path.into_inner()).await?;
    let mut session = session.lock().await;
    Ok(HttpResponse::Ok().json(session.clear_selection()))
}

/// Copy emails
///
/// POST /api/v1/sessions/{id}/copy
///
/// Selected rows are copied as `Name <email>`; with nothing selected every
/// distinct email of the visible rows is copied.
async fn copy_emails(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session(path.into_inner()).await?;
    let text = session.lock().await.clipboard_text()?;

    // Clipboard tools block; keep them off the async workers and the session lock
    let clipboard = Arc::clone(&state.clipboard);
    let payload = text.text();
    let write_payload = payload.clone();
    let written = web::block(move || clipboard.write_text(&write_payload)).await;

    let (copied, message) = match written {
        Ok(Ok(())) => (true, text.success_message()),
        Ok(Err(e)) => {
            tracing::warn!("Clipboard write failed: {}", e);
            (false, format!("Clipboard copy failed: {}", e))
        }
        Err(e) => {
            tracing::error!("Clipboard task failed: {}", e);
            (false, "Clipboard copy failed.".to_string())
        }
    };

    Ok(HttpResponse::Ok().json(CopyResponse {
        copied,
        mode: text.mode.as_str().to_string(),
        count: text.count(),
        text: payload,
        message,
    }))
}

/// CSV download of the visible rows
///
/// GET /api/v1/sessions/{id}/export.csv
async fn download_csv(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let session = state.session(path.into_inner()).await?;
    let session = session.lock().await;
    let export = session.export_csv()?;

    tracing::debug!("CSV export {} ({} bytes)", export.filename, export.body.len());

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ))
        .body(export.body))
}
