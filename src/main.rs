use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cards;
mod color;
mod config;
mod error;
mod heat;
mod stylesheet;
mod theme;

use cards::{cards_from_csv, sheet_page, CardSheet};
use config::AppConfig;
use heat::{css_color_for_heat, parse_heat, Palette};
use theme::{initial_mode, DisplayMode};

#[derive(Clone)]
struct AppState {
    sheet: Arc<RwLock<CardSheet>>,
    edit_key: String,
}

impl AppState {
    fn new(sheet: CardSheet, edit_key: String) -> Self {
        Self {
            sheet: Arc::new(RwLock::new(sheet)),
            edit_key,
        }
    }

    // A panicked writer leaves a whole sheet behind, never a torn one.
    fn read(&self) -> RwLockReadGuard<'_, CardSheet> {
        self.sheet.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CardSheet> {
        self.sheet.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct SuccessResponse {
    message: String,
    sheet: CardSheet,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (status, Json(ErrorResponse { error: error.to_string() }))
}

#[derive(Deserialize)]
struct SheetQuery {
    mode: Option<DisplayMode>,
}

#[derive(Serialize)]
struct HeatResponse {
    text: String,
    heat: i64,
    color: String,
}

#[derive(Deserialize)]
struct PaletteRequest {
    cool: String,
    blaze: String,
}

#[tokio::main]
async fn main() -> error::Result<()> {
    // Initialize logging (disable in Cloud Run to avoid startup issues)
    // Cloud Run sets K_SERVICE environment variable
    if std::env::var("K_SERVICE").is_err() {
        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info"))
            )
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }

    tracing::info!("Starting heat card sheet server");

    let config = AppConfig::from_env()?;

    let mut sheet = CardSheet {
        palette: config.palette,
        ..CardSheet::default()
    };
    if let Some(title) = config.title {
        sheet.title = title;
    }

    let app = app(AppState::new(sheet, config.edit_key));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Graceful shutdown handler
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/heat/:value", get(heat_color))
        .route("/palette.css", get(palette_css))
        .route("/health", get(health_check))
        .route("/config", get(get_config))
        .route("/admin/upload", post(upload_csv))
        .route("/admin/palette", post(update_palette))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)) // 10MB limit
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

async fn root(
    State(state): State<AppState>,
    Query(query): Query<SheetQuery>,
) -> Response {
    let mode = query
        .mode
        .unwrap_or_else(|| initial_mode(chrono::Local::now().hour()));
    let page = sheet_page(&state.read(), mode);
    // Render failures become a 500 inside askama_axum
    askama_axum::into_response(&page)
}

async fn heat_color(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Json<HeatResponse>, ApiError> {
    let heat = parse_heat(&value).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    let palette = state.read().palette;
    Ok(Json(HeatResponse {
        text: value,
        heat,
        color: css_color_for_heat(heat, &palette),
    }))
}

async fn palette_css(State(state): State<AppState>) -> Response {
    let css = state.read().palette.to_stylesheet();
    (
        [
            (header::CONTENT_TYPE, "text/css"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        css,
    )
        .into_response()
}

async fn health_check() -> &'static str {
    "OK"
}

async fn get_config(State(state): State<AppState>) -> Json<CardSheet> {
    Json(state.read().clone())
}

fn verify_auth(headers: &HeaderMap, expected_key: &str) -> Result<(), ApiError> {
    let unauthorized =
        || api_error(StatusCode::UNAUTHORIZED, "Invalid or missing Authorization header");

    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(unauthorized)?;

    // Support both "Bearer <key>" and just "<key>"
    let provided_key = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    if provided_key != expected_key {
        return Err(unauthorized());
    }

    Ok(())
}

async fn upload_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<SuccessResponse>, ApiError> {
    verify_auth(&headers, &state.edit_key)?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        api_error(StatusCode::BAD_REQUEST, format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() == Some("file") {
            let data = field.bytes().await.map_err(|e| {
                api_error(StatusCode::BAD_REQUEST, format!("Failed to read file data: {}", e))
            })?;

            let cards = cards_from_csv(data.as_ref())
                .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Failed to parse CSV: {}", e)))?;

            let mut sheet = state.write();
            sheet.cards = cards;
            sheet.touch();

            tracing::info!("Replaced card sheet with {} cards", sheet.cards.len());

            return Ok(Json(SuccessResponse {
                message: "CSV uploaded successfully".to_string(),
                sheet: sheet.clone(),
            }));
        }
    }

    Err(api_error(StatusCode::BAD_REQUEST, "No file uploaded"))
}

async fn update_palette(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PaletteRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    verify_auth(&headers, &state.edit_key)?;

    let palette = Palette::from_hex(&request.cool, &request.blaze).map_err(|e| {
        tracing::warn!("Rejected palette update: {}", e);
        api_error(StatusCode::BAD_REQUEST, e)
    })?;

    let mut sheet = state.write();
    sheet.palette = palette;
    sheet.touch();

    tracing::info!("Updated heat palette via JSON");

    Ok(Json(SuccessResponse {
        message: "Palette updated successfully".to_string(),
        sheet: sheet.clone(),
    }))
}
