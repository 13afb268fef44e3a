// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! HTTP server and API handlers for the dashboard.
//!
//! - `GET /` - dashboard page
//! - `GET /api/health` - health check
//! - `GET /api/layout` - control tree and defaults
//! - `GET /api/summary` - dataset overview
//! - `GET /api/callbacks` - registered callbacks and their subscriptions
//! - `GET /api/figure/:output` - render one chart for the given control values
//! - `GET /api/update?changed=<control>` - render every chart subscribed to a control

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::callbacks::{CallbackInfo, CallbackRegistry, ControlValues};
use crate::charts::Figure;
use crate::context::DashboardContext;
use crate::data::{ParseRangeError, PayloadRange, SiteSelection};
use crate::layout::DashboardLayout;

/// Application state shared across handlers.
pub struct AppState {
    pub ctx: DashboardContext,
    pub layout: DashboardLayout,
    pub callbacks: CallbackRegistry,
}

impl AppState {
    pub fn new(ctx: DashboardContext) -> Self {
        let layout = DashboardLayout::build(&ctx);
        Self {
            ctx,
            layout,
            callbacks: CallbackRegistry::new(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8050,
            open_browser: true,
        }
    }
}

/// Build the router over an already-loaded context.
pub fn router(ctx: DashboardContext) -> Router {
    let state = Arc::new(AppState::new(ctx));

    Router::new()
        .route("/", get(index_handler))
        .route("/api/health", get(health_handler))
        .route("/api/layout", get(layout_handler))
        .route("/api/summary", get(summary_handler))
        .route("/api/callbacks", get(callbacks_handler))
        .route("/api/figure/:output", get(figure_handler))
        .route("/api/update", get(update_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and serve until Ctrl+C.
pub async fn run_server(ctx: DashboardContext, config: ServerConfig) -> anyhow::Result<()> {
    let app = router(ctx);
    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;

    let url = format!("http://{}", listener.local_addr()?);
    if config.open_browser {
        tracing::info!(%url, "Opening browser");
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
    }

    tracing::info!(%url, "Dashboard running, press Ctrl+C to stop");

    serve(listener, app, shutdown_signal()).await
}

/// Serve `app` on `listener` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Dashboard stopped");
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed, serve until killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

// --- Errors ---

/// Request errors with appropriate HTTP status codes.
#[derive(Debug)]
enum ApiError {
    /// The payload query value is not `low,high`.
    InvalidPayload(ParseRangeError),
    /// No callback renders the requested output.
    UnknownOutput(String),
    /// No callback subscribes to the changed control.
    UnknownControl(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidPayload(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::UnknownOutput(output) => {
                (StatusCode::NOT_FOUND, format!("Unknown output: {}", output))
            }
            ApiError::UnknownControl(control) => {
                (StatusCode::BAD_REQUEST, format!("Unknown control: {}", control))
            }
        };
        (status, message).into_response()
    }
}

// --- Handlers ---

const INDEX_HTML: &str = include_str!("static/index.html");

/// Serve the dashboard page.
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/health - health check endpoint for dev tooling.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// GET /api/layout - control tree with defaults derived from the dataset.
async fn layout_handler(State(state): State<Arc<AppState>>) -> Json<DashboardLayout> {
    Json(state.layout.clone())
}

/// GET /api/summary - dataset overview for the page header.
async fn summary_handler(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let rows = state.ctx.table().len();
    let successes = state.ctx.success_count();
    Json(SummaryResponse {
        rows,
        successes,
        failures: rows - successes,
        sites: state.ctx.sites().to_vec(),
        payload_bounds: state.ctx.payload_bounds(),
    })
}

#[derive(Serialize)]
struct SummaryResponse {
    rows: usize,
    successes: usize,
    failures: usize,
    sites: Vec<String>,
    payload_bounds: PayloadRange,
}

/// GET /api/callbacks - list registered callbacks.
async fn callbacks_handler(State(state): State<Arc<AppState>>) -> Json<CallbacksResponse> {
    Json(CallbacksResponse {
        callbacks: state.callbacks.list(),
    })
}

#[derive(Serialize)]
struct CallbacksResponse {
    callbacks: Vec<CallbackInfo>,
}

/// Control values as they arrive in the query string.
/// Missing values fall back to the layout defaults.
#[derive(Deserialize)]
struct ControlQuery {
    #[serde(default)]
    site: Option<SiteSelection>,
    /// `low,high`
    #[serde(default)]
    payload: Option<String>,
}

impl ControlQuery {
    fn resolve(&self, ctx: &DashboardContext) -> Result<ControlValues, ApiError> {
        let mut values = ControlValues::defaults(ctx);
        if let Some(ref site) = self.site {
            values.site = site.clone();
        }
        if let Some(ref payload) = self.payload {
            values.payload = payload.parse().map_err(ApiError::InvalidPayload)?;
        }
        Ok(values)
    }
}

/// GET /api/figure/:output - render a single chart.
async fn figure_handler(
    State(state): State<Arc<AppState>>,
    Path(output): Path<String>,
    Query(query): Query<ControlQuery>,
) -> Result<Json<Figure>, ApiError> {
    let callback = state
        .callbacks
        .get(&output)
        .ok_or_else(|| ApiError::UnknownOutput(output.clone()))?;
    let values = query.resolve(&state.ctx)?;

    Ok(Json(callback.render(&state.ctx, &values)))
}

#[derive(Deserialize)]
struct UpdateQuery {
    changed: String,
    #[serde(default)]
    site: Option<SiteSelection>,
    #[serde(default)]
    payload: Option<String>,
}

#[derive(Serialize)]
struct UpdateResponse {
    outputs: BTreeMap<String, Figure>,
}

/// GET /api/update - a control changed; re-render its subscribers.
async fn update_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpdateQuery>,
) -> Result<Json<UpdateResponse>, ApiError> {
    if !state.callbacks.is_known_control(&query.changed) {
        return Err(ApiError::UnknownControl(query.changed));
    }

    let controls = ControlQuery {
        site: query.site,
        payload: query.payload,
    };
    let values = controls.resolve(&state.ctx)?;

    let outputs = state
        .callbacks
        .dispatch(&state.ctx, &query.changed, &values)
        .into_iter()
        .collect();

    Ok(Json(UpdateResponse { outputs }))
}
