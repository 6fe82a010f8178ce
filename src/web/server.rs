use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::metadata::FacetDomains;
use crate::catalog::store::ClimateCatalog;
use crate::cli::ServeArgs;
use crate::facets::controller::{FacetController, PageKind};
use crate::url_state::{query_url, UrlControls};
use crate::utils::validation::check_query_length;

/// Shared application state.
///
/// The catalog is read-only once loaded; each request builds its own
/// controller over it.
pub struct AppState {
    pub catalog: Arc<ClimateCatalog>,
    pub domains: Arc<FacetDomains>,
}

impl AppState {
    pub fn new(catalog: ClimateCatalog) -> Self {
        let domains = Arc::new(FacetDomains::from_catalog(&catalog));
        Self {
            catalog: Arc::new(catalog),
            domains,
        }
    }

    fn controller(&self, page: PageKind, controls: &UrlControls) -> FacetController {
        let mut controller =
            FacetController::with_domains(Arc::clone(&self.catalog), Arc::clone(&self.domains), page);
        controller.apply_url(controls);
        controller
    }
}

/// Error body returned by every endpoint
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error_type: &str, message: &str) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, message, None)),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs, catalog: ClimateCatalog) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, catalog).await })
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let state = Arc::new(state);

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/options", get(options_handler))
        .route("/api/layer", get(layer_handler))
        .route("/api/grid/{page}", get(grid_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // IP-based rate limiting
                .layer(GovernorLayer {
                    config: Arc::new(governor_conf),
                })
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(100)),
        );

    Ok(app)
}

async fn run_server(args: ServeArgs, catalog: ClimateCatalog) -> anyhow::Result<()> {
    let layers = catalog.len();
    let app = create_router(AppState::new(catalog))?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting climate-facets server at http://{addr} ({layers} layers)");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/options"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Split the raw query into controls and an optional `page` parameter
fn read_query(query: Option<&str>) -> Result<(UrlControls, Option<String>), Response> {
    let query = query.unwrap_or_default();
    if let Some(message) = check_query_length(query) {
        return Err(error_response(StatusCode::URI_TOO_LONG, "query_too_long", &message));
    }

    let Some(url) = query_url(query) else {
        return Ok((UrlControls::default(), None));
    };
    let controls = UrlControls::from_url(&url);
    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned());
    Ok((controls, page))
}

fn parse_page(page: Option<&str>) -> Result<PageKind, Response> {
    match page {
        None => Ok(PageKind::Map),
        Some(raw) => raw.parse().map_err(|_| {
            error_response(
                StatusCode::BAD_REQUEST,
                "invalid_page",
                &format!(
                    "Unknown page; expected one of: {}",
                    PageKind::ALL.map(PageKind::as_str).join(", ")
                ),
            )
        }),
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "layers": state.catalog.len(),
    }))
}

async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "count": state.catalog.len(),
        "maps": state.catalog.entries,
        "domains": state.domains.as_ref(),
    }))
}

async fn options_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let (controls, page) = match read_query(query.as_deref()) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    let page = match parse_page(page.as_deref()) {
        Ok(page) => page,
        Err(response) => return response,
    };

    let controller = state.controller(page, &controls);
    Json(serde_json::json!({
        "page": page,
        "selection": controller.selection(),
        "options": controller.options(),
        "query": controller.url_controls().to_query_string(),
    }))
    .into_response()
}

async fn layer_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let (controls, page) = match read_query(query.as_deref()) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    let page = match parse_page(page.as_deref()) {
        Ok(page) => page,
        Err(response) => return response,
    };

    let controller = state.controller(page, &controls);
    Json(serde_json::json!({
        "selection": controller.selection(),
        "query": controller.url_controls().to_query_string(),
        "layer": controller.current_layer(),
    }))
    .into_response()
}

async fn grid_handler(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let (controls, _) = match read_query(query.as_deref()) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    let page = match parse_page(Some(page.as_str())) {
        Ok(page) => page,
        Err(response) => return response,
    };

    let controller = state.controller(page, &controls);
    let grid = controller.grid();
    Json(serde_json::json!({
        "selection": controller.selection(),
        "query": controller.url_controls().to_query_string(),
        "matched": grid.matched(),
        "grid": grid,
    }))
    .into_response()
}
