use crate::config::CorsConfig;
use crate::error::{Result, WikiError};
use crate::games::GameParams;
use crate::service::WikiService;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// HTTP front end over a [`WikiService`]
pub struct HttpServer {
    service: WikiService,
    cors: CorsConfig,
}

impl HttpServer {
    pub fn new(service: WikiService, cors: CorsConfig) -> Self {
        Self { service, cors }
    }

    /// Bind and serve until the process is stopped
    pub async fn run(&self, addr: &str) -> Result<()> {
        let app = self.create_router();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            WikiError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;
        log::info!("Listening on http://{}", addr);

        axum::serve(listener, app).await.map_err(|e| {
            WikiError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

        Ok(())
    }

    pub fn create_router(&self) -> Router {
        router(self.service.clone(), cors_layer(&self.cors))
    }
}

/// Build the CORS layer; no configured origins means any origin may read
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                log::warn!("Ignoring unparsable CORS origin: {}", o);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET])
            .allow_headers([header::CONTENT_TYPE]);
    }

    let methods: Vec<Method> = config
        .allowed_methods()
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE])
}

pub fn router(service: WikiService, cors: CorsLayer) -> Router {
    Router::new()
        .route("/locations", get(handle_locations))
        .route("/connections", get(handle_connections))
        .route("/authors", get(handle_authors))
        .route("/maps", get(handle_maps))
        .route("/vms", get(handle_vending_machines))
        .route("/images", get(handle_images))
        .route("/health", get(handle_health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(service)
}

type Params = Query<HashMap<String, String>>;

/// A required query-string value; empty counts as missing
fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> std::result::Result<&'a str, Response> {
    match params.get(name).map(String::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err((StatusCode::BAD_REQUEST, format!("{} not specified", name)).into_response()),
    }
}

fn parse_game_params(params: &HashMap<String, String>) -> std::result::Result<GameParams, Response> {
    let mut game_params = GameParams::new(required(params, "game")?);
    if let Some(protagonist) = params.get("protag") {
        game_params = game_params.with_protagonist(protagonist.as_str());
    }
    if let Some(continue_key) = params.get("continueKey") {
        game_params = game_params.with_continue_key(continue_key.as_str());
    }
    Ok(game_params)
}

fn respond<T: Serialize>(path: &str, result: Result<T>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => {
            if err.is_validation() {
                log::warn!("{} rejected: {}", path, err);
            } else {
                log::error!("{} failed: {}", path, err);
            }
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn handle_locations(State(service): State<WikiService>, Query(params): Params) -> Response {
    let game_params = match parse_game_params(&params) {
        Ok(p) => p,
        Err(response) => return response,
    };
    respond("/locations", service.locations(&game_params).await)
}

async fn handle_connections(State(service): State<WikiService>, Query(params): Params) -> Response {
    let game_params = match parse_game_params(&params) {
        Ok(p) => p,
        Err(response) => return response,
    };
    respond("/connections", service.connections(&game_params).await)
}

async fn handle_authors(State(service): State<WikiService>, Query(params): Params) -> Response {
    let game = match required(&params, "game") {
        Ok(g) => g,
        Err(response) => return response,
    };
    if !service.registry().authors_enabled(game) {
        log::warn!("/authors rejected: no authors for {}", game);
        return (StatusCode::BAD_REQUEST, "game not supported").into_response();
    }
    respond("/authors", service.authors(game).await)
}

async fn handle_maps(State(service): State<WikiService>, Query(params): Params) -> Response {
    let (game, location) = match (required(&params, "game"), required(&params, "location")) {
        (Ok(game), Ok(location)) => (game, location),
        (Err(response), _) | (_, Err(response)) => return response,
    };
    respond("/maps", service.maps(game, location).await)
}

async fn handle_vending_machines(State(service): State<WikiService>, Query(params): Params) -> Response {
    let game = match required(&params, "game") {
        Ok(g) => g,
        Err(response) => return response,
    };
    respond("/vms", service.vending_machines(game).await)
}

async fn handle_images(State(service): State<WikiService>, Query(params): Params) -> Response {
    let game_params = match parse_game_params(&params) {
        Ok(p) => p,
        Err(response) => return response,
    };
    respond("/images", service.images(&game_params).await)
}

async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
        .into_response()
}
