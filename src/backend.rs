use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};
use url::Url;

use crate::submission::{SubmissionResponse, RENTAL_ENDPOINT};
use crate::telemetry::{log_event, set_min_level, LogLevel};
use crate::validation::{validate_rental, RentalRequest, ValidRental};

const DEFAULT_PORT: u64 = 8080;
const DEFAULT_RENTAL_BODY_MAX_BYTES: usize = 16 * 1024;
const DEFAULT_RENTAL_WEBHOOK_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const PORT_BOUNDS: (u64, u64) = (1, 65_535);
const RENTAL_BODY_MAX_BYTES_BOUNDS: (usize, usize) = (512, 1024 * 1024);
const RENTAL_WEBHOOK_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 60_000);
const USER_AGENT: &str = "pageflow-rental/1.0";
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone)]
struct ServerConfig {
    port: u16,
    body_max_bytes: usize,
    webhook_url: Option<Url>,
    webhook_timeout: Duration,
    static_dir: PathBuf,
    log_level: LogLevel,
}

impl ServerConfig {
    fn from_env() -> Self {
        let port = parse_env_u64_with_bounds("PORT", DEFAULT_PORT, PORT_BOUNDS);
        let body_max_bytes = parse_env_usize_with_bounds(
            "RENTAL_BODY_MAX_BYTES",
            DEFAULT_RENTAL_BODY_MAX_BYTES,
            RENTAL_BODY_MAX_BYTES_BOUNDS,
        );
        let webhook_timeout_ms = parse_env_u64_with_bounds(
            "RENTAL_WEBHOOK_TIMEOUT_MS",
            DEFAULT_RENTAL_WEBHOOK_TIMEOUT_MS,
            RENTAL_WEBHOOK_TIMEOUT_MS_BOUNDS,
        );
        let webhook_url = parse_env_http_url("RENTAL_WEBHOOK_URL");
        let static_dir = parse_env_non_empty_string("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let log_level = parse_log_level("LOG_LEVEL", DEFAULT_LOG_LEVEL);

        Self {
            port: u16::try_from(port).unwrap_or(8080),
            body_max_bytes,
            webhook_url,
            webhook_timeout: Duration::from_millis(webhook_timeout_ms),
            static_dir,
            log_level,
        }
    }
}

#[derive(Clone)]
struct AppState {
    client: reqwest::Client,
    config: ServerConfig,
}

impl AppState {
    fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.webhook_timeout)
            .build()?;

        Ok(Self { client, config })
    }
}

/// What the webhook receives for every accepted request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    request_id: &'a str,
    #[serde(flatten)]
    request: &'a RentalRequest,
    nights: i64,
}

fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let static_service =
        ServeDir::new(&static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route(RENTAL_ENDPOINT, post(post_rental))
        .layer(DefaultBodyLimit::max(state.config.body_max_bytes))
        .fallback_service(static_service)
        .with_state(state)
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();
    set_min_level(config.log_level);

    let port = config.port;
    let bind_address = format!("0.0.0.0:{port}");
    let state = AppState::new(config)?;

    log_event(
        LogLevel::Info,
        "server_config_loaded",
        serde_json::json!({
            "static_dir": state.config.static_dir.display().to_string(),
            "webhook_configured": state.config.webhook_url.is_some(),
            "body_max_bytes": state.config.body_max_bytes,
        }),
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        LogLevel::Info,
        "server_listening",
        serde_json::json!({ "address": format!("http://127.0.0.1:{port}") }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn post_rental(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RentalRequest>, JsonRejection>,
) -> axum::response::Response {
    let request_id = resolve_request_id(&headers);

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let status = rejection.status();
            log_event(
                LogLevel::Warn,
                "rental_request_unreadable",
                serde_json::json!({
                    "request_id": request_id,
                    "status": status.as_u16(),
                }),
            );
            return json_response(status, SubmissionResponse::rejected("invalid_body"), &request_id);
        }
    };

    let today = Utc::now().date_naive();
    let (status, payload) = handle_rental(&state, &request, today, &request_id).await;
    json_response(status, payload, &request_id)
}

async fn handle_rental(
    state: &AppState,
    request: &RentalRequest,
    today: NaiveDate,
    request_id: &str,
) -> (StatusCode, SubmissionResponse) {
    let rental = match validate_rental(request, today) {
        Ok(rental) => rental,
        Err(error) => {
            log_event(
                LogLevel::Info,
                "rental_request_invalid",
                serde_json::json!({
                    "request_id": request_id,
                    "reason": error.code(),
                }),
            );
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                SubmissionResponse::rejected(error.code()),
            );
        }
    };

    if let Some(webhook_url) = state.config.webhook_url.as_ref() {
        if let Err(message) = forward_to_webhook(&state.client, webhook_url, &rental, request_id).await {
            log_event(
                LogLevel::Warn,
                "rental_webhook_failed",
                serde_json::json!({
                    "request_id": request_id,
                    "host": webhook_url.host_str().unwrap_or("unknown"),
                    "message": message,
                }),
            );
            return (
                StatusCode::BAD_GATEWAY,
                SubmissionResponse::rejected("upstream_unavailable"),
            );
        }
    }

    log_event(
        LogLevel::Info,
        "rental_request_accepted",
        serde_json::json!({
            "request_id": request_id,
            "product": rental.request.product.as_str(),
            "nights": rental.nights(),
            "forwarded": state.config.webhook_url.is_some(),
        }),
    );
    (StatusCode::OK, SubmissionResponse::accepted())
}

async fn forward_to_webhook(
    client: &reqwest::Client,
    webhook_url: &Url,
    rental: &ValidRental,
    request_id: &str,
) -> Result<(), String> {
    let payload = WebhookPayload {
        request_id,
        request: &rental.request,
        nights: rental.nights(),
    };

    let response = client
        .post(webhook_url.clone())
        .header(REQUEST_ID_HEADER, request_id)
        .json(&payload)
        .send()
        .await
        .map_err(|error| {
            if error.is_timeout() {
                "webhook timed out".to_string()
            } else {
                error.to_string()
            }
        })?;

    response
        .error_for_status()
        .map(|_| ())
        .map_err(|error| error.to_string())
}

fn json_response(
    status: StatusCode,
    payload: SubmissionResponse,
    request_id: &str,
) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response_with_request_id(status, headers, Json(payload), request_id)
}

fn response_with_request_id(
    status: StatusCode,
    mut headers: HeaderMap,
    payload: impl IntoResponse,
    request_id: &str,
) -> axum::response::Response {
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, payload).into_response()
}

fn parse_env_u64_with_bounds(name: &str, default: u64, bounds: (u64, u64)) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_usize_with_bounds(name: &str, default: usize, bounds: (usize, usize)) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env_http_url(name: &str) -> Option<Url> {
    let value = parse_env_non_empty_string(name)?;
    let parsed = Url::parse(&value).ok()?;

    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Some(parsed)
    } else {
        None
    }
}

fn parse_log_level(name: &str, default: LogLevel) -> LogLevel {
    parse_env_non_empty_string(name)
        .and_then(|value| LogLevel::parse(&value))
        .unwrap_or(default)
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}
