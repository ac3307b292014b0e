//! HTTP server for the extraction API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/extract`    | Extract from a JSON grid body        |
//! | POST   | `/api/upload`     | Upload a JSON/CSV export             |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::Multipart,
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{error_response, ExtractRequest, ExtractResponse};
use crate::error::{ExtractError, ServerError, ServerResult};
use crate::parser::parse_json_value;
use crate::transform::dialect::DialectKind;
use crate::transform::pipeline::{extract_bytes, extract_grid, ExtractOptions};

type ApiError = (StatusCode, Json<Value>);

/// Start the HTTP server
pub async fn start_server(port: u16) -> ServerResult<()> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let app = router().layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Tourney ingest server running on http://localhost:{}", port);
    println!("   POST /api/extract - Extract from JSON grid");
    println!("   POST /api/upload  - Upload grid file");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router() -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/extract", post(extract_json))
        .route("/api/upload", post(upload_grid))
        .route("/api/logs", get(sse_logs))
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "tourney-ingest",
        "version": env!("CARGO_PKG_VERSION"),
        "dialects": DialectKind::ALL.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
        "endpoints": {
            "extract": "POST /api/extract",
            "upload": "POST /api/upload",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Extract from a JSON body `{ grid, dialect? }`
async fn extract_json(
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let options = options_for(request.dialect.as_deref()).map_err(reject)?;
    let grid = parse_json_value(request.grid)
        .map_err(|e| reject(ServerError::BadRequest(format!("Invalid grid: {}", e))))?;

    let result = extract_grid(&grid, &options).map_err(|e| reject(e.into()))?;
    Ok(Json(ExtractResponse::from(result)))
}

/// Upload endpoint: multipart `file` plus optional `dialect` field
async fn upload_grid(mut multipart: Multipart) -> Result<Json<ExtractResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut dialect: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject(ServerError::BadRequest(format!("Multipart error: {}", e))))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| reject(ServerError::BadRequest(format!("Read error: {}", e))))?;
                file_data = Some(bytes.to_vec());
            }
            "dialect" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| reject(ServerError::BadRequest(format!("Read error: {}", e))))?;
                dialect = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let bytes = file_data
        .ok_or_else(|| reject(ServerError::BadRequest("No file provided".into())))?;

    println!("\n{}", "=".repeat(70));
    println!(
        "📄 NEW UPLOAD: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    );
    println!("{}\n", "=".repeat(70));

    let mut options = options_for(dialect.as_deref()).map_err(reject)?;
    options.profile_name = file_name
        .as_deref()
        .and_then(|n| std::path::Path::new(n).file_stem())
        .and_then(|s| s.to_str())
        .map(String::from);

    let result = extract_bytes(&bytes, &options).map_err(|e| reject(e.into()))?;

    println!("\n{}", "=".repeat(70));
    println!("📊 SUMMARY");
    println!("{}", "=".repeat(70));
    println!("   Dialect:        {}", result.dialect);
    println!("   Matches:        {}", result.tournament.matches.len());
    println!("   Duplicates:     {}", result.duplicates_dropped);
    println!("   Problems:       {}", result.validation_errors.len());
    if let Some(ref pid) = result.profile_id {
        println!("   Profile ID:     {}", pid);
    }
    println!("{}\n", "=".repeat(70));

    Ok(Json(ExtractResponse::from(result)))
}

fn options_for(dialect: Option<&str>) -> ServerResult<ExtractOptions> {
    let dialect = dialect
        .map(|d| d.parse::<DialectKind>())
        .transpose()
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    Ok(ExtractOptions {
        dialect,
        ..ExtractOptions::default()
    })
}

fn status_for(err: &ServerError) -> StatusCode {
    match err {
        ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ServerError::Extract(ExtractError::UnknownDialect(_)) => StatusCode::BAD_REQUEST,
        ServerError::Extract(e) if e.is_structural() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ServerError) -> ApiError {
    log_error(err.to_string());
    (status_for(&err), Json(error_response(&err.to_string())))
}
