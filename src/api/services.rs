use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use super::{
    error::ApiError,
    models::HealthResponse,
    render,
    state::AppState,
    utils::{parse_query_request, report_file_name},
};
use crate::processor::{OutputMode, ProcessOutcome, ProcessorError};

/// Landing page (GET /)
///
/// Also the target of the startup readiness probe.
pub async fn index() -> Html<&'static str> {
    render::landing_page()
}

/// Hash query endpoint (POST /process_hashes)
///
/// ## Flow:
/// 1. Read the body (size-limited); the Content-Type header is not checked
/// 2. Parse JSON and check that all required keys are present
/// 3. Normalize `hashes` into an ordered list
/// 4. Hand a request-scoped `QueryContext` and the list to the processor
/// 5. Text mode: stream the report file back as an attachment.
///    Display mode: render the records page
///
/// Errors are mapped by [`ApiError`]; processor failures surface as 501.
pub async fn process_hashes(State(state): State<AppState>, body: Body) -> Response {
    state.metrics.query_received();

    match run_query(&state, body).await {
        Ok(response) => response,
        Err(err) => {
            state.metrics.query_failed();
            err.into_response()
        }
    }
}

async fn run_query(state: &AppState, body: Body) -> Result<Response, ApiError> {
    let max_bytes = state.config.server.api.max_payload_bytes.as_usize();
    let body_bytes = read_body(body, max_bytes).await?;

    let request = parse_query_request(&body_bytes)?;
    debug!(query_tag = %request.query_tag, output = %request.output, "Received hash query");

    let hash_list = request
        .hash_list()
        .map_err(|source| ApiError::UnparseableHashList {
            payload: String::from_utf8_lossy(&body_bytes).into_owned(),
            source,
        })?;
    let ctx = request.context();

    info!(
        query_tag = %ctx.query_tag,
        hash_type = %ctx.hash_type,
        count = hash_list.len(),
        delimiter = hash_list.delimiter().map(|d| d.as_str()).unwrap_or("array"),
        "Hash list parsed"
    );
    state.metrics.hashes_submitted(hash_list.len());

    let outcome = state.processor.process(&ctx, hash_list.as_slice()).await?;

    match (ctx.output_mode, outcome) {
        (OutputMode::Text, ProcessOutcome::Report(path)) => {
            let file_name = report_file_name(&path).ok_or_else(|| {
                ProcessorError::InvalidResponse(format!(
                    "report path {} has no file name",
                    path.display()
                ))
            })?;

            // Only the file name is trusted; reports are always served from report_dir
            let resolved = state.config.output.report_dir.join(file_name);
            debug!(file_name, path = %resolved.display(), "Returning report");

            let file = File::open(&resolved).await.map_err(ProcessorError::Io)?;
            Ok(render::attachment(
                file_name,
                Body::from_stream(ReaderStream::new(file)),
            ))
        }
        (OutputMode::Display, ProcessOutcome::Records(records)) => {
            info!(query_tag = %ctx.query_tag, records = records.len(), "Rendering results page");
            let kibana_url = state.config.kibana.base_url();
            Ok(render::results_page(&ctx, &records, &kibana_url).into_response())
        }
        (mode, _) => Err(ProcessorError::InvalidResponse(format!(
            "processor returned the wrong result kind for {mode:?} output"
        ))
        .into()),
    }
}

/// Reads the request body, refusing anything above `max_bytes`
async fn read_body(body: Body, max_bytes: usize) -> Result<Bytes, ApiError> {
    match Limited::new(body, max_bytes).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => Err(ApiError::PayloadTooLarge(max_bytes)),
        Err(err) => Err(ApiError::RequestFailed(err.to_string())),
    }
}

/// Health check endpoint (GET /health)
///
/// Reports the crate version and request counters. There are no downstream
/// components to probe, so a response means healthy.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        queries: state.metrics.snapshot(),
    };

    (StatusCode::OK, Json(response))
}
