use axum::extract::MatchedPath;
use axum::http::{HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use tracing::{info, warn};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// A per-request trace identifier used for support and debugging.
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/// Injects a trace id into request extensions and response headers.
pub async fn trace_id_middleware(req: Request<axum::body::Body>, next: Next) -> Response {
    // Step 1: Reuse a client-provided id or generate a new one.
    let trace_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let trace_id = TraceId(trace_id);

    // Step 2: Attach the trace id to the request for downstream handlers.
    let mut req = req;
    req.extensions_mut().insert(trace_id.clone());

    // Step 3: Run the request.
    let mut response = next.run(req).await;

    // Step 4: Echo the trace id on the response.
    if let Ok(value) = HeaderValue::from_str(&trace_id.0) {
        response
            .headers_mut()
            .insert(header::HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response.extensions_mut().insert(trace_id);

    response
}

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Emits a structured request log plus request metrics labelled by route template.
pub async fn request_log_middleware(req: Request<axum::body::Body>, next: Next) -> Response {
    // Step 1: Capture request metadata and start the timer.
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    // Templates (`/jobs/:job_id`) keep the label set bounded.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let trace_id = req.extensions().get::<TraceId>().map(|t| t.0.clone());
    let start = std::time::Instant::now();

    // Step 2: Run the request.
    let response = next.run(req).await;

    // Step 3: Record metrics and emit the log entry.
    let latency_ms = start.elapsed().as_millis() as u64;
    let status_code = response.status().as_u16();
    let status_label = status_class(status_code);
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "route" => route.clone(),
        "status" => status_label
    )
    .increment(1);
    histogram!(
        "http_request_duration_ms",
        "method" => method.to_string(),
        "route" => route.clone(),
        "status" => status_label
    )
    .record(latency_ms as f64);

    if status_code >= 500 {
        warn!(
            trace_id = trace_id.as_deref().unwrap_or(""),
            method = %method,
            path = %path,
            route = %route,
            status = status_code,
            latency_ms,
            "http_request"
        );
    } else {
        info!(
            trace_id = trace_id.as_deref().unwrap_or(""),
            method = %method,
            path = %path,
            route = %route,
            status = status_code,
            latency_ms,
            "http_request"
        );
    }

    response
}
