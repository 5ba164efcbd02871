use std::any::Any;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{field, info, info_span, Span};

use crate::state::AppState;
use crate::{auth, docs, items, system};

/// Every route plus the HTTP layers. Layers apply bottom-up: tracing sees the
/// final status, including the 500 produced for a caught panic.
pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .merge(system::router())
        .merge(auth::router())
        .merge(items::router())
        .merge(docs::router())
        .fallback(system::not_found);

    api.with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(record_response),
        )
}

fn request_span(req: &Request<Body>) -> Span {
    info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        status = field::Empty
    )
}

fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", status.as_u16());
    let latency_ms = latency.as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%status, latency_ms, "request failed");
    } else {
        tracing::info!(%status, latency_ms, "request finished");
    }
}

fn panic_response(_err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    tracing::error!("handler panicked");
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"detail":"Internal server error"}"#))
        .unwrap_or_default()
}

pub async fn serve(app: Router, state: &AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind((state.config.host.as_str(), state.config.port)).await?;
    info!(addr = %listener.local_addr()?, "itemvault listening");
    axum::serve(listener, app).await?;
    Ok(())
}
