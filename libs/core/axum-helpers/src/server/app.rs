use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::middleware::security::{security_headers, trailing_slash_redirect};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Assemble the public router.
///
/// - `apis` nested under `/api`
/// - `probes` (health, readiness, metrics) at the root
/// - Swagger UI at `/swagger-ui` and Scalar at `/scalar`, both reading
///   `/api-docs/openapi.json`
/// - JSON 404 fallback
/// - request tracing, HSTS and hardening headers, trailing-slash redirect
/// - response compression unless `config.compression` is off
pub fn create_router<T>(apis: Router, probes: Router, config: &ServerConfig) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_scalar::{Scalar, Servable};
    use utoipa_swagger_ui::SwaggerUi;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .merge(probes)
        .fallback(not_found)
        .layer(middleware::from_fn(trailing_slash_redirect))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    if config.compression {
        router.layer(CompressionLayer::new())
    } else {
        info!("Response compression disabled");
        router
    }
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup` bounded by
/// `server_config.shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let coordinator = ShutdownCoordinator::new();
    let signals = coordinator.clone();
    tokio::spawn(async move { signals.listen_for_signals().await });

    serve_then_cleanup(listener, router, coordinator, server_config.shutdown_timeout, cleanup).await
}

/// Serve on `listener` until `coordinator` fires, then run `cleanup`.
///
/// `cleanup` starts only after `axum::serve` has drained every in-flight
/// request, so handlers never see the pool closed underneath them.
pub async fn serve_then_cleanup<F>(
    listener: TcpListener,
    router: Router,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let serve_gate = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { serve_gate.wait().await })
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Server error"));

    // An I/O failure of the server must still release the pool.
    coordinator.shutdown();
    info!(?shutdown_timeout, "Running cleanup");
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => warn!(?shutdown_timeout, "Cleanup timed out, forcing shutdown"),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct EmptyDoc;

    fn router(compression: bool) -> Router {
        let apis = Router::new().route("/v1/ping", get(|| async { "pong" }));
        let probes = Router::new().route("/health", get(|| async { "ok" }));
        let config = ServerConfig {
            compression,
            ..ServerConfig::default()
        };
        create_router::<EmptyDoc>(apis, probes, &config)
    }

    async fn get_status(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_api_routes_are_nested() {
        assert_eq!(get_status(router(true), "/api/v1/ping").await, StatusCode::OK);
        assert_eq!(get_status(router(true), "/v1/ping").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_probes_at_root() {
        assert_eq!(get_status(router(false), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        assert_eq!(
            get_status(router(true), "/api-docs/openapi.json").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_compression_toggle() {
        let request = || {
            Request::builder()
                .uri("/api-docs/openapi.json")
                .header("accept-encoding", "gzip")
                .body(Body::empty())
                .unwrap()
        };

        let compressed = router(true).oneshot(request()).await.unwrap();
        assert_eq!(compressed.headers()["content-encoding"], "gzip");

        let plain = router(false).oneshot(request()).await.unwrap();
        assert!(plain.headers().get("content-encoding").is_none());
    }

    #[tokio::test]
    async fn test_cleanup_waits_for_in_flight_request() {
        let started = Arc::new(Notify::new());
        let handler_done = Arc::new(AtomicBool::new(false));
        let done_before_cleanup = Arc::new(AtomicBool::new(false));

        let router = {
            let started = started.clone();
            let handler_done = handler_done.clone();
            Router::new().route(
                "/slow",
                get(move || async move {
                    started.notify_one();
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    handler_done.store(true, Ordering::SeqCst);
                    "done"
                }),
            )
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let coordinator = ShutdownCoordinator::new();

        let cleanup = {
            let handler_done = handler_done.clone();
            let done_before_cleanup = done_before_cleanup.clone();
            async move {
                done_before_cleanup.store(handler_done.load(Ordering::SeqCst), Ordering::SeqCst);
            }
        };
        let server = tokio::spawn(serve_then_cleanup(
            listener,
            router,
            coordinator.clone(),
            Duration::from_secs(5),
            cleanup,
        ));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        started.notified().await;
        coordinator.shutdown();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.ends_with("done"), "{response}");

        server.await.unwrap().unwrap();
        assert!(done_before_cleanup.load(Ordering::SeqCst));
    }
}
