use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use crate::workflows::applications::{
    document_router, ApplicationDocumentGenerator, ApplicationRepository,
};

pub(crate) fn with_document_routes<R>(
    generator: Arc<ApplicationDocumentGenerator<R>>,
    base_path: String,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
{
    document_router(generator, base_path)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentConfig;
    use crate::workflows::applications::documents::{
        ConversionError, PdfConverter, PdfDocument, PdfOptions, RenderError, TemplateCatalog,
        ViewRenderer,
    };
    use crate::workflows::applications::documents::views::ApplicationView;
    use crate::workflows::applications::InMemoryApplicationRepository;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    struct EchoRenderer;

    impl ViewRenderer for EchoRenderer {
        fn render_from_path(
            &self,
            path: &str,
            view: &ApplicationView,
        ) -> Result<String, RenderError> {
            Ok(format!("{path}:{}", view.applicant().reference_number))
        }
    }

    struct EchoConverter;

    impl PdfConverter for EchoConverter {
        fn convert(
            &self,
            html: &str,
            _options: &PdfOptions,
        ) -> Result<PdfDocument, ConversionError> {
            Ok(PdfDocument::new(html.as_bytes().to_vec()))
        }
    }

    fn app(ready: bool) -> axum::Router {
        let config = DocumentConfig::default();
        let generator = Arc::new(ApplicationDocumentGenerator::new(
            Arc::new(InMemoryApplicationRepository::default()),
            Box::new(TemplateCatalog::from_config(&config.templates)),
            Box::new(EchoRenderer),
            Box::new(EchoConverter),
            config,
        ));
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        };
        with_document_routes(generator, "templates".to_string()).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = get(app(true), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        assert_eq!(get(app(true), "/ready").await.status(), StatusCode::OK);
        assert_eq!(
            get(app(false), "/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn metrics_uses_prometheus_text_format() {
        let response = get(app(true), "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn document_routes_are_mounted() {
        let response = get(
            app(true),
            "/api/v1/applications/6f1c1d0e-8a6b-4c1e-9a53-2f4f0b7a1c11/document",
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
