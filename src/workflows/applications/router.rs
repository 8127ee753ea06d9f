use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use super::documents::{ApplicationDocumentGenerator, DocumentError};
use super::domain::ApplicationId;
use super::repository::ApplicationRepository;
use crate::error::AppError;

/// Shared state for the document endpoints.
pub struct DocumentRouterState<R> {
    generator: Arc<ApplicationDocumentGenerator<R>>,
    base_path: Arc<str>,
}

impl<R> Clone for DocumentRouterState<R> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            base_path: Arc::clone(&self.base_path),
        }
    }
}

/// Router builder exposing document download and HTML preview endpoints.
pub fn document_router<R>(
    generator: Arc<ApplicationDocumentGenerator<R>>,
    base_path: impl Into<String>,
) -> Router
where
    R: ApplicationRepository + 'static,
{
    let base_path: String = base_path.into();
    let state = DocumentRouterState {
        generator,
        base_path: Arc::from(base_path),
    };

    Router::new()
        .route(
            "/api/v1/applications/:application_id/document",
            get(document_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/preview",
            get(preview_handler::<R>),
        )
        .with_state(state)
}

pub(crate) async fn document_handler<R>(
    State(state): State<DocumentRouterState<R>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = match parse_application_id(&application_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let generator = Arc::clone(&state.generator);
    let base_path = Arc::clone(&state.base_path);
    let outcome =
        tokio::task::spawn_blocking(move || generator.generate(&id, &base_path)).await;

    match outcome {
        Ok(Ok(document)) => {
            let disposition = format!("attachment; filename=\"{}\"", document.filename());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                document.into_bytes(),
            )
                .into_response()
        }
        Ok(Err(err)) => document_error_response(err),
        Err(join_error) => {
            error!(%join_error, "document generation task failed");
            let payload = json!({ "error": "document generation failed" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn preview_handler<R>(
    State(state): State<DocumentRouterState<R>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = match parse_application_id(&application_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let generator = Arc::clone(&state.generator);
    let base_path = Arc::clone(&state.base_path);
    let outcome = tokio::task::spawn_blocking(move || generator.render(&id, &base_path)).await;

    match outcome {
        Ok(Ok(rendered)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime::TEXT_HTML_UTF_8.to_string())],
            rendered.html,
        )
            .into_response(),
        Ok(Err(err)) => document_error_response(err),
        Err(join_error) => {
            error!(%join_error, "document preview task failed");
            let payload = json!({ "error": "document preview failed" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn parse_application_id(raw: &str) -> Result<ApplicationId, Response> {
    match Uuid::parse_str(raw) {
        Ok(uuid) if !uuid.is_nil() => Ok(ApplicationId(uuid)),
        Ok(_) => Err(bad_request(DocumentError::MissingApplicationId.to_string())),
        Err(_) => Err(bad_request(format!(
            "'{raw}' is not a valid application id"
        ))),
    }
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

pub(crate) fn document_error_response(err: DocumentError) -> Response {
    if matches!(
        err,
        DocumentError::Repository(_)
            | DocumentError::TemplatePath(_)
            | DocumentError::Render(_)
            | DocumentError::Conversion(_)
    ) {
        error!(error = %err, "document generation failed");
    }
    AppError::from(err).into_response()
}
