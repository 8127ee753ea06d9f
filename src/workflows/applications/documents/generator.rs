use std::sync::Arc;

use tracing::{info, warn};

use super::pdf::{ConversionError, PdfConverter, PdfOptions};
use super::render::{RenderError, ViewRenderer};
use super::templates::{join_template_path, TemplateKind, TemplatePathError, TemplatePathProvider};
use super::views::ApplicationView;
use crate::config::DocumentConfig;
use crate::workflows::applications::domain::{ApplicationId, ApplicationState};
use crate::workflows::applications::repository::{ApplicationRepository, RepositoryError};

/// Service composing record lookup, view selection, rendering, and conversion.
pub struct ApplicationDocumentGenerator<R> {
    repository: Arc<R>,
    templates: Box<dyn TemplatePathProvider>,
    renderer: Box<dyn ViewRenderer>,
    converter: Box<dyn PdfConverter>,
    config: DocumentConfig,
}

/// HTML produced for an application before conversion.
#[derive(Debug, Clone)]
pub struct RenderedView {
    pub application_id: ApplicationId,
    pub reference_number: String,
    pub template: TemplateKind,
    pub template_path: String,
    pub html: String,
}

/// Converted document ready for download.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub application_id: ApplicationId,
    pub reference_number: String,
    pub template: TemplateKind,
    pub bytes: Vec<u8>,
}

impl GeneratedDocument {
    /// Download name derived from the reference number, restricted to safe characters.
    pub fn filename(&self) -> String {
        let stem: String = self
            .reference_number
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let stem = stem.trim_matches('-');
        if stem.is_empty() {
            format!("application-{}.pdf", self.application_id)
        } else {
            format!("{stem}.pdf")
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl<R> ApplicationDocumentGenerator<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        templates: Box<dyn TemplatePathProvider>,
        renderer: Box<dyn ViewRenderer>,
        converter: Box<dyn PdfConverter>,
        config: DocumentConfig,
    ) -> Self {
        Self {
            repository,
            templates,
            renderer,
            converter,
            config,
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Render the state-specific template for an application without converting it.
    pub fn render(
        &self,
        application_id: &ApplicationId,
        base_path: &str,
    ) -> Result<RenderedView, DocumentError> {
        if application_id.is_absent() {
            return Err(DocumentError::MissingApplicationId);
        }
        if base_path.trim().is_empty() {
            return Err(DocumentError::MissingBasePath);
        }

        let application = match self.repository.find(application_id)? {
            Some(application) => application,
            None => {
                warn!(%application_id, "no application found");
                return Err(DocumentError::NotFound(*application_id));
            }
        };

        let view = match ApplicationView::from_application(&application, &self.config) {
            Some(view) => view,
            None => {
                warn!(
                    %application_id,
                    state = %application.state,
                    "no valid document can be generated for the application's state"
                );
                return Err(DocumentError::UnsupportedState {
                    application_id: *application_id,
                    state: application.state,
                });
            }
        };

        let template = view.template();
        let relative = self.templates.get(template)?;
        let template_path = join_template_path(base_path, &relative);
        let html = self.renderer.render_from_path(&template_path, &view)?;

        Ok(RenderedView {
            application_id: *application_id,
            reference_number: application.reference_number,
            template,
            template_path,
            html,
        })
    }

    /// Render and convert an application document.
    pub fn generate(
        &self,
        application_id: &ApplicationId,
        base_path: &str,
    ) -> Result<GeneratedDocument, DocumentError> {
        let rendered = self.render(application_id, base_path)?;
        let document = self
            .converter
            .convert(&rendered.html, &PdfOptions::application_document())?;

        info!(
            %application_id,
            template = rendered.template.name(),
            bytes = document.len(),
            "application document generated"
        );

        Ok(GeneratedDocument {
            application_id: rendered.application_id,
            reference_number: rendered.reference_number,
            template: rendered.template,
            bytes: document.into_bytes(),
        })
    }
}

/// Error raised while producing an application document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("an application id is required")]
    MissingApplicationId,
    #[error("a base path is required")]
    MissingBasePath,
    #[error("no application found for id '{0}'")]
    NotFound(ApplicationId),
    #[error("the application is in state '{state}' and no valid document can be generated for it")]
    UnsupportedState {
        application_id: ApplicationId,
        state: ApplicationState,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    TemplatePath(#[from] TemplatePathError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
