use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{DocumentConfig, StorageConfig};
use crate::workflows::applications::documents::{
    TeraViewRenderer, TemplateCatalog, WkhtmltopdfConverter,
};
use crate::workflows::applications::{
    ApplicationDocumentGenerator, JsonApplicationRepository, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the production collaborators around a repository.
pub(crate) fn document_generator(
    repository: Arc<JsonApplicationRepository>,
    config: &DocumentConfig,
) -> ApplicationDocumentGenerator<JsonApplicationRepository> {
    ApplicationDocumentGenerator::new(
        repository,
        Box::new(TemplateCatalog::from_config(&config.templates)),
        Box::new(TeraViewRenderer::new()),
        Box::new(WkhtmltopdfConverter::new(config.converter_binary.clone())),
        config.clone(),
    )
}

pub(crate) fn load_repository(path: &Path) -> Result<JsonApplicationRepository, RepositoryError> {
    let repository = JsonApplicationRepository::from_path(path)?;
    info!(path = %path.display(), applications = repository.len(), "loaded application store");
    Ok(repository)
}

/// The configured store, or an empty one when no data file is set.
pub(crate) fn configured_repository(
    storage: &StorageConfig,
) -> Result<JsonApplicationRepository, RepositoryError> {
    match &storage.applications_path {
        Some(path) => load_repository(path),
        None => {
            warn!("APP_APPLICATIONS_PATH is not set; serving an empty application store");
            Ok(JsonApplicationRepository::default())
        }
    }
}
