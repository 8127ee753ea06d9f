use std::collections::HashMap;

use serde::Serialize;

use crate::config::TemplatePaths;

/// Document templates, one per application state that can produce a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateKind {
    PendingApplication,
    ActivatedApplication,
    InReviewApplication,
}

impl TemplateKind {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::PendingApplication,
            Self::ActivatedApplication,
            Self::InReviewApplication,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PendingApplication => "PendingApplication",
            Self::ActivatedApplication => "ActivatedApplication",
            Self::InReviewApplication => "InReviewApplication",
        }
    }
}

/// Resolves a template kind to a path relative to the document base path.
pub trait TemplatePathProvider: Send + Sync {
    fn get(&self, kind: TemplateKind) -> Result<String, TemplatePathError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TemplatePathError {
    #[error("no template registered for {}", .0.name())]
    Unregistered(TemplateKind),
}

/// Path provider backed by configured template locations.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    paths: HashMap<TemplateKind, String>,
}

impl TemplateCatalog {
    pub fn from_config(config: &TemplatePaths) -> Self {
        let mut catalog = Self::default();
        catalog.register(TemplateKind::PendingApplication, &config.pending);
        catalog.register(TemplateKind::ActivatedApplication, &config.activated);
        catalog.register(TemplateKind::InReviewApplication, &config.in_review);
        catalog
    }

    pub fn register(&mut self, kind: TemplateKind, path: impl Into<String>) -> &mut Self {
        self.paths.insert(kind, path.into());
        self
    }
}

impl TemplatePathProvider for TemplateCatalog {
    fn get(&self, kind: TemplateKind) -> Result<String, TemplatePathError> {
        self.paths
            .get(&kind)
            .cloned()
            .ok_or(TemplatePathError::Unregistered(kind))
    }
}

/// Join a base path and a template path with exactly one separator.
pub fn join_template_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
