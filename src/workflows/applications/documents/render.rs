use std::fs;
use std::path::PathBuf;

use tera::{Context, Tera};

use super::views::ApplicationView;

/// Turns a view model into HTML using the template found at `path`.
pub trait ViewRenderer: Send + Sync {
    fn render_from_path(&self, path: &str, view: &ApplicationView) -> Result<String, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unable to read template {}: {source}", .path.display())]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to build template context: {0}")]
    Context(#[source] tera::Error),
    #[error("template {path} failed to render: {source}")]
    Template {
        path: String,
        #[source]
        source: tera::Error,
    },
}

/// Renders templates from disk with Tera, autoescaping every interpolated value.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraViewRenderer;

impl TeraViewRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render an in-memory template source, used by previews and tests.
    pub fn render_source(
        &self,
        name: &str,
        source: &str,
        view: &ApplicationView,
    ) -> Result<String, RenderError> {
        let context = Context::from_serialize(view).map_err(RenderError::Context)?;
        Tera::one_off(source, &context, true).map_err(|source| RenderError::Template {
            path: name.to_string(),
            source,
        })
    }
}

impl ViewRenderer for TeraViewRenderer {
    fn render_from_path(&self, path: &str, view: &ApplicationView) -> Result<String, RenderError> {
        let source = fs::read_to_string(path).map_err(|source| RenderError::TemplateIo {
            path: PathBuf::from(path),
            source,
        })?;
        self.render_source(path, &source, view)
    }
}
