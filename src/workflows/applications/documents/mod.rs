pub mod generator;
pub mod pdf;
pub mod render;
pub mod templates;
pub mod views;

pub use generator::{ApplicationDocumentGenerator, DocumentError, GeneratedDocument, RenderedView};
pub use pdf::{
    ConversionError, HeaderOptions, HeaderRepeat, PageNumbers, PdfConverter, PdfDocument,
    PdfOptions, WkhtmltopdfConverter, DEFAULT_HEADER_HTML,
};
pub use render::{RenderError, TeraViewRenderer, ViewRenderer};
pub use templates::{join_template_path, TemplateCatalog, TemplateKind, TemplatePathError, TemplatePathProvider};
pub use views::{
    review_message, ActivatedApplicationView, ApplicantSummary, ApplicationView,
    InReviewApplicationView, PendingApplicationView, PortfolioSummary,
};
