//! Financial product applications and the status documents generated for them.

pub mod documents;
pub mod domain;
pub mod repository;
pub mod router;

#[cfg(test)]
mod tests;

pub use documents::{ApplicationDocumentGenerator, DocumentError, GeneratedDocument};
pub use domain::{
    Application, ApplicationId, ApplicationState, Fund, LegalEntity, Person, Product, Review,
};
pub use repository::{
    ApplicationRepository, InMemoryApplicationRepository, JsonApplicationRepository,
    RepositoryError,
};
pub use router::document_router;
