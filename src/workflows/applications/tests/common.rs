use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use crate::config::DocumentConfig;
use crate::workflows::applications::documents::{
    ApplicationDocumentGenerator, ApplicationView, ConversionError, PdfConverter, PdfDocument,
    PdfOptions, RenderError, TemplateCatalog, ViewRenderer,
};
use crate::workflows::applications::domain::{
    Application, ApplicationId, ApplicationState, Fund, LegalEntity, Person, Product, Review,
};
use crate::workflows::applications::repository::{
    ApplicationRepository, InMemoryApplicationRepository, RepositoryError,
};

pub(super) fn application_id(seed: u128) -> ApplicationId {
    ApplicationId(Uuid::from_u128(seed))
}

pub(super) fn document_config() -> DocumentConfig {
    DocumentConfig {
        support_email: "support@fund.example".to_string(),
        signature: "Client Services Team".to_string(),
        tax_rate: 0.5,
        ..DocumentConfig::default()
    }
}

pub(super) fn application(seed: u128, state: ApplicationState) -> Application {
    Application {
        id: application_id(seed),
        reference_number: format!("APP-{seed:04}"),
        state,
        person: Person {
            first_name: "Thandi".to_string(),
            surname: "Mokoena".to_string(),
        },
        is_legal_entity: false,
        legal_entity: None,
        products: vec![
            Product {
                name: "Retirement Annuity".to_string(),
                funds: vec![
                    Fund {
                        name: "Balanced Growth".to_string(),
                        amount: 1000.0,
                        fees: 100.0,
                    },
                    Fund {
                        name: "Money Market".to_string(),
                        amount: 500.0,
                        fees: 0.0,
                    },
                ],
            },
            Product {
                name: "Tax-Free Savings".to_string(),
                funds: vec![Fund {
                    name: "Global Equity".to_string(),
                    amount: 300.0,
                    fees: 50.0,
                }],
            },
        ],
        applied_on: NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date"),
        current_review: None,
    }
}

pub(super) fn legal_entity() -> LegalEntity {
    LegalEntity {
        name: "Mokoena Family Trust".to_string(),
        registration_number: "IT1234/2019".to_string(),
    }
}

pub(super) fn in_review(seed: u128, reason: Option<&str>) -> Application {
    let mut application = application(seed, ApplicationState::InReview);
    application.current_review = Some(Review {
        reason: reason.map(str::to_string),
        opened_on: NaiveDate::from_ymd_opt(2025, 4, 9),
    });
    application
}

/// Renderer that records each call and returns a deterministic body.
#[derive(Default, Clone)]
pub(super) struct RecordingRenderer {
    pub(super) calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl RecordingRenderer {
    pub(super) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().expect("renderer mutex poisoned").clone()
    }
}

impl ViewRenderer for RecordingRenderer {
    fn render_from_path(&self, path: &str, view: &ApplicationView) -> Result<String, RenderError> {
        let context = serde_json::to_value(view).expect("view serializes");
        self.calls
            .lock()
            .expect("renderer mutex poisoned")
            .push((path.to_string(), context));
        Ok(format!(
            "<html><body><p>{}</p></body></html>",
            view.applicant().reference_number
        ))
    }
}

/// Converter that records the HTML and options it receives.
#[derive(Default, Clone)]
pub(super) struct RecordingConverter {
    pub(super) calls: Arc<Mutex<Vec<(String, PdfOptions)>>>,
}

impl RecordingConverter {
    pub(super) fn calls(&self) -> Vec<(String, PdfOptions)> {
        self.calls.lock().expect("converter mutex poisoned").clone()
    }
}

impl PdfConverter for RecordingConverter {
    fn convert(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, ConversionError> {
        self.calls
            .lock()
            .expect("converter mutex poisoned")
            .push((html.to_string(), options.clone()));
        Ok(PdfDocument::new(format!("%PDF-1.4 {html}").into_bytes()))
    }
}

pub(super) struct FailingConverter;

impl PdfConverter for FailingConverter {
    fn convert(&self, _html: &str, _options: &PdfOptions) -> Result<PdfDocument, ConversionError> {
        Err(ConversionError::Empty)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn find(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct Harness {
    pub(super) generator: ApplicationDocumentGenerator<InMemoryApplicationRepository>,
    pub(super) renderer: RecordingRenderer,
    pub(super) converter: RecordingConverter,
}

pub(super) fn build_generator(applications: Vec<Application>) -> Harness {
    let config = document_config();
    let renderer = RecordingRenderer::default();
    let converter = RecordingConverter::default();
    let generator = ApplicationDocumentGenerator::new(
        Arc::new(InMemoryApplicationRepository::new(applications)),
        Box::new(TemplateCatalog::from_config(&config.templates)),
        Box::new(renderer.clone()),
        Box::new(converter.clone()),
        config,
    );
    Harness {
        generator,
        renderer,
        converter,
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
