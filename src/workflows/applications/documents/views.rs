//! View models handed to the document templates.
//!
//! Each application state that can produce a document has its own view. Shared
//! field groups are flattened so templates see a single flat object.

use chrono::NaiveDate;
use serde::Serialize;

use super::templates::TemplateKind;
use crate::config::DocumentConfig;
use crate::workflows::applications::domain::{
    Application, ApplicationState, Fund, LegalEntity, Review,
};

const REVIEW_MESSAGE_PREFIX: &str = "Your application has been placed in review";
const ADDRESS_REVIEW_SUFFIX: &str =
    " pending outstanding address verification for FICA purposes.";
const BANK_REVIEW_SUFFIX: &str = " pending outstanding bank account verification.";
const SUSPICIOUS_REVIEW_SUFFIX: &str =
    " because of suspicious account behaviour. Please contact support ASAP.";

/// Fields every application document carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantSummary {
    pub reference_number: String,
    pub state: &'static str,
    pub full_name: String,
    pub applied_on: NaiveDate,
    pub support_email: String,
    pub signature: String,
}

impl ApplicantSummary {
    fn new(application: &Application, config: &DocumentConfig) -> Self {
        Self {
            reference_number: application.reference_number.clone(),
            state: application.state.description(),
            full_name: application.person.full_name(),
            applied_on: application.applied_on,
            support_email: config.support_email.clone(),
            signature: config.signature.clone(),
        }
    }
}

/// Holdings section shared by activated and in-review documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub legal_entity: Option<LegalEntity>,
    pub portfolio_funds: Vec<Fund>,
    pub portfolio_total_amount: f64,
}

impl PortfolioSummary {
    fn new(application: &Application, config: &DocumentConfig) -> Self {
        Self {
            legal_entity: application.effective_legal_entity().cloned(),
            portfolio_funds: application.portfolio_funds().cloned().collect(),
            portfolio_total_amount: portfolio_total(application, config.tax_rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingApplicationView {
    #[serde(flatten)]
    pub applicant: ApplicantSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivatedApplicationView {
    #[serde(flatten)]
    pub applicant: ApplicantSummary,
    #[serde(flatten)]
    pub portfolio: PortfolioSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InReviewApplicationView {
    #[serde(flatten)]
    pub applicant: ApplicantSummary,
    #[serde(flatten)]
    pub portfolio: PortfolioSummary,
    pub in_review_message: String,
    pub in_review_information: Option<Review>,
}

/// The view selected for an application's current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApplicationView {
    Pending(PendingApplicationView),
    Activated(ActivatedApplicationView),
    InReview(InReviewApplicationView),
}

impl ApplicationView {
    /// Build the view for the application's state, or `None` when the state has no document.
    pub fn from_application(application: &Application, config: &DocumentConfig) -> Option<Self> {
        let applicant = ApplicantSummary::new(application, config);

        match application.state {
            ApplicationState::Pending => Some(Self::Pending(PendingApplicationView { applicant })),
            ApplicationState::Activated => Some(Self::Activated(ActivatedApplicationView {
                applicant,
                portfolio: PortfolioSummary::new(application, config),
            })),
            ApplicationState::InReview => {
                let review = application.current_review.clone();
                let reason = review.as_ref().and_then(|review| review.reason.as_deref());
                Some(Self::InReview(InReviewApplicationView {
                    applicant,
                    portfolio: PortfolioSummary::new(application, config),
                    in_review_message: review_message(reason),
                    in_review_information: review,
                }))
            }
            ApplicationState::Closed | ApplicationState::Declined => None,
        }
    }

    pub const fn template(&self) -> TemplateKind {
        match self {
            Self::Pending(_) => TemplateKind::PendingApplication,
            Self::Activated(_) => TemplateKind::ActivatedApplication,
            Self::InReview(_) => TemplateKind::InReviewApplication,
        }
    }

    pub fn applicant(&self) -> &ApplicantSummary {
        match self {
            Self::Pending(view) => &view.applicant,
            Self::Activated(view) => &view.applicant,
            Self::InReview(view) => &view.applicant,
        }
    }
}

/// Sum of `(amount - fees) * tax_rate` over every fund in every product.
pub fn portfolio_total(application: &Application, tax_rate: f64) -> f64 {
    application
        .portfolio_funds()
        .map(|fund| (fund.amount - fund.fees) * tax_rate)
        .sum()
}

/// Explain why an application is in review. Address checks win over bank checks.
pub fn review_message(reason: Option<&str>) -> String {
    let suffix = match reason {
        Some(reason) if reason.contains("address") => ADDRESS_REVIEW_SUFFIX,
        Some(reason) if reason.contains("bank") => BANK_REVIEW_SUFFIX,
        _ => SUSPICIOUS_REVIEW_SUFFIX,
    };
    format!("{REVIEW_MESSAGE_PREFIX}{suffix}")
}
