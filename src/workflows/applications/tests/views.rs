use super::common::*;
use crate::workflows::applications::documents::views::portfolio_total;
use crate::workflows::applications::documents::{review_message, ApplicationView, TemplateKind};
use crate::workflows::applications::domain::ApplicationState;

#[test]
fn pending_view_carries_applicant_and_support_details() {
    let application = application(1, ApplicationState::Pending);
    let view = ApplicationView::from_application(&application, &document_config())
        .expect("pending applications produce a document");

    assert_eq!(view.template(), TemplateKind::PendingApplication);
    let ApplicationView::Pending(pending) = &view else {
        panic!("expected pending view, got {view:?}");
    };
    assert_eq!(pending.applicant.reference_number, "APP-0001");
    assert_eq!(pending.applicant.state, "Pending");
    assert_eq!(pending.applicant.full_name, "Thandi Mokoena");
    assert_eq!(pending.applicant.applied_on, application.applied_on);
    assert_eq!(pending.applicant.support_email, "support@fund.example");
    assert_eq!(pending.applicant.signature, "Client Services Team");

    let json = serde_json::to_value(&view).expect("serializes");
    assert!(json.get("portfolio_total_amount").is_none());
    assert_eq!(json["full_name"], "Thandi Mokoena");
}

#[test]
fn activated_view_totals_net_fund_amounts_at_tax_rate() {
    let application = application(2, ApplicationState::Activated);
    let view = ApplicationView::from_application(&application, &document_config())
        .expect("activated applications produce a document");

    let ApplicationView::Activated(activated) = &view else {
        panic!("expected activated view, got {view:?}");
    };
    assert_eq!(activated.applicant.state, "Activated");
    assert_eq!(activated.portfolio.portfolio_funds.len(), 3);
    assert_eq!(
        activated
            .portfolio
            .portfolio_funds
            .iter()
            .map(|fund| fund.name.as_str())
            .collect::<Vec<_>>(),
        ["Balanced Growth", "Money Market", "Global Equity"]
    );
    // (900 + 500 + 250) * 0.5
    assert!((activated.portfolio.portfolio_total_amount - 825.0).abs() < 1e-9);
    assert!(activated.portfolio.legal_entity.is_none());
}

#[test]
fn portfolio_total_of_empty_portfolio_is_zero() {
    let mut application = application(3, ApplicationState::Activated);
    application.products.clear();
    assert_eq!(portfolio_total(&application, 1.15), 0.0);

    application.products.push(crate::workflows::applications::domain::Product {
        name: "Empty wrapper".to_string(),
        funds: Vec::new(),
    });
    assert_eq!(portfolio_total(&application, 1.15), 0.0);
}

#[test]
fn legal_entity_only_appears_when_flagged() {
    let mut application = application(4, ApplicationState::Activated);
    application.legal_entity = Some(legal_entity());

    let view = ApplicationView::from_application(&application, &document_config())
        .expect("document produced");
    let ApplicationView::Activated(activated) = view else {
        panic!("expected activated view");
    };
    assert!(
        activated.portfolio.legal_entity.is_none(),
        "entity details must be hidden unless the application is a legal entity application"
    );

    application.is_legal_entity = true;
    let view = ApplicationView::from_application(&application, &document_config())
        .expect("document produced");
    let ApplicationView::Activated(activated) = view else {
        panic!("expected activated view");
    };
    assert_eq!(activated.portfolio.legal_entity, Some(legal_entity()));
}

#[test]
fn in_review_view_explains_review_and_includes_portfolio() {
    let application = in_review(5, Some("proof of address outstanding"));
    let view = ApplicationView::from_application(&application, &document_config())
        .expect("in review applications produce a document");

    assert_eq!(view.template(), TemplateKind::InReviewApplication);
    let ApplicationView::InReview(review) = &view else {
        panic!("expected in review view, got {view:?}");
    };
    assert_eq!(review.applicant.state, "In Review");
    assert_eq!(
        review.in_review_message,
        "Your application has been placed in review pending outstanding address verification for FICA purposes."
    );
    assert_eq!(review.in_review_information, application.current_review);
    assert!((review.portfolio.portfolio_total_amount - 825.0).abs() < 1e-9);

    let json = serde_json::to_value(&view).expect("serializes");
    assert_eq!(
        json["in_review_information"]["reason"],
        "proof of address outstanding"
    );
    assert_eq!(json["reference_number"], "APP-0005");
}

#[test]
fn review_message_prefers_address_over_bank() {
    assert_eq!(
        review_message(Some("bank statement and address mismatch")),
        "Your application has been placed in review pending outstanding address verification for FICA purposes."
    );
    assert_eq!(
        review_message(Some("bank account not verified")),
        "Your application has been placed in review pending outstanding bank account verification."
    );
}

#[test]
fn review_message_falls_back_to_suspicious_behaviour() {
    let expected = "Your application has been placed in review because of suspicious account behaviour. Please contact support ASAP.";
    assert_eq!(review_message(Some("velocity of deposits")), expected);
    assert_eq!(review_message(None), expected);
    // Matching is case-sensitive.
    assert_eq!(review_message(Some("Address unverified")), expected);
}

#[test]
fn in_review_without_review_record_uses_fallback_message() {
    let application = application(6, ApplicationState::InReview);
    let view = ApplicationView::from_application(&application, &document_config())
        .expect("document produced");
    let ApplicationView::InReview(review) = view else {
        panic!("expected in review view");
    };
    assert!(review.in_review_message.contains("suspicious account behaviour"));
    assert!(review.in_review_information.is_none());
}

#[test]
fn closed_and_declined_applications_have_no_view() {
    for state in [ApplicationState::Closed, ApplicationState::Declined] {
        let application = application(7, state);
        assert!(
            ApplicationView::from_application(&application, &document_config()).is_none(),
            "{state} should not produce a document"
        );
    }
}

#[test]
fn state_descriptions_are_human_readable() {
    assert_eq!(ApplicationState::Pending.description(), "Pending");
    assert_eq!(ApplicationState::Activated.description(), "Activated");
    assert_eq!(ApplicationState::InReview.description(), "In Review");
    assert_eq!(ApplicationState::Closed.to_string(), "Closed");
}
