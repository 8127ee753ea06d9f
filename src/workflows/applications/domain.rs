use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for stored applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub Uuid);

impl ApplicationId {
    /// The nil UUID is treated as "no identifier supplied".
    pub fn is_absent(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ApplicationId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Lifecycle status of an application as recorded by the onboarding system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    Pending,
    Activated,
    InReview,
    Closed,
    Declined,
}

impl ApplicationState {
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Activated => "Activated",
            Self::InReview => "In Review",
            Self::Closed => "Closed",
            Self::Declined => "Declined",
        }
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub surname: String,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Company or trust the application is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub name: String,
    pub registration_number: String,
}

/// A single fund holding inside a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub fees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub funds: Vec<Fund>,
}

/// Review opened against an application, e.g. by the FICA or fraud desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub opened_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub reference_number: String,
    pub state: ApplicationState,
    pub person: Person,
    #[serde(default)]
    pub is_legal_entity: bool,
    #[serde(default)]
    pub legal_entity: Option<LegalEntity>,
    #[serde(default)]
    pub products: Vec<Product>,
    pub applied_on: NaiveDate,
    #[serde(default)]
    pub current_review: Option<Review>,
}

impl Application {
    /// Every fund across all products, in product order.
    pub fn portfolio_funds(&self) -> impl Iterator<Item = &Fund> {
        self.products.iter().flat_map(|product| product.funds.iter())
    }

    /// The legal entity, only when the application is flagged as made by one.
    pub fn effective_legal_entity(&self) -> Option<&LegalEntity> {
        if self.is_legal_entity {
            self.legal_entity.as_ref()
        } else {
            None
        }
    }
}
