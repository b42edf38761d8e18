//! Unique index keys, evaluated in process by [`InMemoryRepository`].
//!
//! [`InMemoryRepository`]: super::InMemoryRepository

use livelum_companies::Company;
use livelum_core::{CompanyScoped, Sequenced};
use livelum_documents::Document;
use livelum_objectives::Objective;
use livelum_people::Person;
use livelum_risks::Risk;
use livelum_skills::Skill;
use livelum_stakeholders::Stakeholder;

use crate::db::constraints;

/// One entry of a unique index: the constraint it belongs to and the indexed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueKey {
    pub constraint: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn new(constraint: &'static str, value: impl Into<String>) -> Self {
        Self {
            constraint,
            value: value.into(),
        }
    }

    fn number<E: Sequenced>(constraint: &'static str, entity: &E) -> Self {
        Self::new(constraint, format!("{}:{}", entity.company_id(), entity.number()))
    }
}

/// Entities that participate in unique indexes.
pub trait UniqueKeys {
    fn unique_keys(&self) -> Vec<UniqueKey>;
}

impl UniqueKeys for Company {
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new(constraints::COMPANIES_TAX_ID, self.tax_id())]
    }
}

impl UniqueKeys for Person {
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::number(constraints::PEOPLE_NUMBER, self),
            UniqueKey::new(
                constraints::PEOPLE_DOCUMENTO,
                format!("{}:{}", self.company_id(), self.document()),
            ),
        ]
    }
}

impl UniqueKeys for Skill {
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::number(constraints::SKILLS_NUMBER, self)]
    }
}

impl UniqueKeys for Stakeholder {
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::number(constraints::STAKEHOLDERS_NUMBER, self)]
    }
}

impl UniqueKeys for Document {
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::number(constraints::DOCUMENTS_NUMBER, self)]
    }
}

impl UniqueKeys for Risk {
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::number(constraints::RISKS_NUMBER, self)]
    }
}

impl UniqueKeys for Objective {
    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::number(constraints::OBJECTIVES_NUMBER, self)]
    }
}
