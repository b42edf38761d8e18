use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use livelum_core::criteria::normalize_text;
use livelum_core::error::{require_company, require_positive_number, require_text};
use livelum_core::{CompanyId, CompanyScoped, DomainError, DomainResult, Entity, Sequenced, bump_timestamp};

livelum_core::entity_id!(RiskId);

/// Valid range for probability and impact ratings.
pub const RATING_RANGE: core::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    Identified,
    Analyzed,
    Treated,
    Monitored,
    Closed,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Identified => "IDENTIFIED",
            RiskStatus::Analyzed => "ANALYZED",
            RiskStatus::Treated => "TREATED",
            RiskStatus::Monitored => "MONITORED",
            RiskStatus::Closed => "CLOSED",
        }
    }
}

impl core::str::FromStr for RiskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDENTIFIED" => Ok(RiskStatus::Identified),
            "ANALYZED" => Ok(RiskStatus::Analyzed),
            "TREATED" => Ok(RiskStatus::Treated),
            "MONITORED" => Ok(RiskStatus::Monitored),
            "CLOSED" => Ok(RiskStatus::Closed),
            other => Err(DomainError::validation(format!("Estado inválido: {other}"))),
        }
    }
}

/// Severity band derived from `probability * impact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=4 => RiskLevel::Low,
            5..=9 => RiskLevel::Medium,
            10..=16 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    /// Inclusive score range covered by this level.
    pub fn score_range(&self) -> (u8, u8) {
        match self {
            RiskLevel::Low => (1, 4),
            RiskLevel::Medium => (5, 9),
            RiskLevel::High => (10, 16),
            RiskLevel::Critical => (17, 25),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRecord {
    pub id: RiskId,
    pub number: u32,
    pub title: String,
    pub description: Option<String>,
    pub probability: u8,
    pub impact: u8,
    pub status: RiskStatus,
    pub owner_id: Option<String>,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRisk {
    pub number: u32,
    pub title: String,
    pub description: Option<String>,
    pub probability: u8,
    pub impact: u8,
    pub owner_id: Option<String>,
    pub company_id: CompanyId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub probability: Option<u8>,
    pub impact: Option<u8>,
    pub owner_id: Option<String>,
}

/// Entity: Risk (probability x impact assessment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Risk {
    id: RiskId,
    number: u32,
    title: String,
    description: Option<String>,
    probability: u8,
    impact: u8,
    status: RiskStatus,
    owner_id: Option<String>,
    company_id: CompanyId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Risk {
    pub fn create(new: NewRisk, now: DateTime<Utc>) -> DomainResult<Self> {
        let risk = Self {
            id: RiskId::new(),
            number: new.number,
            title: new.title.trim().to_string(),
            description: normalize_text(new.description),
            probability: new.probability,
            impact: new.impact,
            status: RiskStatus::Identified,
            owner_id: normalize_text(new.owner_id),
            company_id: new.company_id,
            created_at: now,
            updated_at: now,
        };
        risk.validate()?;
        Ok(risk)
    }

    pub fn from_primitives(record: RiskRecord) -> DomainResult<Self> {
        let risk = Self {
            id: record.id,
            number: record.number,
            title: record.title,
            description: record.description,
            probability: record.probability,
            impact: record.impact,
            status: record.status,
            owner_id: record.owner_id,
            company_id: record.company_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        risk.validate()?;
        Ok(risk)
    }

    pub fn to_primitives(&self) -> RiskRecord {
        RiskRecord {
            id: self.id,
            number: self.number,
            title: self.title.clone(),
            description: self.description.clone(),
            probability: self.probability,
            impact: self.impact,
            status: self.status,
            owner_id: self.owner_id.clone(),
            company_id: self.company_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn update(&mut self, patch: RiskPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            next.description = normalize_text(Some(description));
        }
        if let Some(probability) = patch.probability {
            next.probability = probability;
        }
        if let Some(impact) = patch.impact {
            next.impact = impact;
        }
        if let Some(owner_id) = patch.owner_id {
            next.owner_id = normalize_text(Some(owner_id));
        }
        next.validate()?;
        next.updated_at = bump_timestamp(self.updated_at, now);
        *self = next;
        Ok(())
    }

    pub fn set_status(&mut self, status: RiskStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = bump_timestamp(self.updated_at, now);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn probability(&self) -> u8 {
        self.probability
    }

    pub fn impact(&self) -> u8 {
        self.impact
    }

    pub fn score(&self) -> u8 {
        self.probability * self.impact
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score())
    }

    pub fn status(&self) -> RiskStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == RiskStatus::Closed
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> DomainResult<()> {
        require_text(&self.title, "El título del riesgo es requerido")?;
        if !RATING_RANGE.contains(&self.probability) {
            return Err(DomainError::validation("La probabilidad debe estar entre 1 y 5"));
        }
        if !RATING_RANGE.contains(&self.impact) {
            return Err(DomainError::validation("El impacto debe estar entre 1 y 5"));
        }
        require_positive_number(self.number, "El número debe ser mayor a 0")?;
        require_company(self.company_id, "La empresa es requerida")
    }
}

impl Entity for Risk {
    type Id = RiskId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CompanyScoped for Risk {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }
}

impl Sequenced for Risk {
    fn number(&self) -> u32 {
        self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_risk(probability: u8, impact: u8) -> NewRisk {
        NewRisk {
            number: 1,
            title: "Falla de proveedor".into(),
            description: None,
            probability,
            impact,
            owner_id: None,
            company_id: CompanyId::new(),
        }
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(RiskLevel::from_score(4), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(5), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(10), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(16), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(20), RiskLevel::Critical);
    }

    #[test]
    fn create_starts_identified_with_derived_level() {
        let risk = Risk::create(new_risk(4, 5), Utc::now()).unwrap();
        assert_eq!(risk.status(), RiskStatus::Identified);
        assert_eq!(risk.score(), 20);
        assert_eq!(risk.level(), RiskLevel::Critical);
    }

    #[test]
    fn ratings_outside_range_are_rejected() {
        assert!(Risk::create(new_risk(0, 3), Utc::now()).is_err());
        assert!(Risk::create(new_risk(3, 6), Utc::now()).is_err());
    }

    #[test]
    fn update_recomputes_level() {
        let mut risk = Risk::create(new_risk(1, 1), Utc::now()).unwrap();
        risk.update(RiskPatch { probability: Some(3), impact: Some(3), ..Default::default() }, Utc::now())
            .unwrap();
        assert_eq!(risk.level(), RiskLevel::Medium);
    }

    #[test]
    fn stored_record_with_out_of_range_rating_is_rejected() {
        let record = Risk::create(new_risk(2, 3), Utc::now()).unwrap().to_primitives();
        let mut json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "IDENTIFIED");
        assert_eq!(json["probability"], 2);

        json["impact"] = serde_json::json!(9);
        let tampered: RiskRecord = serde_json::from_value(json).unwrap();
        assert!(matches!(Risk::from_primitives(tampered), Err(DomainError::Validation(_))));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every valid rating pair yields a level whose range contains the score.
            #[test]
            fn level_range_contains_score(p in 1u8..=5, i in 1u8..=5) {
                let risk = Risk::create(new_risk(p, i), Utc::now()).unwrap();
                let (lo, hi) = risk.level().score_range();
                prop_assert!(lo <= risk.score() && risk.score() <= hi);
            }
        }
    }
}
