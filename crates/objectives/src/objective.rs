use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use livelum_core::criteria::normalize_text;
use livelum_core::error::{require_company, require_positive_number, require_text};
use livelum_core::{CompanyId, CompanyScoped, DomainError, DomainResult, Entity, Sequenced, bump_timestamp};

livelum_core::entity_id!(ObjectiveId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveStatus {
    Planned,
    InProgress,
    Achieved,
    Cancelled,
}

impl ObjectiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveStatus::Planned => "PLANNED",
            ObjectiveStatus::InProgress => "IN_PROGRESS",
            ObjectiveStatus::Achieved => "ACHIEVED",
            ObjectiveStatus::Cancelled => "CANCELLED",
        }
    }
}

impl core::str::FromStr for ObjectiveStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(ObjectiveStatus::Planned),
            "IN_PROGRESS" => Ok(ObjectiveStatus::InProgress),
            "ACHIEVED" => Ok(ObjectiveStatus::Achieved),
            "CANCELLED" => Ok(ObjectiveStatus::Cancelled),
            other => Err(DomainError::validation(format!("Estado inválido: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveRecord {
    pub id: ObjectiveId,
    pub number: u32,
    pub title: String,
    pub description: Option<String>,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ObjectiveStatus,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewObjective {
    pub number: u32,
    pub title: String,
    pub description: Option<String>,
    pub target_value: f64,
    /// Defaults to 0.
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub company_id: CompanyId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectivePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Entity: measurable objective with a target value.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    id: ObjectiveId,
    number: u32,
    title: String,
    description: Option<String>,
    target_value: f64,
    current_value: f64,
    unit: Option<String>,
    due_date: Option<NaiveDate>,
    status: ObjectiveStatus,
    company_id: CompanyId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Objective {
    pub fn create(new: NewObjective, now: DateTime<Utc>) -> DomainResult<Self> {
        let objective = Self {
            id: ObjectiveId::new(),
            number: new.number,
            title: new.title.trim().to_string(),
            description: normalize_text(new.description),
            target_value: new.target_value,
            current_value: new.current_value.unwrap_or(0.0),
            unit: normalize_text(new.unit),
            due_date: new.due_date,
            status: ObjectiveStatus::Planned,
            company_id: new.company_id,
            created_at: now,
            updated_at: now,
        };
        objective.validate()?;
        Ok(objective)
    }

    pub fn from_primitives(record: ObjectiveRecord) -> DomainResult<Self> {
        let objective = Self {
            id: record.id,
            number: record.number,
            title: record.title,
            description: record.description,
            target_value: record.target_value,
            current_value: record.current_value,
            unit: record.unit,
            due_date: record.due_date,
            status: record.status,
            company_id: record.company_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        objective.validate()?;
        Ok(objective)
    }

    pub fn to_primitives(&self) -> ObjectiveRecord {
        ObjectiveRecord {
            id: self.id,
            number: self.number,
            title: self.title.clone(),
            description: self.description.clone(),
            target_value: self.target_value,
            current_value: self.current_value,
            unit: self.unit.clone(),
            due_date: self.due_date,
            status: self.status,
            company_id: self.company_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn update(&mut self, patch: ObjectivePatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            next.description = normalize_text(Some(description));
        }
        if let Some(target) = patch.target_value {
            next.target_value = target;
        }
        if let Some(current) = patch.current_value {
            next.current_value = current;
        }
        if let Some(unit) = patch.unit {
            next.unit = normalize_text(Some(unit));
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = Some(due_date);
        }
        next.validate()?;
        next.updated_at = bump_timestamp(self.updated_at, now);
        *self = next;
        Ok(())
    }

    pub fn set_status(&mut self, status: ObjectiveStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = bump_timestamp(self.updated_at, now);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Completion percentage, capped at 100 and rounded to two decimals.
    pub fn progress(&self) -> f64 {
        let pct = (self.current_value / self.target_value * 100.0).min(100.0);
        (pct * 100.0).round() / 100.0
    }

    pub fn status(&self) -> ObjectiveStatus {
        self.status
    }

    pub fn is_achieved(&self) -> bool {
        self.status == ObjectiveStatus::Achieved
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> DomainResult<()> {
        require_text(&self.title, "El título del objetivo es requerido")?;
        if !(self.target_value.is_finite() && self.target_value > 0.0) {
            return Err(DomainError::validation("La meta debe ser mayor a 0"));
        }
        if !(self.current_value.is_finite() && self.current_value >= 0.0) {
            return Err(DomainError::validation("El valor actual no puede ser negativo"));
        }
        require_positive_number(self.number, "El número debe ser mayor a 0")?;
        require_company(self.company_id, "La empresa es requerida")
    }
}

impl Entity for Objective {
    type Id = ObjectiveId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CompanyScoped for Objective {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }
}

impl Sequenced for Objective {
    fn number(&self) -> u32 {
        self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_objective(target: f64, current: Option<f64>) -> NewObjective {
        NewObjective {
            number: 1,
            title: "Reducir reclamos".into(),
            description: None,
            target_value: target,
            current_value: current,
            unit: Some("%".into()),
            due_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            company_id: CompanyId::new(),
        }
    }

    #[test]
    fn progress_is_rounded_and_capped() {
        let o = Objective::create(new_objective(3.0, Some(1.0)), Utc::now()).unwrap();
        assert_eq!(o.progress(), 33.33);

        let over = Objective::create(new_objective(10.0, Some(25.0)), Utc::now()).unwrap();
        assert_eq!(over.progress(), 100.0);
    }

    #[test]
    fn create_defaults_current_to_zero_and_planned() {
        let o = Objective::create(new_objective(50.0, None), Utc::now()).unwrap();
        assert_eq!(o.current_value(), 0.0);
        assert_eq!(o.status(), ObjectiveStatus::Planned);
    }

    #[test]
    fn target_must_be_positive() {
        assert!(Objective::create(new_objective(0.0, None), Utc::now()).is_err());
        assert!(Objective::create(new_objective(f64::NAN, None), Utc::now()).is_err());
    }

    #[test]
    fn negative_current_rejected_on_update() {
        let mut o = Objective::create(new_objective(10.0, None), Utc::now()).unwrap();
        assert!(o
            .update(ObjectivePatch { current_value: Some(-1.0), ..Default::default() }, Utc::now())
            .is_err());
        assert_eq!(o.current_value(), 0.0);
    }

    #[test]
    fn record_serializes_due_date_as_plain_date() {
        let record = Objective::create(new_objective(20.0, Some(5.0)), Utc::now())
            .unwrap()
            .to_primitives();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dueDate"], "2026-12-31");
        assert_eq!(json["targetValue"], 20.0);
        assert_eq!(json["status"], "PLANNED");

        let back: ObjectiveRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: progress always stays within 0..=100.
            #[test]
            fn progress_is_bounded(target in 0.01f64..1.0e6, current in 0.0f64..1.0e7) {
                let o = Objective::create(new_objective(target, Some(current)), Utc::now()).unwrap();
                prop_assert!((0.0..=100.0).contains(&o.progress()));
            }
        }
    }
}
