use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use livelum_core::error::{require_company, require_positive_number, require_text};
use livelum_core::{CompanyId, CompanyScoped, DomainError, DomainResult, Entity, Sequenced, bump_timestamp};

livelum_core::entity_id!(StakeholderId);

/// Whether the stakeholder sits inside or outside the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StakeholderType {
    Internal,
    External,
}

impl StakeholderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StakeholderType::Internal => "INTERNAL",
            StakeholderType::External => "EXTERNAL",
        }
    }
}

impl core::str::FromStr for StakeholderType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INTERNAL" => Ok(StakeholderType::Internal),
            "EXTERNAL" => Ok(StakeholderType::External),
            other => Err(DomainError::validation(format!("Tipo inválido: {other}"))),
        }
    }
}

/// Stored/returned shape. Keys keep the Spanish names the frontend uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderRecord {
    pub id: StakeholderId,
    #[serde(rename = "numero")]
    pub number: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: StakeholderType,
    #[serde(rename = "requisitos")]
    pub requirements: String,
    #[serde(rename = "metodoEvaluacion")]
    pub evaluation_method: String,
    #[serde(rename = "companyId")]
    pub company_id: CompanyId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStakeholder {
    pub number: u32,
    pub name: String,
    pub kind: StakeholderType,
    pub requirements: String,
    pub evaluation_method: String,
    pub company_id: CompanyId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeholderPatch {
    pub name: Option<String>,
    pub kind: Option<StakeholderType>,
    pub requirements: Option<String>,
    pub evaluation_method: Option<String>,
}

/// Entity: Stakeholder (interested party).
///
/// Only the name, number and company are checked; requirements and the
/// evaluation method are free text and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stakeholder {
    id: StakeholderId,
    number: u32,
    name: String,
    kind: StakeholderType,
    requirements: String,
    evaluation_method: String,
    company_id: CompanyId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Stakeholder {
    pub fn create(new: NewStakeholder, now: DateTime<Utc>) -> DomainResult<Self> {
        let stakeholder = Self {
            id: StakeholderId::new(),
            number: new.number,
            name: new.name.trim().to_string(),
            kind: new.kind,
            requirements: free_text(&new.requirements),
            evaluation_method: free_text(&new.evaluation_method),
            company_id: new.company_id,
            created_at: now,
            updated_at: now,
        };
        stakeholder.validate()?;
        Ok(stakeholder)
    }

    /// Rehydrate a stored record. Stored rows are trusted as-is.
    pub fn from_primitives(record: StakeholderRecord) -> Self {
        Self {
            id: record.id,
            number: record.number,
            name: record.name,
            kind: record.kind,
            requirements: record.requirements,
            evaluation_method: record.evaluation_method,
            company_id: record.company_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn to_primitives(&self) -> StakeholderRecord {
        StakeholderRecord {
            id: self.id,
            number: self.number,
            name: self.name.clone(),
            kind: self.kind,
            requirements: self.requirements.clone(),
            evaluation_method: self.evaluation_method.clone(),
            company_id: self.company_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn update(&mut self, patch: StakeholderPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(kind) = patch.kind {
            next.kind = kind;
        }
        if let Some(requirements) = patch.requirements {
            next.requirements = free_text(&requirements);
        }
        if let Some(method) = patch.evaluation_method {
            next.evaluation_method = free_text(&method);
        }
        next.validate()?;
        next.updated_at = bump_timestamp(self.updated_at, now);
        *self = next;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StakeholderType {
        self.kind
    }

    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    pub fn evaluation_method(&self) -> &str {
        &self.evaluation_method
    }

    pub fn is_internal(&self) -> bool {
        self.kind == StakeholderType::Internal
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> DomainResult<()> {
        require_text(&self.name, "El nombre de la parte interesada es requerido")?;
        require_positive_number(self.number, "El número debe ser mayor a 0")?;
        require_company(self.company_id, "La empresa es requerida")
    }
}

impl Entity for Stakeholder {
    type Id = StakeholderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CompanyScoped for Stakeholder {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }
}

impl Sequenced for Stakeholder {
    fn number(&self) -> u32 {
        self.number
    }
}

/// Free text is stored trimmed; blank means empty.
fn free_text(value: &str) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_stakeholder(name: &str) -> NewStakeholder {
        NewStakeholder {
            number: 1,
            name: name.to_string(),
            kind: StakeholderType::External,
            requirements: String::new(),
            evaluation_method: String::new(),
            company_id: CompanyId::new(),
        }
    }

    #[test]
    fn create_allows_empty_free_text() {
        let s = Stakeholder::create(new_stakeholder("Clientes"), Utc::now()).unwrap();
        assert_eq!(s.requirements(), "");
        assert!(!s.is_internal());
    }

    #[test]
    fn create_requires_name() {
        assert!(Stakeholder::create(new_stakeholder(" "), Utc::now()).is_err());
    }

    #[test]
    fn update_switches_type() {
        let mut s = Stakeholder::create(new_stakeholder("Empleados"), Utc::now()).unwrap();
        let before = s.updated_at();
        s.update(
            StakeholderPatch {
                kind: Some(StakeholderType::Internal),
                requirements: Some("Capacitación anual".into()),
                ..Default::default()
            },
            before,
        )
        .unwrap();
        assert!(s.is_internal());
        assert_eq!(s.requirements(), "Capacitación anual");
        assert!(s.updated_at() > before);
    }

    #[test]
    fn wire_keys_are_spanish() {
        let record = Stakeholder::create(new_stakeholder("Proveedores"), Utc::now())
            .unwrap()
            .to_primitives();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["numero"], 1);
        assert_eq!(json["nombre"], "Proveedores");
        assert_eq!(json["tipo"], "EXTERNAL");
        assert!(json.get("metodoEvaluacion").is_some());
    }

    #[test]
    fn free_text_is_trimmed_on_create_and_update() {
        let mut new = new_stakeholder("Clientes");
        new.requirements = " ISO 9001 ".into();
        new.evaluation_method = "  ".into();
        let mut s = Stakeholder::create(new, Utc::now()).unwrap();
        assert_eq!(s.requirements(), "ISO 9001");
        assert_eq!(s.evaluation_method(), "");

        s.update(
            StakeholderPatch {
                requirements: Some(" Entrega a tiempo ".into()),
                evaluation_method: Some(" Encuesta ".into()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(s.requirements(), "Entrega a tiempo");
        assert_eq!(s.evaluation_method(), "Encuesta");
    }
}
