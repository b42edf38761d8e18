use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use livelum_core::criteria::normalize_text;
use livelum_core::error::{require_company, require_positive_number, require_text};
use livelum_core::{CompanyId, CompanyScoped, DomainError, DomainResult, Entity, Sequenced, bump_timestamp};

livelum_core::entity_id!(PersonId);

/// Employment status of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonStatus {
    Active,
    Inactive,
    OnLeave,
    Suspended,
    Terminated,
}

impl PersonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonStatus::Active => "ACTIVE",
            PersonStatus::Inactive => "INACTIVE",
            PersonStatus::OnLeave => "ON_LEAVE",
            PersonStatus::Suspended => "SUSPENDED",
            PersonStatus::Terminated => "TERMINATED",
        }
    }
}

impl core::str::FromStr for PersonStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(PersonStatus::Active),
            "INACTIVE" => Ok(PersonStatus::Inactive),
            "ON_LEAVE" => Ok(PersonStatus::OnLeave),
            "SUSPENDED" => Ok(PersonStatus::Suspended),
            "TERMINATED" => Ok(PersonStatus::Terminated),
            other => Err(DomainError::validation(format!("Estado inválido: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: PersonId,
    pub number: u32,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "documento")]
    pub document: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position_ids: Vec<String>,
    pub status: PersonStatus,
    pub hire_date: Option<NaiveDate>,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub number: u32,
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position_ids: Vec<String>,
    pub hire_date: Option<NaiveDate>,
    pub company_id: CompanyId,
}

/// Partial update. Positions and status have their own operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document: Option<String>,
    /// Blank clears.
    pub email: Option<String>,
    /// Blank clears.
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Entity: Person (employee / collaborator of a company).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    number: u32,
    first_name: String,
    last_name: String,
    document: String,
    email: Option<String>,
    phone: Option<String>,
    position_ids: Vec<String>,
    status: PersonStatus,
    hire_date: Option<NaiveDate>,
    company_id: CompanyId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Person {
    pub fn create(new: NewPerson, now: DateTime<Utc>) -> DomainResult<Self> {
        let person = Self {
            id: PersonId::new(),
            number: new.number,
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            document: new.document.trim().to_string(),
            email: normalize_text(new.email),
            phone: normalize_text(new.phone),
            position_ids: clean_positions(new.position_ids)?,
            status: PersonStatus::Active,
            hire_date: new.hire_date,
            company_id: new.company_id,
            created_at: now,
            updated_at: now,
        };
        person.validate()?;
        Ok(person)
    }

    pub fn from_primitives(record: PersonRecord) -> DomainResult<Self> {
        let person = Self {
            id: record.id,
            number: record.number,
            first_name: record.first_name,
            last_name: record.last_name,
            document: record.document,
            email: record.email,
            phone: record.phone,
            position_ids: record.position_ids,
            status: record.status,
            hire_date: record.hire_date,
            company_id: record.company_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        person.validate()?;
        Ok(person)
    }

    pub fn to_primitives(&self) -> PersonRecord {
        PersonRecord {
            id: self.id,
            number: self.number,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            document: self.document.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            position_ids: self.position_ids.clone(),
            status: self.status,
            hire_date: self.hire_date,
            company_id: self.company_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn update(&mut self, patch: PersonPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(first_name) = patch.first_name {
            next.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = patch.last_name {
            next.last_name = last_name.trim().to_string();
        }
        if let Some(document) = patch.document {
            next.document = document.trim().to_string();
        }
        if let Some(email) = patch.email {
            next.email = normalize_text(Some(email));
        }
        if let Some(phone) = patch.phone {
            next.phone = normalize_text(Some(phone));
        }
        if let Some(hire_date) = patch.hire_date {
            next.hire_date = Some(hire_date);
        }
        next.validate()?;
        next.updated_at = bump_timestamp(self.updated_at, now);
        *self = next;
        Ok(())
    }

    /// Replace the assigned positions (deduplicated, order preserved).
    pub fn assign_positions(&mut self, position_ids: Vec<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.position_ids = clean_positions(position_ids)?;
        self.updated_at = bump_timestamp(self.updated_at, now);
        Ok(())
    }

    pub fn set_status(&mut self, status: PersonStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = bump_timestamp(self.updated_at, now);
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn hire_date(&self) -> Option<NaiveDate> {
        self.hire_date
    }

    pub fn position_ids(&self) -> &[String] {
        &self.position_ids
    }

    pub fn status(&self) -> PersonStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == PersonStatus::Active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> DomainResult<()> {
        require_text(&self.first_name, "Los nombres son requeridos")?;
        require_text(&self.last_name, "Los apellidos son requeridos")?;
        require_text(&self.document, "El documento es requerido")?;
        require_positive_number(self.number, "El número debe ser mayor a 0")?;
        require_company(self.company_id, "La empresa es requerida")?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(DomainError::validation("El email no es válido"));
            }
        }
        Ok(())
    }
}

impl Entity for Person {
    type Id = PersonId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CompanyScoped for Person {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }
}

impl Sequenced for Person {
    fn number(&self) -> u32 {
        self.number
    }
}

fn clean_positions(ids: Vec<String>) -> DomainResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim().to_string();
        if id.is_empty() {
            return Err(DomainError::validation("Los cargos no pueden estar vacíos"));
        }
        if !out.contains(&id) {
            out.push(id);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_person(document: &str) -> NewPerson {
        NewPerson {
            number: 1,
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            document: document.into(),
            email: Some("ana@example.com".into()),
            phone: None,
            position_ids: vec![],
            hire_date: None,
            company_id: CompanyId::new(),
        }
    }

    #[test]
    fn create_requires_document() {
        let err = Person::create(new_person(""), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::Validation("El documento es requerido".into()));
    }

    #[test]
    fn create_rejects_malformed_email() {
        let mut new = new_person("0102030405");
        new.email = Some("not-an-email".into());
        assert!(Person::create(new, Utc::now()).is_err());
    }

    #[test]
    fn assign_positions_dedupes_and_keeps_order() {
        let mut p = Person::create(new_person("0102030405"), Utc::now()).unwrap();
        p.assign_positions(vec!["b".into(), "a".into(), " b ".into()], Utc::now())
            .unwrap();
        assert_eq!(p.position_ids(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn assign_positions_rejects_blank_ids() {
        let mut p = Person::create(new_person("0102030405"), Utc::now()).unwrap();
        assert!(p.assign_positions(vec!["a".into(), "".into()], Utc::now()).is_err());
        assert!(p.position_ids().is_empty());
    }

    #[test]
    fn status_overwrites_without_rules() {
        let mut p = Person::create(new_person("0102030405"), Utc::now()).unwrap();
        p.set_status(PersonStatus::Terminated, Utc::now());
        p.set_status(PersonStatus::Active, Utc::now());
        assert!(p.is_active());
    }

    #[test]
    fn wire_uses_documento_key() {
        let record = Person::create(new_person("0102030405"), Utc::now())
            .unwrap()
            .to_primitives();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["documento"], "0102030405");
        assert_eq!(json["firstName"], "Ana");
        assert_eq!(json["status"], "ACTIVE");
    }
}
