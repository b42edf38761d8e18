use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use livelum_core::criteria::normalize_text;
use livelum_core::error::require_text;
use livelum_core::{CompanyId, DomainError, DomainResult, Entity, bump_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyStatus {
    Active,
    Inactive,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Active => "ACTIVE",
            CompanyStatus::Inactive => "INACTIVE",
        }
    }
}

impl core::str::FromStr for CompanyStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(CompanyStatus::Active),
            "INACTIVE" => Ok(CompanyStatus::Inactive),
            other => Err(DomainError::validation(format!("Estado inválido: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Entity: Company (tenant root).
///
/// Companies are the boundary every other module is scoped by, so they
/// carry neither a company reference nor a sequence number. The tax id is
/// unique across the whole system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    id: CompanyId,
    name: String,
    tax_id: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    status: CompanyStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Company {
    pub fn create(new: NewCompany, now: DateTime<Utc>) -> DomainResult<Self> {
        let company = Self {
            id: CompanyId::new(),
            name: new.name.trim().to_string(),
            tax_id: new.tax_id.trim().to_string(),
            email: normalize_text(new.email),
            phone: normalize_text(new.phone),
            address: normalize_text(new.address),
            status: CompanyStatus::Active,
            created_at: now,
            updated_at: now,
        };
        company.validate()?;
        Ok(company)
    }

    pub fn from_primitives(record: CompanyRecord) -> DomainResult<Self> {
        let company = Self {
            id: record.id,
            name: record.name,
            tax_id: record.tax_id,
            email: record.email,
            phone: record.phone,
            address: record.address,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        company.validate()?;
        Ok(company)
    }

    pub fn to_primitives(&self) -> CompanyRecord {
        CompanyRecord {
            id: self.id,
            name: self.name.clone(),
            tax_id: self.tax_id.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn update(&mut self, patch: CompanyPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(tax_id) = patch.tax_id {
            next.tax_id = tax_id.trim().to_string();
        }
        if let Some(email) = patch.email {
            next.email = normalize_text(Some(email));
        }
        if let Some(phone) = patch.phone {
            next.phone = normalize_text(Some(phone));
        }
        if let Some(address) = patch.address {
            next.address = normalize_text(Some(address));
        }
        next.validate()?;
        next.updated_at = bump_timestamp(self.updated_at, now);
        *self = next;
        Ok(())
    }

    pub fn set_status(&mut self, status: CompanyStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = bump_timestamp(self.updated_at, now);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn status(&self) -> CompanyStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> DomainResult<()> {
        require_text(&self.name, "El nombre de la empresa es requerido")?;
        require_text(&self.tax_id, "El RUC de la empresa es requerido")?;
        if self.email.as_deref().is_some_and(|e| !e.contains('@')) {
            return Err(DomainError::validation("El email no es válido"));
        }
        Ok(())
    }
}

impl Entity for Company {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_company(name: &str, tax_id: &str) -> NewCompany {
        NewCompany {
            name: name.into(),
            tax_id: tax_id.into(),
            email: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn create_trims_and_starts_active() {
        let company = Company::create(new_company("  Acme SA ", " 20123456789 "), Utc::now()).unwrap();
        assert_eq!(company.name(), "Acme SA");
        assert_eq!(company.tax_id(), "20123456789");
        assert!(company.is_active());
    }

    #[test]
    fn tax_id_is_required() {
        let err = Company::create(new_company("Acme", "  "), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("El RUC de la empresa es requerido"));
    }

    #[test]
    fn invalid_email_leaves_company_unchanged() {
        let mut company = Company::create(new_company("Acme", "1"), Utc::now()).unwrap();
        let before = company.clone();
        let patch = CompanyPatch { email: Some("no-arroba".into()), ..Default::default() };
        assert!(company.update(patch, Utc::now()).is_err());
        assert_eq!(company, before);
    }

    #[test]
    fn record_serializes_tax_id_in_camel_case() {
        let company = Company::create(new_company("Acme", "1"), Utc::now()).unwrap();
        let json = serde_json::to_value(company.to_primitives()).unwrap();
        assert_eq!(json["taxId"], "1");
        assert_eq!(json["status"], "ACTIVE");
    }
}
