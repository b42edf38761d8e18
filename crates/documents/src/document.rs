use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use livelum_core::criteria::normalize_text;
use livelum_core::error::{require_company, require_positive_number, require_text};
use livelum_core::{CompanyId, CompanyScoped, DomainError, DomainResult, Entity, Sequenced, bump_timestamp};

livelum_core::entity_id!(DocumentId);

pub const DEFAULT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    Procedure,
    Policy,
    Manual,
    Form,
    Record,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Procedure => "PROCEDURE",
            DocumentKind::Policy => "POLICY",
            DocumentKind::Manual => "MANUAL",
            DocumentKind::Form => "FORM",
            DocumentKind::Record => "RECORD",
        }
    }
}

impl core::str::FromStr for DocumentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCEDURE" => Ok(DocumentKind::Procedure),
            "POLICY" => Ok(DocumentKind::Policy),
            "MANUAL" => Ok(DocumentKind::Manual),
            "FORM" => Ok(DocumentKind::Form),
            "RECORD" => Ok(DocumentKind::Record),
            other => Err(DomainError::validation(format!("Tipo de documento inválido: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Draft,
    InReview,
    Approved,
    Obsolete,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::InReview => "IN_REVIEW",
            DocumentStatus::Approved => "APPROVED",
            DocumentStatus::Obsolete => "OBSOLETE",
        }
    }
}

impl core::str::FromStr for DocumentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(DocumentStatus::Draft),
            "IN_REVIEW" => Ok(DocumentStatus::InReview),
            "APPROVED" => Ok(DocumentStatus::Approved),
            "OBSOLETE" => Ok(DocumentStatus::Obsolete),
            other => Err(DomainError::validation(format!("Estado inválido: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub number: u32,
    pub code: String,
    pub title: String,
    pub kind: DocumentKind,
    pub version: String,
    pub status: DocumentStatus,
    pub owner_id: Option<String>,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub number: u32,
    pub code: String,
    pub title: String,
    pub kind: DocumentKind,
    /// Defaults to [`DEFAULT_VERSION`].
    pub version: Option<String>,
    pub owner_id: Option<String>,
    pub company_id: CompanyId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub code: Option<String>,
    pub title: Option<String>,
    pub kind: Option<DocumentKind>,
    pub version: Option<String>,
    /// Blank clears.
    pub owner_id: Option<String>,
}

/// Entity: controlled document of the management system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    number: u32,
    code: String,
    title: String,
    kind: DocumentKind,
    version: String,
    status: DocumentStatus,
    owner_id: Option<String>,
    company_id: CompanyId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    pub fn create(new: NewDocument, now: DateTime<Utc>) -> DomainResult<Self> {
        let document = Self {
            id: DocumentId::new(),
            number: new.number,
            code: new.code.trim().to_string(),
            title: new.title.trim().to_string(),
            kind: new.kind,
            version: normalize_text(new.version).unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            status: DocumentStatus::Draft,
            owner_id: normalize_text(new.owner_id),
            company_id: new.company_id,
            created_at: now,
            updated_at: now,
        };
        document.validate()?;
        Ok(document)
    }

    pub fn from_primitives(record: DocumentRecord) -> DomainResult<Self> {
        let document = Self {
            id: record.id,
            number: record.number,
            code: record.code,
            title: record.title,
            kind: record.kind,
            version: record.version,
            status: record.status,
            owner_id: record.owner_id,
            company_id: record.company_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        document.validate()?;
        Ok(document)
    }

    pub fn to_primitives(&self) -> DocumentRecord {
        DocumentRecord {
            id: self.id,
            number: self.number,
            code: self.code.clone(),
            title: self.title.clone(),
            kind: self.kind,
            version: self.version.clone(),
            status: self.status,
            owner_id: self.owner_id.clone(),
            company_id: self.company_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn update(&mut self, patch: DocumentPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(code) = patch.code {
            next.code = code.trim().to_string();
        }
        if let Some(title) = patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(kind) = patch.kind {
            next.kind = kind;
        }
        if let Some(version) = patch.version {
            next.version = version.trim().to_string();
        }
        if let Some(owner_id) = patch.owner_id {
            next.owner_id = normalize_text(Some(owner_id));
        }
        next.validate()?;
        next.updated_at = bump_timestamp(self.updated_at, now);
        *self = next;
        Ok(())
    }

    pub fn set_status(&mut self, status: DocumentStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = bump_timestamp(self.updated_at, now);
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn is_approved(&self) -> bool {
        self.status == DocumentStatus::Approved
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn validate(&self) -> DomainResult<()> {
        require_text(&self.code, "El código del documento es requerido")?;
        require_text(&self.title, "El título del documento es requerido")?;
        require_text(&self.version, "La versión del documento es requerida")?;
        require_positive_number(self.number, "El número debe ser mayor a 0")?;
        require_company(self.company_id, "La empresa es requerida")
    }
}

impl Entity for Document {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl CompanyScoped for Document {
    fn company_id(&self) -> CompanyId {
        self.company_id
    }
}

impl Sequenced for Document {
    fn number(&self) -> u32 {
        self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_document() -> NewDocument {
        NewDocument {
            number: 4,
            code: "PR-004".into(),
            title: "Control de documentos".into(),
            kind: DocumentKind::Procedure,
            version: None,
            owner_id: Some("  ".into()),
            company_id: CompanyId::new(),
        }
    }

    #[test]
    fn create_defaults_to_draft_v1() {
        let doc = Document::create(new_document(), Utc::now()).unwrap();
        assert_eq!(doc.status(), DocumentStatus::Draft);
        assert_eq!(doc.version(), DEFAULT_VERSION);
        assert_eq!(doc.owner_id(), None);
        assert!(!doc.is_approved());
    }

    #[test]
    fn update_rejects_blank_version() {
        let mut doc = Document::create(new_document(), Utc::now()).unwrap();
        let err = doc
            .update(DocumentPatch { version: Some(" ".into()), ..Default::default() }, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(doc.version(), DEFAULT_VERSION);
    }

    #[test]
    fn approve_then_obsolete() {
        let mut doc = Document::create(new_document(), Utc::now()).unwrap();
        doc.set_status(DocumentStatus::Approved, Utc::now());
        assert!(doc.is_approved());
        doc.set_status(DocumentStatus::Obsolete, Utc::now());
        assert_eq!(doc.to_primitives().status, DocumentStatus::Obsolete);
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let record = Document::create(new_document(), Utc::now()).unwrap().to_primitives();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "PROCEDURE");
        assert_eq!(json["status"], "DRAFT");
        assert_eq!(json["version"], "1.0");
        assert!(json["ownerId"].is_null());
        assert_eq!(json["companyId"], record.company_id.to_string());

        let back: DocumentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(Document::from_primitives(back).unwrap().to_primitives(), record);
    }
}
