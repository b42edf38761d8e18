//! Request/response DTOs.
//!
//! Wire names follow the frontend contract: camelCase everywhere except the
//! stakeholder module, which keeps its Spanish keys. Missing required fields,
//! unknown enum labels and wrong types are rejected by serde before a handler
//! runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use livelum_companies::{
    Company, CompanyPatch, CompanyRecord, CompanySearchCriteria, CompanySortField, CompanyStatus, NewCompany,
};
use livelum_core::{CompanyId, SortOrder};
use livelum_documents::{
    Document, DocumentKind, DocumentPatch, DocumentRecord, DocumentSearchCriteria, DocumentSortField,
    DocumentStatus,
};
use livelum_objectives::{
    Objective, ObjectivePatch, ObjectiveRecord, ObjectiveSearchCriteria, ObjectiveSortField, ObjectiveStatus,
};
use livelum_people::{Person, PersonPatch, PersonRecord, PersonSearchCriteria, PersonSortField, PersonStatus};
use livelum_risks::{
    Risk, RiskLevel, RiskPatch, RiskRecord, RiskSearchCriteria, RiskSortField, RiskStatus,
};
use livelum_skills::{
    Skill, SkillCategory, SkillPatch, SkillRecord, SkillSearchCriteria, SkillSortField, SkillStatus,
};
use livelum_stakeholders::{
    Stakeholder, StakeholderPatch, StakeholderRecord, StakeholderSearchCriteria, StakeholderSortField,
    StakeholderType,
};

use crate::app::use_cases::{
    CreateDocument, CreateObjective, CreatePerson, CreateRisk, CreateSkill, CreateStakeholder,
};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Validate `page`/`limit` query values, applying defaults.
pub fn page_window(page: Option<u32>, limit: Option<u32>) -> Result<(u32, u32), String> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if page < 1 {
        return Err("page debe ser mayor o igual a 1".into());
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(format!("limit debe estar entre 1 y {MAX_LIMIT}"));
    }
    Ok((page, limit))
}

/// `PATCH /x/:id/status` body.
#[derive(Debug, Deserialize)]
pub struct StatusRequest<S> {
    pub status: S,
}

// -------------------------
// Companies
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<CreateCompanyRequest> for NewCompany {
    fn from(r: CreateCompanyRequest) -> Self {
        NewCompany {
            name: r.name,
            tax_id: r.tax_id,
            email: r.email,
            phone: r.phone,
            address: r.address,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<UpdateCompanyRequest> for CompanyPatch {
    fn from(r: UpdateCompanyRequest) -> Self {
        CompanyPatch {
            name: r.name,
            tax_id: r.tax_id,
            email: r.email,
            phone: r.phone,
            address: r.address,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<CompanyStatus>,
    pub sort_by: Option<CompanySortField>,
    pub sort_order: Option<SortOrder>,
}

impl CompanyListQuery {
    pub fn into_criteria(self) -> Result<CompanySearchCriteria, String> {
        let (page, limit) = page_window(self.page, self.limit)?;
        Ok(CompanySearchCriteria::builder()
            .with_search(self.search)
            .with_status(self.status)
            .with_sort(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
            .with_pagination(page, limit)
            .build())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    #[serde(flatten)]
    pub company: CompanyRecord,
    pub is_active: bool,
}

impl From<&Company> for CompanyResponse {
    fn from(company: &Company) -> Self {
        Self {
            company: company.to_primitives(),
            is_active: company.is_active(),
        }
    }
}

// -------------------------
// People
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    pub first_name: String,
    pub last_name: String,
    pub documento: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub position_ids: Vec<String>,
    pub hire_date: Option<NaiveDate>,
    pub company_id: CompanyId,
}

impl From<CreatePersonRequest> for CreatePerson {
    fn from(r: CreatePersonRequest) -> Self {
        CreatePerson {
            first_name: r.first_name,
            last_name: r.last_name,
            document: r.documento,
            email: r.email,
            phone: r.phone,
            position_ids: r.position_ids,
            hire_date: r.hire_date,
            company_id: r.company_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub documento: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

impl From<UpdatePersonRequest> for PersonPatch {
    fn from(r: UpdatePersonRequest) -> Self {
        PersonPatch {
            first_name: r.first_name,
            last_name: r.last_name,
            document: r.documento,
            email: r.email,
            phone: r.phone,
            hire_date: r.hire_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPositionsRequest {
    pub position_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub company_id: Option<CompanyId>,
    pub search: Option<String>,
    pub status: Option<PersonStatus>,
    pub position_id: Option<String>,
    pub sort_by: Option<PersonSortField>,
    pub sort_order: Option<SortOrder>,
}

impl PersonListQuery {
    pub fn into_criteria(self) -> Result<PersonSearchCriteria, String> {
        let (page, limit) = page_window(self.page, self.limit)?;
        let mut builder = PersonSearchCriteria::builder()
            .with_search(self.search)
            .with_status(self.status)
            .with_position(self.position_id)
            .with_sort(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
            .with_pagination(page, limit);
        if let Some(company_id) = self.company_id {
            builder = builder.with_company(company_id);
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    #[serde(flatten)]
    pub person: PersonRecord,
    pub full_name: String,
    pub is_active: bool,
}

impl From<&Person> for PersonResponse {
    fn from(person: &Person) -> Self {
        Self {
            person: person.to_primitives(),
            full_name: person.full_name(),
            is_active: person.is_active(),
        }
    }
}

// -------------------------
// Skills
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkillRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: SkillCategory,
    pub company_id: CompanyId,
}

impl From<CreateSkillRequest> for CreateSkill {
    fn from(r: CreateSkillRequest) -> Self {
        CreateSkill {
            title: r.title,
            description: r.description,
            category: r.category,
            company_id: r.company_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<SkillCategory>,
}

impl From<UpdateSkillRequest> for SkillPatch {
    fn from(r: UpdateSkillRequest) -> Self {
        SkillPatch {
            title: r.title,
            description: r.description,
            category: r.category,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub company_id: Option<CompanyId>,
    pub title: Option<String>,
    pub category: Option<SkillCategory>,
    pub status: Option<SkillStatus>,
    pub sort_by: Option<SkillSortField>,
    pub sort_order: Option<SortOrder>,
}

impl SkillListQuery {
    pub fn into_criteria(self) -> Result<SkillSearchCriteria, String> {
        let (page, limit) = page_window(self.page, self.limit)?;
        let mut builder = SkillSearchCriteria::builder()
            .with_title(self.title)
            .with_category(self.category)
            .with_status(self.status)
            .with_sort(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
            .with_pagination(page, limit);
        if let Some(company_id) = self.company_id {
            builder = builder.with_company(company_id);
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    #[serde(flatten)]
    pub skill: SkillRecord,
    pub is_active: bool,
}

impl From<&Skill> for SkillResponse {
    fn from(skill: &Skill) -> Self {
        Self {
            skill: skill.to_primitives(),
            is_active: skill.is_active(),
        }
    }
}

// -------------------------
// Stakeholders (Spanish keys)
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateStakeholderRequest {
    pub nombre: String,
    pub tipo: StakeholderType,
    pub requisitos: Option<String>,
    #[serde(rename = "metodoEvaluacion")]
    pub metodo_evaluacion: Option<String>,
    #[serde(rename = "companyId")]
    pub company_id: CompanyId,
}

impl From<CreateStakeholderRequest> for CreateStakeholder {
    fn from(r: CreateStakeholderRequest) -> Self {
        CreateStakeholder {
            name: r.nombre,
            kind: r.tipo,
            requirements: r.requisitos.unwrap_or_default(),
            evaluation_method: r.metodo_evaluacion.unwrap_or_default(),
            company_id: r.company_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStakeholderRequest {
    pub nombre: Option<String>,
    pub tipo: Option<StakeholderType>,
    pub requisitos: Option<String>,
    #[serde(rename = "metodoEvaluacion")]
    pub metodo_evaluacion: Option<String>,
}

impl From<UpdateStakeholderRequest> for StakeholderPatch {
    fn from(r: UpdateStakeholderRequest) -> Self {
        StakeholderPatch {
            name: r.nombre,
            kind: r.tipo,
            requirements: r.requisitos,
            evaluation_method: r.metodo_evaluacion,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StakeholderListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "companyId")]
    pub company_id: Option<CompanyId>,
    pub nombre: Option<String>,
    pub tipo: Option<StakeholderType>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<StakeholderSortField>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<SortOrder>,
}

impl StakeholderListQuery {
    pub fn into_criteria(self) -> Result<StakeholderSearchCriteria, String> {
        let (page, limit) = page_window(self.page, self.limit)?;
        let mut builder = StakeholderSearchCriteria::builder()
            .with_name(self.nombre)
            .with_kind(self.tipo)
            .with_sort(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
            .with_pagination(page, limit);
        if let Some(company_id) = self.company_id {
            builder = builder.with_company(company_id);
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Serialize)]
pub struct StakeholderResponse {
    #[serde(flatten)]
    pub stakeholder: StakeholderRecord,
    #[serde(rename = "isInternal")]
    pub is_internal: bool,
}

impl From<&Stakeholder> for StakeholderResponse {
    fn from(stakeholder: &Stakeholder) -> Self {
        Self {
            stakeholder: stakeholder.to_primitives(),
            is_internal: stakeholder.is_internal(),
        }
    }
}

// -------------------------
// Documents
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub code: String,
    pub title: String,
    pub kind: DocumentKind,
    pub version: Option<String>,
    pub owner_id: Option<String>,
    pub company_id: CompanyId,
}

impl From<CreateDocumentRequest> for CreateDocument {
    fn from(r: CreateDocumentRequest) -> Self {
        CreateDocument {
            code: r.code,
            title: r.title,
            kind: r.kind,
            version: r.version,
            owner_id: r.owner_id,
            company_id: r.company_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    pub code: Option<String>,
    pub title: Option<String>,
    pub kind: Option<DocumentKind>,
    pub version: Option<String>,
    pub owner_id: Option<String>,
}

impl From<UpdateDocumentRequest> for DocumentPatch {
    fn from(r: UpdateDocumentRequest) -> Self {
        DocumentPatch {
            code: r.code,
            title: r.title,
            kind: r.kind,
            version: r.version,
            owner_id: r.owner_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub company_id: Option<CompanyId>,
    pub search: Option<String>,
    pub kind: Option<DocumentKind>,
    pub status: Option<DocumentStatus>,
    pub sort_by: Option<DocumentSortField>,
    pub sort_order: Option<SortOrder>,
}

impl DocumentListQuery {
    pub fn into_criteria(self) -> Result<DocumentSearchCriteria, String> {
        let (page, limit) = page_window(self.page, self.limit)?;
        let mut builder = DocumentSearchCriteria::builder()
            .with_search(self.search)
            .with_kind(self.kind)
            .with_status(self.status)
            .with_sort(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
            .with_pagination(page, limit);
        if let Some(company_id) = self.company_id {
            builder = builder.with_company(company_id);
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    #[serde(flatten)]
    pub document: DocumentRecord,
    pub is_approved: bool,
}

impl From<&Document> for DocumentResponse {
    fn from(document: &Document) -> Self {
        Self {
            document: document.to_primitives(),
            is_approved: document.is_approved(),
        }
    }
}

// -------------------------
// Risks
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRiskRequest {
    pub title: String,
    pub description: Option<String>,
    pub probability: u8,
    pub impact: u8,
    pub owner_id: Option<String>,
    pub company_id: CompanyId,
}

impl From<CreateRiskRequest> for CreateRisk {
    fn from(r: CreateRiskRequest) -> Self {
        CreateRisk {
            title: r.title,
            description: r.description,
            probability: r.probability,
            impact: r.impact,
            owner_id: r.owner_id,
            company_id: r.company_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRiskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub probability: Option<u8>,
    pub impact: Option<u8>,
    pub owner_id: Option<String>,
}

impl From<UpdateRiskRequest> for RiskPatch {
    fn from(r: UpdateRiskRequest) -> Self {
        RiskPatch {
            title: r.title,
            description: r.description,
            probability: r.probability,
            impact: r.impact,
            owner_id: r.owner_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub company_id: Option<CompanyId>,
    pub title: Option<String>,
    pub status: Option<RiskStatus>,
    pub level: Option<RiskLevel>,
    pub sort_by: Option<RiskSortField>,
    pub sort_order: Option<SortOrder>,
}

impl RiskListQuery {
    pub fn into_criteria(self) -> Result<RiskSearchCriteria, String> {
        let (page, limit) = page_window(self.page, self.limit)?;
        let mut builder = RiskSearchCriteria::builder()
            .with_title(self.title)
            .with_status(self.status)
            .with_level(self.level)
            .with_sort(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
            .with_pagination(page, limit);
        if let Some(company_id) = self.company_id {
            builder = builder.with_company(company_id);
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    #[serde(flatten)]
    pub risk: RiskRecord,
    pub score: u8,
    pub level: RiskLevel,
    pub is_closed: bool,
}

impl From<&Risk> for RiskResponse {
    fn from(risk: &Risk) -> Self {
        Self {
            risk: risk.to_primitives(),
            score: risk.score(),
            level: risk.level(),
            is_closed: risk.is_closed(),
        }
    }
}

// -------------------------
// Objectives
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateObjectiveRequest {
    pub title: String,
    pub description: Option<String>,
    pub target_value: f64,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub company_id: CompanyId,
}

impl From<CreateObjectiveRequest> for CreateObjective {
    fn from(r: CreateObjectiveRequest) -> Self {
        CreateObjective {
            title: r.title,
            description: r.description,
            target_value: r.target_value,
            current_value: r.current_value,
            unit: r.unit,
            due_date: r.due_date,
            company_id: r.company_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateObjectiveRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl From<UpdateObjectiveRequest> for ObjectivePatch {
    fn from(r: UpdateObjectiveRequest) -> Self {
        ObjectivePatch {
            title: r.title,
            description: r.description,
            target_value: r.target_value,
            current_value: r.current_value,
            unit: r.unit,
            due_date: r.due_date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub company_id: Option<CompanyId>,
    pub title: Option<String>,
    pub status: Option<ObjectiveStatus>,
    pub sort_by: Option<ObjectiveSortField>,
    pub sort_order: Option<SortOrder>,
}

impl ObjectiveListQuery {
    pub fn into_criteria(self) -> Result<ObjectiveSearchCriteria, String> {
        let (page, limit) = page_window(self.page, self.limit)?;
        let mut builder = ObjectiveSearchCriteria::builder()
            .with_title(self.title)
            .with_status(self.status)
            .with_sort(self.sort_by.unwrap_or_default(), self.sort_order.unwrap_or_default())
            .with_pagination(page, limit);
        if let Some(company_id) = self.company_id {
            builder = builder.with_company(company_id);
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveResponse {
    #[serde(flatten)]
    pub objective: ObjectiveRecord,
    pub progress: f64,
    pub is_achieved: bool,
}

impl From<&Objective> for ObjectiveResponse {
    fn from(objective: &Objective) -> Self {
        Self {
            objective: objective.to_primitives(),
            progress: objective.progress(),
            is_achieved: objective.is_achieved(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn page_window_defaults_and_bounds() {
        assert_eq!(page_window(None, None), Ok((1, 10)));
        assert_eq!(page_window(Some(3), Some(100)), Ok((3, 100)));
        assert!(page_window(Some(0), None).is_err());
        assert!(page_window(None, Some(0)).is_err());
        assert!(page_window(None, Some(101)).is_err());
    }

    #[test]
    fn person_without_documento_is_rejected() {
        let body = json!({
            "firstName": "Ana",
            "lastName": "Pérez",
            "companyId": CompanyId::new(),
        });
        assert!(serde_json::from_value::<CreatePersonRequest>(body).is_err());
    }

    #[test]
    fn stakeholder_request_uses_spanish_keys() {
        let body = json!({
            "nombre": "Clientes",
            "tipo": "EXTERNAL",
            "metodoEvaluacion": " Encuesta ",
            "companyId": CompanyId::new(),
        });
        let input: CreateStakeholder = serde_json::from_value::<CreateStakeholderRequest>(body)
            .unwrap()
            .into();
        assert_eq!(input.requirements, "");
        assert_eq!(input.evaluation_method, "Encuesta");
    }

    #[test]
    fn unknown_enum_label_is_rejected() {
        let body = json!({
            "title": "Rust",
            "category": "COOKING",
            "companyId": CompanyId::new(),
        });
        assert!(serde_json::from_value::<CreateSkillRequest>(body).is_err());
    }

    #[test]
    fn risk_response_carries_derived_fields() {
        let risk = Risk::create(
            livelum_risks::NewRisk {
                number: 1,
                title: "Corte de energía".into(),
                description: None,
                probability: 4,
                impact: 4,
                owner_id: None,
                company_id: CompanyId::new(),
            },
            chrono::Utc::now(),
        )
        .unwrap();

        let json = serde_json::to_value(RiskResponse::from(&risk)).unwrap();
        assert_eq!(json["score"], 16);
        assert_eq!(json["level"], "HIGH");
        assert_eq!(json["isClosed"], false);
        assert_eq!(json["probability"], 4);
        assert_eq!(json["status"], "IDENTIFIED");
    }

    #[test]
    fn list_query_rejects_oversized_limit() {
        let query = SkillListQuery {
            limit: Some(500),
            ..SkillListQuery::default()
        };
        assert!(query.into_criteria().is_err());
    }
}
