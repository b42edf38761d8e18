//! Use cases: one service per module, sitting between the route handlers and
//! the repositories.
//!
//! Services own the clock (`Utc::now()` is read here, never in the domain)
//! and the retry on per-company number collisions.

use thiserror::Error;
use tracing::warn;

use livelum_core::{CompanyId, DomainError, DomainResult, SearchCriteria, Sequenced};
use livelum_infra::db::constraints;
use livelum_infra::{RepositoryError, SequencedRepository};

pub mod companies;
pub mod documents;
pub mod objectives;
pub mod people;
pub mod risks;
pub mod skills;
pub mod stakeholders;

pub use companies::CompanyService;
pub use documents::{CreateDocument, DocumentService};
pub use objectives::{CreateObjective, ObjectiveService};
pub use people::{CreatePerson, PersonService};
pub use risks::{CreateRisk, RiskService};
pub use skills::{CreateSkill, SkillService};
pub use stakeholders::{CreateStakeholder, StakeholderService};

/// Attempts made by a create before a number collision is reported.
pub const MAX_CREATE_ATTEMPTS: u32 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvariantViolation(msg) => {
                ServiceError::Validation(msg)
            }
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::NotFound => ServiceError::NotFound("Registro no encontrado".into()),
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(constraint) => ServiceError::Conflict(conflict_message(&constraint)),
            RepositoryError::Storage(msg) | RepositoryError::Corrupt(msg) => ServiceError::Storage(msg),
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        constraints::PEOPLE_DOCUMENTO => "Ya existe una persona con ese documento en la empresa".into(),
        constraints::COMPANIES_TAX_ID => "Ya existe una empresa con ese RUC".into(),
        c if c.ends_with(constraints::NUMBER_SUFFIX) => {
            "El número correlativo ya está en uso, intente nuevamente".into()
        }
        c => format!("Registro duplicado ({c})"),
    }
}

/// One page of a search plus the number of matches across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Fetch a page and its total concurrently.
pub(crate) async fn search_page<E, C, R>(repo: &R, criteria: &C) -> ServiceResult<Page<E>>
where
    E: livelum_core::Entity + Send + Sync + 'static,
    C: SearchCriteria<E> + 'static,
    R: livelum_infra::Repository<E, C> + ?Sized,
{
    let (items, total) = tokio::try_join!(
        repo.find_by_criteria(criteria),
        repo.count_by_criteria(criteria)
    )?;
    Ok(Page { items, total })
}

/// Number and persist a new entity.
///
/// `build` runs once per attempt with the number read for that attempt. A
/// collision on the company's number index re-reads `next_number` and tries
/// again, up to [`MAX_CREATE_ATTEMPTS`]. Any other conflict is returned as is.
pub(crate) async fn create_numbered<E, C, R, F>(
    repo: &R,
    company_id: CompanyId,
    build: F,
) -> ServiceResult<E>
where
    E: Sequenced + Send + Sync + 'static,
    C: SearchCriteria<E> + 'static,
    R: SequencedRepository<E, C> + ?Sized,
    F: Fn(u32) -> DomainResult<E>,
{
    let mut attempt = 1;
    loop {
        let number = repo.next_number(company_id).await?;
        let entity = build(number)?;
        match repo.save(&entity).await {
            Ok(()) => return Ok(entity),
            Err(err) if err.is_number_conflict() && attempt < MAX_CREATE_ATTEMPTS => {
                warn!(%company_id, number, attempt, "number taken concurrently, retrying");
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_conflicts_keep_their_meaning() {
        let documento: ServiceError = RepositoryError::Conflict(constraints::PEOPLE_DOCUMENTO.into()).into();
        assert_eq!(
            documento,
            ServiceError::Conflict("Ya existe una persona con ese documento en la empresa".into())
        );

        let storage: ServiceError = RepositoryError::Corrupt("skills: bad row".into()).into();
        assert!(matches!(storage, ServiceError::Storage(_)));
    }

    #[test]
    fn domain_validation_message_is_kept() {
        let err: ServiceError = DomainError::validation("El título es requerido").into();
        assert_eq!(err.to_string(), "El título es requerido");
    }
}
