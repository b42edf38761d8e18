use chrono::Utc;
use tracing::{info, instrument};

use livelum_core::{CompanyId, Entity, Sequenced};
use livelum_infra::DynSequencedRepository;
use livelum_stakeholders::{
    NewStakeholder, Stakeholder, StakeholderId, StakeholderPatch, StakeholderSearchCriteria, StakeholderType,
};

use super::{Page, ServiceError, ServiceResult, create_numbered, search_page};

const NOT_FOUND: &str = "Parte interesada no encontrada";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStakeholder {
    pub name: String,
    pub kind: StakeholderType,
    pub requirements: String,
    pub evaluation_method: String,
    pub company_id: CompanyId,
}

impl CreateStakeholder {
    fn numbered(&self, number: u32) -> NewStakeholder {
        NewStakeholder {
            number,
            name: self.name.clone(),
            kind: self.kind,
            requirements: self.requirements.clone(),
            evaluation_method: self.evaluation_method.clone(),
            company_id: self.company_id,
        }
    }
}

/// Stakeholders have no status, so there is no status operation.
#[derive(Clone)]
pub struct StakeholderService {
    repo: DynSequencedRepository<Stakeholder, StakeholderSearchCriteria>,
}

impl StakeholderService {
    pub fn new(repo: DynSequencedRepository<Stakeholder, StakeholderSearchCriteria>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(company_id = %input.company_id), err)]
    pub async fn create(&self, input: CreateStakeholder) -> ServiceResult<Stakeholder> {
        let stakeholder = create_numbered(self.repo.as_ref(), input.company_id, |number| {
            Stakeholder::create(input.numbered(number), Utc::now())
        })
        .await?;
        info!(id = %stakeholder.id(), number = stakeholder.number(), "stakeholder created");
        Ok(stakeholder)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get(&self, id: StakeholderId) -> ServiceResult<Stakeholder> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.into()))
    }

    #[instrument(skip(self), err)]
    pub async fn search(&self, criteria: StakeholderSearchCriteria) -> ServiceResult<Page<Stakeholder>> {
        search_page(self.repo.as_ref(), &criteria).await
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    pub async fn update(&self, id: StakeholderId, patch: StakeholderPatch) -> ServiceResult<Stakeholder> {
        let mut stakeholder = self.get(id).await?;
        stakeholder.update(patch, Utc::now())?;
        self.repo.save(&stakeholder).await?;
        info!("stakeholder updated");
        Ok(stakeholder)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete(&self, id: StakeholderId) -> ServiceResult<()> {
        if !self.repo.delete(&id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.into()));
        }
        info!("stakeholder deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use livelum_infra::InMemoryRepository;

    use super::*;

    #[tokio::test]
    async fn free_text_fields_may_be_blank() {
        let svc = StakeholderService::new(InMemoryRepository::<Stakeholder>::arc());
        let created = svc
            .create(CreateStakeholder {
                name: "Clientes".into(),
                kind: StakeholderType::External,
                requirements: String::new(),
                evaluation_method: String::new(),
                company_id: CompanyId::new(),
            })
            .await
            .unwrap();

        assert_eq!(created.number(), 1);
        assert_eq!(created.requirements(), "");
        assert!(!created.is_internal());
    }

    #[tokio::test]
    async fn blank_name_is_rejected_on_update() {
        let svc = StakeholderService::new(InMemoryRepository::<Stakeholder>::arc());
        let created = svc
            .create(CreateStakeholder {
                name: "Empleados".into(),
                kind: StakeholderType::Internal,
                requirements: "Capacitación".into(),
                evaluation_method: "Encuesta".into(),
                company_id: CompanyId::new(),
            })
            .await
            .unwrap();

        let patch = StakeholderPatch {
            name: Some(" ".into()),
            ..StakeholderPatch::default()
        };
        let err = svc.update(*created.id(), patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(svc.get(*created.id()).await.unwrap().name(), "Empleados");
    }
}
