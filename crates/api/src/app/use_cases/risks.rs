use chrono::Utc;
use tracing::{info, instrument};

use livelum_core::{CompanyId, Entity, Sequenced};
use livelum_infra::DynSequencedRepository;
use livelum_risks::{NewRisk, Risk, RiskId, RiskPatch, RiskSearchCriteria, RiskStatus};

use super::{Page, ServiceError, ServiceResult, create_numbered, search_page};

const NOT_FOUND: &str = "Riesgo no encontrado";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRisk {
    pub title: String,
    pub description: Option<String>,
    pub probability: u8,
    pub impact: u8,
    pub owner_id: Option<String>,
    pub company_id: CompanyId,
}

impl CreateRisk {
    fn numbered(&self, number: u32) -> NewRisk {
        NewRisk {
            number,
            title: self.title.clone(),
            description: self.description.clone(),
            probability: self.probability,
            impact: self.impact,
            owner_id: self.owner_id.clone(),
            company_id: self.company_id,
        }
    }
}

#[derive(Clone)]
pub struct RiskService {
    repo: DynSequencedRepository<Risk, RiskSearchCriteria>,
}

impl RiskService {
    pub fn new(repo: DynSequencedRepository<Risk, RiskSearchCriteria>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(company_id = %input.company_id), err)]
    pub async fn create(&self, input: CreateRisk) -> ServiceResult<Risk> {
        let risk = create_numbered(self.repo.as_ref(), input.company_id, |number| {
            Risk::create(input.numbered(number), Utc::now())
        })
        .await?;
        info!(id = %risk.id(), number = risk.number(), score = risk.score(), "risk created");
        Ok(risk)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get(&self, id: RiskId) -> ServiceResult<Risk> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.into()))
    }

    #[instrument(skip(self), err)]
    pub async fn search(&self, criteria: RiskSearchCriteria) -> ServiceResult<Page<Risk>> {
        search_page(self.repo.as_ref(), &criteria).await
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    pub async fn update(&self, id: RiskId, patch: RiskPatch) -> ServiceResult<Risk> {
        let mut risk = self.get(id).await?;
        risk.update(patch, Utc::now())?;
        self.repo.save(&risk).await?;
        info!(score = risk.score(), "risk updated");
        Ok(risk)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn change_status(&self, id: RiskId, status: RiskStatus) -> ServiceResult<Risk> {
        let mut risk = self.get(id).await?;
        risk.set_status(status, Utc::now());
        self.repo.save(&risk).await?;
        info!(status = status.as_str(), "risk status changed");
        Ok(risk)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete(&self, id: RiskId) -> ServiceResult<()> {
        if !self.repo.delete(&id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.into()));
        }
        info!("risk deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use livelum_infra::InMemoryRepository;
    use livelum_risks::RiskLevel;

    use super::*;

    fn input(company_id: CompanyId, probability: u8, impact: u8) -> CreateRisk {
        CreateRisk {
            title: "Falla de proveedor".into(),
            description: None,
            probability,
            impact,
            owner_id: None,
            company_id,
        }
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected() {
        let svc = RiskService::new(InMemoryRepository::<Risk>::arc());
        let err = svc.create(input(CompanyId::new(), 6, 1)).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation("La probabilidad debe estar entre 1 y 5".into())
        );
    }

    #[tokio::test]
    async fn level_filter_uses_score_bands() {
        let svc = RiskService::new(InMemoryRepository::<Risk>::arc());
        let acme = CompanyId::new();
        svc.create(input(acme, 1, 2)).await.unwrap();
        svc.create(input(acme, 5, 5)).await.unwrap();
        svc.create(input(acme, 4, 5)).await.unwrap();

        let criteria = RiskSearchCriteria::builder()
            .with_company(acme)
            .with_level(Some(RiskLevel::Critical))
            .build();
        let page = svc.search(criteria).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|r| r.level() == RiskLevel::Critical));
    }
}
