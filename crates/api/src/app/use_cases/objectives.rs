use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};

use livelum_core::{CompanyId, Entity, Sequenced};
use livelum_infra::DynSequencedRepository;
use livelum_objectives::{
    NewObjective, Objective, ObjectiveId, ObjectivePatch, ObjectiveSearchCriteria, ObjectiveStatus,
};

use super::{Page, ServiceError, ServiceResult, create_numbered, search_page};

const NOT_FOUND: &str = "Objetivo no encontrado";

#[derive(Debug, Clone, PartialEq)]
pub struct CreateObjective {
    pub title: String,
    pub description: Option<String>,
    pub target_value: f64,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub company_id: CompanyId,
}

impl CreateObjective {
    fn numbered(&self, number: u32) -> NewObjective {
        NewObjective {
            number,
            title: self.title.clone(),
            description: self.description.clone(),
            target_value: self.target_value,
            current_value: self.current_value,
            unit: self.unit.clone(),
            due_date: self.due_date,
            company_id: self.company_id,
        }
    }
}

#[derive(Clone)]
pub struct ObjectiveService {
    repo: DynSequencedRepository<Objective, ObjectiveSearchCriteria>,
}

impl ObjectiveService {
    pub fn new(repo: DynSequencedRepository<Objective, ObjectiveSearchCriteria>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(company_id = %input.company_id), err)]
    pub async fn create(&self, input: CreateObjective) -> ServiceResult<Objective> {
        let objective = create_numbered(self.repo.as_ref(), input.company_id, |number| {
            Objective::create(input.numbered(number), Utc::now())
        })
        .await?;
        info!(id = %objective.id(), number = objective.number(), "objective created");
        Ok(objective)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get(&self, id: ObjectiveId) -> ServiceResult<Objective> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.into()))
    }

    #[instrument(skip(self), err)]
    pub async fn search(&self, criteria: ObjectiveSearchCriteria) -> ServiceResult<Page<Objective>> {
        search_page(self.repo.as_ref(), &criteria).await
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    pub async fn update(&self, id: ObjectiveId, patch: ObjectivePatch) -> ServiceResult<Objective> {
        let mut objective = self.get(id).await?;
        objective.update(patch, Utc::now())?;
        self.repo.save(&objective).await?;
        info!(progress = objective.progress(), "objective updated");
        Ok(objective)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn change_status(&self, id: ObjectiveId, status: ObjectiveStatus) -> ServiceResult<Objective> {
        let mut objective = self.get(id).await?;
        objective.set_status(status, Utc::now());
        self.repo.save(&objective).await?;
        info!(status = status.as_str(), "objective status changed");
        Ok(objective)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete(&self, id: ObjectiveId) -> ServiceResult<()> {
        if !self.repo.delete(&id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.into()));
        }
        info!("objective deleted");
        Ok(())
    }
}
