use chrono::Utc;
use tracing::{info, instrument};

use livelum_core::{CompanyId, CompanyScoped};
use livelum_infra::DynSequencedRepository;
use livelum_skills::{NewSkill, Skill, SkillCategory, SkillId, SkillPatch, SkillSearchCriteria, SkillStatus};

use super::{Page, ServiceError, ServiceResult, create_numbered, search_page};

const NOT_FOUND: &str = "Habilidad no encontrada";

/// Skill fields supplied by the caller; the number is assigned on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSkill {
    pub title: String,
    pub description: Option<String>,
    pub category: SkillCategory,
    pub company_id: CompanyId,
}

impl CreateSkill {
    fn numbered(&self, number: u32) -> NewSkill {
        NewSkill {
            number,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            company_id: self.company_id,
        }
    }
}

#[derive(Clone)]
pub struct SkillService {
    repo: DynSequencedRepository<Skill, SkillSearchCriteria>,
}

impl SkillService {
    pub fn new(repo: DynSequencedRepository<Skill, SkillSearchCriteria>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(company_id = %input.company_id), err)]
    pub async fn create(&self, input: CreateSkill) -> ServiceResult<Skill> {
        let skill = create_numbered(self.repo.as_ref(), input.company_id, |number| {
            Skill::create(input.numbered(number), Utc::now())
        })
        .await?;
        info!(id = %skill.id_typed(), number = skill.to_primitives().number, "skill created");
        Ok(skill)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get(&self, id: SkillId) -> ServiceResult<Skill> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.into()))
    }

    #[instrument(skip(self), err)]
    pub async fn search(&self, criteria: SkillSearchCriteria) -> ServiceResult<Page<Skill>> {
        search_page(self.repo.as_ref(), &criteria).await
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    pub async fn update(&self, id: SkillId, patch: SkillPatch) -> ServiceResult<Skill> {
        let mut skill = self.get(id).await?;
        skill.update(patch, Utc::now())?;
        self.repo.save(&skill).await?;
        info!(company_id = %skill.company_id(), "skill updated");
        Ok(skill)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn change_status(&self, id: SkillId, status: SkillStatus) -> ServiceResult<Skill> {
        let mut skill = self.get(id).await?;
        skill.set_status(status, Utc::now());
        self.repo.save(&skill).await?;
        info!(status = status.as_str(), "skill status changed");
        Ok(skill)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete(&self, id: SkillId) -> ServiceResult<()> {
        if !self.repo.delete(&id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.into()));
        }
        info!("skill deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use livelum_infra::InMemoryRepository;
    use livelum_skills::SkillRecord;

    use super::*;

    fn service() -> SkillService {
        SkillService::new(InMemoryRepository::<Skill>::arc())
    }

    fn input(company_id: CompanyId, title: &str) -> CreateSkill {
        CreateSkill {
            title: title.into(),
            description: None,
            category: SkillCategory::Technical,
            company_id,
        }
    }

    #[tokio::test]
    async fn numbers_follow_per_company_sequence() {
        let svc = service();
        let acme = CompanyId::new();
        let first = svc.create(input(acme, "Rust")).await.unwrap();
        let second = svc.create(input(acme, "SQL")).await.unwrap();
        let other = svc.create(input(CompanyId::new(), "Excel")).await.unwrap();

        assert_eq!(first.to_primitives().number, 1);
        assert_eq!(second.to_primitives().number, 2);
        assert_eq!(other.to_primitives().number, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_distinct_numbers() {
        let svc = service();
        let acme = CompanyId::new();
        let a = tokio::spawn({
            let svc = svc.clone();
            async move { svc.create(input(acme, "A")).await }
        });
        let b = tokio::spawn({
            let svc = svc.clone();
            async move { svc.create(input(acme, "B")).await }
        });
        let a = a.await.unwrap().unwrap().to_primitives().number;
        let b = b.await.unwrap().unwrap().to_primitives().number;

        let mut numbers = vec![a, b];
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn blank_title_is_a_validation_error() {
        let err = service().create(input(CompanyId::new(), "  ")).await.unwrap_err();
        assert_eq!(err, ServiceError::Validation("El título de la habilidad es requerido".into()));
    }

    #[tokio::test]
    async fn update_and_status_change_persist() {
        let svc = service();
        let skill = svc.create(input(CompanyId::new(), "Rust")).await.unwrap();
        let id = skill.id_typed();

        let patch = SkillPatch {
            title: Some("Rust avanzado".into()),
            ..SkillPatch::default()
        };
        svc.update(id, patch).await.unwrap();
        svc.change_status(id, SkillStatus::Inactive).await.unwrap();

        let SkillRecord { title, status, .. } = svc.get(id).await.unwrap().to_primitives();
        assert_eq!(title, "Rust avanzado");
        assert_eq!(status, SkillStatus::Inactive);
    }

    #[tokio::test]
    async fn missing_skill_is_not_found() {
        let svc = service();
        assert!(matches!(svc.get(SkillId::new()).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(SkillId::new()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn search_reports_total_beyond_the_page() {
        let svc = service();
        let acme = CompanyId::new();
        for title in ["a", "b", "c"] {
            svc.create(input(acme, title)).await.unwrap();
        }

        let criteria = SkillSearchCriteria::builder()
            .with_company(acme)
            .with_pagination(1, 2)
            .build();
        let page = svc.search(criteria).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 3);
    }
}
