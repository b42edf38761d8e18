use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use livelum_core::criteria::{count, select};
use livelum_core::{CompanyId, Entity, SearchCriteria, Sequenced};

use super::{Repository, RepositoryError, RepositoryResult, SequencedRepository, UniqueKeys};

/// In-process repository for tests/dev.
///
/// Unique indexes are checked under the write lock, so two concurrent saves
/// of the same key cannot both succeed.
#[derive(Debug)]
pub struct InMemoryRepository<E: Entity> {
    inner: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, HashMap<E::Id, E>>> {
        self.inner
            .read()
            .map_err(|_| RepositoryError::Storage("in-memory store lock poisoned".into()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, HashMap<E::Id, E>>> {
        self.inner
            .write()
            .map_err(|_| RepositoryError::Storage("in-memory store lock poisoned".into()))
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<E, C> Repository<E, C> for InMemoryRepository<E>
where
    E: Entity + UniqueKeys + Clone + Send + Sync + 'static,
    C: SearchCriteria<E> + 'static,
{
    async fn save(&self, entity: &E) -> RepositoryResult<()> {
        let mut map = self.write()?;
        let keys = entity.unique_keys();
        for (id, other) in map.iter() {
            if id == entity.id() {
                continue;
            }
            if let Some(taken) = other.unique_keys().into_iter().find(|k| keys.contains(k)) {
                debug!(constraint = taken.constraint, "unique index rejected save");
                return Err(RepositoryError::Conflict(taken.constraint.to_string()));
            }
        }
        map.insert(entity.id().clone(), entity.clone());
        debug!(id = ?entity.id(), "saved");
        Ok(())
    }

    async fn find_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_criteria(&self, criteria: &C) -> RepositoryResult<Vec<E>> {
        let map = self.read()?;
        let found = select(map.values().cloned(), criteria);
        debug!(count = found.len(), "criteria search");
        Ok(found)
    }

    async fn count_by_criteria(&self, criteria: &C) -> RepositoryResult<u64> {
        Ok(count(self.read()?.values(), criteria))
    }

    async fn delete(&self, id: &E::Id) -> RepositoryResult<bool> {
        let removed = self.write()?.remove(id).is_some();
        debug!(?id, removed, "delete");
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl<E, C> SequencedRepository<E, C> for InMemoryRepository<E>
where
    E: Sequenced + UniqueKeys + Clone + Send + Sync + 'static,
    C: SearchCriteria<E> + 'static,
{
    async fn next_number(&self, company_id: CompanyId) -> RepositoryResult<u32> {
        let max = self
            .read()?
            .values()
            .filter(|e| e.company_id() == company_id)
            .map(|e| e.number())
            .max()
            .unwrap_or(0);
        max.checked_add(1).ok_or_else(|| {
            RepositoryError::Storage(format!("sequence exhausted for company {company_id}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use livelum_core::SortOrder;
    use livelum_people::{NewPerson, Person, PersonSearchCriteria, PersonStatus};
    use livelum_skills::{NewSkill, Skill, SkillCategory, SkillSearchCriteria, SkillSortField};

    use crate::db::constraints;

    type SkillRepo = dyn SequencedRepository<Skill, SkillSearchCriteria>;

    fn skill(company_id: CompanyId, number: u32, title: &str) -> Skill {
        Skill::create(
            NewSkill {
                number,
                title: title.into(),
                description: None,
                category: SkillCategory::Technical,
                company_id,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn person(company_id: CompanyId, number: u32, document: &str) -> Person {
        Person::create(
            NewPerson {
                number,
                first_name: "Ana".into(),
                last_name: "Pérez".into(),
                document: document.into(),
                email: None,
                phone: None,
                position_ids: vec![],
                hire_date: None,
                company_id,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_is_an_upsert_by_id() {
        let repo: Arc<SkillRepo> = InMemoryRepository::<Skill>::arc();
        let company = CompanyId::new();
        let mut s = skill(company, 1, "Soldadura");
        repo.save(&s).await.unwrap();

        s.deactivate(Utc::now());
        repo.save(&s).await.unwrap();

        let all = repo.find_by_criteria(&SkillSearchCriteria::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_active());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_of_same_number_conflict_once() {
        let repo: Arc<SkillRepo> = InMemoryRepository::<Skill>::arc();
        let company = CompanyId::new();

        let a = skill(company, 1, "A");
        let b = skill(company, 1, "B");
        let (ra, rb) = {
            let (r1, r2) = (repo.clone(), repo.clone());
            tokio::join!(
                tokio::spawn(async move { r1.save(&a).await }),
                tokio::spawn(async move { r2.save(&b).await }),
            )
        };
        let results = [ra.unwrap(), rb.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let err = results.into_iter().find_map(Result::err).unwrap();
        assert_eq!(err, RepositoryError::Conflict(constraints::SKILLS_NUMBER.into()));
        assert!(err.is_number_conflict());
    }

    #[tokio::test]
    async fn next_number_past_u32_max_is_a_storage_error() {
        let repo: Arc<SkillRepo> = InMemoryRepository::<Skill>::arc();
        let company = CompanyId::new();
        repo.save(&skill(company, u32::MAX, "Último")).await.unwrap();

        let err = repo.next_number(company).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
        assert_eq!(repo.next_number(CompanyId::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn same_number_in_other_company_is_fine() {
        let repo: Arc<SkillRepo> = InMemoryRepository::<Skill>::arc();
        repo.save(&skill(CompanyId::new(), 1, "A")).await.unwrap();
        repo.save(&skill(CompanyId::new(), 1, "B")).await.unwrap();
    }

    #[tokio::test]
    async fn next_number_is_scoped_per_company() {
        let repo: Arc<SkillRepo> = InMemoryRepository::<Skill>::arc();
        let (c1, c2) = (CompanyId::new(), CompanyId::new());
        assert_eq!(repo.next_number(c1).await.unwrap(), 1);

        repo.save(&skill(c1, 1, "A")).await.unwrap();
        repo.save(&skill(c1, 7, "B")).await.unwrap();
        assert_eq!(repo.next_number(c1).await.unwrap(), 8);
        assert_eq!(repo.next_number(c2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn search_filters_sorts_and_counts_without_pagination() {
        let repo: Arc<SkillRepo> = InMemoryRepository::<Skill>::arc();
        let company = CompanyId::new();
        for (n, title) in [(1, "Excel avanzado"), (2, "Liderazgo"), (3, "excel básico"), (4, "Inglés")] {
            repo.save(&skill(company, n, title)).await.unwrap();
        }
        repo.save(&skill(CompanyId::new(), 1, "Excel")).await.unwrap();

        let criteria = SkillSearchCriteria::builder()
            .with_company(company)
            .with_title(Some("EXCEL".into()))
            .with_sort(SkillSortField::Title, SortOrder::Desc)
            .with_pagination(1, 1)
            .build();

        let page = repo.find_by_criteria(&criteria).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title(), "excel básico");
        assert_eq!(repo.count_by_criteria(&criteria).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let repo: Arc<SkillRepo> = InMemoryRepository::<Skill>::arc();
        let s = skill(CompanyId::new(), 1, "A");
        repo.save(&s).await.unwrap();

        assert!(repo.delete(s.id()).await.unwrap());
        assert!(!repo.delete(s.id()).await.unwrap());
        assert!(repo.find_by_id(s.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_documento_is_not_a_number_conflict() {
        let repo = InMemoryRepository::<Person>::new();
        let company = CompanyId::new();
        Repository::<Person, PersonSearchCriteria>::save(&repo, &person(company, 1, "123"))
            .await
            .unwrap();

        let err = Repository::<Person, PersonSearchCriteria>::save(&repo, &person(company, 2, "123"))
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::Conflict(constraints::PEOPLE_DOCUMENTO.into()));
        assert!(!err.is_number_conflict());

        let active = PersonSearchCriteria::builder()
            .with_status(Some(PersonStatus::Active))
            .build();
        assert_eq!(repo.count_by_criteria(&active).await.unwrap(), 1);
    }
}
