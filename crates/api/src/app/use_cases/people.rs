use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};

use livelum_core::{CompanyId, Entity, Sequenced};
use livelum_infra::DynSequencedRepository;
use livelum_people::{NewPerson, Person, PersonId, PersonPatch, PersonSearchCriteria, PersonStatus};

use super::{Page, ServiceError, ServiceResult, create_numbered, search_page};

const NOT_FOUND: &str = "Persona no encontrada";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePerson {
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position_ids: Vec<String>,
    pub hire_date: Option<NaiveDate>,
    pub company_id: CompanyId,
}

impl CreatePerson {
    fn numbered(&self, number: u32) -> NewPerson {
        NewPerson {
            number,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            document: self.document.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            position_ids: self.position_ids.clone(),
            hire_date: self.hire_date,
            company_id: self.company_id,
        }
    }
}

#[derive(Clone)]
pub struct PersonService {
    repo: DynSequencedRepository<Person, PersonSearchCriteria>,
}

impl PersonService {
    pub fn new(repo: DynSequencedRepository<Person, PersonSearchCriteria>) -> Self {
        Self { repo }
    }

    /// A duplicate `documento` within the company is a conflict and is not retried.
    #[instrument(skip(self, input), fields(company_id = %input.company_id), err)]
    pub async fn create(&self, input: CreatePerson) -> ServiceResult<Person> {
        let person = create_numbered(self.repo.as_ref(), input.company_id, |number| {
            Person::create(input.numbered(number), Utc::now())
        })
        .await?;
        info!(id = %person.id(), number = person.number(), "person created");
        Ok(person)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get(&self, id: PersonId) -> ServiceResult<Person> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.into()))
    }

    #[instrument(skip(self), err)]
    pub async fn search(&self, criteria: PersonSearchCriteria) -> ServiceResult<Page<Person>> {
        search_page(self.repo.as_ref(), &criteria).await
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    pub async fn update(&self, id: PersonId, patch: PersonPatch) -> ServiceResult<Person> {
        let mut person = self.get(id).await?;
        person.update(patch, Utc::now())?;
        self.repo.save(&person).await?;
        info!("person updated");
        Ok(person)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn change_status(&self, id: PersonId, status: PersonStatus) -> ServiceResult<Person> {
        let mut person = self.get(id).await?;
        person.set_status(status, Utc::now());
        self.repo.save(&person).await?;
        info!(status = status.as_str(), "person status changed");
        Ok(person)
    }

    /// Replace the person's positions.
    #[instrument(skip(self, position_ids), fields(id = %id, positions = position_ids.len()), err)]
    pub async fn assign_positions(&self, id: PersonId, position_ids: Vec<String>) -> ServiceResult<Person> {
        let mut person = self.get(id).await?;
        person.assign_positions(position_ids, Utc::now())?;
        self.repo.save(&person).await?;
        info!("positions assigned");
        Ok(person)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete(&self, id: PersonId) -> ServiceResult<()> {
        if !self.repo.delete(&id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.into()));
        }
        info!("person deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use livelum_infra::InMemoryRepository;

    use super::*;

    fn service() -> PersonService {
        PersonService::new(InMemoryRepository::<Person>::arc())
    }

    fn input(company_id: CompanyId, document: &str) -> CreatePerson {
        CreatePerson {
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            document: document.into(),
            email: None,
            phone: None,
            position_ids: vec![],
            hire_date: None,
            company_id,
        }
    }

    #[tokio::test]
    async fn duplicate_document_is_a_conflict() {
        let svc = service();
        let acme = CompanyId::new();
        svc.create(input(acme, "12345678")).await.unwrap();

        let err = svc.create(input(acme, "12345678")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Same document in another company is fine.
        svc.create(input(CompanyId::new(), "12345678")).await.unwrap();
    }

    #[tokio::test]
    async fn positions_are_replaced() {
        let svc = service();
        let person = svc.create(input(CompanyId::new(), "1")).await.unwrap();

        let updated = svc
            .assign_positions(*person.id(), vec!["p-1".into(), "p-2".into(), "p-1".into()])
            .await
            .unwrap();
        assert_eq!(updated.position_ids(), ["p-1".to_string(), "p-2".to_string()]);
    }

    #[tokio::test]
    async fn blank_position_is_rejected() {
        let svc = service();
        let person = svc.create(input(CompanyId::new(), "1")).await.unwrap();

        let err = svc.assign_positions(*person.id(), vec![" ".into()]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn status_change_is_unrestricted() {
        let svc = service();
        let person = svc.create(input(CompanyId::new(), "1")).await.unwrap();
        let id = *person.id();

        svc.change_status(id, PersonStatus::Terminated).await.unwrap();
        let back = svc.change_status(id, PersonStatus::Active).await.unwrap();
        assert!(back.is_active());
    }
}
