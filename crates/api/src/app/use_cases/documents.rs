use chrono::Utc;
use tracing::{info, instrument};

use livelum_core::{CompanyId, Entity, Sequenced};
use livelum_documents::{
    Document, DocumentId, DocumentKind, DocumentPatch, DocumentSearchCriteria, DocumentStatus, NewDocument,
};
use livelum_infra::DynSequencedRepository;

use super::{Page, ServiceError, ServiceResult, create_numbered, search_page};

const NOT_FOUND: &str = "Documento no encontrado";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDocument {
    pub code: String,
    pub title: String,
    pub kind: DocumentKind,
    pub version: Option<String>,
    pub owner_id: Option<String>,
    pub company_id: CompanyId,
}

impl CreateDocument {
    fn numbered(&self, number: u32) -> NewDocument {
        NewDocument {
            number,
            code: self.code.clone(),
            title: self.title.clone(),
            kind: self.kind,
            version: self.version.clone(),
            owner_id: self.owner_id.clone(),
            company_id: self.company_id,
        }
    }
}

#[derive(Clone)]
pub struct DocumentService {
    repo: DynSequencedRepository<Document, DocumentSearchCriteria>,
}

impl DocumentService {
    pub fn new(repo: DynSequencedRepository<Document, DocumentSearchCriteria>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(company_id = %input.company_id, code = %input.code), err)]
    pub async fn create(&self, input: CreateDocument) -> ServiceResult<Document> {
        let document = create_numbered(self.repo.as_ref(), input.company_id, |number| {
            Document::create(input.numbered(number), Utc::now())
        })
        .await?;
        info!(id = %document.id(), number = document.number(), "document created");
        Ok(document)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get(&self, id: DocumentId) -> ServiceResult<Document> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.into()))
    }

    #[instrument(skip(self), err)]
    pub async fn search(&self, criteria: DocumentSearchCriteria) -> ServiceResult<Page<Document>> {
        search_page(self.repo.as_ref(), &criteria).await
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    pub async fn update(&self, id: DocumentId, patch: DocumentPatch) -> ServiceResult<Document> {
        let mut document = self.get(id).await?;
        document.update(patch, Utc::now())?;
        self.repo.save(&document).await?;
        info!(version = document.version(), "document updated");
        Ok(document)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn change_status(&self, id: DocumentId, status: DocumentStatus) -> ServiceResult<Document> {
        let mut document = self.get(id).await?;
        document.set_status(status, Utc::now());
        self.repo.save(&document).await?;
        info!(status = status.as_str(), "document status changed");
        Ok(document)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete(&self, id: DocumentId) -> ServiceResult<()> {
        if !self.repo.delete(&id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.into()));
        }
        info!("document deleted");
        Ok(())
    }
}
