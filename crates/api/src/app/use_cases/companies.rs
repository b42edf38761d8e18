use chrono::Utc;
use tracing::{info, instrument};

use livelum_companies::{Company, CompanyPatch, CompanySearchCriteria, CompanyStatus, NewCompany};
use livelum_core::CompanyId;
use livelum_infra::DynRepository;

use super::{Page, ServiceError, ServiceResult, search_page};

const NOT_FOUND: &str = "Empresa no encontrada";

/// Companies are the tenants; they carry no number and no company scope.
#[derive(Clone)]
pub struct CompanyService {
    repo: DynRepository<Company, CompanySearchCriteria>,
}

impl CompanyService {
    pub fn new(repo: DynRepository<Company, CompanySearchCriteria>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, new), fields(tax_id = %new.tax_id), err)]
    pub async fn create(&self, new: NewCompany) -> ServiceResult<Company> {
        let company = Company::create(new, Utc::now())?;
        self.repo.save(&company).await?;
        info!(id = %company.to_primitives().id, "company created");
        Ok(company)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get(&self, id: CompanyId) -> ServiceResult<Company> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.into()))
    }

    #[instrument(skip(self), err)]
    pub async fn search(&self, criteria: CompanySearchCriteria) -> ServiceResult<Page<Company>> {
        search_page(self.repo.as_ref(), &criteria).await
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    pub async fn update(&self, id: CompanyId, patch: CompanyPatch) -> ServiceResult<Company> {
        let mut company = self.get(id).await?;
        company.update(patch, Utc::now())?;
        self.repo.save(&company).await?;
        info!("company updated");
        Ok(company)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn change_status(&self, id: CompanyId, status: CompanyStatus) -> ServiceResult<Company> {
        let mut company = self.get(id).await?;
        company.set_status(status, Utc::now());
        self.repo.save(&company).await?;
        info!(status = status.as_str(), "company status changed");
        Ok(company)
    }

    /// Records scoped to the company are left in place.
    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete(&self, id: CompanyId) -> ServiceResult<()> {
        if !self.repo.delete(&id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.into()));
        }
        info!("company deleted");
        Ok(())
    }
}
