//! Composition root: picks a repository backend and builds one service per
//! module. Built once at startup and shared with handlers as an
//! `Extension<Arc<AppServices>>`.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use livelum_companies::Company;
use livelum_documents::Document;
use livelum_infra::InMemoryRepository;
use livelum_infra::repository::postgres::{
    PgCompanyRepository, PgDocumentRepository, PgObjectiveRepository, PgPersonRepository, PgRiskRepository,
    PgSkillRepository, PgStakeholderRepository,
};
use livelum_infra::{RepositoryError, db};
use livelum_objectives::Objective;
use livelum_people::Person;
use livelum_risks::Risk;
use livelum_skills::Skill;
use livelum_stakeholders::Stakeholder;

use crate::app::use_cases::{
    CompanyService, DocumentService, ObjectiveService, PersonService, RiskService, SkillService,
    StakeholderService,
};
use crate::config::Storage;

#[derive(Clone)]
pub struct AppServices {
    pub companies: CompanyService,
    pub people: PersonService,
    pub skills: SkillService,
    pub stakeholders: StakeholderService,
    pub documents: DocumentService,
    pub risks: RiskService,
    pub objectives: ObjectiveService,
}

impl AppServices {
    /// In-process storage (dev/test). Data is lost on restart.
    pub fn in_memory() -> Self {
        Self {
            companies: CompanyService::new(InMemoryRepository::<Company>::arc()),
            people: PersonService::new(InMemoryRepository::<Person>::arc()),
            skills: SkillService::new(InMemoryRepository::<Skill>::arc()),
            stakeholders: StakeholderService::new(InMemoryRepository::<Stakeholder>::arc()),
            documents: DocumentService::new(InMemoryRepository::<Document>::arc()),
            risks: RiskService::new(InMemoryRepository::<Risk>::arc()),
            objectives: ObjectiveService::new(InMemoryRepository::<Objective>::arc()),
        }
    }

    /// Postgres-backed services sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            companies: CompanyService::new(Arc::new(PgCompanyRepository::new(pool.clone()))),
            people: PersonService::new(Arc::new(PgPersonRepository::new(pool.clone()))),
            skills: SkillService::new(Arc::new(PgSkillRepository::new(pool.clone()))),
            stakeholders: StakeholderService::new(Arc::new(PgStakeholderRepository::new(pool.clone()))),
            documents: DocumentService::new(Arc::new(PgDocumentRepository::new(pool.clone()))),
            risks: RiskService::new(Arc::new(PgRiskRepository::new(pool.clone()))),
            objectives: ObjectiveService::new(Arc::new(PgObjectiveRepository::new(pool))),
        }
    }
}

/// Build services for the configured storage. Postgres is connected and
/// migrated before any request is served.
pub async fn build_services(storage: &Storage) -> Result<AppServices, RepositoryError> {
    match storage {
        Storage::InMemory => {
            info!("using in-memory repositories");
            Ok(AppServices::in_memory())
        }
        Storage::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = db::connect(database_url, *max_connections).await?;
            db::migrate(&pool).await?;
            info!(max_connections, "using postgres repositories");
            Ok(AppServices::postgres(pool))
        }
    }
}
