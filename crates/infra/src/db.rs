//! Postgres connection pool and schema bootstrap.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument};

use crate::repository::RepositoryError;
use crate::repository::postgres::map_sqlx_error;

const SCHEMA: &str = include_str!("../migrations/0001_livelum.sql");

/// Unique constraint names, shared by the SQL schema and the in-memory repository.
pub mod constraints {
    pub const COMPANIES_TAX_ID: &str = "companies_tax_id_key";
    pub const PEOPLE_NUMBER: &str = "people_company_number_key";
    pub const PEOPLE_DOCUMENTO: &str = "people_company_documento_key";
    pub const SKILLS_NUMBER: &str = "skills_company_number_key";
    pub const STAKEHOLDERS_NUMBER: &str = "stakeholders_company_number_key";
    pub const DOCUMENTS_NUMBER: &str = "documents_company_number_key";
    pub const RISKS_NUMBER: &str = "risks_company_number_key";
    pub const OBJECTIVES_NUMBER: &str = "objectives_company_number_key";

    /// Suffix shared by every per-company sequence number index.
    pub const NUMBER_SUFFIX: &str = "_company_number_key";
}

/// Open a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, RepositoryError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create missing tables and indexes.
#[instrument(skip(pool), err)]
pub async fn migrate(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;
    info!("schema applied");
    Ok(())
}
