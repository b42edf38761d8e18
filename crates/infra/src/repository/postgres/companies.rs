use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, instrument};

use livelum_companies::{Company, CompanyRecord, CompanySearchCriteria, CompanySortField};
use livelum_core::{CompanyId, Entity, SearchCriteria};

use super::{
    corrupt, count_rows, delete_from, like_pattern, map_sqlx_error, parse_label,
    push_order_and_window,
};
use crate::repository::{Repository, RepositoryResult};

const TABLE: &str = "companies";
const COLUMNS: &str = "id, name, tax_id, email, phone, address, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &CompanySearchCriteria) {
    if let Some(search) = criteria.search() {
        let pattern = like_pattern(search);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR tax_id ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = criteria.status() {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
}

fn sort_column(field: CompanySortField) -> &'static str {
    match field {
        CompanySortField::Name => "LOWER(name)",
        CompanySortField::TaxId => "tax_id",
        CompanySortField::Status => "status",
        CompanySortField::CreatedAt => "created_at",
    }
}

fn company_from_row(row: &PgRow) -> RepositoryResult<Company> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode company", e);
    let record = CompanyRecord {
        id: CompanyId::from_uuid(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        tax_id: row.try_get("tax_id").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        phone: row.try_get("phone").map_err(decode)?,
        address: row.try_get("address").map_err(decode)?,
        status: parse_label(TABLE, row.try_get::<&str, _>("status").map_err(decode)?)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    };
    Company::from_primitives(record).map_err(|e| corrupt(TABLE, e))
}

#[async_trait::async_trait]
impl Repository<Company, CompanySearchCriteria> for PgCompanyRepository {
    #[instrument(skip(self, company), fields(id = %company.id()), err)]
    async fn save(&self, company: &Company) -> RepositoryResult<()> {
        let r = company.to_primitives();
        sqlx::query(
            r#"
            INSERT INTO companies (id, name, tax_id, email, phone, address, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                tax_id = EXCLUDED.tax_id,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(r.id.as_uuid())
        .bind(&r.name)
        .bind(&r.tax_id)
        .bind(&r.email)
        .bind(&r.phone)
        .bind(&r.address)
        .bind(r.status.as_str())
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_company", e))?;
        debug!("company saved");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: &CompanyId) -> RepositoryResult<Option<Company>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_company", e))?;
        row.as_ref().map(company_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_criteria(&self, criteria: &CompanySearchCriteria) -> RepositoryResult<Vec<Company>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM {TABLE} WHERE TRUE"));
        push_filters(&mut qb, criteria);
        push_order_and_window(
            &mut qb,
            sort_column(criteria.sort_by()),
            criteria.sort_order(),
            criteria.pagination(),
        );
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("search_companies", e))?;
        debug!(count = rows.len(), "companies found");
        rows.iter().map(company_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count_by_criteria(&self, criteria: &CompanySearchCriteria) -> RepositoryResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE} WHERE TRUE"));
        push_filters(&mut qb, criteria);
        count_rows(&self.pool, qb, "count_companies").await
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: &CompanyId) -> RepositoryResult<bool> {
        delete_from(&self.pool, TABLE, *id.as_uuid()).await
    }
}
