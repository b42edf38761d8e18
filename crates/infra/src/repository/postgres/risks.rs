use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use livelum_core::{CompanyId, CompanyScoped, Entity, SearchCriteria};
use livelum_risks::{Risk, RiskId, RiskRecord, RiskSearchCriteria, RiskSortField};

use super::{
    corrupt, count_rows, delete_from, like_pattern, map_sqlx_error, next_number_in, number_from_db,
    number_to_db, parse_label, push_company, push_order_and_window,
};
use crate::repository::{Repository, RepositoryResult, SequencedRepository};

const TABLE: &str = "risks";
const COLUMNS: &str = "id, company_id, number, title, description, probability, impact, status, \
                       owner_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgRiskRepository {
    pool: PgPool,
}

impl PgRiskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &RiskSearchCriteria) {
    push_company(qb, criteria.company_id());
    if let Some(title) = criteria.title() {
        qb.push(" AND title ILIKE ").push_bind(like_pattern(title));
    }
    if let Some(status) = criteria.status() {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(level) = criteria.level() {
        let (lo, hi) = level.score_range();
        qb.push(" AND probability * impact BETWEEN ")
            .push_bind(i16::from(lo))
            .push(" AND ")
            .push_bind(i16::from(hi));
    }
}

fn sort_column(field: RiskSortField) -> &'static str {
    match field {
        RiskSortField::Number => "number",
        RiskSortField::Title => "LOWER(title)",
        RiskSortField::Score => "probability * impact",
        RiskSortField::Status => "status",
        RiskSortField::CreatedAt => "created_at",
    }
}

fn rating_from_db(value: i16) -> RepositoryResult<u8> {
    u8::try_from(value).map_err(|_| corrupt(TABLE, format!("rating {value} out of range")))
}

fn risk_from_row(row: &PgRow) -> RepositoryResult<Risk> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode risk", e);
    let record = RiskRecord {
        id: RiskId::from(row.try_get::<Uuid, _>("id").map_err(decode)?),
        company_id: CompanyId::from_uuid(row.try_get("company_id").map_err(decode)?),
        number: number_from_db(TABLE, row.try_get("number").map_err(decode)?)?,
        title: row.try_get("title").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        probability: rating_from_db(row.try_get("probability").map_err(decode)?)?,
        impact: rating_from_db(row.try_get("impact").map_err(decode)?)?,
        status: parse_label(TABLE, row.try_get::<&str, _>("status").map_err(decode)?)?,
        owner_id: row.try_get("owner_id").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    };
    Risk::from_primitives(record).map_err(|e| corrupt(TABLE, e))
}

#[async_trait::async_trait]
impl Repository<Risk, RiskSearchCriteria> for PgRiskRepository {
    #[instrument(skip(self, risk), fields(id = %risk.id(), company_id = %risk.company_id()), err)]
    async fn save(&self, risk: &Risk) -> RepositoryResult<()> {
        let r = risk.to_primitives();
        sqlx::query(
            r#"
            INSERT INTO risks (
                id, company_id, number, title, description, probability, impact, status, owner_id,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                number = EXCLUDED.number,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                probability = EXCLUDED.probability,
                impact = EXCLUDED.impact,
                status = EXCLUDED.status,
                owner_id = EXCLUDED.owner_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(r.id.as_uuid())
        .bind(r.company_id.as_uuid())
        .bind(number_to_db(r.number)?)
        .bind(&r.title)
        .bind(&r.description)
        .bind(i16::from(r.probability))
        .bind(i16::from(r.impact))
        .bind(r.status.as_str())
        .bind(&r.owner_id)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_risk", e))?;
        debug!("risk saved");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: &RiskId) -> RepositoryResult<Option<Risk>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_risk", e))?;
        row.as_ref().map(risk_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_criteria(&self, criteria: &RiskSearchCriteria) -> RepositoryResult<Vec<Risk>> {
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
            .map_err(|e| map_sqlx_error("search_risks", e))?;
        debug!(count = rows.len(), "risks found");
        rows.iter().map(risk_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count_by_criteria(&self, criteria: &RiskSearchCriteria) -> RepositoryResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE} WHERE TRUE"));
        push_filters(&mut qb, criteria);
        count_rows(&self.pool, qb, "count_risks").await
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: &RiskId) -> RepositoryResult<bool> {
        delete_from(&self.pool, TABLE, *id.as_uuid()).await
    }
}

#[async_trait::async_trait]
impl SequencedRepository<Risk, RiskSearchCriteria> for PgRiskRepository {
    #[instrument(skip(self), fields(company_id = %company_id), err)]
    async fn next_number(&self, company_id: CompanyId) -> RepositoryResult<u32> {
        next_number_in(&self.pool, TABLE, company_id).await
    }
}
