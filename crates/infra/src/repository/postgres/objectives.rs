use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use livelum_core::{CompanyId, CompanyScoped, Entity, SearchCriteria};
use livelum_objectives::{
    Objective, ObjectiveId, ObjectiveRecord, ObjectiveSearchCriteria, ObjectiveSortField,
};

use super::{
    corrupt, count_rows, delete_from, like_pattern, map_sqlx_error, next_number_in, number_from_db,
    number_to_db, parse_label, push_company, push_order_and_window,
};
use crate::repository::{Repository, RepositoryResult, SequencedRepository};

const TABLE: &str = "objectives";
const COLUMNS: &str = "id, company_id, number, title, description, target_value, current_value, \
                       unit, due_date, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgObjectiveRepository {
    pool: PgPool,
}

impl PgObjectiveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &ObjectiveSearchCriteria) {
    push_company(qb, criteria.company_id());
    if let Some(title) = criteria.title() {
        qb.push(" AND title ILIKE ").push_bind(like_pattern(title));
    }
    if let Some(status) = criteria.status() {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
}

/// Undated objectives sort last when ascending, first when descending,
/// matching the in-memory ordering.
fn sort_column(field: ObjectiveSortField) -> &'static str {
    match field {
        ObjectiveSortField::Number => "number",
        ObjectiveSortField::Title => "LOWER(title)",
        ObjectiveSortField::DueDate => "due_date",
        ObjectiveSortField::Status => "status",
        ObjectiveSortField::CreatedAt => "created_at",
    }
}

fn objective_from_row(row: &PgRow) -> RepositoryResult<Objective> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode objective", e);
    let record = ObjectiveRecord {
        id: ObjectiveId::from(row.try_get::<Uuid, _>("id").map_err(decode)?),
        company_id: CompanyId::from_uuid(row.try_get("company_id").map_err(decode)?),
        number: number_from_db(TABLE, row.try_get("number").map_err(decode)?)?,
        title: row.try_get("title").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        target_value: row.try_get("target_value").map_err(decode)?,
        current_value: row.try_get("current_value").map_err(decode)?,
        unit: row.try_get("unit").map_err(decode)?,
        due_date: row.try_get("due_date").map_err(decode)?,
        status: parse_label(TABLE, row.try_get::<&str, _>("status").map_err(decode)?)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    };
    Objective::from_primitives(record).map_err(|e| corrupt(TABLE, e))
}

#[async_trait::async_trait]
impl Repository<Objective, ObjectiveSearchCriteria> for PgObjectiveRepository {
    #[instrument(skip(self, objective), fields(id = %objective.id(), company_id = %objective.company_id()), err)]
    async fn save(&self, objective: &Objective) -> RepositoryResult<()> {
        let r = objective.to_primitives();
        sqlx::query(
            r#"
            INSERT INTO objectives (
                id, company_id, number, title, description, target_value, current_value, unit,
                due_date, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                number = EXCLUDED.number,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                target_value = EXCLUDED.target_value,
                current_value = EXCLUDED.current_value,
                unit = EXCLUDED.unit,
                due_date = EXCLUDED.due_date,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(r.id.as_uuid())
        .bind(r.company_id.as_uuid())
        .bind(number_to_db(r.number)?)
        .bind(&r.title)
        .bind(&r.description)
        .bind(r.target_value)
        .bind(r.current_value)
        .bind(&r.unit)
        .bind(r.due_date)
        .bind(r.status.as_str())
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_objective", e))?;
        debug!("objective saved");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: &ObjectiveId) -> RepositoryResult<Option<Objective>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_objective", e))?;
        row.as_ref().map(objective_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_criteria(
        &self,
        criteria: &ObjectiveSearchCriteria,
    ) -> RepositoryResult<Vec<Objective>> {
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
            .map_err(|e| map_sqlx_error("search_objectives", e))?;
        debug!(count = rows.len(), "objectives found");
        rows.iter().map(objective_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count_by_criteria(&self, criteria: &ObjectiveSearchCriteria) -> RepositoryResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE} WHERE TRUE"));
        push_filters(&mut qb, criteria);
        count_rows(&self.pool, qb, "count_objectives").await
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: &ObjectiveId) -> RepositoryResult<bool> {
        delete_from(&self.pool, TABLE, *id.as_uuid()).await
    }
}

#[async_trait::async_trait]
impl SequencedRepository<Objective, ObjectiveSearchCriteria> for PgObjectiveRepository {
    #[instrument(skip(self), fields(company_id = %company_id), err)]
    async fn next_number(&self, company_id: CompanyId) -> RepositoryResult<u32> {
        next_number_in(&self.pool, TABLE, company_id).await
    }
}
