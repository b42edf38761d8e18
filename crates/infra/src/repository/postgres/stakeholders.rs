use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use livelum_core::{CompanyId, CompanyScoped, Entity, SearchCriteria};
use livelum_stakeholders::{
    Stakeholder, StakeholderId, StakeholderRecord, StakeholderSearchCriteria, StakeholderSortField,
};

use super::{
    count_rows, delete_from, like_pattern, map_sqlx_error, next_number_in, number_from_db,
    number_to_db, parse_label, push_company, push_order_and_window,
};
use crate::repository::{Repository, RepositoryResult, SequencedRepository};

const TABLE: &str = "stakeholders";
const COLUMNS: &str =
    "id, company_id, number, nombre, tipo, requisitos, metodo_evaluacion, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStakeholderRepository {
    pool: PgPool,
}

impl PgStakeholderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &StakeholderSearchCriteria) {
    push_company(qb, criteria.company_id());
    if let Some(name) = criteria.name() {
        qb.push(" AND nombre ILIKE ").push_bind(like_pattern(name));
    }
    if let Some(kind) = criteria.kind() {
        qb.push(" AND tipo = ").push_bind(kind.as_str());
    }
}

fn sort_column(field: StakeholderSortField) -> &'static str {
    match field {
        StakeholderSortField::Number => "number",
        StakeholderSortField::Name => "LOWER(nombre)",
        StakeholderSortField::Kind => "tipo",
        StakeholderSortField::CreatedAt => "created_at",
    }
}

/// Stakeholder rows are trusted as stored; only the column types are checked.
fn stakeholder_from_row(row: &PgRow) -> RepositoryResult<Stakeholder> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode stakeholder", e);
    let record = StakeholderRecord {
        id: StakeholderId::from(row.try_get::<Uuid, _>("id").map_err(decode)?),
        company_id: CompanyId::from_uuid(row.try_get("company_id").map_err(decode)?),
        number: number_from_db(TABLE, row.try_get("number").map_err(decode)?)?,
        name: row.try_get("nombre").map_err(decode)?,
        kind: parse_label(TABLE, row.try_get::<&str, _>("tipo").map_err(decode)?)?,
        requirements: row.try_get("requisitos").map_err(decode)?,
        evaluation_method: row.try_get("metodo_evaluacion").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    };
    Ok(Stakeholder::from_primitives(record))
}

#[async_trait::async_trait]
impl Repository<Stakeholder, StakeholderSearchCriteria> for PgStakeholderRepository {
    #[instrument(skip(self, stakeholder), fields(id = %stakeholder.id(), company_id = %stakeholder.company_id()), err)]
    async fn save(&self, stakeholder: &Stakeholder) -> RepositoryResult<()> {
        let r = stakeholder.to_primitives();
        sqlx::query(
            r#"
            INSERT INTO stakeholders (
                id, company_id, number, nombre, tipo, requisitos, metodo_evaluacion, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                number = EXCLUDED.number,
                nombre = EXCLUDED.nombre,
                tipo = EXCLUDED.tipo,
                requisitos = EXCLUDED.requisitos,
                metodo_evaluacion = EXCLUDED.metodo_evaluacion,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(r.id.as_uuid())
        .bind(r.company_id.as_uuid())
        .bind(number_to_db(r.number)?)
        .bind(&r.name)
        .bind(r.kind.as_str())
        .bind(&r.requirements)
        .bind(&r.evaluation_method)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_stakeholder", e))?;
        debug!("stakeholder saved");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: &StakeholderId) -> RepositoryResult<Option<Stakeholder>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_stakeholder", e))?;
        row.as_ref().map(stakeholder_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_criteria(
        &self,
        criteria: &StakeholderSearchCriteria,
    ) -> RepositoryResult<Vec<Stakeholder>> {
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
            .map_err(|e| map_sqlx_error("search_stakeholders", e))?;
        debug!(count = rows.len(), "stakeholders found");
        rows.iter().map(stakeholder_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count_by_criteria(&self, criteria: &StakeholderSearchCriteria) -> RepositoryResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE} WHERE TRUE"));
        push_filters(&mut qb, criteria);
        count_rows(&self.pool, qb, "count_stakeholders").await
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: &StakeholderId) -> RepositoryResult<bool> {
        delete_from(&self.pool, TABLE, *id.as_uuid()).await
    }
}

#[async_trait::async_trait]
impl SequencedRepository<Stakeholder, StakeholderSearchCriteria> for PgStakeholderRepository {
    #[instrument(skip(self), fields(company_id = %company_id), err)]
    async fn next_number(&self, company_id: CompanyId) -> RepositoryResult<u32> {
        next_number_in(&self.pool, TABLE, company_id).await
    }
}
