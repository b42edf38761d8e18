use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use livelum_core::{CompanyId, CompanyScoped, Entity, SearchCriteria};
use livelum_skills::{Skill, SkillId, SkillRecord, SkillSearchCriteria, SkillSortField};

use super::{
    corrupt, count_rows, delete_from, like_pattern, map_sqlx_error, next_number_in, number_from_db,
    number_to_db, parse_label, push_company, push_order_and_window,
};
use crate::repository::{Repository, RepositoryResult, SequencedRepository};

const TABLE: &str = "skills";
const COLUMNS: &str =
    "id, company_id, number, title, description, category, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgSkillRepository {
    pool: PgPool,
}

impl PgSkillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &SkillSearchCriteria) {
    push_company(qb, criteria.company_id());
    if let Some(title) = criteria.title() {
        qb.push(" AND title ILIKE ").push_bind(like_pattern(title));
    }
    if let Some(category) = criteria.category() {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(status) = criteria.status() {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
}

fn sort_column(field: SkillSortField) -> &'static str {
    match field {
        SkillSortField::Number => "number",
        SkillSortField::Title => "LOWER(title)",
        SkillSortField::Category => "category",
        SkillSortField::Status => "status",
        SkillSortField::CreatedAt => "created_at",
        SkillSortField::UpdatedAt => "updated_at",
    }
}

fn skill_from_row(row: &PgRow) -> RepositoryResult<Skill> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode skill", e);
    let record = SkillRecord {
        id: SkillId::from(row.try_get::<Uuid, _>("id").map_err(decode)?),
        company_id: CompanyId::from_uuid(row.try_get("company_id").map_err(decode)?),
        number: number_from_db(TABLE, row.try_get("number").map_err(decode)?)?,
        title: row.try_get("title").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        category: parse_label(TABLE, row.try_get::<&str, _>("category").map_err(decode)?)?,
        status: parse_label(TABLE, row.try_get::<&str, _>("status").map_err(decode)?)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    };
    Skill::from_primitives(record).map_err(|e| corrupt(TABLE, e))
}

#[async_trait::async_trait]
impl Repository<Skill, SkillSearchCriteria> for PgSkillRepository {
    #[instrument(skip(self, skill), fields(id = %skill.id(), company_id = %skill.company_id()), err)]
    async fn save(&self, skill: &Skill) -> RepositoryResult<()> {
        let r = skill.to_primitives();
        sqlx::query(
            r#"
            INSERT INTO skills (id, company_id, number, title, description, category, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                number = EXCLUDED.number,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(r.id.as_uuid())
        .bind(r.company_id.as_uuid())
        .bind(number_to_db(r.number)?)
        .bind(&r.title)
        .bind(&r.description)
        .bind(r.category.as_str())
        .bind(r.status.as_str())
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_skill", e))?;
        debug!("skill saved");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: &SkillId) -> RepositoryResult<Option<Skill>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_skill", e))?;
        row.as_ref().map(skill_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_criteria(&self, criteria: &SkillSearchCriteria) -> RepositoryResult<Vec<Skill>> {
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
            .map_err(|e| map_sqlx_error("search_skills", e))?;
        debug!(count = rows.len(), "skills found");
        rows.iter().map(skill_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count_by_criteria(&self, criteria: &SkillSearchCriteria) -> RepositoryResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE} WHERE TRUE"));
        push_filters(&mut qb, criteria);
        count_rows(&self.pool, qb, "count_skills").await
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: &SkillId) -> RepositoryResult<bool> {
        delete_from(&self.pool, TABLE, *id.as_uuid()).await
    }
}

#[async_trait::async_trait]
impl SequencedRepository<Skill, SkillSearchCriteria> for PgSkillRepository {
    #[instrument(skip(self), fields(company_id = %company_id), err)]
    async fn next_number(&self, company_id: CompanyId) -> RepositoryResult<u32> {
        next_number_in(&self.pool, TABLE, company_id).await
    }
}

