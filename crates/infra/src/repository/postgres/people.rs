use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use livelum_core::{CompanyId, CompanyScoped, Entity, SearchCriteria};
use livelum_people::{Person, PersonId, PersonRecord, PersonSearchCriteria, PersonSortField};

use super::{
    corrupt, count_rows, delete_from, like_pattern, map_sqlx_error, next_number_in, number_from_db,
    number_to_db, parse_label, push_company, push_order_and_window,
};
use crate::repository::{Repository, RepositoryResult, SequencedRepository};

const TABLE: &str = "people";
const COLUMNS: &str = "id, company_id, number, first_name, last_name, documento, email, phone, \
                       position_ids, status, hire_date, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgPersonRepository {
    pool: PgPool,
}

impl PgPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &PersonSearchCriteria) {
    push_company(qb, criteria.company_id());
    if let Some(search) = criteria.search() {
        let pattern = like_pattern(search);
        qb.push(" AND ((first_name || ' ' || last_name) ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR documento ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = criteria.status() {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(position) = criteria.position_id() {
        qb.push(" AND ")
            .push_bind(position.to_string())
            .push(" = ANY(position_ids)");
    }
}

fn sort_column(field: PersonSortField) -> &'static str {
    match field {
        PersonSortField::Number => "number",
        PersonSortField::FirstName => "LOWER(first_name)",
        PersonSortField::LastName => "LOWER(last_name)",
        PersonSortField::Document => "documento",
        PersonSortField::Status => "status",
        PersonSortField::CreatedAt => "created_at",
    }
}

fn person_from_row(row: &PgRow) -> RepositoryResult<Person> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode person", e);
    let record = PersonRecord {
        id: PersonId::from(row.try_get::<Uuid, _>("id").map_err(decode)?),
        company_id: CompanyId::from_uuid(row.try_get("company_id").map_err(decode)?),
        number: number_from_db(TABLE, row.try_get("number").map_err(decode)?)?,
        first_name: row.try_get("first_name").map_err(decode)?,
        last_name: row.try_get("last_name").map_err(decode)?,
        document: row.try_get("documento").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        phone: row.try_get("phone").map_err(decode)?,
        position_ids: row.try_get("position_ids").map_err(decode)?,
        status: parse_label(TABLE, row.try_get::<&str, _>("status").map_err(decode)?)?,
        hire_date: row.try_get("hire_date").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    };
    Person::from_primitives(record).map_err(|e| corrupt(TABLE, e))
}

#[async_trait::async_trait]
impl Repository<Person, PersonSearchCriteria> for PgPersonRepository {
    #[instrument(skip(self, person), fields(id = %person.id(), company_id = %person.company_id()), err)]
    async fn save(&self, person: &Person) -> RepositoryResult<()> {
        let r = person.to_primitives();
        sqlx::query(
            r#"
            INSERT INTO people (
                id, company_id, number, first_name, last_name, documento, email, phone,
                position_ids, status, hire_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                number = EXCLUDED.number,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                documento = EXCLUDED.documento,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                position_ids = EXCLUDED.position_ids,
                status = EXCLUDED.status,
                hire_date = EXCLUDED.hire_date,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(r.id.as_uuid())
        .bind(r.company_id.as_uuid())
        .bind(number_to_db(r.number)?)
        .bind(&r.first_name)
        .bind(&r.last_name)
        .bind(&r.document)
        .bind(&r.email)
        .bind(&r.phone)
        .bind(&r.position_ids)
        .bind(r.status.as_str())
        .bind(r.hire_date)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_person", e))?;
        debug!("person saved");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: &PersonId) -> RepositoryResult<Option<Person>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_person", e))?;
        row.as_ref().map(person_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_criteria(&self, criteria: &PersonSearchCriteria) -> RepositoryResult<Vec<Person>> {
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
            .map_err(|e| map_sqlx_error("search_people", e))?;
        debug!(count = rows.len(), "people found");
        rows.iter().map(person_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count_by_criteria(&self, criteria: &PersonSearchCriteria) -> RepositoryResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE} WHERE TRUE"));
        push_filters(&mut qb, criteria);
        count_rows(&self.pool, qb, "count_people").await
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: &PersonId) -> RepositoryResult<bool> {
        delete_from(&self.pool, TABLE, *id.as_uuid()).await
    }
}

#[async_trait::async_trait]
impl SequencedRepository<Person, PersonSearchCriteria> for PgPersonRepository {
    #[instrument(skip(self), fields(company_id = %company_id), err)]
    async fn next_number(&self, company_id: CompanyId) -> RepositoryResult<u32> {
        next_number_in(&self.pool, TABLE, company_id).await
    }
}
