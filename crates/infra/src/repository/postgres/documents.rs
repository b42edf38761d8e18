use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use livelum_core::{CompanyId, CompanyScoped, Entity, SearchCriteria};
use livelum_documents::{
    Document, DocumentId, DocumentRecord, DocumentSearchCriteria, DocumentSortField,
};

use super::{
    corrupt, count_rows, delete_from, like_pattern, map_sqlx_error, next_number_in, number_from_db,
    number_to_db, parse_label, push_company, push_order_and_window,
};
use crate::repository::{Repository, RepositoryResult, SequencedRepository};

const TABLE: &str = "documents";
const COLUMNS: &str =
    "id, company_id, number, code, title, kind, version, status, owner_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, criteria: &DocumentSearchCriteria) {
    push_company(qb, criteria.company_id());
    if let Some(search) = criteria.search() {
        let pattern = like_pattern(search);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR code ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(kind) = criteria.kind() {
        qb.push(" AND kind = ").push_bind(kind.as_str());
    }
    if let Some(status) = criteria.status() {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
}

fn sort_column(field: DocumentSortField) -> &'static str {
    match field {
        DocumentSortField::Number => "number",
        DocumentSortField::Code => "LOWER(code)",
        DocumentSortField::Title => "LOWER(title)",
        DocumentSortField::Kind => "kind",
        DocumentSortField::Status => "status",
        DocumentSortField::UpdatedAt => "updated_at",
    }
}

fn document_from_row(row: &PgRow) -> RepositoryResult<Document> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode document", e);
    let record = DocumentRecord {
        id: DocumentId::from(row.try_get::<Uuid, _>("id").map_err(decode)?),
        company_id: CompanyId::from_uuid(row.try_get("company_id").map_err(decode)?),
        number: number_from_db(TABLE, row.try_get("number").map_err(decode)?)?,
        code: row.try_get("code").map_err(decode)?,
        title: row.try_get("title").map_err(decode)?,
        kind: parse_label(TABLE, row.try_get::<&str, _>("kind").map_err(decode)?)?,
        version: row.try_get("version").map_err(decode)?,
        status: parse_label(TABLE, row.try_get::<&str, _>("status").map_err(decode)?)?,
        owner_id: row.try_get("owner_id").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    };
    Document::from_primitives(record).map_err(|e| corrupt(TABLE, e))
}

#[async_trait::async_trait]
impl Repository<Document, DocumentSearchCriteria> for PgDocumentRepository {
    #[instrument(skip(self, document), fields(id = %document.id(), company_id = %document.company_id()), err)]
    async fn save(&self, document: &Document) -> RepositoryResult<()> {
        let r = document.to_primitives();
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, company_id, number, code, title, kind, version, status, owner_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                number = EXCLUDED.number,
                code = EXCLUDED.code,
                title = EXCLUDED.title,
                kind = EXCLUDED.kind,
                version = EXCLUDED.version,
                status = EXCLUDED.status,
                owner_id = EXCLUDED.owner_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(r.id.as_uuid())
        .bind(r.company_id.as_uuid())
        .bind(number_to_db(r.number)?)
        .bind(&r.code)
        .bind(&r.title)
        .bind(r.kind.as_str())
        .bind(&r.version)
        .bind(r.status.as_str())
        .bind(&r.owner_id)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_document", e))?;
        debug!("document saved");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: &DocumentId) -> RepositoryResult<Option<Document>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_document", e))?;
        row.as_ref().map(document_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_criteria(&self, criteria: &DocumentSearchCriteria) -> RepositoryResult<Vec<Document>> {
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
            .map_err(|e| map_sqlx_error("search_documents", e))?;
        debug!(count = rows.len(), "documents found");
        rows.iter().map(document_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count_by_criteria(&self, criteria: &DocumentSearchCriteria) -> RepositoryResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {TABLE} WHERE TRUE"));
        push_filters(&mut qb, criteria);
        count_rows(&self.pool, qb, "count_documents").await
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: &DocumentId) -> RepositoryResult<bool> {
        delete_from(&self.pool, TABLE, *id.as_uuid()).await
    }
}

#[async_trait::async_trait]
impl SequencedRepository<Document, DocumentSearchCriteria> for PgDocumentRepository {
    #[instrument(skip(self), fields(company_id = %company_id), err)]
    async fn next_number(&self, company_id: CompanyId) -> RepositoryResult<u32> {
        next_number_in(&self.pool, TABLE, company_id).await
    }
}
