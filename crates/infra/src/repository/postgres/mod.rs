//! Postgres-backed repositories.
//!
//! One table per module (see `migrations/0001_livelum.sql`). Filters are
//! assembled with [`sqlx::QueryBuilder`] so every user-supplied value is a
//! bind parameter; only column names and sort directions are pushed as SQL.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation) | `23505` | `Conflict(constraint)` |
//! | Database (other) | any | `Storage` |
//! | PoolClosed / network / other | N/A | `Storage` |
//! | Row decode failure | N/A | `Corrupt` |

mod companies;
mod documents;
mod objectives;
mod people;
mod risks;
mod skills;
mod stakeholders;

pub use companies::PgCompanyRepository;
pub use documents::PgDocumentRepository;
pub use objectives::PgObjectiveRepository;
pub use people::PgPersonRepository;
pub use risks::PgRiskRepository;
pub use skills::PgSkillRepository;
pub use stakeholders::PgStakeholderRepository;

use core::fmt::Display;
use core::str::FromStr;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;
use uuid::Uuid;

use livelum_core::{CompanyId, Pagination, SortOrder};

use super::{RepositoryError, RepositoryResult};

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    let mapped = match err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => RepositoryError::Conflict(
                db_err.constraint().unwrap_or("unknown").to_string(),
            ),
            _ => RepositoryError::Storage(format!(
                "database error in {}: {}",
                operation,
                db_err.message()
            )),
        },
        sqlx::Error::PoolClosed => {
            RepositoryError::Storage(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
            RepositoryError::Corrupt(format!("{} in {}", err, operation))
        }
        _ => RepositoryError::Storage(format!("sqlx error in {}: {}", operation, err)),
    };
    if !matches!(mapped, RepositoryError::Conflict(_)) {
        error!(operation, error = %mapped, "repository operation failed");
    }
    mapped
}

fn corrupt(table: &str, detail: impl Display) -> RepositoryError {
    RepositoryError::Corrupt(format!("{table}: {detail}"))
}

/// Parse a stored enum label (status, category, ...).
fn parse_label<T>(table: &str, value: &str) -> RepositoryResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e| corrupt(table, e))
}

fn number_to_db(number: u32) -> RepositoryResult<i32> {
    i32::try_from(number)
        .map_err(|_| RepositoryError::Storage(format!("sequence number {number} out of range")))
}

fn number_from_db(table: &str, number: i32) -> RepositoryResult<u32> {
    u32::try_from(number).map_err(|_| corrupt(table, format!("negative number {number}")))
}

/// Substring pattern for `ILIKE`, with wildcards in the needle escaped.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_company(qb: &mut QueryBuilder<'_, Postgres>, company_id: Option<CompanyId>) {
    if let Some(company_id) = company_id {
        qb.push(" AND company_id = ").push_bind(*company_id.as_uuid());
    }
}

/// `ORDER BY <column> <dir>, id ASC` followed by the pagination window.
fn push_order_and_window(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &'static str,
    order: SortOrder,
    window: Pagination,
) {
    qb.push(" ORDER BY ")
        .push(column)
        .push(" ")
        .push(order.as_sql())
        .push(", id ASC");
    if let Some(limit) = window.limit {
        qb.push(" LIMIT ").push_bind(i64::from(limit));
    }
    if let Some(offset) = window.offset {
        qb.push(" OFFSET ").push_bind(i64::from(offset));
    }
}

async fn count_rows(
    pool: &PgPool,
    mut qb: QueryBuilder<'_, Postgres>,
    operation: &str,
) -> RepositoryResult<u64> {
    let total = qb
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error(operation, e))?;
    Ok(u64::try_from(total).unwrap_or(0))
}

async fn next_number_in(pool: &PgPool, table: &'static str, company_id: CompanyId) -> RepositoryResult<u32> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COALESCE(MAX(number), 0) + 1 FROM ");
    qb.push(table).push(" WHERE company_id = ").push_bind(*company_id.as_uuid());
    let next = qb
        .build_query_scalar::<i32>()
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error("next_number", e))?;
    number_from_db(table, next)
}

async fn delete_from(pool: &PgPool, table: &'static str, id: Uuid) -> RepositoryResult<bool> {
    let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
    qb.push(table).push(" WHERE id = ").push_bind(id);
    let result = qb
        .build()
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("delete", e))?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("excel"), "%excel%");
    }

    #[test]
    fn order_and_window_render_binds() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM skills WHERE TRUE");
        push_company(&mut qb, Some(CompanyId::new()));
        push_order_and_window(&mut qb, "number", SortOrder::Desc, Pagination::from_page(2, 10));
        assert_eq!(
            qb.sql(),
            "SELECT * FROM skills WHERE TRUE AND company_id = $1 ORDER BY number DESC, id ASC LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn numbers_outside_i32_are_rejected() {
        assert!(number_to_db(u32::MAX).is_err());
        assert_eq!(number_to_db(7), Ok(7));
        assert!(number_from_db("skills", -1).is_err());
    }
}
