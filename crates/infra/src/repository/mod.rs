//! Repository boundary.
//!
//! One generic async trait covers every module: entities are stored whole
//! (upsert by id) and queried through the module's search criteria type.
//! Sequenced modules additionally hand out per-company numbers.
//!
//! Repositories never retry. Unique index violations surface as
//! [`RepositoryError::Conflict`] carrying the constraint name, so callers can
//! tell a sequence-number race apart from a genuine duplicate.

pub mod in_memory;
pub mod postgres;
pub mod unique;

use std::sync::Arc;

use thiserror::Error;

use livelum_core::{CompanyId, Entity, SearchCriteria, Sequenced};

use crate::db::constraints;

pub use in_memory::InMemoryRepository;
pub use unique::{UniqueKey, UniqueKeys};

/// Repository failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// A unique index rejected the write. Holds the constraint name.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),

    /// A stored row could not be turned back into an entity.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    /// Whether this is a collision on a per-company sequence number.
    pub fn is_number_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(c) if c.ends_with(constraints::NUMBER_SUFFIX))
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for one entity type, queried with criteria `C`.
#[async_trait::async_trait]
pub trait Repository<E, C>: Send + Sync
where
    E: Entity + Send + Sync + 'static,
    C: SearchCriteria<E> + 'static,
{
    /// Insert or replace the entity with the same id.
    async fn save(&self, entity: &E) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>>;

    /// Filtered, sorted and paginated listing.
    async fn find_by_criteria(&self, criteria: &C) -> RepositoryResult<Vec<E>>;

    /// Number of entities passing the filters of `criteria`, ignoring pagination.
    async fn count_by_criteria(&self, criteria: &C) -> RepositoryResult<u64>;

    /// Hard delete. Returns `false` when nothing matched.
    async fn delete(&self, id: &E::Id) -> RepositoryResult<bool>;
}

/// Repository of entities numbered per company.
#[async_trait::async_trait]
pub trait SequencedRepository<E, C>: Repository<E, C>
where
    E: Sequenced + Send + Sync + 'static,
    C: SearchCriteria<E> + 'static,
{
    /// `max(number) + 1` within the company, or 1 when it has none.
    ///
    /// Not reserved: two callers can read the same value. The unique index
    /// decides which save wins.
    async fn next_number(&self, company_id: CompanyId) -> RepositoryResult<u32>;
}

pub type DynRepository<E, C> = Arc<dyn Repository<E, C>>;
pub type DynSequencedRepository<E, C> = Arc<dyn SequencedRepository<E, C>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_number_indexes_count_as_sequence_conflicts() {
        assert!(RepositoryError::Conflict(constraints::SKILLS_NUMBER.into()).is_number_conflict());
        assert!(!RepositoryError::Conflict(constraints::PEOPLE_DOCUMENTO.into()).is_number_conflict());
        assert!(!RepositoryError::Storage("boom".into()).is_number_conflict());
    }
}
