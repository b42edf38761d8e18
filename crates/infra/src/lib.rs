//! Infrastructure layer: storage for every domain module.
//!
//! - [`repository`]: the repository boundary plus in-memory and Postgres implementations.
//! - [`db`]: connection pool, schema bootstrap and unique constraint names.

pub mod db;
pub mod repository;

pub use repository::{
    DynRepository, DynSequencedRepository, InMemoryRepository, Repository, RepositoryError,
    RepositoryResult, SequencedRepository,
};
