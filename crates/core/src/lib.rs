//! `livelum-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod criteria;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use criteria::{Pagination, SearchCriteria, SortOrder};
pub use entity::{CompanyScoped, Entity, Sequenced, bump_timestamp};
pub use error::{DomainError, DomainResult};
pub use id::{CompanyId, EntityId};
pub use value_object::ValueObject;
