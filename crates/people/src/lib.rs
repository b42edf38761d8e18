//! People domain module (employees and collaborators of a company).

pub mod criteria;
pub mod person;

pub use criteria::{PersonSearchCriteria, PersonSearchCriteriaBuilder, PersonSortField};
pub use person::{NewPerson, Person, PersonId, PersonPatch, PersonRecord, PersonStatus};
