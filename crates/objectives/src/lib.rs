//! Objectives domain module (measurable goals with target values).

pub mod criteria;
pub mod objective;

pub use criteria::{ObjectiveSearchCriteria, ObjectiveSearchCriteriaBuilder, ObjectiveSortField};
pub use objective::{
    NewObjective, Objective, ObjectiveId, ObjectivePatch, ObjectiveRecord, ObjectiveStatus,
};
