//! Stakeholders (interested parties) domain module.

pub mod criteria;
pub mod stakeholder;

pub use criteria::{StakeholderSearchCriteria, StakeholderSearchCriteriaBuilder, StakeholderSortField};
pub use stakeholder::{
    NewStakeholder, Stakeholder, StakeholderId, StakeholderPatch, StakeholderRecord, StakeholderType,
};
