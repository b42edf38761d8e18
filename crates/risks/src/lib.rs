//! Risks domain module (risk register with probability/impact scoring).

pub mod criteria;
pub mod risk;

pub use criteria::{RiskSearchCriteria, RiskSearchCriteriaBuilder, RiskSortField};
pub use risk::{NewRisk, RATING_RANGE, Risk, RiskId, RiskLevel, RiskPatch, RiskRecord, RiskStatus};
