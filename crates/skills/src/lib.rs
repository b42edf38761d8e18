//! Skills domain module.
//!
//! Business rules for the skill catalog of a company, implemented as pure
//! domain logic (no IO, no HTTP, no storage).

pub mod criteria;
pub mod skill;

pub use criteria::{SkillSearchCriteria, SkillSearchCriteriaBuilder, SkillSortField};
pub use skill::{NewSkill, Skill, SkillCategory, SkillId, SkillPatch, SkillRecord, SkillStatus};
