//! Companies domain module (tenant roots).

pub mod company;
pub mod criteria;

pub use company::{Company, CompanyPatch, CompanyRecord, CompanyStatus, NewCompany};
pub use criteria::{CompanySearchCriteria, CompanySearchCriteriaBuilder, CompanySortField};
