use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use livelum_core::criteria::{cmp_text, contains_ignore_case, normalize_text};
use livelum_core::{CompanyId, CompanyScoped, Entity, Pagination, SearchCriteria, Sequenced, SortOrder};

use crate::skill::{Skill, SkillCategory, SkillStatus};

/// Sortable skill fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillSortField {
    #[default]
    Number,
    Title,
    Category,
    Status,
    CreatedAt,
    UpdatedAt,
}

/// Skill search: company/category/status equality, title substring (case-insensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSearchCriteria {
    company_id: Option<CompanyId>,
    title: Option<String>,
    category: Option<SkillCategory>,
    status: Option<SkillStatus>,
    sort_by: SkillSortField,
    sort_order: SortOrder,
    pagination: Pagination,
}

impl SkillSearchCriteria {
    pub fn builder() -> SkillSearchCriteriaBuilder {
        SkillSearchCriteriaBuilder::default()
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn category(&self) -> Option<SkillCategory> {
        self.category
    }

    pub fn status(&self) -> Option<SkillStatus> {
        self.status
    }

    pub fn sort_by(&self) -> SkillSortField {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn limit(&self) -> Option<u32> {
        self.pagination.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.pagination.offset
    }
}

/// Accumulates optional filters into a [`SkillSearchCriteria`].
#[derive(Debug, Clone, Default)]
pub struct SkillSearchCriteriaBuilder {
    inner: SkillSearchCriteria,
}

impl SkillSearchCriteriaBuilder {
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.inner.company_id = Some(company_id);
        self
    }

    /// Blank titles are ignored.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.inner.title = normalize_text(title);
        self
    }

    pub fn with_category(mut self, category: Option<SkillCategory>) -> Self {
        self.inner.category = category;
        self
    }

    pub fn with_status(mut self, status: Option<SkillStatus>) -> Self {
        self.inner.status = status;
        self
    }

    pub fn with_sort(mut self, field: SkillSortField, order: SortOrder) -> Self {
        self.inner.sort_by = field;
        self.inner.sort_order = order;
        self
    }

    /// 1-based page; `offset = (page - 1) * limit`.
    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.inner.pagination = Pagination::from_page(page, limit);
        self
    }

    pub fn build(self) -> SkillSearchCriteria {
        self.inner
    }
}

impl SearchCriteria<Skill> for SkillSearchCriteria {
    fn matches(&self, skill: &Skill) -> bool {
        if self.company_id.is_some_and(|c| c != skill.company_id()) {
            return false;
        }
        if self.category.is_some_and(|c| c != skill.category()) {
            return false;
        }
        if self.status.is_some_and(|s| s != skill.status()) {
            return false;
        }
        self.title
            .as_deref()
            .is_none_or(|t| contains_ignore_case(skill.title(), t))
    }

    fn compare(&self, a: &Skill, b: &Skill) -> Ordering {
        let primary = match self.sort_by {
            SkillSortField::Number => a.number().cmp(&b.number()),
            SkillSortField::Title => cmp_text(a.title(), b.title()),
            SkillSortField::Category => a.category().as_str().cmp(b.category().as_str()),
            SkillSortField::Status => a.status().as_str().cmp(b.status().as_str()),
            SkillSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
            SkillSortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        };
        self.sort_order
            .apply(primary)
            .then_with(|| a.id().cmp(b.id()))
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }
}
