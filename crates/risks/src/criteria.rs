use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use livelum_core::criteria::{cmp_text, contains_ignore_case, normalize_text};
use livelum_core::{CompanyId, CompanyScoped, Entity, Pagination, SearchCriteria, Sequenced, SortOrder};

use crate::risk::{Risk, RiskLevel, RiskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskSortField {
    #[default]
    Number,
    Title,
    Score,
    Status,
    CreatedAt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskSearchCriteria {
    company_id: Option<CompanyId>,
    title: Option<String>,
    status: Option<RiskStatus>,
    level: Option<RiskLevel>,
    sort_by: RiskSortField,
    sort_order: SortOrder,
    pagination: Pagination,
}

impl RiskSearchCriteria {
    pub fn builder() -> RiskSearchCriteriaBuilder {
        RiskSearchCriteriaBuilder::default()
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn status(&self) -> Option<RiskStatus> {
        self.status
    }

    pub fn level(&self) -> Option<RiskLevel> {
        self.level
    }

    pub fn sort_by(&self) -> RiskSortField {
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

#[derive(Debug, Clone, Default)]
pub struct RiskSearchCriteriaBuilder {
    inner: RiskSearchCriteria,
}

impl RiskSearchCriteriaBuilder {
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.inner.company_id = Some(company_id);
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.inner.title = normalize_text(title);
        self
    }

    pub fn with_status(mut self, status: Option<RiskStatus>) -> Self {
        self.inner.status = status;
        self
    }

    pub fn with_level(mut self, level: Option<RiskLevel>) -> Self {
        self.inner.level = level;
        self
    }

    pub fn with_sort(mut self, field: RiskSortField, order: SortOrder) -> Self {
        self.inner.sort_by = field;
        self.inner.sort_order = order;
        self
    }

    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.inner.pagination = Pagination::from_page(page, limit);
        self
    }

    pub fn build(self) -> RiskSearchCriteria {
        self.inner
    }
}

impl SearchCriteria<Risk> for RiskSearchCriteria {
    fn matches(&self, r: &Risk) -> bool {
        if self.company_id.is_some_and(|c| c != r.company_id()) {
            return false;
        }
        if self.status.is_some_and(|s| s != r.status()) {
            return false;
        }
        if self.level.is_some_and(|l| l != r.level()) {
            return false;
        }
        self.title
            .as_deref()
            .is_none_or(|t| contains_ignore_case(r.title(), t))
    }

    fn compare(&self, a: &Risk, b: &Risk) -> Ordering {
        let primary = match self.sort_by {
            RiskSortField::Number => a.number().cmp(&b.number()),
            RiskSortField::Title => cmp_text(a.title(), b.title()),
            RiskSortField::Score => a.score().cmp(&b.score()),
            RiskSortField::Status => a.status().as_str().cmp(b.status().as_str()),
            RiskSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        };
        self.sort_order
            .apply(primary)
            .then_with(|| a.id().cmp(b.id()))
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }
}
