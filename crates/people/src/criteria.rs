use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use livelum_core::criteria::{cmp_text, contains_ignore_case, normalize_text};
use livelum_core::{CompanyId, CompanyScoped, Entity, Pagination, SearchCriteria, Sequenced, SortOrder};

use crate::person::{Person, PersonStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonSortField {
    #[default]
    Number,
    FirstName,
    LastName,
    #[serde(rename = "documento")]
    Document,
    Status,
    CreatedAt,
}

/// People search. The free-text filter matches the full name or the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonSearchCriteria {
    company_id: Option<CompanyId>,
    search: Option<String>,
    status: Option<PersonStatus>,
    position_id: Option<String>,
    sort_by: PersonSortField,
    sort_order: SortOrder,
    pagination: Pagination,
}

impl PersonSearchCriteria {
    pub fn builder() -> PersonSearchCriteriaBuilder {
        PersonSearchCriteriaBuilder::default()
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn status(&self) -> Option<PersonStatus> {
        self.status
    }

    pub fn position_id(&self) -> Option<&str> {
        self.position_id.as_deref()
    }

    pub fn sort_by(&self) -> PersonSortField {
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
pub struct PersonSearchCriteriaBuilder {
    inner: PersonSearchCriteria,
}

impl PersonSearchCriteriaBuilder {
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.inner.company_id = Some(company_id);
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.inner.search = normalize_text(search);
        self
    }

    pub fn with_status(mut self, status: Option<PersonStatus>) -> Self {
        self.inner.status = status;
        self
    }

    pub fn with_position(mut self, position_id: Option<String>) -> Self {
        self.inner.position_id = normalize_text(position_id);
        self
    }

    pub fn with_sort(mut self, field: PersonSortField, order: SortOrder) -> Self {
        self.inner.sort_by = field;
        self.inner.sort_order = order;
        self
    }

    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.inner.pagination = Pagination::from_page(page, limit);
        self
    }

    pub fn build(self) -> PersonSearchCriteria {
        self.inner
    }
}

impl SearchCriteria<Person> for PersonSearchCriteria {
    fn matches(&self, p: &Person) -> bool {
        if self.company_id.is_some_and(|c| c != p.company_id()) {
            return false;
        }
        if self.status.is_some_and(|s| s != p.status()) {
            return false;
        }
        if let Some(position) = &self.position_id {
            if !p.position_ids().iter().any(|id| id == position) {
                return false;
            }
        }
        self.search.as_deref().is_none_or(|q| {
            contains_ignore_case(&p.full_name(), q) || contains_ignore_case(p.document(), q)
        })
    }

    fn compare(&self, a: &Person, b: &Person) -> Ordering {
        let primary = match self.sort_by {
            PersonSortField::Number => a.number().cmp(&b.number()),
            PersonSortField::FirstName => cmp_text(a.first_name(), b.first_name()),
            PersonSortField::LastName => cmp_text(a.last_name(), b.last_name()),
            PersonSortField::Document => a.document().cmp(b.document()),
            PersonSortField::Status => a.status().as_str().cmp(b.status().as_str()),
            PersonSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        };
        self.sort_order
            .apply(primary)
            .then_with(|| a.id().cmp(b.id()))
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }
}
