use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use livelum_core::criteria::{cmp_text, contains_ignore_case, normalize_text};
use livelum_core::{Entity, Pagination, SearchCriteria, SortOrder};

use crate::company::{Company, CompanyStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanySortField {
    #[default]
    Name,
    TaxId,
    Status,
    CreatedAt,
}

/// Company search; the free-text filter matches name or tax id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanySearchCriteria {
    search: Option<String>,
    status: Option<CompanyStatus>,
    sort_by: CompanySortField,
    sort_order: SortOrder,
    pagination: Pagination,
}

impl CompanySearchCriteria {
    pub fn builder() -> CompanySearchCriteriaBuilder {
        CompanySearchCriteriaBuilder::default()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn status(&self) -> Option<CompanyStatus> {
        self.status
    }

    pub fn sort_by(&self) -> CompanySortField {
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
pub struct CompanySearchCriteriaBuilder {
    inner: CompanySearchCriteria,
}

impl CompanySearchCriteriaBuilder {
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.inner.search = normalize_text(search);
        self
    }

    pub fn with_status(mut self, status: Option<CompanyStatus>) -> Self {
        self.inner.status = status;
        self
    }

    pub fn with_sort(mut self, field: CompanySortField, order: SortOrder) -> Self {
        self.inner.sort_by = field;
        self.inner.sort_order = order;
        self
    }

    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.inner.pagination = Pagination::from_page(page, limit);
        self
    }

    pub fn build(self) -> CompanySearchCriteria {
        self.inner
    }
}

impl SearchCriteria<Company> for CompanySearchCriteria {
    fn matches(&self, c: &Company) -> bool {
        if self.status.is_some_and(|s| s != c.status()) {
            return false;
        }
        self.search
            .as_deref()
            .is_none_or(|q| contains_ignore_case(c.name(), q) || contains_ignore_case(c.tax_id(), q))
    }

    fn compare(&self, a: &Company, b: &Company) -> Ordering {
        let primary = match self.sort_by {
            CompanySortField::Name => cmp_text(a.name(), b.name()),
            CompanySortField::TaxId => a.tax_id().cmp(b.tax_id()),
            CompanySortField::Status => a.status().as_str().cmp(b.status().as_str()),
            CompanySortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        };
        self.sort_order
            .apply(primary)
            .then_with(|| a.id().cmp(b.id()))
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use livelum_core::criteria::{count, select};

    use crate::company::NewCompany;

    fn companies() -> Vec<Company> {
        [("Beta", "2"), ("alfa", "1"), ("Gamma", "3")]
            .into_iter()
            .map(|(name, tax_id)| {
                Company::create(
                    NewCompany {
                        name: name.into(),
                        tax_id: tax_id.into(),
                        email: None,
                        phone: None,
                        address: None,
                    },
                    Utc::now(),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn default_sort_is_name_ignoring_case() {
        let names: Vec<String> = select(companies(), &CompanySearchCriteria::default())
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["alfa", "Beta", "Gamma"]);
    }

    #[test]
    fn count_ignores_pagination() {
        let all = companies();
        let criteria = CompanySearchCriteria::builder().with_pagination(1, 1).build();
        assert_eq!(select(all.clone(), &criteria).len(), 1);
        assert_eq!(count(all.iter(), &criteria), 3);
    }
}
