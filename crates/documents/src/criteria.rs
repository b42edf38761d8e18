use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use livelum_core::criteria::{cmp_text, contains_ignore_case, normalize_text};
use livelum_core::{CompanyId, CompanyScoped, Entity, Pagination, SearchCriteria, Sequenced, SortOrder};

use crate::document::{Document, DocumentKind, DocumentStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSortField {
    #[default]
    Number,
    Code,
    Title,
    Kind,
    Status,
    UpdatedAt,
}

/// Document search; the free-text filter matches title or code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSearchCriteria {
    company_id: Option<CompanyId>,
    search: Option<String>,
    kind: Option<DocumentKind>,
    status: Option<DocumentStatus>,
    sort_by: DocumentSortField,
    sort_order: SortOrder,
    pagination: Pagination,
}

impl DocumentSearchCriteria {
    pub fn builder() -> DocumentSearchCriteriaBuilder {
        DocumentSearchCriteriaBuilder::default()
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        self.kind
    }

    pub fn status(&self) -> Option<DocumentStatus> {
        self.status
    }

    pub fn sort_by(&self) -> DocumentSortField {
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
pub struct DocumentSearchCriteriaBuilder {
    inner: DocumentSearchCriteria,
}

impl DocumentSearchCriteriaBuilder {
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.inner.company_id = Some(company_id);
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.inner.search = normalize_text(search);
        self
    }

    pub fn with_kind(mut self, kind: Option<DocumentKind>) -> Self {
        self.inner.kind = kind;
        self
    }

    pub fn with_status(mut self, status: Option<DocumentStatus>) -> Self {
        self.inner.status = status;
        self
    }

    pub fn with_sort(mut self, field: DocumentSortField, order: SortOrder) -> Self {
        self.inner.sort_by = field;
        self.inner.sort_order = order;
        self
    }

    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.inner.pagination = Pagination::from_page(page, limit);
        self
    }

    pub fn build(self) -> DocumentSearchCriteria {
        self.inner
    }
}

impl SearchCriteria<Document> for DocumentSearchCriteria {
    fn matches(&self, d: &Document) -> bool {
        if self.company_id.is_some_and(|c| c != d.company_id()) {
            return false;
        }
        if self.kind.is_some_and(|k| k != d.kind()) {
            return false;
        }
        if self.status.is_some_and(|s| s != d.status()) {
            return false;
        }
        self.search
            .as_deref()
            .is_none_or(|q| contains_ignore_case(d.title(), q) || contains_ignore_case(d.code(), q))
    }

    fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let primary = match self.sort_by {
            DocumentSortField::Number => a.number().cmp(&b.number()),
            DocumentSortField::Code => cmp_text(a.code(), b.code()),
            DocumentSortField::Title => cmp_text(a.title(), b.title()),
            DocumentSortField::Kind => a.kind().as_str().cmp(b.kind().as_str()),
            DocumentSortField::Status => a.status().as_str().cmp(b.status().as_str()),
            DocumentSortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
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
    use livelum_core::criteria::select;

    use crate::document::NewDocument;

    #[test]
    fn search_matches_code() {
        let company = CompanyId::new();
        let docs: Vec<Document> = [("PR-001", "Compras"), ("MN-001", "Manual de calidad")]
            .into_iter()
            .enumerate()
            .map(|(i, (code, title))| {
                Document::create(
                    NewDocument {
                        number: i as u32 + 1,
                        code: code.into(),
                        title: title.into(),
                        kind: DocumentKind::Manual,
                        version: None,
                        owner_id: None,
                        company_id: company,
                    },
                    Utc::now(),
                )
                .unwrap()
            })
            .collect();

        let criteria = DocumentSearchCriteria::builder()
            .with_search(Some("pr-".into()))
            .build();
        let found = select(docs, &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "Compras");
    }
}
