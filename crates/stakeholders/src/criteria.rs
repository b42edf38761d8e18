use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use livelum_core::criteria::{cmp_text, contains_ignore_case, normalize_text};
use livelum_core::{CompanyId, CompanyScoped, Entity, Pagination, SearchCriteria, Sequenced, SortOrder};

use crate::stakeholder::{Stakeholder, StakeholderType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeholderSortField {
    #[default]
    #[serde(rename = "numero")]
    Number,
    #[serde(rename = "nombre")]
    Name,
    #[serde(rename = "tipo")]
    Kind,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeholderSearchCriteria {
    company_id: Option<CompanyId>,
    name: Option<String>,
    kind: Option<StakeholderType>,
    sort_by: StakeholderSortField,
    sort_order: SortOrder,
    pagination: Pagination,
}

impl StakeholderSearchCriteria {
    pub fn builder() -> StakeholderSearchCriteriaBuilder {
        StakeholderSearchCriteriaBuilder::default()
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> Option<StakeholderType> {
        self.kind
    }

    pub fn sort_by(&self) -> StakeholderSortField {
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
pub struct StakeholderSearchCriteriaBuilder {
    inner: StakeholderSearchCriteria,
}

impl StakeholderSearchCriteriaBuilder {
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.inner.company_id = Some(company_id);
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.inner.name = normalize_text(name);
        self
    }

    pub fn with_kind(mut self, kind: Option<StakeholderType>) -> Self {
        self.inner.kind = kind;
        self
    }

    pub fn with_sort(mut self, field: StakeholderSortField, order: SortOrder) -> Self {
        self.inner.sort_by = field;
        self.inner.sort_order = order;
        self
    }

    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.inner.pagination = Pagination::from_page(page, limit);
        self
    }

    pub fn build(self) -> StakeholderSearchCriteria {
        self.inner
    }
}

impl SearchCriteria<Stakeholder> for StakeholderSearchCriteria {
    fn matches(&self, s: &Stakeholder) -> bool {
        if self.company_id.is_some_and(|c| c != s.company_id()) {
            return false;
        }
        if self.kind.is_some_and(|k| k != s.kind()) {
            return false;
        }
        self.name
            .as_deref()
            .is_none_or(|n| contains_ignore_case(s.name(), n))
    }

    fn compare(&self, a: &Stakeholder, b: &Stakeholder) -> Ordering {
        let primary = match self.sort_by {
            StakeholderSortField::Number => a.number().cmp(&b.number()),
            StakeholderSortField::Name => cmp_text(a.name(), b.name()),
            StakeholderSortField::Kind => a.kind().as_str().cmp(b.kind().as_str()),
            StakeholderSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
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

    use crate::stakeholder::NewStakeholder;

    fn stakeholder(company_id: CompanyId, number: u32, name: &str, kind: StakeholderType) -> Stakeholder {
        Stakeholder::create(
            NewStakeholder {
                number,
                name: name.into(),
                kind,
                requirements: String::new(),
                evaluation_method: String::new(),
                company_id,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn filters_by_type_and_name() {
        let company = CompanyId::new();
        let all = vec![
            stakeholder(company, 1, "Accionistas", StakeholderType::Internal),
            stakeholder(company, 2, "Clientes", StakeholderType::External),
            stakeholder(company, 3, "Clientes mayoristas", StakeholderType::Internal),
        ];

        let criteria = StakeholderSearchCriteria::builder()
            .with_company(company)
            .with_kind(Some(StakeholderType::Internal))
            .with_name(Some("CLIENTES".into()))
            .build();
        let found = select(all, &criteria);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number(), 3);
    }

    #[test]
    fn sort_field_uses_spanish_wire_names() {
        let field: StakeholderSortField = serde_json::from_str("\"nombre\"").unwrap();
        assert_eq!(field, StakeholderSortField::Name);
    }
}
