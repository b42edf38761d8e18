use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use livelum_core::criteria::{cmp_text, contains_ignore_case, normalize_text};
use livelum_core::{CompanyId, CompanyScoped, Entity, Pagination, SearchCriteria, Sequenced, SortOrder};

use crate::objective::{Objective, ObjectiveStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectiveSortField {
    #[default]
    Number,
    Title,
    DueDate,
    Status,
    CreatedAt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectiveSearchCriteria {
    company_id: Option<CompanyId>,
    title: Option<String>,
    status: Option<ObjectiveStatus>,
    sort_by: ObjectiveSortField,
    sort_order: SortOrder,
    pagination: Pagination,
}

impl ObjectiveSearchCriteria {
    pub fn builder() -> ObjectiveSearchCriteriaBuilder {
        ObjectiveSearchCriteriaBuilder::default()
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn status(&self) -> Option<ObjectiveStatus> {
        self.status
    }

    pub fn sort_by(&self) -> ObjectiveSortField {
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
pub struct ObjectiveSearchCriteriaBuilder {
    inner: ObjectiveSearchCriteria,
}

impl ObjectiveSearchCriteriaBuilder {
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.inner.company_id = Some(company_id);
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.inner.title = normalize_text(title);
        self
    }

    pub fn with_status(mut self, status: Option<ObjectiveStatus>) -> Self {
        self.inner.status = status;
        self
    }

    pub fn with_sort(mut self, field: ObjectiveSortField, order: SortOrder) -> Self {
        self.inner.sort_by = field;
        self.inner.sort_order = order;
        self
    }

    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.inner.pagination = Pagination::from_page(page, limit);
        self
    }

    pub fn build(self) -> ObjectiveSearchCriteria {
        self.inner
    }
}

impl SearchCriteria<Objective> for ObjectiveSearchCriteria {
    fn matches(&self, o: &Objective) -> bool {
        if self.company_id.is_some_and(|c| c != o.company_id()) {
            return false;
        }
        if self.status.is_some_and(|s| s != o.status()) {
            return false;
        }
        self.title
            .as_deref()
            .is_none_or(|t| contains_ignore_case(o.title(), t))
    }

    fn compare(&self, a: &Objective, b: &Objective) -> Ordering {
        let primary = match self.sort_by {
            ObjectiveSortField::Number => a.number().cmp(&b.number()),
            ObjectiveSortField::Title => cmp_text(a.title(), b.title()),
            // Objectives without a due date sort last (ascending).
            ObjectiveSortField::DueDate => match (a.due_date(), b.due_date()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            ObjectiveSortField::Status => a.status().as_str().cmp(b.status().as_str()),
            ObjectiveSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
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
    use chrono::{NaiveDate, Utc};
    use livelum_core::criteria::select;

    use crate::objective::NewObjective;

    #[test]
    fn due_date_sort_puts_undated_last() {
        let company = CompanyId::new();
        let dates = [NaiveDate::from_ymd_opt(2026, 6, 1), None, NaiveDate::from_ymd_opt(2026, 1, 1)];
        let objectives: Vec<Objective> = dates
            .into_iter()
            .enumerate()
            .map(|(i, due_date)| {
                Objective::create(
                    NewObjective {
                        number: i as u32 + 1,
                        title: format!("objetivo {i}"),
                        description: None,
                        target_value: 10.0,
                        current_value: None,
                        unit: None,
                        due_date,
                        company_id: company,
                    },
                    Utc::now(),
                )
                .unwrap()
            })
            .collect();

        let criteria = ObjectiveSearchCriteria::builder()
            .with_sort(ObjectiveSortField::DueDate, SortOrder::Asc)
            .build();
        let numbers: Vec<u32> = select(objectives, &criteria).iter().map(|o| o.number()).collect();
        assert_eq!(numbers, vec![3, 1, 2]);
    }
}
