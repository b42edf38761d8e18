//! Search criteria primitives shared by every module.
//!
//! A module's criteria type is a transient, immutable description of a query:
//! equality filters, one free-text filter, sorting and pagination. Repositories
//! translate it to SQL; the in-memory repository evaluates it directly through
//! [`SearchCriteria`].

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Sort direction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Orient an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl ValueObject for SortOrder {}

/// Offset/limit window. `None` means unbounded.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    /// Convert a 1-based page number into an offset window.
    ///
    /// Page 0 is treated as page 1. The limit is not capped here.
    pub fn from_page(page: u32, limit: u32) -> Self {
        let page = page.max(1);
        Self {
            limit: Some(limit),
            offset: Some((page - 1).saturating_mul(limit)),
        }
    }

    /// Apply the window to an already-sorted list.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0) as usize;
        let iter = items.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter.take(limit as usize).collect(),
            None => iter.collect(),
        }
    }
}

impl ValueObject for Pagination {}

/// In-process evaluation of a criteria object against entities of type `E`.
pub trait SearchCriteria<E>: Clone + Send + Sync + core::fmt::Debug {
    /// Whether `entity` passes every filter.
    fn matches(&self, entity: &E) -> bool;

    /// Ordering of two matching entities according to the requested sort.
    ///
    /// Implementations break ties deterministically (by id).
    fn compare(&self, a: &E, b: &E) -> Ordering;

    fn pagination(&self) -> Pagination;
}

/// Filter, sort and paginate `items` with `criteria`.
pub fn select<E, C>(items: impl IntoIterator<Item = E>, criteria: &C) -> Vec<E>
where
    C: SearchCriteria<E>,
{
    let mut matched: Vec<E> = items.into_iter().filter(|e| criteria.matches(e)).collect();
    matched.sort_by(|a, b| criteria.compare(a, b));
    criteria.pagination().slice(matched)
}

/// Count the items passing the filters of `criteria` (no pagination).
pub fn count<'a, E: 'a, C>(items: impl IntoIterator<Item = &'a E>, criteria: &C) -> u64
where
    C: SearchCriteria<E>,
{
    items.into_iter().filter(|e| criteria.matches(e)).count() as u64
}

/// Case-insensitive substring match used for free-text filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Normalize an optional free-text filter: blank means "no filter".
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Case-insensitive comparison for text sort keys.
pub fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_two_of_ten_starts_at_ten() {
        assert_eq!(
            Pagination::from_page(2, 10),
            Pagination { limit: Some(10), offset: Some(10) }
        );
    }

    #[test]
    fn page_zero_is_first_page() {
        assert_eq!(Pagination::from_page(0, 25).offset, Some(0));
    }

    #[test]
    fn slice_applies_offset_then_limit() {
        let window = Pagination { limit: Some(2), offset: Some(1) };
        assert_eq!(window.slice(vec![1, 2, 3, 4]), vec![2, 3]);
        assert_eq!(Pagination::default().slice(vec![1, 2]), vec![1, 2]);
    }

    #[test]
    fn text_match_ignores_case() {
        assert!(contains_ignore_case("Gestión de Riesgos", "RIESGOS"));
        assert!(!contains_ignore_case("Calidad", "riesgo"));
    }

    #[test]
    fn blank_text_filter_is_dropped() {
        assert_eq!(normalize_text(Some("  ".into())), None);
        assert_eq!(normalize_text(Some(" ab ".into())), Some("ab".into()));
    }

    #[test]
    fn desc_reverses_ordering() {
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
    }
}
