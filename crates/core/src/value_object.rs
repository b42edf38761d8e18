//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values
/// (`Pagination { limit: Some(10), offset: Some(0) }` is one). They are never
/// mutated in place; build a new one instead.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
