//! Documents domain module (controlled documents of the management system).

pub mod criteria;
pub mod document;

pub use criteria::{DocumentSearchCriteria, DocumentSearchCriteriaBuilder, DocumentSortField};
pub use document::{
    DEFAULT_VERSION, Document, DocumentId, DocumentKind, DocumentPatch, DocumentRecord, DocumentStatus,
    NewDocument,
};
