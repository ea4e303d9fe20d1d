//! Compliance domain - Vendor document submission and admin review.

mod document;
mod document_type;
mod errors;
mod status;

pub use document::{ComplianceDocument, DocumentFile, MAX_DOCUMENT_BYTES};
pub use document_type::DocumentType;
pub use errors::DocumentReviewError;
pub use status::DocumentStatus;
