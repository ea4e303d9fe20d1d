//! Compliance handlers - Document submission, review and history.

mod list_vendor_documents;
mod review_document;
mod submit_document;

pub use list_vendor_documents::{ListVendorDocumentsHandler, ListVendorDocumentsQuery};
pub use review_document::{
    ReviewDecision, ReviewDocumentCommand, ReviewDocumentHandler, ReviewDocumentResult,
};
pub use submit_document::{SubmitDocumentCommand, SubmitDocumentHandler};
