//! Compliance document repository port.

use async_trait::async_trait;

use crate::domain::compliance::{ComplianceDocument, DocumentStatus};
use crate::domain::foundation::{DocumentId, DomainError, VendorProfileId};
use crate::domain::notification::NotificationIntent;

/// Result of recording a review decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Recorded,
    /// Another decision was committed first.
    AlreadyReviewed(DocumentStatus),
    NotFound,
}

/// Repository port for compliance documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert(&self, document: &ComplianceDocument) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<ComplianceDocument>, DomainError>;

    /// All documents of a vendor, newest first, including rejected ones.
    async fn list_by_vendor(
        &self,
        vendor_id: &VendorProfileId,
    ) -> Result<Vec<ComplianceDocument>, DomainError>;

    /// Persists a decided document only if the stored record is still
    /// pending, together with its intents.
    async fn record_review(
        &self,
        document: &ComplianceDocument,
        intents: &[NotificationIntent],
    ) -> Result<ReviewOutcome, DomainError>;

    /// Removes a document. Used only to compensate a failed onboarding.
    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError>;
}
