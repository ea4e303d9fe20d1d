//! Compliance document aggregate.

use crate::domain::foundation::{
    AccountId, DocumentId, StateMachine, Timestamp, ValidationError, VendorProfileId,
};

use super::{DocumentReviewError, DocumentStatus, DocumentType};

/// Largest accepted upload.
pub const MAX_DOCUMENT_BYTES: u64 = 25 * 1024 * 1024;

/// Metadata of an uploaded file. The bytes live in blob storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub file_name: String,
    pub content_type: String,
    /// Key of the blob in file storage.
    pub storage_key: String,
    pub size_bytes: u64,
}

impl DocumentFile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.file_name.trim().is_empty() {
            return Err(ValidationError::empty_field("file_name"));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ValidationError::empty_field("storage_key"));
        }
        if self.size_bytes == 0 || self.size_bytes > MAX_DOCUMENT_BYTES {
            return Err(ValidationError::out_of_range(
                "size_bytes",
                1,
                MAX_DOCUMENT_BYTES as i64,
                self.size_bytes.min(i64::MAX as u64) as i64,
            ));
        }
        Ok(())
    }
}

/// A document submitted by a vendor for admin review.
///
/// Invariants: `rejection_reason` is set iff the status is `Rejected`;
/// `reviewed_by` and `reviewed_at` are set iff the status is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceDocument {
    pub id: DocumentId,
    pub vendor_id: VendorProfileId,
    pub document_type: DocumentType,
    pub file: DocumentFile,
    pub status: DocumentStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<AccountId>,
    pub reviewed_at: Option<Timestamp>,
    pub submitted_at: Timestamp,
}

impl ComplianceDocument {
    /// Creates a pending document for a fresh upload.
    pub fn submit(
        vendor_id: VendorProfileId,
        document_type: DocumentType,
        file: DocumentFile,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        file.validate()?;
        Ok(Self {
            id: DocumentId::new(),
            vendor_id,
            document_type,
            file,
            status: DocumentStatus::Pending,
            rejection_reason: None,
            reviewed_by: None,
            reviewed_at: None,
            submitted_at: now,
        })
    }

    pub fn is_reviewed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Approves a pending document.
    pub fn approve(&mut self, reviewer: AccountId, now: Timestamp) -> Result<(), DocumentReviewError> {
        self.decide(DocumentStatus::Approved, reviewer, now)?;
        Ok(())
    }

    /// Rejects a pending document. A reason is required.
    pub fn reject(
        &mut self,
        reviewer: AccountId,
        reason: &str,
        now: Timestamp,
    ) -> Result<(), DocumentReviewError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::empty_field("rejection_reason").into());
        }
        self.decide(DocumentStatus::Rejected, reviewer, now)?;
        self.rejection_reason = Some(reason.to_string());
        Ok(())
    }

    fn decide(
        &mut self,
        target: DocumentStatus,
        reviewer: AccountId,
        now: Timestamp,
    ) -> Result<(), DocumentReviewError> {
        if self.is_reviewed() {
            return Err(DocumentReviewError::already_reviewed(self.id, self.status));
        }
        self.status = self.status.transition_to(target)?;
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        Ok(())
    }
}
