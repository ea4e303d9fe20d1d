//! SubmitDocumentHandler - Command handler for uploading a compliance document.
//!
//! Every upload creates a fresh pending record. A rejected document is
//! never reopened; the vendor submits a new one.

use std::sync::Arc;
use tracing::info;

use crate::domain::compliance::{
    ComplianceDocument, DocumentFile, DocumentReviewError, DocumentType,
};
use crate::domain::foundation::{Actor, Role, VendorProfileId};
use crate::ports::{Clock, DocumentRepository, VendorProfileRepository};

/// Command to submit a document for a vendor.
#[derive(Debug, Clone)]
pub struct SubmitDocumentCommand {
    pub actor: Actor,
    pub vendor_id: VendorProfileId,
    pub document_type: DocumentType,
    pub file: DocumentFile,
}

/// Handler for document submission.
pub struct SubmitDocumentHandler {
    profiles: Arc<dyn VendorProfileRepository>,
    documents: Arc<dyn DocumentRepository>,
    clock: Arc<dyn Clock>,
}

impl SubmitDocumentHandler {
    pub fn new(
        profiles: Arc<dyn VendorProfileRepository>,
        documents: Arc<dyn DocumentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            documents,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitDocumentCommand,
    ) -> Result<ComplianceDocument, DocumentReviewError> {
        // 1. Resolve the vendor
        let profile = self
            .profiles
            .find_by_id(&cmd.vendor_id)
            .await?
            .ok_or_else(|| DocumentReviewError::vendor_not_found(cmd.vendor_id))?;

        // 2. Admins upload for anyone; vendors only for themselves
        let allowed = match cmd.actor.role {
            Role::Admin => true,
            Role::Vendor => profile.account_id == cmd.actor.account_id,
            Role::Manager | Role::Employee => false,
        };
        if !allowed {
            return Err(DocumentReviewError::forbidden(
                cmd.actor.role,
                "submit documents for this vendor",
            ));
        }

        // 3. Create and persist the pending record
        let document =
            ComplianceDocument::submit(profile.id, cmd.document_type, cmd.file, self.clock.now())?;
        self.documents.insert(&document).await?;

        info!(
            document_id = %document.id,
            vendor_id = %profile.id,
            document_type = document.document_type.as_str(),
            "Compliance document submitted"
        );

        Ok(document)
    }
}
