//! ListVendorDocumentsHandler - Query handler for a vendor's document history.

use std::sync::Arc;

use crate::domain::compliance::{ComplianceDocument, DocumentReviewError};
use crate::domain::foundation::{Actor, VendorProfileId};
use crate::ports::{DocumentRepository, VendorProfileRepository};

/// Query for every document a vendor has submitted.
#[derive(Debug, Clone)]
pub struct ListVendorDocumentsQuery {
    pub actor: Actor,
    pub vendor_id: VendorProfileId,
}

/// Handler for the document history. Superseded rejections stay in the list.
pub struct ListVendorDocumentsHandler {
    profiles: Arc<dyn VendorProfileRepository>,
    documents: Arc<dyn DocumentRepository>,
}

impl ListVendorDocumentsHandler {
    pub fn new(
        profiles: Arc<dyn VendorProfileRepository>,
        documents: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            profiles,
            documents,
        }
    }

    /// Returns the documents newest first.
    pub async fn handle(
        &self,
        query: ListVendorDocumentsQuery,
    ) -> Result<Vec<ComplianceDocument>, DocumentReviewError> {
        let profile = self
            .profiles
            .find_by_id(&query.vendor_id)
            .await?
            .ok_or_else(|| DocumentReviewError::vendor_not_found(query.vendor_id))?;

        let owner = profile.account_id == query.actor.account_id;
        if !query.actor.role.is_internal() && !owner {
            return Err(DocumentReviewError::forbidden(
                query.actor.role,
                "view documents of another vendor",
            ));
        }

        Ok(self.documents.list_by_vendor(&profile.id).await?)
    }
}
