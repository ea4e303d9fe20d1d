//! ReviewDocumentHandler - Command handler for approving or rejecting a
//! compliance document.
//!
//! Decisions are final. The store applies the decision only while the
//! record is still pending, so of two racing reviews exactly one wins and
//! the other reports `AlreadyReviewed`.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::compliance::{ComplianceDocument, DocumentReviewError};
use crate::domain::foundation::{Actor, DocumentId, Timestamp};
use crate::domain::notification::{NotificationIntent, NotificationKind};
use crate::ports::{
    AccountRepository, Clock, DocumentRepository, ReviewOutcome, VendorProfileRepository,
};

/// The admin's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { reason: String },
}

/// Command to review a document.
#[derive(Debug, Clone)]
pub struct ReviewDocumentCommand {
    pub actor: Actor,
    pub document_id: DocumentId,
    pub decision: ReviewDecision,
}

/// Result of a recorded review.
#[derive(Debug, Clone)]
pub struct ReviewDocumentResult {
    pub document: ComplianceDocument,
    /// Whether a status email was queued for the vendor.
    pub notified: bool,
}

/// Handler for document review.
pub struct ReviewDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
    profiles: Arc<dyn VendorProfileRepository>,
    accounts: Arc<dyn AccountRepository>,
    clock: Arc<dyn Clock>,
}

impl ReviewDocumentHandler {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        profiles: Arc<dyn VendorProfileRepository>,
        accounts: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            documents,
            profiles,
            accounts,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReviewDocumentCommand,
    ) -> Result<ReviewDocumentResult, DocumentReviewError> {
        // 1. Only admins review
        if !cmd.actor.role.can_review_documents() {
            return Err(DocumentReviewError::forbidden(
                cmd.actor.role,
                "review compliance documents",
            ));
        }

        // 2. Load and decide
        let mut document = self
            .documents
            .find_by_id(&cmd.document_id)
            .await?
            .ok_or_else(|| DocumentReviewError::not_found(cmd.document_id))?;

        let now = self.clock.now();
        match &cmd.decision {
            ReviewDecision::Approve => document.approve(cmd.actor.account_id, now)?,
            ReviewDecision::Reject { reason } => {
                document.reject(cmd.actor.account_id, reason, now)?
            }
        }

        // 3. Address the vendor; a missing contact only drops the email
        let intents: Vec<NotificationIntent> =
            self.status_intent(&document, now).await.into_iter().collect();

        // 4. Persist the decision together with its email
        match self.documents.record_review(&document, &intents).await? {
            ReviewOutcome::Recorded => {}
            ReviewOutcome::AlreadyReviewed(status) => {
                return Err(DocumentReviewError::already_reviewed(document.id, status));
            }
            ReviewOutcome::NotFound => return Err(DocumentReviewError::not_found(document.id)),
        }

        info!(
            document_id = %document.id,
            vendor_id = %document.vendor_id,
            status = %document.status,
            reviewed_by = %cmd.actor.account_id,
            "Compliance document reviewed"
        );

        Ok(ReviewDocumentResult {
            document,
            notified: !intents.is_empty(),
        })
    }

    async fn status_intent(
        &self,
        document: &ComplianceDocument,
        now: Timestamp,
    ) -> Option<NotificationIntent> {
        let profile = match self.profiles.find_by_id(&document.vendor_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(
                    vendor_id = %document.vendor_id,
                    "Vendor profile missing, skipping status email"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    vendor_id = %document.vendor_id,
                    error = %e,
                    "Vendor lookup failed, skipping status email"
                );
                return None;
            }
        };
        let account = match self.accounts.find_by_id(&profile.account_id).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn!(
                    account_id = %profile.account_id,
                    "Vendor account missing, skipping status email"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    account_id = %profile.account_id,
                    error = %e,
                    "Account lookup failed, skipping status email"
                );
                return None;
            }
        };

        Some(NotificationIntent::new(
            account.email,
            profile.contact.full_name(),
            NotificationKind::DocumentReviewed {
                company_name: profile.company_name().to_string(),
                document_type: document.document_type,
                status: document.status,
                reason: document.rejection_reason.clone(),
            },
            now,
        ))
    }
}
