//! Integration tests for the compliance document review ledger.

mod common;

use std::sync::Arc;

use common::{admin, manager, upload, vendor_form, Harness};
use portal_onboarding::adapters::RecordingDispatcher;
use portal_onboarding::application::{
    ListVendorDocumentsHandler, ListVendorDocumentsQuery, ReviewDecision, ReviewDocumentCommand,
    ReviewDocumentHandler, SubmitDocumentCommand, SubmitDocumentHandler,
};
use portal_onboarding::domain::compliance::{DocumentReviewError, DocumentStatus, DocumentType};
use portal_onboarding::domain::foundation::{
    Actor, DocumentId, EmailAddress, ErrorKind, Role, VendorProfileId,
};
use portal_onboarding::ports::OutboxStatus;

struct Onboarded {
    vendor: Actor,
    vendor_id: VendorProfileId,
    document_ids: Vec<DocumentId>,
}

async fn onboard(h: &Harness) -> Onboarded {
    let code = h.invite_vendor("v@x.com", "Acme Paving").await;
    let result = h
        .vendor_onboarding()
        .handle(vendor_form(
            &code,
            vec![
                upload(DocumentType::W9, "w9.pdf"),
                upload(DocumentType::Coi, "coi.pdf"),
            ],
        ))
        .await
        .unwrap();
    // Flush onboarding emails so each test sees only its own.
    h.relay().poll_once().await.unwrap();
    Onboarded {
        vendor: Actor::new(result.account.id, Role::Vendor, "Jo Smith"),
        vendor_id: result.profile.id,
        document_ids: result.documents.iter().map(|d| d.id).collect(),
    }
}

fn reviewer(h: &Harness) -> ReviewDocumentHandler {
    ReviewDocumentHandler::new(
        h.store.clone(),
        h.store.clone(),
        h.store.clone(),
        h.clock.clone(),
    )
}

fn review(id: DocumentId, decision: ReviewDecision) -> ReviewDocumentCommand {
    ReviewDocumentCommand {
        actor: admin(),
        document_id: id,
        decision,
    }
}

#[tokio::test]
async fn approval_emails_the_vendor_through_the_relay() {
    let h = Harness::new();
    let onboarded = onboard(&h).await;

    reviewer(&h)
        .handle(review(onboarded.document_ids[0], ReviewDecision::Approve))
        .await
        .unwrap();
    h.relay().poll_once().await.unwrap();

    let sent = h
        .dispatcher
        .sent_to(&EmailAddress::try_new("v@x.com").unwrap());
    assert!(sent.iter().any(|m| m.subject.starts_with("Document Approved")));
}

#[tokio::test]
async fn approve_then_reject_keeps_the_first_decision() {
    let h = Harness::new();
    let onboarded = onboard(&h).await;
    let id = onboarded.document_ids[0];

    reviewer(&h)
        .handle(review(id, ReviewDecision::Approve))
        .await
        .unwrap();
    let err = reviewer(&h)
        .handle(review(
            id,
            ReviewDecision::Reject {
                reason: "Wrong year".to_string(),
            },
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(
        err,
        DocumentReviewError::AlreadyReviewed {
            status: DocumentStatus::Approved,
            ..
        }
    ));
}

#[tokio::test]
async fn concurrent_reviews_record_exactly_one_decision() {
    let h = Harness::new();
    let onboarded = onboard(&h).await;
    let id = onboarded.document_ids[1];
    let handler = Arc::new(reviewer(&h));

    let approve = {
        let handler = handler.clone();
        tokio::spawn(async move { handler.handle(review(id, ReviewDecision::Approve)).await })
    };
    let reject = {
        let handler = handler.clone();
        tokio::spawn(async move {
            handler
                .handle(review(
                    id,
                    ReviewDecision::Reject {
                        reason: "Illegible".to_string(),
                    },
                ))
                .await
        })
    };

    let outcomes = [approve.await.unwrap(), reject.await.unwrap()];
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    let pending_emails = h
        .store
        .outbox_entries()
        .into_iter()
        .filter(|e| e.status == OutboxStatus::Pending)
        .count();
    assert_eq!(pending_emails, 1);
}

#[tokio::test]
async fn rejected_document_is_superseded_by_a_new_submission() {
    let h = Harness::new();
    let onboarded = onboard(&h).await;
    let rejected_id = onboarded.document_ids[1];

    reviewer(&h)
        .handle(review(
            rejected_id,
            ReviewDecision::Reject {
                reason: "Certificate lapsed".to_string(),
            },
        ))
        .await
        .unwrap();

    h.clock.advance_days(1);
    let submit = SubmitDocumentHandler::new(h.store.clone(), h.store.clone(), h.clock.clone());
    let replacement = submit
        .handle(SubmitDocumentCommand {
            actor: onboarded.vendor.clone(),
            vendor_id: onboarded.vendor_id,
            document_type: DocumentType::Coi,
            file: upload(DocumentType::Coi, "coi-2025.pdf").file,
        })
        .await
        .unwrap();

    let history = ListVendorDocumentsHandler::new(h.store.clone(), h.store.clone())
        .handle(ListVendorDocumentsQuery {
            actor: manager(),
            vendor_id: onboarded.vendor_id,
        })
        .await
        .unwrap();

    assert_eq!(history.len(), 3);
    assert_eq!(history[0].id, replacement.id);
    let old = history.iter().find(|d| d.id == rejected_id).unwrap();
    assert_eq!(old.status, DocumentStatus::Rejected);
    assert_eq!(old.rejection_reason.as_deref(), Some("Certificate lapsed"));
}

#[tokio::test]
async fn failed_status_email_does_not_undo_the_review() {
    let h = Harness::new();
    let onboarded = onboard(&h).await;
    let id = onboarded.document_ids[0];

    reviewer(&h)
        .handle(review(id, ReviewDecision::Approve))
        .await
        .unwrap();

    let failing = Harness {
        store: h.store.clone(),
        clock: h.clock.clone(),
        dispatcher: Arc::new(RecordingDispatcher::failing()),
    };
    let report = failing.relay().poll_once().await.unwrap();
    assert_eq!(report.failed, 1);

    // A second decision is still refused: the approval stands.
    let err = reviewer(&h)
        .handle(review(id, ReviewDecision::Approve))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentReviewError::AlreadyReviewed { .. }));
}
