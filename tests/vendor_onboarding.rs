//! Integration tests for the vendor invitation ledger and onboarding saga.

mod common;

use common::{upload, vendor_form, Harness};
use portal_onboarding::adapters::FailPoint;
use portal_onboarding::application::ValidateInvitationHandler;
use portal_onboarding::domain::compliance::{DocumentStatus, DocumentType};
use portal_onboarding::domain::foundation::{EmailAddress, ErrorKind, Role};
use portal_onboarding::domain::invitation::{InvitationError, InvitationGate, InvitationState};

#[tokio::test]
async fn vendor_invitation_expires_thirty_days_after_issue() {
    let h = Harness::new();
    let code = h.invite_vendor("v@x.com", "Acme Paving").await;

    let stored = h.store.invitation(&code).unwrap();
    let lifetime = stored
        .lifecycle()
        .expires_at
        .duration_since(&stored.lifecycle().created_at);
    assert_eq!(lifetime.num_days(), 30);
}

#[tokio::test]
async fn submission_thirty_one_days_later_is_expired_and_nothing_is_written() {
    let h = Harness::new();
    let code = h.invite_vendor("v@x.com", "Acme Paving").await;

    h.clock.advance_days(31);
    let err = h
        .vendor_onboarding()
        .handle(vendor_form(&code, vec![upload(DocumentType::W9, "w9.pdf")]))
        .await
        .unwrap_err();

    assert!(matches!(err, InvitationError::Expired(_)));
    assert_eq!(err.kind(), ErrorKind::Expired);
    assert_eq!(h.store.account_count(), 0);

    // Stored state is untouched; only the read reports expiry.
    let stored = h.store.invitation(&code).unwrap();
    assert_eq!(stored.lifecycle().state, InvitationState::Pending);
    let status = ValidateInvitationHandler::new(h.store.clone(), h.clock.clone())
        .status(code.as_str())
        .await
        .unwrap();
    assert_eq!(status.label, "expired");
}

#[tokio::test]
async fn completed_onboarding_links_invitation_and_emails_vendor() {
    let h = Harness::new();
    let code = h.invite_vendor("v@x.com", "Acme Paving").await;

    let result = h
        .vendor_onboarding()
        .handle(vendor_form(
            &code,
            vec![
                upload(DocumentType::W9, "w9.pdf"),
                upload(DocumentType::Coi, "coi.pdf"),
                upload(DocumentType::License, "license.pdf"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(result.account.role, Role::Vendor);
    assert!(result.account.is_active);
    assert_eq!(result.documents.len(), 3);
    assert!(result
        .documents
        .iter()
        .all(|d| d.status == DocumentStatus::Pending));
    assert_eq!(
        result.invitation.lifecycle.consumed_by,
        Some(result.account.id)
    );

    let status = ValidateInvitationHandler::new(h.store.clone(), h.clock.clone())
        .status(code.as_str())
        .await
        .unwrap();
    assert_eq!(status.label, "completed");

    // Invitation email and welcome email.
    let report = h.relay().poll_once().await.unwrap();
    assert_eq!(report.sent, 2);
    let sent = h
        .dispatcher
        .sent_to(&EmailAddress::try_new("v@x.com").unwrap());
    assert!(sent.iter().any(|m| m.html.contains("v@x.com")));
}

#[tokio::test]
async fn second_submission_with_same_code_is_rejected() {
    let h = Harness::new();
    let code = h.invite_vendor("v@x.com", "Acme Paving").await;
    h.vendor_onboarding()
        .handle(vendor_form(&code, vec![]))
        .await
        .unwrap();

    let err = h
        .vendor_onboarding()
        .handle(vendor_form(&code, vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, InvitationError::AlreadyUsed(_)));
    assert_eq!(h.store.account_count(), 1);
}

#[tokio::test]
async fn mid_saga_failure_leaves_no_partial_vendor() {
    let h = Harness::new();
    let code = h.invite_vendor("v@x.com", "Acme Paving").await;
    h.store.fail_on(FailPoint::InsertDocument);

    let err = h
        .vendor_onboarding()
        .handle(vendor_form(&code, vec![upload(DocumentType::W9, "w9.pdf")]))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(h.store.account_count(), 0);
    assert_eq!(h.store.profile_count(), 0);

    // The code is still redeemable once storage recovers.
    h.store.clear_failures();
    let result = h
        .vendor_onboarding()
        .handle(vendor_form(&code, vec![upload(DocumentType::W9, "w9.pdf")]))
        .await
        .unwrap();
    assert_eq!(result.documents.len(), 1);
}

#[tokio::test]
async fn broken_compensation_is_surfaced_as_partial_onboarding() {
    let h = Harness::new();
    let code = h.invite_vendor("v@x.com", "Acme Paving").await;
    h.store.fail_on(FailPoint::ConsumeInvitation);
    h.store.fail_on(FailPoint::DeleteDocument);

    let err = h
        .vendor_onboarding()
        .handle(vendor_form(&code, vec![upload(DocumentType::Coi, "coi.pdf")]))
        .await
        .unwrap_err();

    match err {
        InvitationError::PartiallyOnboarded { failed_step, .. } => {
            assert_eq!(failed_step, "delete_document")
        }
        other => panic!("unexpected error: {}", other),
    }
}
