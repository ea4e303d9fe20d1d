//! Notification intents written to the outbox.
//!
//! A transition appends intents in the same write as its state change; the
//! relay renders and delivers them later. Intents carry everything needed to
//! render, so delivery never reads domain state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::assignment::WorkItemSummary;
use crate::domain::compliance::{DocumentStatus, DocumentType};
use crate::domain::foundation::{EmailAddress, Role, Timestamp};
use crate::domain::invitation::InvitationCode;

/// What happened, with the data the message needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    EmployeeInvitation {
        code: InvitationCode,
        role: Role,
        invited_by: String,
        expires_at: Timestamp,
    },
    VendorInvitation {
        code: InvitationCode,
        vendor_name: String,
        expires_at: Timestamp,
    },
    VendorAccountCreated {
        company_name: String,
        contact_name: String,
        username: String,
    },
    DocumentReviewed {
        company_name: String,
        document_type: DocumentType,
        status: DocumentStatus,
        reason: Option<String>,
    },
    Assigned {
        item: WorkItemSummary,
        recipient_role: Role,
        assigned_by: String,
    },
}

impl NotificationKind {
    /// Short name used in logs and the outbox `kind` column.
    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::EmployeeInvitation { .. } => "employee_invitation",
            NotificationKind::VendorInvitation { .. } => "vendor_invitation",
            NotificationKind::VendorAccountCreated { .. } => "vendor_account_created",
            NotificationKind::DocumentReviewed { .. } => "document_reviewed",
            NotificationKind::Assigned { .. } => "assigned",
        }
    }
}

/// A message that should be delivered once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub id: Uuid,
    pub recipient: EmailAddress,
    pub recipient_name: String,
    pub kind: NotificationKind,
    pub created_at: Timestamp,
}

impl NotificationIntent {
    pub fn new(
        recipient: EmailAddress,
        recipient_name: impl Into<String>,
        kind: NotificationKind,
        now: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient,
            recipient_name: recipient_name.into(),
            kind,
            created_at: now,
        }
    }
}
