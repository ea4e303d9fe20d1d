//! Invitation handlers - Issue, validate and consume invitation codes.

mod consume_invitation;
mod issue_invitation;
mod validate_invitation;

pub(crate) use consume_invitation::consumed_or_error;
pub use consume_invitation::{ConsumeInvitationCommand, ConsumeInvitationHandler};
pub use issue_invitation::{IssueInvitationCommand, IssueInvitationHandler, IssueInvitationResult};
pub use validate_invitation::{
    InvitationStatusView, ValidateInvitationHandler, ValidateInvitationQuery,
    ValidateInvitationResult,
};
