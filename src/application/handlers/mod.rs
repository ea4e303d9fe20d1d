//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over ports.

pub mod assignment;
pub mod compliance;
pub mod invitation;
pub mod onboarding;

pub use assignment::{
    AssignmentDiffNotifier, AssignmentNotificationReport, MutateAssigneesCommand,
    MutateAssigneesHandler, MutateAssigneesResult,
};
pub use compliance::{
    ListVendorDocumentsHandler, ListVendorDocumentsQuery, ReviewDecision, ReviewDocumentCommand,
    ReviewDocumentHandler, ReviewDocumentResult, SubmitDocumentCommand, SubmitDocumentHandler,
};
pub use invitation::{
    ConsumeInvitationCommand, ConsumeInvitationHandler, InvitationStatusView,
    IssueInvitationCommand, IssueInvitationHandler, IssueInvitationResult,
    ValidateInvitationHandler, ValidateInvitationQuery, ValidateInvitationResult,
};
pub use onboarding::{
    CompleteVendorOnboardingCommand, CompleteVendorOnboardingHandler,
    CompleteVendorOnboardingResult, DocumentUpload, RegisterEmployeeCommand,
    RegisterEmployeeHandler, RegisterEmployeeResult,
};
