//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write through a single conditional repository call per
//! state change; query handlers only read.

pub mod handlers;

pub use handlers::{
    // Invitation handlers
    ConsumeInvitationCommand, ConsumeInvitationHandler, InvitationStatusView,
    IssueInvitationCommand, IssueInvitationHandler, IssueInvitationResult,
    ValidateInvitationHandler, ValidateInvitationQuery, ValidateInvitationResult,
    // Onboarding handlers
    CompleteVendorOnboardingCommand, CompleteVendorOnboardingHandler,
    CompleteVendorOnboardingResult, DocumentUpload, RegisterEmployeeCommand,
    RegisterEmployeeHandler, RegisterEmployeeResult,
    // Compliance handlers
    ListVendorDocumentsHandler, ListVendorDocumentsQuery, ReviewDecision, ReviewDocumentCommand,
    ReviewDocumentHandler, ReviewDocumentResult, SubmitDocumentCommand, SubmitDocumentHandler,
    // Assignment handlers
    AssignmentDiffNotifier, AssignmentNotificationReport, MutateAssigneesCommand,
    MutateAssigneesHandler, MutateAssigneesResult,
};
