//! Invitation domain - Time-boxed, single-use codes gating account creation.

mod code;
mod errors;
mod invitation;
mod policy;
mod state;

pub use code::{InvitationCode, MAX_CODE_LENGTH, MIN_CODE_LENGTH};
pub use errors::InvitationError;
pub use invitation::{
    EmployeeInvitation, Invitation, InvitationGate, InvitationKind, InvitationLifecycle,
    VendorInvitation,
};
pub use policy::InvitationPolicy;
pub use state::InvitationState;
