//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, roles, and error types
//! that form the vocabulary of the onboarding domain.

mod actor;
mod email;
mod errors;
mod ids;
mod role;
mod state_machine;
mod timestamp;

pub use actor::Actor;
pub use email::EmailAddress;
pub use errors::{DomainError, ErrorCode, ErrorKind, ValidationError};
pub use ids::{AccountId, DocumentId, VendorProfileId, WorkItemId};
pub use role::Role;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
