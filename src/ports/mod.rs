//! Ports - Interfaces between the workflow core and its collaborators.
//!
//! Handlers depend on these traits only; adapters implement them.

mod account_repository;
mod clock;
mod document_repository;
mod invitation_repository;
mod notification_dispatcher;
mod notification_outbox;
mod password_hasher;
mod vendor_profile_repository;
mod work_item_store;

pub use account_repository::AccountRepository;
pub use clock::Clock;
pub use document_repository::{DocumentRepository, ReviewOutcome};
pub use invitation_repository::{ConsumeOutcome, InsertOutcome, InvitationRepository};
pub use notification_dispatcher::NotificationDispatcher;
pub use notification_outbox::{
    NotificationOutbox, OutboxCleanup, OutboxEntry, OutboxStatus, ABANDONED_CLAIM_ERROR,
};
pub use password_hasher::PasswordHasher;
pub use vendor_profile_repository::VendorProfileRepository;
pub use work_item_store::WorkItemStore;
