//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresInvitationRepository` - Invitations with atomic issue and consume
//! - `PostgresAccountRepository` - Portal accounts
//! - `PostgresVendorProfileRepository` - Vendor company profiles
//! - `PostgresDocumentRepository` - Compliance documents with CAS review
//! - `PostgresWorkItemStore` - Work item summaries and assignee sets
//! - `PostgresNotificationOutbox` - Durable notification intents
//!
//! Schema lives in `migrations/`.

mod account_repository;
mod document_repository;
mod invitation_repository;
mod notification_outbox;
mod vendor_profile_repository;
mod work_item_store;

pub use account_repository::PostgresAccountRepository;
pub use document_repository::PostgresDocumentRepository;
pub use invitation_repository::PostgresInvitationRepository;
pub use notification_outbox::PostgresNotificationOutbox;
pub use vendor_profile_repository::PostgresVendorProfileRepository;
pub use work_item_store::PostgresWorkItemStore;
