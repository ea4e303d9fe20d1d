//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Durable persistence and the notification outbox
//! - `memory` - Single-lock store for tests and local runs
//! - `email` - Email dispatchers (Resend, recording)
//! - `notifications` - Outbox relay
//! - `password` - Argon2 password hashing
//! - `clock` - System and fixed clocks

pub mod clock;
pub mod email;
pub mod memory;
pub mod notifications;
pub mod password;
pub mod postgres;

pub use clock::{FixedClock, SystemClock};
pub use email::{RecordingDispatcher, ResendConfig, ResendDispatcher, SentEmail};
pub use memory::{FailPoint, InMemoryStore};
pub use notifications::{NotificationRelay, RelayConfig, RelayReport};
pub use password::Argon2PasswordHasher;
