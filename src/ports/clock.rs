//! Clock port - Source of "now" for expiry checks.

use crate::domain::foundation::Timestamp;

/// Supplies the current time.
///
/// Expiry is evaluated against this instead of the system clock so tests can
/// move time forward.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
