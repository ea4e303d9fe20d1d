//! Notification delivery.

mod relay;

pub use relay::{NotificationRelay, RelayConfig, RelayReport};
