//! Email dispatchers.
//!
//! - `ResendDispatcher` - Production delivery over HTTP
//! - `RecordingDispatcher` - In-memory capture for tests and dry runs

mod recording_dispatcher;
mod resend_dispatcher;

pub use recording_dispatcher::{RecordingDispatcher, SentEmail};
pub use resend_dispatcher::{ResendConfig, ResendDispatcher};
