//! Notification domain - Outbox intents and their rendering.

mod intent;
mod render;

pub use intent::{NotificationIntent, NotificationKind};
pub use render::{escape_html, render, RenderContext, RenderedEmail};
