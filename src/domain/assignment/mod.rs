//! Assignment domain - Work item assignee sets and their diffs.

mod assignee_set;
mod errors;
mod work_item;

pub use assignee_set::AssigneeSet;
pub use errors::AssignmentError;
pub use work_item::{WorkItemKind, WorkItemSummary};
