//! Assignment handlers - Assignee mutations and their notifications.

mod diff_notifier;
mod mutate_assignees;

pub use diff_notifier::{AssignmentDiffNotifier, AssignmentNotificationReport};
pub use mutate_assignees::{MutateAssigneesCommand, MutateAssigneesHandler, MutateAssigneesResult};
