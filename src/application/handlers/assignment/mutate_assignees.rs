//! MutateAssigneesHandler - Command handler for changing who works on an item.

use std::sync::Arc;
use tracing::info;

use crate::domain::assignment::{AssigneeSet, AssignmentError, WorkItemSummary};
use crate::domain::foundation::{Actor, WorkItemId};
use crate::ports::{Clock, WorkItemStore};

use super::{AssignmentDiffNotifier, AssignmentNotificationReport};

/// Command to replace the assignees of a task, project or work order.
#[derive(Debug, Clone)]
pub struct MutateAssigneesCommand {
    pub actor: Actor,
    pub work_item_id: WorkItemId,
    pub assignees: AssigneeSet,
}

/// Result of a committed mutation.
#[derive(Debug, Clone)]
pub struct MutateAssigneesResult {
    pub item: WorkItemSummary,
    pub previous: AssigneeSet,
    pub current: AssigneeSet,
    pub notifications: AssignmentNotificationReport,
}

/// Handler for assignee mutations.
pub struct MutateAssigneesHandler {
    store: Arc<dyn WorkItemStore>,
    notifier: AssignmentDiffNotifier,
    clock: Arc<dyn Clock>,
}

impl MutateAssigneesHandler {
    pub fn new(
        store: Arc<dyn WorkItemStore>,
        notifier: AssignmentDiffNotifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: MutateAssigneesCommand,
    ) -> Result<MutateAssigneesResult, AssignmentError> {
        // 1. Vendors only see their own items
        if !cmd.actor.role.is_internal() {
            return Err(AssignmentError::forbidden(
                cmd.actor.role,
                "change work item assignees",
            ));
        }

        // 2. Swap the set
        let item = self
            .store
            .find_summary(&cmd.work_item_id)
            .await?
            .ok_or_else(|| AssignmentError::not_found(cmd.work_item_id))?;
        let previous = self
            .store
            .replace_assignees(&cmd.work_item_id, &cmd.assignees)
            .await?
            .ok_or_else(|| AssignmentError::not_found(cmd.work_item_id))?;

        info!(
            work_item_id = %item.id,
            kind = item.kind.as_str(),
            previous = previous.len(),
            current = cmd.assignees.len(),
            "Assignees updated"
        );

        // 3. Notify the newcomers; failures never undo the swap
        let notifications = self
            .notifier
            .notify(&item, &previous, &cmd.assignees, &cmd.actor, self.clock.now())
            .await;

        Ok(MutateAssigneesResult {
            item,
            previous,
            current: cmd.assignees,
            notifications,
        })
    }
}
