//! Work item store port.
//!
//! Narrow view of the CRUD backend that owns tasks, projects and work
//! orders: enough to read a summary and swap the assignee set.

use async_trait::async_trait;

use crate::domain::assignment::{AssigneeSet, WorkItemSummary};
use crate::domain::foundation::{DomainError, WorkItemId};

#[async_trait]
pub trait WorkItemStore: Send + Sync {
    async fn find_summary(&self, id: &WorkItemId) -> Result<Option<WorkItemSummary>, DomainError>;

    /// Replaces the assignees and returns the previous set, or `None` when
    /// the item does not exist. The swap is atomic per item.
    async fn replace_assignees(
        &self,
        id: &WorkItemId,
        assignees: &AssigneeSet,
    ) -> Result<Option<AssigneeSet>, DomainError>;
}
