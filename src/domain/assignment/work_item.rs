//! Assignable work items as seen by the notifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::WorkItemId;

/// Kind of assignable work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    Task,
    Project,
    WorkOrder,
}

impl WorkItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemKind::Task => "task",
            WorkItemKind::Project => "project",
            WorkItemKind::WorkOrder => "work_order",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkItemKind::Task => "Task",
            WorkItemKind::Project => "Project",
            WorkItemKind::WorkOrder => "Work Order",
        }
    }
}

/// What a notification needs to know about a work item.
///
/// `title` is the task title, project name or work order number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemSummary {
    pub id: WorkItemId,
    pub kind: WorkItemKind,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<String>,
}

impl WorkItemSummary {
    pub fn new(id: WorkItemId, kind: WorkItemKind, title: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            description: None,
            due_date: None,
            priority: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}
