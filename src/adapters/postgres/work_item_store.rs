//! PostgreSQL implementation of WorkItemStore.
//!
//! Tasks, projects and work orders live in `work_items`; assignment is a
//! join table replaced wholesale on every update.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::assignment::{AssigneeSet, WorkItemKind, WorkItemSummary};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, WorkItemId};
use crate::ports::WorkItemStore;

/// PostgreSQL implementation of the WorkItemStore port.
#[derive(Clone)]
pub struct PostgresWorkItemStore {
    pool: PgPool,
}

impl PostgresWorkItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkItemRow {
    id: Uuid,
    kind: String,
    title: String,
    description: Option<String>,
    due_date: Option<NaiveDate>,
    priority: Option<String>,
}

impl TryFrom<WorkItemRow> for WorkItemSummary {
    type Error = DomainError;

    fn try_from(row: WorkItemRow) -> Result<Self, Self::Error> {
        Ok(WorkItemSummary {
            id: WorkItemId::from_uuid(row.id),
            kind: parse_kind(&row.kind)?,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            priority: row.priority,
        })
    }
}

fn parse_kind(s: &str) -> Result<WorkItemKind, DomainError> {
    match s {
        "task" => Ok(WorkItemKind::Task),
        "project" => Ok(WorkItemKind::Project),
        "work_order" => Ok(WorkItemKind::WorkOrder),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid work item kind value: {}", s),
        )),
    }
}

#[async_trait]
impl WorkItemStore for PostgresWorkItemStore {
    async fn find_summary(&self, id: &WorkItemId) -> Result<Option<WorkItemSummary>, DomainError> {
        let row: Option<WorkItemRow> = sqlx::query_as(
            r#"
            SELECT id, kind, title, description, due_date, priority
            FROM work_items WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.map(WorkItemSummary::try_from).transpose()
    }

    async fn replace_assignees(
        &self,
        id: &WorkItemId,
        assignees: &AssigneeSet,
    ) -> Result<Option<AssigneeSet>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(DomainError::database)?;

        // 1. Lock the item so concurrent edits diff against each other
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM work_items WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(DomainError::database)?;
        if exists.is_none() {
            return Ok(None);
        }

        // 2. Read the previous set
        let previous: Vec<(Uuid,)> =
            sqlx::query_as("SELECT account_id FROM work_item_assignees WHERE work_item_id = $1")
                .bind(id.as_uuid())
                .fetch_all(&mut *tx)
                .await
                .map_err(DomainError::database)?;

        // 3. Replace
        sqlx::query("DELETE FROM work_item_assignees WHERE work_item_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(DomainError::database)?;

        let account_ids: Vec<Uuid> = assignees.iter().map(|a| *a.as_uuid()).collect();
        if !account_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO work_item_assignees (work_item_id, account_id)
                SELECT $1, UNNEST($2::uuid[])
                "#,
            )
            .bind(id.as_uuid())
            .bind(&account_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to assign work item: {}", e)))?;
        }

        tx.commit().await.map_err(DomainError::database)?;

        Ok(Some(
            previous
                .into_iter()
                .map(|(account_id,)| AccountId::from_uuid(account_id))
                .collect(),
        ))
    }
}
