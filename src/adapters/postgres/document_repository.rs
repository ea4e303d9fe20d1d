//! PostgreSQL implementation of DocumentRepository.
//!
//! Reviews are a compare-and-set on `status = 'pending'`; the review
//! notification is written in the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::notification_outbox::insert_intents;
use crate::domain::compliance::{ComplianceDocument, DocumentFile, DocumentStatus, DocumentType};
use crate::domain::foundation::{
    AccountId, DocumentId, DomainError, ErrorCode, Timestamp, VendorProfileId,
};
use crate::domain::notification::NotificationIntent;
use crate::ports::{DocumentRepository, ReviewOutcome};

const DOCUMENT_COLUMNS: &str = "id, vendor_id, document_type, file_name, content_type, \
     storage_key, size_bytes, status, rejection_reason, reviewed_by, reviewed_at, submitted_at";

/// PostgreSQL implementation of the DocumentRepository port.
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    vendor_id: Uuid,
    document_type: String,
    file_name: String,
    content_type: String,
    storage_key: String,
    size_bytes: i64,
    status: String,
    rejection_reason: Option<String>,
    reviewed_by: Option<Uuid>,
    reviewed_at: Option<DateTime<Utc>>,
    submitted_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for ComplianceDocument {
    type Error = DomainError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let document_type = row.document_type.parse::<DocumentType>().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid document_type: {}", e))
        })?;
        let status = row.status.parse::<DocumentStatus>().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid status: {}", e))
        })?;

        Ok(ComplianceDocument {
            id: DocumentId::from_uuid(row.id),
            vendor_id: VendorProfileId::from_uuid(row.vendor_id),
            document_type,
            file: DocumentFile {
                file_name: row.file_name,
                content_type: row.content_type,
                storage_key: row.storage_key,
                size_bytes: u64::try_from(row.size_bytes).unwrap_or_default(),
            },
            status,
            rejection_reason: row.rejection_reason,
            reviewed_by: row.reviewed_by.map(AccountId::from_uuid),
            reviewed_at: row.reviewed_at.map(Timestamp::from_datetime),
            submitted_at: Timestamp::from_datetime(row.submitted_at),
        })
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, document: &ComplianceDocument) -> Result<(), DomainError> {
        sqlx::query(&format!(
            "INSERT INTO compliance_documents ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            DOCUMENT_COLUMNS
        ))
        .bind(document.id.as_uuid())
        .bind(document.vendor_id.as_uuid())
        .bind(document.document_type.as_str())
        .bind(&document.file.file_name)
        .bind(&document.file.content_type)
        .bind(&document.file.storage_key)
        .bind(i64::try_from(document.file.size_bytes).unwrap_or(i64::MAX))
        .bind(document.status.as_str())
        .bind(&document.rejection_reason)
        .bind(document.reviewed_by.map(|id| *id.as_uuid()))
        .bind(document.reviewed_at.map(|t| *t.as_datetime()))
        .bind(document.submitted_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert document: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<ComplianceDocument>, DomainError> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM compliance_documents WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.map(ComplianceDocument::try_from).transpose()
    }

    async fn list_by_vendor(
        &self,
        vendor_id: &VendorProfileId,
    ) -> Result<Vec<ComplianceDocument>, DomainError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM compliance_documents WHERE vendor_id = $1 ORDER BY submitted_at DESC",
            DOCUMENT_COLUMNS
        ))
        .bind(vendor_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(DomainError::database)?;

        rows.into_iter().map(ComplianceDocument::try_from).collect()
    }

    async fn record_review(
        &self,
        document: &ComplianceDocument,
        intents: &[NotificationIntent],
    ) -> Result<ReviewOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(DomainError::database)?;

        let result = sqlx::query(
            r#"
            UPDATE compliance_documents
            SET status = $2, rejection_reason = $3, reviewed_by = $4, reviewed_at = $5
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.status.as_str())
        .bind(&document.rejection_reason)
        .bind(document.reviewed_by.map(|id| *id.as_uuid()))
        .bind(document.reviewed_at.map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record review: {}", e)))?;

        if result.rows_affected() == 1 {
            insert_intents(&mut *tx, intents).await?;
            tx.commit().await.map_err(DomainError::database)?;
            return Ok(ReviewOutcome::Recorded);
        }
        drop(tx);

        let current: Option<(String,)> =
            sqlx::query_as("SELECT status FROM compliance_documents WHERE id = $1")
                .bind(document.id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(DomainError::database)?;

        match current {
            None => Ok(ReviewOutcome::NotFound),
            Some((status,)) => {
                let status = status.parse::<DocumentStatus>().map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Invalid status: {}", e))
                })?;
                Ok(ReviewOutcome::AlreadyReviewed(status))
            }
        }
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM compliance_documents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete document: {}", e)))?;

        Ok(())
    }
}
