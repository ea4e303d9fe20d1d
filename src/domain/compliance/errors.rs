//! Document review error types.

use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, ErrorKind, Role, ValidationError, VendorProfileId,
};

use super::DocumentStatus;

/// Errors raised by the document review ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentReviewError {
    /// Document was not found.
    NotFound(DocumentId),

    /// Vendor the document would belong to was not found.
    VendorNotFound(VendorProfileId),

    /// Document already carries a final decision.
    AlreadyReviewed {
        id: DocumentId,
        status: DocumentStatus,
    },

    /// The actor may not perform the operation.
    Forbidden { role: Role, action: String },

    /// Malformed input.
    ValidationFailed { field: String, message: String },

    /// Persistence failure.
    Infrastructure(String),
}

impl DocumentReviewError {
    pub fn not_found(id: DocumentId) -> Self {
        DocumentReviewError::NotFound(id)
    }

    pub fn vendor_not_found(id: VendorProfileId) -> Self {
        DocumentReviewError::VendorNotFound(id)
    }

    pub fn already_reviewed(id: DocumentId, status: DocumentStatus) -> Self {
        DocumentReviewError::AlreadyReviewed { id, status }
    }

    pub fn forbidden(role: Role, action: impl Into<String>) -> Self {
        DocumentReviewError::Forbidden {
            role,
            action: action.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DocumentReviewError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        DocumentReviewError::Infrastructure(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DocumentReviewError::NotFound(_) | DocumentReviewError::VendorNotFound(_) => {
                ErrorKind::NotFound
            }
            DocumentReviewError::AlreadyReviewed { .. } => ErrorKind::Conflict,
            DocumentReviewError::Forbidden { .. } => ErrorKind::Forbidden,
            DocumentReviewError::ValidationFailed { .. } => ErrorKind::Validation,
            DocumentReviewError::Infrastructure(_) => ErrorKind::Downstream,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentReviewError::NotFound(_) => ErrorCode::DocumentNotFound,
            DocumentReviewError::VendorNotFound(_) => ErrorCode::AccountNotFound,
            DocumentReviewError::AlreadyReviewed { .. } => ErrorCode::DocumentAlreadyReviewed,
            DocumentReviewError::Forbidden { .. } => ErrorCode::Forbidden,
            DocumentReviewError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            DocumentReviewError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            DocumentReviewError::NotFound(id) => format!("Document not found: {}", id),
            DocumentReviewError::VendorNotFound(id) => format!("Vendor not found: {}", id),
            DocumentReviewError::AlreadyReviewed { id, status } => {
                format!("Document {} was already {}", id, status)
            }
            DocumentReviewError::Forbidden { role, action } => {
                format!("Role '{}' may not {}", role, action)
            }
            DocumentReviewError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            DocumentReviewError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Downstream
    }
}

impl std::fmt::Display for DocumentReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DocumentReviewError {}

impl From<ValidationError> for DocumentReviewError {
    fn from(err: ValidationError) -> Self {
        DocumentReviewError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for DocumentReviewError {
    fn from(err: DomainError) -> Self {
        DocumentReviewError::Infrastructure(err.to_string())
    }
}

impl From<DocumentReviewError> for DomainError {
    fn from(err: DocumentReviewError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_reviewed_is_a_conflict() {
        let err = DocumentReviewError::already_reviewed(DocumentId::new(), DocumentStatus::Approved);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.code(), ErrorCode::DocumentAlreadyReviewed);
        assert!(err.message().contains("approved"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn infrastructure_is_retryable() {
        let err: DocumentReviewError = DomainError::database("io").into();
        assert!(err.is_retryable());
    }
}
