//! Assignment error types.

use crate::domain::foundation::{
    DomainError, ErrorCode, ErrorKind, Role, ValidationError, WorkItemId,
};

/// Errors raised when changing who is assigned to a work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    NotFound(WorkItemId),
    Forbidden { role: Role, action: String },
    ValidationFailed { field: String, message: String },
    Infrastructure(String),
}

impl AssignmentError {
    pub fn not_found(id: WorkItemId) -> Self {
        AssignmentError::NotFound(id)
    }

    pub fn forbidden(role: Role, action: impl Into<String>) -> Self {
        AssignmentError::Forbidden {
            role,
            action: action.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AssignmentError::NotFound(_) => ErrorKind::NotFound,
            AssignmentError::Forbidden { .. } => ErrorKind::Forbidden,
            AssignmentError::ValidationFailed { .. } => ErrorKind::Validation,
            AssignmentError::Infrastructure(_) => ErrorKind::Downstream,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AssignmentError::NotFound(_) => ErrorCode::WorkItemNotFound,
            AssignmentError::Forbidden { .. } => ErrorCode::Forbidden,
            AssignmentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            AssignmentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AssignmentError::NotFound(id) => format!("Work item not found: {}", id),
            AssignmentError::Forbidden { role, action } => {
                format!("Role '{}' may not {}", role, action)
            }
            AssignmentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            AssignmentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Downstream
    }
}

impl std::fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AssignmentError {}

impl From<ValidationError> for AssignmentError {
    fn from(err: ValidationError) -> Self {
        AssignmentError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for AssignmentError {
    fn from(err: DomainError) -> Self {
        AssignmentError::Infrastructure(err.to_string())
    }
}
