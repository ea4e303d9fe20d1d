//! Invitation and onboarding error types.
//!
//! # Error Kinds
//!
//! | Error | Kind |
//! |-------|------|
//! | NotFound | NotFound |
//! | AlreadyUsed | Conflict |
//! | Expired | Expired |
//! | DuplicateActiveInvitation | Conflict |
//! | UserAlreadyExists | Conflict |
//! | EmailMismatch | Conflict |
//! | CodeSpaceExhausted | Conflict |
//! | WrongInvitationKind | Validation |
//! | ValidationFailed | Validation |
//! | Forbidden | Forbidden |
//! | PartiallyOnboarded | Downstream |
//! | Infrastructure | Downstream |

use crate::domain::foundation::{
    AccountId, DomainError, ErrorCode, ErrorKind, Role, ValidationError,
};

use super::{InvitationCode, InvitationKind};

/// Errors raised while issuing, validating or redeeming invitations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationError {
    /// No invitation exists for the code.
    NotFound(InvitationCode),

    /// The invitation has already been redeemed.
    AlreadyUsed(InvitationCode),

    /// The invitation is past its expiry.
    Expired(InvitationCode),

    /// An unexpired, unused invitation already exists for the email.
    DuplicateActiveInvitation(String),

    /// An account exists, or an invitation was already redeemed, for the email.
    UserAlreadyExists(String),

    /// Registrant email differs from the invited email.
    EmailMismatch(InvitationCode),

    /// The code belongs to the other onboarding path.
    WrongInvitationKind {
        code: InvitationCode,
        expected: InvitationKind,
    },

    /// No free code was found within the retry bound.
    CodeSpaceExhausted { attempts: u32 },

    /// The actor may not perform the operation.
    Forbidden { role: Role, action: String },

    /// Malformed input.
    ValidationFailed { field: String, message: String },

    /// A saga step failed and its compensation failed too.
    PartiallyOnboarded {
        account_id: AccountId,
        failed_step: String,
    },

    /// Persistence or collaborator failure.
    Infrastructure(String),
}

impl InvitationError {
    pub fn not_found(code: InvitationCode) -> Self {
        InvitationError::NotFound(code)
    }

    pub fn already_used(code: InvitationCode) -> Self {
        InvitationError::AlreadyUsed(code)
    }

    pub fn expired(code: InvitationCode) -> Self {
        InvitationError::Expired(code)
    }

    pub fn duplicate_active(email: impl Into<String>) -> Self {
        InvitationError::DuplicateActiveInvitation(email.into())
    }

    pub fn user_already_exists(email: impl Into<String>) -> Self {
        InvitationError::UserAlreadyExists(email.into())
    }

    pub fn email_mismatch(code: InvitationCode) -> Self {
        InvitationError::EmailMismatch(code)
    }

    pub fn wrong_kind(code: InvitationCode, expected: InvitationKind) -> Self {
        InvitationError::WrongInvitationKind { code, expected }
    }

    pub fn code_space_exhausted(attempts: u32) -> Self {
        InvitationError::CodeSpaceExhausted { attempts }
    }

    pub fn forbidden(role: Role, action: impl Into<String>) -> Self {
        InvitationError::Forbidden {
            role,
            action: action.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        InvitationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn partially_onboarded(account_id: AccountId, failed_step: impl Into<String>) -> Self {
        InvitationError::PartiallyOnboarded {
            account_id,
            failed_step: failed_step.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        InvitationError::Infrastructure(message.into())
    }

    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvitationError::NotFound(_) => ErrorKind::NotFound,
            InvitationError::Expired(_) => ErrorKind::Expired,
            InvitationError::AlreadyUsed(_)
            | InvitationError::DuplicateActiveInvitation(_)
            | InvitationError::UserAlreadyExists(_)
            | InvitationError::EmailMismatch(_)
            | InvitationError::CodeSpaceExhausted { .. } => ErrorKind::Conflict,
            InvitationError::WrongInvitationKind { .. }
            | InvitationError::ValidationFailed { .. } => ErrorKind::Validation,
            InvitationError::Forbidden { .. } => ErrorKind::Forbidden,
            InvitationError::PartiallyOnboarded { .. } | InvitationError::Infrastructure(_) => {
                ErrorKind::Downstream
            }
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            InvitationError::NotFound(_) => ErrorCode::InvitationNotFound,
            InvitationError::AlreadyUsed(_) => ErrorCode::InvitationAlreadyUsed,
            InvitationError::Expired(_) => ErrorCode::InvitationExpired,
            InvitationError::DuplicateActiveInvitation(_) => ErrorCode::DuplicateActiveInvitation,
            InvitationError::UserAlreadyExists(_) => ErrorCode::UserAlreadyExists,
            InvitationError::EmailMismatch(_) => ErrorCode::EmailMismatch,
            InvitationError::CodeSpaceExhausted { .. } => ErrorCode::CodeSpaceExhausted,
            InvitationError::WrongInvitationKind { .. }
            | InvitationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            InvitationError::Forbidden { .. } => ErrorCode::Forbidden,
            InvitationError::PartiallyOnboarded { .. } => ErrorCode::PartialOnboarding,
            InvitationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message specific to the failure.
    pub fn message(&self) -> String {
        match self {
            InvitationError::NotFound(code) => format!("Invitation code {} was not found", code),
            InvitationError::AlreadyUsed(code) => {
                format!("Invitation code {} has already been used", code)
            }
            InvitationError::Expired(code) => format!("Invitation code {} has expired", code),
            InvitationError::DuplicateActiveInvitation(email) => {
                format!("An active invitation already exists for {}", email)
            }
            InvitationError::UserAlreadyExists(email) => {
                format!("A user already exists for {}", email)
            }
            InvitationError::EmailMismatch(code) => format!(
                "Email does not match the address invitation {} was sent to",
                code
            ),
            InvitationError::WrongInvitationKind { code, expected } => format!(
                "Invitation code {} is not a {} invitation",
                code,
                expected.as_str()
            ),
            InvitationError::CodeSpaceExhausted { attempts } => format!(
                "Could not generate a unique invitation code after {} attempts",
                attempts
            ),
            InvitationError::Forbidden { role, action } => {
                format!("Role '{}' may not {}", role, action)
            }
            InvitationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            InvitationError::PartiallyOnboarded {
                account_id,
                failed_step,
            } => format!(
                "Onboarding for account {} stopped at '{}' and could not be rolled back",
                account_id, failed_step
            ),
            InvitationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Only downstream failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Downstream
    }
}

impl std::fmt::Display for InvitationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for InvitationError {}

impl From<ValidationError> for InvitationError {
    fn from(err: ValidationError) -> Self {
        InvitationError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for InvitationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::UserAlreadyExists => InvitationError::UserAlreadyExists(
                err.details.get("email").cloned().unwrap_or_default(),
            ),
            ErrorCode::ValidationFailed => InvitationError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => InvitationError::Infrastructure(err.to_string()),
        }
    }
}

impl From<InvitationError> for DomainError {
    fn from(err: InvitationError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
