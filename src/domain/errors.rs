//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Validation error with message
    Validation(String),
    /// Uniqueness or state conflict
    Conflict(String),
    /// Missing or invalid credentials
    Unauthorized,
    /// Authenticated but not allowed to touch the resource
    Forbidden,
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Unauthorized => write!(f, "Unauthorized"),
            DomainError::Forbidden => write!(f, "Forbidden"),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

