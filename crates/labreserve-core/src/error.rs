//! Unified application error types for LabReserve.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Expected business rejections
//! (unavailable resource, suspended requester, insufficient stock for a
//! block claim) are ordinary error values carrying a renderable message,
//! never panics.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested record was not found.
    NotFound,
    /// The caller does not have permission to perform the action.
    Authorization,
    /// Input validation failed.
    Validation,
    /// A generic conflict occurred (concurrent modification, etc.).
    Conflict,
    /// A resource with the same name or address is already registered.
    DuplicateResource,
    /// The resource cannot be removed while a live reservation references it.
    ResourceInUse,
    /// The resource is offline, under repair, or already claimed.
    ResourceUnavailable,
    /// An illegal reservation state transition was attempted.
    InvalidTransition,
    /// The requester already holds a pending or running reservation.
    RequesterHasActiveReservation,
    /// The requester already holds a pending or confirmed block reservation.
    RequesterHasActiveBlock,
    /// Fewer resources are available than the block claim requires.
    InsufficientResources,
    /// The requester is suspended and may not book.
    RequesterSuspended,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::DuplicateResource => write!(f, "DUPLICATE_RESOURCE"),
            Self::ResourceInUse => write!(f, "RESOURCE_IN_USE"),
            Self::ResourceUnavailable => write!(f, "RESOURCE_UNAVAILABLE"),
            Self::InvalidTransition => write!(f, "INVALID_TRANSITION"),
            Self::RequesterHasActiveReservation => write!(f, "REQUESTER_HAS_ACTIVE_RESERVATION"),
            Self::RequesterHasActiveBlock => write!(f, "REQUESTER_HAS_ACTIVE_BLOCK"),
            Self::InsufficientResources => write!(f, "INSUFFICIENT_RESOURCES"),
            Self::RequesterSuspended => write!(f, "REQUESTER_SUSPENDED"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout LabReserve.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a duplicate-resource error.
    pub fn duplicate_resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateResource, message)
    }

    /// Create a resource-in-use error.
    pub fn resource_in_use(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceInUse, message)
    }

    /// Create a resource-unavailable rejection.
    pub fn resource_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceUnavailable, message)
    }

    /// Create an invalid-transition error.
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTransition, message)
    }

    /// Create an active-reservation rejection.
    pub fn active_reservation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequesterHasActiveReservation, message)
    }

    /// Create an active-block rejection.
    pub fn active_block(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequesterHasActiveBlock, message)
    }

    /// Create an insufficient-resources rejection.
    pub fn insufficient_resources(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientResources, message)
    }

    /// Create a requester-suspended rejection.
    pub fn requester_suspended(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequesterSuspended, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
