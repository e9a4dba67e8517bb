//! Common error infrastructure for movement-core.
//!
//! Runtime pursuit failures are never errors: a lost or destroyed target ends
//! the generator through [`crate::StopReason`], and a degraded route only
//! clears [`crate::TargetedMovement::is_reachable`]. The types here cover
//! misuse at construction and configuration time.

use crate::state::EntityId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same request may succeed later.
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    Validation,

    /// Unexpected state inconsistency that indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Lowercase label used in log fields.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if the failed request may be retried unchanged.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all movement-core errors.
pub trait MovementError: core::fmt::Display + core::fmt::Debug {
    /// Category used to pick a recovery strategy.
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while establishing a target link.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// An entity cannot pursue or follow itself.
    #[error("entity {0} cannot be linked to itself")]
    SelfLink(EntityId),
}

impl MovementError for LinkError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            LinkError::SelfLink(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            LinkError::SelfLink(_) => "LINK_SELF",
        }
    }
}

/// Errors raised by pursuit parameter validation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PursuitError {
    #[error("offset must be a finite non-negative distance, got {0}")]
    InvalidOffset(f32),

    #[error("angle must be finite, got {0}")]
    InvalidAngle(f32),

    #[error("configuration field `{field}` is invalid: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

impl MovementError for PursuitError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            PursuitError::InvalidOffset(_) => "PURSUIT_INVALID_OFFSET",
            PursuitError::InvalidAngle(_) => "PURSUIT_INVALID_ANGLE",
            PursuitError::InvalidConfig { .. } => "PURSUIT_INVALID_CONFIG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        let err = LinkError::SelfLink(EntityId(3));
        assert_eq!(err.error_code(), "LINK_SELF");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.to_string(), "entity #3 cannot be linked to itself");

        let err = PursuitError::InvalidOffset(-1.0);
        assert_eq!(err.error_code(), "PURSUIT_INVALID_OFFSET");
        assert!(!err.severity().is_recoverable());
    }
}
