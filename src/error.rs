//! Error types for coordinator and reference faults.
//!
//! Two families:
//! - Programming-error faults (double enable, reference kind mismatch):
//!   returned immediately, never repaired here.
//! - Propagated extension faults: whatever an extension hook raised, wrapped
//!   with the failing extension's identity and the phase it failed in.

use thiserror::Error;

use crate::types::{ExtensionKind, Phase};

/// Faults raised by the extension coordinator.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// An enable-* operation was called a second time for the same kind.
    #[error("{kind} has already been enabled on this coordinator")]
    AlreadyEnabled { kind: ExtensionKind },

    /// An extension hook failed during dispatch. The remainder of the phase
    /// was aborted; earlier extensions in the list had already run.
    #[error("extension `{extension}` failed during {phase}")]
    ExtensionFault {
        extension: &'static str,
        phase: Phase,
        #[source]
        source: Box<dyn std::error::Error>,
    },
}

/// Faults raised by the reference protocol.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// `should_update` was asked to compare references of two different
    /// concrete kinds. Defaulting to "no update" here would hide a type
    /// mismatch as a no-op, so it faults instead.
    #[error("cannot compare reference kinds `{previous}` and `{next}`")]
    KindMismatch {
        previous: &'static str,
        next: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_already_enabled_message() {
        let err = CoordinatorError::AlreadyEnabled {
            kind: ExtensionKind::Transitions,
        };
        assert_eq!(
            err.to_string(),
            "transitions has already been enabled on this coordinator"
        );
    }

    #[test]
    fn test_extension_fault_carries_identity() {
        let err = CoordinatorError::ExtensionFault {
            extension: "visibility",
            phase: Phase::BeforeMount,
            source: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "extension `visibility` failed during before_mount"
        );
        assert_eq!(err.source().unwrap().to_string(), "boom");
    }

    #[test]
    fn test_kind_mismatch_message() {
        let err = ReferenceError::KindMismatch {
            previous: "pooled",
            next: "counting",
        };
        assert_eq!(
            err.to_string(),
            "cannot compare reference kinds `pooled` and `counting`"
        );
    }
}
