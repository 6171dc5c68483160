//! Error types shared across the key family.

use thiserror::Error;

/// The error type returned by validating constructors, version-gated
/// accessors, and the envelope codec.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
pub enum KeyError {
    /// A candidate value does not satisfy the structural invariant of the
    /// target key type. Carries the offending value for diagnostics.
    #[error("failed to validate {value:?} as {target}")]
    FailedToValidate {
        /// The rejected candidate value.
        value: String,
        /// Name of the key type the candidate was checked against.
        target: &'static str,
    },

    /// A version-specific accessor was invoked on a UUID whose version does
    /// not define that semantic (e.g. the timestamp of a random UUID).
    #[error("{operation} is only meaningful for version 1 UUIDs, not version {version}")]
    UnsupportedOperation {
        /// The accessor that was refused.
        operation: &'static str,
        /// The raw 4-bit version field of the receiver.
        version: u8,
    },

    /// An envelope could not be parsed against the compact grammar.
    #[error("malformed key envelope: {reason}")]
    MalformedEnvelope {
        /// Human-readable description of the first grammar violation.
        reason: String,
    },

    /// An envelope declared a type name outside the supported closed set.
    #[error("unknown key type name in envelope: {name:?}")]
    UnknownTypeName {
        /// The declared type name.
        name: String,
    },
}

impl KeyError {
    pub(crate) fn failed_to_validate(value: impl Into<String>, target: &'static str) -> Self {
        Self::FailedToValidate {
            value: value.into(),
            target,
        }
    }

    pub(crate) fn malformed_envelope(reason: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            reason: reason.into(),
        }
    }
}
