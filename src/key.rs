//! The key capability contract and the generic pass-through key.

use std::{convert, fmt, str};

use crate::envelope::TypeTag;
use crate::KeyError;

/// The capability every key type in the closed family implements.
///
/// A key wraps exactly one immutable value that passed [`validate`] at
/// construction time. The trait separates the two construction paths that
/// the envelope codec relies on: [`validate`] is the normal validating
/// constructor, while [`from_trusted`] reconstructs an instance from a value
/// that was validated when it was persisted. The read path trusts, the write
/// path validates; callers decoding envelopes from untrusted sources must
/// compensate by re-running [`validate`] themselves.
///
/// [`validate`]: Key::validate
/// [`from_trusted`]: Key::from_trusted
pub trait Key: Sized {
    /// The envelope discriminant identifying this key type on the wire.
    const TAG: TypeTag;

    /// Validates a candidate value and constructs the key from it.
    fn validate(candidate: &str) -> Result<Self, KeyError>;

    /// Reconstructs a key from a previously validated stored value.
    ///
    /// Implementations skip invariant validation and enforce only what is
    /// needed to represent the value at all; a failure therefore indicates a
    /// corrupt store rather than an invalid candidate.
    fn from_trusted(stored: &str) -> Result<Self, KeyError>;

    /// Checks candidate validity without constructing an instance. Never
    /// fails.
    fn is_valid(candidate: &str) -> bool {
        Self::validate(candidate).is_ok()
    }

    /// Returns the wrapped value in its structured interchange form.
    fn interchange_value(&self) -> String;
}

/// A generic validated key wrapping an arbitrary string.
///
/// This is the trivial member of the key family: every string is a valid
/// generic key, so validation is an identity pass-through. The value is
/// immutable after construction.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct GenericKey(String);

impl GenericKey {
    /// Creates a generic key from any string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the wrapped value.
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenericKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl str::FromStr for GenericKey {
    type Err = convert::Infallible;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(src))
    }
}

impl From<String> for GenericKey {
    fn from(src: String) -> Self {
        Self(src)
    }
}

impl From<&str> for GenericKey {
    fn from(src: &str) -> Self {
        Self::new(src)
    }
}

impl From<GenericKey> for String {
    fn from(src: GenericKey) -> Self {
        src.0
    }
}

impl Key for GenericKey {
    const TAG: TypeTag = TypeTag::Generic;

    fn validate(candidate: &str) -> Result<Self, KeyError> {
        Ok(Self::new(candidate))
    }

    fn from_trusted(stored: &str) -> Result<Self, KeyError> {
        Ok(Self::new(stored))
    }

    fn interchange_value(&self) -> String {
        self.0.clone()
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::{fmt, GenericKey};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for GenericKey {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.value())
        }
    }

    impl<'de> serde::Deserialize<'de> for GenericKey {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_string(VisitorImpl)
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = GenericKey;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a key string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(GenericKey::new(value))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(GenericKey::from(value))
        }
    }
}
