//! The legacy compact envelope used to persist and restore key instances.
//!
//! The envelope is a length-prefixed textual format:
//!
//! ```text
//! C:<nameLength>:"<TypeName>":<payloadLength>:{s:<valueLength>:"<value>";}
//! ```
//!
//! Every length is the exact byte count of the immediately following quoted
//! or braced content, and [`decode`] verifies them byte for byte so that a
//! truncated or padded envelope is always rejected. The type names on the
//! wire are fixed by the existing persisted data and map onto the closed
//! [`TypeTag`] set; decoding reconstructs instances through
//! [`Key::from_trusted`], so the stored value is not re-validated (see the
//! trait documentation for the trust boundary this implies).

use std::fmt;

use crate::key::{GenericKey, Key};
use crate::uuid::Uuid;
use crate::KeyError;

/// The closed set of key types that can travel in an envelope.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeTag {
    /// A generic pass-through key.
    Generic,
    /// An RFC 4122 UUID.
    Uuid,
}

impl TypeTag {
    /// Returns the type name carried on the wire for this tag.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Generic => r"BrightNucleus\Keys\Key",
            Self::Uuid => r"BrightNucleus\Keys\UUID",
        }
    }

    /// Maps a declared wire name back onto the closed tag set.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            _ if name == Self::Generic.wire_name() => Some(Self::Generic),
            _ if name == Self::Uuid.wire_name() => Some(Self::Uuid),
            _ => None,
        }
    }
}

/// A key decoded from an envelope, one variant per supported key type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum AnyKey {
    /// A decoded generic key.
    Generic(GenericKey),
    /// A decoded UUID.
    Uuid(Uuid),
}

impl AnyKey {
    /// Returns the tag of the decoded key type.
    pub const fn tag(&self) -> TypeTag {
        match self {
            Self::Generic(_) => TypeTag::Generic,
            Self::Uuid(_) => TypeTag::Uuid,
        }
    }

    /// Returns the wrapped value in its structured interchange form.
    pub fn interchange_value(&self) -> String {
        match self {
            Self::Generic(key) => key.interchange_value(),
            Self::Uuid(uuid) => uuid.interchange_value(),
        }
    }

    /// Re-encodes the key into its envelope form.
    pub fn encode(&self) -> String {
        match self {
            Self::Generic(key) => encode(key),
            Self::Uuid(uuid) => encode(uuid),
        }
    }
}

impl fmt::Display for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic(key) => fmt::Display::fmt(key, f),
            Self::Uuid(uuid) => fmt::Display::fmt(uuid, f),
        }
    }
}

impl From<GenericKey> for AnyKey {
    fn from(src: GenericKey) -> Self {
        Self::Generic(src)
    }
}

impl From<Uuid> for AnyKey {
    fn from(src: Uuid) -> Self {
        Self::Uuid(src)
    }
}

/// Encodes a key into the compact envelope form.
///
/// # Examples
///
/// ```rust
/// use bright_keys::{envelope, GenericKey};
///
/// let key = GenericKey::new("testKey");
/// assert_eq!(
///     envelope::encode(&key),
///     "C:22:\"BrightNucleus\\Keys\\Key\":14:{s:7:\"testKey\";}"
/// );
/// ```
pub fn encode<K: Key>(key: &K) -> String {
    let name = K::TAG.wire_name();
    let value = key.interchange_value();
    let payload = format!("s:{}:\"{}\";", value.len(), value);
    format!(
        "C:{}:\"{}\":{}:{{{}}}",
        name.len(),
        name,
        payload.len(),
        payload
    )
}

/// Decodes a compact envelope, reconstructing the declared key type.
///
/// The declared type name selects the concrete type; the extracted value is
/// reconstructed through the trusted path without re-validation.
pub fn decode(envelope: &str) -> Result<AnyKey, KeyError> {
    let mut outer = Cursor::new(envelope.as_bytes());
    outer.expect("C:")?;
    let name_len = outer.read_length()?;
    outer.expect(":\"")?;
    let name = outer.take_str(name_len, "type name")?;
    outer.expect("\":")?;
    let payload_len = outer.read_length()?;
    outer.expect(":{")?;
    let payload = outer.take(payload_len, "payload")?;
    outer.expect("}")?;
    outer.expect_end()?;

    let mut inner = Cursor::new(payload);
    inner.expect("s:")?;
    let value_len = inner.read_length()?;
    inner.expect(":\"")?;
    let value = inner.take_str(value_len, "value")?;
    inner.expect("\";")?;
    inner.expect_end()?;

    let tag = TypeTag::from_wire_name(name).ok_or_else(|| KeyError::UnknownTypeName {
        name: name.to_owned(),
    })?;
    match tag {
        TypeTag::Generic => GenericKey::from_trusted(value).map(AnyKey::Generic),
        TypeTag::Uuid => Uuid::from_trusted(value).map(AnyKey::Uuid),
    }
}

/// Byte-exact parser over the envelope text.
struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn expect(&mut self, token: &str) -> Result<(), KeyError> {
        let end = self.pos + token.len();
        if self.input.get(self.pos..end) == Some(token.as_bytes()) {
            self.pos = end;
            Ok(())
        } else {
            Err(KeyError::malformed_envelope(format!(
                "expected {token:?} at byte {}",
                self.pos
            )))
        }
    }

    fn expect_end(&self) -> Result<(), KeyError> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(KeyError::malformed_envelope(format!(
                "trailing bytes after offset {}",
                self.pos
            )))
        }
    }

    /// Reads a decimal length prefix, leaving the cursor on the byte after
    /// the last digit.
    fn read_length(&mut self) -> Result<usize, KeyError> {
        let start = self.pos;
        while self.input.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        let digits = &self.input[start..self.pos];
        if digits.is_empty() {
            return Err(KeyError::malformed_envelope(format!(
                "expected a length at byte {start}"
            )));
        }
        // digits are ASCII by construction
        std::str::from_utf8(digits)
            .expect("length digits are ASCII")
            .parse()
            .map_err(|_| KeyError::malformed_envelope(format!("length out of range at byte {start}")))
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], KeyError> {
        let end = self.pos.checked_add(len).ok_or_else(|| {
            KeyError::malformed_envelope(format!("length out of range for {what}"))
        })?;
        let bytes = self.input.get(self.pos..end).ok_or_else(|| {
            KeyError::malformed_envelope(format!("{what} shorter than its declared length"))
        })?;
        self.pos = end;
        Ok(bytes)
    }

    fn take_str(&mut self, len: usize, what: &str) -> Result<&'a str, KeyError> {
        let bytes = self.take(len, what)?;
        std::str::from_utf8(bytes)
            .map_err(|_| KeyError::malformed_envelope(format!("{what} is not valid UTF-8")))
    }
}
