use std::{fmt, ops, str, time};

use crate::envelope::TypeTag;
use crate::fields::Fields;
use crate::key::Key;
use crate::KeyError;

/// Number of 100-nanosecond intervals between the Gregorian epoch
/// (1582-10-15T00:00:00Z) and the Unix epoch.
pub(crate) const GREGORIAN_OFFSET_TICKS: u64 = 0x01b2_1dd2_1381_4000;

/// Represents a Universally Unique IDentifier according to RFC 4122.
///
/// A `Uuid` is an immutable 128-bit value. Equality compares the full value
/// bit for bit and, being typed, can never hold against a foreign identifier
/// type. The derived ordering is the unsigned big-endian lexical comparison
/// of the value, so the most significant differing field decides; this makes
/// `Uuid` usable directly as an ordered map key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Name space for fully-qualified domain names (RFC 4122 Appendix C).
    pub const NAMESPACE_DNS: Self = Self([
        0x6b, 0xa7, 0xb8, 0x10, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
        0xc8,
    ]);

    /// Name space for URLs (RFC 4122 Appendix C).
    pub const NAMESPACE_URL: Self = Self([
        0x6b, 0xa7, 0xb8, 0x11, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
        0xc8,
    ]);

    /// Name space for ISO OIDs (RFC 4122 Appendix C).
    pub const NAMESPACE_OID: Self = Self([
        0x6b, 0xa7, 0xb8, 0x12, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
        0xc8,
    ]);

    /// Name space for X.500 DNs (RFC 4122 Appendix C).
    pub const NAMESPACE_X500: Self = Self([
        0x6b, 0xa7, 0xb8, 0x14, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
        0xc8,
    ]);

    /// Returns a reference to the underlying big-endian byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUID from a slice that must contain exactly 16 bytes.
    pub fn from_slice(src: &[u8]) -> Result<Self, KeyError> {
        <[u8; 16]>::try_from(src)
            .map(Self)
            .map_err(|_| KeyError::failed_to_validate(format!("{src:02x?}"), "Uuid"))
    }

    /// Creates a UUID from the decimal string form of its 128-bit integer
    /// value.
    pub fn from_integer_str(src: &str) -> Result<Self, KeyError> {
        src.parse::<u128>()
            .map(Self::from)
            .map_err(|_| KeyError::failed_to_validate(src, "Uuid"))
    }

    /// Returns the 128-bit integer value, computed from the big-endian byte
    /// layout.
    pub const fn as_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Creates a version 1 UUID byte layout from a 60-bit timestamp, a
    /// 14-bit clock sequence, and a 48-bit node identifier.
    ///
    /// # Panics
    ///
    /// Panics if `ticks` or `clock_seq` exceeds its field width.
    pub const fn from_fields_v1(ticks: u64, clock_seq: u16, node: [u8; 6]) -> Self {
        if ticks >= 1 << 60 || clock_seq >= 1 << 14 {
            panic!("invalid field value");
        }

        Self([
            (ticks >> 24) as u8,
            (ticks >> 16) as u8,
            (ticks >> 8) as u8,
            ticks as u8,
            (ticks >> 40) as u8,
            (ticks >> 32) as u8,
            0x10 | ((ticks >> 56) as u8 & 0x0f),
            (ticks >> 48) as u8,
            0x80 | ((clock_seq >> 8) as u8 & 0x3f),
            clock_seq as u8,
            node[0],
            node[1],
            node[2],
            node[3],
            node[4],
            node[5],
        ])
    }

    /// Stamps the version and RFC 4122 variant bits over hashed or random
    /// input bytes.
    pub(crate) const fn from_stamped_bytes(mut bytes: [u8; 16], version: u8) -> Self {
        bytes[6] = (bytes[6] & 0x0f) | (version << 4);
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(bytes)
    }

    /// Decomposes the value into its RFC 4122 named fields.
    pub const fn fields(&self) -> Fields {
        Fields::from_bytes(&self.0)
    }

    /// Returns the variant that describes the layout of this UUID.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 5 {
            0b000..=0b011 => Variant::Ncs,
            0b100 | 0b101 => Variant::Rfc4122,
            0b110 => Variant::Microsoft,
            _ => Variant::Future,
        }
    }

    /// Returns the version number, or `None` if this UUID is not of the
    /// RFC 4122 variant (the version field is only meaningful there).
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Rfc4122 => Some(self.0[6] >> 4),
            _ => None,
        }
    }

    /// Returns the 60-bit timestamp as a count of 100-nanosecond intervals
    /// since 1582-10-15T00:00:00Z.
    ///
    /// The timestamp is only defined for time-based (version 1) UUIDs; any
    /// other version yields [`KeyError::UnsupportedOperation`].
    pub fn timestamp_ticks(&self) -> Result<u64, KeyError> {
        self.require_v1("timestamp_ticks")?;
        Ok(self.fields().timestamp_ticks())
    }

    /// Returns the timestamp as a [`time::SystemTime`].
    ///
    /// Only defined for time-based (version 1) UUIDs.
    pub fn system_time(&self) -> Result<time::SystemTime, KeyError> {
        self.require_v1("system_time")?;
        let ticks = self.fields().timestamp_ticks();
        if ticks >= GREGORIAN_OFFSET_TICKS {
            Ok(time::UNIX_EPOCH + ticks_to_duration(ticks - GREGORIAN_OFFSET_TICKS))
        } else {
            // pre-1970 timestamp
            Ok(time::UNIX_EPOCH - ticks_to_duration(GREGORIAN_OFFSET_TICKS - ticks))
        }
    }

    /// Returns the 48-bit node identifier as six big-endian bytes.
    ///
    /// Only defined for time-based (version 1) UUIDs, where the field holds
    /// an IEEE 802 address or a random surrogate with the multicast bit set.
    pub fn node_id(&self) -> Result<[u8; 6], KeyError> {
        self.require_v1("node_id")?;
        let mut node = [0u8; 6];
        node.copy_from_slice(&self.0[10..]);
        Ok(node)
    }

    fn require_v1(&self, operation: &'static str) -> Result<(), KeyError> {
        if self.version() == Some(1) {
            Ok(())
        } else {
            Err(KeyError::UnsupportedOperation {
                operation,
                version: self.0[6] >> 4,
            })
        }
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a
    /// stack-allocated structure that can be dereferenced as `str` and
    /// [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bright_keys::Uuid;
    ///
    /// let x = "63ab6383-0ad4-559a-b16b-afcec9cc77e9".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "63ab6383-0ad4-559a-b16b-afcec9cc77e9");
    /// # Ok::<(), bright_keys::KeyError>(())
    /// ```
    pub fn encode(&self) -> impl ops::Deref<Target = str> + fmt::Display {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for i in 0..16 {
            let e = self.0[i] as usize;
            *buf_iter.next().unwrap() = DIGITS[e >> 4];
            *buf_iter.next().unwrap() = DIGITS[e & 15];
            if i == 3 || i == 5 || i == 7 || i == 9 {
                *buf_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        UuidStr(buffer)
    }

    /// Returns the 32-character lowercase hexadecimal value, without hyphens.
    pub fn to_hex(&self) -> String {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut hex = String::with_capacity(32);
        for e in self.0 {
            hex.push(DIGITS[(e >> 4) as usize] as char);
            hex.push(DIGITS[(e & 15) as usize] as char);
        }
        hex
    }

    /// Returns the string representation as a URN in the `uuid` namespace.
    pub fn urn(&self) -> String {
        format!("urn:uuid:{}", self.encode())
    }
}

/// The variant field values defined by RFC 4122 §4.1.1.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// Reserved for NCS backward compatibility.
    Ncs,
    /// The RFC 4122 variant produced by this crate's generators.
    Rfc4122,
    /// Reserved for Microsoft backward compatibility.
    Microsoft,
    /// Reserved for future definition.
    Future,
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = KeyError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string
    /// representation. Uppercase hex digits are accepted on input; the
    /// canonical output form is always lowercase.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        parse_canonical(src).ok_or_else(|| KeyError::failed_to_validate(src, "Uuid"))
    }
}

fn parse_canonical(src: &str) -> Option<Uuid> {
    let mut dst = [0u8; 16];
    let mut iter = src.chars();
    for (i, e) in dst.iter_mut().enumerate() {
        let hi = iter.next()?.to_digit(16)? as u8;
        let lo = iter.next()?.to_digit(16)? as u8;
        *e = (hi << 4) | lo;
        if (i == 3 || i == 5 || i == 7 || i == 9) && iter.next()? != '-' {
            return None;
        }
    }
    iter.next().is_none().then_some(Uuid(dst))
}

fn ticks_to_duration(ticks: u64) -> time::Duration {
    time::Duration::new(ticks / 10_000_000, (ticks % 10_000_000) as u32 * 100)
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        src.as_u128()
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = KeyError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl From<Fields> for Uuid {
    fn from(src: Fields) -> Self {
        Self(src.to_bytes())
    }
}

impl Key for Uuid {
    const TAG: TypeTag = TypeTag::Uuid;

    fn validate(candidate: &str) -> Result<Self, KeyError> {
        candidate.parse()
    }

    fn from_trusted(stored: &str) -> Result<Self, KeyError> {
        // The stored form is assumed to have passed validation when it was
        // persisted; only structural representability is enforced here.
        stored.parse()
    }

    fn interchange_value(&self) -> String {
        self.to_string()
    }
}

/// Concrete return type of [`Uuid::encode()`] containing the stack-allocated
/// 8-4-4-4-12 string representation.
struct UuidStr([u8; 36]);

impl ops::Deref for UuidStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        debug_assert!(self.0.is_ascii());
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for UuidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_slice(value).map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Uuid;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases: [(&'static str, &'static [u8]); 3] = [
                ("00000000-0000-0000-0000-000000000000", &[0u8; 16]),
                (
                    "63ab6383-0ad4-559a-b16b-afcec9cc77e9",
                    &[
                        99, 171, 99, 131, 10, 212, 85, 154, 177, 107, 175, 206, 201, 204, 119,
                        233,
                    ],
                ),
                (
                    "20616934-4ba2-11e7-8000-010203040506",
                    &[32, 97, 105, 52, 75, 162, 17, 231, 128, 0, 1, 2, 3, 4, 5, 6],
                ),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<Uuid>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }

        /// Surfaces as the canonical string in JSON
        #[test]
        fn surfaces_as_the_canonical_string_in_json() {
            let e = "63ab6383-0ad4-559a-b16b-afcec9cc77e9"
                .parse::<Uuid>()
                .unwrap();
            assert_eq!(
                serde_json::to_string(&e).unwrap(),
                "\"63ab6383-0ad4-559a-b16b-afcec9cc77e9\""
            );
            let back: Uuid =
                serde_json::from_str("\"63ab6383-0ad4-559a-b16b-afcec9cc77e9\"").unwrap();
            assert_eq!(back, e);
        }
    }
}
