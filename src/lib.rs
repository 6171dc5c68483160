//! Self-validating identifier value types built around RFC 4122 UUIDs
//!
//! ```rust
//! use bright_keys::{uuid1, uuid4, uuid5, Key, Uuid};
//!
//! let uuid = uuid4();
//! println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! let time_based = uuid1();
//! assert_eq!(time_based.version(), Some(1));
//!
//! let named = uuid5(&Uuid::NAMESPACE_DNS, "python.org");
//! assert_eq!(named.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
//!
//! assert!(Uuid::is_valid("886313e1-3b8a-5372-9b90-0c9aee199e5d"));
//! assert!(!Uuid::is_valid("not-a-uuid"));
//! ```
//!
//! See [RFC 4122](https://www.rfc-editor.org/rfc/rfc4122).
//!
//! # Field and bit layout
//!
//! Every [`Uuid`] is a 128-bit value laid out big-endian as follows:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           time_low                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           time_mid            |      time_hi_and_version      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |clk_seq_hi_res |  clk_seq_low  |             node              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         node (2-5)                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The four most significant bits of `time_hi_and_version` carry the version
//! number and the two most significant bits of `clk_seq_hi_res` carry the
//! variant (`10` for RFC 4122). The library generates four versions:
//!
//! - Version 1 ([`uuid1`]): 60-bit Gregorian timestamp in 100-nanosecond
//!   ticks, a 14-bit clock sequence, and a 48-bit node identifier.
//! - Version 3 ([`uuid3`]): MD5 hash of a namespace UUID and a name.
//! - Version 4 ([`uuid4`]): 122 bits of cryptographically strong randomness.
//! - Version 5 ([`uuid5`]): SHA-1 hash of a namespace UUID and a name.
//!
//! # Keys and interchange
//!
//! UUIDs and plain string keys share the [`Key`] trait, which splits
//! construction into a validating path for untrusted input and a trusted
//! path for values restored from storage. The [`envelope`] module reads and
//! writes the legacy serialized envelope format so identifiers persisted by
//! earlier systems keep working byte for byte:
//!
//! ```rust
//! use bright_keys::envelope;
//!
//! let uuid = bright_keys::uuid4();
//! let stored = envelope::encode(&uuid);
//! let restored = envelope::decode(&stored)?;
//! assert_eq!(restored.to_string(), uuid.to_string());
//! # Ok::<(), bright_keys::KeyError>(())
//! ```

mod error;
pub use error::KeyError;

mod fields;
pub use fields::Fields;

mod key;
pub use key::{GenericKey, Key};

mod uuid;
pub use uuid::{Uuid, Variant};

pub mod envelope;
#[doc(inline)]
pub use envelope::AnyKey;

pub mod v1;
#[doc(inline)]
pub use v1::{uuid1, uuid1_with};

mod v3;
pub use v3::uuid3;

mod v4;
pub use v4::{uuid4, uuid4_with};

mod v5;
pub use v5::uuid5;
