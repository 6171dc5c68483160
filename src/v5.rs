//! Name-based (version 5, SHA-1) UUID generation.

use sha1::{Digest, Sha1};

use crate::Uuid;

/// Generates a version 5 UUID from the SHA-1 hash of a namespace UUID and a
/// name.
///
/// The 160-bit digest is truncated to 128 bits before the version and
/// variant bits are stamped. The output is deterministic: the same
/// (namespace, name) pair always yields the same UUID.
///
/// # Examples
///
/// ```rust
/// use bright_keys::{uuid5, Uuid};
///
/// let uuid = uuid5(&Uuid::NAMESPACE_DNS, "python.org");
/// assert_eq!(uuid.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
/// ```
pub fn uuid5(namespace: &Uuid, name: &str) -> Uuid {
    let mut hasher = Sha1::new();
    hasher.update(namespace.as_bytes());
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_stamped_bytes(bytes, 5)
}
