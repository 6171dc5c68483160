//! Name-based (version 3, MD5) UUID generation.

use md5::{Digest, Md5};

use crate::Uuid;

/// Generates a version 3 UUID from the MD5 hash of a namespace UUID and a
/// name.
///
/// The output is deterministic: the same (namespace, name) pair always
/// yields the same UUID.
///
/// # Examples
///
/// ```rust
/// use bright_keys::{uuid3, Uuid};
///
/// let uuid = uuid3(&Uuid::NAMESPACE_DNS, "python.org");
/// assert_eq!(uuid.to_string(), "6fa459ea-ee8a-3ca4-894e-db77e160355e");
/// ```
pub fn uuid3(namespace: &Uuid, name: &str) -> Uuid {
    let mut hasher = Md5::new();
    hasher.update(namespace.as_bytes());
    hasher.update(name.as_bytes());
    let digest: [u8; 16] = hasher.finalize().into();
    Uuid::from_stamped_bytes(digest, 3)
}

#[cfg(test)]
mod tests {
    use super::uuid3;
    use crate::{Uuid, Variant};

    /// Produces the well-known vector for the DNS namespace
    #[test]
    fn produces_the_well_known_vector_for_the_dns_namespace() {
        let e = uuid3(&Uuid::NAMESPACE_DNS, "python.org");
        assert_eq!(e.to_string(), "6fa459ea-ee8a-3ca4-894e-db77e160355e");
        assert_eq!(e.version(), Some(3));
        assert_eq!(e.variant(), Variant::Rfc4122);
    }

    /// Yields equal values for equal arguments
    #[test]
    fn yields_equal_values_for_equal_arguments() {
        let a = uuid3(&Uuid::NAMESPACE_URL, "https://www.brightnucleus.com");
        let b = uuid3(&Uuid::NAMESPACE_URL, "https://www.brightnucleus.com");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    /// Yields distinct values for distinct arguments
    #[test]
    fn yields_distinct_values_for_distinct_arguments() {
        let a = uuid3(&Uuid::NAMESPACE_URL, "https://www.brightnucleus.com");
        let b = uuid3(&Uuid::NAMESPACE_URL, "https://www.alainschlesser.com");
        let c = uuid3(&Uuid::NAMESPACE_DNS, "https://www.brightnucleus.com");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    /// Stamps version and variant bits on every output
    #[test]
    fn stamps_version_and_variant_bits_on_every_output() {
        for i in 0..1_000 {
            let e = uuid3(&Uuid::NAMESPACE_OID, &i.to_string());
            assert_eq!(e.version(), Some(3));
            assert_eq!(e.variant(), Variant::Rfc4122);
        }
    }
}
