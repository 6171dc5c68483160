//! Random (version 4) UUID generation.

use rand::RngCore;

use crate::Uuid;

/// Generates a version 4 (random) UUID.
///
/// # Examples
///
/// ```rust
/// let uuid = bright_keys::uuid4();
/// assert_eq!(uuid.version(), Some(4));
/// ```
pub fn uuid4() -> Uuid {
    let bytes: [u8; 16] = rand::random();
    Uuid::from_stamped_bytes(bytes, 4)
}

/// Generates a version 4 UUID from the random number generator passed.
pub fn uuid4_with<R: RngCore>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    Uuid::from_stamped_bytes(bytes, 4)
}
