//! Time-based (version 1) UUID generation.

use std::str;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;

use crate::uuid::GREGORIAN_OFFSET_TICKS;
use crate::{KeyError, Uuid};

/// Rollback span (ten seconds, in 100-nanosecond ticks) within which the
/// generator keeps nudging its previous timestamp forward instead of
/// accepting a clock that moved backwards.
const ROLLBACK_ALLOWANCE_TICKS: u64 = 10_000 * 10_000;

/// Generates a version 1 (time-based) UUID.
///
/// This function employs a process-wide generator context and guarantees
/// that no two calls return bit-for-bit identical values, even for the same
/// clock reading. The node identifier is randomly generated at first use
/// with the multicast bit set, as RFC 4122 §4.5 requires for non-IEEE
/// addresses. On Unix, the context is reset when the process ID changes
/// (i.e., upon process forks) to prevent collisions across processes.
///
/// # Examples
///
/// ```rust
/// let uuid = bright_keys::uuid1();
/// assert_eq!(uuid.version(), Some(1));
/// ```
pub fn uuid1() -> Uuid {
    global::lock().get_mut().generate()
}

/// Generates a version 1 UUID with explicit node and/or clock-sequence
/// values.
///
/// The overrides apply to this call only; the process-wide context keeps its
/// own node and clock sequence for plain [`uuid1`] calls, while its
/// timestamp guard still advances so overridden and plain calls can never
/// collide.
///
/// # Examples
///
/// ```rust
/// use bright_keys::v1::NodeId;
///
/// let node: NodeId = "00:0c:29:4f:d4:30".parse()?;
/// let uuid = bright_keys::uuid1_with(Some(node), Some(0x1234));
/// assert_eq!(uuid.node_id()?, [0x00, 0x0c, 0x29, 0x4f, 0xd4, 0x30]);
/// # Ok::<(), bright_keys::KeyError>(())
/// ```
pub fn uuid1_with(node: Option<NodeId>, clock_seq: Option<u16>) -> Uuid {
    global::lock().get_mut().generate_with(node, clock_seq)
}

/// A 48-bit node identifier for time-based UUIDs.
///
/// The value is usually an IEEE 802 MAC address; systems without one use a
/// random surrogate with the multicast bit set so it can never collide with
/// a real card address.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId([u8; 6]);

impl NodeId {
    /// Returns the six big-endian bytes of the identifier.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Creates a node identifier from the low 48 bits of an integer.
    pub fn from_u48(value: u64) -> Result<Self, KeyError> {
        if value >= 1 << 48 {
            return Err(KeyError::failed_to_validate(value.to_string(), "NodeId"));
        }
        let bytes = value.to_be_bytes();
        let mut node = [0u8; 6];
        node.copy_from_slice(&bytes[2..]);
        Ok(Self(node))
    }

    /// Draws a random surrogate identifier with the multicast bit set.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 6];
        rng.fill_bytes(&mut bytes);
        bytes[0] |= 0x01;
        Self(bytes)
    }
}

impl From<[u8; 6]> for NodeId {
    fn from(src: [u8; 6]) -> Self {
        Self(src)
    }
}

impl From<NodeId> for [u8; 6] {
    fn from(src: NodeId) -> Self {
        src.0
    }
}

impl str::FromStr for NodeId {
    type Err = KeyError;

    /// Parses twelve hexadecimal digits, tolerating `:` and `-` separators
    /// between octets.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 6];
        let mut digits = src.chars().filter(|&c| c != ':' && c != '-');
        for e in bytes.iter_mut() {
            let hi = next_hex_digit(&mut digits, src)?;
            let lo = next_hex_digit(&mut digits, src)?;
            *e = (hi << 4) | lo;
        }
        if digits.next().is_some() {
            return Err(KeyError::failed_to_validate(src, "NodeId"));
        }
        Ok(Self(bytes))
    }
}

fn next_hex_digit(
    digits: &mut impl Iterator<Item = char>,
    src: &str,
) -> Result<u8, KeyError> {
    digits
        .next()
        .and_then(|c| c.to_digit(16))
        .map(|d| d as u8)
        .ok_or_else(|| KeyError::failed_to_validate(src, "NodeId"))
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{e:02x}")?;
        }
        Ok(())
    }
}

/// A version 1 generator context holding the monotonic timestamp guard, the
/// clock sequence, and the node identifier.
///
/// The context is the only mutable state behind v1 generation. Wrap it in a
/// mutex to share one monotonic scope across threads:
///
/// ```rust
/// use bright_keys::v1::V1Generator;
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
///
/// let g = sync::Arc::new(sync::Mutex::new(V1Generator::new(OsRng)));
/// thread::scope(|s| {
///     for _ in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{}", g.lock().unwrap().generate());
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct V1Generator<R> {
    ticks: u64,
    clock_seq: u16,
    node: NodeId,

    /// Random number generator used to seed the node and clock sequence.
    rng: R,
}

impl<R: RngCore> V1Generator<R> {
    /// Creates a generator context with a random node identifier (multicast
    /// bit set) and a random 14-bit clock sequence.
    pub fn new(rng: R) -> Self {
        Self::with_parts(rng, None, None)
    }

    /// Creates a generator context with explicit node and/or clock-sequence
    /// values; absent parts are drawn from the random number generator.
    pub fn with_parts(mut rng: R, node: Option<NodeId>, clock_seq: Option<u16>) -> Self {
        let node = node.unwrap_or_else(|| NodeId::random(&mut rng));
        let clock_seq = clock_seq.unwrap_or_else(|| rng.next_u32() as u16) & 0x3fff;
        Self {
            ticks: 0,
            clock_seq,
            node,
            rng,
        }
    }

    /// Generates a new version 1 UUID from the current system clock.
    pub fn generate(&mut self) -> Uuid {
        self.generate_core(current_ticks(), None, None)
    }

    /// Generates a new version 1 UUID from the current system clock with
    /// per-call node and/or clock-sequence overrides.
    pub fn generate_with(&mut self, node: Option<NodeId>, clock_seq: Option<u16>) -> Uuid {
        self.generate_core(current_ticks(), node, clock_seq)
    }

    /// Generates a new version 1 UUID from the Gregorian tick count passed.
    ///
    /// Calls at a non-advancing clock reuse the previous timestamp nudged
    /// forward by one tick, so consecutive calls never collide. A rollback
    /// beyond ten seconds is taken at face value instead, with the clock
    /// sequence incremented as RFC 4122 §4.1.5 prescribes.
    pub fn generate_core(
        &mut self,
        now_ticks: u64,
        node: Option<NodeId>,
        clock_seq: Option<u16>,
    ) -> Uuid {
        if now_ticks > self.ticks {
            self.ticks = now_ticks;
        } else if now_ticks + ROLLBACK_ALLOWANCE_TICKS >= self.ticks {
            // same instant or a small rollback
            self.ticks += 1;
        } else {
            self.ticks = now_ticks;
            self.clock_seq = (self.clock_seq + 1) & 0x3fff;
        }

        Uuid::from_fields_v1(
            self.ticks,
            clock_seq.map_or(self.clock_seq, |e| e & 0x3fff),
            node.unwrap_or(self.node).into(),
        )
    }
}

fn current_ticks() -> u64 {
    let unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("bright-keys: clock may have gone backwards");
    GREGORIAN_OFFSET_TICKS + unix.as_secs() * 10_000_000 + (unix.subsec_nanos() / 100) as u64
}

mod global {
    use std::sync;

    use rand::rngs::adapter::ReseedingRng;
    use rand::rngs::OsRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Core;

    use super::V1Generator;

    /// Returns the lock handle of the process-wide generator context,
    /// creating one if none exists.
    pub(super) fn lock() -> sync::MutexGuard<'static, GlobalGenInner> {
        static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
        G.get_or_init(Default::default)
            .lock()
            .expect("bright-keys: could not lock global v1 generator")
    }

    type GlobalRng = ReseedingRng<ChaCha12Core, OsRng>;

    /// A thin wrapper to reset the state when the process ID changes (i.e.,
    /// upon Unix forks).
    #[derive(Debug)]
    pub(super) struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: V1Generator<GlobalRng>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            let rng = ReseedingRng::new(ChaCha12Core::from_entropy(), 1024 * 64, OsRng);
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: V1Generator::new(rng),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner context, resetting it on
        /// Unix if the process ID has changed.
        pub(super) fn get_mut(&mut self) -> &mut V1Generator<GlobalRng> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{current_ticks, uuid1, uuid1_with, NodeId, V1Generator};
    use crate::Uuid;
    use rand::rngs::ThreadRng;

    fn thread_gen() -> V1Generator<ThreadRng> {
        V1Generator::new(rand::thread_rng())
    }

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-1[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        for _ in 0..10_000 {
            assert!(re.is_match(&uuid1().to_string()));
        }
    }

    /// Produces different values on back-to-back calls
    #[test]
    fn produces_different_values_on_back_to_back_calls() {
        use std::collections::HashSet;
        let samples: Vec<Uuid> = (0..100_000).map(|_| uuid1()).collect();
        for pair in samples.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        let s: HashSet<&Uuid> = samples.iter().collect();
        assert_eq!(s.len(), samples.len());
    }

    /// Shares one node and clock sequence across plain global calls
    #[test]
    fn shares_one_node_and_clock_sequence_across_plain_global_calls() {
        let a = uuid1();
        let b = uuid1();
        assert_eq!(a.node_id().unwrap(), b.node_id().unwrap());
        assert_eq!(a.fields().clock_sequence(), b.fields().clock_sequence());
        // random surrogate nodes always carry the multicast bit
        assert_eq!(a.node_id().unwrap()[0] & 0x01, 0x01);
    }

    /// Encodes an up-to-date timestamp
    #[test]
    fn encodes_an_up_to_date_timestamp() {
        for _ in 0..1_000 {
            let before = current_ticks();
            let ticks = uuid1().timestamp_ticks().unwrap();
            let after = current_ticks();
            // same-instant nudges may run slightly ahead of the clock
            assert!(ticks + 1_000 >= before);
            assert!(ticks <= after + 1_000_000);
        }
    }

    /// Applies per-call node and clock sequence overrides
    #[test]
    fn applies_per_call_node_and_clock_sequence_overrides() {
        let node = NodeId::from([0x00, 0x0c, 0x29, 0x4f, 0xd4, 0x30]);
        let e = uuid1_with(Some(node), Some(0x2345));
        assert_eq!(e.version(), Some(1));
        assert_eq!(e.node_id().unwrap(), [0x00, 0x0c, 0x29, 0x4f, 0xd4, 0x30]);
        assert_eq!(e.fields().clock_sequence(), 0x2345);

        // an override wider than 14 bits is masked to the field
        let f = uuid1_with(Some(node), Some(0xffff));
        assert_eq!(f.fields().clock_sequence(), 0x3fff);

        // the process-wide parts are untouched by the overrides
        let g = uuid1();
        assert_ne!(g.node_id().unwrap(), [0x00, 0x0c, 0x29, 0x4f, 0xd4, 0x30]);
    }

    /// Generates increasing timestamps even with a constant or regressing clock
    #[test]
    fn generates_increasing_timestamps_even_with_a_constant_or_regressing_clock() {
        let ts = 0x0123_4567_89ab_cdefu64 & ((1 << 60) - 1);
        let mut g = thread_gen();
        let mut prev = g.generate_core(ts, None, None);
        assert_eq!(prev.timestamp_ticks().unwrap(), ts);
        for i in 0..100_000u64 {
            let curr = g.generate_core(ts - i.min(4_000), None, None);
            assert!(prev.timestamp_ticks().unwrap() < curr.timestamp_ticks().unwrap());
            assert_ne!(prev, curr);
            prev = curr;
        }
    }

    /// Bumps the clock sequence when the clock rolls back a lot
    #[test]
    fn bumps_the_clock_sequence_when_the_clock_rolls_back_a_lot() {
        let ts = 0x0123_4567_89ab_cdefu64 & ((1 << 60) - 1);
        let mut g = thread_gen();
        let prev = g.generate_core(ts, None, None);
        let seq = prev.fields().clock_sequence();

        // a rollback within the allowance keeps nudging instead
        let curr = g.generate_core(ts - 100_000_000, None, None);
        assert_eq!(curr.fields().clock_sequence(), seq);
        assert!(curr.timestamp_ticks().unwrap() > ts);

        // beyond the allowance the new clock is accepted, sequence bumped
        let rolled = g.generate_core(ts - 200_000_000, None, None);
        assert_eq!(rolled.timestamp_ticks().unwrap(), ts - 200_000_000);
        assert_eq!(rolled.fields().clock_sequence(), (seq + 1) & 0x3fff);
    }

    /// Keeps explicit construction parts
    #[test]
    fn keeps_explicit_construction_parts() {
        let node = NodeId::from_u48(0x0004_2518_71fb).unwrap();
        let mut g = V1Generator::with_parts(rand::thread_rng(), Some(node), Some(0x0123));
        let e = g.generate();
        assert_eq!(e.node_id().unwrap(), [0x00, 0x04, 0x25, 0x18, 0x71, 0xfb]);
        assert_eq!(e.fields().clock_sequence(), 0x0123);
    }

    /// Parses and formats node identifiers
    #[test]
    fn parses_and_formats_node_identifiers() {
        let cases = [
            "000c294fd430",
            "00:0c:29:4f:d4:30",
            "00-0c-29-4f-d4-30",
            "00:0C:29:4F:D4:30",
        ];
        for src in cases {
            let node: NodeId = src.parse().unwrap();
            assert_eq!(node.to_string(), "00:0c:29:4f:d4:30");
        }

        for src in ["", "000c294fd4", "000c294fd43042", "000c294fd43g", "0:0c"] {
            assert!(src.parse::<NodeId>().is_err());
        }

        assert!(NodeId::from_u48(1 << 48).is_err());
        assert_eq!(
            NodeId::from_u48(0x000c_294f_d430).unwrap().to_string(),
            "00:0c:29:4f:d4:30"
        );
    }
}
