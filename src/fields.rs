//! RFC 4122 field-level view of the 128-bit UUID value.

/// The named fields of a UUID as laid out in RFC 4122 §4.1.2.
///
/// The decomposition is purely structural: any 128-bit value can be taken
/// apart and reassembled without loss, regardless of its version or variant
/// bits. Integer values are computed from the big-endian byte layout, never
/// from host-native order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Fields {
    /// The low field of the timestamp (bits 0-31).
    pub time_low: u32,
    /// The middle field of the timestamp (bits 32-47).
    pub time_mid: u16,
    /// The high field of the timestamp multiplexed with the version number
    /// (bits 48-63).
    pub time_hi_and_version: u16,
    /// The high field of the clock sequence multiplexed with the variant
    /// (bits 64-71).
    pub clock_seq_hi_and_reserved: u8,
    /// The low field of the clock sequence (bits 72-79).
    pub clock_seq_low: u8,
    /// The spatially unique node identifier (bits 80-127); only the low 48
    /// bits are significant.
    pub node: u64,
}

impl Fields {
    /// Decomposes a big-endian 16-byte UUID layout into its named fields.
    pub const fn from_bytes(bytes: &[u8; 16]) -> Self {
        Self {
            time_low: (bytes[0] as u32) << 24
                | (bytes[1] as u32) << 16
                | (bytes[2] as u32) << 8
                | bytes[3] as u32,
            time_mid: (bytes[4] as u16) << 8 | bytes[5] as u16,
            time_hi_and_version: (bytes[6] as u16) << 8 | bytes[7] as u16,
            clock_seq_hi_and_reserved: bytes[8],
            clock_seq_low: bytes[9],
            node: (bytes[10] as u64) << 40
                | (bytes[11] as u64) << 32
                | (bytes[12] as u64) << 24
                | (bytes[13] as u64) << 16
                | (bytes[14] as u64) << 8
                | bytes[15] as u64,
        }
    }

    /// Reassembles the big-endian 16-byte UUID layout.
    ///
    /// The `node` value is truncated to its 48-bit range.
    pub const fn to_bytes(&self) -> [u8; 16] {
        [
            (self.time_low >> 24) as u8,
            (self.time_low >> 16) as u8,
            (self.time_low >> 8) as u8,
            self.time_low as u8,
            (self.time_mid >> 8) as u8,
            self.time_mid as u8,
            (self.time_hi_and_version >> 8) as u8,
            self.time_hi_and_version as u8,
            self.clock_seq_hi_and_reserved,
            self.clock_seq_low,
            (self.node >> 40) as u8,
            (self.node >> 32) as u8,
            (self.node >> 24) as u8,
            (self.node >> 16) as u8,
            (self.node >> 8) as u8,
            self.node as u8,
        ]
    }

    /// Returns the 60-bit timestamp reassembled from the three time fields,
    /// with the version bits stripped.
    ///
    /// The value counts 100-nanosecond intervals since 1582-10-15T00:00:00Z
    /// when the UUID is time-based; for other versions it is just the raw
    /// field content.
    pub const fn timestamp_ticks(&self) -> u64 {
        ((self.time_hi_and_version & 0x0fff) as u64) << 48
            | (self.time_mid as u64) << 32
            | self.time_low as u64
    }

    /// Returns the 14-bit clock sequence with the variant bits stripped.
    pub const fn clock_sequence(&self) -> u16 {
        ((self.clock_seq_hi_and_reserved & 0x3f) as u16) << 8 | self.clock_seq_low as u16
    }
}

#[cfg(test)]
mod tests {
    use super::Fields;

    /// The RFC 4122 appendix example decomposed field by field.
    const RFC_EXAMPLE: [u8; 16] = [
        0xf8, 0x1d, 0x4f, 0xae, 0x7d, 0xec, 0x11, 0xd0, 0xa7, 0x65, 0x00, 0xa0, 0xc9, 0x1e, 0x6b,
        0xf6,
    ];

    /// Decomposes the RFC example correctly
    #[test]
    fn decomposes_the_rfc_example_correctly() {
        let fields = Fields::from_bytes(&RFC_EXAMPLE);
        assert_eq!(fields.time_low, 0xf81d_4fae);
        assert_eq!(fields.time_mid, 0x7dec);
        assert_eq!(fields.time_hi_and_version, 0x11d0);
        assert_eq!(fields.clock_seq_hi_and_reserved, 0xa7);
        assert_eq!(fields.clock_seq_low, 0x65);
        assert_eq!(fields.node, 0x00a0_c91e_6bf6);
    }

    /// Strips version and variant bits from the derived projections
    #[test]
    fn strips_version_and_variant_bits_from_the_derived_projections() {
        let fields = Fields::from_bytes(&RFC_EXAMPLE);
        assert_eq!(fields.timestamp_ticks(), 0x1d0_7dec_f81d_4fae);
        assert_eq!(fields.clock_sequence(), 0x2765);
    }

    /// Reassembles every bit pattern it decomposed
    #[test]
    fn reassembles_every_bit_pattern_it_decomposed() {
        let cases: [[u8; 16]; 4] = [
            [0x00; 16],
            [0xff; 16],
            RFC_EXAMPLE,
            [
                0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76,
                0x54, 0x32, 0x10,
            ],
        ];
        for bytes in cases {
            assert_eq!(Fields::from_bytes(&bytes).to_bytes(), bytes);
        }
    }

    /// Truncates an oversized node value to 48 bits
    #[test]
    fn truncates_an_oversized_node_value_to_48_bits() {
        let fields = Fields {
            node: u64::MAX,
            ..Default::default()
        };
        let bytes = fields.to_bytes();
        assert_eq!(&bytes[10..], &[0xff; 6]);
        assert_eq!(Fields::from_bytes(&bytes).node, (1 << 48) - 1);
    }
}
