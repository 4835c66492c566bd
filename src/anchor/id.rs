//! Opaque anchor identity.

use std::fmt;

/// 16-byte identity assigned to an anchor by the AR session.
///
/// The value is copied across the session boundary; it never aliases a
/// native session object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AnchorId([u8; 16]);

impl AnchorId {
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Build an identity from a 128-bit value (big-endian byte order).
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub const fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl From<[u8; 16]> for AnchorId {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AnchorId {
    /// Hyphenated UUID form, e.g. `0011aabb-...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnchorId({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uuid_layout() {
        let id = AnchorId::from_u128(0x00112233_4455_6677_8899_aabbccddeeff);
        assert_eq!(id.to_string(), "00112233-4455-6677-8899-aabbccddeeff");
    }

    #[test]
    fn test_u128_roundtrip() {
        let id = AnchorId::from_u128(42);
        assert_eq!(id.to_u128(), 42);
        assert_eq!(id.as_bytes()[15], 42);
    }
}
