/// Atomic reference-counted string type used for identifiers.
pub(crate) type ArcStr = std::sync::Arc<str>;

/// A 32-byte BLAKE3 hash used as a content fingerprint.
///
/// Transitive sets are fingerprinted over their flattened content, so two
/// sets built with a different nesting shape share the same `Hash32`. This
/// makes the fingerprint usable as a cache key by whatever consumes the set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash32([u8; 32]);

impl<T> From<T> for Hash32
where
    T: Into<[u8; 32]>,
{
    fn from(value: T) -> Self {
        Hash32(value.into())
    }
}

impl Hash32 {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut acc = String::with_capacity(64);

        for &byte in self.0.iter() {
            acc.push(HEX[(byte >> 4) as usize] as char);
            acc.push(HEX[(byte & 0xF) as usize] as char);
        }

        acc
    }
}

impl std::fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

/// Adapter feeding anything that implements [`std::hash::Hash`] into BLAKE3.
#[derive(Default)]
pub(crate) struct Blake3Hasher(blake3::Hasher);

impl From<Blake3Hasher> for Hash32 {
    fn from(value: Blake3Hasher) -> Self {
        let bytes: [u8; 32] = value.0.finalize().into();
        Hash32::from(bytes)
    }
}

impl std::hash::Hasher for Blake3Hasher {
    fn finish(&self) -> u64 {
        let mut output = [0u8; 8];
        self.0.finalize_xof().fill(&mut output);
        u64::from_le_bytes(output)
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{Hash, Hasher};

    use super::*;

    fn digest(value: impl Hash) -> Hash32 {
        let mut hasher = Blake3Hasher::default();
        value.hash(&mut hasher);
        hasher.into()
    }

    #[test]
    fn test_hex() {
        let hash = Hash32::from([0xab; 32]);
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn test_hasher_is_deterministic() {
        assert_eq!(digest(("a", 1u32)), digest(("a", 1u32)));
        assert_ne!(digest(("a", 1u32)), digest(("a", 2u32)));
    }

    #[test]
    fn test_hasher_finish_matches_digest_prefix() {
        let mut hasher = Blake3Hasher::default();
        "abc".hash(&mut hasher);
        let short = hasher.finish();
        let long: Hash32 = hasher.into();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&long.as_bytes()[..8]);
        assert_eq!(short, u64::from_le_bytes(prefix));
    }
}
