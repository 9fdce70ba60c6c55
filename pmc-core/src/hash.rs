//! Deterministic FNV-1a hashing
//!
//! Distribution and matrix hashes must be reproducible from contents alone,
//! across instances and processes, so they use a fixed-basis FNV-1a hasher
//! instead of a randomly seeded one.

use core::hash::Hasher;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a hasher over the fed bytes
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a {
    state: u64,
}

impl Fnv1a {
    pub const fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    /// Hash a `(index, raw value bytes)` pair in one call
    pub fn hash_pair(index: usize, value_bytes: &[u8]) -> u64 {
        let mut hasher = Self::new();
        hasher.write(&(index as u64).to_le_bytes());
        hasher.write(value_bytes);
        hasher.finish()
    }
}

impl Default for Fnv1a {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1a {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        let hasher = Fnv1a::new();
        assert_eq!(hasher.finish(), FNV_OFFSET_BASIS);

        let mut hasher = Fnv1a::new();
        hasher.write(b"a");
        assert_eq!(hasher.finish(), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_pair_hash_is_deterministic() {
        let bytes = 0.5f64.to_le_bytes();
        assert_eq!(Fnv1a::hash_pair(4, &bytes), Fnv1a::hash_pair(4, &bytes));
        assert_ne!(Fnv1a::hash_pair(4, &bytes), Fnv1a::hash_pair(5, &bytes));
    }
}
