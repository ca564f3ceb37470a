// Polynomial rolling hash over fixed-width windows.
//
// The hash treats a B-byte window as the coefficients of a degree-(B-1)
// polynomial evaluated at `BASE` modulo `MODULUS`:
//
//   H(d) = (d[0]*BASE^(B-1) + d[1]*BASE^(B-2) + ... + d[B-1]*BASE^0) mod MODULUS
//
// Advancing the window by one byte to the right is done without
// re-summing the whole buffer: the old leading term is "remembered" as a
// pre-modulo `bootstrap` value, multiplied by `BASE` to shift every
// remaining term up one power, and the new trailing term is added in.

use log::trace;

/// Base multiplier for the polynomial.
pub const BASE: i64 = 257;

/// Modulus. Kept well under 2^24 so that `value * BASE` and
/// `bootstrap * BASE` never approach i64 overflow.
pub const MODULUS: i64 = 15_485_863;

/// Width, in bytes, of a serialized polyroll hash.
pub const HASH_SIZE: usize = 4;

/// Euclidean remainder: always returns a value in `[0, m)`, even for
/// negative `n`. Rust's `%` is a truncating remainder and would otherwise
/// leak negative results for negative `n`.
#[inline]
pub fn modulo(n: i64, m: i64) -> i64 {
    ((n % m) + m) % m
}

/// Rolling polynomial hash over fixed-width windows.
///
/// A fresh instance must be used per scan; `memory` state is private to
/// one left-to-right sweep and is not meant to be shared across threads
/// or reused after the sweep ends.
#[derive(Debug, Default)]
pub struct PolyrollHasher {
    pos: Vec<i64>,
    bootstrap: i64,
    memory: bool,
}

impl PolyrollHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position factors `pos[B-1-k] = BASE^k mod MODULUS`, so `pos[0]` is
    /// the most significant weight. Computed once per block size and
    /// reused until `reset`.
    fn position_factors(block_size: usize) -> Vec<i64> {
        let mut pos = vec![0i64; block_size];
        let mut n = 1i64;
        for slot in pos.iter_mut() {
            *slot = n;
            n = (n * BASE) % MODULUS;
        }
        pos.reverse();
        pos
    }

    fn ensure_pos(&mut self, block_size: usize) {
        if self.pos.is_empty() {
            self.pos = Self::position_factors(block_size);
        }
    }

    /// Hash `data` from scratch, ignoring any rolling state.
    pub fn single_hash(data: &[u8]) -> [u8; HASH_SIZE] {
        let pos = Self::position_factors(data.len());
        let mut hash = 0i64;
        for (i, &byte) in data.iter().enumerate() {
            hash += i64::from(byte) * pos[i];
        }
        let hash = modulo(hash, MODULUS);
        serialize(hash)
    }

    /// Hash the next `data.len()`-wide window. The first call after
    /// construction or `reset` computes the sum from scratch; subsequent
    /// calls roll the previous window forward by one byte.
    ///
    /// All windows passed to one hasher instance between resets must be
    /// the same length.
    pub fn hash(&mut self, data: &[u8]) -> [u8; HASH_SIZE] {
        self.ensure_pos(data.len());

        let hash = if !self.memory {
            let mut hash = 0i64;
            let mut first = 0i64;
            for (i, &byte) in data.iter().enumerate() {
                let positioned = i64::from(byte) * self.pos[i];
                hash += positioned;
                if i == 0 {
                    first = positioned;
                }
            }
            self.bootstrap = hash - modulo(first, MODULUS);
            self.memory = true;
            modulo(hash, MODULUS)
        } else {
            let last_pos = *self.pos.last().expect("pos populated by ensure_pos");
            let next_value = i64::from(data[data.len() - 1]);
            let tail = next_value * last_pos;

            let raw = modulo(self.bootstrap * BASE, MODULUS) + tail;

            let first = i64::from(data[0]) * self.pos[0];
            self.bootstrap = raw - modulo(first, MODULUS);

            modulo(raw, MODULUS)
        };

        trace!("polyroll step: hash={hash}");
        serialize(hash)
    }

    /// Discard rolling state; position factors are kept. The next `hash`
    /// call will recompute its window from scratch.
    pub fn reset(&mut self) {
        self.memory = false;
    }
}

fn serialize(hash: i64) -> [u8; HASH_SIZE] {
    (hash as u32).to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulo_handles_negative_input() {
        assert_eq!(modulo(-3, 20), 17);
        assert_eq!(modulo(3, 20), 3);
        assert_eq!(modulo(-20, 20), 0);
        assert_eq!(modulo(0, 20), 0);
    }

    #[test]
    fn single_hash_matches_manual_sum() {
        let data = b"abcd";
        let h = PolyrollHasher::single_hash(data);
        // pos = [BASE^3, BASE^2, BASE^1, BASE^0] mod MODULUS
        let b3 = modulo(BASE * BASE * BASE, MODULUS);
        let b2 = modulo(BASE * BASE, MODULUS);
        let expected = modulo(
            i64::from(data[0]) * b3
                + i64::from(data[1]) * b2
                + i64::from(data[2]) * BASE
                + i64::from(data[3]),
            MODULUS,
        );
        assert_eq!(u32::from_be_bytes(h), expected as u32);
    }

    #[test]
    fn rolling_matches_single_shot() {
        let s = b"the quick brown fox jumps over the lazy dog";
        let block = 7usize;
        let mut roller = PolyrollHasher::new();
        for i in 0..=(s.len() - block) {
            let window = &s[i..i + block];
            let rolled = roller.hash(window);
            let single = PolyrollHasher::single_hash(window);
            assert_eq!(rolled, single, "mismatch at offset {i}");
        }
    }

    #[test]
    fn reset_restarts_from_scratch() {
        let mut roller = PolyrollHasher::new();
        let a = roller.hash(b"aaaa");
        roller.reset();
        let b = roller.hash(b"aaaa");
        assert_eq!(a, b);
    }

    #[test]
    fn single_byte_windows() {
        let s = b"xyz";
        let mut roller = PolyrollHasher::new();
        for i in 0..s.len() {
            let window = &s[i..i + 1];
            assert_eq!(roller.hash(window), PolyrollHasher::single_hash(window));
        }
    }

    #[test]
    fn differs_on_different_bytes() {
        let a = PolyrollHasher::single_hash(b"aaaa");
        let b = PolyrollHasher::single_hash(b"aaab");
        assert_ne!(a, b);
    }
}
