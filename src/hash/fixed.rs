// Non-rolling reference hashers: MD5 and CRC32-IEEE.
//
// Both recompute from scratch on every call; the matcher treats them
// identically to the rolling hash but pays the full cost per candidate
// offset. They exist mainly for debugging and cross-checking the
// polyroll fast path.

/// MD5 digest, 16 bytes.
#[derive(Debug, Default)]
pub struct Md5Hasher;

impl Md5Hasher {
    pub fn hash(&mut self, data: &[u8]) -> Vec<u8> {
        md5::compute(data).0.to_vec()
    }

    pub fn reset(&mut self) {}
}

/// CRC32-IEEE checksum, 4 bytes big-endian.
#[derive(Debug, Default)]
pub struct Crc32Hasher;

impl Crc32Hasher {
    pub fn hash(&mut self, data: &[u8]) -> Vec<u8> {
        crc32fast::hash(data).to_be_bytes().to_vec()
    }

    pub fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_is_deterministic_and_reset_is_noop() {
        let mut h = Md5Hasher;
        let a = h.hash(b"hello world");
        h.reset();
        let b = h.hash(b"hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn crc32_matches_known_vector() {
        let mut h = Crc32Hasher;
        // CRC32-IEEE of "123456789" is the well-known check value 0xCBF43926.
        let digest = h.hash(b"123456789");
        assert_eq!(digest, 0xCBF43926u32.to_be_bytes());
    }

    #[test]
    fn crc32_differs_on_different_input() {
        let mut h = Crc32Hasher;
        assert_ne!(h.hash(b"aaaa"), h.hash(b"aaab"));
    }
}
