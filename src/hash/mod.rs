// Hash algorithms shared by the signature encoder, matcher, and delta
// decoder: a rolling polynomial hash plus two non-rolling reference
// hashers, unified behind one registration code and one dispatching
// wrapper.

pub mod fixed;
pub mod rolling;

use std::fmt;
use std::str::FromStr;

use crate::error::DeltaError;

/// Wire code for `polyroll`, stored big-endian at the head of a signature.
pub const CODE_POLYROLL: u16 = 0;
/// Wire code for `md5`.
pub const CODE_MD5: u16 = 1;
/// Wire code for `crc32`.
pub const CODE_CRC32: u16 = 2;

/// Selects which hash algorithm a signature/delta pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum HashAlgorithm {
    Polyroll,
    Md5,
    Crc32,
}

impl HashAlgorithm {
    /// 16-bit wire registration code (§3 of the design).
    pub fn code(self) -> u16 {
        match self {
            HashAlgorithm::Polyroll => CODE_POLYROLL,
            HashAlgorithm::Md5 => CODE_MD5,
            HashAlgorithm::Crc32 => CODE_CRC32,
        }
    }

    /// Resolve an algorithm from its wire code.
    pub fn from_code(code: u16) -> Result<Self, DeltaError> {
        match code {
            CODE_POLYROLL => Ok(HashAlgorithm::Polyroll),
            CODE_MD5 => Ok(HashAlgorithm::Md5),
            CODE_CRC32 => Ok(HashAlgorithm::Crc32),
            other => Err(DeltaError::Protocol(format!(
                "unknown hash algorithm code {other}"
            ))),
        }
    }

    /// Serialized width of one hash under this algorithm.
    pub fn hash_size(self) -> usize {
        match self {
            HashAlgorithm::Polyroll => rolling::HASH_SIZE,
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Crc32 => 4,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashAlgorithm::Polyroll => "polyroll",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Crc32 => "crc32",
        };
        f.write_str(name)
    }
}

impl FromStr for HashAlgorithm {
    type Err = DeltaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polyroll" => Ok(HashAlgorithm::Polyroll),
            "md5" => Ok(HashAlgorithm::Md5),
            "crc32" => Ok(HashAlgorithm::Crc32),
            other => Err(DeltaError::Config(format!("unknown hasher {other}"))),
        }
    }
}

/// Dispatches to one of the three hash implementations while presenting
/// a single capability set: hash, hash size, registration code, reset.
///
/// Rolling state (when `algo` is `Polyroll`) is owned here and reset
/// per matcher block, never shared across threads.
pub struct BlockHasher {
    algo: HashAlgorithm,
    poly: rolling::PolyrollHasher,
    md5: fixed::Md5Hasher,
    crc32: fixed::Crc32Hasher,
}

impl BlockHasher {
    pub fn new(algo: HashAlgorithm) -> Self {
        Self {
            algo,
            poly: rolling::PolyrollHasher::new(),
            md5: fixed::Md5Hasher,
            crc32: fixed::Crc32Hasher,
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algo
    }

    pub fn hash_size(&self) -> usize {
        self.algo.hash_size()
    }

    pub fn code(&self) -> u16 {
        self.algo.code()
    }

    /// Hash `data`. For `Polyroll` this advances rolling state (or starts
    /// fresh after a `reset`); for `Md5`/`Crc32` it always recomputes
    /// from scratch.
    pub fn hash(&mut self, data: &[u8]) -> Vec<u8> {
        match self.algo {
            HashAlgorithm::Polyroll => self.poly.hash(data).to_vec(),
            HashAlgorithm::Md5 => self.md5.hash(data),
            HashAlgorithm::Crc32 => self.crc32.hash(data),
        }
    }

    /// Discard rolling state so the next `hash` call starts a fresh
    /// window. No-op for the non-rolling hashers.
    pub fn reset(&mut self) {
        match self.algo {
            HashAlgorithm::Polyroll => self.poly.reset(),
            HashAlgorithm::Md5 => self.md5.reset(),
            HashAlgorithm::Crc32 => self.crc32.reset(),
        }
    }
}
