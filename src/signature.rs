// Signature encoder/decoder (§4.3, §6.1 of the design).
//
// Wire layout:
//   algo_code (u16 BE) | block_size (u32 BE) | base_size (u32 BE) | hash*
//
// The last block may cover fewer than `block_size` base bytes; its
// buffer is read short and the remainder stays zero-filled before
// hashing. That zero-padding convention is load-bearing: the matcher
// hashes full-width windows everywhere, so the tail block's hash must
// have been computed the same way.

use std::io::{Read, Write};

use log::{debug, info};

use crate::error::DeltaError;
use crate::hash::{BlockHasher, HashAlgorithm};

/// Inputs to signature generation.
#[derive(Debug, Clone)]
pub struct SignatureConfig {
    pub algorithm: HashAlgorithm,
    pub block_size: u32,
    pub base_size: u32,
}

impl SignatureConfig {
    fn validate(&self) -> Result<(), DeltaError> {
        if self.block_size == 0 {
            return Err(DeltaError::Config(
                "block_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A parsed signature: header plus the ordered block hash table.
#[derive(Debug, Clone)]
pub struct Signature {
    pub algorithm: HashAlgorithm,
    pub block_size: u32,
    pub base_size: u32,
    pub hashes: Vec<Vec<u8>>,
}

/// Stream `base` in fixed blocks, writing the signature to `out`.
pub fn encode_signature<R: Read, W: Write>(
    base: &mut R,
    out: &mut W,
    config: &SignatureConfig,
) -> Result<(), DeltaError> {
    config.validate()?;

    out.write_all(&config.algorithm.code().to_be_bytes())?;
    out.write_all(&config.block_size.to_be_bytes())?;
    out.write_all(&config.base_size.to_be_bytes())?;

    let mut hasher = BlockHasher::new(config.algorithm);
    let block_size = config.block_size as usize;
    let mut blocks_written = 0u32;

    loop {
        let mut buf = vec![0u8; block_size];
        let filled = fill_as_much_as_possible(base, &mut buf)?;
        if filled == 0 {
            break;
        }

        hasher.reset();
        let digest = hasher.hash(&buf);
        out.write_all(&digest)?;
        blocks_written += 1;

        if filled < block_size {
            // Short final block: zero padding already in place.
            break;
        }
    }

    info!(
        "signature: base_size={} block_size={} blocks={blocks_written}",
        config.base_size, config.block_size
    );
    Ok(())
}

/// Parse a signature header and hash table from `reader`.
pub fn decode_signature<R: Read>(reader: &mut R) -> Result<Signature, DeltaError> {
    let mut code_buf = [0u8; 2];
    reader.read_exact(&mut code_buf)?;
    let algorithm = HashAlgorithm::from_code(u16::from_be_bytes(code_buf))?;

    let mut block_size_buf = [0u8; 4];
    reader.read_exact(&mut block_size_buf)?;
    let block_size = u32::from_be_bytes(block_size_buf);

    let mut base_size_buf = [0u8; 4];
    reader.read_exact(&mut base_size_buf)?;
    let base_size = u32::from_be_bytes(base_size_buf);

    if block_size == 0 {
        return Err(DeltaError::Protocol(
            "signature block_size must be non-zero".to_string(),
        ));
    }

    let hash_size = algorithm.hash_size();
    let mut hashes = Vec::new();
    loop {
        let mut buf = vec![0u8; hash_size];
        let filled = fill_as_much_as_possible(reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        if filled != hash_size {
            return Err(DeltaError::Protocol(format!(
                "truncated hash blob: got {filled} of {hash_size} bytes"
            )));
        }
        hashes.push(buf);
    }

    debug!(
        "signature decoded: algo={algorithm} block_size={block_size} base_size={base_size} blocks={}",
        hashes.len()
    );

    Ok(Signature {
        algorithm,
        block_size,
        base_size,
        hashes,
    })
}

/// Read into `buf` until it is full or the source is exhausted, handling
/// readers that return fewer bytes than requested without being at EOF.
/// Returns the number of bytes actually filled in; any remainder of
/// `buf` stays at its initial (zero) value.
fn fill_as_much_as_possible<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, DeltaError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
