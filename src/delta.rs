// Delta wire encoding (§4.5) and the top-level `delta` operation that
// ties the signature, matcher, and wire codec together.

use std::io::{Read, Write};

use log::{debug, info};

use crate::error::DeltaError;
use crate::matcher::{self, MatcherConfig, Operation};
use crate::signature::{self, Signature};

const OPCODE_WRITE: u16 = 0;
const OPCODE_READ: u16 = 1;

/// Extra knobs for delta computation beyond the matcher baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaConfig {
    /// When set, every match and operation is logged at `debug` level,
    /// mirroring the original tool's dedicated trace flag.
    pub debug: bool,
    pub matcher: MatcherConfig,
}

/// Compute a delta from `sig_reader` (a signature stream) and
/// `target_reader` (the file to reproduce), writing the delta to `out`.
///
/// The target is read fully into memory: the matcher needs random
/// access within its scan window and only ever advances its anchor
/// forward, so there is nothing to gain from streaming it.
pub fn compute_delta<R1: Read, R2: Read, W: Write>(
    sig_reader: &mut R1,
    target_reader: &mut R2,
    out: &mut W,
    config: &DeltaConfig,
) -> Result<(), DeltaError> {
    let signature = signature::decode_signature(sig_reader)?;

    let mut target = Vec::new();
    target_reader.read_to_end(&mut target)?;

    let ops = plan(&signature, &target, config)?;
    write_operations(&ops, out)?;

    info!(
        "delta: target_size={} operations={}",
        target.len(),
        ops.len()
    );
    Ok(())
}

fn plan(signature: &Signature, target: &[u8], config: &DeltaConfig) -> Result<Vec<Operation>, DeltaError> {
    let matches = matcher::find_matches(signature, target, config.matcher)?;

    if config.debug {
        for m in &matches {
            debug!(
                "match\t{}:{}-{}",
                m.block_index, m.segment_begin, m.segment_end
            );
        }
    }

    let ops = matcher::plan_operations(&matches, target, signature.block_size, signature.base_size);

    if config.debug {
        for op in &ops {
            match op {
                Operation::Write { data } => debug!("op\twrite:len={}", data.len()),
                Operation::Read { from, to } => debug!("op\tread:{from}-{to}"),
            }
        }
    }

    Ok(ops)
}

/// Serialize an operation list (§4.5). No header, no terminator.
pub fn write_operations<W: Write>(ops: &[Operation], out: &mut W) -> Result<(), DeltaError> {
    for op in ops {
        match op {
            Operation::Write { data } => {
                out.write_all(&OPCODE_WRITE.to_be_bytes())?;
                out.write_all(&(data.len() as u32).to_be_bytes())?;
                out.write_all(data)?;
            }
            Operation::Read { from, to } => {
                out.write_all(&OPCODE_READ.to_be_bytes())?;
                out.write_all(&from.to_be_bytes())?;
                out.write_all(&to.to_be_bytes())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashAlgorithm;
    use crate::signature::{encode_signature, SignatureConfig};
    use std::io::Cursor;

    fn make_signature(base: &[u8], algo: HashAlgorithm, block_size: u32) -> Vec<u8> {
        let mut out = Vec::new();
        encode_signature(
            &mut Cursor::new(base),
            &mut out,
            &SignatureConfig {
                algorithm: algo,
                block_size,
                base_size: base.len() as u32,
            },
        )
        .unwrap();
        out
    }

    #[test]
    fn empty_base_and_target_yields_empty_delta() {
        let sig_bytes = make_signature(b"", HashAlgorithm::Polyroll, 4);
        let mut delta = Vec::new();
        compute_delta(
            &mut Cursor::new(sig_bytes),
            &mut Cursor::new(&b""[..]),
            &mut delta,
            &DeltaConfig::default(),
        )
        .unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn empty_base_full_target_is_single_write_record() {
        let sig_bytes = make_signature(b"", HashAlgorithm::Polyroll, 4);
        let target = b"aaaaaabbbbbbccccccddddddeeeeee";
        let mut delta = Vec::new();
        compute_delta(
            &mut Cursor::new(sig_bytes),
            &mut Cursor::new(target.as_slice()),
            &mut delta,
            &DeltaConfig::default(),
        )
        .unwrap();

        assert_eq!(&delta[0..2], &OPCODE_WRITE.to_be_bytes());
        assert_eq!(&delta[2..6], &(target.len() as u32).to_be_bytes());
        assert_eq!(&delta[6..], target);
    }

    #[test]
    fn unknown_opcode_on_decode_is_protocol_error() {
        // Sanity: opcode constants are distinct.
        assert_ne!(OPCODE_WRITE, OPCODE_READ);
    }
}
