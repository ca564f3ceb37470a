// Patch applier (§4.6): interprets a delta stream against a forward-only
// base cursor and a streaming output sink.

use std::io::{Read, Write};

use log::info;

use crate::error::DeltaError;
use crate::seek::ForwardSeeker;

const OPCODE_WRITE: u16 = 0;
const OPCODE_READ: u16 = 1;

/// Apply `delta` to `base`, writing the reconstructed target to `out`.
///
/// End-of-stream on the outermost opcode read is the normal, successful
/// termination of the loop; any other place a record runs out of bytes
/// is a `ProtocolError`.
pub fn apply_patch<B: Read, D: Read, W: Write>(
    base: B,
    delta: &mut D,
    out: &mut W,
) -> Result<(), DeltaError> {
    let mut base = ForwardSeeker::new(base);
    let mut bytes_written = 0u64;
    let mut ops_applied = 0u64;

    loop {
        let mut opcode_buf = [0u8; 2];
        if !read_optional(delta, &mut opcode_buf)? {
            break;
        }
        let opcode = u16::from_be_bytes(opcode_buf);

        match opcode {
            OPCODE_WRITE => {
                bytes_written += apply_write(delta, out)?;
            }
            OPCODE_READ => {
                bytes_written += apply_read(&mut base, delta, out)?;
            }
            other => {
                return Err(DeltaError::Protocol(format!("unknown opcode {other}")));
            }
        }
        ops_applied += 1;
    }

    info!("patch: operations={ops_applied} bytes_written={bytes_written}");
    Ok(())
}

fn apply_write<D: Read, W: Write>(delta: &mut D, out: &mut W) -> Result<u64, DeltaError> {
    let mut len_buf = [0u8; 4];
    read_required(delta, &mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;

    let mut data = vec![0u8; len];
    read_required(delta, &mut data)?;

    out.write_all(&data)?;
    Ok(len as u64)
}

fn apply_read<B: Read, D: Read, W: Write>(
    base: &mut ForwardSeeker<B>,
    delta: &mut D,
    out: &mut W,
) -> Result<u64, DeltaError> {
    let mut from_buf = [0u8; 4];
    read_required(delta, &mut from_buf)?;
    let from = u32::from_be_bytes(from_buf);

    let mut to_buf = [0u8; 4];
    read_required(delta, &mut to_buf)?;
    let to = u32::from_be_bytes(to_buf);

    if to < from {
        return Err(DeltaError::Protocol(format!(
            "read range is inverted: from={from} to={to}"
        )));
    }

    base.seek_forward(u64::from(from))?;

    let mut buf = vec![0u8; (to - from) as usize];
    base.read_exact(&mut buf)?;

    out.write_all(&buf)?;
    Ok(buf.len() as u64)
}

/// Read exactly `buf.len()` bytes. A clean EOF before any byte is read
/// means the stream is over (returns `false`); any other short read is
/// a truncated record.
fn read_optional<D: Read>(delta: &mut D, buf: &mut [u8]) -> Result<bool, DeltaError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = delta.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(DeltaError::Protocol(
                "truncated opcode at end of delta stream".to_string(),
            ));
        }
        filled += n;
    }
    Ok(true)
}

/// Read exactly `buf.len()` bytes; any shortfall is a truncated record.
fn read_required<D: Read>(delta: &mut D, buf: &mut [u8]) -> Result<(), DeltaError> {
    match read_optional(delta, buf)? {
        true => Ok(()),
        false => Err(DeltaError::Protocol(
            "truncated record: expected more bytes".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::write_operations;
    use crate::matcher::Operation;
    use std::io::Cursor;

    fn delta_bytes(ops: &[Operation]) -> Vec<u8> {
        let mut out = Vec::new();
        write_operations(ops, &mut out).unwrap();
        out
    }

    #[test]
    fn empty_delta_produces_empty_output() {
        let mut out = Vec::new();
        apply_patch(Cursor::new(b"base".as_slice()), &mut Cursor::new(Vec::new()), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn write_and_read_ops_reconstruct_target() {
        let base = b"0123456789";
        let ops = vec![
            Operation::Write {
                data: b"PRE-".to_vec(),
            },
            Operation::Read { from: 2, to: 6 },
            Operation::Write {
                data: b"-MID-".to_vec(),
            },
            Operation::Read { from: 6, to: 10 },
        ];
        let delta = delta_bytes(&ops);

        let mut out = Vec::new();
        apply_patch(Cursor::new(base.as_slice()), &mut Cursor::new(delta), &mut out).unwrap();
        assert_eq!(out, b"PRE-2345-MID-6789");
    }

    #[test]
    fn unknown_opcode_is_protocol_error() {
        let mut delta = Vec::new();
        delta.extend_from_slice(&99u16.to_be_bytes());
        let mut out = Vec::new();
        let err = apply_patch(Cursor::new(b"".as_slice()), &mut Cursor::new(delta), &mut out)
            .unwrap_err();
        assert!(matches!(err, DeltaError::Protocol(_)));
    }

    #[test]
    fn truncated_record_is_protocol_error() {
        // Write opcode, but missing the length field.
        let mut delta = Vec::new();
        delta.extend_from_slice(&0u16.to_be_bytes());
        let mut out = Vec::new();
        let err = apply_patch(Cursor::new(b"".as_slice()), &mut Cursor::new(delta), &mut out)
            .unwrap_err();
        assert!(matches!(err, DeltaError::Protocol(_)));
    }

    #[test]
    fn sequential_reads_never_seek_backward() {
        // Reads are in non-decreasing `from` order, matching what the
        // matcher produces; the forward-only seeker must still work.
        let base = b"abcdefghij";
        let ops = vec![
            Operation::Read { from: 0, to: 3 },
            Operation::Read { from: 3, to: 7 },
            Operation::Read { from: 7, to: 10 },
        ];
        let delta = delta_bytes(&ops);
        let mut out = Vec::new();
        apply_patch(Cursor::new(base.as_slice()), &mut Cursor::new(delta), &mut out).unwrap();
        assert_eq!(out, base);
    }
}
