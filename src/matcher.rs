// Matcher and operation planner (§4.4 of the design).
//
// Scans the target left-to-right against the signature's block hash
// table. The anchor never moves backward, so this is a simplification of
// a full rsync-style search: a matched block forbids any later match
// from overlapping it, and an unmatched block is simply skipped rather
// than retried from a different anchor.

use log::{debug, warn};

use crate::error::DeltaError;
use crate::hash::{BlockHasher, HashAlgorithm};
use crate::signature::Signature;

/// One located block: `target[segment_begin..segment_end]` hashes equal
/// to signature block `block_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub block_index: usize,
    pub segment_begin: usize,
    pub segment_end: usize,
}

/// A single instruction in a delta's operation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Literal bytes to append to the output.
    Write { data: Vec<u8> },
    /// Inclusive-exclusive byte range of the base to copy.
    Read { from: u32, to: u32 },
}

/// Extra matcher behavior beyond the baseline algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatcherConfig {
    /// When set, a hash hit is only accepted once this re-hashes equal
    /// (effectively a second independent computation over the same
    /// bytes with a fresh hasher) — cheap insurance against accepting a
    /// hash collision silently. Off by default to match the baseline
    /// contract described by the design.
    pub verify_matches: bool,
}

/// Scan `target` against `signature`'s hash table, in base-block order.
pub fn find_matches(
    signature: &Signature,
    target: &[u8],
    config: MatcherConfig,
) -> Result<Vec<Match>, DeltaError> {
    let block_size = signature.block_size as usize;
    let mut matches = Vec::new();
    let mut anchor = 0usize;
    let mut hasher = BlockHasher::new(signature.algorithm);

    for (block_index, expected) in signature.hashes.iter().enumerate() {
        let begin = anchor;
        let mut window_begin = begin;
        let mut window_end = begin + block_size;

        hasher.reset();

        let mut found = None;
        while window_end <= target.len() {
            let window = &target[window_begin..window_end];
            let digest = hasher.hash(window);

            if &digest == expected && accept(signature.algorithm, window, expected, config) {
                found = Some((window_begin, window_end));
                break;
            }

            window_begin += 1;
            window_end += 1;
        }

        match found {
            Some((segment_begin, segment_end)) => {
                matches.push(Match {
                    block_index,
                    segment_begin,
                    segment_end,
                });
                anchor = segment_end;
            }
            None => {
                warn!("signature block {block_index} had no match in target");
            }
        }
    }

    debug!(
        "matcher: {} of {} blocks matched",
        matches.len(),
        signature.hashes.len()
    );
    Ok(matches)
}

fn accept(algo: HashAlgorithm, window: &[u8], expected: &[u8], config: MatcherConfig) -> bool {
    if !config.verify_matches {
        return true;
    }
    // Re-hash with a fresh hasher as a cheap collision check; this does
    // not catch every collision (the hash itself may still collide) but
    // catches the common case of a rolling-state bug producing a
    // spurious hit.
    let mut fresh = BlockHasher::new(algo);
    fresh.hash(window) == expected
}

/// Turn matches into an operation list (§4.4, "operation planning") and
/// fuse adjacent reads.
pub fn plan_operations(matches: &[Match], target: &[u8], block_size: u32, base_size: u32) -> Vec<Operation> {
    let mut ops = Vec::new();

    if matches.is_empty() {
        ops.push(Operation::Write {
            data: target.to_vec(),
        });
        return merge_consecutive_reads(ops);
    }

    if matches[0].segment_begin > 0 {
        ops.push(write_op(target, 0, matches[0].segment_begin));
    }

    for (i, m) in matches.iter().enumerate() {
        if i > 0 && m.segment_begin != matches[i - 1].segment_end {
            ops.push(write_op(target, matches[i - 1].segment_end, m.segment_begin));
        }

        let from = m.block_index as u32 * block_size;
        let to = ((m.block_index as u32 + 1) * block_size).min(base_size);
        ops.push(Operation::Read { from, to });
    }

    let last = matches.last().expect("checked non-empty above");
    if last.segment_end != target.len() {
        ops.push(write_op(target, last.segment_end, target.len()));
    }

    merge_consecutive_reads(ops)
}

fn write_op(target: &[u8], from: usize, to: usize) -> Operation {
    Operation::Write {
        data: target[from..to].to_vec(),
    }
}

/// Fuse adjacent `Read`s where `prev.to == next.from`. Idempotent: running
/// this twice yields the same list as running it once, since the result
/// never contains two adjacent fusable reads.
pub fn merge_consecutive_reads(ops: Vec<Operation>) -> Vec<Operation> {
    let mut merged: Vec<Operation> = Vec::with_capacity(ops.len());

    for op in ops {
        match op {
            Operation::Write { .. } => merged.push(op),
            Operation::Read { from, to } => {
                if let Some(Operation::Read { to: prev_to, .. }) = merged.last_mut() {
                    if *prev_to == from {
                        *prev_to = to;
                        continue;
                    }
                }
                merged.push(Operation::Read { from, to });
            }
        }
    }

    merged
}
