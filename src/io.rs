// File-level helpers for the three operations, wrapping the streaming
// core with buffered I/O and returning simple size/count statistics.
//
// No integrity hash of the reconstructed target is computed here: the
// patch applier's own protocol errors are the only failure signal this
// format defines.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::info;

use crate::engine::{self, DeltaConfig, SignatureConfig};
use crate::error::DeltaError;

const BUF_SIZE: usize = 64 * 1024;

/// Statistics returned by `signature_file`.
#[derive(Debug, Clone, Copy)]
pub struct SignatureStats {
    pub base_size: u64,
    pub signature_size: u64,
    pub blocks: u64,
}

/// Statistics returned by `delta_file`.
#[derive(Debug, Clone, Copy)]
pub struct DeltaStats {
    pub target_size: u64,
    pub delta_size: u64,
}

/// Statistics returned by `patch_file`.
#[derive(Debug, Clone, Copy)]
pub struct PatchStats {
    pub delta_size: u64,
    pub output_size: u64,
}

/// Generate a signature of `base_path`, writing it to `sig_path`.
pub fn signature_file(
    base_path: impl AsRef<Path>,
    sig_path: impl AsRef<Path>,
    config: &SignatureConfig,
) -> Result<SignatureStats, DeltaError> {
    let base_path = base_path.as_ref();
    let sig_path = sig_path.as_ref();

    let mut base = BufReader::with_capacity(BUF_SIZE, File::open(base_path)?);
    let mut out = BufWriter::with_capacity(BUF_SIZE, File::create(sig_path)?);

    engine::signature(&mut base, &mut out, config)?;
    std::io::Write::flush(&mut out)?;

    let stats = SignatureStats {
        base_size: config.base_size as u64,
        signature_size: sig_path.metadata()?.len(),
        blocks: u64::from(config.base_size).div_ceil(u64::from(config.block_size).max(1)),
    };
    info!(
        "signature_file: {} -> {} ({} bytes)",
        base_path.display(),
        sig_path.display(),
        stats.signature_size
    );
    Ok(stats)
}

/// Compute a delta from `sig_path` and `target_path`, writing it to
/// `delta_path`.
pub fn delta_file(
    sig_path: impl AsRef<Path>,
    target_path: impl AsRef<Path>,
    delta_path: impl AsRef<Path>,
    config: &DeltaConfig,
) -> Result<DeltaStats, DeltaError> {
    let sig_path = sig_path.as_ref();
    let target_path = target_path.as_ref();
    let delta_path = delta_path.as_ref();

    let mut sig = BufReader::with_capacity(BUF_SIZE, File::open(sig_path)?);
    let mut target = BufReader::with_capacity(BUF_SIZE, File::open(target_path)?);
    let mut out = BufWriter::with_capacity(BUF_SIZE, File::create(delta_path)?);

    engine::delta(&mut sig, &mut target, &mut out, config)?;
    std::io::Write::flush(&mut out)?;

    let stats = DeltaStats {
        target_size: target_path.metadata()?.len(),
        delta_size: delta_path.metadata()?.len(),
    };
    info!(
        "delta_file: {} + {} -> {} ({} bytes)",
        sig_path.display(),
        target_path.display(),
        delta_path.display(),
        stats.delta_size
    );
    Ok(stats)
}

/// Apply `delta_path` to `base_path`, writing the reconstructed target
/// to `out_path`.
pub fn patch_file(
    base_path: impl AsRef<Path>,
    delta_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
) -> Result<PatchStats, DeltaError> {
    let base_path = base_path.as_ref();
    let delta_path = delta_path.as_ref();
    let out_path = out_path.as_ref();

    let base = BufReader::with_capacity(BUF_SIZE, File::open(base_path)?);
    let mut delta = BufReader::with_capacity(BUF_SIZE, File::open(delta_path)?);
    let mut out = BufWriter::with_capacity(BUF_SIZE, File::create(out_path)?);

    engine::patch(base, &mut delta, &mut out)?;
    std::io::Write::flush(&mut out)?;

    let stats = PatchStats {
        delta_size: delta_path.metadata()?.len(),
        output_size: out_path.metadata()?.len(),
    };
    info!(
        "patch_file: {} + {} -> {} ({} bytes)",
        base_path.display(),
        delta_path.display(),
        out_path.display(),
        stats.output_size
    );
    Ok(stats)
}
