// Top-level API: ties the signature codec, matcher, and delta/patch wire
// formats into the three public operations — `signature`, `delta`, and
// `patch` — that make up this crate's surface.

use std::io::{Read, Write};

pub use crate::delta::DeltaConfig;
pub use crate::signature::SignatureConfig;

use crate::error::DeltaError;
use crate::{delta, patch, signature};

/// Derive a compact fingerprint of `base`, writing the wire signature to
/// `out`.
pub fn signature<R: Read, W: Write>(
    base: &mut R,
    out: &mut W,
    config: &SignatureConfig,
) -> Result<(), DeltaError> {
    signature::encode_signature(base, out, config)
}

/// Using `sig` plus `target`, emit a sequence of copy/literal
/// instructions to `out` that reproduce `target` given the base the
/// signature was taken from.
pub fn delta<R1: Read, R2: Read, W: Write>(
    sig: &mut R1,
    target: &mut R2,
    out: &mut W,
    config: &DeltaConfig,
) -> Result<(), DeltaError> {
    delta::compute_delta(sig, target, out, config)
}

/// Given `base` plus `delta`, reproduce the target to `out`.
pub fn patch<B: Read, D: Read, W: Write>(
    base: B,
    delta: &mut D,
    out: &mut W,
) -> Result<(), DeltaError> {
    patch::apply_patch(base, delta, out)
}
