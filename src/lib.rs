//! Rollsync: rolling-hash delta encoding and patching in the rsync/zsync
//! family.
//!
//! The crate provides:
//! - A block-hash signature codec (`signature`)
//! - A left-to-right block matcher and operation planner (`matcher`)
//! - Delta computation and the delta wire codec (`delta`)
//! - A patch applier over a forward-only base cursor (`patch`, `seek`)
//! - Selectable block hashers: a rolling polynomial hash plus MD5 and
//!   CRC32 (`hash`)
//! - A small top-level API tying the above together (`engine`)
//! - File-oriented helpers (`io`, feature `file-io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use rollsync::engine::{self, DeltaConfig, SignatureConfig};
//! use rollsync::hash::HashAlgorithm;
//! use std::io::Cursor;
//!
//! let base = b"hello old world";
//! let target = b"hello new world";
//!
//! let mut sig = Vec::new();
//! engine::signature(
//!     &mut Cursor::new(base),
//!     &mut sig,
//!     &SignatureConfig { algorithm: HashAlgorithm::Polyroll, block_size: 4, base_size: base.len() as u32 },
//! ).unwrap();
//!
//! let mut delta = Vec::new();
//! engine::delta(&mut Cursor::new(sig), &mut Cursor::new(target), &mut delta, &DeltaConfig::default()).unwrap();
//!
//! let mut reconstructed = Vec::new();
//! engine::patch(Cursor::new(base), &mut Cursor::new(delta), &mut reconstructed).unwrap();
//! assert_eq!(reconstructed, target);
//! ```

pub mod delta;
pub mod engine;
pub mod error;
pub mod hash;
pub mod matcher;
pub mod patch;
pub mod seek;
pub mod signature;

#[cfg(feature = "file-io")]
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;
