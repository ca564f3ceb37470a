// Idiomatic Rust CLI front end.
//
// Three subcommands mirror the three operations this crate exposes:
// `sig`, `delta`, and `patch`. Paths default to stdin/stdout when
// omitted so the tool composes in pipelines.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::engine::{self, DeltaConfig, SignatureConfig};
use crate::hash::HashAlgorithm;
use crate::matcher::MatcherConfig;

const DEFAULT_BLOCK_SIZE: u32 = 1024;

/// Rolling-hash delta encoder/decoder.
#[derive(Parser, Debug)]
#[command(
    name = "rollsync",
    version,
    about = "Rolling-hash delta encoder/decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate a signature of a base file.
    Sig(SigArgs),
    /// Compute a delta from a signature and a target file.
    Delta(DeltaArgs),
    /// Apply a delta to a base file to reconstruct the target.
    Patch(PatchArgs),
}

#[derive(Args, Debug)]
struct SigArgs {
    /// Base file to fingerprint.
    #[arg(long)]
    base: PathBuf,

    /// Signature output file (default: stdout).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Block size in bytes.
    #[arg(long = "block-size", default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: u32,

    /// Block hashing algorithm.
    #[arg(long, value_enum, default_value_t = HashAlgorithm::Polyroll)]
    algorithm: HashAlgorithm,
}

#[derive(Args, Debug)]
struct DeltaArgs {
    /// Signature file produced by `sig`.
    #[arg(long)]
    sig: PathBuf,

    /// Target file to reproduce.
    #[arg(long)]
    target: PathBuf,

    /// Delta output file (default: stdout).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log every match and operation at debug level.
    #[arg(long)]
    debug: bool,

    /// Re-verify every hash hit against a fresh hash of the same bytes.
    #[arg(long = "verify-matches")]
    verify_matches: bool,
}

#[derive(Args, Debug)]
struct PatchArgs {
    /// Base file the delta was computed against.
    #[arg(long)]
    base: PathBuf,

    /// Delta file produced by `delta`.
    #[arg(long)]
    delta: PathBuf,

    /// Reconstructed output file (default: stdout).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn output_writer(path: &Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

fn run_sig(args: SigArgs) -> Result<(), crate::error::DeltaError> {
    let base_size = std::fs::metadata(&args.base)?.len() as u32;
    let mut base = BufReader::new(File::open(&args.base)?);
    let mut out = output_writer(&args.out)?;

    let config = SignatureConfig {
        algorithm: args.algorithm,
        block_size: args.block_size,
        base_size,
    };
    engine::signature(&mut base, &mut out, &config)?;
    out.flush()?;
    Ok(())
}

fn run_delta(args: DeltaArgs) -> Result<(), crate::error::DeltaError> {
    let mut sig = BufReader::new(File::open(&args.sig)?);
    let mut target = BufReader::new(File::open(&args.target)?);
    let mut out = output_writer(&args.out)?;

    let config = DeltaConfig {
        debug: args.debug,
        matcher: MatcherConfig {
            verify_matches: args.verify_matches,
        },
    };
    engine::delta(&mut sig, &mut target, &mut out, &config)?;
    out.flush()?;
    Ok(())
}

fn run_patch(args: PatchArgs) -> Result<(), crate::error::DeltaError> {
    let base = BufReader::new(File::open(&args.base)?);
    let mut delta = BufReader::new(File::open(&args.delta)?);
    let mut out = output_writer(&args.out)?;

    engine::patch(base, &mut delta, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Parse arguments, install logging, and dispatch to a subcommand.
///
/// Errors are printed to stderr and cause a non-zero exit; nothing here
/// panics.
pub fn run() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let result = match cli.command {
        Cmd::Sig(args) => run_sig(args),
        Cmd::Delta(args) => run_delta(args),
        Cmd::Patch(args) => run_patch(args),
    };

    if let Err(err) = result {
        eprintln!("rollsync: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_sig_subcommand() {
        let cli = Cli::parse_from([
            "rollsync",
            "sig",
            "--base",
            "base.bin",
            "--block-size",
            "512",
            "--algorithm",
            "md5",
        ]);
        match cli.command {
            Cmd::Sig(args) => {
                assert_eq!(args.block_size, 512);
                assert_eq!(args.algorithm, HashAlgorithm::Md5);
            }
            _ => panic!("expected Sig subcommand"),
        }
    }

    #[test]
    fn cli_parses_delta_subcommand_with_debug() {
        let cli = Cli::parse_from([
            "rollsync", "delta", "--sig", "s.bin", "--target", "t.bin", "--debug",
        ]);
        match cli.command {
            Cmd::Delta(args) => assert!(args.debug),
            _ => panic!("expected Delta subcommand"),
        }
    }

    #[test]
    fn cli_parses_patch_subcommand() {
        let cli = Cli::parse_from([
            "rollsync", "patch", "--base", "b.bin", "--delta", "d.bin", "--out", "o.bin",
        ]);
        match cli.command {
            Cmd::Patch(args) => assert_eq!(args.out, Some(PathBuf::from("o.bin"))),
            _ => panic!("expected Patch subcommand"),
        }
    }
}
