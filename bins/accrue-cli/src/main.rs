//! accrue-cli: off-ledger tooling for cumulative distributions.
//!
//! Builds Merkle commitments from entitlement lists, exports per-beneficiary
//! proofs and verifies claims against a published root.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use accrue_core::hashing::HashScheme;
use accrue_core::types::AccountId;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "accrue-cli")]
#[command(version, about = "Build and verify cumulative distribution commitments.")]
struct Cli {
    /// Hash scheme, e.g. "sha256" or "sha256/blake3" (overrides ACCRUE_HASH_SCHEME).
    #[arg(long, global = true)]
    scheme: Option<HashScheme>,

    /// Log level (overrides ACCRUE_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: "text" or "json" (overrides ACCRUE_LOG_FORMAT).
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a distribution and write its proof bundle.
    Build(BuildArgs),
    /// Print one beneficiary's claim from a bundle.
    Proof(ProofArgs),
    /// Verify a claim against a root.
    Verify(VerifyArgs),
    /// Show a leaf's encoded pre-image and digest.
    Leaf(LeafArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Entitlements file (.csv or .json).
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the proof bundle.
    #[arg(short, long, default_value = "bundle.json")]
    output: PathBuf,
}

#[derive(Args)]
struct ProofArgs {
    /// Proof bundle produced by `build`.
    #[arg(short, long)]
    bundle: PathBuf,

    /// Beneficiary account (hex).
    #[arg(short = 'a', long)]
    beneficiary: AccountId,
}

#[derive(Args)]
struct VerifyArgs {
    /// Take the claim and root from a bundle instead of the flags below.
    #[arg(short, long, conflicts_with_all = ["root", "amount", "proof"])]
    bundle: Option<PathBuf>,

    /// Beneficiary account (hex).
    #[arg(short = 'a', long)]
    beneficiary: AccountId,

    /// Published root (hex).
    #[arg(short, long, required_unless_present = "bundle")]
    root: Option<String>,

    /// Cumulative amount.
    #[arg(short = 'm', long, required_unless_present = "bundle")]
    amount: Option<u64>,

    /// Sibling digests, bottom-up (hex, comma separated).
    #[arg(short, long, value_delimiter = ',')]
    proof: Vec<String>,
}

#[derive(Args)]
struct LeafArgs {
    /// Beneficiary account (hex).
    #[arg(short = 'a', long)]
    beneficiary: AccountId,

    /// Cumulative amount.
    #[arg(short = 'm', long)]
    amount: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(scheme) = cli.scheme {
        config.scheme = scheme;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    init_logging(&config.log_level, &config.log_format);

    tracing::debug!(scheme = %config.scheme, "configuration loaded");

    match cli.command {
        Commands::Build(args) => run_build(&config, args),
        Commands::Proof(args) => run_proof(args),
        Commands::Verify(args) => run_verify(&config, args),
        Commands::Leaf(args) => run_leaf(&config, args),
    }
}

fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    // Logs go to stderr so stdout stays machine-readable.
    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn run_build(config: &Config, args: BuildArgs) -> Result<()> {
    let bundle = commands::build(config.scheme, &args.input, &args.output)?;
    println!("Root:        {}", bundle.root);
    println!("Scheme:      {}", bundle.scheme);
    println!("Claims:      {}", bundle.claims.len());
    println!("Total:       {}", bundle.total_entitled);
    println!("Bundle:      {}", args.output.display());
    Ok(())
}

fn run_proof(args: ProofArgs) -> Result<()> {
    let bundle = commands::load_bundle(&args.bundle)?;
    let claim = commands::find_claim(&bundle, &args.beneficiary)?;
    let json = serde_json::to_string_pretty(&claim).context("Failed to encode claim")?;
    println!("{json}");
    Ok(())
}

fn run_verify(config: &Config, args: VerifyArgs) -> Result<()> {
    let valid = match args.bundle {
        Some(path) => {
            let bundle = commands::load_bundle(&path)?;
            let claim = commands::find_claim(&bundle, &args.beneficiary)?;
            claim.verify(&bundle.scheme, &bundle.root)
        }
        None => {
            let root = args.root.context("--root is required without --bundle")?;
            let amount = args.amount.context("--amount is required without --bundle")?;
            commands::verify_hex(&config.scheme, &root, &args.beneficiary, amount, &args.proof)?
        }
    };

    if valid {
        println!("VALID");
        Ok(())
    } else {
        println!("INVALID");
        std::process::exit(1);
    }
}

fn run_leaf(config: &Config, args: LeafArgs) -> Result<()> {
    let report = commands::leaf_report(&config.scheme, &args.beneficiary, args.amount);
    println!("Pre-image:   {}", report.preimage);
    println!("Digest:      {}", report.digest);
    Ok(())
}
