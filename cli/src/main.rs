//! Cap Oracle CLI - differential-testing harness entry point
//!
//! Runs the constant-product cap oracle on a single test vector and prints
//! the result in the fixed wire encoding, so an external harness can diff it
//! byte-for-byte against the on-chain implementation. Also ships the
//! powers-of-a-fraction reference primitive and a simulation trace decoder.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;
use num_bigint::{BigInt, BigUint};
use num_traits::{Pow, Zero};

use cap_model::decimal::{from_biguint, from_scaled_1e18, trunc};
use cap_model::{cap_reserves, ConstantProduct, Dec, Precision, RateBounds, Reserves};

mod encode;
mod trace;

#[derive(Parser)]
#[command(name = "cap-oracle")]
#[command(about = "Constant-product cap oracle for differential testing", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose output (debug-level capping diagnostics)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bounded reserve update on one test vector
    CapReserves {
        /// Candidate reserve 0
        #[arg(long, alias = "r0")]
        reserve0: BigUint,

        /// Candidate reserve 1
        #[arg(long, alias = "r1")]
        reserve1: BigUint,

        /// Last accepted reserve 0
        #[arg(long, alias = "l0")]
        last_reserve0: BigUint,

        /// Last accepted reserve 1
        #[arg(long, alias = "l1")]
        last_reserve1: BigUint,

        /// Step count since the last accepted state (clamped to 14000)
        #[arg(long, alias = "c")]
        cap_exponent: u32,

        /// Max fractional LP-supply increase per step, 1e18-scaled
        #[arg(long, alias = "mi")]
        max_lp_increase: u128,

        /// Max fractional LP-supply decrease per step, 1e18-scaled
        #[arg(long, alias = "md")]
        max_lp_decrease: u128,

        /// Max fractional rate increase per step in direction 0->1, 1e18-scaled
        #[arg(long, alias = "mr01")]
        max_ratio_change_01: u128,

        /// Max fractional rate increase per step in direction 1->0, 1e18-scaled
        #[arg(long, alias = "mr10")]
        max_ratio_change_10: u128,
    },

    /// Powers-of-a-fraction reference: (n/d)^e * 2^128, int256-encoded
    Powu {
        /// Numerator
        #[arg(short, long)]
        numerator: BigUint,

        /// Denominator (non-zero)
        #[arg(short, long)]
        denominator: BigUint,

        /// Exponent (negative inverts the fraction)
        #[arg(short, long)]
        exponent: i32,
    },

    /// Decode an ABI-encoded simulation trace and export it as CSV
    DecodeTrace {
        /// Hex trace blob, 0x-prefixed
        #[arg(short, long)]
        data: String,

        /// Output file stem; the file is written as <out-dir>/<name>.csv
        #[arg(short, long)]
        name: String,

        /// Output directory
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::CapReserves {
            reserve0,
            reserve1,
            last_reserve0,
            last_reserve1,
            cap_exponent,
            max_lp_increase,
            max_lp_decrease,
            max_ratio_change_01,
            max_ratio_change_10,
        } => run_cap_reserves(
            [last_reserve0, last_reserve1],
            [reserve0, reserve1],
            cap_exponent,
            max_lp_increase,
            max_lp_decrease,
            max_ratio_change_01,
            max_ratio_change_10,
            cli.verbose,
        ),
        Commands::Powu {
            numerator,
            denominator,
            exponent,
        } => run_powu(numerator, denominator, exponent),
        Commands::DecodeTrace { data, name, out_dir } => run_decode_trace(&data, &name, &out_dir),
    }
}

fn to_reserves(pair: [BigUint; 2]) -> Reserves {
    [from_biguint(&pair[0]), from_biguint(&pair[1])]
}

#[allow(clippy::too_many_arguments)]
fn run_cap_reserves(
    last: [BigUint; 2],
    candidate: [BigUint; 2],
    cap_exponent: u32,
    max_lp_increase: u128,
    max_lp_decrease: u128,
    max_ratio_change_01: u128,
    max_ratio_change_10: u128,
    verbose: bool,
) -> Result<()> {
    let cp = ConstantProduct::new(Precision::default());
    let bounds: RateBounds = [
        [Dec::zero(), from_scaled_1e18(max_ratio_change_01)],
        [from_scaled_1e18(max_ratio_change_10), Dec::zero()],
    ];

    let capped = cap_reserves(
        &cp,
        &to_reserves(last),
        &to_reserves(candidate),
        cap_exponent,
        &from_scaled_1e18(max_lp_increase),
        &from_scaled_1e18(max_lp_decrease),
        &bounds,
        verbose,
    )
    .context("capping failed on invalid inputs")?;

    let reserve0 = trunc(&capped[0])
        .to_biguint()
        .context("capped reserve 0 is negative")?;
    let reserve1 = trunc(&capped[1])
        .to_biguint()
        .context("capped reserve 1 is negative")?;

    println!("{}", encode::encode_uint256_pair(&reserve0, &reserve1)?);
    Ok(())
}

fn run_powu(numerator: BigUint, denominator: BigUint, exponent: i32) -> Result<()> {
    if denominator.is_zero() {
        bail!("denominator must be non-zero");
    }
    if numerator.is_zero() && exponent < 0 {
        bail!("zero numerator cannot be raised to a negative exponent");
    }
    let fraction = Dec::new(BigInt::from(numerator), BigInt::from(denominator));
    let scaled = fraction.pow(exponent) * Dec::from_integer(BigInt::from(1u8) << 128);
    println!("{}", encode::encode_int256(&trunc(&scaled))?);
    Ok(())
}

fn run_decode_trace(data: &str, name: &str, out_dir: &std::path::Path) -> Result<()> {
    let rows = trace::decode_trace(data)?;
    let path = trace::export_csv(&rows, out_dir, name)?;
    println!(
        "{} {} rows -> {}",
        "Done".bright_green().bold(),
        rows.len(),
        path.display()
    );
    Ok(())
}
