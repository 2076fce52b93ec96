//! Standalone check of one membership claim against a root.
//!
//! Prints `true` or `false`. Exits 2 when the input itself is malformed, so
//! scripts can tell "not whitelisted" apart from a broken call.

use std::process::ExitCode;

use clap::Parser;
use whitelist_prover::{claim_exit_code, init_tracing, verify_claim, Claim, LeafLayout};

#[derive(Parser, Debug)]
#[command(name = "check-proof", about = "Verify a whitelist claim against a Merkle root")]
struct Args {
    /// 0x-prefixed 32-byte root
    #[arg(long)]
    root: String,

    /// Claimed 20-byte address
    #[arg(long)]
    address: String,

    /// Claimed allowance count
    #[arg(long, allow_negative_numbers = true)]
    count: i128,

    /// Comma-separated sibling digests, leaf to root
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    proof: Vec<String>,

    #[arg(long, default_value_t = LeafLayout::Abi)]
    layout: LeafLayout,
}

fn main() -> ExitCode {
    init_tracing("warn");
    let args = Args::parse();

    let claim = Claim {
        address: &args.address,
        count: args.count,
        proof: &args.proof,
    };

    let result = verify_claim(&args.root, &claim, args.layout);
    match &result {
        Ok(ok) => println!("{ok}"),
        Err(e) => eprintln!("check-proof: {e}"),
    }
    ExitCode::from(claim_exit_code(&result))
}
