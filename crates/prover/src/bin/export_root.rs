//! Build the whitelist tree and export its root for deployment.
//!
//! Reads a JSON record feed, prints the root to pass to the whitelist
//! contract constructor and optionally writes the proof bundle.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use whitelist_prover::{
    init_tracing, load_records, verify_artifacts, LeafLayout, WhitelistArtifacts, WhitelistTree,
};

#[derive(Parser, Debug)]
#[command(name = "export-root", about = "Commit a whitelist feed and export its Merkle root")]
struct Args {
    /// JSON array of {"address", "count"} objects
    #[arg(long)]
    records: PathBuf,

    /// Leaf encoding the verifying contract rebuilds (abi | packed)
    #[arg(long, default_value_t = LeafLayout::Abi)]
    layout: LeafLayout,

    /// Write the root and per-record proofs to this file
    #[arg(long)]
    out: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(&args.records)?;
    let whitelist = WhitelistTree::build(records, args.layout)?;

    println!("Leaves: {}", whitelist.tree().len());
    println!("Depth:  {}", whitelist.tree().depth());
    println!("Layout: {}", whitelist.layout());
    println!("Root:   {}", whitelist.root());

    if let Some(out) = args.out {
        let artifacts = WhitelistArtifacts::from_tree(&whitelist)?;
        verify_artifacts(&artifacts)?;
        artifacts.save_to_file(&out)?;
        println!("Proofs saved to {:?}", out);
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing("info");

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("export-root failed: {e}");
            ExitCode::FAILURE
        }
    }
}
