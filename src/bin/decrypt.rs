//! Decrypt a `joes-rsa` envelope (armored or raw, sniffed) with a PKCS#1
//! private key.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use joes_rsa::workflow::{self, DecryptConfig};
use joes_rsa::Result;

#[derive(Parser)]
#[command(
    name = "decrypt",
    version,
    about = "Decrypt a joes-rsa envelope with a PKCS#1 private key",
    after_help = "\
EXAMPLES:
    # Decrypt a file to stdout.
    decrypt -k test01 -i ciphertext

    # Decrypt to a file.
    decrypt -k test01 -i ciphertext -o plaintext"
)]
struct Args {
    /// PKCS#1 private key PEM file
    #[arg(short = 'k', long)]
    key: PathBuf,

    /// File to decrypt; stdin when absent
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Decrypted output file; stdout when absent
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Random seed for reproducible demos; not at all secure
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Narrate intermediate steps (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    let config = DecryptConfig {
        key: args.key.clone(),
        input: args.input.clone(),
        output: args.output.clone(),
        seed: args.seed,
    };

    workflow::decrypt(&config)?;
    log::info!("done");
    Ok(())
}

fn main() {
    let args = Args::parse();
    workflow::init_logging(args.verbose);

    if let Err(err) = run(&args) {
        eprintln!("ERROR: {}", err);
        process::exit(1);
    }
}
