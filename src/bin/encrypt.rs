//! Encrypt a file (or stdin) under an RSA public key into the framed
//! `joes-rsa` envelope, base64-armored unless binary output is requested.
//!
//! One would normally not RSA-encrypt bulk data; symmetric ciphers are far
//! faster. This tool does it anyway so every step stays visible.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use joes_rsa::workflow::{self, EncryptConfig};
use joes_rsa::Result;

#[derive(Parser)]
#[command(
    name = "encrypt",
    version,
    about = "RSA-encrypt a file under a public key (PEM or SSH format)",
    after_help = "\
EXAMPLES:
    # Encrypt a file, armored to stdout.
    encrypt -k test01.pub -i plaintext

    # Encrypt to a raw binary envelope.
    encrypt -k test01.pub -i plaintext -o ciphertext -b"
)]
struct Args {
    /// Public key file; SSH and PKCS#1 PEM formats are sniffed
    #[arg(short = 'k', long)]
    key: PathBuf,

    /// File to encrypt; stdin when absent
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Encrypted output file; stdout when absent
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write the raw envelope, skipping base64 armor
    #[arg(short = 'b', long)]
    binary: bool,

    /// Random seed for reproducible demos; not at all secure
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Narrate intermediate steps (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    let config = EncryptConfig {
        key: args.key.clone(),
        input: args.input.clone(),
        output: args.output.clone(),
        binary: args.binary,
        seed: args.seed,
    };

    workflow::encrypt(&config)?;
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
