//! Generate an RSA key pair in the same formats `ssh-keygen -m PEM` leaves
//! behind: a PKCS#1 private key, a PKCS#1 public key PEM and a one-line SSH
//! public key.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use joes_rsa::rsa::RetryPolicy;
use joes_rsa::workflow::{self, KeygenConfig};
use joes_rsa::{Error, Result};

#[derive(Parser)]
#[command(
    name = "keygen",
    version,
    about = "Generate an RSA key pair (PKCS#1 private/public PEM + SSH public)",
    after_help = "\
EXAMPLES:
    # Generate a 4096-bit modulus under mykeys, mykeys.pub.pem and mykeys.pub.
    keygen -o mykeys -v

    # Reproduce an ssh-keygen key from its primes and exponent.
    keygen -p 0xD6A4... 0xC59D... -e 0x10001 -o test1a

    # Deterministic demo run.
    keygen -n 1024 -s 1 -o demo"
)]
struct Args {
    /// Number of bits in the modulus: 1024, 2048 or 4096
    #[arg(short = 'n', long, default_value_t = 4096)]
    numbits: u64,

    /// Public encryption exponent; decimal, or hex with a 0x prefix
    #[arg(short = 'e', long = "encrypt-exponent", default_value = "65537")]
    encrypt_exponent: String,

    /// Use these two primes instead of generating them
    #[arg(short = 'p', long, num_args = 2, value_names = ["PRIME1", "PRIME2"])]
    primes: Option<Vec<String>>,

    /// Primality test algorithm id, 0 to 3
    #[arg(short = 'a', long, default_value_t = 0)]
    algorithm: i64,

    /// Miller-Rabin trials per candidate
    #[arg(short = 'm', long = "miller-rabin-accuracy", default_value_t = 256)]
    miller_rabin_accuracy: usize,

    /// Retry failed candidates with a fresh random draw instead of stepping by 2
    #[arg(short = 'r', long = "random-retries")]
    random_retries: bool,

    /// Random seed for reproducible demos; not at all secure
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Private key file name; also writes <OUT>.pub.pem and <OUT>.pub
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Narrate intermediate steps (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    // Every id binds the same Miller-Rabin tester; the switch is kept so
    // old demo scripts keep working.
    if !(0..=3).contains(&args.algorithm) {
        return Err(Error::Config(format!(
            "invalid algorithm id {}: expected 0 to 3",
            args.algorithm,
        )));
    }
    log::debug!("primality algorithm id: {}", args.algorithm);

    let primes = match &args.primes {
        Some(values) => Some((
            workflow::parse_bigint(&values[0])?,
            workflow::parse_bigint(&values[1])?,
        )),
        None => None,
    };

    let config = KeygenConfig {
        numbits: args.numbits,
        e: workflow::parse_bigint(&args.encrypt_exponent)?,
        primes,
        rounds: args.miller_rabin_accuracy,
        retry: if args.random_retries {
            RetryPolicy::Redraw
        } else {
            RetryPolicy::Step
        },
        seed: args.seed,
        out: args.out.clone(),
    };

    workflow::keygen(&config)?;
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
