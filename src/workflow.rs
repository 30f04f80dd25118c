//! The three tool workflows: key generation, encryption, decryption.
//!
//! Each workflow owns an explicit configuration record listing only the
//! options it recognises, and orchestrates the prime generator, the
//! derivation routine, the key codecs and the envelope codec. The binaries
//! under `src/bin/` are thin argument-parsing shells around these.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use num_bigint::BigUint;
use num_traits::Num;

use crate::envelope;
use crate::error::{Error, Result};
use crate::keys;
use crate::rand::RsaRng;
use crate::rsa::{gen_prime, RetryPolicy, RsaFactors};

/// Everything `keygen` recognises.
#[derive(Clone, Debug)]
pub struct KeygenConfig {
    /// Modulus width; 1024, 2048 or 4096.
    pub numbits: u64,
    /// Public exponent hint; below 3 asks for a random coprime exponent.
    pub e: BigUint,
    /// User-supplied primes, e.g. to reproduce `ssh-keygen` output.
    pub primes: Option<(BigUint, BigUint)>,
    /// Miller-Rabin rounds per candidate.
    pub rounds: usize,
    /// What to do with candidates that fail the primality test.
    pub retry: RetryPolicy,
    /// Deterministic RNG seed for reproducible demos.
    pub seed: Option<u64>,
    /// Output prefix; `None` only derives and logs the parameters.
    pub out: Option<PathBuf>,
}

/// Everything `encrypt` recognises.
#[derive(Clone, Debug)]
pub struct EncryptConfig {
    /// Public key file, PEM or SSH format (sniffed).
    pub key: PathBuf,
    /// Input file; stdin when absent.
    pub input: Option<PathBuf>,
    /// Output file; stdout when absent.
    pub output: Option<PathBuf>,
    /// Emit the raw envelope instead of base64 armor.
    pub binary: bool,
    /// Accepted for demo-script symmetry with `keygen`.
    pub seed: Option<u64>,
}

/// Everything `decrypt` recognises.
#[derive(Clone, Debug)]
pub struct DecryptConfig {
    /// PKCS#1 private key PEM file.
    pub key: PathBuf,
    /// Input file; stdin when absent.
    pub input: Option<PathBuf>,
    /// Output file; stdout when absent.
    pub output: Option<PathBuf>,
    /// Accepted for demo-script symmetry with `keygen`.
    pub seed: Option<u64>,
}

/// Generate (or accept) two primes, derive the parameter bundle and write
/// the three key files under the output prefix.
pub fn keygen(config: &KeygenConfig) -> Result<RsaFactors> {
    if !matches!(config.numbits, 1024 | 2048 | 4096) {
        return Err(Error::Config(format!(
            "invalid numbits {}: expected 1024, 2048 or 4096",
            config.numbits,
        )));
    }

    let mut rng = RsaRng::from_seed(config.seed);

    let (prime1, prime2) = match &config.primes {
        Some((prime1, prime2)) => {
            if prime1 == prime2 {
                return Err(Error::Config("the two primes must be distinct".into()));
            }
            (prime1.clone(), prime2.clone())
        }
        None => {
            let nbits = config.numbits / 2;
            log::info!("generating two {}-bit primes", nbits);
            let prime1 = gen_prime(nbits, config.rounds, config.retry, &mut rng);
            let prime2 = loop {
                let candidate = gen_prime(nbits, config.rounds, config.retry, &mut rng);
                if candidate != prime1 {
                    break candidate;
                }
            };
            (prime1, prime2)
        }
    };

    let factors = RsaFactors::derive(&prime1, &prime2, &config.e, &mut rng)?;
    log_factors(&factors);

    if let Some(out) = &config.out {
        let comment = format!("{}@{}", whoami::username(), hostname());
        keys::write_key_files(out, &factors, &comment)?;
    }

    Ok(factors)
}

/// Encrypt a byte stream under a public key file into the framed envelope,
/// armored unless binary output is requested.
pub fn encrypt(config: &EncryptConfig) -> Result<()> {
    if config.seed.is_some() {
        log::debug!("seed accepted but unused: encryption consumes no randomness");
    }

    let (n, e) = keys::read_public_key(&config.key)?;
    log::debug!("modulus : 0x{:x}", n);
    log::debug!("pubexp  : 0x{:x}", e);

    let plaintext = read_input(config.input.as_deref())?;
    log::info!("read {} plaintext bytes", plaintext.len());

    let sealed = envelope::encrypt(&plaintext, &n, &e)?;

    if config.binary {
        write_output(config.output.as_deref(), &sealed)
    } else {
        let armored = keys::pem::encode(envelope::ARMOR_LABEL, &sealed);
        write_output(config.output.as_deref(), armored.as_bytes())
    }
}

/// Decrypt an envelope (armored or raw, sniffed) under a private key file.
pub fn decrypt(config: &DecryptConfig) -> Result<()> {
    if config.seed.is_some() {
        log::debug!("seed accepted but unused: decryption consumes no randomness");
    }

    let factors = keys::read_private_key(&config.key)?;
    let data = read_input(config.input.as_deref())?;

    let sealed = if data.starts_with(b"-----BEGIN ") {
        let text = std::str::from_utf8(&data)
            .map_err(|_| Error::KeyFormat("armored input is not valid UTF-8".into()))?;
        keys::pem::decode(envelope::ARMOR_LABEL, text)?
    } else {
        data
    };

    let plaintext = envelope::decrypt(&sealed, &factors.n, &factors.d)?;
    write_output(config.output.as_deref(), &plaintext)
}

/// Parse a decimal integer argument, or hexadecimal with a `0x` prefix.
pub fn parse_bigint(arg: &str) -> Result<BigUint> {
    let (digits, radix) = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(stripped) => (stripped, 16),
        None => (arg, 10),
    };

    BigUint::from_str_radix(digits, radix)
        .map_err(|_| Error::Config(format!("invalid integer argument {:?}", arg)))
}

/// Bind the log facade for a binary: warnings by default, `-v` for info,
/// `-vv` for debug.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn hostname() -> String {
    whoami::fallible::hostname().unwrap_or_else(|_| "localhost".into())
}

// The parameter table the original asn1parse-style dumps show, one row per
// SEQUENCE element plus the totient for studying.
fn log_factors(factors: &RsaFactors) {
    log::info!(
        "\nRSA Parameters\n\n   \
           1 SEQUENCE\n   \
           2 version         : {}\n   \
           3 modulus         : {} {:x}\n   \
           4 public_exponent : {} {:x}\n   \
           5 private_exponent: {} {:x}\n   \
           6 prime1          : {} {:x}\n   \
           7 prime2          : {} {:x}\n   \
           8 exponent1       : {} {:x}\n   \
           9 exponent2       : {} {:x}\n  \
          10 crt_coefficient : {} {:x}\n  \
          11 *totient        : {} {:x}",
        factors.version,
        factors.n.bits(),
        factors.n,
        factors.e.bits(),
        factors.e,
        factors.d.bits(),
        factors.d,
        factors.p.bits(),
        factors.p,
        factors.q.bits(),
        factors.q,
        factors.dp.bits(),
        factors.dp,
        factors.dq.bits(),
        factors.dq,
        factors.qinv.bits(),
        factors.qinv,
        factors.phi.bits(),
        factors.phi,
    );
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => Ok(fs::read(path)?),
        None => {
            log::info!("reading from stdin, ^D on a new line ends input");
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            log::info!("writing {} bytes to {}", data.len(), path.display());
            fs::write(path, data)?;
        }
        None => {
            io::stdout().write_all(data)?;
        }
    }

    Ok(())
}
