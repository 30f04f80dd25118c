//! Error kinds shared by every tool in the crate.
//!
//! Each kind aborts the workflow that raised it; nothing is retried. The
//! binaries report the message on a single stderr line and exit nonzero.

/// Possible toolkit errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Bad command-line or configuration input (unsupported modulus size,
    /// malformed integer argument, equal primes, ...).
    #[error("config error: {0}")]
    Config(String),

    /// A key file that does not parse: armor mismatch, DER structure
    /// mismatch, wrong SSH field count or algorithm tag.
    #[error("key format error: {0}")]
    KeyFormat(String),

    /// An encrypted payload with a bad magic, an unsupported version or a
    /// body that does not divide into whole ciphertext blocks.
    #[error("envelope error: {0}")]
    Envelope(String),

    /// Parameter derivation failure (`gcd(e, phi) != 1`, non-coprime primes).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Filesystem failure surfaced from the host.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
