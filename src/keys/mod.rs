//! On-disk RSA key formats.
//!
//! Three artifacts cover the interop surface of common SSH tooling:
//!
//! - the PKCS#1 private key, a DER integer sequence in PEM armor,
//! - the PKCS#1 public key, a two-integer DER sequence in PEM armor,
//! - the one-line SSH public key.
//!
//! Writers emit all three next to each other under one path prefix, the
//! way `ssh-keygen` leaves `key` and `key.pub` behind. Readers parse a
//! whole file into fresh values; key files are never updated in place.

pub mod der;
pub mod pem;
pub mod ssh;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::rsa::RsaFactors;

/// PEM label of the private key file.
pub const PRIVATE_LABEL: &str = "RSA PRIVATE KEY";

/// PEM label of the public key file.
pub const PUBLIC_LABEL: &str = "RSA PUBLIC KEY";

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// Write the private key to `prefix`, plus `<prefix>.pub.pem` and
/// `<prefix>.pub` carrying the public half.
pub fn write_key_files(prefix: &Path, factors: &RsaFactors, comment: &str) -> Result<()> {
    let private = pem::encode(PRIVATE_LABEL, &der::encode_private(factors)?);
    log::info!("writing {} - PKCS#1 private", prefix.display());
    fs::write(prefix, private)?;

    let public_pem_path = with_suffix(prefix, ".pub.pem");
    let public = pem::encode(PUBLIC_LABEL, &der::encode_public(&factors.n, &factors.e)?);
    log::info!("writing {} - PKCS#1 public", public_pem_path.display());
    fs::write(&public_pem_path, public)?;

    let ssh_path = with_suffix(prefix, ".pub");
    log::info!("writing {} - SSH public", ssh_path.display());
    fs::write(&ssh_path, ssh::encode(&factors.n, &factors.e, comment))?;

    Ok(())
}

/// Read `(n, e)` from a public key file, sniffing the format off the first
/// line: PEM armor or an `ssh-rsa` prefix.
pub fn read_public_key(path: &Path) -> Result<(BigUint, BigUint)> {
    let text = fs::read_to_string(path)?;
    let first = text.lines().next().unwrap_or("").trim();

    if first == format!("-----BEGIN {}-----", PUBLIC_LABEL) {
        log::info!("{}: PKCS#1 (RSA) PEM public key", path.display());
        der::decode_public(&pem::decode(PUBLIC_LABEL, &text)?)
    } else if first.starts_with(ssh::ALGORITHM) {
        log::info!("{}: SSH RSA public key", path.display());
        ssh::decode(first)
    } else {
        Err(Error::KeyFormat(format!(
            "unrecognized public key format in {}",
            path.display(),
        )))
    }
}

/// Read the full parameter bundle from a PKCS#1 private key PEM file.
pub fn read_private_key(path: &Path) -> Result<RsaFactors> {
    let text = fs::read_to_string(path)?;
    der::decode_private(&pem::decode(PRIVATE_LABEL, &text)?)
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::with_suffix;

    #[test]
    fn test_with_suffix_appends_to_the_full_name() {
        assert_eq!(
            with_suffix(Path::new("/tmp/my.keys/id"), ".pub.pem"),
            Path::new("/tmp/my.keys/id.pub.pem"),
        );
    }
}
