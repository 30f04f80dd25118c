//! The one-line SSH public key format.
//!
//! `ssh-rsa <base64> <comment>`, where the base64 decodes to exactly three
//! length-prefixed fields (a 4-byte big-endian length, then that many
//! bytes): the literal algorithm name, the public exponent, and the modulus.
//! The modulus always carries one leading `0x00` byte so it can never be
//! read as a negative number, mirroring what `ssh-keygen` emits.

use byteorder::{BigEndian, ByteOrder};
use itertools::Itertools;
use num_bigint::BigUint;

use crate::error::{Error, Result};

/// Algorithm tag, both the line prefix and the first blob field.
pub const ALGORITHM: &str = "ssh-rsa";

fn push_field(blob: &mut Vec<u8>, data: &[u8]) {
    let mut length = [0_u8; 4];
    BigEndian::write_u32(&mut length, data.len() as u32);
    blob.extend_from_slice(&length);
    blob.extend_from_slice(data);
}

/// Render `(n, e)` as a single `ssh-rsa` line, newline-terminated.
#[must_use]
pub fn encode(n: &BigUint, e: &BigUint, comment: &str) -> String {
    let mut blob = Vec::new();
    push_field(&mut blob, ALGORITHM.as_bytes());
    push_field(&mut blob, &e.to_bytes_be());

    let mut modulus = vec![0_u8];
    modulus.extend_from_slice(&n.to_bytes_be());
    push_field(&mut blob, &modulus);

    format!("{} {} {}\n", ALGORITHM, base64::encode(&blob), comment)
}

/// Parse an `ssh-rsa` line back into `(n, e)`.
pub fn decode(line: &str) -> Result<(BigUint, BigUint)> {
    let mut words = line.split_whitespace();

    let algorithm = words
        .next()
        .ok_or_else(|| Error::KeyFormat("empty SSH public key line".into()))?;
    if algorithm != ALGORITHM {
        return Err(Error::KeyFormat(format!(
            "unsupported algorithm {:?}, expected {:?}",
            algorithm, ALGORITHM,
        )));
    }

    let body = words
        .next()
        .ok_or_else(|| Error::KeyFormat("SSH public key line has no key data".into()))?;
    let blob = base64::decode(body)
        .map_err(|err| Error::KeyFormat(format!("invalid base64 key data: {}", err)))?;

    let (algorithm_field, e_field, n_field) = split_fields(&blob)?
        .into_iter()
        .collect_tuple()
        .ok_or_else(|| Error::KeyFormat("expected exactly three key data fields".into()))?;

    if algorithm_field != ALGORITHM.as_bytes() {
        return Err(Error::KeyFormat(
            "key data does not start with the ssh-rsa tag".into(),
        ));
    }

    Ok((
        BigUint::from_bytes_be(&n_field),
        BigUint::from_bytes_be(&e_field),
    ))
}

// Split a blob into its length-prefixed fields.
fn split_fields(mut data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut fields = Vec::new();

    while !data.is_empty() {
        if data.len() < 4 {
            return Err(Error::KeyFormat("truncated field length prefix".into()));
        }
        let length = BigEndian::read_u32(&data[..4]) as usize;
        if data.len() < 4 + length {
            return Err(Error::KeyFormat(format!(
                "field length {} overruns the key data",
                length,
            )));
        }

        fields.push(data[4..4 + length].to_vec());
        data = &data[4 + length..];
    }

    Ok(fields)
}

#[cfg(test)]
mod test {
    use byteorder::{BigEndian, ByteOrder};
    use num_bigint::BigUint;

    use super::{decode, encode, ALGORITHM};
    use crate::error::Error;

    fn field(data: &[u8]) -> Vec<u8> {
        let mut out = vec![0_u8; 4];
        BigEndian::write_u32(&mut out[..4], data.len() as u32);
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_round_trip() {
        let n = BigUint::from(3233_usize);
        let e = BigUint::from(17_usize);
        let line = encode(&n, &e, "alice@example");

        assert!(line.starts_with("ssh-rsa "));
        assert!(line.ends_with(" alice@example\n"));
        assert_eq!(decode(&line).unwrap(), (n, e));
    }

    // The ssh-keygen layout: tag, e = 0x010001, then a 257-byte modulus
    // with its disambiguating zero byte.
    #[test]
    fn test_ssh_keygen_shaped_blob() {
        let modulus_payload = [0xa5_u8; 256];

        let mut modulus_field = vec![0_u8];
        modulus_field.extend_from_slice(&modulus_payload);

        let mut blob = field(ALGORITHM.as_bytes());
        blob.extend(field(&[0x01, 0x00, 0x01]));
        blob.extend(field(&modulus_field));
        let line = format!("ssh-rsa {} bob@host\n", base64::encode(&blob));

        let (n, e) = decode(&line).unwrap();
        assert_eq!(e, BigUint::from(65_537_usize));
        assert_eq!(n, BigUint::from_bytes_be(&modulus_payload));
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let line = encode(
            &BigUint::from(3233_usize),
            &BigUint::from(17_usize),
            "alice@example",
        )
        .replace("ssh-rsa ", "ssh-dss ");

        assert!(matches!(decode(&line), Err(Error::KeyFormat(_))));
    }

    #[test]
    fn test_wrong_field_count_rejected() {
        let mut blob = field(ALGORITHM.as_bytes());
        blob.extend(field(&[0x01, 0x00, 0x01]));
        let line = format!("ssh-rsa {} bob@host\n", base64::encode(&blob));

        assert!(matches!(decode(&line), Err(Error::KeyFormat(_))));
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let mut blob = field(ALGORITHM.as_bytes());
        blob.extend_from_slice(&[0, 0, 1, 0]); // promises 256 bytes, has none
        let line = format!("ssh-rsa {} bob@host\n", base64::encode(&blob));

        assert!(matches!(decode(&line), Err(Error::KeyFormat(_))));
    }

    #[test]
    fn test_missing_key_data_rejected() {
        assert!(matches!(decode("ssh-rsa\n"), Err(Error::KeyFormat(_))));
    }
}
