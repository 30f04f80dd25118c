//! ASN.1 DER bodies of the PKCS#1 key files.
//!
//! Both shapes are a `SEQUENCE` of `INTEGER`s, per [RFC 8017 Appendix A.1]:
//!
//! ```text
//! RSAPrivateKey ::= SEQUENCE {
//!     version, modulus, publicExponent, privateExponent,
//!     prime1, prime2, exponent1, exponent2, coefficient }
//!
//! RSAPublicKey ::= SEQUENCE { modulus, publicExponent }
//! ```
//!
//! The `der` crate carries the one real subtlety: an unsigned INTEGER whose
//! high bit is set gains a leading `0x00` on the wire so it cannot be read
//! as negative, and loses it again when parsed.
//!
//! [RFC 8017 Appendix A.1]: https://datatracker.ietf.org/doc/html/rfc8017#appendix-A.1

use der::asn1::UintRef;
use der::{Decode, Encode, Sequence};
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::rsa::RsaFactors;

#[derive(Clone, Debug, Sequence)]
struct PrivateKeyBody<'a> {
    version: u8,
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
    private_exponent: UintRef<'a>,
    prime1: UintRef<'a>,
    prime2: UintRef<'a>,
    exponent1: UintRef<'a>,
    exponent2: UintRef<'a>,
    coefficient: UintRef<'a>,
}

#[derive(Clone, Debug, Sequence)]
struct PublicKeyBody<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

fn der_error(err: der::Error) -> Error {
    Error::KeyFormat(format!("DER: {}", err))
}

fn uint(bytes: &[u8]) -> Result<UintRef<'_>> {
    UintRef::new(bytes).map_err(der_error)
}

fn to_biguint(field: UintRef<'_>) -> BigUint {
    BigUint::from_bytes_be(field.as_bytes())
}

/// DER-encode the full private parameter sequence.
pub fn encode_private(factors: &RsaFactors) -> Result<Vec<u8>> {
    let n = factors.n.to_bytes_be();
    let e = factors.e.to_bytes_be();
    let d = factors.d.to_bytes_be();
    let p = factors.p.to_bytes_be();
    let q = factors.q.to_bytes_be();
    let dp = factors.dp.to_bytes_be();
    let dq = factors.dq.to_bytes_be();
    let qinv = factors.qinv.to_bytes_be();

    let body = PrivateKeyBody {
        version: factors.version,
        modulus: uint(&n)?,
        public_exponent: uint(&e)?,
        private_exponent: uint(&d)?,
        prime1: uint(&p)?,
        prime2: uint(&q)?,
        exponent1: uint(&dp)?,
        exponent2: uint(&dq)?,
        coefficient: uint(&qinv)?,
    };

    body.to_der().map_err(der_error)
}

/// Parse a DER private key sequence back into the parameter bundle.
pub fn decode_private(bytes: &[u8]) -> Result<RsaFactors> {
    let body = PrivateKeyBody::from_der(bytes).map_err(der_error)?;

    Ok(RsaFactors::from_parts(
        body.version,
        to_biguint(body.modulus),
        to_biguint(body.public_exponent),
        to_biguint(body.private_exponent),
        to_biguint(body.prime1),
        to_biguint(body.prime2),
        to_biguint(body.exponent1),
        to_biguint(body.exponent2),
        to_biguint(body.coefficient),
    ))
}

/// DER-encode the `(n, e)` public sequence.
pub fn encode_public(n: &BigUint, e: &BigUint) -> Result<Vec<u8>> {
    let n = n.to_bytes_be();
    let e = e.to_bytes_be();

    let body = PublicKeyBody {
        modulus: uint(&n)?,
        public_exponent: uint(&e)?,
    };

    body.to_der().map_err(der_error)
}

/// Parse a DER public key sequence into `(n, e)`.
pub fn decode_public(bytes: &[u8]) -> Result<(BigUint, BigUint)> {
    let body = PublicKeyBody::from_der(bytes).map_err(der_error)?;

    Ok((to_biguint(body.modulus), to_biguint(body.public_exponent)))
}

#[cfg(test)]
mod test {
    use num_bigint::BigUint;

    use super::{decode_private, decode_public, encode_private, encode_public};
    use crate::error::Error;
    use crate::rand::RsaRng;
    use crate::rsa::RsaFactors;

    fn classic_factors() -> RsaFactors {
        RsaFactors::derive(
            &BigUint::from(61_usize),
            &BigUint::from(53_usize),
            &BigUint::from(17_usize),
            &mut RsaRng::from_seed(Some(1)),
        )
        .unwrap()
    }

    #[test]
    fn test_private_round_trip() {
        let factors = classic_factors();
        let der = encode_private(&factors).unwrap();

        assert_eq!(decode_private(&der).unwrap(), factors);
    }

    #[test]
    fn test_public_round_trip() {
        let factors = classic_factors();
        let der = encode_public(&factors.n, &factors.e).unwrap();

        assert_eq!(decode_public(&der).unwrap(), (factors.n, factors.e));
    }

    // The sign rule: 255 has its high bit set, so the INTEGER grows a
    // leading zero octet on the wire.
    #[test]
    fn test_high_bit_gains_sign_octet() {
        let der = encode_public(&BigUint::from(255_usize), &BigUint::from(3_usize)).unwrap();

        assert_eq!(der, [0x30, 0x07, 0x02, 0x02, 0x00, 0xff, 0x02, 0x01, 0x03]);
        assert_eq!(
            decode_public(&der).unwrap(),
            (BigUint::from(255_usize), BigUint::from(3_usize)),
        );
    }

    #[test]
    fn test_truncated_sequence_rejected() {
        let factors = classic_factors();
        let der = encode_private(&factors).unwrap();

        let result = decode_private(&der[..der.len() - 2]);
        assert!(matches!(result, Err(Error::KeyFormat(_))));
    }

    #[test]
    fn test_public_structure_rejected_as_private() {
        let factors = classic_factors();
        let der = encode_public(&factors.n, &factors.e).unwrap();

        assert!(matches!(decode_private(&der), Err(Error::KeyFormat(_))));
    }
}
