//! [RSA](https://en.wikipedia.org/wiki/RSA_(cryptosystem)) key material built
//! from first principles.
//!
//! The construction is the classic two-prime recipe: generate `p` and `q`,
//! multiply them into the modulus, derive the private exponent from the
//! totient with the extended Euclidean algorithm, and keep the CRT helper
//! values real key files carry alongside.

pub mod primes;
pub mod util;

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use once_cell::sync::Lazy;
use rand::Rng;

use crate::error::{Error, Result};
use util::inv_mod;

pub use primes::{gen_prime, is_prime, RetryPolicy};

/// The default public exponent (the Fermat prime F4, as used by `ssh-keygen`).
pub static E: Lazy<BigUint> = Lazy::new(|| BigUint::from(65_537_usize));

/// The full bundle of RSA parameters, as laid out in a PKCS#1 private key.
///
/// All fields are computed on construction and never mutated.
///
/// ```
/// use joes_rsa::rand::RsaRng;
/// use joes_rsa::rsa::RsaFactors;
/// use num_bigint::BigUint;
///
/// let factors = RsaFactors::derive(
///     &BigUint::from(61_usize),
///     &BigUint::from(53_usize),
///     &BigUint::from(17_usize),
///     &mut RsaRng::from_seed(Some(1)),
/// )
/// .unwrap();
///
/// assert_eq!(factors.n, BigUint::from(3233_usize));
/// assert_eq!(factors.d, BigUint::from(2753_usize));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaFactors {
    /// PKCS#1 version tag; `0` means two-prime RSA.
    pub version: u8,
    /// The larger prime.
    pub p: BigUint,
    /// The smaller prime.
    pub q: BigUint,
    /// Modulus `p * q`.
    pub n: BigUint,
    /// Euler totient `(p - 1) * (q - 1)`.
    pub phi: BigUint,
    /// Public exponent.
    pub e: BigUint,
    /// Private exponent, the inverse of `e` modulo the totient.
    pub d: BigUint,
    /// CRT exponent `d mod (p - 1)`.
    pub dp: BigUint,
    /// CRT exponent `d mod (q - 1)`.
    pub dq: BigUint,
    /// CRT coefficient, the inverse of `q` modulo `p`.
    pub qinv: BigUint,
}

impl RsaFactors {
    /// Derive the parameter bundle from two primes and a public exponent.
    ///
    /// The primes are reordered so `p >= q`. An `e_hint` below 3 asks for a
    /// random exponent coprime with the totient; any larger hint is used
    /// as-is and must itself be coprime with the totient.
    pub fn derive<R: Rng + ?Sized>(
        prime1: &BigUint,
        prime2: &BigUint,
        e_hint: &BigUint,
        rng: &mut R,
    ) -> Result<RsaFactors> {
        let one = BigUint::one();
        let three = BigUint::from(3_usize);

        let p = prime1.max(prime2).clone();
        let q = prime1.min(prime2).clone();

        if !p.gcd(&q).is_one() {
            return Err(Error::Crypto("the chosen primes are not coprime".into()));
        }

        let n = &p * &q;
        let phi = (&p - &one) * (&q - &one);

        let e = if *e_hint < three {
            if phi <= three {
                return Err(Error::Crypto(
                    "totient too small to draw a random exponent".into(),
                ));
            }
            loop {
                let e = rng.gen_biguint_range(&three, &phi);
                if e.gcd(&phi).is_one() {
                    break e;
                }
            }
        } else {
            if !e_hint.gcd(&phi).is_one() {
                return Err(Error::Crypto(format!(
                    "gcd(e, phi) != 1 for e = {}",
                    e_hint,
                )));
            }
            e_hint.clone()
        };

        let d = inv_mod(&e, &phi)
            .ok_or_else(|| Error::Crypto("e has no inverse modulo the totient".into()))?;
        let dp = &d % (&p - &one);
        let dq = &d % (&q - &one);
        let qinv = inv_mod(&q, &p)
            .ok_or_else(|| Error::Crypto("q has no inverse modulo p".into()))?;

        Ok(RsaFactors {
            version: 0,
            p,
            q,
            n,
            phi,
            e,
            d,
            dp,
            dq,
            qinv,
        })
    }

    /// Rebuild the bundle from the fields a PKCS#1 private key stores.
    ///
    /// The totient is not part of the wire format and is recomputed.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        version: u8,
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
    ) -> RsaFactors {
        let one = BigUint::one();
        let phi = (&p - &one) * (&q - &one);

        RsaFactors {
            version,
            p,
            q,
            n,
            phi,
            e,
            d,
            dp,
            dq,
            qinv,
        }
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigUint;
    use num_integer::Integer;
    use num_traits::One;

    use super::{gen_prime, RetryPolicy, RsaFactors};
    use crate::rand::RsaRng;

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
    fn test_classic_textbook_values() {
        let factors = classic_factors();

        assert_eq!(factors.version, 0);
        assert_eq!(factors.n, BigUint::from(3233_usize));
        assert_eq!(factors.phi, BigUint::from(3120_usize));
        assert_eq!(factors.d, BigUint::from(2753_usize));
        assert_eq!(factors.dp, BigUint::from(53_usize));
        assert_eq!(factors.dq, BigUint::from(49_usize));
        assert_eq!(factors.qinv, BigUint::from(38_usize));
    }

    #[test]
    fn test_primes_are_reordered() {
        let factors = RsaFactors::derive(
            &BigUint::from(53_usize),
            &BigUint::from(61_usize),
            &BigUint::from(17_usize),
            &mut RsaRng::from_seed(Some(1)),
        )
        .unwrap();

        assert_eq!(factors.p, BigUint::from(61_usize));
        assert_eq!(factors.q, BigUint::from(53_usize));
        assert_eq!(factors, classic_factors());
    }

    #[test]
    fn test_derivation_laws_on_generated_primes() {
        let one = BigUint::one();
        let mut rng = RsaRng::from_seed(Some(77));

        let p = gen_prime(128, 40, RetryPolicy::Step, &mut rng);
        let q = loop {
            let q = gen_prime(128, 40, RetryPolicy::Step, &mut rng);
            if q != p {
                break q;
            }
        };

        // A hint below 3 asks for a randomly drawn exponent.
        let factors = RsaFactors::derive(&p, &q, &BigUint::one(), &mut rng).unwrap();

        assert!(factors.p >= factors.q);
        assert!(factors.p.gcd(&factors.q).is_one());
        assert_eq!(factors.n, &factors.p * &factors.q);
        assert_eq!(factors.phi, (&factors.p - &one) * (&factors.q - &one));
        assert!(factors.e >= BigUint::from(3_usize));
        assert!(factors.e.gcd(&factors.phi).is_one());
        assert!((&factors.e * &factors.d % &factors.phi).is_one());
        assert!((&factors.q * &factors.qinv % &factors.p).is_one());
        assert_eq!(factors.dp, &factors.d % (&factors.p - &one));
        assert_eq!(factors.dq, &factors.d % (&factors.q - &one));
        assert!(factors.d < factors.phi);
        assert!(factors.qinv < factors.p);
    }

    #[test]
    fn test_non_coprime_primes_rejected() {
        let result = RsaFactors::derive(
            &BigUint::from(15_usize),
            &BigUint::from(9_usize),
            &BigUint::from(17_usize),
            &mut RsaRng::from_seed(Some(1)),
        );

        assert!(matches!(result, Err(crate::Error::Crypto(_))));
    }

    #[test]
    fn test_non_coprime_exponent_rejected() {
        let result = RsaFactors::derive(
            &BigUint::from(61_usize),
            &BigUint::from(53_usize),
            &BigUint::from(6_usize),
            &mut RsaRng::from_seed(Some(1)),
        );

        assert!(matches!(result, Err(crate::Error::Crypto(_))));
    }

    #[test]
    fn test_from_parts_recomputes_totient() {
        let factors = classic_factors();
        let rebuilt = RsaFactors::from_parts(
            factors.version,
            factors.n.clone(),
            factors.e.clone(),
            factors.d.clone(),
            factors.p.clone(),
            factors.q.clone(),
            factors.dp.clone(),
            factors.dq.clone(),
            factors.qinv.clone(),
        );

        assert_eq!(rebuilt, factors);
    }
}
