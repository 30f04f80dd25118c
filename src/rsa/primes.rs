use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand::Rng;

const FIRST_PRIMES_COUNT: usize = 2048;

// Must hold at least FIRST_PRIMES_COUNT primes; the 2048th is 17863.
const SIEVE_LIMIT: usize = 1 << 15;

/// Small primes used to cheaply reject candidates before the witness loop,
/// from a Sieve of Eratosthenes.
pub static FIRST_PRIMES: Lazy<Vec<BigUint>> = Lazy::new(|| {
    let mut composite = vec![false; SIEVE_LIMIT];
    let mut primes = Vec::with_capacity(FIRST_PRIMES_COUNT);

    for x in 2..SIEVE_LIMIT {
        if composite[x] {
            continue;
        }

        primes.push(BigUint::from(x));
        if primes.len() == FIRST_PRIMES_COUNT {
            break;
        }

        for multiple in (x * x..SIEVE_LIMIT).step_by(x) {
            composite[multiple] = true;
        }
    }

    primes
});

// Basic divisibility test against the first few primes. A sieve prime
// itself passes.
fn passes_sieve(candidate: &BigUint) -> bool {
    FIRST_PRIMES
        .iter()
        .all(|prime| candidate == prime || !(candidate % prime).is_zero())
}

// Rewrite `n = 2^s * d` with `d` odd.
fn decompose(mut d: BigUint) -> (u64, BigUint) {
    let mut s = 0;

    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    (s, d)
}

/// [Miller–Rabin primality test](https://en.wikipedia.org/wiki/Miller%E2%80%93Rabin_primality_test).
///
/// `false` is certain compositeness; `true` is primality with error
/// probability at most `4^-rounds`.
pub fn is_prime<R: Rng + ?Sized>(candidate: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = &one + &one;

    if [2_u32, 3, 5, 7]
        .iter()
        .any(|&small| *candidate == BigUint::from(small))
    {
        return true;
    }
    if *candidate <= one || candidate.is_even() {
        return false;
    }

    let candidate_minus_one = candidate - &one;
    let (s, d) = decompose(candidate_minus_one.clone());

    'witness: for _ in 0..rounds {
        // Uniform witness in [2, candidate - 2].
        let a = rng.gen_biguint_range(&two, &candidate_minus_one);
        let mut x = a.modpow(&d, candidate);

        if x.is_one() || x == candidate_minus_one {
            continue;
        }

        for _ in 1..s {
            x = x.modpow(&two, candidate);

            if x == candidate_minus_one {
                continue 'witness;
            }
            if x.is_one() {
                return false;
            }
        }

        return false;
    }

    true
}

/// What to do with a candidate that fails the primality test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Advance to the next odd number. Primes are dense enough that a short
    /// walk finds one.
    Step,
    /// Draw a fresh random candidate.
    Redraw,
}

// An `nbits` candidate with the top and bottom bit forced, so the product
// of two of them has full width and the candidate is odd.
fn gen_candidate<R: Rng + ?Sized>(nbits: u64, rng: &mut R) -> BigUint {
    let mut candidate = rng.gen_biguint(nbits);
    candidate.set_bit(nbits - 1, true);
    candidate.set_bit(0, true);
    candidate
}

/// Randomly generate an `nbits` prime.
pub fn gen_prime<R: Rng + ?Sized>(
    nbits: u64,
    rounds: usize,
    retry: RetryPolicy,
    rng: &mut R,
) -> BigUint {
    let two = BigUint::from(2_usize);
    let mut candidate = gen_candidate(nbits, rng);
    let mut tested = 1_u64;

    loop {
        if passes_sieve(&candidate) && is_prime(&candidate, rounds, rng) {
            log::debug!("prime found after {} candidates", tested);
            return candidate;
        }

        candidate = match retry {
            RetryPolicy::Step => candidate + &two,
            RetryPolicy::Redraw => gen_candidate(nbits, rng),
        };
        tested += 1;
    }
}
