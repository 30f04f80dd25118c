use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// [Extended Euclidean algorithm](https://en.wikipedia.org/wiki/Extended_Euclidean_algorithm)
///
/// Returns `(g, x, y)` such that `a*x + b*y = g = gcd(a, b)`, via the
/// iterative two-row update.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn egcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let mut a = a.clone();
    let mut b = b.clone();
    let (mut x0, mut x1) = (BigInt::zero(), BigInt::one());
    let (mut y0, mut y1) = (BigInt::one(), BigInt::zero());

    while !a.is_zero() {
        let q = &b / &a;
        let r = &b % &a;
        b = std::mem::replace(&mut a, r);

        let x = &x0 - &q * &x1;
        x0 = std::mem::replace(&mut x1, x);
        let y = &y0 - &q * &y1;
        y0 = std::mem::replace(&mut y1, y);
    }

    (b, x0, y0)
}

/// [Modular multiplicative inverse](https://en.wikipedia.org/wiki/Modular_multiplicative_inverse)
///
/// The unique value in `[0, n)` that multiplies with `a` to `1 mod n`, or
/// `None` when `a` and `n` are not coprime.
///
/// The Bezout cofactor of `a` may come out negative, so it is reduced with
/// a floored (sign-correcting) modulo before the narrowing back to
/// unsigned.
#[must_use]
pub fn inv_mod(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    let n_int = BigInt::from(n.clone());
    let (g, x, _) = egcd(&BigInt::from(a.clone()), &n_int);

    if !g.is_one() {
        return None;
    }

    x.mod_floor(&n_int).to_biguint()
}
