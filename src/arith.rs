//! Scalar number-theoretic kernel: extended GCD, prime factorization, and code-length search.
//!
//! These are pure functions on `u128`/`i128`, independent of any particular [`Ring`](crate::Ring)
//! — [`Ring::new`](crate::Ring::new) calls straight into [`factor_prime`] and
//! [`get_proper_divisors`] during construction.

use crate::Error;

// ======================================================================
// FUNCTIONS - PUBLIC

/// Extended Euclidean algorithm.
///
/// Returns `(g, s, t)` with `g = gcd(a, b)` and `s * a + t * b = g`.
///
/// # Examples
///
/// ```rust
/// use ntt_field::arith::extended_gcd;
///
/// let (g, s, t) = extended_gcd(240, 46);
/// assert_eq!(g, 2);
/// assert_eq!(s * 240 + t * 46, 2);
/// ```
pub fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);

    while r != 0 {
        let quotient = old_r / r;

        let new_r = old_r - quotient * r;
        old_r = r;
        r = new_r;

        let new_s = old_s - quotient * s;
        old_s = s;
        s = new_s;

        let new_t = old_t - quotient * t;
        old_t = t;
        t = new_t;
    }

    (old_r, old_s, old_t)
}

/// Standard Euclidean GCD.
///
/// # Examples
///
/// ```rust
/// use ntt_field::arith::gcd;
///
/// assert_eq!(gcd(48, 18), 6);
/// assert_eq!(gcd(0, 5), 5);
/// ```
pub fn gcd(a: u128, b: u128) -> u128 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Prime factorization of `n >= 1` by trial division up to `floor(sqrt(n))`.
///
/// Returns `(primes, exponents)` with `primes` strictly increasing and
/// `n = product(primes[i] ^ exponents[i])`. `n = 1` returns two empty vectors.
///
/// # Examples
///
/// ```rust
/// use ntt_field::arith::factor_prime;
///
/// let (primes, exponents) = factor_prime(96);
/// assert_eq!(primes, vec![2, 3]);
/// assert_eq!(exponents, vec![5, 1]);
/// ```
pub fn factor_prime(n: u128) -> (Vec<u64>, Vec<u32>) {
    assert!(n >= 1, "factor_prime requires n >= 1");

    let mut primes = Vec::new();
    let mut exponents = Vec::new();

    let mut n = n;
    let mut p = 2u128;
    while p * p <= n {
        if n % p == 0 {
            let mut e = 0u32;
            while n % p == 0 {
                n /= p;
                e += 1;
            }
            primes.push(p as u64);
            exponents.push(e);
        }
        p += 1;
    }
    if n > 1 {
        primes.push(n as u64);
        exponents.push(1);
    }

    (primes, exponents)
}

/// Flattens a `(primes, exponents)` factorization into the list of prime factors with
/// multiplicity, e.g. `([2, 3], [2, 1])` -> `[2, 2, 3]`.
///
/// # Examples
///
/// ```rust
/// use ntt_field::arith::get_prime_factors;
///
/// assert_eq!(get_prime_factors(&[2, 3], &[2, 1]), vec![2, 2, 3]);
/// ```
pub fn get_prime_factors(primes: &[u64], exponents: &[u32]) -> Vec<u64> {
    assert_eq!(primes.len(), exponents.len());

    let mut flat = Vec::new();
    for (&p, &e) in primes.iter().zip(exponents) {
        flat.extend(std::iter::repeat(p).take(e as usize));
    }
    flat
}

/// Returns `n / p` for each distinct prime divisor `p` of `n`, in the same order as `primes`.
///
/// # Examples
///
/// ```rust
/// use ntt_field::arith::get_proper_divisors;
///
/// assert_eq!(get_proper_divisors(96, &[2, 3]), vec![48, 32]);
/// ```
pub fn get_proper_divisors(n: u128, primes: &[u64]) -> Vec<u128> {
    primes.iter().map(|&p| n / p as u128).collect()
}

/// Smallest integer `>= n_min` that divides `q_minus_1`.
///
/// # Errors
///
/// [`Error::NoSolution`] if no such divisor exists in `[n_min, q_minus_1]`.
pub fn get_code_len(q_minus_1: u128, n_min: u128) -> Result<u128, Error> {
    if n_min == 0 {
        return Ok(0);
    }
    let mut candidate = n_min;
    while candidate <= q_minus_1 {
        if q_minus_1 % candidate == 0 {
            return Ok(candidate);
        }
        candidate += 1;
    }
    Err(Error::NoSolution)
}

/// Smallest integer `>= n_min` expressible as a product of elements of `factors` (with
/// multiplicity) — the smallest highly composite transform length the given factor multiset
/// supports.
///
/// `factors` is the flattened prime-factor list of `q - 1` (see [`get_prime_factors`]); the
/// search explores all products of sub-multisets of `factors`, smallest first.
///
/// # Errors
///
/// [`Error::NoSolution`] if no product of a sub-multiset of `factors` is `>= n_min`.
pub fn get_code_len_high_compo(factors: &[u64], n_min: u128) -> Result<u128, Error> {
    if n_min <= 1 {
        return Ok(1);
    }

    // Reachable products, built breadth-first by multiplying in one more factor at a time.
    // `factors` is short for any q actually used as an NTT modulus, so this stays small.
    let mut reachable: Vec<u128> = vec![1];
    let mut best: Option<u128> = None;

    for &factor in factors {
        let mut next = Vec::with_capacity(reachable.len() * 2);
        for &r in &reachable {
            next.push(r);
            let product = r * factor as u128;
            if let Some(current_best) = best {
                if product >= current_best {
                    continue;
                }
            }
            if product >= n_min {
                best = Some(match best {
                    Some(b) => b.min(product),
                    None => product,
                });
            }
            next.push(product);
        }
        next.sort_unstable();
        next.dedup();
        reachable = next;
    }

    best.ok_or(Error::NoSolution)
}

// ======================================================================
// TESTS
