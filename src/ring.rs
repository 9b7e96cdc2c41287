//! [`Ring`], the `Z/qZ` scalar arithmetic and group-theory core every other module builds on.
//!
//! Grounded on `malaire-reed-solomon-16`'s `engine` module: `GF_MODULUS`/`GF_ORDER`/
//! `CANTOR_BASIS` plus `add_mod`/`sub_mod` fix one modulus (`2^16 - 17`) at compile time.
//! `Ring` generalizes that to an arbitrary prime `q`, discovered at runtime: [`Ring::new`]
//! factors `q - 1` once and caches that factorization for every later group-theoretic query
//! (order, primitive root, nth root).

use std::sync::Arc;

use crate::{arith, AlignedBuffer, Element, Error};

pub mod cache;

pub use cache::OmegaCacheStore;

// ======================================================================
// Ring - PUBLIC

/// `Z/qZ`, built once for a given modulus `q` and shared read-only afterwards.
///
/// Construction is the expensive part: [`Ring::new`] factors `q - 1` and searches for a
/// primitive root. Every other method is a cheap scalar computation against the cached
/// factorization. Callers that need to share one `Ring` across worker threads typically hold it
/// behind an [`Arc`]; [`Ring::new`] itself just returns an owned value so callers can choose.
#[derive(Clone, Debug)]
pub struct Ring<T: Element> {
    q: T,
    q_minus_1: u128,
    primes: Vec<u64>,
    exponents: Vec<u32>,
    proper_divisors: Vec<u128>,
    root: T,
}

impl<T: Element> Ring<T> {
    /// Builds the ring `Z/qZ`, factoring `q - 1` and searching `[2, q)` for a primitive root.
    ///
    /// # Errors
    ///
    /// [`Error::AssertionFailure`] if `q < 2` or if no primitive root is found (which should be
    /// impossible for a prime `q`; this crate trusts callers to pass a prime modulus, since
    /// there is no cheap general primality test that belongs in this constructor).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ntt_field::Ring;
    ///
    /// let ring = Ring::<u64>::new(97).unwrap();
    /// assert_eq!(ring.primitive_root(), 5);
    /// ```
    pub fn new(q: T) -> Result<Self, Error> {
        Self::new_with(q, Ring::find_primitive_root)
    }

    /// Same construction as [`Ring::new`], except the primitive-root search is supplied by
    /// `find_root` instead of the generic [`Ring::find_primitive_root`].
    ///
    /// This is the two-phase-init seam a specialization overrides: factorization and the
    /// proper-divisor set are always built the general way, but a ring whose modulus has
    /// closed-form root lookup (e.g. [`FermatRing`](crate::field::fermat::FermatRing)) can
    /// plug in its own `find_root` instead of paying for the brute-force `[2, q)` scan.
    pub(crate) fn new_with(
        q: T,
        find_root: impl FnOnce(&Ring<T>) -> Result<T, Error>,
    ) -> Result<Self, Error> {
        let q_u128 = q.to_u128();
        if q_u128 < 2 {
            return Err(Error::AssertionFailure {
                reason: "ring modulus must be >= 2",
            });
        }

        let q_minus_1 = q_u128 - 1;
        let (primes, exponents) = if q_minus_1 == 0 {
            (Vec::new(), Vec::new())
        } else {
            arith::factor_prime(q_minus_1)
        };
        let proper_divisors = arith::get_proper_divisors(q_minus_1, &primes);

        let mut ring = Ring {
            q,
            q_minus_1,
            primes,
            exponents,
            proper_divisors,
            root: T::zero(),
        };
        ring.root = find_root(&ring)?;
        Ok(ring)
    }

    /// Wraps this ring in an [`Arc`] for sharing across the [`FieldOps`](crate::FieldOps)
    /// implementations, which all hold their ring this way.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// The modulus `q`.
    pub fn modulus(&self) -> T {
        self.q
    }

    /// The primitive root found during construction.
    pub fn primitive_root(&self) -> T {
        self.root
    }

    /// `true` if `0 <= a < q`. Every value actually representable as `T` on a ring built by
    /// [`Ring::new`] already satisfies this; it exists for callers that construct a `T` by hand.
    pub fn check(&self, a: T) -> bool {
        a.to_u128() < self.q.to_u128()
    }

    /// `-a mod q`.
    pub fn neg(&self, a: T) -> T {
        let qv = self.q.to_u128();
        let av = a.to_u128();
        T::from_u128(if av == 0 { 0 } else { qv - av })
    }

    /// `(a + b) mod q`.
    pub fn add(&self, a: T, b: T) -> T {
        let qv = self.q.to_u128();
        let sum = a.to_u128() + b.to_u128();
        T::from_u128(if sum >= qv { sum - qv } else { sum })
    }

    /// `(a - b) mod q`.
    pub fn sub(&self, a: T, b: T) -> T {
        let qv = self.q.to_u128();
        let (av, bv) = (a.to_u128(), b.to_u128());
        T::from_u128(if av >= bv { av - bv } else { qv - (bv - av) })
    }

    /// `(a * b) mod q`, via the double-width accumulator from [`Wide`](crate::wide::Wide).
    pub fn mul(&self, a: T, b: T) -> T {
        T::narrow_mod(a.mul_wide(b), self.q)
    }

    /// The multiplicative inverse of `a`, via the extended Euclidean algorithm.
    ///
    /// # Panics
    ///
    /// If `a` is zero.
    pub fn inv(&self, a: T) -> T {
        assert_ne!(a, T::zero(), "0 has no multiplicative inverse");

        // `extended_gcd` runs in i128; every modulus this crate constructs a `Ring` over is
        // documented (see `U256::rem_u128`) to stay well under 2^127, so this cast is lossless.
        let qv = self.q.to_u128() as i128;
        let av = a.to_u128() as i128;
        let (g, s, _) = arith::extended_gcd(av, qv);
        debug_assert_eq!(g, 1, "inverse requires a prime modulus");

        let s = ((s % qv) + qv) % qv;
        T::from_u128(s as u128)
    }

    /// `a / b mod q`, i.e. `a * inv(b)`.
    ///
    /// # Panics
    ///
    /// If `b` is zero.
    pub fn div(&self, a: T, b: T) -> T {
        self.mul(a, self.inv(b))
    }

    /// `a ^ e mod q`, by square-and-multiply.
    pub fn exp(&self, a: T, e: u128) -> T {
        if e == 0 {
            return T::one();
        }

        let mut result = T::one();
        let mut base = a;
        let mut exponent = e;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exponent >>= 1;
        }
        result
    }

    /// The smallest `r` in `[1, q)` with `a^r = b`, by brute-force search.
    ///
    /// This is not a hot-path operation (nothing in the butterfly primitives calls it); it
    /// exists for tests and offline tooling that need a discrete log against a small ring.
    ///
    /// # Errors
    ///
    /// [`Error::NoSolution`] if no such `r` exists.
    pub fn log(&self, a: T, b: T) -> Result<u128, Error> {
        let mut power = a;
        for r in 1..self.q.to_u128() {
            if power == b {
                return Ok(r);
            }
            power = self.mul(power, a);
        }
        Err(Error::NoSolution)
    }

    /// Whether `x` is a quadratic residue mod `q`, by Euler's criterion: `x` is a residue iff
    /// `x^((q-1)/2) = 1`. `0` is treated as a (trivial) residue.
    pub fn is_quadratic_residue(&self, x: T) -> bool {
        if x == T::zero() {
            return true;
        }
        self.exp(x, self.q_minus_1 / 2) == T::one()
    }

    /// Whether `x` has multiplicative order exactly `q - 1`.
    pub fn is_primitive_root(&self, x: T) -> bool {
        if x == T::zero() {
            return false;
        }
        if self.q_minus_1 == 1 {
            return true;
        }
        self.proper_divisors
            .iter()
            .all(|&d| self.exp(x, d) != T::one())
    }

    /// The multiplicative order of `x`: the smallest `r >= 1` with `x^r = 1`.
    ///
    /// Starts from `q - 1` (which every element's order divides, by Lagrange) and repeatedly
    /// divides out a prime factor `p` of the running order whenever `x` raised to the
    /// quotient still lands on `1`.
    pub fn get_order(&self, x: T) -> u128 {
        if x == T::zero() || x == T::one() {
            return 1;
        }

        let mut order = self.q_minus_1;
        for (&p, &e) in self.primes.iter().zip(self.exponents.iter()) {
            for _ in 0..e {
                let candidate = order / p as u128;
                if self.exp(x, candidate) == T::one() {
                    order = candidate;
                } else {
                    break;
                }
            }
        }
        order
    }

    /// A primitive `n`th root of unity, i.e. an element of order exactly `n`.
    ///
    /// `n` need not divide `q - 1` exactly; the returned element has order `(q - 1) /
    /// gcd(n, q - 1)`, matching the usual NTT convention of asking for "an nth root" and getting
    /// back whatever root of unity the ring actually supports closest to that length.
    pub fn get_nth_root(&self, n: u128) -> T {
        let d = arith::gcd(n, self.q_minus_1);
        let exponent = self.q_minus_1 / d;
        self.exp(self.root, exponent)
    }

    /// Fills `buf[0..n]` with `[1, omega, omega^2, ..., omega^(n-1)]`.
    ///
    /// # Panics
    ///
    /// If `buf.len() < n`.
    pub fn compute_omegas(&self, buf: &mut AlignedBuffer<T>, n: usize, omega: T) {
        assert!(buf.len() >= n, "omega buffer too small for requested length");

        let mut power = T::one();
        for slot in buf.as_mut_slice().iter_mut().take(n) {
            *slot = power;
            power = self.mul(power, omega);
        }
    }

    /// Same as [`Ring::compute_omegas`], but checks `store` first and populates it on a miss.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `store` holds a cached table for this `omega` whose length
    /// does not match the requested `n`.
    pub fn compute_omegas_cached<S: OmegaCacheStore<T>>(
        &self,
        store: &S,
        n: usize,
        omega: T,
    ) -> Result<AlignedBuffer<T>, Error> {
        if let Some(cached) = store.get(omega.to_u128()) {
            if cached.len() != n {
                return Err(Error::InvalidArgument {
                    expected: n,
                    got: cached.len(),
                });
            }
            return Ok(AlignedBuffer::from_slice(&cached));
        }

        let mut buf = AlignedBuffer::with_capacity(n);
        self.compute_omegas(&mut buf, n, omega);
        store.put(omega.to_u128(), buf.as_slice());
        Ok(buf)
    }

    /// Searches `[2, q)` for the first primitive root, using the partially-built `self` (only
    /// `q`, `q_minus_1` and `proper_divisors` are read; `root` is not yet meaningful).
    pub(crate) fn find_primitive_root(&self) -> Result<T, Error> {
        if self.q.to_u128() == 2 {
            return Ok(T::one());
        }

        let mut candidate = 2u128;
        while candidate < self.q.to_u128() {
            let x = T::from_u128(candidate);
            if self.is_primitive_root(x) {
                return Ok(x);
            }
            candidate += 1;
        }

        Err(Error::AssertionFailure {
            reason: "primitive root search exhausted [2, q): modulus is likely not prime",
        })
    }
}

// ======================================================================
// TESTS

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_degenerate_modulus() {
        assert_eq!(
            Ring::<u64>::new(1).unwrap_err(),
            Error::AssertionFailure {
                reason: "ring modulus must be >= 2"
            }
        );
    }

    #[test]
    fn q_equals_two_has_trivial_root() {
        let ring = Ring::<u64>::new(2).unwrap();
        assert_eq!(ring.primitive_root(), 1);
        assert_eq!(ring.modulus(), 2);
    }

    #[test]
    fn ring_97_matches_known_primitive_root() {
        let ring = Ring::<u64>::new(97).unwrap();
        assert_eq!(ring.primitive_root(), 5);
        assert_eq!(ring.get_order(5), 96);
    }

    #[test]
    fn nth_root_has_requested_order() {
        let ring = Ring::<u64>::new(97).unwrap();
        let omega = ring.get_nth_root(8);
        assert_eq!(ring.get_order(omega), 8);
        assert_eq!(ring.exp(omega, 8), 1);
    }

    #[test]
    fn compute_omegas_matches_repeated_multiplication() {
        let ring = Ring::<u64>::new(97).unwrap();
        let omega = ring.get_nth_root(8);
        let mut buf = AlignedBuffer::with_capacity(8);
        ring.compute_omegas(&mut buf, 8, omega);

        let mut expect = Vec::with_capacity(8);
        let mut power = 1u64;
        for _ in 0..8 {
            expect.push(power);
            power = ring.mul(power, omega);
        }
        assert_eq!(buf.as_slice(), expect.as_slice());
        assert_eq!(buf.as_slice()[0], 1);
        assert_eq!(ring.mul(omega, ring.inv(omega)), 1);
    }

    #[test]
    fn add_sub_neg_are_consistent() {
        let ring = Ring::<u64>::new(97).unwrap();
        for a in 0..97 {
            assert_eq!(ring.sub(ring.add(a, 13), 13), a);
            assert_eq!(ring.add(a, ring.neg(a)), 0);
        }
    }

    #[test]
    fn inv_and_div_round_trip() {
        let ring = Ring::<u64>::new(97).unwrap();
        for a in 1..97u64 {
            let inverse = ring.inv(a);
            assert_eq!(ring.mul(a, inverse), 1);
            assert_eq!(ring.div(a, a), 1);
        }
    }

    #[test]
    fn log_recovers_the_exponent() {
        let ring = Ring::<u64>::new(257).unwrap();
        let r = ring.log(3, 5).unwrap();
        assert_eq!(ring.exp(3, r), 5);
    }

    #[test]
    fn log_reports_no_solution_for_non_power() {
        // In Z/7Z, 2 generates the subgroup {1, 2, 4}; 3 is outside it.
        let ring = Ring::<u64>::new(7).unwrap();
        assert_eq!(ring.log(2, 3), Err(Error::NoSolution));
    }

    #[test]
    fn quadratic_residue_matches_brute_force() {
        let ring = Ring::<u64>::new(97).unwrap();
        let residues: Vec<u64> = (1..97).map(|a| ring.mul(a, a)).collect();
        for x in 1..97u64 {
            assert_eq!(ring.is_quadratic_residue(x), residues.contains(&x));
        }
    }

    #[test]
    fn fermat_prime_257_has_primitive_root_three() {
        let ring = Ring::<u64>::new(257).unwrap();
        assert_eq!(ring.primitive_root(), 3);
    }
}
