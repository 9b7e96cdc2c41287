//! The Fermat-prime specialization: `q = 2^(2^k) + 1`, where `q - 1` is a power of two and
//! the multiplicative-order machinery collapses to bit operations.
//!
//! No single file in `malaire-reed-solomon-16` grounds this (its modulus is the fixed
//! `GF_MODULUS = 2^16 - 17`, not a Fermat prime), so this follows the general shape of
//! [`Ring`] itself, specialized using the closed-form facts that hold whenever `q - 1 = 2^n`:
//! `2^n ≡ -1 (mod q)`, so a double-width product reduces by one shift, mask and conditional
//! add instead of a mod; `q - 1`'s only prime factor is `2`, so `gcd(m, q - 1)` is a
//! `trailing_zeros` lookup instead of an Euclidean loop; and `3` is the known primitive root of
//! every Fermat prime but the smallest, so root search is an `O(1)` check instead of an
//! `O(q)` scan.

use crate::{Error, Ring};

// ======================================================================
// FermatRing - PUBLIC

/// A [`Ring`] whose modulus is known at construction time to be `2^(2^k) + 1` for some `k`.
///
/// Unlike [`FieldOps`](crate::FieldOps)'s `Naive`/`Portable`/AVX2 specializations, which share
/// one scalar `Ring` and speed up only the buffer-level ops, `FermatRing` speeds up the scalar
/// layer itself: [`FermatRing::mul`], [`FermatRing::find_primitive_root`] (run once, during
/// [`FermatRing::new`]) and [`FermatRing::get_nth_root`] each replace the general [`Ring`]
/// algorithm with a closed form that only holds because `q - 1` is a power of two. Everything
/// else (`add`, `sub`, `exp`, `log`, …) is exposed through [`FermatRing::ring`], unchanged.
#[derive(Clone, Debug)]
pub struct FermatRing<T: crate::Element> {
    inner: Ring<T>,
    k: u32,
    /// `q - 1 = 2^n`; cached so [`FermatRing::mul`]/[`FermatRing::get_nth_root`] don't
    /// recompute it from `k` on every call.
    n: u32,
}

impl<T: crate::Element> FermatRing<T> {
    /// Builds `Z/qZ` for `q = 2^(2^k) + 1`, the `k`-th Fermat prime candidate.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `q` is not of the form `2^(2^k) + 1` for the given `k`, or
    /// any error the underlying construction can return.
    pub fn new(q: T, k: u32) -> Result<Self, Error> {
        let n = 1u32
            .checked_shl(k)
            .ok_or(Error::InvalidArgument {
                expected: 0,
                got: k as usize,
            })?;
        let expected = 1u128
            .checked_shl(n)
            .and_then(|p| p.checked_add(1))
            .ok_or(Error::InvalidArgument {
                expected: 0,
                got: k as usize,
            })?;
        if q.to_u128() != expected {
            return Err(Error::InvalidArgument {
                expected: expected as usize,
                got: q.to_u128() as usize,
            });
        }

        let inner = Ring::new_with(q, Self::find_primitive_root)?;
        Ok(FermatRing { inner, k, n })
    }

    /// The general ring this specialization is built over, for every operation that has no
    /// cheaper closed form here (`add`, `sub`, `exp`, `log`, buffer ops, …).
    pub fn ring(&self) -> &Ring<T> {
        &self.inner
    }

    /// The Fermat exponent `k`, i.e. `q = 2^(2^k) + 1`.
    pub fn fermat_exponent(&self) -> u32 {
        self.k
    }

    /// `(a * b) mod q`, reduced in closed form instead of through [`Ring::mul`]'s double-width
    /// division.
    ///
    /// Since `q - 1 = 2^n`, `2^n ≡ -1 (mod q)`. Writing the double-width product as
    /// `hi * 2^n + lo` (`lo` the low `n` bits, `hi` the rest) gives `product ≡ lo - hi (mod q)`:
    /// a shift, a mask and a subtract, with at most one conditional `+ q` to land back in
    /// `[0, q)` — no division, unlike the general [`Wide`](crate::wide::Wide)-accumulator path.
    pub fn mul(&self, a: T, b: T) -> T {
        debug_assert!(self.n <= 64, "closed-form Fermat reduction needs q - 1 <= 2^64");

        let product = a.to_u128() * b.to_u128();
        let mask = (1u128 << self.n) - 1;
        let lo = (product & mask) as i128;
        let hi = (product >> self.n) as i128;

        let q = self.inner.modulus().to_u128() as i128;
        let mut value = lo - hi;
        if value < 0 {
            value += q;
        }
        T::from_u128(value as u128)
    }

    /// `x^2 mod q`, via [`FermatRing::mul`].
    pub fn square(&self, x: T) -> T {
        self.mul(x, x)
    }

    /// A primitive `n`th root of unity: `g^((q - 1) / d)` where `d = gcd(n, q - 1)`.
    ///
    /// Since `q - 1 = 2^m` has only `2` as a prime factor, `gcd(n, q - 1) = 2^min(v, m)` where
    /// `v` is `n`'s 2-adic valuation — a `trailing_zeros` lookup rather than the general
    /// Euclidean loop [`Ring::get_nth_root`] runs.
    pub fn get_nth_root(&self, n: u128) -> T {
        let m = self.n;
        let v = if n == 0 { m } else { n.trailing_zeros().min(m) };
        let exponent = (1u128 << m) >> v;
        self.inner.exp(self.inner.primitive_root(), exponent)
    }

    /// Closed-form primitive-root search: `3` is the known primitive root of every Fermat
    /// prime except the smallest (`q = 3`, whose only candidate is `2`); verifying that
    /// `is_primitive_root` takes one exponentiation here, since `q - 1`'s only proper divisor
    /// is `(q - 1) / 2`, against the `[2, q)` scan the general [`Ring::find_primitive_root`]
    /// runs. Not every modulus of the form `2^(2^k) + 1` is actually prime (`F_5` and up are
    /// known composite), so this falls back to the general scan if the closed-form guess is
    /// wrong rather than silently returning a non-root.
    fn find_primitive_root(ring: &Ring<T>) -> Result<T, Error> {
        if ring.modulus().to_u128() == 3 {
            return Ok(T::from_u128(2));
        }
        let candidate = T::from_u128(3);
        if ring.is_primitive_root(candidate) {
            return Ok(candidate);
        }
        ring.find_primitive_root()
    }
}

// ======================================================================
// TESTS

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_fermat_modulus() {
        assert!(FermatRing::<u64>::new(97, 5).is_err());
    }

    #[test]
    fn accepts_257_as_k_equals_3() {
        // 257 = 2^8 + 1 = 2^(2^3) + 1.
        let ring = FermatRing::<u64>::new(257, 3).unwrap();
        assert_eq!(ring.fermat_exponent(), 3);
        assert_eq!(ring.ring().primitive_root(), 3);
    }

    #[test]
    fn smallest_fermat_prime_uses_two_as_its_root() {
        // 3 = 2^1 + 1 = 2^(2^0) + 1.
        let ring = FermatRing::<u64>::new(3, 0).unwrap();
        assert_eq!(ring.ring().primitive_root(), 2);
    }

    #[test]
    fn mul_matches_the_general_ring_multiplication() {
        let fermat = FermatRing::<u64>::new(257, 3).unwrap();
        let general = fermat.ring();
        for a in 0..257u64 {
            for b in [0, 1, 2, 17, 100, 256] {
                assert_eq!(fermat.mul(a, b), general.mul(a, b));
            }
        }
    }

    #[test]
    fn mul_handles_the_all_ones_operand_without_a_second_reduction() {
        // (q - 1) * (q - 1) = (-1) * (-1) = 1 (mod q); also the input that maximizes both the
        // `hi` half and the magnitude of `lo - hi`.
        let fermat = FermatRing::<u64>::new(65537, 4).unwrap();
        assert_eq!(fermat.mul(65536, 65536), 1);
    }

    #[test]
    fn square_matches_mul_with_itself() {
        let ring = FermatRing::<u64>::new(257, 3).unwrap();
        assert_eq!(ring.square(9), ring.mul(9, 9));
    }

    #[test]
    fn get_nth_root_matches_the_general_gcd_based_formula() {
        let fermat = FermatRing::<u64>::new(257, 3).unwrap();
        for n in [1u128, 2, 4, 8, 16, 32, 64, 128, 256] {
            let fast = fermat.get_nth_root(n);
            let general = fermat.ring().get_nth_root(n);
            assert_eq!(fast, general, "n={n}");
            assert_eq!(fermat.ring().exp(fast, n), 1);
        }
    }
}
