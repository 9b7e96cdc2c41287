//! AVX2 [`FieldOps`] specializations for 32- and 64-bit elements.
//!
//! Grounded on `malaire-reed-solomon-16`'s `engine::engine_avx2::Avx2`: a concrete, non-generic SIMD engine
//! (it fixes `GfElement = u16`; here, one concrete struct per supported element
//! width) gated behind `cfg(all(feature = "avx2", any(target_arch = "x86", target_arch =
//! "x86_64")))` with `#[target_feature(enable = "avx2")]` unsafe inner functions.
//!
//! `malaire-reed-solomon-16`'s `Avx2::mul` vectorizes cleanly because `GF(2^16)` multiplication is a
//! log-table lookup, not a modular reduction. Genuine `a*b mod q` for an arbitrary prime `q`
//! has no equally cheap vector form (it needs a full double-width product plus a reduction),
//! so the operations below vectorize the add/subtract/negate paths — which are exactly
//! conditional-subtract, a single `cmpgt` plus `blend` in AVX2 — and fall back to the scalar
//! ring for any path that multiplies two ring elements together.
//!
//! The packed add/sub compute `a + b` (or `a - b + q`) directly in the lane width before the
//! conditional-subtract compare, so a modulus at or above half the lane's range would let that
//! intermediate sum overflow and wrap before the compare ever runs. `Avx2U32::new`/
//! `Avx2U64::new` reject such a modulus up front rather than silently diverging from the
//! scalar `Ring::add`/`sub`, which avoid the problem entirely by widening into `u128`.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::field::{FieldOps, SharedRing};
use crate::{Error, Ring};

/// Lanes of a 256-bit AVX2 register holding packed 32-bit elements.
const LANES_U32: usize = 8;
/// Lanes of a 256-bit AVX2 register holding packed 64-bit elements.
const LANES_U64: usize = 4;

// ======================================================================
// Avx2U32 - PUBLIC

/// AVX2-accelerated [`FieldOps<u32>`].
#[derive(Clone, Debug)]
pub struct Avx2U32 {
    ring: SharedRing<u32>,
}

impl Avx2U32 {
    /// Wraps `ring` for AVX2-accelerated buffer operations.
    ///
    /// # Safety requirement on use
    ///
    /// Every method assumes the caller has already verified `is_x86_feature_detected!("avx2")`
    /// at or above this process's runtime; this type does not re-check it per call.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `ring.modulus() >= 2^31`: the packed add/sub add two
    /// `u32` lanes before reducing, so a modulus at or above half the lane's range could let
    /// that intermediate sum overflow and wrap ahead of the conditional-subtract compare.
    pub fn new(ring: SharedRing<u32>) -> Result<Self, Error> {
        let limit = 1u64 << 31;
        if ring.modulus() as u64 >= limit {
            return Err(Error::InvalidArgument {
                expected: limit as usize - 1,
                got: ring.modulus() as usize,
            });
        }
        Ok(Avx2U32 { ring })
    }

    #[target_feature(enable = "avx2")]
    unsafe fn add_two_bufs_inner(&self, src: &[u32], dst: &mut [u32]) {
        let q = self.ring.modulus();
        let qv = _mm256_set1_epi32(q as i32);
        let chunks = dst.len() / LANES_U32;

        for i in 0..chunks {
            let base = i * LANES_U32;
            let a = _mm256_loadu_si256(dst.as_ptr().add(base) as *const __m256i);
            let b = _mm256_loadu_si256(src.as_ptr().add(base) as *const __m256i);
            let sum = _mm256_add_epi32(a, b);
            // Unsigned-correct "sum >= q" test via XOR with the sign bit: the standard
            // bias trick for lane-wise unsigned compares under AVX2's signed
            // comparison instructions.
            let bias = _mm256_set1_epi32(i32::MIN);
            let sum_biased = _mm256_xor_si256(sum, bias);
            let q_biased = _mm256_xor_si256(qv, bias);
            let ge_mask = _mm256_cmpgt_epi32(sum_biased, _mm256_sub_epi32(q_biased, _mm256_set1_epi32(1)));
            let reduced = _mm256_sub_epi32(sum, qv);
            let result = _mm256_blendv_epi8(sum, reduced, ge_mask);
            _mm256_storeu_si256(dst.as_mut_ptr().add(base) as *mut __m256i, result);
        }

        for i in (chunks * LANES_U32)..dst.len() {
            dst[i] = self.ring.add(dst[i], src[i]);
        }
    }

    #[target_feature(enable = "avx2")]
    unsafe fn sub_two_bufs_inner(&self, a: &[u32], b: &[u32], r: &mut [u32]) {
        let q = self.ring.modulus();
        let qv = _mm256_set1_epi32(q as i32);
        let chunks = r.len() / LANES_U32;

        for i in 0..chunks {
            let base = i * LANES_U32;
            let av = _mm256_loadu_si256(a.as_ptr().add(base) as *const __m256i);
            let bv = _mm256_loadu_si256(b.as_ptr().add(base) as *const __m256i);
            let bias = _mm256_set1_epi32(i32::MIN);
            let a_biased = _mm256_xor_si256(av, bias);
            let b_biased = _mm256_xor_si256(bv, bias);
            let lt_mask = _mm256_cmpgt_epi32(b_biased, a_biased);
            let diff = _mm256_sub_epi32(av, bv);
            let wrapped = _mm256_add_epi32(diff, qv);
            let result = _mm256_blendv_epi8(diff, wrapped, lt_mask);
            _mm256_storeu_si256(r.as_mut_ptr().add(base) as *mut __m256i, result);
        }

        for i in (chunks * LANES_U32)..r.len() {
            r[i] = self.ring.sub(a[i], b[i]);
        }
    }

    #[target_feature(enable = "avx2")]
    unsafe fn neg_buf_inner(&self, x: &mut [u32]) {
        for v in x.iter_mut() {
            *v = self.ring.neg(*v);
        }
    }
}

impl FieldOps<u32> for Avx2U32 {
    fn ring(&self) -> &Ring<u32> {
        &self.ring
    }

    fn mul_coef_to_buf(&self, a: u32, src: &[u32], dst: &mut [u32]) {
        assert_eq!(src.len(), dst.len());
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = self.ring.mul(a, s);
        }
    }

    fn add_two_bufs(&self, src: &[u32], dst: &mut [u32]) {
        assert_eq!(src.len(), dst.len());
        // SAFETY: gated on the `avx2` feature and x86(_64); `new` documents the runtime
        // `is_x86_feature_detected!` precondition callers must uphold.
        unsafe { self.add_two_bufs_inner(src, dst) }
    }

    fn sub_two_bufs(&self, a: &[u32], b: &[u32], r: &mut [u32]) {
        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), r.len());
        // SAFETY: see `add_two_bufs`.
        unsafe { self.sub_two_bufs_inner(a, b, r) }
    }

    fn hadamard_mul(&self, x: &mut [u32], y: &[u32]) {
        assert_eq!(x.len(), y.len());
        for (xi, &yi) in x.iter_mut().zip(y) {
            *xi = self.ring.mul(*xi, yi);
        }
    }

    fn neg_buf(&self, x: &mut [u32]) {
        // SAFETY: see `add_two_bufs`.
        unsafe { self.neg_buf_inner(x) }
    }

    fn butterfly_ct(&self, c: u32, p: &mut [u32], q: &mut [u32]) {
        assert_eq!(p.len(), q.len());
        for (pi, qi) in p.iter_mut().zip(q.iter_mut()) {
            let a = *pi;
            let b = self.ring.mul(c, *qi);
            *pi = self.ring.add(a, b);
            *qi = self.ring.sub(a, b);
        }
    }

    fn butterfly_gs(&self, c: u32, p: &mut [u32], q: &mut [u32]) {
        assert_eq!(p.len(), q.len());
        for (pi, qi) in p.iter_mut().zip(q.iter_mut()) {
            let a = *pi;
            let b = *qi;
            *pi = self.ring.add(a, b);
            *qi = self.ring.mul(c, self.ring.sub(a, b));
        }
    }
}

// ======================================================================
// Avx2U64 - PUBLIC

/// AVX2-accelerated [`FieldOps<u64>`].
#[derive(Clone, Debug)]
pub struct Avx2U64 {
    ring: SharedRing<u64>,
}

impl Avx2U64 {
    /// Wraps `ring` for AVX2-accelerated buffer operations.
    ///
    /// # Safety requirement on use
    ///
    /// Same runtime-detection precondition as [`Avx2U32::new`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `ring.modulus() >= 2^63`, for the same reason
    /// [`Avx2U32::new`] rejects a `u32` modulus at or above `2^31`.
    pub fn new(ring: SharedRing<u64>) -> Result<Self, Error> {
        let limit = 1u128 << 63;
        if ring.modulus() as u128 >= limit {
            return Err(Error::InvalidArgument {
                expected: limit as usize - 1,
                got: ring.modulus() as usize,
            });
        }
        Ok(Avx2U64 { ring })
    }

    #[target_feature(enable = "avx2")]
    unsafe fn add_two_bufs_inner(&self, src: &[u64], dst: &mut [u64]) {
        let q = self.ring.modulus();
        let qv = _mm256_set1_epi64x(q as i64);
        let chunks = dst.len() / LANES_U64;

        for i in 0..chunks {
            let base = i * LANES_U64;
            let a = _mm256_loadu_si256(dst.as_ptr().add(base) as *const __m256i);
            let b = _mm256_loadu_si256(src.as_ptr().add(base) as *const __m256i);
            let sum = _mm256_add_epi64(a, b);
            let bias = _mm256_set1_epi64x(i64::MIN);
            let sum_biased = _mm256_xor_si256(sum, bias);
            let q_biased = _mm256_xor_si256(qv, bias);
            let one = _mm256_set1_epi64x(1);
            let ge_mask = _mm256_cmpgt_epi64(sum_biased, _mm256_sub_epi64(q_biased, one));
            let reduced = _mm256_sub_epi64(sum, qv);
            let result = _mm256_blendv_epi8(sum, reduced, ge_mask);
            _mm256_storeu_si256(dst.as_mut_ptr().add(base) as *mut __m256i, result);
        }

        for i in (chunks * LANES_U64)..dst.len() {
            dst[i] = self.ring.add(dst[i], src[i]);
        }
    }

    #[target_feature(enable = "avx2")]
    unsafe fn sub_two_bufs_inner(&self, a: &[u64], b: &[u64], r: &mut [u64]) {
        let q = self.ring.modulus();
        let qv = _mm256_set1_epi64x(q as i64);
        let chunks = r.len() / LANES_U64;

        for i in 0..chunks {
            let base = i * LANES_U64;
            let av = _mm256_loadu_si256(a.as_ptr().add(base) as *const __m256i);
            let bv = _mm256_loadu_si256(b.as_ptr().add(base) as *const __m256i);
            let bias = _mm256_set1_epi64x(i64::MIN);
            let a_biased = _mm256_xor_si256(av, bias);
            let b_biased = _mm256_xor_si256(bv, bias);
            let lt_mask = _mm256_cmpgt_epi64(b_biased, a_biased);
            let diff = _mm256_sub_epi64(av, bv);
            let wrapped = _mm256_add_epi64(diff, qv);
            let result = _mm256_blendv_epi8(diff, wrapped, lt_mask);
            _mm256_storeu_si256(r.as_mut_ptr().add(base) as *mut __m256i, result);
        }

        for i in (chunks * LANES_U64)..r.len() {
            r[i] = self.ring.sub(a[i], b[i]);
        }
    }

    #[target_feature(enable = "avx2")]
    unsafe fn neg_buf_inner(&self, x: &mut [u64]) {
        for v in x.iter_mut() {
            *v = self.ring.neg(*v);
        }
    }
}

impl FieldOps<u64> for Avx2U64 {
    fn ring(&self) -> &Ring<u64> {
        &self.ring
    }

    fn mul_coef_to_buf(&self, a: u64, src: &[u64], dst: &mut [u64]) {
        assert_eq!(src.len(), dst.len());
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = self.ring.mul(a, s);
        }
    }

    fn add_two_bufs(&self, src: &[u64], dst: &mut [u64]) {
        assert_eq!(src.len(), dst.len());
        // SAFETY: see `Avx2U32::add_two_bufs`.
        unsafe { self.add_two_bufs_inner(src, dst) }
    }

    fn sub_two_bufs(&self, a: &[u64], b: &[u64], r: &mut [u64]) {
        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), r.len());
        // SAFETY: see `Avx2U32::add_two_bufs`.
        unsafe { self.sub_two_bufs_inner(a, b, r) }
    }

    fn hadamard_mul(&self, x: &mut [u64], y: &[u64]) {
        assert_eq!(x.len(), y.len());
        for (xi, &yi) in x.iter_mut().zip(y) {
            *xi = self.ring.mul(*xi, yi);
        }
    }

    fn neg_buf(&self, x: &mut [u64]) {
        // SAFETY: see `Avx2U32::add_two_bufs`.
        unsafe { self.neg_buf_inner(x) }
    }

    fn butterfly_ct(&self, c: u64, p: &mut [u64], q: &mut [u64]) {
        assert_eq!(p.len(), q.len());
        for (pi, qi) in p.iter_mut().zip(q.iter_mut()) {
            let a = *pi;
            let b = self.ring.mul(c, *qi);
            *pi = self.ring.add(a, b);
            *qi = self.ring.sub(a, b);
        }
    }

    fn butterfly_gs(&self, c: u64, p: &mut [u64], q: &mut [u64]) {
        assert_eq!(p.len(), q.len());
        for (pi, qi) in p.iter_mut().zip(q.iter_mut()) {
            let a = *pi;
            let b = *qi;
            *pi = self.ring.add(a, b);
            *qi = self.ring.mul(c, self.ring.sub(a, b));
        }
    }
}

// ======================================================================
// TESTS

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Naive;
    use crate::AlignedBuffer;

    fn avx2_available() -> bool {
        is_x86_feature_detected!("avx2")
    }

    #[test]
    fn add_two_bufs_matches_naive_when_avx2_is_available() {
        if !avx2_available() {
            return;
        }
        let ring = Ring::<u32>::new(97).unwrap().shared();
        let naive = Naive::new(ring.clone());
        let avx2 = Avx2U32::new(ring).unwrap();

        let src: Vec<u32> = (0..37).map(|i| i % 97).collect();
        let dst: Vec<u32> = (0..37).map(|i| (i * 3) % 97).collect();

        let mut dst_naive = AlignedBuffer::from_slice(&dst);
        let mut dst_avx2 = AlignedBuffer::from_slice(&dst);
        let src_buf = AlignedBuffer::from_slice(&src);

        naive.add_two_bufs(&src_buf, &mut dst_naive);
        avx2.add_two_bufs(&src_buf, &mut dst_avx2);
        assert_eq!(dst_naive, dst_avx2);
    }

    #[test]
    fn sub_two_bufs_matches_naive_when_avx2_is_available() {
        if !avx2_available() {
            return;
        }
        let ring = Ring::<u64>::new(8191).unwrap().shared();
        let naive = Naive::new(ring.clone());
        let avx2 = Avx2U64::new(ring).unwrap();

        let a: Vec<u64> = (0..41).map(|i| i % 8191).collect();
        let b: Vec<u64> = (0..41).map(|i| (i * 7919) % 8191).collect();
        let a_buf = AlignedBuffer::from_slice(&a);
        let b_buf = AlignedBuffer::from_slice(&b);

        let mut r_naive = AlignedBuffer::with_capacity(41);
        let mut r_avx2 = AlignedBuffer::with_capacity(41);
        naive.sub_two_bufs(&a_buf, &b_buf, &mut r_naive);
        avx2.sub_two_bufs(&a_buf, &b_buf, &mut r_avx2);
        assert_eq!(r_naive, r_avx2);
    }

    #[test]
    fn new_rejects_a_modulus_that_could_overflow_the_packed_add() {
        // The smallest primes at or above 2^31 and 2^63, the thresholds Avx2U32/Avx2U64 enforce.
        let ring = Ring::<u32>::new(2_147_483_659).unwrap().shared();
        assert!(Avx2U32::new(ring).is_err());

        let ring = Ring::<u64>::new(9_223_372_036_854_775_837).unwrap().shared();
        assert!(Avx2U64::new(ring).is_err());
    }
}
