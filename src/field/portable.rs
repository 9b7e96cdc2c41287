//! A `FieldOps` implementation written so the compiler's auto-vectorizer has an easier time of
//! it than with [`Naive`](crate::field::Naive): chunked iteration and no early-return branches
//! inside the per-element body, but no architecture-specific intrinsics.
//!
//! Grounded on `malaire-reed-solomon-16`'s `engine::engine_nosimd::NoSimd`: portable Rust, tuned for the
//! compiler's own vectorizer rather than hand-written SIMD, sitting between the reference
//! implementation and the explicit intrinsics in [`avx2`](crate::field::avx2).

use crate::field::{FieldOps, SharedRing};
use crate::{Element, Ring};

/// Elements processed per auto-vectorization-friendly chunk.
const CHUNK: usize = 8;

// ======================================================================
// Portable - PUBLIC

/// Chunked, intrinsic-free [`FieldOps`] implementation.
///
/// Produces bit-identical results to [`Naive`](crate::field::Naive); the only difference is
/// loop shape, chosen to give LLVM's auto-vectorizer contiguous, branch-free inner loops.
#[derive(Clone, Debug)]
pub struct Portable<T: Element> {
    ring: SharedRing<T>,
}

impl<T: Element> Portable<T> {
    /// Wraps `ring` for buffer-level operations.
    pub fn new(ring: SharedRing<T>) -> Self {
        Portable { ring }
    }
}

impl<T: Element> FieldOps<T> for Portable<T> {
    fn ring(&self) -> &Ring<T> {
        &self.ring
    }

    fn mul_coef_to_buf(&self, a: T, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), dst.len());
        for (dst_chunk, src_chunk) in dst.chunks_mut(CHUNK).zip(src.chunks(CHUNK)) {
            for (d, &s) in dst_chunk.iter_mut().zip(src_chunk) {
                *d = self.ring.mul(a, s);
            }
        }
    }

    fn add_two_bufs(&self, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), dst.len());
        for (dst_chunk, src_chunk) in dst.chunks_mut(CHUNK).zip(src.chunks(CHUNK)) {
            for (d, &s) in dst_chunk.iter_mut().zip(src_chunk) {
                *d = self.ring.add(*d, s);
            }
        }
    }

    fn sub_two_bufs(&self, a: &[T], b: &[T], r: &mut [T]) {
        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), r.len());
        for ((r_chunk, a_chunk), b_chunk) in r.chunks_mut(CHUNK).zip(a.chunks(CHUNK)).zip(b.chunks(CHUNK)) {
            for ((ri, &ai), &bi) in r_chunk.iter_mut().zip(a_chunk).zip(b_chunk) {
                *ri = self.ring.sub(ai, bi);
            }
        }
    }

    fn hadamard_mul(&self, x: &mut [T], y: &[T]) {
        assert_eq!(x.len(), y.len());
        for (x_chunk, y_chunk) in x.chunks_mut(CHUNK).zip(y.chunks(CHUNK)) {
            for (xi, &yi) in x_chunk.iter_mut().zip(y_chunk) {
                *xi = self.ring.mul(*xi, yi);
            }
        }
    }

    fn neg_buf(&self, x: &mut [T]) {
        for chunk in x.chunks_mut(CHUNK) {
            for xi in chunk.iter_mut() {
                *xi = self.ring.neg(*xi);
            }
        }
    }

    fn butterfly_ct(&self, c: T, p: &mut [T], q: &mut [T]) {
        assert_eq!(p.len(), q.len());
        for (p_chunk, q_chunk) in p.chunks_mut(CHUNK).zip(q.chunks_mut(CHUNK)) {
            for (pi, qi) in p_chunk.iter_mut().zip(q_chunk.iter_mut()) {
                let a = *pi;
                let b = self.ring.mul(c, *qi);
                *pi = self.ring.add(a, b);
                *qi = self.ring.sub(a, b);
            }
        }
    }

    fn butterfly_gs(&self, c: T, p: &mut [T], q: &mut [T]) {
        assert_eq!(p.len(), q.len());
        for (p_chunk, q_chunk) in p.chunks_mut(CHUNK).zip(q.chunks_mut(CHUNK)) {
            for (pi, qi) in p_chunk.iter_mut().zip(q_chunk.iter_mut()) {
                let a = *pi;
                let b = *qi;
                *pi = self.ring.add(a, b);
                *qi = self.ring.mul(c, self.ring.sub(a, b));
            }
        }
    }
}

// ======================================================================
// TESTS
