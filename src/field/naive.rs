//! The reference [`FieldOps`] implementation: one ring call per element, no vectorization.
//!
//! Grounded on `malaire-reed-solomon-16`'s `engine::engine_naive::Naive`, itself a direct
//! transcription of the scalar contracts with no attempt at throughput — used as the
//! correctness oracle the other implementations are tested against.

use crate::field::{FieldOps, SharedRing};
use crate::{Element, Ring};

// ======================================================================
// Naive - PUBLIC

/// Scalar, unoptimized [`FieldOps`]: every buffer operation is a per-element loop over the
/// matching [`Ring`] scalar method.
#[derive(Clone, Debug)]
pub struct Naive<T: Element> {
    ring: SharedRing<T>,
}

impl<T: Element> Naive<T> {
    /// Wraps `ring` for buffer-level operations.
    pub fn new(ring: SharedRing<T>) -> Self {
        Naive { ring }
    }
}

impl<T: Element> FieldOps<T> for Naive<T> {
    fn ring(&self) -> &Ring<T> {
        &self.ring
    }

    fn mul_coef_to_buf(&self, a: T, src: &[T], dst: &mut [T]) {
        debug_assert_eq!(src.len(), dst.len());
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = self.ring.mul(a, s);
        }
    }

    fn add_two_bufs(&self, src: &[T], dst: &mut [T]) {
        debug_assert_eq!(src.len(), dst.len());
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = self.ring.add(*d, s);
        }
    }

    fn sub_two_bufs(&self, a: &[T], b: &[T], r: &mut [T]) {
        debug_assert_eq!(a.len(), b.len());
        debug_assert_eq!(a.len(), r.len());
        for ((ri, &ai), &bi) in r.iter_mut().zip(a).zip(b) {
            *ri = self.ring.sub(ai, bi);
        }
    }

    fn hadamard_mul(&self, x: &mut [T], y: &[T]) {
        debug_assert_eq!(x.len(), y.len());
        for (xi, &yi) in x.iter_mut().zip(y) {
            *xi = self.ring.mul(*xi, yi);
        }
    }

    fn neg_buf(&self, x: &mut [T]) {
        for xi in x.iter_mut() {
            *xi = self.ring.neg(*xi);
        }
    }

    fn butterfly_ct(&self, c: T, p: &mut [T], q: &mut [T]) {
        debug_assert_eq!(p.len(), q.len());
        for (pi, qi) in p.iter_mut().zip(q.iter_mut()) {
            let a = *pi;
            let b = self.ring.mul(c, *qi);
            *pi = self.ring.add(a, b);
            *qi = self.ring.sub(a, b);
        }
    }

    fn butterfly_gs(&self, c: T, p: &mut [T], q: &mut [T]) {
        debug_assert_eq!(p.len(), q.len());
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
