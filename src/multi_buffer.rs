//! [`MultiBuffer`], a small collection of equal-length [`AlignedBuffer`]s addressable as a
//! matrix — the "n streams of size L" input the butterfly primitives consume.
//!
//! Grounded on `engine::shards::{Shards, ShardsRefMut}` in `malaire-reed-solomon-16`: `Shards` owns a
//! flat byte array sliced into shards, `ShardsRefMut` borrows one. `MultiBuffer` keeps that
//! owning/borrowing split (as [`MultiBuffer::Owned`]/[`MultiBuffer::Borrowed`]) but one level
//! up: each "row" here is a whole [`AlignedBuffer<T>`] of field elements rather than a raw byte
//! slice.

use crate::{AlignedBuffer, Element, Error};

// ======================================================================
// MultiBuffer - PUBLIC

/// An ordered collection of `n` equal-length [`AlignedBuffer<T>`]s, exposed as a matrix.
///
/// Either owns its rows ([`MultiBuffer::Owned`]) or borrows them from the caller
/// ([`MultiBuffer::Borrowed`]); both variants support the same read/write operations.
pub enum MultiBuffer<'a, T: Element> {
    /// Owns every inner buffer.
    Owned(Vec<AlignedBuffer<T>>),
    /// Borrows every inner buffer from the caller.
    Borrowed(Vec<&'a mut AlignedBuffer<T>>),
}

impl<'a, T: Element> MultiBuffer<'a, T> {
    /// Allocates `n` owned buffers, each of length `inner_len`, filled with `value`.
    pub fn new_owned(n: usize, inner_len: usize, value: T) -> Self {
        MultiBuffer::Owned((0..n).map(|_| AlignedBuffer::new(inner_len, value)).collect())
    }

    /// Wraps `n` externally-owned buffers as a non-owning view.
    ///
    /// # Panics
    ///
    /// If the given buffers do not all have the same length.
    pub fn new_borrowed(rows: Vec<&'a mut AlignedBuffer<T>>) -> Self {
        if let Some((first, rest)) = rows.split_first() {
            let inner_len = first.len();
            assert!(
                rest.iter().all(|r| r.len() == inner_len),
                "MultiBuffer rows must all have the same length"
            );
        }
        MultiBuffer::Borrowed(rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            MultiBuffer::Owned(rows) => rows.len(),
            MultiBuffer::Borrowed(rows) => rows.len(),
        }
    }

    /// Returns `true` if this has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length shared by every inner buffer, or `0` if there are no rows.
    pub fn inner_len(&self) -> usize {
        self.get(0).map(AlignedBuffer::len).unwrap_or(0)
    }

    /// Borrows row `i`.
    pub fn get(&self, i: usize) -> Option<&AlignedBuffer<T>> {
        match self {
            MultiBuffer::Owned(rows) => rows.get(i),
            MultiBuffer::Borrowed(rows) => rows.get(i).map(|r| &**r),
        }
    }

    /// Mutably borrows row `i`.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut AlignedBuffer<T>> {
        match self {
            MultiBuffer::Owned(rows) => rows.get_mut(i),
            MultiBuffer::Borrowed(rows) => rows.get_mut(i).map(|r| &mut **r),
        }
    }

    /// Overwrites row `i` from `src`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `src`'s length does not match the row's.
    /// [`Error::OutOfRange`] if `i >= self.len()`.
    pub fn copy(&mut self, i: usize, src: &AlignedBuffer<T>) -> Result<(), Error> {
        let len = self.len();
        let row = self
            .get_mut(i)
            .ok_or(Error::OutOfRange { len, index: i })?;
        row.assign(src)
    }

    /// Overwrites every element of row `i` with `value`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `i >= self.len()`.
    pub fn fill(&mut self, i: usize, value: T) -> Result<(), Error> {
        let len = self.len();
        let row = self
            .get_mut(i)
            .ok_or(Error::OutOfRange { len, index: i })?;
        row.as_mut_slice().fill(value);
        Ok(())
    }

    /// Returns mutable references to two distinct rows `i` and `j`.
    ///
    /// # Panics
    ///
    /// If `i == j`.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut AlignedBuffer<T>, &mut AlignedBuffer<T>) {
        assert_ne!(i, j, "pair_mut requires two distinct rows");
        match self {
            MultiBuffer::Owned(rows) => {
                if i < j {
                    let (head, tail) = rows.split_at_mut(j);
                    (&mut head[i], &mut tail[0])
                } else {
                    let (head, tail) = rows.split_at_mut(i);
                    (&mut tail[0], &mut head[j])
                }
            }
            MultiBuffer::Borrowed(rows) => {
                if i < j {
                    let (head, tail) = rows.split_at_mut(j);
                    (&mut *head[i], &mut *tail[0])
                } else {
                    let (head, tail) = rows.split_at_mut(i);
                    (&mut *tail[0], &mut *head[j])
                }
            }
        }
    }
}

// ======================================================================
// TESTS
