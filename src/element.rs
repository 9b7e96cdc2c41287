//! The [`Element`] bound shared by [`Ring`](crate::Ring), [`AlignedBuffer`](crate::AlignedBuffer)
//! and [`FieldOps`](crate::FieldOps).
//!
//! This crate supports three element widths (32/64/128-bit unsigned integers); `Element`
//! collects exactly the capabilities those three call sites need, generalizing the
//! `GfElement = u16` type alias `malaire-reed-solomon-16` hardcodes to one fixed width.

use bytemuck::Pod;

use crate::wide::Wide;

/// A finite-field element's machine representation.
///
/// Implemented for `u32`, `u64` and `u128`. Not meant to be implemented outside this crate.
pub trait Element: Wide + Pod + Ord + Default + std::fmt::Debug {
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Widens `self` to a `u128`, the common currency for factorization and caching.
    fn to_u128(self) -> u128;

    /// Narrows `x` to `Self`.
    ///
    /// # Panics
    ///
    /// If `x` does not fit in `Self`.
    fn from_u128(x: u128) -> Self;
}

macro_rules! impl_element {
    ($t:ty) => {
        impl Element for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn to_u128(self) -> u128 {
                self as u128
            }

            #[inline]
            fn from_u128(x: u128) -> Self {
                <$t>::try_from(x).expect("value does not fit in element type")
            }
        }
    };
}

impl_element!(u32);
impl_element!(u64);
impl_element!(u128);
