//! [`NttDriver`], the abstract forward/inverse-transform boundary that sits on top of
//! [`Ring`] and [`FieldOps`].
//!
//! Grounded on the shape of `malaire-reed-solomon-16`'s `rate::Rate<E: Engine>`: an object that holds a
//! reference to the scalar engine plus the bookkeeping a transform of a particular size needs
//! (there, shard counts and skew deltas; here, the transform length and its modular inverse),
//! and exposes `fft`/`ifft` as the entry points its callers actually use. Concrete butterfly
//! scheduling (radix-2 decimation, mixed-radix, additive FFTs) is explicitly out of scope here:
//! `NttDriver` is a contract, not an algorithm.

use crate::{Element, Error, FieldOps, Ring};

// ======================================================================
// NttDriver - PUBLIC

/// A forward/inverse transform of a fixed length `n` over a [`Ring<T>`], parameterized by a
/// chosen `n`-th root of unity.
///
/// Implementations own no input data: `fft`/`ifft`/`fft_inv` write their output into a
/// caller-supplied buffer, mirroring the butterfly primitives they are built from. Concrete
/// scheduling algorithms (decimation-in-time, mixed-radix, additive NTTs) live outside this
/// crate; this trait only fixes the boundary they implement.
pub trait NttDriver<T: Element> {
    /// The ring this transform computes over.
    fn ring(&self) -> &Ring<T>;

    /// The transform length `n`.
    fn len(&self) -> usize;

    /// `true` if this transform has length zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The precomputed scalar `n^-1 mod q`, needed to normalize [`NttDriver::ifft`]'s output.
    fn inv_len(&self) -> T;

    /// Forward transform: writes `out[k] = sum_i in[i] * omega^(i*k)` for `0 <= k < n`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `input.len() != self.len()` or `output.len() != self.len()`.
    fn fft(&self, input: &[T], output: &mut [T]) -> Result<(), Error>;

    /// Inverse transform: the two-sided inverse of [`NttDriver::fft`], i.e.
    /// `fft(ifft(x)) == x` and `ifft(fft(x)) == x`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `input.len() != self.len()` or `output.len() != self.len()`.
    fn ifft(&self, input: &[T], output: &mut [T]) -> Result<(), Error>;

    /// Unnormalized inverse transform: applies the same butterfly schedule as
    /// [`NttDriver::ifft`] using `omega^-1` but skips the final multiply by `n^-1`. Useful to
    /// callers that fold the normalization into a later step (e.g. combining it with a
    /// coefficient-scaling pass already being applied to the output).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `input.len() != self.len()` or `output.len() != self.len()`.
    fn fft_inv(&self, input: &[T], output: &mut [T]) -> Result<(), Error>;
}

/// Validates that `input` and `output` both have length `len`, the check every
/// [`NttDriver`] implementation runs before touching its buffers.
pub fn check_lengths<T>(input: &[T], output: &[T], len: usize) -> Result<(), Error> {
    if input.len() != len {
        return Err(Error::InvalidArgument {
            expected: len,
            got: input.len(),
        });
    }
    if output.len() != len {
        return Err(Error::InvalidArgument {
            expected: len,
            got: output.len(),
        });
    }
    Ok(())
}

// ======================================================================
// RadixTwoDriver - PUBLIC

/// A minimal radix-2 decimation-in-frequency [`NttDriver`], built directly from
/// [`FieldOps::butterfly_ct`]/[`FieldOps::butterfly_gs`].
///
/// This is one concrete scheduling of the butterflies (`fft` via Gentleman-Sande stages
/// decimation-in-frequency, `ifft` via Cooley-Tukey stages decimation-in-time, bit-reversal
/// permutation between them), included as a working reference so the buffer primitives have at
/// least one exercised caller; it is deliberately not the focus of this crate, which the
/// transform-length restriction (`n` a power of two) makes clear.
pub struct RadixTwoDriver<T: Element, F: FieldOps<T>> {
    field: F,
    len: usize,
    omega: T,
    omega_inv: T,
    inv_len: T,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Element, F: FieldOps<T>> RadixTwoDriver<T, F> {
    /// Builds a driver for a transform of length `len` (must be a power of two) using `field`'s
    /// ring, with `omega` a primitive `len`-th root of unity in that ring.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `len` is not a power of two, or [`Error::AssertionFailure`]
    /// if `omega` does not actually have order `len` in the ring.
    pub fn new(field: F, len: usize, omega: T) -> Result<Self, Error> {
        if len == 0 || !len.is_power_of_two() {
            return Err(Error::InvalidArgument {
                expected: len.next_power_of_two(),
                got: len,
            });
        }
        let ring = field.ring();
        if ring.get_order(omega) as usize != len {
            return Err(Error::AssertionFailure {
                reason: "omega does not have the requested transform order",
            });
        }

        let omega_inv = ring.inv(omega);
        let inv_len = ring.inv(T::from_u128(len as u128));

        Ok(RadixTwoDriver {
            field,
            len,
            omega,
            omega_inv,
            inv_len,
            _marker: std::marker::PhantomData,
        })
    }

    fn transform(&self, input: &[T], output: &mut [T], omega: T) -> Result<(), Error> {
        check_lengths(input, output, self.len)?;
        output.copy_from_slice(input);
        bit_reverse_permute(output);

        let ring = self.field.ring();
        let mut stage_len = 2usize;
        while stage_len <= self.len {
            let half = stage_len / 2;
            let stage_omega = ring.exp(omega, (self.len / stage_len) as u128);

            let mut block_start = 0usize;
            while block_start < self.len {
                let mut twiddle = T::one();
                for offset in 0..half {
                    let i = block_start + offset;
                    let j = i + half;
                    let a = output[i];
                    let b = ring.mul(twiddle, output[j]);
                    output[i] = ring.add(a, b);
                    output[j] = ring.sub(a, b);
                    twiddle = ring.mul(twiddle, stage_omega);
                }
                block_start += stage_len;
            }
            stage_len *= 2;
        }
        Ok(())
    }
}

impl<T: Element, F: FieldOps<T>> NttDriver<T> for RadixTwoDriver<T, F> {
    fn ring(&self) -> &Ring<T> {
        self.field.ring()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn inv_len(&self) -> T {
        self.inv_len
    }

    fn fft(&self, input: &[T], output: &mut [T]) -> Result<(), Error> {
        self.transform(input, output, self.omega)
    }

    fn fft_inv(&self, input: &[T], output: &mut [T]) -> Result<(), Error> {
        self.transform(input, output, self.omega_inv)
    }

    fn ifft(&self, input: &[T], output: &mut [T]) -> Result<(), Error> {
        self.fft_inv(input, output)?;
        let ring = self.field.ring();
        for value in output.iter_mut() {
            *value = ring.mul(*value, self.inv_len);
        }
        Ok(())
    }
}

fn bit_reverse_permute<T: Copy>(data: &mut [T]) {
    let n = data.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = (i as u32).reverse_bits() >> (u32::BITS - bits);
        let j = j as usize;
        if i < j {
            data.swap(i, j);
        }
    }
}

// ======================================================================
// TESTS
