//! FFT / DFT engine.
//!
//! Radix-2 decimation-in-time FFT for power-of-two sizes, plus direct
//! O(N²) reference transforms and single-bin detectors.
//!
//! Conventions used throughout:
//! - Bin 0 holds DC.
//! - Forward transforms are scaled by 1/N, inverse transforms are not.
//! - Frequencies passed to the single-bin routines are normalized to
//!   `0.0..=1.0` where 1.0 is Nyquist.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::{FRAC_1_SQRT_2, PI, TAU};

use crate::config::{GOERTZEL_FLOOR, MAX_FFT_SIZE, MIN_FFT_SIZE};
use crate::error::FftError;
use crate::types::{FftSize, TransformDirection};
use crate::window::Window;
#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Smallest valid FFT size holding `num_points` points, capped at `MAX_FFT_SIZE`.
#[must_use]
pub fn required_fft_size(num_points: usize) -> usize {
    FftSize::required(num_points).get()
}

/// Returns `Some(log2(n))` if `n` is a valid FFT size, `None` otherwise.
#[must_use]
pub fn is_valid_fft_size(n: usize) -> Option<u32> {
    FftSize::new(n).map(FftSize::log2)
}

fn check_lengths(re: &[f64], im: &[f64]) -> Result<(), FftError> {
    if re.len() != im.len() {
        return Err(FftError::LengthMismatch {
            expected: re.len(),
            actual: im.len(),
        });
    }
    Ok(())
}

/// In-place fast Fourier transform.
///
/// `re` and `im` hold the real and imaginary parts and must have the same
/// power-of-two length in `MIN_FFT_SIZE..=MAX_FFT_SIZE`. The result is
/// written back into the same arrays.
///
/// # Errors
/// Returns [`FftError`] without touching either buffer if the size is
/// invalid or the lengths differ.
pub fn fft(re: &mut [f64], im: &mut [f64], direction: TransformDirection) -> Result<(), FftError> {
    check_lengths(re, im)?;
    let n = re.len();
    let Some(size) = FftSize::new(n) else {
        warn!("fft: rejected size {}", n);
        return Err(FftError::InvalidSize(n));
    };

    let rev_bits = bit_reversal_table(n);
    let (tw_r, tw_i) = twiddle_table(n, direction);

    let mut buf_r: Vec<f64> = rev_bits.iter().map(|&k| re[k]).collect();
    let mut buf_i: Vec<f64> = rev_bits.iter().map(|&k| im[k]).collect();

    // Each stage reads `cur` and writes `next`, then the two swap roles.
    {
        let mut cur: (&mut [f64], &mut [f64]) = (&mut buf_r[..], &mut buf_i[..]);
        let mut next: (&mut [f64], &mut [f64]) = (&mut *re, &mut *im);
        let mut half = n / 2;
        let mut span = 1;
        while half > 0 {
            butterfly_stage(&*cur.0, &*cur.1, &mut *next.0, &mut *next.1, &tw_r, &tw_i, half, span);
            core::mem::swap(&mut cur, &mut next);
            span *= 2;
            half /= 2;
        }
    }

    let scale = match direction {
        TransformDirection::Forward => 1.0 / n as f64,
        TransformDirection::Inverse => 1.0,
    };

    // An odd stage count leaves the result in the caller's arrays, an even
    // count leaves it in the scratch buffers.
    if size.log2() % 2 == 1 {
        re.iter_mut().for_each(|v| *v *= scale);
        im.iter_mut().for_each(|v| *v *= scale);
    } else {
        for (dst, src) in re.iter_mut().zip(&buf_r) {
            *dst = src * scale;
        }
        for (dst, src) in im.iter_mut().zip(&buf_i) {
            *dst = src * scale;
        }
    }
    Ok(())
}

/// Bit-reversed index table, e.g. N=8 gives `0,4,2,6,1,5,3,7`.
fn bit_reversal_table(n: usize) -> Vec<usize> {
    let mut rev = vec![0usize; n];
    let mut step = n / 2;
    let mut filled = 1;
    while step >= 1 {
        for k in 0..filled {
            rev[k + filled] = rev[k] + step;
        }
        filled *= 2;
        step /= 2;
    }
    rev
}

/// N/2 twiddle factors built from one octant using cos/sin symmetry.
///
/// Requires `n >= 8`.
fn twiddle_table(n: usize, direction: TransformDirection) -> (Vec<f64>, Vec<f64>) {
    let mut tw_r = vec![0.0; n / 2];
    let mut tw_i = vec![0.0; n / 2];
    // Imaginary parts carry the transform sign.
    let sigma = direction.sign();
    let step = TAU / n as f64;

    tw_r[0] = 1.0;
    tw_i[0] = 0.0;
    tw_r[n / 4] = 0.0;
    tw_i[n / 4] = sigma;
    tw_r[n / 8] = FRAC_1_SQRT_2;
    tw_i[n / 8] = sigma * FRAC_1_SQRT_2;
    tw_r[3 * n / 8] = -FRAC_1_SQRT_2;
    tw_i[3 * n / 8] = sigma * FRAC_1_SQRT_2;

    for j in 1..n / 8 {
        let theta = j as f64 * step;
        let (c, si) = (theta.cos(), sigma * theta.sin());
        tw_r[j] = c;
        tw_i[j] = si;
        tw_r[n / 4 - j] = sigma * si;
        tw_i[n / 4 - j] = sigma * c;
        tw_r[n / 4 + j] = -sigma * si;
        tw_i[n / 4 + j] = sigma * c;
        tw_r[n / 2 - j] = -c;
        tw_i[n / 2 - j] = si;
    }
    (tw_r, tw_i)
}

#[allow(clippy::too_many_arguments)]
fn butterfly_stage(
    src_r: &[f64],
    src_i: &[f64],
    dst_r: &mut [f64],
    dst_i: &mut [f64],
    tw_r: &[f64],
    tw_i: &[f64],
    half: usize,
    span: usize,
) {
    let mut i = 0;
    for _ in 0..half {
        let mut t = 0;
        for _ in 0..span {
            let (xr, xi) = (src_r[i + span], src_i[i + span]);
            let temp_r = xr * tw_r[t] - xi * tw_i[t];
            let temp_i = xr * tw_i[t] + xi * tw_r[t];
            dst_r[i] = src_r[i] + temp_r;
            dst_i[i] = src_i[i] + temp_i;
            dst_r[i + span] = src_r[i] - temp_r;
            dst_i[i + span] = src_i[i] - temp_i;
            i += 1;
            t += half;
        }
        i += span;
    }
}

/// Textbook O(N²) DFT with the same conventions as [`fft`].
///
/// Works for any non-zero length; intended for cross-checking the fast path.
///
/// # Errors
/// Returns [`FftError`] without touching either buffer if the lengths differ
/// or are zero.
pub fn dft(re: &mut [f64], im: &mut [f64], direction: TransformDirection) -> Result<(), FftError> {
    check_lengths(re, im)?;
    let n = re.len();
    if n == 0 {
        return Err(FftError::InvalidSize(0));
    }

    let sign = direction.sign();
    let (tw_r, tw_i): (Vec<f64>, Vec<f64>) = (0..n)
        .map(|j| {
            let arg = TAU * j as f64 / n as f64;
            (arg.cos(), sign * arg.sin())
        })
        .unzip();

    let mut sum_r = vec![0.0; n];
    let mut sum_i = vec![0.0; n];
    for j in 0..n {
        // (j * k) mod n, accumulated to stay clear of overflow on 32-bit targets
        let mut idx = 0;
        for k in 0..n {
            sum_r[j] += tw_r[idx] * re[k] - tw_i[idx] * im[k];
            sum_i[j] += tw_r[idx] * im[k] + tw_i[idx] * re[k];
            idx += j;
            if idx >= n {
                idx -= n;
            }
        }
    }

    let scale = match direction {
        TransformDirection::Forward => 1.0 / n as f64,
        TransformDirection::Inverse => 1.0,
    };
    for j in 0..n {
        re[j] = sum_r[j] * scale;
        im[j] = sum_i[j] * scale;
    }
    Ok(())
}

/// Forward DFT of a real signal.
///
/// Only the non-negative frequencies are computed; the negative bins are
/// filled with their complex conjugates. Output is scaled by 1/N.
///
/// # Errors
/// Returns [`FftError`] if the output buffers do not match the input length.
pub fn real_signal_dft(samples: &[f64], out_re: &mut [f64], out_im: &mut [f64]) -> Result<(), FftError> {
    let n = samples.len();
    if n == 0 {
        return Err(FftError::InvalidSize(0));
    }
    for out in [out_re.len(), out_im.len()] {
        if out != n {
            return Err(FftError::LengthMismatch {
                expected: n,
                actual: out,
            });
        }
    }

    let (tw_r, tw_i): (Vec<f64>, Vec<f64>) = (0..n)
        .map(|j| {
            let arg = TAU * j as f64 / n as f64;
            (arg.cos(), -arg.sin())
        })
        .unzip();

    for j in 0..=n / 2 {
        let (mut acc_r, mut acc_i) = (0.0, 0.0);
        let mut idx = 0;
        for &x in samples {
            acc_r += x * tw_r[idx];
            acc_i += x * tw_i[idx];
            idx += j;
            if idx >= n {
                idx -= n;
            }
        }
        out_re[j] = acc_r / n as f64;
        out_im[j] = acc_i / n as f64;
    }
    for j in 1..n.div_ceil(2) {
        out_re[n - j] = out_re[j];
        out_im[n - j] = -out_im[j];
    }
    Ok(())
}

/// Magnitude of the DTFT of `samples` at a single normalized frequency.
///
/// With `samples` set to FIR coefficients this is the filter's magnitude
/// response at `omega` (1.0 = Nyquist).
#[must_use]
pub fn single_frequency_dft(samples: &[f64], omega: f64) -> f64 {
    let (tw_r, tw_i) = ((omega * PI).cos(), -(omega * PI).sin());
    let (mut z_r, mut z_i) = (1.0, 0.0);
    let (mut sum_r, mut sum_i) = (0.0, 0.0);

    for &x in samples {
        sum_r += x * z_r;
        sum_i += x * z_i;
        // z <- z * e^(-j omega pi)
        let next_r = z_r * tw_r - z_i * tw_i;
        z_i = z_r * tw_i + z_i * tw_r;
        z_r = next_r;
    }
    (sum_r * sum_r + sum_i * sum_i).sqrt()
}

/// Goertzel single-bin magnitude detector at normalized frequency `omega`.
///
/// Same result as [`single_frequency_dft`] without phase, at roughly a third
/// of the cost. Never returns less than `GOERTZEL_FLOOR`.
#[must_use]
pub fn goertzel(samples: &[f64], omega: f64) -> f64 {
    let coeff = 2.0 * (PI * omega).cos();
    let (mut s1, mut s2) = (0.0, 0.0);
    for &x in samples {
        let s0 = x + coeff * s1 - s2;
        s2 = s1;
        s1 = s0;
    }
    let power = s2 * s2 + s1 * s1 - coeff * s1 * s2;
    if power > 0.0 {
        power.sqrt().max(GOERTZEL_FLOOR)
    } else {
        GOERTZEL_FLOOR
    }
}

/// Single-shot magnitude spectrum in dB.
///
/// The samples are zero-padded to the next valid FFT size, windowed with a
/// unity-gain `window` and transformed. Returns the `N/2 + 1` non-negative
/// bins, floored at -200 dB.
///
/// # Errors
/// Returns [`FftError::InvalidSize`] if `samples` is empty or longer than
/// `MAX_FFT_SIZE`.
pub fn magnitude_spectrum_db(samples: &[f64], window: Window) -> Result<Vec<f64>, FftError> {
    if samples.is_empty() || samples.len() > MAX_FFT_SIZE {
        return Err(FftError::InvalidSize(samples.len()));
    }
    let n = required_fft_size(samples.len().max(MIN_FFT_SIZE));
    let mut re = vec![0.0; n];
    let mut im = vec![0.0; n];
    re[..samples.len()].copy_from_slice(samples);
    if samples.len() >= 2 {
        window.apply(&mut re[..samples.len()], true);
    }
    fft(&mut re, &mut im, TransformDirection::Forward)?;

    Ok(re
        .iter()
        .zip(&im)
        .take(n / 2 + 1)
        .map(|(r, i)| {
            let mag = (r * r + i * i).sqrt();
            if mag > 1e-10 {
                20.0 * mag.log10()
            } else {
                -200.0
            }
        })
        .collect())
}
