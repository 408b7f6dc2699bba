//! Fractional group-delay adjustment.

use alloc::vec;
use core::f64::consts::{PI, TAU};

use crate::config::MAX_FFT_SIZE;
use crate::error::DesignError;
use crate::fft::{fft, required_fft_size};
use crate::types::TransformDirection;
#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Shift an FIR impulse response by `delay` samples (may be fractional or
/// negative).
///
/// The coefficients are zero-padded to an FFT size of at least
/// `len + |delay| + 1`, each positive-frequency bin is rotated by
/// `exp(-j * w * delay)`, the negative bins are rebuilt as conjugates and the
/// result is transformed back and truncated to the original length. The
/// Nyquist bin is scaled by `cos(pi * delay)`, which keeps integer delays
/// exact. Delays up to about `len / 20` leave the magnitude response
/// essentially intact.
///
/// # Errors
/// Returns [`DesignError::InvalidDelay`] if `delay` is not finite or the
/// padded length `len + |delay| + 1` would exceed `MAX_FFT_SIZE`, and
/// [`DesignError::TooFewTaps`] / [`DesignError::TooManyTaps`] for an empty
/// slice or one that no FFT can hold. `coeffs` is untouched on error.
pub fn adjust_delay(coeffs: &mut [f64], delay: f64) -> Result<(), DesignError> {
    let num_taps = coeffs.len();
    if num_taps == 0 {
        return Err(DesignError::TooFewTaps(0));
    }
    if num_taps >= MAX_FFT_SIZE {
        return Err(DesignError::TooManyTaps(num_taps));
    }
    if !delay.is_finite() || delay.abs() >= (MAX_FFT_SIZE - num_taps) as f64 {
        warn!("adjust_delay: rejected delay {} for {} taps", delay, num_taps);
        return Err(DesignError::InvalidDelay);
    }
    if delay == 0.0 {
        return Ok(());
    }

    // |delay| < MAX_FFT_SIZE - num_taps, so this fits
    let n = required_fft_size(num_taps + delay.abs() as usize + 1);

    let mut re = vec![0.0; n];
    let mut im = vec![0.0; n];
    re[..num_taps].copy_from_slice(coeffs);
    fft(&mut re, &mut im, TransformDirection::Forward)?;

    for j in 0..n / 2 {
        let phase = -TAU * j as f64 * delay / n as f64;
        let (s, c) = phase.sin_cos();
        let (r, i) = (re[j], im[j]);
        re[j] = r * c - i * s;
        im[j] = r * s + i * c;
    }
    for j in 1..n / 2 {
        re[n - j] = re[j];
        im[n - j] = -im[j];
    }
    // Nyquist must stay real, so it only gets the real part of its rotation
    re[n / 2] *= (PI * delay).cos();
    im[n / 2] = 0.0;

    fft(&mut re, &mut im, TransformDirection::Inverse)?;
    coeffs.copy_from_slice(&re[..num_taps]);
    debug!("adjust_delay: {} taps shifted by {}", num_taps, delay);
    Ok(())
}
