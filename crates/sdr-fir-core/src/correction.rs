//! Corner frequency and bandwidth correction.
//!
//! A windowed or equiripple design rarely lands its -3 dB point exactly on
//! the requested corner. [`fir_freq_error`] measures where it actually
//! landed and mirrors the error about the request, so a redesign with the
//! returned parameters lands closer.

use crate::config::{FREQ_ERROR_GRID, MAG_20DB, MAG_3DB, MAG_PASS};
use crate::error::DesignError;
use crate::fft::goertzel;
use crate::types::{BandSpec, PassType};

fn grid_omega(j: usize) -> f64 {
    j as f64 / FREQ_ERROR_GRID as f64
}

/// Last grid point where `keep` holds, scanning `points` until `stop`.
fn scan_edge<I>(coeffs: &[f64], points: I, start: usize, keep: impl Fn(f64) -> bool, stop: impl Fn(f64) -> bool) -> usize
where
    I: Iterator<Item = usize>,
{
    let mut edge = start;
    for j in points {
        let mag = goertzel(coeffs, grid_omega(j));
        if keep(mag) {
            edge = j;
        }
        if stop(mag) {
            break;
        }
    }
    edge
}

/// Measure the realized -3 dB edge(s) of `coeffs` and return corrected
/// design parameters.
///
/// Low-pass and high-pass filters correct `omega_c`, clamped to
/// `0.001..=0.99`. Band-pass and notch filters correct `bw`, clamped to
/// `0.01..=min(2 * bw, 0.98)`. The other field is returned unchanged, and
/// `coeffs` is only read.
///
/// # Errors
/// Returns [`DesignError::UnsupportedPassType`] for all-pass filters,
/// [`DesignError::TooFewTaps`] for an empty coefficient set and
/// [`DesignError::InvalidFrequency`] for an out-of-range band.
pub fn fir_freq_error(coeffs: &[f64], pass_type: PassType, band: BandSpec) -> Result<BandSpec, DesignError> {
    if coeffs.is_empty() {
        return Err(DesignError::TooFewTaps(0));
    }
    let band = BandSpec::new(band.omega_c, band.bw)?;
    let passes = |mag: f64| mag > MAG_3DB;
    let stopped = |mag: f64| mag < MAG_20DB;
    let rejects = |mag: f64| mag <= MAG_3DB;
    let recovered = |mag: f64| mag > MAG_PASS;

    match pass_type {
        PassType::LowPass | PassType::HighPass => {
            let edge = if pass_type == PassType::LowPass {
                scan_edge(coeffs, 0..FREQ_ERROR_GRID, 10, passes, stopped)
            } else {
                let start = FREQ_ERROR_GRID - 10;
                scan_edge(coeffs, (0..FREQ_ERROR_GRID).rev(), start, passes, stopped)
            };
            let measured = grid_omega(edge);
            let omega_c = (2.0 * band.omega_c - measured).clamp(0.001, 0.99);
            trace!("fir_freq_error: measured {} corrected {}", measured, omega_c);
            Ok(BandSpec { omega_c, ..band })
        }
        PassType::BandPass | PassType::Notch => {
            let centre = (FREQ_ERROR_GRID as f64 * band.omega_c) as usize;
            let centre = centre.min(FREQ_ERROR_GRID - 1);
            let (upper, lower) = if pass_type == PassType::BandPass {
                (
                    scan_edge(coeffs, centre..FREQ_ERROR_GRID, centre, passes, stopped),
                    scan_edge(coeffs, (0..=centre).rev(), centre, passes, stopped),
                )
            } else {
                (
                    scan_edge(coeffs, centre..FREQ_ERROR_GRID, centre, rejects, recovered),
                    scan_edge(coeffs, (0..=centre).rev(), centre, rejects, recovered),
                )
            };
            let measured = grid_omega(upper) - grid_omega(lower);
            let bw = (2.0 * band.bw - measured).max(0.01).min(2.0 * band.bw).min(0.98);
            trace!("fir_freq_error: measured bw {} corrected {}", measured, bw);
            Ok(BandSpec { bw, ..band })
        }
        PassType::AllPass => Err(DesignError::UnsupportedPassType),
    }
}
