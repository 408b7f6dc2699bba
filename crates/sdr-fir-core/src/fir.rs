//! Windowed-sinc FIR design and FIR application.
//!
//! Coefficient ordering: `coeffs[0]` multiplies the oldest sample in the
//! delay line and `coeffs[N-1]` the newest. Linear-phase designs are
//! symmetric so the distinction only matters after delay adjustment.

use core::f64::consts::PI;
use core::ops::{Deref, DerefMut};

use fixed::types::I1F15;
use heapless::Vec as HVec;

use crate::config::{MAX_FIR_TAPS, MIN_FIR_TAPS};
use crate::error::{DesignError, WindowError};
use crate::fft::goertzel;
use crate::types::{BandSpec, PassType};
use crate::window::{sinc, Window};
#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Fixed-point tap type (Q1.15), matching the runtime sample format.
pub type Q15Tap = I1F15;

/// FIR coefficient set, at most [`MAX_FIR_TAPS`] long.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FirCoefficients {
    taps: HVec<f64, MAX_FIR_TAPS>,
}

impl FirCoefficients {
    /// Copy coefficients from a slice.
    ///
    /// # Errors
    /// Returns [`DesignError::TooManyTaps`] if `coeffs` is longer than
    /// [`MAX_FIR_TAPS`].
    pub fn from_slice(coeffs: &[f64]) -> Result<Self, DesignError> {
        let taps = HVec::from_slice(coeffs).map_err(|()| DesignError::TooManyTaps(coeffs.len()))?;
        Ok(Self { taps })
    }

    /// Zeroed coefficient set of `num_taps` taps.
    ///
    /// # Errors
    /// Returns [`DesignError::TooManyTaps`] above [`MAX_FIR_TAPS`].
    pub fn zeros(num_taps: usize) -> Result<Self, DesignError> {
        let mut taps = HVec::new();
        taps.resize(num_taps, 0.0)
            .map_err(|()| DesignError::TooManyTaps(num_taps))?;
        Ok(Self { taps })
    }

    /// Coefficients as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.taps
    }

    /// Magnitude response at normalized frequency `omega` (1.0 = Nyquist).
    #[must_use]
    pub fn magnitude_at(&self, omega: f64) -> f64 {
        goertzel(&self.taps, omega)
    }

    /// Magnitude response in dB at normalized frequency `omega`.
    #[must_use]
    pub fn magnitude_db_at(&self, omega: f64) -> f64 {
        20.0 * self.magnitude_at(omega).log10()
    }

    /// Sum of all taps (gain at DC, signed).
    #[must_use]
    pub fn dc_gain(&self) -> f64 {
        self.taps.iter().sum()
    }

    /// Whether `coeffs[i] == coeffs[N-1-i]` within `tolerance` for all `i`.
    #[must_use]
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        self.taps
            .iter()
            .zip(self.taps.iter().rev())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Whether `coeffs[i] == -coeffs[N-1-i]` within `tolerance` for all `i`.
    #[must_use]
    pub fn is_antisymmetric(&self, tolerance: f64) -> bool {
        self.taps
            .iter()
            .zip(self.taps.iter().rev())
            .all(|(a, b)| (a + b).abs() <= tolerance)
    }

    /// Export to Q1.15 fixed point, saturating at the format limits.
    #[must_use]
    pub fn to_q15(&self) -> HVec<Q15Tap, MAX_FIR_TAPS> {
        self.taps.iter().map(|&c| Q15Tap::saturating_from_num(c)).collect()
    }
}

impl Deref for FirCoefficients {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.taps
    }
}

impl DerefMut for FirCoefficients {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.taps
    }
}

impl AsRef<[f64]> for FirCoefficients {
    fn as_ref(&self) -> &[f64] {
        &self.taps
    }
}

fn check_taps(num_taps: usize, max: usize) -> Result<(), DesignError> {
    if num_taps < MIN_FIR_TAPS {
        return Err(DesignError::TooFewTaps(num_taps));
    }
    if num_taps > max {
        return Err(DesignError::TooManyTaps(num_taps));
    }
    Ok(())
}

/// Ideal (unwindowed) FIR impulse response.
///
/// Notch designs are coerced to an odd tap count. High-pass designs with an
/// even tap count use the antisymmetric form
/// `(cos(wc*pi*n) - cos(pi*n)) / (pi*n)`, since spectral inversion needs a
/// centre tap. All-pass yields a (possibly half-sample) delayed impulse.
///
/// The result still needs a window; see [`fir_filter_window`].
///
/// # Errors
/// Returns [`DesignError`] for tap counts outside
/// `MIN_FIR_TAPS..=MAX_FIR_TAPS` or band values outside `0.0..=1.0`.
pub fn rect_win_fir(num_taps: usize, pass_type: PassType, band: BandSpec) -> Result<FirCoefficients, DesignError> {
    check_taps(num_taps, MAX_FIR_TAPS)?;
    let band = BandSpec::new(band.omega_c, band.bw)?;

    let num_taps = if pass_type == PassType::Notch && num_taps % 2 == 0 {
        let odd = if num_taps < MAX_FIR_TAPS { num_taps + 1 } else { num_taps - 1 };
        debug!("rect_win_fir: notch taps {} -> {}", num_taps, odd);
        odd
    } else {
        num_taps
    };

    let wc = band.omega_c;
    let wl = band.lower_edge().max(0.0);
    let wh = band.upper_edge().min(1.0);
    let centre = (num_taps - 1) as f64 / 2.0;
    let even_highpass = pass_type == PassType::HighPass && num_taps % 2 == 0;

    let mut coeffs = FirCoefficients::zeros(num_taps)?;
    for (j, c) in coeffs.iter_mut().enumerate() {
        let n = j as f64 - centre;
        *c = match pass_type {
            PassType::LowPass => wc * sinc(wc * n * PI),
            PassType::HighPass if even_highpass => {
                if n == 0.0 {
                    0.0
                } else {
                    ((wc * n * PI).cos() - (n * PI).cos()) / (PI * n)
                }
            }
            PassType::HighPass => sinc(n * PI) - wc * sinc(wc * n * PI),
            PassType::BandPass => wh * sinc(wh * n * PI) - wl * sinc(wl * n * PI),
            PassType::Notch => sinc(n * PI) - wh * sinc(wh * n * PI) + wl * sinc(wl * n * PI),
            PassType::AllPass => sinc(n * PI),
        };
    }
    Ok(coeffs)
}

/// Apply an FIR-design window (Kaiser, Sinc or Sine) to FIR coefficients.
///
/// Any flat top requested on the window is ignored and no gain scaling is
/// done, so the window peak stays at 1.
///
/// # Errors
/// Returns [`WindowError::UnsupportedForFir`] without touching `coeffs` for
/// the analysis-only families.
pub fn fir_filter_window(coeffs: &mut [f64], window: Window) -> Result<(), WindowError> {
    if !window.is_fir_window() {
        return Err(WindowError::UnsupportedForFir);
    }
    let window = match window {
        Window::Tapered { shape, .. } => Window::tapered(shape),
        other => other,
    };
    window.apply(coeffs, false);
    Ok(())
}

/// Streaming direct-form FIR filter with a circular delay line.
#[derive(Clone, Debug)]
pub struct FirFilter {
    coeffs: FirCoefficients,
    delay_line: HVec<f64, MAX_FIR_TAPS>,
    write_pos: usize,
}

impl FirFilter {
    /// Create a filter with a zeroed delay line.
    #[must_use]
    pub fn new(coeffs: FirCoefficients) -> Self {
        let mut delay_line = HVec::new();
        // Cannot fail: same capacity as the coefficient set
        let _ = delay_line.resize(coeffs.len(), 0.0);
        Self {
            coeffs,
            delay_line,
            write_pos: 0,
        }
    }

    /// Coefficients in use.
    #[must_use]
    pub fn coefficients(&self) -> &FirCoefficients {
        &self.coeffs
    }

    /// Process a single sample.
    pub fn process(&mut self, input: f64) -> f64 {
        let n = self.delay_line.len();
        if n == 0 {
            return 0.0;
        }
        self.delay_line[self.write_pos] = input;
        self.write_pos = (self.write_pos + 1) % n;

        // write_pos now points at the oldest sample
        let mut output = 0.0;
        let mut read_pos = self.write_pos;
        for coeff in self.coeffs.iter() {
            output += self.delay_line[read_pos] * coeff;
            read_pos += 1;
            if read_pos == n {
                read_pos = 0;
            }
        }
        output
    }

    /// Process a block of samples.
    ///
    /// Only `min(input.len(), output.len())` samples are processed.
    pub fn process_block(&mut self, input: &[f64], output: &mut [f64]) {
        for (x, y) in input.iter().zip(output.iter_mut()) {
            *y = self.process(*x);
        }
    }

    /// Clear the delay line.
    pub fn reset(&mut self) {
        self.delay_line.iter_mut().for_each(|v| *v = 0.0);
        self.write_pos = 0;
    }
}

/// Filter `signal` into `output` starting from a zeroed delay line.
///
/// # Errors
/// Returns [`DesignError::TooManyTaps`] if `coeffs` is longer than
/// [`MAX_FIR_TAPS`]. `output` is untouched in that case.
pub fn filter_with_fir(coeffs: &[f64], signal: &[f64], output: &mut [f64]) -> Result<(), DesignError> {
    let coeffs = FirCoefficients::from_slice(coeffs)?;
    FirFilter::new(coeffs).process_block(signal, output);
    Ok(())
}
