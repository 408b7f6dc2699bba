//! Window functions for FIR design and spectral analysis.
//!
//! Every shape is computed for the first half of the window and folded over
//! onto the second half, so all windows are exactly symmetric.
//!
//! # Families
//!
//! | Window | Parameters | Typical use |
//! |--------|------------|-------------|
//! | Kaiser | `beta` (0..10) | FIR design |
//! | Sinc (Lanczos), Sine | `beta` exponent, flat top | FIR design |
//! | Hanning, Hamming, Blackman variants, Nuttall, Kaiser-Bessel | flat top | analysis |
//! | Gauss, Trapezoid | flat top | analysis |
//! | Flattop | none | amplitude-accurate analysis |
//!
//! A flat top of fraction `alpha` forces the central `alpha * N` points to
//! 1.0. A Hanning with a flat top is a Tukey window; a Trapezoid without one
//! is a Bartlett (triangular) window.
//!
//! The Flattop peaks near 4.6 and is not suitable for FIR design. Unity gain
//! scaling is for spectral analysis only; FIR design needs a peak of 1.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::{PI, TAU};

use crate::config::SINC_EPSILON;
#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Shapes that accept a flat-top widening.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Taper {
    /// Lanczos window raised to the power `beta`
    Sinc {
        /// Exponent, clamped to `0.0..=10.0`
        beta: f64,
    },
    /// Sine window raised to the power `beta` (Hanning when `beta = 2`)
    Sine {
        /// Exponent, clamped to `0.0..=10.0`
        beta: f64,
    },
    /// Raised cosine
    Hanning,
    /// Hamming
    Hamming,
    /// Classic three-term Blackman
    Blackman,
    /// Four-term Blackman-Harris
    BlackmanHarris,
    /// Four-term Blackman-Nuttall
    BlackmanNuttall,
    /// Four-term Nuttall
    Nuttall,
    /// Kaiser-Bessel cosine approximation
    KaiserBessel,
    /// Trapezoid (triangle with no flat top)
    Trapezoid,
    /// Generalized Gaussian with p = 2
    Gauss,
}

/// Window selection with family-specific parameters.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Window {
    /// No windowing (data left untouched)
    #[default]
    Rectangular,
    /// Kaiser window
    Kaiser {
        /// Sidelobe/transition trade-off, clamped to `0.0..=10.0`
        beta: f64,
    },
    /// Five-term flat-top window
    Flattop,
    /// Any other shape, with an optional flat top
    Tapered {
        /// Base shape
        shape: Taper,
        /// Fraction of the window forced to 1.0, clamped to `0.0..=1.0`
        flat_top: f64,
    },
}

impl Window {
    /// Hanning window without flat top.
    pub const HANNING: Self = Self::tapered(Taper::Hanning);
    /// Hamming window without flat top.
    pub const HAMMING: Self = Self::tapered(Taper::Hamming);
    /// Blackman window without flat top.
    pub const BLACKMAN: Self = Self::tapered(Taper::Blackman);
    /// Blackman-Harris window without flat top.
    pub const BLACKMAN_HARRIS: Self = Self::tapered(Taper::BlackmanHarris);
    /// Gauss window without flat top.
    pub const GAUSS: Self = Self::tapered(Taper::Gauss);

    /// Shape with no flat top.
    #[must_use]
    pub const fn tapered(shape: Taper) -> Self {
        Self::Tapered {
            shape,
            flat_top: 0.0,
        }
    }

    /// Tukey window (Hanning with a flat top of fraction `alpha`).
    #[must_use]
    pub const fn tukey(alpha: f64) -> Self {
        Self::Tapered {
            shape: Taper::Hanning,
            flat_top: alpha,
        }
    }

    /// Bartlett (triangular) window.
    #[must_use]
    pub const fn bartlett() -> Self {
        Self::tapered(Taper::Trapezoid)
    }

    /// Whether this window is meant for FIR coefficient shaping.
    ///
    /// Only the Kaiser, Sinc and Sine families are; all three are controlled
    /// by `beta`.
    #[must_use]
    pub const fn is_fir_window(&self) -> bool {
        matches!(
            self,
            Self::Rectangular
                | Self::Kaiser { .. }
                | Self::Tapered {
                    shape: Taper::Sinc { .. } | Taper::Sine { .. },
                    ..
                }
        )
    }

    /// Window coefficients for `n` points.
    ///
    /// `Rectangular` yields all ones.
    #[must_use]
    pub fn coefficients(&self, n: usize, unity_gain: bool) -> Vec<f64> {
        let mut w = vec![1.0; n];
        self.apply(&mut w, unity_gain);
        w
    }

    /// Multiply `data` by this window in place.
    ///
    /// With `unity_gain` the window is scaled so its mean is 1, which
    /// preserves signal energy for spectral analysis. Never use it for FIR
    /// design.
    pub fn apply(&self, data: &mut [f64], unity_gain: bool) {
        let n = data.len();
        if n == 0 {
            return;
        }

        let mut win = match *self {
            Self::Rectangular => return,
            Self::Kaiser { beta } => kaiser(n, beta.clamp(0.0, 10.0)),
            Self::Flattop => flattop(n),
            Self::Tapered { shape, flat_top } => tapered(n, shape, flat_top.clamp(0.0, 1.0)),
        };

        if unity_gain {
            let mean = win.iter().sum::<f64>() / n as f64;
            if mean != 0.0 {
                win.iter_mut().for_each(|w| *w /= mean);
            }
        }

        for (d, w) in data.iter_mut().zip(&win) {
            *d *= w;
        }
    }
}

/// Apply `window` to `data` in place.
///
/// Free-function form of [`Window::apply`].
pub fn window_data(data: &mut [f64], window: Window, unity_gain: bool) {
    window.apply(data, unity_gain);
}

/// Copy the first half onto the second half.
fn fold(win: &mut [f64], m: usize) {
    let n = win.len();
    for j in 0..m / 2 {
        win[n - j - 1] = win[j];
    }
}

fn kaiser(n: usize, beta: f64) -> Vec<f64> {
    let dm = (n + 1) as f64;
    let denom = bessel(beta);
    let mut win: Vec<f64> = (0..n)
        .map(|j| {
            let x = ((2 * j + 2) as f64 - dm) / dm;
            bessel(beta * (1.0 - x * x).sqrt()) / denom
        })
        .collect();
    fold(&mut win, n);
    win
}

fn flattop(n: usize) -> Vec<f64> {
    let dm = (n + 1) as f64;
    let mut win = vec![0.0; n];
    for j in 0..=(n / 2).min(n - 1) {
        let x = (j + 1) as f64 * TAU / dm;
        win[j] = 1.0 - 1.932_934_889_692_27 * x.cos() + 1.283_497_696_740_27 * (2.0 * x).cos()
            - 0.381_308_016_816_19 * (3.0 * x).cos()
            + 0.029_297_302_585_11 * (4.0 * x).cos();
    }
    fold(&mut win, n);
    win
}

fn cosine_sum(a: &[f64], x: f64) -> f64 {
    a.iter()
        .enumerate()
        .map(|(k, ak)| {
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            sign * ak * (k as f64 * x).cos()
        })
        .sum()
}

fn tapered(n: usize, shape: Taper, alpha: f64) -> Vec<f64> {
    let mut top_width = (alpha * n as f64) as usize;
    if top_width % 2 != 0 {
        top_width += 1;
    }
    let top_width = top_width.min(n);
    let m = n - top_width;
    let dm = (m + 1) as f64;
    let half = m / 2;

    let mut win = vec![0.0; n];
    let phase = |j: usize| (j + 1) as f64 * TAU / dm;

    match shape {
        Taper::Sinc { beta } => {
            let beta = beta.clamp(0.0, 10.0);
            for (j, w) in win.iter_mut().enumerate().take(m) {
                *w = sinc(((2 * j + 1) as f64 - m as f64) / dm * PI).powf(beta);
            }
        }
        Taper::Sine { beta } => {
            let beta = beta.clamp(0.0, 10.0);
            for (j, w) in win.iter_mut().enumerate().take(half) {
                *w = ((j + 1) as f64 * PI / dm).sin().powf(beta);
            }
        }
        Taper::Hanning => {
            for (j, w) in win.iter_mut().enumerate().take(half) {
                *w = cosine_sum(&[0.5, 0.5], phase(j));
            }
        }
        Taper::Hamming => {
            for (j, w) in win.iter_mut().enumerate().take(half) {
                *w = cosine_sum(&[0.54, 0.46], phase(j));
            }
        }
        Taper::Blackman => {
            for (j, w) in win.iter_mut().enumerate().take(half) {
                *w = cosine_sum(&[0.42, 0.50, 0.08], phase(j));
            }
        }
        Taper::BlackmanHarris => {
            for (j, w) in win.iter_mut().enumerate().take(half) {
                *w = cosine_sum(&[0.35875, 0.48829, 0.14128, 0.01168], phase(j));
            }
        }
        Taper::BlackmanNuttall => {
            for (j, w) in win.iter_mut().enumerate().take(half) {
                *w = cosine_sum(&[0.353_581_9, 0.489_177_5, 0.136_599_5, 0.010_641_1], phase(j));
            }
        }
        Taper::Nuttall => {
            for (j, w) in win.iter_mut().enumerate().take(half) {
                *w = cosine_sum(&[0.355_768, 0.487_396, 0.144_232, 0.012_604], phase(j));
            }
        }
        Taper::KaiserBessel => {
            for (j, w) in win.iter_mut().enumerate().take(half) {
                let x = phase(j);
                *w = 0.402 - 0.498 * x.cos() + 0.098 * (2.0 * x).cos() + 0.001 * (3.0 * x).cos();
            }
        }
        Taper::Trapezoid => {
            let k = m.div_ceil(2);
            for (j, w) in win.iter_mut().enumerate().take(k) {
                *w = (j + 1) as f64 / k as f64;
            }
        }
        Taper::Gauss => {
            // 2.7183 puts the response midway between Hanning and Flattop
            for (j, w) in win.iter_mut().enumerate().take(half) {
                let x = ((j + 1) as f64 - dm / 2.0) / (dm / 2.0) * 2.7183;
                *w = (-(x * x)).exp();
            }
        }
    }

    fold(&mut win, m);
    for w in &mut win[half..n - half] {
        *w = 1.0;
    }
    win
}

/// Zeroth-order modified Bessel function of the first kind (10-term series).
#[must_use]
pub fn bessel(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut factorial = 1.0;
    for i in 1..10 {
        factorial *= f64::from(i);
        let term = (x / 2.0).powi(i) / factorial;
        sum += term * term;
    }
    sum
}

/// `sin(x) / x`, exactly 1.0 within `SINC_EPSILON` of zero.
#[must_use]
pub fn sinc(x: f64) -> f64 {
    if x.abs() < SINC_EPSILON {
        1.0
    } else {
        x.sin() / x
    }
}
