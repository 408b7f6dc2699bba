//! Core types shared by the transform and design modules.

use alloc::vec;
use alloc::vec::Vec;

use crate::config::{MAX_FFT_SIZE, MIN_FFT_SIZE};
use crate::error::{DesignError, FftError};
#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Direction of a Fourier transform.
///
/// Forward transforms are scaled by 1/N; inverse transforms are unscaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransformDirection {
    /// Time to frequency (scaled by 1/N)
    #[default]
    Forward,
    /// Frequency to time (unscaled)
    Inverse,
}

impl TransformDirection {
    /// Sign of the exponent in the transform kernel.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Forward => -1.0,
            Self::Inverse => 1.0,
        }
    }
}

/// FIR pass-band shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PassType {
    /// Low-pass, corner at `omega_c`
    #[default]
    LowPass,
    /// High-pass, corner at `omega_c`
    HighPass,
    /// Band-pass centred on `omega_c`, width `bw`
    BandPass,
    /// Band-reject centred on `omega_c`, width `bw`
    Notch,
    /// Pure delay (windowed designs only)
    AllPass,
}

impl PassType {
    /// Whether the design is specified by a bandwidth around a centre.
    #[must_use]
    pub const fn is_band(self) -> bool {
        matches!(self, Self::BandPass | Self::Notch)
    }

    /// Whether a linear-phase design of this type needs an odd tap count.
    #[must_use]
    pub const fn requires_odd_taps(self) -> bool {
        matches!(self, Self::HighPass | Self::Notch)
    }
}

/// Normalized band specification.
///
/// Frequencies are in `0.0..=1.0` where 1.0 is Nyquist (π rad/sample).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandSpec {
    /// Corner frequency (low/high-pass) or band centre (band-pass/notch)
    pub omega_c: f64,
    /// Bandwidth (band-pass/notch only)
    pub bw: f64,
}

impl BandSpec {
    /// Create a validated band specification.
    ///
    /// # Errors
    /// Returns [`DesignError::InvalidFrequency`] if either value is outside
    /// `0.0..=1.0` or not finite.
    pub fn new(omega_c: f64, bw: f64) -> Result<Self, DesignError> {
        if !(0.0..=1.0).contains(&omega_c) || !(0.0..=1.0).contains(&bw) {
            return Err(DesignError::InvalidFrequency);
        }
        Ok(Self { omega_c, bw })
    }

    /// Corner-only specification for low/high-pass designs.
    ///
    /// # Errors
    /// Returns [`DesignError::InvalidFrequency`] if `omega_c` is out of range.
    pub fn corner(omega_c: f64) -> Result<Self, DesignError> {
        Self::new(omega_c, 0.0)
    }

    /// Lower band edge (`omega_c - bw/2`).
    #[must_use]
    pub fn lower_edge(&self) -> f64 {
        self.omega_c - self.bw / 2.0
    }

    /// Upper band edge (`omega_c + bw/2`).
    #[must_use]
    pub fn upper_edge(&self) -> f64 {
        self.omega_c + self.bw / 2.0
    }
}

impl Default for BandSpec {
    fn default() -> Self {
        Self {
            omega_c: 0.5,
            bw: 0.1,
        }
    }
}

/// Validated FFT size: a power of two in `MIN_FFT_SIZE..=MAX_FFT_SIZE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FftSize(usize);

impl FftSize {
    /// Validate a size, returning `None` if it is not a usable FFT size.
    #[must_use]
    pub const fn new(n: usize) -> Option<Self> {
        if n >= MIN_FFT_SIZE && n <= MAX_FFT_SIZE && n.is_power_of_two() {
            Some(Self(n))
        } else {
            None
        }
    }

    /// Smallest valid size holding at least `num_points` points.
    ///
    /// Saturates at `MAX_FFT_SIZE`.
    #[must_use]
    pub fn required(num_points: usize) -> Self {
        let mut n = MIN_FFT_SIZE;
        while n < num_points && n < MAX_FFT_SIZE {
            n *= 2;
        }
        Self(n)
    }

    /// Number of points.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// log2 of the size (number of butterfly stages).
    #[must_use]
    pub const fn log2(self) -> u32 {
        self.0.trailing_zeros()
    }
}

impl TryFrom<usize> for FftSize {
    type Error = FftError;

    fn try_from(n: usize) -> Result<Self, FftError> {
        Self::new(n).ok_or(FftError::InvalidSize(n))
    }
}

/// Complex spectrum held as separate real and imaginary sequences.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    /// Real parts
    pub re: Vec<f64>,
    /// Imaginary parts
    pub im: Vec<f64>,
}

impl Spectrum {
    /// Zeroed spectrum of `n` points.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            re: vec![0.0; n],
            im: vec![0.0; n],
        }
    }

    /// Spectrum (or signal) with the given real part and zero imaginary part.
    #[must_use]
    pub fn from_real(samples: &[f64]) -> Self {
        Self {
            re: samples.to_vec(),
            im: vec![0.0; samples.len()],
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.re.len()
    }

    /// True if the spectrum holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Magnitude of bin `k` (0.0 when out of range).
    #[must_use]
    pub fn magnitude(&self, k: usize) -> f64 {
        match (self.re.get(k), self.im.get(k)) {
            (Some(r), Some(i)) => (r * r + i * i).sqrt(),
            _ => 0.0,
        }
    }

    /// Sum of squared magnitudes over all bins.
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.re
            .iter()
            .zip(&self.im)
            .map(|(r, i)| r * r + i * i)
            .sum()
    }

    /// Run an in-place FFT over this spectrum.
    ///
    /// # Errors
    /// Returns [`FftError`] if the length is not a valid FFT size; the
    /// contents are left untouched in that case.
    pub fn transform(&mut self, direction: TransformDirection) -> Result<(), FftError> {
        crate::fft::fft(&mut self.re, &mut self.im, direction)
    }
}
