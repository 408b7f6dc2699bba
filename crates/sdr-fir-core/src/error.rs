//! Error types for the transform and design routines.
//!
//! Every routine that returns one of these validates its arguments before
//! touching caller buffers, so an `Err` always means nothing was written.

use core::fmt;

/// FFT/DFT error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FftError {
    /// Size is not a power of two in `MIN_FFT_SIZE..=MAX_FFT_SIZE`
    InvalidSize(usize),
    /// Real and imaginary (or input and output) buffers differ in length
    LengthMismatch {
        /// Length required by the transform
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize(n) => write!(f, "invalid FFT size {n}"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "buffer length {actual}, expected {expected}")
            }
        }
    }
}

/// Window generation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowError {
    /// Window family cannot be used for FIR design
    UnsupportedForFir,
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedForFir => f.write_str("window family not usable for FIR design"),
        }
    }
}

/// FIR design error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DesignError {
    /// Tap count above the designer's maximum
    TooManyTaps(usize),
    /// Tap count below `MIN_FIR_TAPS`
    TooFewTaps(usize),
    /// Corner frequency or bandwidth outside `0.0..=1.0`
    InvalidFrequency,
    /// Pass type not supported by this designer
    UnsupportedPassType,
    /// Delay not finite or too large for the FFT buffer
    InvalidDelay,
    /// Underlying transform error
    Fft(FftError),
    /// Underlying window error
    Window(WindowError),
}

impl From<FftError> for DesignError {
    fn from(e: FftError) -> Self {
        DesignError::Fft(e)
    }
}

impl From<WindowError> for DesignError {
    fn from(e: WindowError) -> Self {
        DesignError::Window(e)
    }
}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyTaps(n) => write!(f, "{n} taps exceeds the designer maximum"),
            Self::TooFewTaps(n) => write!(f, "{n} taps is too few"),
            Self::InvalidFrequency => f.write_str("frequency outside 0.0..=1.0"),
            Self::UnsupportedPassType => f.write_str("pass type not supported by this designer"),
            Self::InvalidDelay => f.write_str("delay not finite or beyond the FFT size limit"),
            Self::Fft(e) => write!(f, "fft: {e}"),
            Self::Window(e) => write!(f, "window: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

#[cfg(feature = "std")]
impl std::error::Error for WindowError {}

#[cfg(feature = "std")]
impl std::error::Error for DesignError {}
