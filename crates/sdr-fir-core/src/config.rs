//! Toolkit limits and tuning constants
//!
//! All size limits, iteration caps and numeric floors used by the designers
//! are centralized here.

/// Smallest FFT size accepted (the twiddle table uses 4-fold symmetry).
pub const MIN_FFT_SIZE: usize = 8;

/// Largest FFT size accepted (2^20 points).
pub const MAX_FFT_SIZE: usize = 1 << 20;

/// Maximum number of taps held by a [`FirCoefficients`](crate::fir::FirCoefficients) set.
pub const MAX_FIR_TAPS: usize = 256;

/// Minimum tap count for any FIR design.
pub const MIN_FIR_TAPS: usize = 3;

/// Maximum tap count accepted by the Parks-McClellan designer.
pub const MAX_PARKS_TAPS: usize = 127;

/// Grid points per unique coefficient in the Remez dense grid.
pub const PARKS_GRID_DENSITY: usize = 16;

/// Remez exchange iteration cap.
pub const PARKS_MAX_ITERATIONS: usize = 50;

/// Floor applied to Lagrange interpolation denominators.
pub const PARKS_MIN_TEST_VAL: f64 = 1.0e-6;

/// Transition width limit for band-pass/notch and long (> 70 tap) designs.
pub const PARKS_MAX_TRANSITION_WIDTH: f64 = 0.15;

/// Tap count above which the transition width limit also applies.
pub const PARKS_LONG_FILTER_TAPS: usize = 70;

/// Default Parks-McClellan transition width.
pub const DEFAULT_TRANSITION_WIDTH: f64 = 0.1;

/// Iteration count below which a Remez design is suspect.
///
/// This is a heuristic only; [`RemezOutcome`](crate::remez::RemezOutcome)
/// reports the raw count.
pub const PARKS_SUSPECT_ITERATIONS: usize = 3;

/// Number of frequency points scanned by the -3 dB edge search.
pub const FREQ_ERROR_GRID: usize = 1000;

/// Magnitude treated as the -3 dB point.
pub const MAG_3DB: f64 = 0.707;

/// Magnitude treated as the -20 dB point; scans stop below it.
pub const MAG_20DB: f64 = 0.1;

/// Magnitude at which a notch scan considers itself back in the pass band.
pub const MAG_PASS: f64 = 0.99;

/// Smallest magnitude returned by the Goertzel detector.
pub const GOERTZEL_FLOOR: f64 = 1.0e-12;

/// Half-width of the neighbourhood of zero where `sinc(x)` is 1.
pub const SINC_EPSILON: f64 = 1.0e-5;

/// Default Kaiser window beta for FIR design.
pub const DEFAULT_KAISER_BETA: f64 = 4.0;
