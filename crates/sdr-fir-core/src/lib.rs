//! SDR FIR Design Core Library
//!
//! FIR filter design and spectral analysis primitives for software-defined
//! radio. This crate is `no_std` (with `alloc`) for use in both embedded and
//! WASM targets.
//!
//! # Modules
//!
//! - [`types`] - Core types: PassType, BandSpec, Spectrum, FftSize
//! - [`fft`] - FFT, reference DFTs, Goertzel detector
//! - [`window`] - Analysis and FIR design windows
//! - [`fir`] - Windowed-sinc design, coefficient sets, FIR filtering
//! - [`correction`] - -3 dB edge measurement and corner correction
//! - [`delay`] - Fractional group-delay adjustment
//! - [`remez`] - Parks-McClellan equiripple design
//! - [`design`] - Configuration-driven design pipeline
//!
//! # Frequencies
//!
//! All frequencies are normalized to `0.0..=1.0`, where 1.0 is Nyquist.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod correction;
pub mod delay;
pub mod design;
pub mod error;
pub mod fft;
pub mod fir;
pub mod remez;
pub mod types;
pub mod window;

// Re-export commonly used types
pub use correction::fir_freq_error;
pub use delay::adjust_delay;
pub use design::{design_fir, DesignMethod, FirDesign, FirDesignConfig};
pub use error::{DesignError, FftError, WindowError};
pub use fft::{dft, fft, goertzel, magnitude_spectrum_db, real_signal_dft, single_frequency_dft};
pub use fir::{filter_with_fir, fir_filter_window, rect_win_fir, FirCoefficients, FirFilter};
pub use remez::{parks_mcclellan, RemezExit, RemezOutcome, RemezWorkspace};
pub use types::{BandSpec, FftSize, PassType, Spectrum, TransformDirection};
pub use window::{window_data, Taper, Window};
