//! WASM bindings for SDR FIR design.
//!
//! This crate exposes the design pipeline and a single-shot magnitude
//! spectrum to a browser front end. Coefficient arrays cross the boundary
//! as `Float64Array`.

use sdr_fir_core::config::DEFAULT_KAISER_BETA;
use sdr_fir_core::{
    design_fir, magnitude_spectrum_db, BandSpec, DesignMethod, FirCoefficients, FirDesignConfig, PassType, Taper,
    Window,
};
use wasm_bindgen::prelude::*;

/// Number of points returned by [`FirDesigner::magnitude_response_db`].
pub const RESPONSE_POINTS: usize = 512;

fn pass_type_from_u8(pass_type: u8) -> PassType {
    match pass_type {
        0 => PassType::LowPass,
        1 => PassType::HighPass,
        2 => PassType::BandPass,
        3 => PassType::Notch,
        4 => PassType::AllPass,
        _ => PassType::LowPass,
    }
}

/// FIR designer holding the current configuration and last result.
#[wasm_bindgen]
pub struct FirDesigner {
    config: FirDesignConfig,
    coeffs: FirCoefficients,
    iterations: u32,
    converged: bool,
}

#[wasm_bindgen]
impl FirDesigner {
    /// Create a designer with the default windowed low-pass configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        Self {
            config: FirDesignConfig::default(),
            coeffs: FirCoefficients::default(),
            iterations: 0,
            converged: true,
        }
    }

    /// Set pass type (0=LPF, 1=HPF, 2=BPF, 3=Notch, 4=All-pass).
    #[wasm_bindgen]
    pub fn set_pass_type(&mut self, pass_type: u8) {
        self.config.pass_type = pass_type_from_u8(pass_type);
    }

    /// Set tap count.
    #[wasm_bindgen]
    pub fn set_num_taps(&mut self, num_taps: usize) {
        self.config.num_taps = num_taps;
    }

    /// Set corner/centre frequency and bandwidth (1.0 = Nyquist).
    #[wasm_bindgen]
    pub fn set_band(&mut self, omega_c: f64, bw: f64) {
        self.config.band = BandSpec { omega_c, bw };
    }

    /// Use a windowed design (0=Kaiser, 1=Sinc, 2=Sine) with the given beta.
    #[wasm_bindgen]
    pub fn set_window(&mut self, window: u8, beta: f64) {
        let window = match window {
            1 => Window::tapered(Taper::Sinc { beta }),
            2 => Window::tapered(Taper::Sine { beta }),
            _ => Window::Kaiser { beta },
        };
        self.config.method = DesignMethod::Windowed { window };
    }

    /// Use the Parks-McClellan designer.
    #[wasm_bindgen]
    pub fn set_parks_mcclellan(&mut self, transition_width: f64) {
        self.config.method = DesignMethod::ParksMcClellan { transition_width };
    }

    /// Enable or disable corner frequency correction.
    #[wasm_bindgen]
    pub fn set_correction(&mut self, enabled: bool) {
        self.config.correct_frequency = enabled;
    }

    /// Set group delay adjustment in samples.
    #[wasm_bindgen]
    pub fn set_delay(&mut self, delay: f64) {
        self.config.delay = delay;
    }

    /// Run the design and return the coefficients.
    ///
    /// Throws a string describing the problem if the configuration is
    /// rejected; the previous coefficients are kept in that case.
    #[wasm_bindgen]
    pub fn design(&mut self) -> Result<Vec<f64>, JsValue> {
        let design = design_fir(&self.config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        match design.remez {
            Some(outcome) => {
                self.iterations = u32::try_from(outcome.iterations).unwrap_or(u32::MAX);
                self.converged = outcome.converged;
            }
            None => {
                self.iterations = 0;
                self.converged = true;
            }
        }
        self.coeffs = design.coeffs;
        Ok(self.coeffs.to_vec())
    }

    /// Remez iteration count of the last design (0 for windowed designs).
    #[wasm_bindgen]
    pub fn get_iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether the last Remez design finished under the iteration cap.
    #[wasm_bindgen]
    pub fn get_converged(&self) -> bool {
        self.converged
    }

    /// Magnitude response of the last design in dB, `RESPONSE_POINTS`
    /// points from DC to Nyquist.
    #[wasm_bindgen]
    pub fn magnitude_response_db(&self) -> Vec<f64> {
        if self.coeffs.is_empty() {
            return Vec::new();
        }
        (0..RESPONSE_POINTS)
            .map(|i| self.coeffs.magnitude_db_at(i as f64 / (RESPONSE_POINTS - 1) as f64))
            .collect()
    }

    /// Last design exported as Q1.15 integers.
    #[wasm_bindgen]
    pub fn coefficients_q15(&self) -> Vec<i16> {
        self.coeffs.to_q15().iter().map(|q| q.to_bits()).collect()
    }
}

impl Default for FirDesigner {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-shot magnitude spectrum in dB (Hanning window, unity gain).
///
/// Returns an empty array for empty or oversized input.
#[wasm_bindgen]
pub fn magnitude_spectrum(samples: &[f64]) -> Vec<f64> {
    magnitude_spectrum_db(samples, Window::HANNING).unwrap_or_default()
}

/// Default Kaiser beta used by the designer.
#[wasm_bindgen]
pub fn default_kaiser_beta() -> f64 {
    DEFAULT_KAISER_BETA
}

/// Create a new designer (factory function).
#[wasm_bindgen]
pub fn create_designer() -> FirDesigner {
    FirDesigner::new()
}
