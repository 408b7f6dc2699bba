//! Configuration-driven FIR design pipeline.
//!
//! ```text
//! band spec -> windowed sinc | Parks-McClellan -> [corner correction] -> [delay] -> taps
//! ```

use crate::config::{DEFAULT_KAISER_BETA, DEFAULT_TRANSITION_WIDTH};
use crate::correction::fir_freq_error;
use crate::delay::adjust_delay;
use crate::error::DesignError;
use crate::fir::{fir_filter_window, rect_win_fir, FirCoefficients};
use crate::remez::{RemezOutcome, RemezWorkspace};
use crate::types::{BandSpec, PassType};
use crate::window::Window;

/// FIR design method.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DesignMethod {
    /// Ideal response shaped by an FIR window (Kaiser, Sinc or Sine)
    Windowed {
        /// Window applied to the ideal response
        window: Window,
    },
    /// Parks-McClellan equiripple design
    ParksMcClellan {
        /// Distance from pass-band edge to stop-band edge (1.0 = Nyquist)
        transition_width: f64,
    },
}

impl Default for DesignMethod {
    fn default() -> Self {
        Self::Windowed {
            window: Window::Kaiser {
                beta: DEFAULT_KAISER_BETA,
            },
        }
    }
}

/// FIR design configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirDesignConfig {
    /// Design method
    pub method: DesignMethod,
    /// Pass-band shape
    pub pass_type: PassType,
    /// Number of taps (high-pass Remez and notch designs may add one)
    pub num_taps: usize,
    /// Corner/centre frequency and bandwidth
    pub band: BandSpec,
    /// Run one measure-and-redesign pass to pull the -3 dB edge onto the request
    pub correct_frequency: bool,
    /// Group delay adjustment in samples (0.0 for none)
    pub delay: f64,
}

impl Default for FirDesignConfig {
    fn default() -> Self {
        Self {
            method: DesignMethod::default(),
            pass_type: PassType::LowPass,
            num_taps: 63,
            band: BandSpec {
                omega_c: 0.5,
                bw: 0.0,
            },
            correct_frequency: false,
            delay: 0.0,
        }
    }
}

impl FirDesignConfig {
    /// Windowed low-pass preset.
    #[must_use]
    pub fn lowpass(omega_c: f64, num_taps: usize) -> Self {
        Self {
            num_taps,
            band: BandSpec { omega_c, bw: 0.0 },
            ..Self::default()
        }
    }

    /// Windowed high-pass preset.
    #[must_use]
    pub fn highpass(omega_c: f64, num_taps: usize) -> Self {
        Self {
            pass_type: PassType::HighPass,
            ..Self::lowpass(omega_c, num_taps)
        }
    }

    /// Windowed band-pass preset.
    #[must_use]
    pub fn bandpass(centre: f64, bw: f64, num_taps: usize) -> Self {
        Self {
            pass_type: PassType::BandPass,
            num_taps,
            band: BandSpec { omega_c: centre, bw },
            ..Self::default()
        }
    }

    /// Windowed notch preset.
    #[must_use]
    pub fn notch(centre: f64, bw: f64, num_taps: usize) -> Self {
        Self {
            pass_type: PassType::Notch,
            ..Self::bandpass(centre, bw, num_taps)
        }
    }

    /// Same configuration using the Parks-McClellan designer with the
    /// default transition width.
    #[must_use]
    pub fn equiripple(self) -> Self {
        Self {
            method: DesignMethod::ParksMcClellan {
                transition_width: DEFAULT_TRANSITION_WIDTH,
            },
            ..self
        }
    }

    /// Same configuration with corner correction enabled.
    #[must_use]
    pub fn corrected(self) -> Self {
        Self {
            correct_frequency: true,
            ..self
        }
    }
}

/// Output of [`design_fir`].
#[derive(Clone, Debug, PartialEq)]
pub struct FirDesign {
    /// Final coefficients
    pub coeffs: FirCoefficients,
    /// Band actually passed to the designer (differs from the request after
    /// correction)
    pub band: BandSpec,
    /// Remez statistics of the final design, for Parks-McClellan designs
    pub remez: Option<RemezOutcome>,
}

fn design_once(
    config: &FirDesignConfig,
    band: BandSpec,
    workspace: &mut RemezWorkspace,
) -> Result<(FirCoefficients, Option<RemezOutcome>), DesignError> {
    match config.method {
        DesignMethod::Windowed { window } => {
            let mut coeffs = rect_win_fir(config.num_taps, config.pass_type, band)?;
            fir_filter_window(&mut coeffs, window)?;
            Ok((coeffs, None))
        }
        DesignMethod::ParksMcClellan { transition_width } => {
            let (coeffs, outcome) = workspace.design(config.num_taps, config.pass_type, band, transition_width)?;
            Ok((coeffs, Some(outcome)))
        }
    }
}

/// Run the full design pipeline described by `config`.
///
/// # Errors
/// Returns [`DesignError`] from whichever stage rejects the configuration:
/// invalid tap count or band, an analysis-only window, an all-pass
/// Parks-McClellan design or a non-finite or oversized delay.
pub fn design_fir(config: &FirDesignConfig) -> Result<FirDesign, DesignError> {
    let mut workspace = RemezWorkspace::new();
    let mut band = BandSpec::new(config.band.omega_c, config.band.bw)?;
    let (mut coeffs, mut remez) = design_once(config, band, &mut workspace)?;

    if config.correct_frequency && config.pass_type != PassType::AllPass {
        band = fir_freq_error(&coeffs, config.pass_type, band)?;
        (coeffs, remez) = design_once(config, band, &mut workspace)?;
    }

    if config.delay != 0.0 {
        adjust_delay(&mut coeffs, config.delay)?;
    }

    Ok(FirDesign { coeffs, band, remez })
}
