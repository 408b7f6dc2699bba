//! FIR Design Tests
//!
//! These tests run on the host with std feature enabled.
//! Run with: cargo test --features std

use sdr_fir_core::{
    adjust_delay, design_fir, filter_with_fir, fir_filter_window, fir_freq_error, rect_win_fir, window_data,
    BandSpec, DesignError, DesignMethod, FirCoefficients, FirDesignConfig, PassType, Taper, Window, WindowError,
};

fn corner(omega_c: f64) -> BandSpec {
    BandSpec::corner(omega_c).unwrap()
}

fn kaiser_lowpass(omega_c: f64, num_taps: usize) -> FirCoefficients {
    let mut c = rect_win_fir(num_taps, PassType::LowPass, corner(omega_c)).unwrap();
    fir_filter_window(&mut c, Window::Kaiser { beta: 4.0 }).unwrap();
    c
}

/// First grid frequency (step 0.001) where the response drops to -3 dB.
fn measured_corner(coeffs: &FirCoefficients) -> f64 {
    (0..=1000)
        .map(|j| j as f64 / 1000.0)
        .find(|&w| coeffs.magnitude_at(w) <= 0.707)
        .unwrap_or(1.0)
}

// =============================================================================
// Windowed-Sinc Design Tests
// =============================================================================

#[test]
fn test_lowpass_with_hanning_window() {
    let mut c = rect_win_fir(63, PassType::LowPass, corner(0.3)).unwrap();
    window_data(&mut c, Window::HANNING, false);
    let pass = c.magnitude_at(0.2);
    let stop = c.magnitude_at(0.5);
    assert!(pass >= 0.9, "passband magnitude: got {}", pass);
    assert!(stop <= 0.1, "stopband magnitude: got {}", stop);
}

#[test]
fn test_windowed_designs_are_linear_phase() {
    let cases = [
        (PassType::LowPass, BandSpec::corner(0.25).unwrap()),
        (PassType::HighPass, BandSpec::corner(0.6).unwrap()),
        (PassType::BandPass, BandSpec::new(0.5, 0.2).unwrap()),
        (PassType::Notch, BandSpec::new(0.4, 0.1).unwrap()),
    ];
    for (pass_type, band) in cases {
        let mut c = rect_win_fir(41, pass_type, band).unwrap();
        fir_filter_window(&mut c, Window::tapered(Taper::Sinc { beta: 1.5 })).unwrap();
        assert!(c.is_symmetric(1e-12), "{:?} not symmetric", pass_type);
    }
}

#[test]
fn test_highpass_even_taps() {
    let mut c = rect_win_fir(64, PassType::HighPass, corner(0.5)).unwrap();
    fir_filter_window(&mut c, Window::Kaiser { beta: 5.0 }).unwrap();
    assert_eq!(c.len(), 64);
    assert!(c.is_antisymmetric(1e-12));
    assert!(c.magnitude_at(0.0) < 1e-6, "DC: got {}", c.magnitude_at(0.0));
    assert!(c.magnitude_at(0.9) > 0.9, "0.9: got {}", c.magnitude_at(0.9));
    assert!(c.magnitude_at(0.1) < 0.05, "0.1: got {}", c.magnitude_at(0.1));
}

#[test]
fn test_notch_forced_odd() {
    let c = rect_win_fir(64, PassType::Notch, BandSpec::new(0.5, 0.2).unwrap()).unwrap();
    assert_eq!(c.len(), 65);
    let c = rect_win_fir(256, PassType::Notch, BandSpec::new(0.5, 0.2).unwrap()).unwrap();
    assert_eq!(c.len(), 255);
}

#[test]
fn test_allpass_is_delayed_impulse() {
    let c = rect_win_fir(21, PassType::AllPass, BandSpec::default()).unwrap();
    for (i, &v) in c.iter().enumerate() {
        let expected = if i == 10 { 1.0 } else { 0.0 };
        assert!((v - expected).abs() < 1e-12, "tap {}: {}", i, v);
    }
}

#[test]
fn test_tap_count_limits() {
    assert_eq!(
        rect_win_fir(2, PassType::LowPass, corner(0.5)),
        Err(DesignError::TooFewTaps(2))
    );
    assert_eq!(
        rect_win_fir(257, PassType::LowPass, corner(0.5)),
        Err(DesignError::TooManyTaps(257))
    );
    assert!(BandSpec::new(1.2, 0.0).is_err());
}

#[test]
fn test_analysis_window_rejected_for_fir() {
    let mut c = rect_win_fir(31, PassType::LowPass, corner(0.5)).unwrap();
    let before = c.clone();
    assert_eq!(
        fir_filter_window(&mut c, Window::BLACKMAN),
        Err(WindowError::UnsupportedForFir)
    );
    assert_eq!(c, before);
}

#[test]
fn test_q15_export() {
    let c = kaiser_lowpass(0.3, 31);
    let q = c.to_q15();
    assert_eq!(q.len(), 31);
    for (f, q) in c.iter().zip(q.iter()) {
        assert!((f - q.to_num::<f64>()).abs() <= 1.0 / 32768.0);
    }

    let sat = FirCoefficients::from_slice(&[1.5, -2.0]).unwrap().to_q15();
    assert_eq!(sat[0].to_bits(), i16::MAX);
    assert_eq!(sat[1].to_bits(), i16::MIN);
}

// =============================================================================
// Corner Correction Tests
// =============================================================================

#[test]
fn test_freq_error_idempotent_at_realized_edge() {
    let c = kaiser_lowpass(0.3, 63);
    let first = fir_freq_error(&c, PassType::LowPass, corner(0.3)).unwrap();
    let edge = 0.6 - first.omega_c;

    let again = fir_freq_error(&c, PassType::LowPass, corner(edge)).unwrap();
    assert!((again.omega_c - edge).abs() <= 1e-3 + 1e-12, "{} vs {}", again.omega_c, edge);
}

#[test]
fn test_highpass_freq_error() {
    let band = corner(0.6);
    let mut c = rect_win_fir(63, PassType::HighPass, band).unwrap();
    fir_filter_window(&mut c, Window::Kaiser { beta: 4.0 }).unwrap();
    let corrected = fir_freq_error(&c, PassType::HighPass, band).unwrap();
    // Windowed high-pass reaches -3 dB above the ideal corner
    assert!(corrected.omega_c < 0.6, "corrected: {}", corrected.omega_c);
    assert!(corrected.omega_c > 0.5, "corrected: {}", corrected.omega_c);
}

#[test]
fn test_notch_freq_error_clamps_bandwidth() {
    let band = BandSpec::new(0.5, 0.1).unwrap();
    let mut c = rect_win_fir(63, PassType::Notch, band).unwrap();
    fir_filter_window(&mut c, Window::Kaiser { beta: 4.0 }).unwrap();
    let corrected = fir_freq_error(&c, PassType::Notch, band).unwrap();
    assert_eq!(corrected.omega_c, 0.5);
    assert!(corrected.bw >= 0.01 && corrected.bw <= 0.2, "bw: {}", corrected.bw);
}

#[test]
fn test_correction_moves_edge_toward_request() {
    let plain = design_fir(&FirDesignConfig::lowpass(0.3, 31)).unwrap();
    let corrected = design_fir(&FirDesignConfig::lowpass(0.3, 31).corrected()).unwrap();
    let plain_err = (measured_corner(&plain.coeffs) - 0.3).abs();
    let corrected_err = (measured_corner(&corrected.coeffs) - 0.3).abs();
    assert!(
        corrected_err <= plain_err + 0.002,
        "corrected error {} vs plain {}",
        corrected_err,
        plain_err
    );
}

// =============================================================================
// Delay Adjustment Tests
// =============================================================================

#[test]
fn test_zero_delay_identity() {
    let c = kaiser_lowpass(0.4, 31);
    let mut shifted = c.clone();
    adjust_delay(&mut shifted, 0.0).unwrap();
    assert_eq!(shifted, c);
}

#[test]
fn test_integer_delay_round_trip() {
    let mut c = vec![0.0; 20];
    for (i, v) in c.iter_mut().enumerate().skip(5).take(6) {
        *v = (i as f64 * 0.9).sin();
    }
    let orig = c.clone();
    adjust_delay(&mut c, 3.0).unwrap();
    assert!((c[8] - orig[5]).abs() < 1e-9);
    adjust_delay(&mut c, -3.0).unwrap();
    for (a, b) in c.iter().zip(&orig) {
        assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
    }
}

#[test]
fn test_fractional_delay_round_trip() {
    let lpf = kaiser_lowpass(0.3, 31);
    let mut c = vec![0.0; 63];
    c[16..47].copy_from_slice(&lpf);
    let orig = c.clone();
    adjust_delay(&mut c, 0.5).unwrap();
    adjust_delay(&mut c, -0.5).unwrap();
    for (i, (a, b)) in c.iter().zip(&orig).enumerate() {
        assert!((a - b).abs() < 1e-2, "tap {}: {} vs {}", i, a, b);
    }
}

#[test]
fn test_oversized_delay_rejected() {
    let lpf = kaiser_lowpass(0.3, 31);
    let mut c = lpf.clone();
    for delay in [1e30, -1e30, f64::MAX, f64::NAN, f64::NEG_INFINITY] {
        assert_eq!(adjust_delay(&mut c, delay), Err(DesignError::InvalidDelay), "delay {}", delay);
    }
    assert_eq!(c, lpf);

    // Long shifts inside the FFT limit still succeed
    let mut short = [0.0, 1.0, 0.0];
    assert!(adjust_delay(&mut short, 1000.0).is_ok());
}

#[test]
fn test_fractional_delay_keeps_magnitude() {
    let lpf = kaiser_lowpass(0.3, 31);
    let mut c = vec![0.0; 63];
    c[16..47].copy_from_slice(&lpf);
    let shifted_orig = FirCoefficients::from_slice(&c).unwrap();
    adjust_delay(&mut c, 1.5).unwrap();
    let shifted = FirCoefficients::from_slice(&c).unwrap();
    for w in [0.0, 0.1, 0.2] {
        let (a, b) = (shifted.magnitude_at(w), shifted_orig.magnitude_at(w));
        assert!((a - b).abs() < 0.02, "w={}: {} vs {}", w, a, b);
    }
}

// =============================================================================
// Filtering Tests
// =============================================================================

#[test]
fn test_filter_impulse_response_order() {
    let coeffs = [1.0, 2.0, 3.0];
    let mut out = [0.0; 5];
    filter_with_fir(&coeffs, &[1.0, 0.0, 0.0, 0.0, 0.0], &mut out).unwrap();
    // coeffs[0] meets the oldest sample, so an impulse comes out reversed
    assert_eq!(out, [3.0, 2.0, 1.0, 0.0, 0.0]);
}

#[test]
fn test_filter_passes_and_rejects_tones() {
    let c = kaiser_lowpass(0.3, 63);
    let tone = |omega: f64| -> Vec<f64> {
        (0..400)
            .map(|n| (omega * std::f64::consts::PI * n as f64).cos())
            .collect()
    };
    let mut out = vec![0.0; 400];

    filter_with_fir(&c, &tone(0.1), &mut out).unwrap();
    let peak = out[100..].iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    assert!((peak - 1.0).abs() < 0.05, "passband peak: got {}", peak);

    filter_with_fir(&c, &tone(0.8), &mut out).unwrap();
    let peak = out[100..].iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    assert!(peak < 0.05, "stopband peak: got {}", peak);
}

#[test]
fn test_filter_rejects_oversized_coefficients() {
    let coeffs = vec![0.0; 300];
    let mut out = [7.0; 4];
    assert_eq!(
        filter_with_fir(&coeffs, &[1.0; 4], &mut out),
        Err(DesignError::TooManyTaps(300))
    );
    assert_eq!(out, [7.0; 4]);
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn test_pipeline_presets() {
    let hpf = design_fir(&FirDesignConfig::highpass(0.5, 63)).unwrap();
    assert!(hpf.coeffs.magnitude_at(0.9) > 0.9);
    assert!(hpf.coeffs.magnitude_at(0.1) < 0.05);

    let bpf = design_fir(&FirDesignConfig::bandpass(0.5, 0.2, 63)).unwrap();
    assert!(bpf.coeffs.magnitude_at(0.5) > 0.9);
    assert!(bpf.coeffs.magnitude_at(0.0) < 0.05);

    let notch = design_fir(&FirDesignConfig::notch(0.5, 0.2, 64)).unwrap();
    assert_eq!(notch.coeffs.len(), 65);
    assert!(notch.coeffs.magnitude_at(0.5) < 0.1);
    assert!(notch.coeffs.magnitude_at(0.1) > 0.9);
}

#[test]
fn test_pipeline_delay_applied_last() {
    let config = FirDesignConfig {
        delay: 2.0,
        ..FirDesignConfig::lowpass(0.3, 31)
    };
    let delayed = design_fir(&config).unwrap();
    let plain = design_fir(&FirDesignConfig::lowpass(0.3, 31)).unwrap();
    for i in 2..31 {
        assert!((delayed.coeffs[i] - plain.coeffs[i - 2]).abs() < 1e-9, "tap {}", i);
    }
}

#[test]
fn test_pipeline_errors() {
    let allpass_remez = FirDesignConfig {
        pass_type: PassType::AllPass,
        method: DesignMethod::ParksMcClellan { transition_width: 0.1 },
        ..FirDesignConfig::default()
    };
    assert_eq!(design_fir(&allpass_remez), Err(DesignError::UnsupportedPassType));

    let bad_delay = FirDesignConfig {
        delay: f64::INFINITY,
        ..FirDesignConfig::default()
    };
    assert_eq!(design_fir(&bad_delay), Err(DesignError::InvalidDelay));
}
