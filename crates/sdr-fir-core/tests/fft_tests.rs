//! FFT Engine Tests
//!
//! These tests run on the host with std feature enabled.
//! Run with: cargo test --features std

use sdr_fir_core::fft::{
    dft, fft, goertzel, is_valid_fft_size, magnitude_spectrum_db, real_signal_dft, required_fft_size,
    single_frequency_dft,
};
use sdr_fir_core::{FftError, Spectrum, TransformDirection, Window};

fn test_signal(n: usize) -> (Vec<f64>, Vec<f64>) {
    let re = (0..n).map(|i| ((i * 37 % 23) as f64 - 11.0) / 7.0).collect();
    let im = (0..n).map(|i| ((i as f64) * 0.31).cos()).collect();
    (re, im)
}

// =============================================================================
// Size Validation Tests
// =============================================================================

#[test]
fn test_required_fft_size() {
    assert_eq!(required_fft_size(1), 8);
    assert_eq!(required_fft_size(8), 8);
    assert_eq!(required_fft_size(9), 16);
    assert_eq!(required_fft_size(1000), 1024);
    assert_eq!(required_fft_size(1 << 22), 1 << 20);
}

#[test]
fn test_is_valid_fft_size() {
    assert_eq!(is_valid_fft_size(8), Some(3));
    assert_eq!(is_valid_fft_size(1024), Some(10));
    assert_eq!(is_valid_fft_size(1 << 20), Some(20));
    assert_eq!(is_valid_fft_size(4), None);
    assert_eq!(is_valid_fft_size(0), None);
    assert_eq!(is_valid_fft_size(96), None);
    assert_eq!(is_valid_fft_size(1 << 21), None);
}

#[test]
fn test_invalid_size_leaves_buffers() {
    let mut re = vec![3.0; 100];
    let mut im = vec![-1.0; 100];
    assert_eq!(
        fft(&mut re, &mut im, TransformDirection::Inverse),
        Err(FftError::InvalidSize(100))
    );
    assert!(re.iter().all(|&v| v == 3.0));
    assert!(im.iter().all(|&v| v == -1.0));
}

// =============================================================================
// Transform Property Tests
// =============================================================================

#[test]
fn test_round_trip() {
    for log2 in 3..=12 {
        let n = 1 << log2;
        let (orig_re, orig_im) = test_signal(n);
        let mut re = orig_re.clone();
        let mut im = orig_im.clone();
        fft(&mut re, &mut im, TransformDirection::Forward).unwrap();
        fft(&mut re, &mut im, TransformDirection::Inverse).unwrap();
        for k in 0..n {
            assert!((re[k] - orig_re[k]).abs() < 1e-9, "n={} k={}: {}", n, k, re[k]);
            assert!((im[k] - orig_im[k]).abs() < 1e-9, "n={} k={}: {}", n, k, im[k]);
        }
    }
}

#[test]
fn test_fft_matches_dft() {
    for n in [8, 16, 32, 64] {
        for direction in [TransformDirection::Forward, TransformDirection::Inverse] {
            let (mut fr, mut fi) = test_signal(n);
            let (mut dr, mut di) = (fr.clone(), fi.clone());
            fft(&mut fr, &mut fi, direction).unwrap();
            dft(&mut dr, &mut di, direction).unwrap();
            for k in 0..n {
                assert!((fr[k] - dr[k]).abs() < 1e-9, "n={} k={}", n, k);
                assert!((fi[k] - di[k]).abs() < 1e-9, "n={} k={}", n, k);
            }
        }
    }
}

#[test]
fn test_parseval() {
    for n in [8, 128, 4096] {
        let (mut re, mut im) = test_signal(n);
        let time_energy: f64 = re.iter().zip(&im).map(|(r, i)| r * r + i * i).sum();
        fft(&mut re, &mut im, TransformDirection::Forward).unwrap();
        let freq_energy: f64 = re.iter().zip(&im).map(|(r, i)| r * r + i * i).sum();
        let scaled = n as f64 * freq_energy;
        assert!(
            (time_energy - scaled).abs() < 1e-9 * time_energy,
            "n={}: {} vs {}",
            n,
            time_energy,
            scaled
        );
    }
}

#[test]
fn test_spectrum_transform() {
    let mut spectrum = Spectrum::from_real(&[1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    spectrum.transform(TransformDirection::Forward).unwrap();
    assert!((spectrum.magnitude(0) - 0.5).abs() < 1e-12);
    // Odd bins carry the step edge, even bins other than DC are zero
    assert!(spectrum.magnitude(2) < 1e-12);
    assert!(spectrum.magnitude(1) > 0.1);
}

// =============================================================================
// Reference Transform Tests
// =============================================================================

#[test]
fn test_dft_any_length() {
    let mut re = vec![0.0; 7];
    let mut im = vec![0.0; 7];
    re[0] = 7.0;
    dft(&mut re, &mut im, TransformDirection::Forward).unwrap();
    for k in 0..7 {
        assert!((re[k] - 1.0).abs() < 1e-12);
        assert!(im[k].abs() < 1e-12);
    }
}

#[test]
fn test_real_signal_dft_matches_dft() {
    let samples: Vec<f64> = (0..12).map(|i| (i as f64 * 0.4).sin() + 0.25).collect();
    let mut out_re = vec![0.0; 12];
    let mut out_im = vec![0.0; 12];
    real_signal_dft(&samples, &mut out_re, &mut out_im).unwrap();

    let mut re = samples.clone();
    let mut im = vec![0.0; 12];
    dft(&mut re, &mut im, TransformDirection::Forward).unwrap();
    for k in 0..12 {
        assert!((out_re[k] - re[k]).abs() < 1e-12, "k={}", k);
        assert!((out_im[k] - im[k]).abs() < 1e-12, "k={}", k);
    }
}

#[test]
fn test_real_signal_dft_length_mismatch() {
    let mut out_re = vec![0.0; 4];
    let mut out_im = vec![0.0; 5];
    assert!(matches!(
        real_signal_dft(&[1.0; 5], &mut out_re, &mut out_im),
        Err(FftError::LengthMismatch { expected: 5, actual: 4 })
    ));
}

// =============================================================================
// Single-Bin Detector Tests
// =============================================================================

#[test]
fn test_goertzel_matches_fft_bin() {
    let n = 64;
    let samples: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).sin() * (i as f64 * 0.05).cos()).collect();
    let mut re = samples.clone();
    let mut im = vec![0.0; n];
    fft(&mut re, &mut im, TransformDirection::Forward).unwrap();

    for k in [0, 1, 5, 17, 32] {
        let omega = 2.0 * k as f64 / n as f64;
        let bin = n as f64 * (re[k] * re[k] + im[k] * im[k]).sqrt();
        let g = goertzel(&samples, omega);
        assert!((g - bin).abs() < 1e-9 * (1.0 + bin), "k={}: {} vs {}", k, g, bin);
    }
}

#[test]
fn test_single_frequency_dft_of_dc() {
    let taps = [0.25; 4];
    assert!((single_frequency_dft(&taps, 0.0) - 1.0).abs() < 1e-12);
    assert!(single_frequency_dft(&taps, 1.0) < 1e-12);
}

#[test]
fn test_magnitude_spectrum_db() {
    let samples: Vec<f64> = (0..200).map(|i| (i as f64 * std::f64::consts::PI * 0.25).sin()).collect();
    let db = magnitude_spectrum_db(&samples, Window::BLACKMAN_HARRIS).unwrap();
    assert_eq!(db.len(), 129);
    let peak = db
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap();
    // 0.25 * Nyquist on a 256-point transform
    assert!((31..=33).contains(&peak), "peak bin {}", peak);
    assert!(magnitude_spectrum_db(&[], Window::HANNING).is_err());
}
