use spectra::config::AnalyzerConfig;
use spectra::{
    approx_eq, forward_transform, forward_transform_in_place, inverse_transform,
    real_forward_transform, slices_approx_eq, twiddle_cache, Complex32, Complex64, FftError,
    FftPlan, SpectrumAnalyzer, Strategy, WindowKind,
};
use std::f64::consts::PI;
use std::sync::Arc;
use std::thread;

fn real(values: &[f64]) -> Vec<Complex64> {
    values.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

#[test]
fn impulse_has_flat_spectrum() {
    let spectrum = forward_transform(&real(&[1.0, 0.0, 0.0, 0.0])).unwrap();
    assert!(slices_approx_eq(&spectrum, &real(&[1.0; 4]), 1e-12));
}

#[test]
fn constant_has_dc_only() {
    let spectrum = forward_transform(&real(&[1.0; 4])).unwrap();
    assert!(slices_approx_eq(&spectrum, &real(&[4.0, 0.0, 0.0, 0.0]), 1e-12));
}

#[test]
fn five_point_transform_matches_hand_computed_dft() {
    let input = real(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let spectrum = forward_transform(&input).unwrap();
    // X[k] = sum_t x[t] e^{-2πikt/5}
    for (k, bin) in spectrum.iter().enumerate() {
        let expected: Complex64 = input
            .iter()
            .enumerate()
            .map(|(t, x)| x * Complex64::from_polar(1.0, -2.0 * PI * ((k * t) % 5) as f64 / 5.0))
            .sum();
        assert!(approx_eq(*bin, expected, 1e-12), "bin {k}");
    }
    assert!(approx_eq(spectrum[0], Complex64::new(15.0, 0.0), 1e-12));
    assert!(approx_eq(spectrum[1], spectrum[4].conj(), 1e-12));
}

#[test]
fn shifted_impulse_rotates_phase() {
    let n = 12;
    let mut buf = vec![Complex64::new(0.0, 0.0); n];
    buf[1] = Complex64::new(1.0, 0.0);
    forward_transform_in_place(&mut buf).unwrap();
    for (k, bin) in buf.iter().enumerate() {
        let expected = Complex64::from_polar(1.0, -2.0 * PI * k as f64 / n as f64);
        assert!(approx_eq(*bin, expected, 1e-12), "bin {k}");
    }
}

#[test]
fn rejected_call_does_not_touch_buffer() {
    let mut empty: Vec<Complex64> = Vec::new();
    assert!(matches!(
        forward_transform_in_place(&mut empty),
        Err(FftError::InvalidLength { len: 0, .. })
    ));

    let plan = FftPlan::<f64>::new(8).unwrap();
    let mut buf = real(&[1.0, 2.0]);
    assert!(plan.inverse_in_place(&mut buf).is_err());
    assert_eq!(buf, real(&[1.0, 2.0]));
}

#[test]
fn radix2_only_plan() {
    assert!(FftPlan::<f32>::with_strategy(1000, Strategy::Radix2Only).is_err());
    let plan = FftPlan::<f32>::with_strategy(1024, Strategy::Radix2Only).unwrap();
    let input: Vec<Complex32> = (0..1024).map(|i| Complex32::new((i % 7) as f32, 0.0)).collect();
    let restored = plan.inverse(&plan.forward(&input).unwrap()).unwrap();
    assert!(slices_approx_eq(&restored, &input, 1e-4));
}

#[test]
fn real_transform_of_cosine() {
    let n = 64;
    let samples: Vec<f64> = (0..n).map(|i| (2.0 * PI * 5.0 * i as f64 / n as f64).cos()).collect();
    let spectrum = real_forward_transform(&samples).unwrap();
    assert_eq!(spectrum.len(), 33);
    for (k, bin) in spectrum.iter().enumerate() {
        let expected = if k == 5 { n as f64 / 2.0 } else { 0.0 };
        assert!(approx_eq(*bin, Complex64::new(expected, 0.0), 1e-10), "bin {k}");
    }
}

#[test]
fn plans_share_cached_twiddles_across_threads() {
    let len = 1 << 12;
    let input: Vec<Complex64> = (0..len).map(|i| Complex64::new((i as f64).sin(), 0.0)).collect();
    let input = Arc::new(input);
    let reference = forward_transform(&input).unwrap();
    assert!(twiddle_cache::<f64>().contains(len));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let input = Arc::clone(&input);
            thread::spawn(move || forward_transform(&input).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), reference);
    }
}

#[test]
fn inverse_of_flat_spectrum_is_impulse() {
    let samples = inverse_transform(&real(&[1.0; 6])).unwrap();
    assert!(slices_approx_eq(&samples, &real(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]), 1e-12));
}

#[test]
fn analyzer_reports_dominant_frequency() {
    let config = AnalyzerConfig {
        sample_rate: 48000,
        block_size: 4800,
        window: WindowKind::Blackman,
        history: 2,
        ..AnalyzerConfig::default()
    };
    let mut analyzer = SpectrumAnalyzer::new(&config).unwrap();
    // 4800-sample blocks at 48 kHz give 10 Hz bins.
    let block: Vec<f64> = (0..4800)
        .map(|i| 0.5 * (2.0 * PI * 440.0 * i as f64 / 48000.0).sin())
        .collect();
    analyzer.push_block(&block).unwrap();
    analyzer.push_block(&block).unwrap();

    let report = analyzer.report().unwrap();
    assert_eq!(report.block, 2);
    assert!((report.peak_hz - 440.0).abs() < 1e-9);
    assert_eq!(report.bands.len(), config.bands.len());
}
