mod test_signals;

use approx::assert_abs_diff_eq;

use abrwave::config::{AnalysisConfig, WaveId};
use abrwave::ingest::load_recording;
use abrwave::simulation::{
    NoiseConfig, default_wave_template, generate_abr_signal, generate_electrodes, time_axis,
};
use abrwave::{AbrError, Trace, WaveAnalyzer, analyze};

use test_signals::{gaussian_trace, temp_dir, uniform_time, write_csv};

#[test]
fn test_single_wave_five_end_to_end() {
    // 2000 samples at 0.01 ms: a 0.2 bump at 6.0 ms and a 0.1 dip at 6.2 ms
    let time = uniform_time(2000, 0.01);
    let signal = gaussian_trace(&time, &[(6.0, 0.2, 0.05), (6.2, -0.1, 0.05)]);

    let result = analyze(&signal, &time).unwrap();

    let wave5 = result.wave(WaveId::Wave5).expect("wave 5 detected");
    assert_abs_diff_eq!(wave5.latency_ms, 6.0, epsilon = 1e-9);
    assert_abs_diff_eq!(wave5.amplitude, 0.3, epsilon = 1e-3);
    assert_eq!(wave5.peak_index, 600);
    assert_eq!(wave5.trough_index, 620);

    for wave in [WaveId::Wave1, WaveId::Wave2, WaveId::Wave3, WaveId::Wave4] {
        assert!(result.wave(wave).is_none(), "{} should be absent", wave);
    }

    // Found on the first pass; relaxation never ran
    assert_eq!(result.attempts(), 1);
    assert_eq!(result.threshold(), Some(0.05));
    assert_eq!(result.interpeak_1_5(), None);
}

#[test]
fn test_flat_signal_never_triggers() {
    // The threshold after 11 passes is 0.05 * 0.95^10 ~= 0.0299, still
    // positive, and a flat signal has no strict local maximum at any threshold.
    let time = uniform_time(2000, 0.01);

    for level in [0.0, 0.04, -0.2] {
        let signal = vec![level; time.len()];
        let result = analyze(&signal, &time).unwrap();
        assert!(result.is_empty(), "flat {} produced a detection", level);
        assert_eq!(result.attempts(), 11);
        assert_eq!(result.interpeak_1_5(), None);
    }
}

#[test]
fn test_full_template_all_waves() {
    let time = time_axis(1200, 0.01);
    let template = default_wave_template();
    let signal = generate_abr_signal(&time, &template);

    let result = analyze(&signal, &time).unwrap();

    assert_eq!(result.attempts(), 1);
    assert_eq!(result.detected_count(), 5);
    for (wave, shape) in WaveId::ALL.iter().zip(&template) {
        let d = result.wave(*wave).unwrap();
        assert_abs_diff_eq!(d.latency_ms, shape.latency_ms, epsilon = 0.011);
        assert_abs_diff_eq!(
            d.amplitude,
            shape.amplitude + shape.trough_depth,
            epsilon = 0.01
        );
        assert!(d.trough_index > d.peak_index);
    }

    let ipi = result.interpeak_1_5().unwrap();
    assert_abs_diff_eq!(ipi, 6.2 - 1.4, epsilon = 0.02);
}

#[test]
fn test_noisy_electrodes_averaged_from_csv() {
    let dir = temp_dir("noisy_csv");
    let time = time_axis(1200, 0.01);
    let clean = generate_abr_signal(&time, &default_wave_template());
    let noise = NoiseConfig::default().with_seed(1234).with_std_dev(0.004);
    let channels = generate_electrodes(&clean, 8, &noise).unwrap();

    // Offset time axis: ingestion shifts it back to zero
    let time_rows: Vec<Vec<f64>> = time.iter().map(|t| vec![t + 0.5]).collect();
    let signal_rows: Vec<Vec<f64>> = (0..time.len())
        .map(|i| channels.iter().map(|c| c[i]).collect())
        .collect();
    let time_path = dir.join("time_data.csv");
    let signal_path = dir.join("215.csv");
    write_csv(&time_path, "time", &time_rows);
    write_csv(
        &signal_path,
        "e1,e2,e3,e4,e5,e6,e7,e8",
        &signal_rows,
    );

    let recording = load_recording(&signal_path, &time_path, 1e-3).unwrap();
    assert_eq!(recording.id, "215");
    assert_eq!(recording.electrode_count, 8);
    assert_eq!(recording.trace.len(), 1200);
    assert_eq!(recording.trace.time_ms()[0], 0.0);

    let result = WaveAnalyzer::default().analyze(&recording.trace);
    assert_eq!(result.detected_count(), 5);
    for (wave, shape) in WaveId::ALL.iter().zip(default_wave_template()) {
        let d = result.wave(*wave).unwrap();
        assert_abs_diff_eq!(d.latency_ms, shape.latency_ms, epsilon = 0.05);
    }
}

#[test]
fn test_ingest_truncates_to_shorter_sequence() {
    let dir = temp_dir("truncate");
    let time_rows: Vec<Vec<f64>> = uniform_time(50, 0.01).into_iter().map(|t| vec![t]).collect();
    let signal_rows: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64, -(i as f64)]).collect();
    let time_path = dir.join("time.csv");
    let signal_path = dir.join("7.csv");
    write_csv(&time_path, "t", &time_rows);
    write_csv(&signal_path, "a,b", &signal_rows);

    let recording = load_recording(&signal_path, &time_path, 1e-3).unwrap();
    assert_eq!(recording.trace.len(), 40);
    assert!(recording.trace.signal().iter().all(|&v| v == 0.0));
}

#[test]
fn test_ingest_rejects_non_uniform_time() {
    let dir = temp_dir("non_uniform");
    let time_rows = vec![vec![0.0], vec![0.01], vec![0.02], vec![0.05], vec![0.06]];
    let signal_rows = vec![vec![0.0]; 5];
    let time_path = dir.join("time.csv");
    let signal_path = dir.join("1.csv");
    write_csv(&time_path, "t", &time_rows);
    write_csv(&signal_path, "a", &signal_rows);

    let err = load_recording(&signal_path, &time_path, 1e-3).unwrap_err();
    assert!(matches!(err, AbrError::NonUniformSampling { index: 3, .. }));
}

#[test]
fn test_ingest_accepts_rounded_timestamps() {
    // 0.04096 ms sampling printed to 3 decimals jitters between 0.040 and 0.041
    let dir = temp_dir("rounded_time");
    let mut time_csv = String::from("time\n");
    for k in 0..300 {
        time_csv.push_str(&format!("{:.3}\n", k as f64 * 0.04096));
    }
    let time_path = dir.join("time.csv");
    std::fs::write(&time_path, time_csv).unwrap();
    let signal_path = dir.join("3.csv");
    write_csv(&signal_path, "a,b", &vec![vec![0.0, 0.0]; 300]);

    let recording = load_recording(&signal_path, &time_path, 1e-3).unwrap();
    assert_eq!(recording.trace.len(), 300);
    assert_abs_diff_eq!(recording.trace.sample_interval_ms(), 0.041, epsilon = 1e-9);
}

#[test]
fn test_ingest_numeric_header_is_not_a_sample() {
    let dir = temp_dir("numeric_header");
    let time_rows: Vec<Vec<f64>> = uniform_time(5, 0.01).into_iter().map(|t| vec![t]).collect();
    let signal_rows: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64 * 10.0; 2]).collect();
    let time_path = dir.join("time.csv");
    let signal_path = dir.join("4.csv");
    write_csv(&time_path, "0", &time_rows);
    write_csv(&signal_path, "1,2", &signal_rows);

    let recording = load_recording(&signal_path, &time_path, 1e-3).unwrap();
    assert_eq!(recording.electrode_count, 2);
    assert_eq!(recording.trace.signal(), &[0.0, 10.0, 20.0, 30.0, 40.0]);
    assert_eq!(recording.trace.time_ms()[0], 0.0);
}

#[test]
fn test_ingest_missing_file() {
    let dir = temp_dir("missing");
    let err = load_recording(dir.join("nope.csv"), dir.join("time.csv"), 1e-3).unwrap_err();
    assert!(matches!(err, AbrError::Io { .. }));
}

#[test]
fn test_config_file_changes_windows() {
    let dir = temp_dir("config");
    let path = dir.join("abr.toml");
    std::fs::write(
        &path,
        "[windows.wave_1]\nstart_ms = 0.2\nend_ms = 0.8\n[detection]\nmax_attempts = 3\n",
    )
    .unwrap();

    let config = AnalysisConfig::load(&path).unwrap();
    assert_eq!(config.detection.max_attempts, 3);

    let time = uniform_time(1000, 0.01);
    let signal = gaussian_trace(&time, &[(0.5, 0.2, 0.05)]);
    let trace = Trace::new(signal, time).unwrap();

    let result = WaveAnalyzer::new(config).unwrap().analyze(&trace);
    assert_abs_diff_eq!(
        result.wave(WaveId::Wave1).unwrap().latency_ms,
        0.5,
        epsilon = 1e-9
    );
}
