/// Shape of one synthetic ABR wave: a Gaussian peak followed by a Gaussian dip
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct WaveShape {
    /// Peak time in milliseconds
    pub latency_ms: f64,
    /// Peak height
    pub amplitude: f64,
    /// Gaussian standard deviation of peak and dip, in milliseconds
    pub width_ms: f64,
    /// Delay from peak to dip, in milliseconds
    pub trough_delay_ms: f64,
    /// Depth of the dip (positive values go below zero)
    pub trough_depth: f64,
}

impl WaveShape {
    pub fn new(latency_ms: f64, amplitude: f64) -> Self {
        Self {
            latency_ms,
            amplitude,
            width_ms: 0.08,
            trough_delay_ms: 0.3,
            trough_depth: amplitude * 0.5,
        }
    }

    /// Contribution of this wave at time `t_ms`
    pub fn value_at(&self, t_ms: f64) -> f64 {
        let peak = gaussian(t_ms, self.latency_ms, self.width_ms);
        let dip = gaussian(t_ms, self.latency_ms + self.trough_delay_ms, self.width_ms);
        self.amplitude * peak - self.trough_depth * dip
    }
}

fn gaussian(t: f64, center: f64, sigma: f64) -> f64 {
    let z = (t - center) / sigma;
    (-0.5 * z * z).exp()
}

/// Five waves placed inside the default detection windows
pub fn default_wave_template() -> Vec<WaveShape> {
    vec![
        WaveShape::new(1.4, 0.30),
        WaveShape::new(2.15, 0.18),
        WaveShape::new(3.0, 0.22),
        WaveShape::new(4.1, 0.15),
        WaveShape::new(6.2, 0.35),
    ]
}

/// Uniformly sampled, zero-based time axis
pub fn time_axis(num_samples: usize, interval_ms: f64) -> Vec<f64> {
    (0..num_samples).map(|i| i as f64 * interval_ms).collect()
}

/// Noise-free ABR waveform evaluated on `time_ms`
pub fn generate_abr_signal(time_ms: &[f64], waves: &[WaveShape]) -> Vec<f64> {
    time_ms
        .iter()
        .map(|&t| waves.iter().map(|w| w.value_at(t)).sum())
        .collect()
}
