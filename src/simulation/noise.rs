use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{AbrError, Result};

/// Per-electrode recording noise
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    /// Standard deviation of additive Gaussian noise per electrode
    pub std_dev: f64,
    /// Constant offset drawn per electrode from N(0, baseline_std)
    pub baseline_std: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: None,
            std_dev: 0.01,
            baseline_std: 0.0,
        }
    }
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_std_dev(mut self, std_dev: f64) -> Self {
        self.std_dev = std_dev;
        self
    }

    pub fn with_baseline(mut self, baseline_std: f64) -> Self {
        self.baseline_std = baseline_std;
        self
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

fn normal(std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, std_dev).map_err(|e| AbrError::Config(format!("noise std_dev: {}", e)))
}

/// Add noise to a signal in place
pub fn apply_noise(signal: &mut [f64], config: &NoiseConfig) -> Result<()> {
    let mut rng = create_rng(config.seed);
    add_noise(signal, config, &mut rng)
}

fn add_noise(signal: &mut [f64], config: &NoiseConfig, rng: &mut ChaCha8Rng) -> Result<()> {
    let offset = if config.baseline_std > 0.0 {
        normal(config.baseline_std)?.sample(rng)
    } else {
        0.0
    };
    let noise = if config.std_dev > 0.0 {
        Some(normal(config.std_dev)?)
    } else {
        None
    };

    for s in signal.iter_mut() {
        *s += offset;
        if let Some(ref n) = noise {
            *s += n.sample(rng);
        }
    }
    Ok(())
}

/// Independent noisy copies of `clean`, one per electrode
///
/// All electrodes share one RNG stream so a seed reproduces the whole set.
pub fn generate_electrodes(
    clean: &[f64],
    electrode_count: usize,
    config: &NoiseConfig,
) -> Result<Vec<Vec<f64>>> {
    let mut rng = create_rng(config.seed);
    (0..electrode_count)
        .map(|_| -> Result<Vec<f64>> {
            let mut channel = clean.to_vec();
            add_noise(&mut channel, config, &mut rng)?;
            Ok(channel)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_noise_reproducible() {
        let config = NoiseConfig::default().with_seed(42).with_std_dev(0.05);
        let mut a = vec![0.0; 500];
        let mut b = vec![0.0; 500];
        apply_noise(&mut a, &config).unwrap();
        apply_noise(&mut b, &config).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_noise_std_dev() {
        let config = NoiseConfig::default().with_seed(7).with_std_dev(0.1);
        let mut signal = vec![0.0; 20000];
        apply_noise(&mut signal, &config).unwrap();

        let mean = signal.iter().sum::<f64>() / signal.len() as f64;
        let var = signal.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / signal.len() as f64;
        assert!(mean.abs() < 0.01, "mean {}", mean);
        assert!((var.sqrt() - 0.1).abs() < 0.01, "std {}", var.sqrt());
    }

    #[test]
    fn test_zero_noise_is_identity() {
        let config = NoiseConfig::default().with_seed(1).with_std_dev(0.0);
        let mut signal = vec![0.25; 10];
        apply_noise(&mut signal, &config).unwrap();
        assert_eq!(signal, vec![0.25; 10]);
    }

    #[test]
    fn test_baseline_offsets_each_electrode() {
        let config = NoiseConfig::default()
            .with_seed(5)
            .with_std_dev(0.0)
            .with_baseline(0.2);
        let channels = generate_electrodes(&[0.0; 50], 3, &config).unwrap();

        for channel in &channels {
            assert!(channel.iter().all(|&v| v == channel[0]));
        }
        assert_ne!(channels[0][0], channels[1][0]);
    }

    #[test]
    fn test_electrodes_differ() {
        let config = NoiseConfig::default().with_seed(3);
        let channels = generate_electrodes(&[0.0; 100], 4, &config).unwrap();
        assert_eq!(channels.len(), 4);
        assert_ne!(channels[0], channels[1]);
    }
}
