mod noise;
mod signal;

pub use noise::{NoiseConfig, apply_noise, generate_electrodes};
pub use signal::{WaveShape, default_wave_template, generate_abr_signal, time_axis};
