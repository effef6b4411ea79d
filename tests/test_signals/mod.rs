pub mod generate;

pub use generate::{gaussian_trace, temp_dir, uniform_time, write_csv};
