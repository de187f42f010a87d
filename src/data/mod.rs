//! Dataset sources other than files on disk.

pub mod synthetic;

pub use synthetic::{GenerateConfig, SyntheticDataset, generate_dataset, write_dataset};
