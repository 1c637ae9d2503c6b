pub mod batcher;
pub mod datamodule;

pub use batcher::{FloodBatch, FloodBatcher};
pub use datamodule::{Etci2021DataModule, FloodDataLoader, BAND_MEANS, BAND_STDS};
