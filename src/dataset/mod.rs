pub mod split;
pub mod files;
pub mod sample;
pub mod etci2021;
#[cfg(feature = "ml")]
pub mod subset;
pub mod summary;

#[cfg(test)]
pub(crate) mod fixtures;

pub use split::{Split, BANDS, MASKS};
pub use files::{index_files, SampleFiles};
pub use sample::{load_image, load_target, FloodSample, Planes};
pub use etci2021::{Etci2021, SampleTransform};
#[cfg(feature = "ml")]
pub use subset::{random_split, SubsetDataset};
pub use summary::DatasetSummary;
