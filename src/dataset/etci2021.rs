//! ETCI 2021 洪水検出データセット
//!
//! Sentinel-1 SAR の VV / VH 偏波画像（各RGB 3チャネル）と、
//! 水域マスク・浸水マスク（0 / 255 の単一チャネルPNG）で構成される。
//! 5地域の洪水イベント、256x256ピクセルのタイル。
//!
//! ファイルパスの索引のみ保持し、画像は [`Etci2021::sample`] で都度読み込む。

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::dataset::files::{index_files, SampleFiles};
use crate::dataset::sample::{load_image, load_target, FloodSample};
use crate::dataset::split::Split;
use crate::error::{DatasetError, Result};

/// サンプル変換関数
pub type SampleTransform = Arc<dyn Fn(FloodSample) -> Result<FloodSample> + Send + Sync>;

/// ETCI 2021 データセット（1スプリット分）
#[derive(Clone)]
pub struct Etci2021 {
    root: PathBuf,
    split: Split,
    transforms: Option<SampleTransform>,
    files: Vec<SampleFiles>,
}

impl Etci2021 {
    /// ルートディレクトリからスプリットを読み込む
    ///
    /// `<root>/<split dir>` が存在しない場合は [`DatasetError::NotFound`]。
    pub fn new(root: impl AsRef<Path>, split: Split) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !Self::check_integrity(&root, split) {
            return Err(DatasetError::NotFound {
                path: root.join(split.directory()),
                archive: split.archive_filename(),
            });
        }

        let files = index_files(&root, split)?;
        info!(
            "ETCI2021 {} スプリットを読み込みました: {} サンプル ({})",
            split,
            files.len(),
            root.display()
        );

        Ok(Self {
            root,
            split,
            transforms: None,
            files,
        })
    }

    /// サンプル変換を設定
    pub fn with_transforms(mut self, transforms: SampleTransform) -> Self {
        self.transforms = Some(transforms);
        self
    }

    /// スプリットのディレクトリが存在するか
    pub fn check_integrity(root: &Path, split: Split) -> bool {
        root.join(split.directory()).exists()
    }

    /// 指定インデックスのサンプルを読み込む
    pub fn sample(&self, index: usize) -> Result<FloodSample> {
        let files = self.files.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.files.len(),
        })?;

        let vv = load_image(&files.vv)?;
        let vh = load_image(&files.vh)?;
        let water_mask = load_target(&files.water_mask)?;

        let mask = match (&files.flood_mask, self.split.has_flood_mask()) {
            (Some(flood_path), true) => water_mask.concat(load_target(flood_path)?)?,
            _ => water_mask,
        };

        let sample = FloodSample {
            image: vv.concat(vh)?,
            mask,
        };

        match &self.transforms {
            Some(transforms) => transforms(sample),
            None => Ok(sample),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[SampleFiles] {
        &self.files
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl fmt::Debug for Etci2021 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Etci2021")
            .field("root", &self.root)
            .field("split", &self.split)
            .field("transforms", &self.transforms.is_some())
            .field("len", &self.files.len())
            .finish()
    }
}

/// Burn の `Dataset` はエラーを返せず、`None` はデータ終端として扱われる。
/// 範囲外以外の読み込み失敗はエポックを黙って打ち切らないよう panic する。
#[cfg(feature = "ml")]
impl burn::data::dataset::Dataset<FloodSample> for Etci2021 {
    fn get(&self, index: usize) -> Option<FloodSample> {
        match self.sample(index) {
            Ok(sample) => Some(sample),
            Err(DatasetError::IndexOutOfRange { .. }) => None,
            Err(e) => panic!("サンプル {} の読み込みに失敗しました: {}", index, e),
        }
    }

    fn len(&self) -> usize {
        self.files.len()
    }
}
