//! ETCI 2021 データモジュール
//!
//! 既存の train スプリットを 80/20 で学習用・検証用に分割し、
//! val スプリットをテスト用データとして使う。

use std::sync::Arc;

use burn::{
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    tensor::backend::Backend,
};
use tracing::info;

use crate::config::DataModuleConfig;
use crate::dataset::{
    random_split, Etci2021, FloodSample, Planes, SampleTransform, Split, SubsetDataset,
};
use crate::error::{DatasetError, Result};
use crate::ml::batcher::{FloodBatch, FloodBatcher};

/// 正規化に使うチャネルごとの平均（VV x3, VH x3, 水域マスク）
pub const BAND_MEANS: [f32; 7] = [
    0.52253931, 0.52253931, 0.52253931, 0.61221701, 0.61221701, 0.61221701, 0.0,
];

/// 正規化に使うチャネルごとの標準偏差
pub const BAND_STDS: [f32; 7] = [
    0.35221376, 0.35221376, 0.35221376, 0.37364622, 0.37364622, 0.37364622, 1.0,
];

/// データローダーの型
pub type FloodDataLoader<B> = Arc<dyn DataLoader<B, FloodBatch<B>>>;

/// データモジュール
#[derive(Debug)]
pub struct Etci2021DataModule {
    config: DataModuleConfig,
    train_dataset: Option<SubsetDataset<Etci2021>>,
    val_dataset: Option<SubsetDataset<Etci2021>>,
    test_dataset: Option<Etci2021>,
}

impl Etci2021DataModule {
    pub fn new(config: DataModuleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            train_dataset: None,
            val_dataset: None,
            test_dataset: None,
        })
    }

    pub fn config(&self) -> &DataModuleConfig {
        &self.config
    }

    /// 1サンプルの前処理
    ///
    /// 水域マスクを7番目の入力チャネルとして画像に連結し、
    /// 255 で割ってから [`BAND_MEANS`] / [`BAND_STDS`] で正規化する。
    /// ターゲットは浸水マスク (1, H, W)。
    pub fn preprocess(sample: FloodSample) -> Result<FloodSample> {
        let FloodSample { image, mask } = sample;

        let water_mask = mask.select(0).ok_or(DatasetError::MissingFloodMask {
            channels: mask.channels(),
        })?;
        let flood_mask = mask.select(1).ok_or(DatasetError::MissingFloodMask {
            channels: mask.channels(),
        })?;

        let image = image.concat(water_mask.map(|v| v as f32))?;
        if image.channels() != BAND_MEANS.len() {
            return Err(DatasetError::ShapeMismatch(format!(
                "expected {} input channels, got {}",
                BAND_MEANS.len(),
                image.channels()
            )));
        }

        let [channels, height, width] = image.dims();
        let plane = height * width;
        let data = image
            .into_data()
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let c = i / plane;
                (v / 255.0 - BAND_MEANS[c]) / BAND_STDS[c]
            })
            .collect();

        Ok(FloodSample {
            image: Planes::new(data, channels, height, width)?,
            mask: flood_mask.map(|v| (v > 0) as i64),
        })
    }

    /// データセットが存在することを確認
    pub fn prepare_data(&self) -> Result<()> {
        Etci2021::new(&self.config.root_dir, Split::Train)?;
        Ok(())
    }

    /// 学習・検証・テスト用データセットを構築
    pub fn setup(&mut self) -> Result<()> {
        let preprocess: SampleTransform = Arc::new(Self::preprocess);

        let train_val_dataset =
            Etci2021::new(&self.config.root_dir, Split::Train)?.with_transforms(preprocess.clone());
        let test_dataset =
            Etci2021::new(&self.config.root_dir, Split::Val)?.with_transforms(preprocess);

        let size_train_val = train_val_dataset.len();
        let size_train = (self.config.train_fraction * size_train_val as f64) as usize;
        let size_val = size_train_val - size_train;

        let mut subsets = random_split::<_, FloodSample>(
            Arc::new(train_val_dataset),
            &[size_train, size_val],
            self.config.seed,
        )?;
        let val_dataset = subsets.pop();
        let train_dataset = subsets.pop();

        info!("学習データ: {} 枚", size_train);
        info!("検証データ: {} 枚", size_val);
        info!("テストデータ: {} 枚", test_dataset.len());

        self.train_dataset = train_dataset;
        self.val_dataset = val_dataset;
        self.test_dataset = Some(test_dataset);

        Ok(())
    }

    pub fn train_dataset(&self) -> Option<&SubsetDataset<Etci2021>> {
        self.train_dataset.as_ref()
    }

    pub fn val_dataset(&self) -> Option<&SubsetDataset<Etci2021>> {
        self.val_dataset.as_ref()
    }

    pub fn test_dataset(&self) -> Option<&Etci2021> {
        self.test_dataset.as_ref()
    }

    /// 学習用データローダー（シャッフルあり）
    pub fn train_dataloader<B: Backend>(&self, device: &B::Device) -> Result<FloodDataLoader<B>> {
        let dataset = self.train_dataset.clone().ok_or(DatasetError::NotSetUp)?;
        Ok(self.build_dataloader(dataset, true, device))
    }

    /// 検証用データローダー
    pub fn val_dataloader<B: Backend>(&self, device: &B::Device) -> Result<FloodDataLoader<B>> {
        let dataset = self.val_dataset.clone().ok_or(DatasetError::NotSetUp)?;
        Ok(self.build_dataloader(dataset, false, device))
    }

    /// テスト用データローダー
    pub fn test_dataloader<B: Backend>(&self, device: &B::Device) -> Result<FloodDataLoader<B>> {
        let dataset = self.test_dataset.clone().ok_or(DatasetError::NotSetUp)?;
        Ok(self.build_dataloader(dataset, false, device))
    }

    fn build_dataloader<B, D>(&self, dataset: D, shuffle: bool, device: &B::Device) -> FloodDataLoader<B>
    where
        B: Backend,
        D: Dataset<FloodSample> + 'static,
    {
        let mut builder = DataLoaderBuilder::new(FloodBatcher::new())
            .batch_size(self.config.batch_size)
            .set_device(device.clone());

        if shuffle {
            builder = builder.shuffle(self.config.seed);
        }
        // ワーカー数0ならメインスレッドでオンデマンド読み込み
        if self.config.num_workers > 0 {
            builder = builder.num_workers(self.config.num_workers);
        }

        builder.build(dataset)
    }
}
