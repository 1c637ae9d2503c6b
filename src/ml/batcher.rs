//! サンプルをテンソルのバッチにまとめる

use burn::{
    data::dataloader::batcher::Batcher,
    tensor::{backend::Backend, Int, Tensor},
};

use crate::dataset::FloodSample;
use crate::error::{DatasetError, Result};

/// バッチデータ
#[derive(Clone, Debug)]
pub struct FloodBatch<B: Backend> {
    /// [N, C, H, W]
    pub images: Tensor<B, 4>,
    /// [N, Cm, H, W]
    pub masks: Tensor<B, 4, Int>,
}

impl<B: Backend> FloodBatch<B> {
    /// 単一チャネルのマスクを [N, H, W] に変形（セグメンテーション損失用）
    ///
    /// マスクが複数チャネルの場合は [`DatasetError::ShapeMismatch`]。
    pub fn flood_targets(&self) -> Result<Tensor<B, 3, Int>> {
        let [batch_size, channels, height, width] = self.masks.dims();
        if channels != 1 {
            return Err(DatasetError::ShapeMismatch(format!(
                "flood targets need a single mask channel, got {:?}",
                self.masks.dims()
            )));
        }
        Ok(self.masks.clone().reshape([batch_size, height, width]))
    }

    pub fn len(&self) -> usize {
        self.images.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// バッチャー
///
/// バッチ内のサンプルはすべて同じ形状でなければならない。
/// `Batcher` はエラーを返せないため、形状が揃わない場合は全形状を添えて panic する。
#[derive(Clone, Debug, Default)]
pub struct FloodBatcher;

impl FloodBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, FloodSample, FloodBatch<B>> for FloodBatcher {
    fn batch(&self, items: Vec<FloodSample>, device: &B::Device) -> FloodBatch<B> {
        let (image_dims, mask_dims) = match items.first() {
            Some(first) => (first.image.dims(), first.mask.dims()),
            None => ([0, 0, 0], [0, 0, 0]),
        };

        if items
            .iter()
            .any(|item| item.image.dims() != image_dims || item.mask.dims() != mask_dims)
        {
            let shapes: Vec<_> = items
                .iter()
                .map(|item| (item.image.dims(), item.mask.dims()))
                .collect();
            panic!("バッチ内のサンプルの形状が一致しません (image, mask): {:?}", shapes);
        }

        let batch_size = items.len();
        let image_len: usize = image_dims.iter().product();
        let mask_len: usize = mask_dims.iter().product();
        let mut all_pixels = Vec::with_capacity(batch_size * image_len);
        let mut all_labels = Vec::with_capacity(batch_size * mask_len);

        for item in items {
            all_pixels.extend(item.image.into_data());
            all_labels.extend(item.mask.into_data());
        }

        let [c, h, w] = image_dims;
        let images = Tensor::<B, 1>::from_floats(all_pixels.as_slice(), device)
            .reshape([batch_size, c, h, w]);

        let [mc, mh, mw] = mask_dims;
        let masks = Tensor::<B, 1, Int>::from_ints(all_labels.as_slice(), device)
            .reshape([batch_size, mc, mh, mw]);

        FloodBatch { images, masks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Planes;

    type TestBackend = burn_ndarray::NdArray<f32>;

    fn sample(value: f32, size: usize) -> FloodSample {
        sample_with_masks(value, size, 1)
    }

    fn sample_with_masks(value: f32, size: usize, mask_channels: usize) -> FloodSample {
        FloodSample {
            image: Planes::new(vec![value; 7 * size * size], 7, size, size).unwrap(),
            mask: Planes::new(
                vec![1; mask_channels * size * size],
                mask_channels,
                size,
                size,
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let batch: FloodBatch<TestBackend> =
            FloodBatcher::new().batch(vec![sample(0.5, 4), sample(1.5, 4)], &device);

        assert_eq!(batch.images.dims(), [2, 7, 4, 4]);
        assert_eq!(batch.masks.dims(), [2, 1, 4, 4]);
        assert_eq!(batch.flood_targets().unwrap().dims(), [2, 4, 4]);

        let values = batch.images.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values[0], 0.5);
        assert_eq!(values[7 * 16], 1.5);
    }

    #[test]
    #[should_panic(expected = "形状が一致しません")]
    fn test_batch_rejects_mismatched_shapes() {
        let device = Default::default();
        // 先頭のサンプルだけ大きさが異なる
        let _: FloodBatch<TestBackend> = FloodBatcher::new().batch(
            vec![sample(0.0, 8), sample(0.0, 4), sample(0.0, 4), sample(0.0, 4)],
            &device,
        );
    }

    #[test]
    #[should_panic(expected = "形状が一致しません")]
    fn test_batch_rejects_mismatched_mask_channels() {
        let device = Default::default();
        let _: FloodBatch<TestBackend> = FloodBatcher::new().batch(
            vec![sample_with_masks(0.0, 4, 1), sample_with_masks(0.0, 4, 2)],
            &device,
        );
    }

    #[test]
    fn test_flood_targets_requires_single_channel() {
        let device = Default::default();
        let batch: FloodBatch<TestBackend> =
            FloodBatcher::new().batch(vec![sample_with_masks(0.0, 2, 2)], &device);

        assert_eq!(batch.masks.dims(), [1, 2, 2, 2]);
        let err = batch.flood_targets().unwrap_err();
        assert!(matches!(err, DatasetError::ShapeMismatch(_)));
    }
}
