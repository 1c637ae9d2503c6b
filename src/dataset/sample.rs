//! 画像・マスクの読み込みとサンプル表現

use std::path::Path;

use crate::error::{DatasetError, Result};

/// チャネル優先 (C, H, W) で平坦化された配列
#[derive(Debug, Clone, PartialEq)]
pub struct Planes<T> {
    data: Vec<T>,
    channels: usize,
    height: usize,
    width: usize,
}

impl<T: Copy> Planes<T> {
    pub fn new(data: Vec<T>, channels: usize, height: usize, width: usize) -> Result<Self> {
        if data.len() != channels * height * width {
            return Err(DatasetError::ShapeMismatch(format!(
                "{} values cannot form [{}, {}, {}]",
                data.len(),
                channels,
                height,
                width
            )));
        }
        Ok(Self {
            data,
            channels,
            height,
            width,
        })
    }

    /// [C, H, W]
    pub fn dims(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// 指定チャネルの H*W 要素
    pub fn channel(&self, c: usize) -> Option<&[T]> {
        if c >= self.channels {
            return None;
        }
        let plane = self.height * self.width;
        Some(&self.data[c * plane..(c + 1) * plane])
    }

    /// 指定チャネルだけを取り出した1チャネル配列
    pub fn select(&self, c: usize) -> Option<Self> {
        self.channel(c).map(|plane| Self {
            data: plane.to_vec(),
            channels: 1,
            height: self.height,
            width: self.width,
        })
    }

    /// チャネル方向に連結
    pub fn concat(mut self, other: Self) -> Result<Self> {
        if self.height != other.height || self.width != other.width {
            return Err(DatasetError::ShapeMismatch(format!(
                "cannot concatenate {:?} with {:?}",
                self.dims(),
                other.dims()
            )));
        }
        self.data.extend(other.data);
        self.channels += other.channels;
        Ok(self)
    }

    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> Planes<U> {
        Planes {
            data: self.data.into_iter().map(f).collect(),
            channels: self.channels,
            height: self.height,
            width: self.width,
        }
    }
}

/// 1サンプル: 入力画像とマスク
#[derive(Debug, Clone, PartialEq)]
pub struct FloodSample {
    /// [6, H, W] (VV の RGB, VH の RGB)。値は 0〜255
    pub image: Planes<f32>,
    /// train / val: [2, H, W] (水域, 浸水)、test: [1, H, W] (水域)
    pub mask: Planes<i64>,
}

/// 画像を読み込んでRGB 3チャネル (C, H, W) に変換
pub fn load_image(path: &Path) -> Result<Planes<f32>> {
    let img = image::open(path)
        .map_err(|source| DatasetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let (width, height) = img.dimensions();

    // HxWxC -> CxHxW
    let mut data = Vec::with_capacity(3 * (width * height) as usize);
    for channel in 0..3 {
        for y in 0..height {
            for x in 0..width {
                data.push(img.get_pixel(x, y)[channel] as f32);
            }
        }
    }

    Planes::new(data, 3, height as usize, width as usize)
}

/// マスクを読み込んで 0/1 のラベル (1, H, W) に変換
pub fn load_target(path: &Path) -> Result<Planes<i64>> {
    let img = image::open(path)
        .map_err(|source| DatasetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_luma8();
    let (width, height) = img.dimensions();

    let data = img.pixels().map(|p| p[0].min(1) as i64).collect();

    Planes::new(data, 1, height as usize, width as usize)
}
