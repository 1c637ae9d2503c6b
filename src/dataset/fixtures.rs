//! テスト用のデータセットツリー生成

use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::dataset::split::Split;

/// VV画像の画素値（tile_00）
pub fn vv_pixel(x: u32, y: u32) -> [u8; 3] {
    [x as u8, y as u8, tile_marker(0)]
}

/// VV画像の B チャネル。タイル番号ごとに異なり、読み出し順の確認に使う
pub fn tile_marker(tile: usize) -> u8 {
    100 + tile as u8
}

/// VH画像の画素値
pub fn vh_pixel(x: u32, y: u32) -> [u8; 3] {
    [200, (x + y) as u8, 50]
}

/// 水域マスク: 左半分が水域
pub fn water_value(x: u32, _y: u32, size: u32) -> u8 {
    if x < size / 2 {
        255
    } else {
        0
    }
}

/// 浸水マスク: 上半分が浸水
pub fn flood_value(_x: u32, y: u32, size: u32) -> u8 {
    if y < size / 2 {
        255
    } else {
        0
    }
}

pub fn write_png_gray(path: &Path, size: u32, value: u8) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    GrayImage::from_pixel(size, size, Luma([value])).save(path).unwrap();
}

/// `<root>/<split dir>/<region>/tiles/` 以下に `count` 枚のタイルを書き出す
pub fn write_region(root: &Path, split: Split, region: &str, count: usize, size: u32) {
    let tiles = root.join(split.directory()).join(region).join("tiles");
    for sub in ["vv", "vh", "water_body_label", "flood_label"] {
        std::fs::create_dir_all(tiles.join(sub)).unwrap();
    }

    for i in 0..count {
        let name = format!("tile_{:02}.png", i);

        RgbImage::from_fn(size, size, |x, y| {
            let [r, g, _] = vv_pixel(x, y);
            Rgb([r, g, tile_marker(i)])
        })
            .save(tiles.join("vv").join(&name))
            .unwrap();
        RgbImage::from_fn(size, size, |x, y| Rgb(vh_pixel(x, y)))
            .save(tiles.join("vh").join(&name))
            .unwrap();
        GrayImage::from_fn(size, size, |x, y| Luma([water_value(x, y, size)]))
            .save(tiles.join("water_body_label").join(&name))
            .unwrap();

        if split.has_flood_mask() {
            GrayImage::from_fn(size, size, |x, y| Luma([flood_value(x, y, size)]))
                .save(tiles.join("flood_label").join(&name))
                .unwrap();
        }
    }
}
