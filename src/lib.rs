//! ETCI 2021 洪水検出データセットのローダーとデータモジュール
//!
//! - [`dataset`]: ディレクトリの索引作成、画像・マスクの読み込み、分割
//! - [`ml`]: Burn 用のバッチャーとデータモジュール（`ml` フィーチャー）
//! - [`config`]: JSON設定ファイル
//! - [`logging`]: `tracing` の初期化

pub mod error;
pub mod config;
pub mod logging;
pub mod dataset;
#[cfg(feature = "ml")]
pub mod ml;

pub use error::{DatasetError, Result};
pub use config::{AppConfig, DataModuleConfig, DeviceType};
pub use dataset::{Etci2021, FloodSample, Split};
#[cfg(feature = "ml")]
pub use ml::{Etci2021DataModule, FloodBatch, FloodBatcher};
