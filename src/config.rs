//! アプリケーション設定管理モジュール
//!
//! 計算デバイスやデータモジュール設定などをJSON形式で保存・読み込みします。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::DatasetError;

/// 計算デバイスの種類
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum DeviceType {
    /// WGPU (GPU) バックエンド
    Wgpu,
    /// NdArray (CPU) バックエンド
    Cpu,
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Cpu
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Wgpu => write!(f, "WGPU (GPU)"),
            DeviceType::Cpu => write!(f, "CPU (NdArray)"),
        }
    }
}

/// データモジュール設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataModuleConfig {
    /// データセットのルートディレクトリ
    pub root_dir: PathBuf,
    /// random_split に使うシード
    #[serde(default)]
    pub seed: u64,
    /// バッチサイズ
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// データローダーのワーカー数（0 ならオンデマンド読み込み）
    #[serde(default)]
    pub num_workers: usize,
    /// train スプリットのうち学習に使う割合（残りが検証用）
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
}

fn default_batch_size() -> usize {
    64
}

fn default_train_fraction() -> f64 {
    0.8
}

impl Default for DataModuleConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("data"),
            seed: 0,
            batch_size: default_batch_size(),
            num_workers: 0,
            train_fraction: default_train_fraction(),
        }
    }
}

impl DataModuleConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// 設定値を検証
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.batch_size == 0 {
            return Err(DatasetError::Config("batch_size must be at least 1".to_string()));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(DatasetError::Config(format!(
                "train_fraction must be in (0, 1), got {}",
                self.train_fraction
            )));
        }
        Ok(())
    }
}

/// ログ設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// trace / debug / info / warn / error
    pub level: String,
    /// ANSIカラーを使うか
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    /// 時刻を表示するか
    #[serde(default = "default_true")]
    pub timestamps: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi_colors: true,
            timestamps: true,
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 計算デバイスの種類
    #[serde(default)]
    pub device_type: DeviceType,
    /// データモジュール設定
    #[serde(default)]
    pub data: DataModuleConfig,
    /// ログ設定
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// 設定ファイルのデフォルトパス
    pub fn default_path() -> PathBuf {
        PathBuf::from("etci2021.json")
    }

    /// 設定を読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.data.validate()?;
        Ok(config)
    }

    /// 設定を読み込む、存在しない場合や読み込めない場合はデフォルト設定を返す
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::load(path) {
                Ok(config) => {
                    info!("設定ファイルを読み込みました: {}", path.display());
                    config
                }
                Err(e) => {
                    warn!(
                        "警告: 設定ファイルの読み込みに失敗しました ({}): {}",
                        path.display(),
                        e
                    );
                    warn!("デフォルト設定を使用します");
                    Self::default()
                }
            }
        } else {
            info!("設定ファイルが存在しません。デフォルト設定を使用します");
            Self::default()
        }
    }

    /// 設定を保存する
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定情報を表示
    pub fn display(&self) {
        println!("=== アプリケーション設定 ===");
        println!("計算デバイス: {}", self.device_type);
        println!("\n--- データモジュール設定 ---");
        println!("ルート: {}", self.data.root_dir.display());
        println!("シード: {}", self.data.seed);
        println!("バッチサイズ: {}", self.data.batch_size);
        println!("ワーカー数: {}", self.data.num_workers);
        println!("学習データの割合: {}", self.data.train_fraction);
        println!("\n--- ログ設定 ---");
        println!("レベル: {}", self.logging.level);
        println!("時刻表示: {}", self.logging.timestamps);
        println!("========================\n");
    }
}
