//! エラー型の定義
//!
//! データセットの索引作成・読み込み・分割で発生するエラーをまとめます。
//! 設定ファイルやCLIなどアプリケーション層では `anyhow` を使います。

use std::path::PathBuf;

use thiserror::Error;

/// データセット操作のエラー
#[derive(Error, Debug)]
pub enum DatasetError {
    /// スプリットのルートディレクトリが存在しない
    #[error("Dataset not found at '{path}'. Extract {archive} into the root directory")]
    NotFound { path: PathBuf, archive: &'static str },

    /// 不正なスプリット名
    #[error("Invalid split '{0}': expected one of \"train\", \"val\", \"test\"")]
    InvalidSplit(String),

    /// 画像のデコード失敗
    #[error("Failed to load image at '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// インデックスが範囲外
    #[error("Index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// 浸水マスクを持たないサンプル
    #[error("Sample has no flood mask ({channels} mask channel(s))")]
    MissingFloodMask { channels: usize },

    /// 配列の形状が一致しない
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// random_split の長さの合計がデータセット長と一致しない
    #[error("Sum of split lengths ({total}) does not equal dataset length ({len})")]
    SplitLengths { total: usize, len: usize },

    /// setup() 前にデータローダーを要求した
    #[error("Data module is not set up: call setup() first")]
    NotSetUp,

    /// 設定値の不正
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// このクレートの Result 型
pub type Result<T> = std::result::Result<T, DatasetError>;
