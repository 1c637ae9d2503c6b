//! データセットのスプリット定義
//!
//! スプリット名とディスク上のディレクトリ名は一致しないので注意:
//! 検証用 `val` は `test/`、ラベル無しの `test` は `test_internal/` に展開される。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// 偏波バンド名（画像チャネルの並び順）
pub const BANDS: [&str; 2] = ["VV", "VH"];

/// マスク名
pub const MASKS: [&str; 2] = ["flood", "water_body"];

/// データセットのスプリット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// 学習用（浸水マスクあり）
    Train,
    /// 検証用（浸水マスクあり）
    Val,
    /// テスト用（水域マスクのみ）
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }

    /// データセットルート直下のディレクトリ名
    pub fn directory(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "test",
            Split::Test => "test_internal",
        }
    }

    /// 配布アーカイブのファイル名
    pub fn archive_filename(&self) -> &'static str {
        match self {
            Split::Train => "train.zip",
            Split::Val => "val_with_ref_labels.zip",
            Split::Test => "test_without_ref_labels.zip",
        }
    }

    /// 浸水マスクが含まれるか
    pub fn has_flood_mask(&self) -> bool {
        !matches!(self, Split::Test)
    }
}

impl Default for Split {
    fn default() -> Self {
        Split::Train
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            other => Err(DatasetError::InvalidSplit(other.to_string())),
        }
    }
}
