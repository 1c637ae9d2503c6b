//! データセット索引の要約
//!
//! スプリットごとのサンプル数と地域別タイル数をJSONで保存・読み込みします。

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::etci2021::Etci2021;
use crate::dataset::split::Split;

/// データセット要約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub split: Split,

    /// データセットのルートディレクトリ
    pub root: String,

    /// ルート直下のスプリットディレクトリ名
    pub directory: String,

    /// 索引化されたサンプル数
    pub num_samples: usize,

    /// 浸水マスクを含むか
    pub has_flood_mask: bool,

    /// 地域名 -> タイル数
    pub regions: BTreeMap<String, usize>,

    /// 索引作成時刻（RFC3339形式）
    pub indexed_at: String,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Etci2021) -> Self {
        let mut regions = BTreeMap::new();
        for files in dataset.files() {
            let region = files.region().unwrap_or("<unknown>").to_string();
            *regions.entry(region).or_insert(0) += 1;
        }

        Self {
            split: dataset.split(),
            root: dataset.root().to_string_lossy().to_string(),
            directory: dataset.split().directory().to_string(),
            num_samples: dataset.len(),
            has_flood_mask: dataset.split().has_flood_mask(),
            regions,
            indexed_at: chrono::Local::now().to_rfc3339(),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize summary to JSON")
    }

    pub fn from_json_string(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize summary from JSON")
    }

    /// JSONファイルに保存（親ディレクトリは自動作成）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create parent directory: {:?}", parent))?;
        }
        std::fs::write(path, self.to_json_string()?)
            .context(format!("Failed to write summary: {:?}", path))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .context(format!("Failed to read summary: {:?}", path))?;
        Self::from_json_string(&json)
    }

    /// 要約をコンソールに表示
    pub fn print(&self) {
        println!("\n=== ETCI2021 {} ===", self.split);
        println!("ルート: {}", self.root);
        println!("ディレクトリ: {}", self.directory);
        println!("サンプル数: {}", self.num_samples);
        println!("浸水マスク: {}", if self.has_flood_mask { "あり" } else { "なし" });
        println!("地域:");
        for (region, count) in &self.regions {
            println!("  {}: {} タイル", region, count);
        }
        println!("索引作成日時: {}", self.indexed_at);
        println!("========================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::write_region;

    #[test]
    fn test_summary_counts_regions() {
        let dir = tempfile::tempdir().unwrap();
        write_region(dir.path(), Split::Train, "bangladesh", 3, 4);
        write_region(dir.path(), Split::Train, "nebraska", 2, 4);

        let dataset = Etci2021::new(dir.path(), Split::Train).unwrap();
        let summary = DatasetSummary::from_dataset(&dataset);
        assert_eq!(summary.num_samples, 5);
        assert_eq!(summary.regions["bangladesh"], 3);
        assert_eq!(summary.regions["nebraska"], 2);
        assert!(summary.has_flood_mask);
    }

    #[test]
    fn test_summary_save_load() {
        let dir = tempfile::tempdir().unwrap();
        write_region(dir.path(), Split::Test, "r", 1, 4);

        let dataset = Etci2021::new(dir.path(), Split::Test).unwrap();
        let summary = DatasetSummary::from_dataset(&dataset);
        let path = dir.path().join("reports/test.json");
        summary.save(&path).unwrap();

        let loaded = DatasetSummary::load(&path).unwrap();
        assert_eq!(loaded, summary);
        assert_eq!(loaded.directory, "test_internal");
    }
}
