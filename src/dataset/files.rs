//! ディレクトリ構造からサンプルごとのファイルパスを収集する
//!
//! 想定するレイアウト:
//! ```text
//! <root>/<split dir>/<region>/tiles/vv/*.png
//!                                  /vh/*.png
//!                                  /water_body_label/*.png
//!                                  /flood_label/*.png   (train / val のみ)
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dataset::split::Split;
use crate::error::Result;

/// 1サンプル分のファイルパス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFiles {
    pub vv: PathBuf,
    pub vh: PathBuf,
    pub water_mask: PathBuf,
    /// test スプリットでは None
    pub flood_mask: Option<PathBuf>,
}

impl SampleFiles {
    /// 地域フォルダ名（`<region>/tiles/vv/xxx.png` の `<region>`）
    pub fn region(&self) -> Option<&str> {
        self.vv
            .parent()
            .and_then(Path::parent)
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
    }
}

/// スプリット内の全サンプルのファイルパスを収集
///
/// 地域フォルダはパス順、各フォルダ内のタイルもパス順に並ぶ。
/// 各サブディレクトリのファイル数が異なる場合は最短のものに揃える。
pub fn index_files(root: &Path, split: Split) -> Result<Vec<SampleFiles>> {
    let split_dir = root.join(split.directory());
    let mut files = Vec::new();

    for region in sorted_entries(&split_dir, |path| path.is_dir())? {
        let tiles = region.join("tiles");
        let vvs = list_pngs(&tiles.join("vv"))?;
        let vhs = list_pngs(&tiles.join("vh"))?;
        let water_masks = list_pngs(&tiles.join("water_body_label"))?;

        let before = files.len();
        if split.has_flood_mask() {
            let flood_masks = list_pngs(&tiles.join("flood_label"))?;
            warn_on_mismatch(
                &region,
                &[vvs.len(), vhs.len(), flood_masks.len(), water_masks.len()],
            );

            for (((vv, vh), flood_mask), water_mask) in vvs
                .into_iter()
                .zip(vhs)
                .zip(flood_masks)
                .zip(water_masks)
            {
                files.push(SampleFiles {
                    vv,
                    vh,
                    water_mask,
                    flood_mask: Some(flood_mask),
                });
            }
        } else {
            warn_on_mismatch(&region, &[vvs.len(), vhs.len(), water_masks.len()]);

            for ((vv, vh), water_mask) in vvs.into_iter().zip(vhs).zip(water_masks) {
                files.push(SampleFiles {
                    vv,
                    vh,
                    water_mask,
                    flood_mask: None,
                });
            }
        }

        debug!("{}: {} タイル", region.display(), files.len() - before);
    }

    Ok(files)
}

fn warn_on_mismatch(region: &Path, counts: &[usize]) {
    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);
    if min != max {
        warn!(
            "警告: {} のファイル数が一致しません {:?}。{} 件に切り詰めます",
            region.display(),
            counts,
            min
        );
    }
}

/// ディレクトリ内のPNGファイルをパス順に列挙（存在しない場合は空）
fn list_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    sorted_entries(dir, |path| {
        path.is_file() && path.extension().map_or(false, |ext| ext == "png")
    })
}

/// 隠しファイルを除いたエントリを条件で絞り込み、パス順に返す
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('.'));
        if !hidden && keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}
