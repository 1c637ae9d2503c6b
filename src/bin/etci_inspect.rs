//! ETCI 2021 データセットの確認用CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::tensor::{backend::Backend, ElementConversion};
use clap::{Parser, Subcommand};
use tracing::info;

use etci_flood::config::{AppConfig, DeviceType};
use etci_flood::dataset::{DatasetSummary, Etci2021, Split};
use etci_flood::logging::{init_logging, LogConfig};
use etci_flood::ml::{Etci2021DataModule, FloodDataLoader};

#[derive(Parser, Debug)]
#[command(name = "etci_inspect")]
#[command(about = "Inspect the ETCI 2021 flood detection dataset", long_about = None)]
struct Cli {
    /// 設定ファイル
    #[arg(short, long, default_value_os_t = AppConfig::default_path())]
    config: PathBuf,

    /// データセットのルート（設定ファイルの値を上書き）
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// 詳細ログ
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// スプリットの索引を作成して要約を表示
    Index {
        /// train / val / test
        #[arg(short, long, default_value = "train")]
        split: String,

        /// 要約をJSONで保存する先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 1サンプルを読み込んで形状とマスクの統計を表示
    Sample {
        #[arg(short, long, default_value = "train")]
        split: String,

        #[arg(short, long, default_value = "0")]
        index: usize,
    },

    /// データモジュールを構築して各データローダーのバッチを確認
    Batches {
        /// 各データローダーから取り出すバッチ数
        #[arg(short, long, default_value = "2")]
        num_batches: usize,

        #[arg(short, long)]
        batch_size: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// 現在の設定を表示
    Config {
        /// 設定ファイルに書き出す
        #[arg(long, default_value = "false")]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config);
    if let Some(root) = &cli.root {
        config.data.root_dir = root.clone();
    }

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::from_settings(&config.logging)
    };
    init_logging(&log_config)?;

    match cli.command {
        Commands::Index { split, output } => {
            let split: Split = split.parse()?;
            let dataset = Etci2021::new(&config.data.root_dir, split)?;
            let summary = DatasetSummary::from_dataset(&dataset);
            summary.print();

            if let Some(path) = output {
                summary.save(&path)?;
                info!("要約を保存しました: {}", path.display());
            }
        }
        Commands::Sample { split, index } => {
            let split: Split = split.parse()?;
            let dataset = Etci2021::new(&config.data.root_dir, split)?;
            let sample = dataset
                .sample(index)
                .with_context(|| format!("サンプル {} の読み込みに失敗しました", index))?;

            println!("画像: {:?}", sample.image.dims());
            println!("マスク: {:?}", sample.mask.dims());
            for c in 0..sample.mask.channels() {
                let plane = sample.mask.channel(c).unwrap_or_default();
                let positive = plane.iter().filter(|&&v| v > 0).count();
                println!(
                    "  マスク {}: {} / {} ピクセル ({:.2}%)",
                    c,
                    positive,
                    plane.len(),
                    100.0 * positive as f64 / plane.len().max(1) as f64
                );
            }
        }
        Commands::Batches {
            num_batches,
            batch_size,
            seed,
        } => {
            if let Some(batch_size) = batch_size {
                config.data.batch_size = batch_size;
            }
            if let Some(seed) = seed {
                config.data.seed = seed;
            }

            let mut module = Etci2021DataModule::new(config.data.clone())?;
            module.prepare_data()?;
            module.setup()?;

            info!("使用デバイス: {}", config.device_type);
            match config.device_type {
                DeviceType::Cpu => {
                    let device = burn_ndarray::NdArrayDevice::Cpu;
                    inspect_batches::<burn::backend::NdArray>(&module, &device, num_batches)?;
                }
                DeviceType::Wgpu => {
                    let device = burn_wgpu::WgpuDevice::default();
                    inspect_batches::<burn::backend::Wgpu>(&module, &device, num_batches)?;
                }
            }
        }
        Commands::Config { write } => {
            config.display();
            if write {
                config.save(&cli.config)?;
                info!("設定ファイルを保存しました: {}", cli.config.display());
            }
        }
    }

    Ok(())
}

fn inspect_batches<B: Backend>(
    module: &Etci2021DataModule,
    device: &B::Device,
    num_batches: usize,
) -> Result<()> {
    let loaders: [(&str, FloodDataLoader<B>); 3] = [
        ("train", module.train_dataloader::<B>(device)?),
        ("val", module.val_dataloader::<B>(device)?),
        ("test", module.test_dataloader::<B>(device)?),
    ];

    for (name, loader) in loaders {
        println!("--- {} ({} サンプル) ---", name, loader.num_items());
        for (i, batch) in loader.iter().take(num_batches).enumerate() {
            let flooded: i64 = batch.masks.clone().sum().into_scalar().elem();
            let total = batch.masks.dims().iter().product::<usize>();
            println!(
                "  バッチ {}: images={:?} masks={:?} 浸水ピクセル={:.2}%",
                i,
                batch.images.dims(),
                batch.masks.dims(),
                100.0 * flooded as f64 / total.max(1) as f64
            );
        }
    }

    Ok(())
}
