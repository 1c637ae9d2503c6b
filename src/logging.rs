//! ログ出力の初期化
//!
//! `tracing` のサブスクライバを設定します。

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::LoggingSettings;

/// ログ設定
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 出力する最低レベル
    pub level: Level,
    /// 時刻を表示するか
    pub timestamps: bool,
    /// モジュールパスを表示するか
    pub include_target: bool,
    /// ANSIカラーを使うか
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            timestamps: true,
            include_target: false,
            ansi_colors: true,
        }
    }
}

impl LogConfig {
    /// デバッグ用の詳細設定
    pub fn verbose() -> Self {
        Self {
            level: Level::DEBUG,
            timestamps: true,
            include_target: true,
            ansi_colors: true,
        }
    }

    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            level: parse_level(&settings.level),
            timestamps: settings.timestamps,
            include_target: false,
            ansi_colors: settings.ansi_colors,
        }
    }
}

/// レベル名を解釈（不明な値は INFO）
pub fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// グローバルなログ出力を初期化
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(config.level)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .compact();

    // without_time() でビルダーの型が変わるため分岐ごとに登録する
    let result = if config.timestamps {
        tracing::subscriber::set_global_default(builder.finish())
    } else {
        tracing::subscriber::set_global_default(builder.without_time().finish())
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
