//! # Stride CLI
//!
//! Command-line tool for Stride motion files.
//!
//! 读取 TOML 运动文件，用文件中的起始状态拼接起点，计算所有轨迹，然后：
//!
//! ```bash
//! # 以 50Hz 采样并输出 CSV
//! stride-cli sample walk.toml --rate 50
//!
//! # 使用拟合配置，输出 JSON 到文件
//! stride-cli sample walk.toml --config fit.toml --format json --output walk.json
//!
//! # 打印轨迹概要
//! stride-cli inspect walk.toml
//! ```
//!
//! 日志级别通过 `RUST_LOG` 调整，例如 `RUST_LOG=stride_motion=debug`。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod motion_file;

use commands::{InspectCommand, SampleCommand};

/// Stride CLI - 运动文件命令行工具
#[derive(Parser, Debug)]
#[command(name = "stride-cli")]
#[command(about = "Load, splice, compute and sample Stride motion files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 按固定频率采样轨迹
    Sample {
        #[command(flatten)]
        args: SampleCommand,
    },

    /// 打印轨迹概要
    Inspect {
        #[command(flatten)]
        args: InspectCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stride_cli=info".parse()?)
                .add_directive("stride_motion=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sample { args } => args.execute(),
        Commands::Inspect { args } => args.execute(),
    }
}
