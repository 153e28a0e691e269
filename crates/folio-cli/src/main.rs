//! 포트폴리오 성과 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 전체 기간 분석 (표 출력)
//! folio analyze --nav data/nav.csv
//!
//! # S&P 500 대비 최근 1년 분석 (JSON)
//! folio analyze --nav data/nav.csv --benchmark sp500 --benchmark-file data/spx.csv \
//!     --period 1y --format json
//!
//! # 여러 벤치마크 비교
//! folio compare --nav data/nav.csv --benchmark-file sp500=data/spx.csv \
//!     --benchmark-file gold=data/gold.csv
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use folio_analytics::AnalyticsEngine;
use folio_cli::commands::analyze::{run_analyze, AnalyzeConfig};
use folio_cli::commands::compare::{run_compare, CompareConfig};
use folio_cli::commands::output::OutputFormat;
use folio_core::{init_logging, AnalyticsConfig, LogConfig, PeriodSelector};
use rust_decimal::Decimal;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio performance analytics - 수익률, 낙폭, 위험 지표, 벤치마크 비교", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 포트폴리오 성과 분석
    Analyze {
        /// 포트폴리오 CSV (date,total_assets)
        #[arg(short, long)]
        nav: PathBuf,

        /// 벤치마크 식별자 (예: sp500, nasdaq100, gold)
        #[arg(short, long)]
        benchmark: Option<String>,

        /// 벤치마크 CSV (date,close)
        #[arg(long)]
        benchmark_file: Option<PathBuf>,

        /// 분석 기간 (7d, 1m, 6m, 1y, mtd, ytd, all)
        #[arg(short, long, default_value = "all")]
        period: String,

        /// 초기 자본금
        #[arg(long, default_value = "100000")]
        capital: String,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 여러 벤치마크와 비교
    Compare {
        /// 포트폴리오 CSV (date,total_assets)
        #[arg(short, long)]
        nav: PathBuf,

        /// 벤치마크 (id=path 형식, 여러 번 지정 가능)
        #[arg(long = "benchmark-file", required = true)]
        benchmarks: Vec<String>,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalyticsConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AnalyticsConfig::load_default().context("Failed to load default config")?,
    };

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    let engine = AnalyticsEngine::new(config).context("Invalid analytics config")?;

    match cli.command {
        Commands::Analyze {
            nav,
            benchmark,
            benchmark_file,
            period,
            capital,
            format,
            output,
        } => {
            let period = PeriodSelector::from_str(&period)
                .map_err(|e| anyhow!("{}. Supported: 7d, 1m, 6m, 1y, mtd, ytd, all", e))?;
            let capital = Decimal::from_str(&capital)
                .with_context(|| format!("Invalid capital: {}", capital))?;

            let config = AnalyzeConfig {
                nav,
                benchmark,
                benchmark_file,
                period,
                capital,
                format: OutputFormat::parse(&format)?,
                output,
            };

            match run_analyze(&engine, config) {
                Ok(report) => {
                    info!(trading_days = report.trading_days, "Analysis finished");
                }
                Err(e) => {
                    error!("Analyze failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Compare {
            nav,
            benchmarks,
            format,
            output,
        } => {
            let config = CompareConfig {
                nav,
                benchmarks,
                format: OutputFormat::parse(&format)?,
                output,
            };

            match run_compare(&engine, config) {
                Ok(bundles) => {
                    info!(benchmarks = bundles.len(), "Comparison finished");
                }
                Err(e) => {
                    error!("Compare failed: {:#}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
