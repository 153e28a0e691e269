//! `folio compare` 명령.
//!
//! 하나의 포트폴리오를 여러 벤치마크와 비교해 요약 표를 출력합니다.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use folio_analytics::{AnalyticsEngine, BenchmarkBundle};
use folio_core::{format_pct, BenchmarkInput};
use tracing::warn;

use super::load::{load_benchmark, load_nav, parse_benchmark_arg};
use super::output::{write_output, OutputFormat};

/// 비교 명령 설정.
#[derive(Debug)]
pub struct CompareConfig {
    /// 포트폴리오 CSV 경로
    pub nav: PathBuf,
    /// `id=path` 벤치마크 목록
    pub benchmarks: Vec<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<PathBuf>,
}

/// 벤치마크 비교를 실행하고 결과를 출력합니다.
pub fn run_compare(engine: &AnalyticsEngine, config: CompareConfig) -> Result<Vec<BenchmarkBundle>> {
    let nav = load_nav(&config.nav)?;
    let inputs = config
        .benchmarks
        .iter()
        .map(|arg| {
            let (id, path) = parse_benchmark_arg(arg)?;
            load_benchmark(&id, &path)
        })
        .collect::<Result<Vec<BenchmarkInput>>>()?;

    let bundles = engine
        .compare_benchmarks(&nav, &inputs)
        .context("Benchmark comparison failed")?;
    if bundles.len() < inputs.len() {
        warn!(
            requested = inputs.len(),
            compared = bundles.len(),
            "Some benchmarks had no common dates with the portfolio"
        );
    }

    let content = match config.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&bundles).context("Failed to serialize comparison")?
        }
        OutputFormat::Table => format_table(&bundles),
    };
    write_output(&content, config.output.as_deref())?;

    Ok(bundles)
}

/// 비교 결과 표.
pub fn format_table(bundles: &[BenchmarkBundle]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<20} {:>6} {:>10} {:>10} {:>10} {:>7} {:>7} {:>7} {:>7}",
        "BENCHMARK", "DAYS", "STRATEGY", "BENCH", "ALPHA", "BETA", "CORR", "UP", "DOWN"
    );
    out.push_str(&"-".repeat(94));
    out.push('\n');

    for b in bundles {
        let _ = writeln!(
            out,
            "{:<20} {:>6} {:>10} {:>10} {:>10} {:>7.2} {:>7.2} {:>7.2} {:>7.2}",
            truncate(&b.benchmark_name, 20),
            b.aligned_days,
            format_pct(b.strategy_return),
            format_pct(b.benchmark_return),
            format_pct(b.stats.alpha),
            b.stats.beta,
            b.stats.correlation,
            b.stats.up_capture,
            b.stats.down_capture
        );
    }

    out.push('\n');
    let _ = write!(out, "Total: {} benchmarks", bundles.len());
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_analytics::BenchmarkStats;

    fn bundle(name: &str) -> BenchmarkBundle {
        BenchmarkBundle {
            benchmark_id: "x".to_string(),
            benchmark_name: name.to_string(),
            benchmark_return: 0.05,
            strategy_return: 0.08,
            aligned_days: 250,
            stats: BenchmarkStats {
                alpha: 0.02,
                beta: 0.9,
                correlation: 0.8,
                r_squared: 0.64,
                tracking_error: 0.1,
                information_ratio: 0.3,
                up_capture: 1.1,
                down_capture: 0.7,
            },
        }
    }

    #[test]
    fn test_format_table() {
        let table = format_table(&[bundle("S&P 500"), bundle("Gold")]);
        assert!(table.contains("S&P 500"));
        assert!(table.contains("8.00%"));
        assert!(table.ends_with("Total: 2 benchmarks"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("a very long benchmark name", 10), "a very ...");
    }
}
