//! `folio analyze` 명령.
//!
//! 포트폴리오 CSV와 (선택적) 벤치마크 CSV를 읽어 기간을 잘라낸 뒤
//! 분석 보고서를 JSON 또는 표로 출력합니다.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use folio_analytics::{AnalysisRequest, AnalyticsEngine, AnalyticsReport};
use folio_core::{format_pct, PeriodSelector};
use rust_decimal::Decimal;
use tracing::info;

use super::load::{load_benchmark, load_nav};
use super::output::{optional_pct, write_output, OutputFormat};

/// 분석 명령 설정.
#[derive(Debug)]
pub struct AnalyzeConfig {
    /// 포트폴리오 CSV 경로
    pub nav: PathBuf,
    /// 벤치마크 식별자
    pub benchmark: Option<String>,
    /// 벤치마크 CSV 경로
    pub benchmark_file: Option<PathBuf>,
    /// 분석 기간
    pub period: PeriodSelector,
    /// 초기 자본
    pub capital: Decimal,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<PathBuf>,
}

/// 분석을 실행하고 결과를 출력합니다.
pub fn run_analyze(engine: &AnalyticsEngine, config: AnalyzeConfig) -> Result<AnalyticsReport> {
    let request = build_request(&config)?;
    let report = engine
        .analyze(&request)
        .with_context(|| format!("Analysis failed for period {}", config.period))?;

    let content = match config.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        }
        OutputFormat::Table => format_report(&report, config.period),
    };
    write_output(&content, config.output.as_deref())?;

    Ok(report)
}

/// 파일을 읽고 기간을 적용한 요청을 만듭니다.
pub fn build_request(config: &AnalyzeConfig) -> Result<AnalysisRequest> {
    let nav = load_nav(&config.nav)?;
    let mut request = AnalysisRequest::new(nav, config.capital);

    match (&config.benchmark, &config.benchmark_file) {
        (id, Some(path)) => {
            let id = id.clone().unwrap_or_else(|| "benchmark".to_string());
            request = request.with_benchmark(load_benchmark(&id, path)?);
        }
        (Some(id), None) => {
            return Err(anyhow!(
                "Benchmark '{}' requires --benchmark-file with its price history",
                id
            ))
        }
        (None, None) => {}
    }

    let range = request
        .portfolio
        .range()
        .ok_or_else(|| anyhow!("NAV file contains no rows"))?;
    let period_range = config.period.resolve(range.start, range.end);
    info!(
        period = %config.period,
        start = %period_range.start,
        end = %period_range.end,
        "Resolved analysis period"
    );

    Ok(request.slice(&period_range))
}

/// 보고서를 표 형식 문자열로 변환합니다.
pub fn format_report(report: &AnalyticsReport, period: PeriodSelector) -> String {
    let m = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Period {} ({} ~ {}, {} trading days)",
        period, report.start_date, report.end_date, report.trading_days
    );
    let _ = writeln!(
        out,
        "NAV {} -> {}",
        report.initial_value, report.final_value
    );
    out.push_str(&"-".repeat(48));
    out.push('\n');

    let rows: [(&str, String); 16] = [
        ("Cumulative return", format_pct(m.cumulative_return)),
        ("CAGR", format_pct(m.annualized_return)),
        ("YTD", optional_pct(m.ytd_return)),
        ("MTD", optional_pct(m.mtd_return)),
        ("Volatility", format_pct(m.volatility)),
        ("Sharpe", format!("{:.2}", m.sharpe_ratio)),
        ("Sortino", format!("{:.2}", m.sortino_ratio)),
        ("Calmar", format!("{:.2}", m.calmar_ratio)),
        ("Max drawdown", format_pct(m.max_drawdown)),
        ("Current drawdown", format_pct(m.current_drawdown)),
        ("Win rate", format_pct(m.win_rate)),
        ("Profit factor", format_ratio(m.profit_factor)),
        ("Best day", format_pct(m.best_day)),
        ("Worst day", format_pct(m.worst_day)),
        ("VaR 95%", format_pct(m.var_95)),
        ("CVaR 95%", format_pct(m.cvar_95)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<20} {:>16}", label, value);
    }

    if let Some(bench) = &report.benchmark {
        out.push('\n');
        let _ = writeln!(
            out,
            "vs {} ({} common days)",
            bench.benchmark_name, bench.aligned_days
        );
        out.push_str(&"-".repeat(48));
        out.push('\n');
        let bench_rows = [
            ("Strategy return", format_pct(bench.strategy_return)),
            ("Benchmark return", format_pct(bench.benchmark_return)),
            ("Alpha", format_pct(bench.stats.alpha)),
            ("Beta", format!("{:.2}", bench.stats.beta)),
            ("Correlation", format!("{:.2}", bench.stats.correlation)),
            ("Information ratio", format!("{:.2}", bench.stats.information_ratio)),
            ("Up capture", format!("{:.2}", bench.stats.up_capture)),
            ("Down capture", format!("{:.2}", bench.stats.down_capture)),
        ];
        for (label, value) in bench_rows {
            let _ = writeln!(out, "{:<20} {:>16}", label, value);
        }
    }

    if !report.drawdowns.worst.is_empty() {
        out.push('\n');
        let _ = writeln!(
            out,
            "{:<12} {:<12} {:<12} {:>9} {:>6}",
            "START", "TROUGH", "END", "DEPTH", "DAYS"
        );
        for episode in &report.drawdowns.worst {
            let end = episode
                .end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "open".to_string());
            let _ = writeln!(
                out,
                "{:<12} {:<12} {:<12} {:>9} {:>6}",
                episode.start_date,
                episode.trough_date,
                end,
                format_pct(episode.depth),
                episode.duration_days
            );
        }
    }

    if !report.yearly.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{:<6} {:>10} {:>16}", "YEAR", "RETURN", "PNL");
        for year in &report.yearly {
            let _ = writeln!(
                out,
                "{:<6} {:>10} {:>16}",
                year.year,
                format_pct(year.return_value),
                year.pnl
            );
        }
    }

    out
}

fn format_ratio(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use folio_core::{AnalyticsConfig, BenchmarkInput, ValueSeries};
    use rust_decimal_macros::dec;

    fn report(with_benchmark: bool) -> AnalyticsReport {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let values = [dec!(100), dec!(104), dec!(99), dec!(103), dec!(108), dec!(107)];
        let series = ValueSeries::from_pairs(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::days(i as i64), *v)),
        )
        .unwrap();
        let mut request = AnalysisRequest::new(series.clone(), dec!(1000));
        if with_benchmark {
            request = request.with_benchmark(BenchmarkInput::new("sp500", series));
        }
        AnalyticsEngine::new(AnalyticsConfig::default())
            .unwrap()
            .analyze(&request)
            .unwrap()
    }

    #[test]
    fn test_table_contains_sections() {
        let table = format_report(&report(true), PeriodSelector::All);

        assert!(table.contains("Period all (2024-01-01 ~ 2024-01-06, 5 trading days)"));
        assert!(table.contains("Cumulative return"));
        assert!(table.contains("vs S&P 500 (5 common days)"));
        assert!(table.contains("START"));
        assert!(table.contains("YEAR"));
    }

    #[test]
    fn test_table_without_benchmark() {
        let table = format_report(&report(false), PeriodSelector::Ytd);
        assert!(table.starts_with("Period ytd"));
        assert!(!table.contains("vs "));
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(f64::INFINITY), "inf");
        assert_eq!(format_ratio(1.5), "1.50");
    }
}
