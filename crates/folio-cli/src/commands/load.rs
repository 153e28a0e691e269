//! CSV 시계열 로딩.
//!
//! - 포트폴리오: `date,total_assets`
//! - 벤치마크: `date,close`
//!
//! 행은 로딩 후 날짜순으로 정렬됩니다. 같은 날짜가 두 번 나오면 에러입니다.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use folio_core::{BenchmarkInput, ValuePoint, ValueSeries};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

/// 포트폴리오 순자산 행.
#[derive(Debug, Deserialize)]
struct NavRow {
    date: NaiveDate,
    total_assets: Decimal,
}

/// 벤치마크 종가 행.
#[derive(Debug, Deserialize)]
struct CloseRow {
    date: NaiveDate,
    close: Decimal,
}

/// 포트폴리오 CSV 파일을 읽습니다.
pub fn load_nav(path: &Path) -> Result<ValueSeries> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open NAV file: {}", path.display()))?;
    let series = read_nav(file).with_context(|| format!("Invalid NAV file: {}", path.display()))?;
    info!(path = %path.display(), points = series.len(), "Loaded portfolio series");
    Ok(series)
}

/// 벤치마크 CSV 파일을 읽습니다.
pub fn load_benchmark(id: &str, path: &Path) -> Result<BenchmarkInput> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open benchmark file: {}", path.display()))?;
    let series = read_closes(file)
        .with_context(|| format!("Invalid benchmark file: {}", path.display()))?;
    info!(benchmark = id, points = series.len(), "Loaded benchmark series");
    Ok(BenchmarkInput::new(id, series))
}

/// `date,total_assets` 형식을 읽습니다.
pub fn read_nav<R: Read>(reader: R) -> Result<ValueSeries> {
    let mut points = Vec::new();
    for (line, row) in csv::Reader::from_reader(reader).deserialize::<NavRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed row {}", line + 2))?;
        points.push(ValuePoint::new(row.date, row.total_assets));
    }
    into_series(points)
}

/// `date,close` 형식을 읽습니다.
pub fn read_closes<R: Read>(reader: R) -> Result<ValueSeries> {
    let mut points = Vec::new();
    for (line, row) in csv::Reader::from_reader(reader).deserialize::<CloseRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed row {}", line + 2))?;
        points.push(ValuePoint::new(row.date, row.close));
    }
    into_series(points)
}

fn into_series(mut points: Vec<ValuePoint>) -> Result<ValueSeries> {
    points.sort_by_key(|p| p.date);
    Ok(ValueSeries::new(points)?)
}

/// `id=path` 형식의 벤치마크 인자를 분리합니다.
pub fn parse_benchmark_arg(arg: &str) -> Result<(String, PathBuf)> {
    match arg.split_once('=') {
        Some((id, path)) if !id.trim().is_empty() && !path.trim().is_empty() => {
            Ok((id.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(anyhow!(
            "Invalid benchmark argument: {}. Expected id=path",
            arg
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::AnalyticsError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_read_nav_sorts_rows() {
        let csv = "date,total_assets\n2024-01-03,102.5\n2024-01-01,100\n2024-01-02,101\n";
        let series = read_nav(csv.as_bytes()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(series.last().unwrap().value, dec!(102.5));
    }

    #[test]
    fn test_read_closes() {
        let csv = "date,close\n2024-02-01,4800.25\n2024-02-02,4810.00\n";
        let series = read_closes(csv.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let csv = "date,total_assets\n2024-01-01,100\n2024-01-01,101\n";
        let err = read_nav(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalyticsError>(),
            Some(AnalyticsError::UnorderedSeries { .. })
        ));
    }

    #[test]
    fn test_non_positive_value_rejected() {
        let csv = "date,total_assets\n2024-01-01,100\n2024-01-02,0\n";
        let err = read_nav(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalyticsError>(),
            Some(AnalyticsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_malformed_row() {
        let csv = "date,total_assets\n2024-01-01,abc\n";
        assert!(read_nav(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_benchmark_arg() {
        let (id, path) = parse_benchmark_arg("sp500=data/spx.csv").unwrap();
        assert_eq!(id, "sp500");
        assert_eq!(path, PathBuf::from("data/spx.csv"));

        assert!(parse_benchmark_arg("sp500").is_err());
        assert!(parse_benchmark_arg("=data/spx.csv").is_err());
    }
}
