//! 분석 엔진 통합 테스트
//!
//! 가치 시계열에서 보고서 전체까지의 흐름을 검증합니다.

use chrono::{Duration, NaiveDate};
use folio_analytics::{AnalysisRequest, AnalyticsEngine};
use folio_core::{AnalyticsConfig, AnalyticsError, BenchmarkInput, PeriodSelector, ValueSeries};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn daily_series(first: NaiveDate, values: &[Decimal]) -> ValueSeries {
    ValueSeries::from_pairs(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (first + Duration::days(i as i64), *v)),
    )
    .unwrap()
}

/// 결정적인 의사 난수 가치 시계열 (양수 유지).
fn synthetic_nav(days: usize, seed: u64, drift: f64) -> Vec<Decimal> {
    let mut state = seed;
    let mut value = 100_000.0_f64;
    let mut out = Vec::with_capacity(days);
    for _ in 0..days {
        out.push(Decimal::from_f64_retain(value).unwrap().round_dp(2));
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let noise = ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5;
        value *= 1.0 + drift + noise * 0.03;
    }
    out
}

fn engine() -> AnalyticsEngine {
    AnalyticsEngine::new(AnalyticsConfig::default()).unwrap()
}

#[test]
fn test_end_to_end_four_day_scenario() {
    let nav = daily_series(start(), &[dec!(1.0), dec!(1.05), dec!(1.02), dec!(1.10)]);
    let report = engine()
        .analyze(&AnalysisRequest::new(nav, dec!(100)))
        .unwrap();
    let m = &report.metrics;

    assert_eq!(report.trading_days, 3);
    assert!((m.cumulative_return - 0.10).abs() < 1e-12);
    assert!((m.best_day - 0.078431).abs() < 1e-6);
    assert!((m.worst_day + 0.028571).abs() < 1e-6);
    assert!((m.win_rate - 2.0 / 3.0).abs() < 1e-12);

    // 이력 부족: 롤링 결과는 비어 있음
    assert!(report.rolling.is_empty());
    assert_eq!(report.yearly.len(), 1);
    assert!((report.yearly[0].return_value - 0.10).abs() < 1e-12);
}

#[test]
fn test_drawdown_scenario() {
    let nav = daily_series(
        start(),
        &[dec!(100), dec!(90), dec!(95), dec!(110), dec!(100), dec!(120)],
    );
    let report = engine()
        .analyze(&AnalysisRequest::new(nav, dec!(100)))
        .unwrap();
    let dd = &report.drawdowns;

    let worst = &dd.worst[0];
    assert_eq!(worst.trough_value, dec!(90));
    assert!((worst.depth + 0.10).abs() < 1e-12);
    assert!(worst.is_recovered());
    assert_eq!(worst.trough_date, start() + Duration::days(1));
    assert!(dd.episodes.iter().all(|e| e.is_recovered()));
    assert_eq!(dd.current_drawdown, 0.0);
    assert!((report.metrics.max_drawdown + 0.10).abs() < 1e-12);
    assert_eq!(report.metrics.current_drawdown, 0.0);
}

#[test]
fn test_full_report_with_benchmark() {
    let nav = daily_series(start(), &synthetic_nav(400, 7, 0.0006));
    let bench = daily_series(start(), &synthetic_nav(400, 11, 0.0003));
    let request = AnalysisRequest::new(nav, dec!(100000))
        .with_benchmark(BenchmarkInput::new("nasdaq100", bench));

    let report = engine().analyze(&request).unwrap();
    let bundle = report.benchmark.as_ref().unwrap();

    assert_eq!(bundle.benchmark_name, "NASDAQ 100");
    assert_eq!(bundle.aligned_days, 399);
    assert!((-1.0..=1.0).contains(&bundle.stats.correlation));
    assert!((bundle.stats.r_squared - bundle.stats.correlation.powi(2)).abs() < 1e-12);

    // 롤링: 선호 윈도우 20 → 399 - 20 + 1 포인트, 모두 베타 보유
    assert_eq!(report.rolling.len(), 380);
    assert!(report.rolling.iter().all(|p| p.beta.is_some()));

    // 월별 복리 = 연도별 복리
    let from_months: f64 = report
        .monthly
        .iter()
        .fold(1.0, |acc, m| acc * (1.0 + m.return_value))
        - 1.0;
    let from_years: f64 = report
        .yearly
        .iter()
        .fold(1.0, |acc, y| acc * (1.0 + y.return_value))
        - 1.0;
    assert!((from_months - from_years).abs() < 1e-9);
    assert!((from_years - report.metrics.cumulative_return).abs() < 1e-9);

    // 자산 곡선: 포트폴리오와 벤치마크 모두 1.0에서 시작
    let first = report.equity_curve.points()[0];
    assert_eq!(first.portfolio, 1.0);
    assert_eq!(first.benchmark, Some(1.0));
}

#[test]
fn test_self_benchmark_is_exact() {
    let values = synthetic_nav(60, 3, 0.0005);
    let nav = daily_series(start(), &values);
    let request = AnalysisRequest::new(nav.clone(), dec!(1000))
        .with_benchmark(BenchmarkInput::new("self", nav));

    let report = engine().analyze(&request).unwrap();
    let stats = &report.benchmark.unwrap().stats;
    assert_eq!(stats.beta, 1.0);
    assert_eq!(stats.correlation, 1.0);
}

#[test]
fn test_report_serializes_to_json() {
    let nav = daily_series(start(), &synthetic_nav(30, 5, 0.001));
    let report = engine()
        .analyze(&AnalysisRequest::new(nav, dec!(100)))
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["trading_days"], 29);
    assert!(json["metrics"]["sharpe_ratio"].is_number());
    assert!(json["benchmark"].is_null());
}

#[test]
fn test_analyze_periods() {
    let nav = daily_series(start(), &synthetic_nav(400, 9, 0.0004));
    let request = AnalysisRequest::new(nav, dec!(100000));
    let periods = [
        PeriodSelector::Week,
        PeriodSelector::Month,
        PeriodSelector::Ytd,
        PeriodSelector::All,
    ];

    let reports = engine().analyze_periods(&request, &periods).unwrap();
    assert_eq!(reports.len(), 4);

    let last = start() + Duration::days(399);
    for report in &reports {
        assert_eq!(report.range.end, last);
        let result = report.result.as_ref().unwrap();
        assert_eq!(result.end_date, last);
    }

    let week = reports[0].result.as_ref().unwrap();
    assert_eq!(week.trading_days, 7);
    let all = reports[3].result.as_ref().unwrap();
    assert_eq!(all.start_date, start());
    assert_eq!(all.trading_days, 399);
    // 2025-02-03 기준 YTD는 2025-01-01부터
    let ytd = reports[2].result.as_ref().unwrap();
    assert_eq!(ytd.start_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
}

#[test]
fn test_period_with_single_point_fails_independently() {
    // 마지막 두 포인트가 8일 간격 → 7d 기간에는 포인트 하나만 남음
    let nav = ValueSeries::from_pairs(vec![
        (start(), dec!(100)),
        (start() + Duration::days(1), dec!(101)),
        (start() + Duration::days(9), dec!(102)),
    ])
    .unwrap();
    let request = AnalysisRequest::new(nav, dec!(100));

    let reports = engine()
        .analyze_periods(&request, &[PeriodSelector::Week, PeriodSelector::All])
        .unwrap();

    assert!(matches!(
        reports[0].result,
        Err(AnalyticsError::InsufficientData { actual: 1, .. })
    ));
    assert!(reports[1].result.is_ok());
}

#[test]
fn test_compare_benchmarks_skips_disjoint() {
    let nav = daily_series(start(), &synthetic_nav(100, 1, 0.0005));
    let benchmarks = vec![
        BenchmarkInput::new("sp500", daily_series(start(), &synthetic_nav(100, 2, 0.0002))),
        BenchmarkInput::new(
            "gold",
            daily_series(start() + Duration::days(500), &synthetic_nav(50, 3, 0.0)),
        ),
        BenchmarkInput::new("btc", daily_series(start(), &synthetic_nav(100, 4, 0.001))),
    ];

    let bundles = engine().compare_benchmarks(&nav, &benchmarks).unwrap();
    let ids: Vec<&str> = bundles.iter().map(|b| b.benchmark_id.as_str()).collect();
    assert_eq!(ids, vec!["sp500", "btc"]);
    assert_eq!(bundles[1].benchmark_name, "Bitcoin");
}
