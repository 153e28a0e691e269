//! 분석 엔진
//!
//! 수익률 생성, 낙폭 분석, 위험/수익 지표, 벤치마크 비교, 롤링 지표,
//! 월별/연도별 집계를 한 번에 수행하여 [`AnalyticsReport`]를 만듭니다.
//!
//! 엔진은 상태가 없으며 모든 계산은 요청의 가치 시계열에서만 파생됩니다.
//! 기간 선택은 호출자 책임이며, [`AnalyticsEngine::analyze_periods`]는
//! 잘라낸 요청을 독립적으로 병렬 분석하는 보조 함수입니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use folio_analytics::{AnalysisRequest, AnalyticsEngine};
//! use folio_core::AnalyticsConfig;
//! use rust_decimal_macros::dec;
//!
//! let engine = AnalyticsEngine::new(AnalyticsConfig::load_default()?)?;
//! let request = AnalysisRequest::new(nav, dec!(100_000)).with_benchmark(sp500);
//! let report = engine.analyze(&request)?;
//!
//! println!("CAGR: {:.2}%", report.metrics.annualized_return * 100.0);
//! if let Some(bench) = &report.benchmark {
//!     println!("베타({}): {:.2}", bench.benchmark_name, bench.stats.beta);
//! }
//! ```

use chrono::NaiveDate;
use folio_core::{
    analysis_span, AnalyticsConfig, AnalyticsError, AnalyticsResult, BenchmarkInput, DateRange,
    PeriodSelector, ValueSeries,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::benchmark::{BenchmarkBundle, BenchmarkComparator};
use crate::cache::RollingCache;
use crate::drawdown::{DrawdownAnalyzer, DrawdownReport};
use crate::performance::{MetricsCalculator, RiskReturnBundle};
use crate::portfolio::{EquityCurve, MonthlyReturn, PeriodAggregator, YearlyReturn};
use crate::returns::{align, build_returns, compound, PairedReturns, MIN_VALUE_POINTS};
use crate::rolling::{RollingEngine, RollingInput, RollingPoint};

/// 분석 요청.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// 포트폴리오 순자산 가치 시계열
    pub portfolio: ValueSeries,
    /// 비교 벤치마크 (선택)
    pub benchmark: Option<BenchmarkInput>,
    /// 월별/연도별 손익 계산의 시작 잔고
    pub initial_capital: Decimal,
}

impl AnalysisRequest {
    pub fn new(portfolio: ValueSeries, initial_capital: Decimal) -> Self {
        Self {
            portfolio,
            benchmark: None,
            initial_capital,
        }
    }

    /// 벤치마크 설정.
    pub fn with_benchmark(mut self, benchmark: BenchmarkInput) -> Self {
        self.benchmark = Some(benchmark);
        self
    }

    /// 포트폴리오와 벤치마크를 같은 날짜 범위로 잘라낸 요청을 반환합니다.
    pub fn slice(&self, range: &DateRange) -> Self {
        Self {
            portfolio: self.portfolio.slice(range),
            benchmark: self
                .benchmark
                .as_ref()
                .map(|b| BenchmarkInput::new(b.id.clone(), b.series.slice(range))),
            initial_capital: self.initial_capital,
        }
    }

    fn benchmark_id(&self) -> &str {
        self.benchmark.as_ref().map_or("none", |b| b.id.as_str())
    }
}

/// 분석 결과 묶음.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// 첫 가치 포인트 날짜
    pub start_date: NaiveDate,
    /// 마지막 가치 포인트 날짜
    pub end_date: NaiveDate,
    /// 수익률 개수 (가치 포인트 수 - 1)
    pub trading_days: usize,
    /// 시작 순자산
    pub initial_value: Decimal,
    /// 종료 순자산
    pub final_value: Decimal,
    /// 위험/수익 지표
    pub metrics: RiskReturnBundle,
    /// 벤치마크 비교 (벤치마크가 없거나 공통 날짜가 부족하면 None)
    pub benchmark: Option<BenchmarkBundle>,
    /// 낙폭 분석
    pub drawdowns: DrawdownReport,
    /// 롤링 지표 (이력이 부족하면 비어 있음)
    pub rolling: Vec<RollingPoint>,
    /// 월별 수익률
    pub monthly: Vec<MonthlyReturn>,
    /// 연도별 수익률
    pub yearly: Vec<YearlyReturn>,
    /// 정규화 자산 곡선
    pub equity_curve: EquityCurve,
}

/// 기간별 분석 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    pub period: PeriodSelector,
    /// 적용된 날짜 범위
    pub range: DateRange,
    /// 잘라낸 시계열이 2개 포인트 미만이면 에러
    pub result: AnalyticsResult<AnalyticsReport>,
}

/// 포트폴리오 성과 분석 엔진.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    metrics: MetricsCalculator,
    comparator: BenchmarkComparator,
    drawdown: DrawdownAnalyzer,
    rolling: RollingEngine,
}

impl AnalyticsEngine {
    /// 설정을 검증하고 엔진을 생성합니다.
    ///
    /// # 에러
    ///
    /// 설정 값이 유효하지 않으면 [`AnalyticsError::Config`].
    pub fn new(config: AnalyticsConfig) -> AnalyticsResult<Self> {
        config.validate()?;

        Ok(Self {
            metrics: MetricsCalculator::new(config.metrics.clone()),
            comparator: BenchmarkComparator::new(&config.metrics),
            drawdown: DrawdownAnalyzer::new(config.drawdown.worst_n),
            rolling: RollingEngine::new(config.rolling.clone(), config.metrics.clone()),
            config,
        })
    }

    /// 요청 하나를 분석합니다.
    ///
    /// # 에러
    ///
    /// - 포트폴리오 가치 포인트가 2개 미만이면 [`AnalyticsError::InsufficientData`]
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalyticsResult<AnalyticsReport> {
        self.analyze_with(request, |input| self.rolling.compute(input))
    }

    /// 롤링 지표를 호출자 소유 캐시로 재사용하며 분석합니다.
    pub fn analyze_cached(
        &self,
        request: &AnalysisRequest,
        cache: &mut RollingCache,
    ) -> AnalyticsResult<AnalyticsReport> {
        self.analyze_with(request, |input| {
            cache.get_or_compute(&self.rolling, input).as_ref().clone()
        })
    }

    fn analyze_with<F>(&self, request: &AnalysisRequest, rolling: F) -> AnalyticsResult<AnalyticsReport>
    where
        F: FnOnce(&RollingInput<'_>) -> Vec<RollingPoint>,
    {
        let portfolio = &request.portfolio;
        let span = analysis_span!("analyze", portfolio.len(), request.benchmark_id());
        let _guard = span.enter();

        let (Some(first), Some(last)) = (portfolio.first(), portfolio.last()) else {
            return Err(AnalyticsError::InsufficientData {
                required: MIN_VALUE_POINTS,
                actual: portfolio.len(),
            });
        };

        let returns = build_returns(portfolio, request.benchmark.as_ref().map(|b| &b.series))?;
        let drawdowns = self.drawdown.analyze(portfolio);
        let metrics = self.metrics.compute(portfolio, &returns.strategy, &drawdowns)?;

        let benchmark = match (&request.benchmark, &returns.paired) {
            (Some(input), Some(paired)) => Some(self.bundle(&input.id, paired)?),
            (Some(input), None) => {
                warn!(
                    benchmark = %input.id,
                    benchmark_points = input.series.len(),
                    "Benchmark has fewer than 2 common dates, comparison omitted"
                );
                None
            }
            (None, _) => {
                debug!("No benchmark supplied");
                None
            }
        };

        let strategy_dates: Vec<NaiveDate> = returns.strategy.iter().map(|r| r.date).collect();
        let strategy_values = returns.strategy_values();
        let rolling_input = match &returns.paired {
            Some(paired) => {
                RollingInput::new(paired.dates(), paired.strategy(), Some(paired.benchmark()))
            }
            None => RollingInput::new(&strategy_dates, &strategy_values, None),
        };
        let rolling = rolling(&rolling_input);

        let aggregator = PeriodAggregator::new(request.initial_capital);
        let monthly = aggregator.monthly(&returns.strategy);
        let yearly = aggregator.yearly(&returns.strategy);
        let equity_curve = EquityCurve::build(portfolio, returns.paired.as_ref());

        info!(
            trading_days = returns.strategy.len(),
            cumulative_return = metrics.cumulative_return,
            max_drawdown = metrics.max_drawdown,
            rolling_points = rolling.len(),
            "Analysis complete"
        );

        Ok(AnalyticsReport {
            start_date: first.date,
            end_date: last.date,
            trading_days: returns.strategy.len(),
            initial_value: first.value,
            final_value: last.value,
            metrics,
            benchmark,
            drawdowns,
            rolling,
            monthly,
            yearly,
            equity_curve,
        })
    }

    /// 하나의 포트폴리오를 여러 벤치마크와 병렬로 비교합니다.
    ///
    /// 공통 날짜가 2개 미만인 벤치마크는 결과에서 제외됩니다.
    /// 결과 순서는 입력 순서를 따릅니다.
    ///
    /// # 에러
    ///
    /// 포트폴리오 가치 포인트가 2개 미만이면 [`AnalyticsError::InsufficientData`].
    pub fn compare_benchmarks(
        &self,
        portfolio: &ValueSeries,
        benchmarks: &[BenchmarkInput],
    ) -> AnalyticsResult<Vec<BenchmarkBundle>> {
        if portfolio.len() < MIN_VALUE_POINTS {
            return Err(AnalyticsError::InsufficientData {
                required: MIN_VALUE_POINTS,
                actual: portfolio.len(),
            });
        }

        info!(
            points = portfolio.len(),
            benchmarks = benchmarks.len(),
            "Comparing benchmarks"
        );

        let results: Vec<AnalyticsResult<Option<BenchmarkBundle>>> = benchmarks
            .par_iter()
            .map(|input| match align(portfolio, &input.series)? {
                Some(paired) => self.bundle(&input.id, &paired).map(Some),
                None => {
                    warn!(benchmark = %input.id, "No common dates with portfolio, skipped");
                    Ok(None)
                }
            })
            .collect();

        results.into_iter().filter_map(Result::transpose).collect()
    }

    /// 여러 기간을 병렬로 분석합니다.
    ///
    /// 각 기간은 포트폴리오의 첫/마지막 날짜로 범위를 계산한 뒤 포트폴리오와
    /// 벤치마크를 잘라 독립적으로 분석합니다.
    ///
    /// # 에러
    ///
    /// 포트폴리오 가치 포인트가 2개 미만이면 [`AnalyticsError::InsufficientData`].
    /// 개별 기간의 실패는 [`PeriodReport::result`]에 담깁니다.
    pub fn analyze_periods(
        &self,
        request: &AnalysisRequest,
        periods: &[PeriodSelector],
    ) -> AnalyticsResult<Vec<PeriodReport>> {
        let full = match request.portfolio.range() {
            Some(range) if request.portfolio.len() >= MIN_VALUE_POINTS => range,
            _ => {
                return Err(AnalyticsError::InsufficientData {
                    required: MIN_VALUE_POINTS,
                    actual: request.portfolio.len(),
                })
            }
        };

        Ok(periods
            .par_iter()
            .map(|&period| {
                let range = period.resolve(full.start, full.end);
                let sliced = request.slice(&range);
                let span = analysis_span!(
                    "analyze_period",
                    sliced.portfolio.len(),
                    request.benchmark_id(),
                    period
                );
                let _guard = span.enter();

                let result = self.analyze(&sliced);
                if let Err(e) = &result {
                    warn!(period = %period, error = %e, "Period analysis failed");
                }
                PeriodReport {
                    period,
                    range,
                    result,
                }
            })
            .collect())
    }

    fn bundle(&self, id: &str, paired: &PairedReturns) -> AnalyticsResult<BenchmarkBundle> {
        let stats = self.comparator.compare(paired.strategy(), paired.benchmark())?;

        debug!(
            benchmark = id,
            aligned_days = paired.len(),
            beta = stats.beta,
            correlation = stats.correlation,
            "Benchmark comparison complete"
        );

        Ok(BenchmarkBundle {
            benchmark_id: id.to_string(),
            benchmark_name: self.config.benchmark_name(id),
            benchmark_return: compound(paired.benchmark().iter().copied()),
            strategy_return: compound(paired.strategy().iter().copied()),
            aligned_days: paired.len(),
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn series(start: NaiveDate, values: &[Decimal]) -> ValueSeries {
        ValueSeries::from_pairs(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::days(i as i64), *v)),
        )
        .unwrap()
    }

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(AnalyticsConfig::default()).unwrap()
    }

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AnalyticsConfig::default();
        config.rolling.min_window = 1;
        assert!(matches!(
            AnalyticsEngine::new(config),
            Err(AnalyticsError::Config(_))
        ));
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let request = AnalysisRequest::new(series(jan(1), &[dec!(100)]), dec!(1000));
        assert_eq!(
            engine().analyze(&request).unwrap_err(),
            AnalyticsError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_report_without_benchmark() {
        let nav = series(
            jan(1),
            &[dec!(100), dec!(90), dec!(95), dec!(110), dec!(100), dec!(120)],
        );
        let report = engine()
            .analyze(&AnalysisRequest::new(nav, dec!(1000)))
            .unwrap();

        assert_eq!(report.start_date, jan(1));
        assert_eq!(report.end_date, jan(6));
        assert_eq!(report.trading_days, 5);
        assert_eq!(report.initial_value, dec!(100));
        assert_eq!(report.final_value, dec!(120));
        assert!(report.benchmark.is_none());
        assert_eq!(report.rolling.len(), 1);
        assert!(report.rolling[0].beta.is_none());
        assert_eq!(report.monthly.len(), 1);
        assert_eq!(report.equity_curve.len(), 6);
        assert!((report.metrics.cumulative_return - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_benchmark_without_overlap_is_absent() {
        let nav = series(jan(1), &[dec!(100), dec!(101), dec!(102)]);
        let bench = series(jan(10), &[dec!(50), dec!(51)]);
        let request =
            AnalysisRequest::new(nav, dec!(1000)).with_benchmark(BenchmarkInput::new("sp500", bench));

        let report = engine().analyze(&request).unwrap();
        assert!(report.benchmark.is_none());
        assert_eq!(report.trading_days, 2);
    }

    #[test]
    fn test_benchmark_name_from_catalog() {
        let nav = series(jan(1), &[dec!(100), dec!(102), dec!(101), dec!(104)]);
        let bench = series(jan(1), &[dec!(10), dec!(10.1), dec!(10.0), dec!(10.3)]);

        let catalog = engine()
            .compare_benchmarks(&nav, &[BenchmarkInput::new("sp500", bench.clone())])
            .unwrap();
        assert_eq!(catalog[0].benchmark_name, "S&P 500");

        let unknown = engine()
            .compare_benchmarks(&nav, &[BenchmarkInput::new("custom", bench)])
            .unwrap();
        assert_eq!(unknown[0].benchmark_name, "custom");
        assert!((unknown[0].benchmark_return - 0.03).abs() < 1e-12);
        assert!((unknown[0].strategy_return - 0.04).abs() < 1e-12);
        assert_eq!(unknown[0].aligned_days, 3);
    }

    #[test]
    fn test_cached_analysis_matches_uncached() {
        let values: Vec<Decimal> = (0..40)
            .map(|i| Decimal::from(1000 + (i * 7) % 23 + i * 3))
            .collect();
        let request = AnalysisRequest::new(series(jan(1), &values), dec!(10000));
        let engine = engine();
        let mut cache = RollingCache::default();

        let plain = engine.analyze(&request).unwrap();
        let cached = engine.analyze_cached(&request, &mut cache).unwrap();
        let again = engine.analyze_cached(&request, &mut cache).unwrap();

        assert_eq!(plain, cached);
        assert_eq!(cached, again);
        assert_eq!(cache.stats().hits, 1);
    }
}
