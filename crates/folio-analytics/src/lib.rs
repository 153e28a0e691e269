//! 포트폴리오 성과 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 수익률 시계열 생성 및 벤치마크 날짜 정렬
//! - 낙폭 구간 분석
//! - 위험/수익 지표 계산
//! - 벤치마크 비교 (베타, 알파, 캡처 비율)
//! - 롤링 윈도우 지표와 호출자 소유 캐시
//! - 월별/연도별 수익률 집계, 정규화 자산 곡선
//!
//! # Re-exports
//!
//! - [`engine`]: 전체 분석 묶음 (AnalyticsEngine, AnalyticsReport)
//! - [`performance`]: 위험/수익 지표 (RiskReturnBundle, MetricsCalculator)
//! - [`portfolio`]: 기간 집계와 자산 곡선 (PeriodAggregator, EquityCurve)

pub mod benchmark;
pub mod cache;
pub mod drawdown;
pub mod engine;
pub mod performance;
pub mod portfolio;
pub mod returns;
pub mod rolling;

// Engine 모듈 re-exports
pub use engine::{AnalysisRequest, AnalyticsEngine, AnalyticsReport, PeriodReport};

// 구성 요소 re-exports
pub use benchmark::{BenchmarkBundle, BenchmarkComparator, BenchmarkStats};
pub use cache::{CacheStats, RollingCache};
pub use drawdown::{DrawdownAnalyzer, DrawdownEpisode, DrawdownPoint, DrawdownReport};
pub use performance::metrics::{MetricsCalculator, RiskReturnBundle};
pub use portfolio::equity_curve::{EquityCurve, EquityPoint};
pub use portfolio::periods::{MonthlyReturn, PeriodAggregator, YearlyReturn};
pub use returns::{build_returns, daily_returns, PairedReturns, ReturnSeries};
pub use rolling::{RollingEngine, RollingInput, RollingPair, RollingPoint};
