//! 벤치마크 비교 분석.
//!
//! 날짜가 정렬된 전략/벤치마크 수익률 쌍으로 회귀 지표와 캡처 비율을 계산합니다.
//!
//! # 주요 지표
//!
//! - **베타/알파**: `cov(s, b) / var(b)`, 연환산 초과 수익
//! - **상관계수**: Pearson 상관계수 (-1.0 ~ 1.0)
//! - **추적 오차 / 정보 비율**: 초과 수익의 변동성과 그 대비 초과 수익
//! - **상승/하락 캡처**: 벤치마크 부호별 평균 수익률 비율
//!
//! # 예시
//!
//! ```rust,ignore
//! use folio_analytics::benchmark::BenchmarkComparator;
//!
//! let comparator = BenchmarkComparator::new(&config.metrics);
//! let stats = comparator.compare(paired.strategy(), paired.benchmark())?;
//! println!("베타: {:.2}", stats.beta);
//! ```

use folio_core::{AnalyticsError, AnalyticsResult, MetricsConfig};
use serde::{Deserialize, Serialize};

use crate::performance::stats::{covariance, mean, safe_ratio, std_dev, variance};

/// 쌍 수익률 비교 지표.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkStats {
    /// 연환산 알파
    pub alpha: f64,
    /// 베타 (벤치마크 분산이 0이면 0)
    pub beta: f64,
    /// 상관계수
    pub correlation: f64,
    /// 결정계수 (상관계수²)
    pub r_squared: f64,
    /// 연환산 추적 오차
    pub tracking_error: f64,
    /// 정보 비율
    pub information_ratio: f64,
    /// 상승장 캡처 비율
    pub up_capture: f64,
    /// 하락장 캡처 비율
    pub down_capture: f64,
}

/// 벤치마크 대비 성과 묶음.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBundle {
    /// 벤치마크 식별자
    pub benchmark_id: String,
    /// 벤치마크 표시 이름
    pub benchmark_name: String,
    /// 공통 날짜 기간의 벤치마크 누적 수익률
    pub benchmark_return: f64,
    /// 공통 날짜 기간의 전략 누적 수익률
    pub strategy_return: f64,
    /// 비교에 사용된 수익률 개수
    pub aligned_days: usize,
    #[serde(flatten)]
    pub stats: BenchmarkStats,
}

/// 벤치마크 비교기.
#[derive(Debug, Clone)]
pub struct BenchmarkComparator {
    annualization_factor: f64,
    daily_risk_free: f64,
}

impl Default for BenchmarkComparator {
    fn default() -> Self {
        Self::new(&MetricsConfig::default())
    }
}

impl BenchmarkComparator {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            annualization_factor: config.annualization_factor,
            daily_risk_free: config.daily_risk_free(),
        }
    }

    /// 두 수익률 시계열을 비교합니다.
    ///
    /// # 에러
    ///
    /// - 길이가 다르면 [`AnalyticsError::DateAlignment`]
    /// - 비어 있으면 [`AnalyticsError::InsufficientData`]
    pub fn compare(&self, strategy: &[f64], benchmark: &[f64]) -> AnalyticsResult<BenchmarkStats> {
        if strategy.len() != benchmark.len() {
            return Err(AnalyticsError::DateAlignment {
                strategy_len: strategy.len(),
                benchmark_len: benchmark.len(),
            });
        }
        if strategy.is_empty() {
            return Err(AnalyticsError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let annual = self.annualization_factor;
        let rf = self.daily_risk_free;
        let strategy_mean = mean(strategy);
        let benchmark_mean = mean(benchmark);

        let beta = beta(strategy, benchmark);
        let alpha = (strategy_mean - rf) * annual - beta * (benchmark_mean - rf) * annual;
        let correlation = correlation(strategy, benchmark);

        let excess: Vec<f64> = strategy
            .iter()
            .zip(benchmark)
            .map(|(s, b)| s - b)
            .collect();
        let tracking_error = std_dev(&excess) * annual.sqrt();
        let information_ratio =
            safe_ratio((strategy_mean - benchmark_mean) * annual, tracking_error);

        Ok(BenchmarkStats {
            alpha,
            beta,
            correlation,
            r_squared: correlation * correlation,
            tracking_error,
            information_ratio,
            up_capture: capture(strategy, benchmark, |b| b > 0.0),
            down_capture: capture(strategy, benchmark, |b| b < 0.0),
        })
    }
}

/// 베타 `cov(s, b) / var(b)`. 벤치마크 분산이 0이면 0.
pub fn beta(strategy: &[f64], benchmark: &[f64]) -> f64 {
    safe_ratio(covariance(strategy, benchmark), variance(benchmark))
}

/// Pearson 상관계수.
///
/// `beta * sqrt(var_b / var_s)`로 계산하므로 자기 자신과의 상관계수는 정확히 1입니다.
/// 어느 한쪽의 분산이 0이면 0입니다.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let var_x = variance(x);
    let var_y = variance(y);
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    let corr = beta(x, y) * (var_y / var_x).sqrt();
    corr.clamp(-1.0, 1.0)
}

/// 벤치마크 조건부 캡처 비율. 조건 집합이 비어 있으면 0.
fn capture<F>(strategy: &[f64], benchmark: &[f64], condition: F) -> f64
where
    F: Fn(f64) -> bool,
{
    let (s, b): (Vec<f64>, Vec<f64>) = strategy
        .iter()
        .zip(benchmark)
        .filter(|(_, b)| condition(**b))
        .unzip();

    if b.is_empty() {
        return 0.0;
    }
    safe_ratio(mean(&s), mean(&b))
}
