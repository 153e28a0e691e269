//! 롤링 윈도우 지표.
//!
//! 차트용으로 날짜별 윈도우 지표(베타, 변동성, 샤프, 소르티노)와
//! 누적 낙폭을 계산합니다.
//!
//! - 유효 윈도우 = `max(min(preferred, n / 2), min_window)`
//! - 수익률이 `min_window`개 미만이면 빈 결과 ("이력 부족", 0이 아님)
//! - 윈도우는 보고 시점 이전의 수익률만 포함하는 반열린 구간 `[i - w, i)`
//! - 낙폭은 윈도우가 아니라 처음부터 해당 날짜까지의 누적 고점 기준

use chrono::NaiveDate;
use folio_core::{MetricsConfig, RollingConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::benchmark::beta;
use crate::drawdown::running_drawdowns;
use crate::performance::stats::{downside_deviation, mean, safe_ratio, std_dev};

/// 전략/벤치마크 지표 쌍.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPair {
    pub strategy: f64,
    /// 벤치마크가 없으면 None
    pub benchmark: Option<f64>,
}

/// 롤링 시계열의 한 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    /// 윈도우의 마지막 수익률 날짜. 값은 다음 거래일 시작 시점에 확정됩니다.
    pub date: NaiveDate,
    /// 윈도우 베타 (벤치마크가 없으면 None)
    pub beta: Option<f64>,
    /// 연환산 변동성
    pub volatility: RollingPair,
    pub sharpe: RollingPair,
    pub sortino: RollingPair,
    /// 누적 고점 대비 낙폭
    pub drawdown: RollingPair,
}

/// 롤링 계산 입력.
///
/// 벤치마크가 있으면 날짜가 정렬된 쌍 수익률, 없으면 전략 수익률을 사용합니다.
#[derive(Debug, Clone, Copy)]
pub struct RollingInput<'a> {
    pub dates: &'a [NaiveDate],
    pub strategy: &'a [f64],
    pub benchmark: Option<&'a [f64]>,
}

impl<'a> RollingInput<'a> {
    pub fn new(dates: &'a [NaiveDate], strategy: &'a [f64], benchmark: Option<&'a [f64]>) -> Self {
        Self {
            dates,
            strategy,
            benchmark,
        }
    }

    /// 수익률 개수.
    pub fn len(&self) -> usize {
        self.strategy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategy.is_empty()
    }
}

/// 롤링 윈도우 엔진.
#[derive(Debug, Clone, Default)]
pub struct RollingEngine {
    window: RollingConfig,
    metrics: MetricsConfig,
}

impl RollingEngine {
    pub fn new(window: RollingConfig, metrics: MetricsConfig) -> Self {
        Self { window, metrics }
    }

    /// 수익률 개수에 대한 유효 윈도우 크기를 반환합니다.
    ///
    /// `total`이 최소 윈도우보다 작으면 `None`.
    pub fn effective_window(&self, total: usize) -> Option<usize> {
        let min_window = self.window.min_window;
        if total < min_window {
            return None;
        }
        Some(self.window.preferred_window.min(total / 2).max(min_window))
    }

    /// 롤링 시계열을 계산합니다.
    ///
    /// 이력이 부족하면 빈 벡터를 반환합니다.
    pub fn compute(&self, input: &RollingInput<'_>) -> Vec<RollingPoint> {
        let n = input.len().min(input.dates.len());
        let Some(window) = self.effective_window(n) else {
            debug!(
                returns = n,
                min_window = self.window.min_window,
                "Not enough history for rolling metrics"
            );
            return Vec::new();
        };
        let benchmark = input.benchmark.filter(|b| b.len() >= n);

        debug!(
            returns = n,
            window,
            with_benchmark = benchmark.is_some(),
            "Computing rolling metrics"
        );

        let strategy_dd = cumulative_drawdowns(&input.strategy[..n]);
        let benchmark_dd = benchmark.map(|b| cumulative_drawdowns(&b[..n]));

        (window..=n)
            .map(|i| {
                let range = i - window..i;
                let s = &input.strategy[range.clone()];
                let b = benchmark.map(|b| &b[range]);

                RollingPoint {
                    date: input.dates[i - 1],
                    beta: b.map(|b| beta(s, b)),
                    volatility: self.pair(s, b, |w| self.volatility(w)),
                    sharpe: self.pair(s, b, |w| self.sharpe(w)),
                    sortino: self.pair(s, b, |w| self.sortino(w)),
                    drawdown: RollingPair {
                        strategy: strategy_dd[i - 1],
                        benchmark: benchmark_dd.as_ref().map(|dd| dd[i - 1]),
                    },
                }
            })
            .collect()
    }

    fn pair<F>(&self, strategy: &[f64], benchmark: Option<&[f64]>, metric: F) -> RollingPair
    where
        F: Fn(&[f64]) -> f64,
    {
        RollingPair {
            strategy: metric(strategy),
            benchmark: benchmark.map(&metric),
        }
    }

    fn volatility(&self, window: &[f64]) -> f64 {
        std_dev(window) * self.metrics.annualization_factor.sqrt()
    }

    fn sharpe(&self, window: &[f64]) -> f64 {
        let excess = mean(window) - self.metrics.daily_risk_free();
        safe_ratio(excess, std_dev(window)) * self.metrics.annualization_factor.sqrt()
    }

    fn sortino(&self, window: &[f64]) -> f64 {
        let excess = mean(window) - self.metrics.daily_risk_free();
        safe_ratio(excess, downside_deviation(window)) * self.metrics.annualization_factor.sqrt()
    }
}

/// 수익률을 1.0부터 복리로 누적한 가치의 고점 대비 하락률.
///
/// 결과의 `i`번째 값은 `i`번째 수익률이 반영된 날짜의 하락률입니다.
fn cumulative_drawdowns(returns: &[f64]) -> Vec<f64> {
    let mut equity = Vec::with_capacity(returns.len() + 1);
    equity.push(1.0);
    for r in returns {
        let last = equity[equity.len() - 1];
        equity.push(last * (1.0 + r));
    }
    running_drawdowns(&equity).split_off(1)
}
