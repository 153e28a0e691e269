//! 위험/수익 지표 계산 모듈
//!
//! 일간 수익률 시계열 하나에 대한 요약 통계를 계산합니다:
//! - 수익률: 누적, CAGR, YTD/MTD, 기하 평균
//! - 변동성: 표준편차, 하방 편차, VaR/CVaR, 왜도/첨도
//! - 위험 조정 수익: 샤프, 소르티노, 칼마, Omega, Ulcer Performance Index
//! - 일별 승패 통계: 승률, 평균 수익/손실, 프로핏 팩터, 켈리 비율
//!
//! 분모가 0인 비율은 에러나 NaN이 아니라 `0`입니다.
//! 손실일이 없는 프로핏 팩터만 예외로 `f64::INFINITY`를 보고합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use folio_analytics::performance::MetricsCalculator;
//!
//! let calculator = MetricsCalculator::new(config.metrics.clone());
//! let bundle = calculator.compute(&series, &returns, &drawdowns)?;
//! println!("샤프 비율: {:.2}", bundle.sharpe_ratio);
//! ```

use chrono::{Datelike, NaiveDate};
use folio_core::{AnalyticsError, AnalyticsResult, MetricsConfig, ReturnPoint, ValueSeries};
use serde::{Deserialize, Serialize};

use super::stats::{
    conditional_mean, downside_deviation, geometric_mean, mean, percentile, safe_ratio,
    skew_kurtosis, std_dev, ulcer_index,
};
use crate::drawdown::DrawdownReport;
use crate::returns::{compound, return_values};

/// 위험/수익 지표 묶음.
///
/// 모든 수익률/비율 값은 소수 비율입니다 (0.05 = 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturnBundle {
    // ===== 수익률 =====
    /// 누적 수익률 `value[last] / value[first] - 1`
    pub cumulative_return: f64,
    /// 연환산 수익률 (CAGR, 달력 일수 기준)
    pub annualized_return: f64,
    /// 연초 이후 수익률
    pub ytd_return: Option<f64>,
    /// 월초 이후 수익률
    pub mtd_return: Option<f64>,
    /// 일간 수익률 산술 평균
    pub daily_return_mean: f64,
    /// 일간 수익률 표준편차 (모집단)
    pub daily_return_std: f64,
    /// 일간 기하 평균 수익률
    pub geometric_mean: f64,
    /// 연환산 변동성
    pub volatility: f64,
    /// 최고 수익일
    pub best_day: f64,
    /// 최저 수익일
    pub worst_day: f64,

    // ===== 승패 통계 =====
    /// 승률 (수익일 / 전체 일수)
    pub win_rate: f64,
    /// 수익일 평균 수익률
    pub avg_win: f64,
    /// 손실일 평균 수익률 (음수)
    pub avg_loss: f64,
    /// 프로핏 팩터. 손실일 없이 수익일만 있으면 무한대
    #[serde(with = "folio_core::unbounded")]
    pub profit_factor: f64,
    /// 손익비 `avg_win / |avg_loss|`
    pub payoff_ratio: f64,
    /// 기대값
    pub expectancy: f64,
    /// 켈리 비율
    pub kelly_criterion: f64,

    // ===== 위험 조정 수익 =====
    pub sharpe_ratio: f64,
    pub downside_deviation: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub omega_ratio: f64,
    pub gain_to_pain_ratio: f64,
    pub recovery_factor: f64,
    pub ulcer_performance_index: f64,

    // ===== 낙폭 / 꼬리 위험 =====
    /// 최대 낙폭 (0 이하)
    pub max_drawdown: f64,
    /// 가장 긴 낙폭 구간 (일)
    pub max_drawdown_duration: Option<i64>,
    /// 현재 낙폭 (0 이하)
    pub current_drawdown: f64,
    pub ulcer_index: f64,
    /// 95% VaR (일간 수익률 5 백분위수)
    pub var_95: f64,
    /// 95% CVaR (VaR 이하 수익률의 평균)
    pub cvar_95: f64,
    pub tail_ratio: f64,
    pub skewness: f64,
    /// 원시 4차 표준화 모멘트 (정규분포 = 3)
    pub kurtosis: f64,
}

/// 위험/수익 지표 계산기.
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    config: MetricsConfig,
}

impl MetricsCalculator {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// 연환산 계수의 제곱근.
    fn sqrt_annual(&self) -> f64 {
        self.config.annualization_factor.sqrt()
    }

    /// 지표 묶음을 계산합니다.
    ///
    /// # 매개변수
    ///
    /// * `series` - 전략 가치 시계열 (누적 수익률, CAGR 계산용)
    /// * `returns` - `series`에서 생성한 일간 수익률
    /// * `drawdowns` - `series`의 낙폭 분석 결과
    ///
    /// # 에러
    ///
    /// 가치 포인트가 2개 미만이거나 수익률이 비어 있으면 [`AnalyticsError::InsufficientData`].
    pub fn compute(
        &self,
        series: &ValueSeries,
        returns: &[ReturnPoint],
        drawdowns: &DrawdownReport,
    ) -> AnalyticsResult<RiskReturnBundle> {
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            return Err(AnalyticsError::InsufficientData {
                required: 2,
                actual: series.len(),
            });
        };
        if returns.is_empty() {
            return Err(AnalyticsError::InsufficientData {
                required: 2,
                actual: series.len(),
            });
        }

        let values = series.values();
        let r = return_values(returns);
        let n = r.len() as f64;
        let sqrt_annual = self.sqrt_annual();
        let rf_daily = self.config.daily_risk_free();

        // 수익률
        let cumulative_return = values[values.len() - 1] / values[0] - 1.0;
        let annualized_return = self.cagr(cumulative_return, first.date, last.date);
        let ytd_return = since(returns, last.date.with_ordinal(1));
        let mtd_return = since(returns, last.date.with_day(1));

        let daily_return_mean = mean(&r);
        let daily_return_std = std_dev(&r);
        let best_day = r.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst_day = r.iter().copied().fold(f64::INFINITY, f64::min);

        // 승패 통계
        let wins = r.iter().filter(|v| **v > 0.0).count();
        let win_rate = wins as f64 / n;
        let avg_win = conditional_mean(&r, |v| v > 0.0).unwrap_or(0.0);
        let avg_loss = conditional_mean(&r, |v| v < 0.0).unwrap_or(0.0);
        let gross_gain: f64 = r.iter().filter(|v| **v > 0.0).sum();
        let gross_loss: f64 = r.iter().filter(|v| **v < 0.0).sum();

        let profit_factor = if gross_loss == 0.0 {
            if gross_gain > 0.0 {
                f64::INFINITY
            } else {
                0.0
            }
        } else {
            gross_gain / gross_loss.abs()
        };
        let payoff_ratio = safe_ratio(avg_win, avg_loss.abs());
        let expectancy = win_rate * avg_win + (1.0 - win_rate) * avg_loss;
        let kelly_criterion = if payoff_ratio == 0.0 {
            0.0
        } else {
            win_rate - (1.0 - win_rate) / payoff_ratio
        };

        // 위험 조정 수익
        let excess_mean = daily_return_mean - rf_daily;
        let sharpe_ratio = safe_ratio(excess_mean, daily_return_std) * sqrt_annual;
        let downside = downside_deviation(&r);
        let sortino_ratio = safe_ratio(excess_mean, downside) * sqrt_annual;

        let max_drawdown = drawdowns.max_drawdown;
        let calmar_ratio = safe_ratio(annualized_return, max_drawdown.abs());
        let recovery_factor = safe_ratio(cumulative_return, max_drawdown.abs());

        let ulcer = ulcer_index(&drawdowns.underwater_values());
        let ulcer_performance_index = safe_ratio(annualized_return, ulcer);

        let threshold = self.config.omega_threshold;
        let omega_gain: f64 = r.iter().map(|v| (v - threshold).max(0.0)).sum();
        let omega_loss: f64 = r.iter().map(|v| (v - threshold).min(0.0)).sum();
        let omega_ratio = safe_ratio(omega_gain, omega_loss.abs());
        let gain_to_pain_ratio = safe_ratio(r.iter().sum(), gross_loss.abs());

        // 꼬리 위험
        let var_95 = percentile(&r, 0.05);
        let cvar_95 = conditional_mean(&r, |v| v <= var_95).unwrap_or(var_95);
        let tail_ratio = safe_ratio(percentile(&r, 0.95).abs(), var_95.abs());
        let (skewness, kurtosis) = skew_kurtosis(&r);

        Ok(RiskReturnBundle {
            cumulative_return,
            annualized_return,
            ytd_return,
            mtd_return,
            daily_return_mean,
            daily_return_std,
            geometric_mean: geometric_mean(&r),
            volatility: daily_return_std * sqrt_annual,
            best_day,
            worst_day,
            win_rate,
            avg_win,
            avg_loss,
            profit_factor,
            payoff_ratio,
            expectancy,
            kelly_criterion,
            sharpe_ratio,
            downside_deviation: downside,
            sortino_ratio,
            calmar_ratio,
            omega_ratio,
            gain_to_pain_ratio,
            recovery_factor,
            ulcer_performance_index,
            max_drawdown,
            max_drawdown_duration: drawdowns.max_drawdown_duration,
            current_drawdown: drawdowns.current_drawdown,
            ulcer_index: ulcer,
            var_95,
            cvar_95,
            tail_ratio,
            skewness,
            kurtosis,
        })
    }

    /// 달력 일수 기준 연환산 수익률 `(1 + cum)^(days_per_year / days) - 1`.
    ///
    /// 경과 일수가 0 이하이면 0입니다.
    pub fn cagr(&self, cumulative_return: f64, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = (end - start).num_days();
        if days <= 0 {
            return 0.0;
        }
        let exponent = self.config.calendar_days_per_year / days as f64;
        let cagr = (1.0 + cumulative_return).powf(exponent) - 1.0;
        if cagr.is_finite() {
            cagr
        } else {
            0.0
        }
    }
}

/// 기준일 이후(포함) 수익률을 복리로 합산합니다. 해당 수익률이 없으면 `None`.
fn since(returns: &[ReturnPoint], anchor: Option<NaiveDate>) -> Option<f64> {
    let anchor = anchor?;
    let mut selected = returns
        .iter()
        .filter(|p| p.date >= anchor)
        .map(|p| p.daily_return)
        .peekable();

    selected.peek()?;
    Some(compound(selected))
}
