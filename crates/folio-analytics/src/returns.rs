//! 수익률 시계열 생성.
//!
//! 누적 가치 시계열을 일간 수익률로 변환하고, 벤치마크가 주어지면
//! 두 가치 시계열의 공통 날짜(inner join)만으로 쌍 수익률을 만듭니다.
//! 모든 쌍 계산은 동일한 날짜 집합 위에서 수행됩니다.

use chrono::NaiveDate;
use folio_core::{AnalyticsError, AnalyticsResult, ReturnPoint, ValueSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 수익률 계산에 필요한 최소 가치 포인트 수.
pub const MIN_VALUE_POINTS: usize = 2;

/// 날짜가 정렬된 전략/벤치마크 수익률 쌍.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedReturns {
    base_date: Option<NaiveDate>,
    dates: Vec<NaiveDate>,
    strategy: Vec<f64>,
    benchmark: Vec<f64>,
}

impl PairedReturns {
    /// 길이가 같은 세 벡터로 쌍 수익률을 생성합니다.
    ///
    /// # 에러
    ///
    /// 길이가 다르면 [`AnalyticsError::DateAlignment`]를 반환합니다.
    pub fn new(
        dates: Vec<NaiveDate>,
        strategy: Vec<f64>,
        benchmark: Vec<f64>,
    ) -> AnalyticsResult<Self> {
        if strategy.len() != benchmark.len() || dates.len() != strategy.len() {
            return Err(AnalyticsError::DateAlignment {
                strategy_len: strategy.len(),
                benchmark_len: benchmark.len(),
            });
        }
        Ok(Self {
            base_date: None,
            dates,
            strategy,
            benchmark,
        })
    }

    /// 첫 수익률 직전의 공통 날짜 (두 가치 시계열의 기준점)를 지정합니다.
    pub fn with_base_date(mut self, date: NaiveDate) -> Self {
        self.base_date = Some(date);
        self
    }

    /// 기준점 날짜.
    pub fn base_date(&self) -> Option<NaiveDate> {
        self.base_date
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn strategy(&self) -> &[f64] {
        &self.strategy
    }

    pub fn benchmark(&self) -> &[f64] {
        &self.benchmark
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// 수익률 생성 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    /// 전략 전체 기간의 일간 수익률 (길이 = 가치 포인트 수 - 1)
    pub strategy: Vec<ReturnPoint>,
    /// 공통 날짜 기준 쌍 수익률. 벤치마크가 없거나 겹치는 날짜가 2개 미만이면 `None`
    pub paired: Option<PairedReturns>,
}

impl ReturnSeries {
    /// 전략 수익률 값만 반환합니다.
    pub fn strategy_values(&self) -> Vec<f64> {
        return_values(&self.strategy)
    }
}

/// 가치 시계열을 일간 수익률로 변환합니다.
///
/// `r[i] = value[i] / value[i-1] - 1`, 날짜는 `value[i]`의 날짜입니다.
///
/// # 에러
///
/// 가치 포인트가 2개 미만이면 [`AnalyticsError::InsufficientData`].
pub fn daily_returns(series: &ValueSeries) -> AnalyticsResult<Vec<ReturnPoint>> {
    if series.len() < MIN_VALUE_POINTS {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_VALUE_POINTS,
            actual: series.len(),
        });
    }

    let points = series.points();
    let values = series.values();

    Ok(values
        .windows(2)
        .zip(&points[1..])
        .map(|(pair, point)| ReturnPoint::new(point.date, pair[1] / pair[0] - 1.0))
        .collect())
}

/// 전략 수익률과 (선택적) 벤치마크 쌍 수익률을 생성합니다.
///
/// 전략 자체 지표는 전략 전체 시계열을 사용하고, 벤치마크 비교 지표는
/// 공통 날짜의 가치만 남긴 뒤 각각 수익률을 계산합니다.
pub fn build_returns(
    strategy: &ValueSeries,
    benchmark: Option<&ValueSeries>,
) -> AnalyticsResult<ReturnSeries> {
    let strategy_returns = daily_returns(strategy)?;
    let paired = match benchmark {
        Some(bench) => align(strategy, bench)?,
        None => None,
    };

    Ok(ReturnSeries {
        strategy: strategy_returns,
        paired,
    })
}

/// 두 가치 시계열을 공통 날짜로 맞춘 뒤 쌍 수익률을 계산합니다.
///
/// 공통 날짜가 2개 미만이면 `None`을 반환합니다.
pub fn align(
    strategy: &ValueSeries,
    benchmark: &ValueSeries,
) -> AnalyticsResult<Option<PairedReturns>> {
    let (s, b) = strategy.intersect(benchmark);

    debug!(
        strategy_points = strategy.len(),
        benchmark_points = benchmark.len(),
        aligned_points = s.len(),
        dropped_strategy = strategy.len() - s.len(),
        dropped_benchmark = benchmark.len() - b.len(),
        "Aligned benchmark dates"
    );

    if s.len() < MIN_VALUE_POINTS {
        return Ok(None);
    }

    let strategy_returns = daily_returns(&s)?;
    let benchmark_returns = daily_returns(&b)?;

    let paired = PairedReturns::new(
        strategy_returns.iter().map(|r| r.date).collect(),
        return_values(&strategy_returns),
        return_values(&benchmark_returns),
    )?;

    Ok(match s.first() {
        Some(base) => Some(paired.with_base_date(base.date)),
        None => Some(paired),
    })
}

/// 수익률 포인트에서 값만 추출합니다.
pub fn return_values(points: &[ReturnPoint]) -> Vec<f64> {
    points.iter().map(|p| p.daily_return).collect()
}

/// 복리 수익률 `Π(1 + r) - 1`을 계산합니다.
pub fn compound<I>(returns: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    returns.into_iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(values: &[(u32, Decimal)]) -> ValueSeries {
        ValueSeries::from_pairs(values.iter().map(|(d, v)| (day(*d), *v))).unwrap()
    }

    #[test]
    fn test_daily_returns() {
        let s = series(&[(1, dec!(1.0)), (2, dec!(1.05)), (3, dec!(1.02)), (4, dec!(1.10))]);
        let returns = daily_returns(&s).unwrap();

        assert_eq!(returns.len(), 3);
        assert_eq!(returns[0].date, day(2));
        assert!((returns[0].daily_return - 0.05).abs() < 1e-12);
        assert!((returns[1].daily_return + 0.028571).abs() < 1e-6);
        assert!((returns[2].daily_return - 0.078431).abs() < 1e-6);
        assert!((compound(return_values(&returns)) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_data() {
        let s = series(&[(1, dec!(100))]);
        assert_eq!(
            daily_returns(&s).unwrap_err(),
            AnalyticsError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_align_drops_unmatched_dates() {
        let strategy = series(&[(1, dec!(100)), (2, dec!(110)), (3, dec!(99)), (5, dec!(120))]);
        let bench = series(&[(1, dec!(10)), (3, dec!(11)), (4, dec!(12)), (5, dec!(13.2))]);

        let paired = align(&strategy, &bench).unwrap().unwrap();
        assert_eq!(paired.base_date(), Some(day(1)));
        assert_eq!(paired.dates(), &[day(3), day(5)]);
        assert!((paired.strategy()[0] + 0.01).abs() < 1e-12);
        assert!((paired.benchmark()[0] - 0.1).abs() < 1e-12);
        assert_eq!(paired.len(), 2);
    }

    #[test]
    fn test_align_without_overlap_is_none() {
        let strategy = series(&[(1, dec!(100)), (2, dec!(101))]);
        let bench = series(&[(2, dec!(10)), (3, dec!(11))]);

        assert!(align(&strategy, &bench).unwrap().is_none());
    }

    #[test]
    fn test_build_returns_keeps_full_strategy() {
        let strategy = series(&[(1, dec!(100)), (2, dec!(101)), (3, dec!(102))]);
        let bench = series(&[(2, dec!(10)), (3, dec!(11))]);

        let result = build_returns(&strategy, Some(&bench)).unwrap();
        assert_eq!(result.strategy.len(), 2);
        assert_eq!(result.paired.map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_paired_returns_length_mismatch() {
        let err = PairedReturns::new(vec![day(1), day(2)], vec![0.1, 0.2], vec![0.1]).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::DateAlignment {
                strategy_len: 2,
                benchmark_len: 1
            }
        );
    }
}
