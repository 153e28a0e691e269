//! 순자산 가치(NAV) 및 수익률 시계열.
//!
//! 분석 엔진에 들어가는 모든 입력은 검증된 [`ValueSeries`]를 거칩니다.
//! 생성 시점에 다음 불변 조건을 확인합니다:
//! - 날짜는 엄격한 오름차순 (중복 없음)
//! - 모든 값은 0보다 큼

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::DateRange;
use crate::error::{AnalyticsError, AnalyticsResult};

/// 단일 순자산 가치 포인트.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePoint {
    /// 기준일
    pub date: NaiveDate,
    /// 누적 자산 가치
    pub value: Decimal,
}

impl ValuePoint {
    /// 새로운 가치 포인트를 생성합니다.
    pub fn new(date: NaiveDate, value: Decimal) -> Self {
        Self { date, value }
    }
}

/// 단일 일간 수익률 포인트.
///
/// `value[i] / value[i-1] - 1`로 계산되며 `date`는 `value[i]`의 날짜입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    /// 수익률이 확정된 날짜
    pub date: NaiveDate,
    /// 일간 수익률 (0.01 = 1%)
    pub daily_return: f64,
}

impl ReturnPoint {
    /// 새로운 수익률 포인트를 생성합니다.
    pub fn new(date: NaiveDate, daily_return: f64) -> Self {
        Self { date, daily_return }
    }
}

/// 검증된 순자산 가치 시계열.
///
/// 생성 후에는 변경되지 않습니다. 통계 계산용 `f64` 값을 함께 보관합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ValuePoint>", into = "Vec<ValuePoint>")]
pub struct ValueSeries {
    points: Vec<ValuePoint>,
    values: Vec<f64>,
}

impl ValueSeries {
    /// 가치 포인트 목록을 검증하여 시계열을 생성합니다.
    ///
    /// # 에러
    ///
    /// - [`AnalyticsError::InvalidValue`]: 0 이하이거나 `f64`로 변환할 수 없는 값
    /// - [`AnalyticsError::UnorderedSeries`]: 날짜 중복 또는 역순
    pub fn new(points: Vec<ValuePoint>) -> AnalyticsResult<Self> {
        let mut values = Vec::with_capacity(points.len());
        let mut prev_date: Option<NaiveDate> = None;

        for point in &points {
            if let Some(prev) = prev_date {
                if point.date <= prev {
                    return Err(AnalyticsError::UnorderedSeries { date: point.date });
                }
            }
            prev_date = Some(point.date);

            let invalid = || AnalyticsError::InvalidValue {
                date: point.date,
                value: point.value,
            };
            if point.value <= Decimal::ZERO {
                return Err(invalid());
            }
            let value = point.value.to_f64().filter(|v| v.is_finite() && *v > 0.0);
            values.push(value.ok_or_else(invalid)?);
        }

        Ok(Self { points, values })
    }

    /// (날짜, 값) 쌍에서 시계열을 생성합니다.
    pub fn from_pairs<I>(pairs: I) -> AnalyticsResult<Self>
    where
        I: IntoIterator<Item = (NaiveDate, Decimal)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, value)| ValuePoint::new(date, value))
                .collect(),
        )
    }

    /// 모든 포인트를 반환합니다.
    pub fn points(&self) -> &[ValuePoint] {
        &self.points
    }

    /// 통계 계산용 `f64` 값을 반환합니다.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 날짜 목록을 반환합니다.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 첫 번째 포인트.
    pub fn first(&self) -> Option<&ValuePoint> {
        self.points.first()
    }

    /// 마지막 포인트.
    pub fn last(&self) -> Option<&ValuePoint> {
        self.points.last()
    }

    /// 시계열 전체의 날짜 범위를 반환합니다.
    pub fn range(&self) -> Option<DateRange> {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => Some(DateRange::new(first.date, last.date)),
            _ => None,
        }
    }

    /// 날짜 범위에 포함되는 포인트만 잘라낸 시계열을 반환합니다.
    ///
    /// 부분 집합은 원본의 불변 조건을 그대로 만족하므로 재검증하지 않습니다.
    pub fn slice(&self, range: &DateRange) -> ValueSeries {
        let (points, values) = self
            .points
            .iter()
            .zip(&self.values)
            .filter(|(p, _)| range.contains(p.date))
            .map(|(p, v)| (*p, *v))
            .unzip();

        ValueSeries { points, values }
    }

    /// 두 시계열의 공통 날짜만 남깁니다 (inner join).
    ///
    /// 반환되는 두 시계열은 길이와 날짜 집합이 동일합니다.
    pub fn intersect(&self, other: &ValueSeries) -> (ValueSeries, ValueSeries) {
        let mut left = ValueSeries::empty();
        let mut right = ValueSeries::empty();

        let (mut i, mut j) = (0, 0);
        while i < self.len() && j < other.len() {
            let (a, b) = (&self.points[i], &other.points[j]);
            match a.date.cmp(&b.date) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    left.points.push(*a);
                    left.values.push(self.values[i]);
                    right.points.push(*b);
                    right.values.push(other.values[j]);
                    i += 1;
                    j += 1;
                }
            }
        }

        (left, right)
    }

    fn empty() -> Self {
        Self {
            points: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl TryFrom<Vec<ValuePoint>> for ValueSeries {
    type Error = AnalyticsError;

    fn try_from(points: Vec<ValuePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<ValueSeries> for Vec<ValuePoint> {
    fn from(series: ValueSeries) -> Self {
        series.points
    }
}
