//! 정규화 자산 곡선
//!
//! 포트폴리오 가치를 첫 값으로 나눈 곡선(시작 = 1.0)과, 벤치마크가 있으면
//! 공통 날짜의 수익률을 1.0부터 복리로 누적한 벤치마크 곡선을 함께 제공합니다.

use std::collections::HashMap;

use chrono::NaiveDate;
use folio_core::ValueSeries;
use serde::{Deserialize, Serialize};

use crate::returns::PairedReturns;

/// 자산 곡선 데이터 포인트
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 날짜
    pub date: NaiveDate,

    /// 정규화 포트폴리오 가치 (시작 = 1.0)
    pub portfolio: f64,

    /// 정규화 벤치마크 가치. 공통 날짜가 아니면 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<f64>,
}

/// 정규화 자산 곡선
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    /// 가치 시계열과 (선택적) 쌍 수익률로 자산 곡선을 생성합니다.
    pub fn build(series: &ValueSeries, paired: Option<&PairedReturns>) -> Self {
        let Some(&first) = series.values().first() else {
            return Self::default();
        };
        let benchmark = paired.map(benchmark_curve).unwrap_or_default();

        let points = series
            .points()
            .iter()
            .zip(series.values())
            .map(|(point, value)| EquityPoint {
                date: point.date,
                portfolio: value / first,
                benchmark: benchmark.get(&point.date).copied(),
            })
            .collect();

        Self { points }
    }

    /// 모든 포인트를 반환합니다.
    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 마지막 포트폴리오 값.
    pub fn final_portfolio(&self) -> Option<f64> {
        self.points.last().map(|p| p.portfolio)
    }

    /// 마지막 벤치마크 값.
    pub fn final_benchmark(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.benchmark)
    }
}

/// 벤치마크 수익률을 기준일 1.0부터 복리로 누적합니다.
fn benchmark_curve(paired: &PairedReturns) -> HashMap<NaiveDate, f64> {
    let mut curve = HashMap::with_capacity(paired.len() + 1);
    if let Some(base) = paired.base_date() {
        curve.insert(base, 1.0);
    }

    let mut value = 1.0;
    for (date, r) in paired.dates().iter().zip(paired.benchmark()) {
        value *= 1.0 + r;
        curve.insert(*date, value);
    }
    curve
}
