//! 월별/연도별 수익률 집계
//!
//! 일간 수익률을 달력 월/연도 단위로 복리 합산하고, 초기 자본에서 시작한
//! 잔고를 구간에서 구간으로 이어가며 통화 손익을 계산합니다.
//!
//! ```text
//! period_return = Π(1 + r_i) - 1
//! end_balance   = start_balance * (1 + period_return)
//! ```

use std::collections::BTreeMap;

use chrono::Datelike;
use folio_core::ReturnPoint;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::returns::compound;

/// 통화 금액 표시 자릿수
const CURRENCY_DP: u32 = 2;

/// 월별 수익률 (히트맵 셀)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    /// 연도
    pub year: i32,
    /// 월 (1-12)
    pub month: u32,
    /// 복리 수익률
    pub return_value: f64,
    /// 월초 잔고
    pub start_balance: Decimal,
    /// 월말 잔고
    pub end_balance: Decimal,
    /// 손익
    pub pnl: Decimal,
    /// 색상 강도 (-1.0 ~ 1.0, 최대 절대 월수익률로 정규화)
    pub intensity: f64,
}

/// 연도별 수익률
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyReturn {
    /// 연도
    pub year: i32,
    /// 복리 수익률
    pub return_value: f64,
    /// 연초 잔고
    pub start_balance: Decimal,
    /// 연말 잔고
    pub end_balance: Decimal,
    /// 손익
    pub pnl: Decimal,
}

/// 구간 집계기
#[derive(Debug, Clone)]
pub struct PeriodAggregator {
    initial_capital: Decimal,
}

impl PeriodAggregator {
    /// 초기 자본을 지정하여 집계기를 생성합니다.
    pub fn new(initial_capital: Decimal) -> Self {
        Self { initial_capital }
    }

    /// 월별 수익률을 계산합니다 (시간순).
    pub fn monthly(&self, returns: &[ReturnPoint]) -> Vec<MonthlyReturn> {
        let buckets = bucketize(returns, |p| (p.date.year(), p.date.month()));
        let max_abs = buckets
            .values()
            .map(|r| r.abs())
            .fold(0.0_f64, f64::max);

        self.carry_balance(&buckets)
            .map(|((year, month), return_value, balance)| MonthlyReturn {
                year,
                month,
                return_value,
                start_balance: balance.start,
                end_balance: balance.end,
                pnl: balance.pnl(),
                intensity: if max_abs > 0.0 {
                    (return_value / max_abs).clamp(-1.0, 1.0)
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// 연도별 수익률을 계산합니다 (시간순).
    pub fn yearly(&self, returns: &[ReturnPoint]) -> Vec<YearlyReturn> {
        let buckets = bucketize(returns, |p| p.date.year());

        self.carry_balance(&buckets)
            .map(|(year, return_value, balance)| YearlyReturn {
                year,
                return_value,
                start_balance: balance.start,
                end_balance: balance.end,
                pnl: balance.pnl(),
            })
            .collect()
    }

    /// 구간 순서대로 잔고를 이어갑니다.
    fn carry_balance<'a, K: Copy + 'a>(
        &self,
        buckets: &'a BTreeMap<K, f64>,
    ) -> impl Iterator<Item = (K, f64, Balance)> + 'a {
        let mut running = self.initial_capital;
        buckets.iter().map(move |(key, &period_return)| {
            let start = running;
            let growth = Decimal::from_f64(1.0 + period_return).unwrap_or(Decimal::ONE);
            running = start.checked_mul(growth).unwrap_or(start);
            (*key, period_return, Balance { start, end: running })
        })
    }
}

/// 구간 시작/종료 잔고 (반올림 전)
#[derive(Debug, Clone, Copy)]
struct Balance {
    start: Decimal,
    end: Decimal,
}

impl Balance {
    fn pnl(&self) -> Decimal {
        self.end.round_dp(CURRENCY_DP) - self.start.round_dp(CURRENCY_DP)
    }
}

/// 키별로 수익률을 묶어 복리 합산합니다.
fn bucketize<K, F>(returns: &[ReturnPoint], key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&ReturnPoint) -> K,
{
    let mut grouped: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for point in returns {
        grouped.entry(key(point)).or_default().push(point.daily_return);
    }
    grouped
        .into_iter()
        .map(|(k, rs)| (k, compound(rs)))
        .collect()
}
