//! 분석 기간 선택자 및 날짜 범위.
//!
//! 엔진은 기간을 알지 못합니다. 호출자가 [`PeriodSelector::resolve`]로
//! 절대 날짜 범위를 구한 뒤 [`ValueSeries::slice`](super::ValueSeries::slice)로
//! 잘라낸 시계열을 넘깁니다.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 양 끝을 포함하는 날짜 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// 시작일 (포함)
    pub start: NaiveDate,
    /// 종료일 (포함)
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 날짜가 범위 안에 있는지 확인합니다.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// 범위의 달력 일수 (`end - start`).
    pub fn calendar_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// 분석 기간 선택자.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodSelector {
    /// 최근 7일
    #[serde(rename = "7d")]
    Week,
    /// 최근 30일
    #[serde(rename = "1m")]
    Month,
    /// 최근 180일
    #[serde(rename = "6m")]
    HalfYear,
    /// 최근 365일
    #[serde(rename = "1y")]
    Year,
    /// 이번 달 1일부터
    Mtd,
    /// 올해 1월 1일부터
    Ytd,
    /// 전체 기간
    #[default]
    All,
}

impl PeriodSelector {
    /// 모든 선택자 목록.
    pub const ALL: [PeriodSelector; 7] = [
        PeriodSelector::Week,
        PeriodSelector::Month,
        PeriodSelector::HalfYear,
        PeriodSelector::Year,
        PeriodSelector::Mtd,
        PeriodSelector::Ytd,
        PeriodSelector::All,
    ];

    /// 선택자 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodSelector::Week => "7d",
            PeriodSelector::Month => "1m",
            PeriodSelector::HalfYear => "6m",
            PeriodSelector::Year => "1y",
            PeriodSelector::Mtd => "mtd",
            PeriodSelector::Ytd => "ytd",
            PeriodSelector::All => "all",
        }
    }

    /// 마지막 날짜 기준으로 되돌아갈 달력 일수. 고정 길이 기간만 해당합니다.
    pub fn lookback_days(&self) -> Option<i64> {
        match self {
            PeriodSelector::Week => Some(7),
            PeriodSelector::Month => Some(30),
            PeriodSelector::HalfYear => Some(180),
            PeriodSelector::Year => Some(365),
            _ => None,
        }
    }

    /// 시계열의 첫/마지막 날짜로 절대 날짜 범위를 계산합니다.
    ///
    /// # 매개변수
    ///
    /// * `first` - 사용 가능한 첫 날짜
    /// * `last` - 사용 가능한 마지막 날짜 (범위의 종료일)
    ///
    /// # 반환값
    ///
    /// 시작일이 `first`보다 앞설 수 있습니다. 이 경우 잘라낸 결과는 전체 기간과 같습니다.
    pub fn resolve(&self, first: NaiveDate, last: NaiveDate) -> DateRange {
        let start = match self {
            PeriodSelector::All => first,
            PeriodSelector::Mtd => last.with_day(1).unwrap_or(last),
            PeriodSelector::Ytd => last.with_ordinal(1).unwrap_or(last),
            fixed => last - Duration::days(fixed.lookback_days().unwrap_or(0)),
        };
        DateRange::new(start, last)
    }
}

impl fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "7d" => Ok(PeriodSelector::Week),
            "1m" => Ok(PeriodSelector::Month),
            "6m" => Ok(PeriodSelector::HalfYear),
            "1y" => Ok(PeriodSelector::Year),
            "mtd" => Ok(PeriodSelector::Mtd),
            "ytd" => Ok(PeriodSelector::Ytd),
            "all" => Ok(PeriodSelector::All),
            _ => Err(format!("Unknown period: {}", s)),
        }
    }
}
