//! 낙폭(Drawdown) 분석.
//!
//! 가치 시계열을 한 번 순회하면서 고점 → 저점 → 회복 구간을 찾는
//! 두 상태 머신입니다.
//!
//! - `AtOrAbovePeak`: 값이 직전 고점 이상
//! - `Underwater`: 값이 직전 고점 미만, 열린 구간을 추적 중
//!
//! 고점 이상으로 돌아오면 열린 구간이 닫히고, 시계열 끝까지 회복하지
//! 못한 구간은 `end_date = None`으로 보고됩니다.

use chrono::NaiveDate;
use folio_core::{ValuePoint, ValueSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 고점-저점-회복 구간.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    /// 하락 직전 고점 날짜
    pub start_date: NaiveDate,
    /// 최저점 날짜
    pub trough_date: NaiveDate,
    /// 회복 날짜 (미회복 시 None)
    pub end_date: Option<NaiveDate>,
    /// 낙폭 깊이 (음수 비율, -0.1 = -10%)
    pub depth: f64,
    /// 고점 가치
    pub peak_value: Decimal,
    /// 최저점 가치
    pub trough_value: Decimal,
    /// 구간 길이 (일): 회복일 또는 마지막 날짜 - 시작일
    pub duration_days: i64,
    /// 최저점부터 회복까지 기간 (일), 미회복 시 None
    pub recovery_days: Option<i64>,
}

impl DrawdownEpisode {
    /// 회복되었는지 여부.
    pub fn is_recovered(&self) -> bool {
        self.end_date.is_some()
    }
}

/// 특정 날짜의 고점 대비 하락률.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    /// 0 이하의 비율
    pub drawdown: f64,
}

/// 낙폭 분석 결과.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawdownReport {
    /// 모든 구간 (시간순)
    pub episodes: Vec<DrawdownEpisode>,
    /// 최악 N개 구간 (깊이 오름차순, 동률은 시작일이 빠른 순)
    pub worst: Vec<DrawdownEpisode>,
    /// 최대 낙폭 (0 이하)
    pub max_drawdown: f64,
    /// 최대 낙폭 구간의 최저점 날짜
    pub max_drawdown_date: Option<NaiveDate>,
    /// 마지막 포인트의 고점 대비 하락률 (고점 이상이면 0)
    pub current_drawdown: f64,
    /// 가장 긴 구간의 길이 (일)
    pub max_drawdown_duration: Option<i64>,
    /// 전체 날짜의 고점 대비 하락률 시계열
    pub underwater: Vec<DrawdownPoint>,
}

impl DrawdownReport {
    /// 하락률 값만 반환합니다.
    pub fn underwater_values(&self) -> Vec<f64> {
        self.underwater.iter().map(|p| p.drawdown).collect()
    }
}

/// 열린 낙폭 구간.
#[derive(Debug, Clone, Copy)]
struct OpenEpisode {
    start_date: NaiveDate,
    peak_value: Decimal,
    trough: ValuePoint,
    depth: f64,
}

#[derive(Debug, Clone, Copy)]
enum State {
    AtOrAbovePeak,
    Underwater(OpenEpisode),
}

/// 낙폭 분석기.
#[derive(Debug, Clone)]
pub struct DrawdownAnalyzer {
    worst_n: usize,
}

impl Default for DrawdownAnalyzer {
    fn default() -> Self {
        Self { worst_n: 5 }
    }
}

impl DrawdownAnalyzer {
    /// 최악 N개 보고 개수를 지정해 분석기를 생성합니다.
    pub fn new(worst_n: usize) -> Self {
        Self { worst_n }
    }

    /// 가치 시계열의 낙폭을 분석합니다.
    ///
    /// 빈 시계열은 구간이 없는 기본 보고서를 반환합니다.
    pub fn analyze(&self, series: &ValueSeries) -> DrawdownReport {
        let points = series.points();
        let values = series.values();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return DrawdownReport::default();
        };

        let mut episodes = Vec::new();
        let mut underwater = Vec::with_capacity(points.len());
        let mut state = State::AtOrAbovePeak;
        let mut peak = values[0];
        let mut peak_point = *first;

        for (point, &value) in points.iter().zip(values) {
            if value >= peak {
                if let State::Underwater(open) = state {
                    episodes.push(close_episode(open, point.date));
                }
                state = State::AtOrAbovePeak;
                peak = value;
                peak_point = *point;
                underwater.push(DrawdownPoint {
                    date: point.date,
                    drawdown: 0.0,
                });
                continue;
            }

            let depth = value / peak - 1.0;
            underwater.push(DrawdownPoint {
                date: point.date,
                drawdown: depth,
            });

            state = match state {
                State::AtOrAbovePeak => State::Underwater(OpenEpisode {
                    start_date: peak_point.date,
                    peak_value: peak_point.value,
                    trough: *point,
                    depth,
                }),
                State::Underwater(open) if depth < open.depth => State::Underwater(OpenEpisode {
                    trough: *point,
                    depth,
                    ..open
                }),
                unchanged => unchanged,
            };
        }

        let current_drawdown = match state {
            State::Underwater(open) => {
                episodes.push(open_episode(open, last.date));
                underwater.last().map(|p| p.drawdown).unwrap_or(0.0)
            }
            State::AtOrAbovePeak => 0.0,
        };

        let ranked = worst_episodes(&episodes, episodes.len());
        let max_drawdown = ranked.first().map(|e| e.depth).unwrap_or(0.0);
        let max_drawdown_date = ranked.first().map(|e| e.trough_date);
        let worst = ranked.into_iter().take(self.worst_n).collect();
        let max_drawdown_duration = episodes.iter().map(|e| e.duration_days).max();

        DrawdownReport {
            episodes,
            worst,
            max_drawdown,
            max_drawdown_date,
            current_drawdown,
            max_drawdown_duration,
            underwater,
        }
    }
}

fn close_episode(open: OpenEpisode, end_date: NaiveDate) -> DrawdownEpisode {
    DrawdownEpisode {
        start_date: open.start_date,
        trough_date: open.trough.date,
        end_date: Some(end_date),
        depth: open.depth,
        peak_value: open.peak_value,
        trough_value: open.trough.value,
        duration_days: (end_date - open.start_date).num_days(),
        recovery_days: Some((end_date - open.trough.date).num_days()),
    }
}

fn open_episode(open: OpenEpisode, last_date: NaiveDate) -> DrawdownEpisode {
    DrawdownEpisode {
        start_date: open.start_date,
        trough_date: open.trough.date,
        end_date: None,
        depth: open.depth,
        peak_value: open.peak_value,
        trough_value: open.trough.value,
        duration_days: (last_date - open.start_date).num_days(),
        recovery_days: None,
    }
}

/// 깊이 오름차순(가장 깊은 것 먼저)으로 상위 `n`개 구간을 반환합니다.
///
/// 깊이가 같으면 시작일이 빠른 구간이 먼저 옵니다.
pub fn worst_episodes(episodes: &[DrawdownEpisode], n: usize) -> Vec<DrawdownEpisode> {
    let mut sorted = episodes.to_vec();
    sorted.sort_by(|a, b| {
        a.depth
            .total_cmp(&b.depth)
            .then_with(|| a.start_date.cmp(&b.start_date))
    });
    sorted.truncate(n);
    sorted
}

/// 누적 가치 값에서 고점 대비 하락률을 계산합니다.
///
/// 롤링 엔진처럼 가치 대신 수익률만 있는 경우에도 사용합니다.
pub fn running_drawdowns(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::MIN;
    values
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            if value >= peak {
                0.0
            } else {
                value / peak - 1.0
            }
        })
        .collect()
}
