//! 벤치마크 입력.

use serde::{Deserialize, Serialize};

use super::series::ValueSeries;

/// 비교 대상 벤치마크 시계열.
///
/// `id`는 설정의 벤치마크 카탈로그 키 (예: `sp500`)이며 보고서의 이름 표시에 사용됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkInput {
    /// 벤치마크 식별자
    pub id: String,
    /// 벤치마크 가치 시계열 (포트폴리오와 날짜가 독립적)
    pub series: ValueSeries,
}

impl BenchmarkInput {
    pub fn new(id: impl Into<String>, series: ValueSeries) -> Self {
        Self {
            id: id.into(),
            series,
        }
    }
}
