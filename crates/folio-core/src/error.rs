//! 성과 분석 엔진의 에러 타입.
//!
//! 이 모듈은 분석 파이프라인 전반에서 사용되는 에러 타입을 정의합니다.
//! 분모가 0인 비율 지표는 에러가 아니라 0으로 보고되므로 여기에 포함되지 않습니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// 분석 에러.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// 계산에 필요한 데이터 부족 (값 포인트 2개 미만)
    #[error("데이터 부족: 최소 {required}개 필요, 실제 {actual}개")]
    InsufficientData {
        /// 필요한 최소 포인트 수
        required: usize,
        /// 실제 포인트 수
        actual: usize,
    },

    /// 0 이하이거나 변환 불가능한 순자산 가치
    #[error("잘못된 자산 가치: {date}의 값 {value}")]
    InvalidValue {
        /// 문제가 된 날짜
        date: NaiveDate,
        /// 문제가 된 값
        value: Decimal,
    },

    /// 정렬되지 않은 쌍 시계열이 비교기에 직접 전달됨
    #[error("날짜 정렬 불일치: 전략 {strategy_len}개, 벤치마크 {benchmark_len}개")]
    DateAlignment {
        /// 전략 수익률 개수
        strategy_len: usize,
        /// 벤치마크 수익률 개수
        benchmark_len: usize,
    },

    /// 날짜가 엄격한 오름차순이 아님 (중복 또는 역순)
    #[error("날짜 순서 오류: {date}")]
    UnorderedSeries {
        /// 순서를 어긴 날짜
        date: NaiveDate,
    },

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 분석 작업을 위한 Result 타입.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_value_message() {
        let err = AnalyticsError::InvalidValue {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            value: dec!(-1),
        };
        let message = err.to_string();
        assert!(message.contains("2024-01-02"));
        assert!(message.contains("-1"));
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = AnalyticsError::InsufficientData {
            required: 2,
            actual: 1,
        };
        let message = err.to_string();
        assert!(message.contains('2'));
        assert!(message.contains('1'));
    }
}
