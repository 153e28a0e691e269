//! 성과 분석 도메인 모델.
//!
//! - [`series`]: 순자산 가치/수익률 시계열
//! - [`period`]: 기간 선택자와 날짜 범위
//! - [`benchmark`]: 벤치마크 입력

pub mod benchmark;
pub mod period;
pub mod series;

pub use benchmark::BenchmarkInput;
pub use period::{DateRange, PeriodSelector};
pub use series::{ReturnPoint, ValuePoint, ValueSeries};
