//! 포트폴리오 분석 모듈
//!
//! 보고 화면의 차트/히트맵용 데이터를 생성합니다.
//!
//! # 모듈 구성
//!
//! - [`equity_curve`]: 정규화 자산 곡선 (포트폴리오/벤치마크)
//! - [`periods`]: 월별/연도별 복리 수익률과 통화 손익
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use folio_analytics::portfolio::PeriodAggregator;
//! use rust_decimal_macros::dec;
//!
//! let aggregator = PeriodAggregator::new(dec!(10_000_000));
//! for month in aggregator.monthly(&returns) {
//!     println!("{}-{:02}: {:.2}%", month.year, month.month, month.return_value * 100.0);
//! }
//! ```

pub mod equity_curve;
pub mod periods;

pub use equity_curve::*;
pub use periods::*;
