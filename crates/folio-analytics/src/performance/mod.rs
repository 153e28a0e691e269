//! 성과 분석 모듈
//!
//! 수익률 시계열 하나에 대한 위험/수익 지표를 계산합니다.
//!
//! # 모듈 구성
//!
//! - [`metrics`]: 지표 묶음 계산 (샤프비율, 최대낙폭, 승률 등)
//! - [`stats`]: 평균/분산/백분위수 등 기본 통계 함수

pub mod metrics;
pub mod stats;

pub use metrics::*;
