//! 포트폴리오 성과 분석 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - NAV/벤치마크 CSV 로딩
//! - 기간별 분석 보고서 출력
//! - 다중 벤치마크 비교

pub mod commands;

pub use commands::*;
