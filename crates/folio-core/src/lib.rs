//! # Folio Core
//!
//! 포트폴리오 성과 분석의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! - 순자산 가치/수익률 시계열 ([`ValueSeries`], [`ReturnPoint`])
//! - 기간 선택자와 날짜 범위
//! - 에러 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
