//! 분석 결과 전반에서 사용되는 공통 타입.

mod ratio;

pub use ratio::*;
