//! 비율 지표 유틸리티.
//!
//! JSON은 무한대를 표현할 수 없으므로, 상한이 없는 비율(손실일이 없을 때의
//! profit factor)은 문자열 `"inf"`로 직렬화합니다.

use serde::{Deserialize, Deserializer, Serializer};

/// 비율(0.01 = 1%)을 퍼센트 문자열로 변환합니다 (예: "5.25%").
pub fn format_pct(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    format!("{:.2}%", value * 100.0)
}

/// 상한 없는 비율의 serde 헬퍼.
///
/// `#[serde(with = "folio_core::unbounded")]`로 사용합니다.
pub mod unbounded {
    use super::*;

    const INF: &str = "inf";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_infinite() && value.is_sign_positive() {
            serializer.serialize_str(INF)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) if s.eq_ignore_ascii_case(INF) => Ok(f64::INFINITY),
            Repr::Text(s) => Err(serde::de::Error::custom(format!(
                "expected number or \"inf\", got {:?}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(with = "unbounded")]
        factor: f64,
    }

    #[test]
    fn test_unbounded_infinity_as_string() {
        let json = serde_json::to_string(&Holder { factor: f64::INFINITY }).unwrap();
        assert_eq!(json, r#"{"factor":"inf"}"#);

        let back: Holder = serde_json::from_str(&json).unwrap();
        assert!(back.factor.is_infinite());
    }

    #[test]
    fn test_unbounded_finite_number() {
        let json = serde_json::to_string(&Holder { factor: 1.5 }).unwrap();
        assert_eq!(json, r#"{"factor":1.5}"#);
        assert!(serde_json::from_str::<Holder>(r#"{"factor":"big"}"#).is_err());
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(0.0525), "5.25%");
        assert_eq!(format_pct(-0.1), "-10.00%");
        assert_eq!(format_pct(f64::INFINITY), "inf");
    }
}
