//! 설정 관리.
//!
//! 분석 엔진의 상수(연환산 계수, 무위험 수익률, 롤링 윈도우 크기 등)와
//! 벤치마크 카탈로그를 정의합니다. 로드 순서는 기본값 → TOML 파일 →
//! `FOLIO__` 접두사 환경 변수입니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{AnalyticsError, AnalyticsResult};

/// 분석 엔진 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    /// 위험/수익 지표 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// 롤링 윈도우 설정
    #[serde(default)]
    pub rolling: RollingConfig,
    /// 낙폭 보고 설정
    #[serde(default)]
    pub drawdown: DrawdownConfig,
    /// 벤치마크 카탈로그 (id → 정보)
    #[serde(default = "default_benchmarks")]
    pub benchmarks: BTreeMap<String, BenchmarkInfo>,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            metrics: MetricsConfig::default(),
            rolling: RollingConfig::default(),
            drawdown: DrawdownConfig::default(),
            benchmarks: default_benchmarks(),
            logging: LoggingConfig::default(),
        }
    }
}

/// 위험/수익 지표 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// 연환산 계수 (연간 거래일 수)
    pub annualization_factor: f64,
    /// 연간 무위험 수익률 (0.03 = 3%)
    pub risk_free_rate: f64,
    /// Omega 비율 임계값 (일간)
    pub omega_threshold: f64,
    /// CAGR 계산에 사용하는 연간 달력 일수
    pub calendar_days_per_year: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            annualization_factor: 252.0,
            risk_free_rate: 0.0,
            omega_threshold: 0.0,
            calendar_days_per_year: 365.0,
        }
    }
}

impl MetricsConfig {
    /// 일간 무위험 수익률.
    pub fn daily_risk_free(&self) -> f64 {
        self.risk_free_rate / self.annualization_factor
    }
}

/// 롤링 윈도우 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RollingConfig {
    /// 선호 윈도우 크기 (거래일)
    pub preferred_window: usize,
    /// 최소 윈도우 크기 (거래일)
    pub min_window: usize,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            preferred_window: 20,
            min_window: 5,
        }
    }
}

/// 낙폭 보고 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DrawdownConfig {
    /// 보고할 최악 낙폭 구간 수
    pub worst_n: usize,
}

impl Default for DrawdownConfig {
    fn default() -> Self {
        Self { worst_n: 5 }
    }
}

/// 벤치마크 카탈로그 항목.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BenchmarkInfo {
    /// 표시 이름
    pub name: String,
    /// 데이터 제공자 심볼
    pub symbol: String,
}

impl BenchmarkInfo {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

fn default_benchmarks() -> BTreeMap<String, BenchmarkInfo> {
    [
        ("sp500", "S&P 500", "^GSPC"),
        ("nasdaq100", "NASDAQ 100", "^NDX"),
        ("csi300", "CSI 300", "000300.SS"),
        ("a500", "CSI A500", "000510.SS"),
        ("hstech", "Hang Seng TECH", "^HSTECH"),
        ("btc", "Bitcoin", "BTC-USD"),
        ("gold", "Gold", "GC=F"),
    ]
    .into_iter()
    .map(|(id, name, symbol)| (id.to_string(), BenchmarkInfo::new(name, symbol)))
    .collect()
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AnalyticsConfig {
    /// 기본값 위에 파일과 환경 변수를 덮어써서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&AnalyticsConfig::default())?;

        let builder = config::Config::builder()
            // 기본값으로 시작
            .add_source(defaults)
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AnalyticsConfig = builder.build()?.try_deserialize()?;
        config
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 설정값의 유효성을 검사합니다.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let metrics = &self.metrics;
        if !metrics.annualization_factor.is_finite() || metrics.annualization_factor <= 0.0 {
            return Err(AnalyticsError::Config(format!(
                "annualization_factor는 0보다 커야 합니다: {}",
                metrics.annualization_factor
            )));
        }
        if !metrics.calendar_days_per_year.is_finite() || metrics.calendar_days_per_year <= 0.0 {
            return Err(AnalyticsError::Config(format!(
                "calendar_days_per_year는 0보다 커야 합니다: {}",
                metrics.calendar_days_per_year
            )));
        }
        if self.rolling.min_window < 2 {
            return Err(AnalyticsError::Config(format!(
                "min_window는 2 이상이어야 합니다: {}",
                self.rolling.min_window
            )));
        }
        if self.rolling.preferred_window < self.rolling.min_window {
            return Err(AnalyticsError::Config(format!(
                "preferred_window({})가 min_window({})보다 작습니다",
                self.rolling.preferred_window, self.rolling.min_window
            )));
        }
        Ok(())
    }

    /// 벤치마크 표시 이름을 반환합니다. 카탈로그에 없으면 id를 그대로 사용합니다.
    pub fn benchmark_name(&self, id: &str) -> String {
        self.benchmarks
            .get(id)
            .map(|info| info.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.metrics.annualization_factor, 252.0);
        assert_eq!(config.rolling.preferred_window, 20);
        assert_eq!(config.rolling.min_window, 5);
        assert_eq!(config.drawdown.worst_n, 5);
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let mut config = AnalyticsConfig::default();
        config.rolling.min_window = 1;
        assert!(matches!(config.validate(), Err(AnalyticsError::Config(_))));

        let mut config = AnalyticsConfig::default();
        config.rolling.preferred_window = 3;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.metrics.annualization_factor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_benchmark_catalog() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.benchmark_name("sp500"), "S&P 500");
        assert_eq!(config.benchmark_name("custom"), "custom");
        assert_eq!(config.benchmarks.len(), 7);
    }

    #[test]
    fn test_daily_risk_free() {
        let metrics = MetricsConfig {
            risk_free_rate: 0.0252,
            ..Default::default()
        };
        assert!((metrics.daily_risk_free() - 0.0001).abs() < 1e-12);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AnalyticsConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.rolling.preferred_window, 20);
        assert_eq!(config.benchmark_name("btc"), "Bitcoin");
    }
}
