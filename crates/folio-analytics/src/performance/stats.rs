//! 수익률 통계 기본 함수.
//!
//! 모든 분산/공분산/모멘트는 모집단(n으로 나눔) 기준입니다.
//! 빈 입력은 0을 반환합니다.

/// 분모가 0이거나 결과가 유한하지 않으면 0을 반환하는 나눗셈.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// 산술 평균.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 조건을 만족하는 값의 평균. 해당 값이 없으면 `None`.
pub fn conditional_mean<F>(values: &[f64], predicate: F) -> Option<f64>
where
    F: Fn(f64) -> bool,
{
    let (sum, count) = values
        .iter()
        .filter(|v| predicate(**v))
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));

    (count > 0).then(|| sum / count as f64)
}

/// 평균으로부터의 편차.
///
/// 첫 값을 기준으로 이동한 뒤 평균을 빼므로, 상수 시계열의 편차는 정확히 0입니다.
fn deviations(values: &[f64]) -> Vec<f64> {
    let Some(&shift) = values.first() else {
        return Vec::new();
    };
    let shifted: Vec<f64> = values.iter().map(|v| v - shift).collect();
    let shifted_mean = mean(&shifted);
    shifted.into_iter().map(|v| v - shifted_mean).collect()
}

/// 모집단 공분산.
///
/// 길이가 다르면 짧은 쪽 길이까지만 사용합니다.
pub fn covariance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let dx = deviations(&x[..n]);
    let dy = deviations(&y[..n]);

    let cov: f64 = dx.iter().zip(&dy).map(|(a, b)| a * b).sum();
    cov / n as f64
}

/// 모집단 분산. `covariance(x, x)`와 비트 단위로 같습니다.
pub fn variance(values: &[f64]) -> f64 {
    covariance(values, values)
}

/// 모집단 표준편차.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// 하방 편차 `sqrt(mean(min(r, 0)^2))`.
pub fn downside_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|r| r.min(0.0).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// 선형 보간 백분위수 (`p`는 0.0 ~ 1.0).
///
/// 위치 `p * (n - 1)`의 양옆 순서 통계량을 보간합니다.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// 3차/4차 표준화 모멘트 (왜도, 첨도).
///
/// 첨도는 초과 첨도가 아닌 원시 4차 모멘트입니다 (정규분포 = 3).
/// 표준편차가 0이면 둘 다 0입니다.
pub fn skew_kurtosis(values: &[f64]) -> (f64, f64) {
    let std = std_dev(values);
    if values.is_empty() || std == 0.0 {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;

    let (m3, m4) = deviations(values)
        .iter()
        .fold((0.0, 0.0), |(m3, m4), d| (m3 + d.powi(3), m4 + d.powi(4)));

    (
        safe_ratio(m3 / n, std.powi(3)),
        safe_ratio(m4 / n, std.powi(4)),
    )
}

/// 기하 평균 `(Π(1 + r))^(1/n) - 1`.
pub fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let log_sum: f64 = values.iter().map(|r| (1.0 + r).ln()).sum();
    (log_sum / values.len() as f64).exp() - 1.0
}

/// 고점 대비 하락률 시계열의 제곱평균제곱근 (Ulcer Index).
pub fn ulcer_index(drawdowns: &[f64]) -> f64 {
    if drawdowns.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = drawdowns.iter().map(|d| d * d).sum();
    (sum_sq / drawdowns.len() as f64).sqrt()
}
