//! 롤링 시계열 캐시.
//!
//! 롤링 지표 계산 자체는 순수 함수이며, 같은 입력을 반복 요청하는 호출자가
//! 직접 소유하는 메모이제이션 객체입니다. 키는 (시계열 지문, 유효 윈도우)입니다.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::rolling::{RollingEngine, RollingInput, RollingPoint};

/// 기본 최대 항목 수
pub const DEFAULT_CAPACITY: usize = 64;

/// 캐시 키.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// 날짜와 수익률 비트 패턴의 해시
    pub fingerprint: u64,
    /// 유효 윈도우 크기 (이력 부족이면 0)
    pub window: usize,
}

/// 캐시 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// 적중률 (요청이 없으면 0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 롤링 시계열 메모이제이션 캐시.
///
/// 용량을 넘으면 가장 먼저 들어온 항목부터 제거합니다.
#[derive(Debug)]
pub struct RollingCache {
    entries: HashMap<CacheKey, Arc<Vec<RollingPoint>>>,
    order: VecDeque<CacheKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for RollingCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RollingCache {
    /// 최대 항목 수를 지정하여 캐시를 생성합니다. 0은 1로 취급합니다.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// 입력에 대한 캐시 키를 계산합니다.
    pub fn key(engine: &RollingEngine, input: &RollingInput<'_>) -> CacheKey {
        CacheKey {
            fingerprint: fingerprint(input),
            window: engine.effective_window(input.len()).unwrap_or(0),
        }
    }

    /// 캐시된 롤링 시계열을 반환하거나, 없으면 계산해서 저장합니다.
    pub fn get_or_compute(
        &mut self,
        engine: &RollingEngine,
        input: &RollingInput<'_>,
    ) -> Arc<Vec<RollingPoint>> {
        let key = Self::key(engine, input);

        if let Some(points) = self.entries.get(&key) {
            self.hits += 1;
            debug!(fingerprint = key.fingerprint, window = key.window, "Rolling cache hit");
            return Arc::clone(points);
        }

        self.misses += 1;
        let points = Arc::new(engine.compute(input));
        self.insert(key, Arc::clone(&points));
        points
    }

    fn insert(&mut self, key: CacheKey, points: Arc<Vec<RollingPoint>>) {
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.entries.insert(key, points);
        self.order.push_back(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 모든 항목과 통계를 초기화합니다.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// 날짜, 전략 수익률, 벤치마크 수익률(있으면)의 비트 패턴을 해시합니다.
pub fn fingerprint(input: &RollingInput<'_>) -> u64 {
    let mut hasher = DefaultHasher::new();
    input.dates.hash(&mut hasher);
    for r in input.strategy {
        r.to_bits().hash(&mut hasher);
    }
    match input.benchmark {
        Some(bench) => {
            1u8.hash(&mut hasher);
            for r in bench {
                r.to_bits().hash(&mut hasher);
            }
        }
        None => 0u8.hash(&mut hasher),
    }
    hasher.finish()
}
