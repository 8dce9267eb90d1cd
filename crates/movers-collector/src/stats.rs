//! 수집 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 수집 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 총 시도 횟수 (테마 수)
    pub total: usize,
    /// 성공 횟수
    pub success: usize,
    /// 에러 횟수 (일부 페이지만 수집된 경우 포함)
    pub errors: usize,
    /// 빈 데이터 (조회 성공, 구성 종목 없음)
    pub empty: usize,
    /// 요청한 페이지 수
    pub pages_fetched: usize,
    /// 매핑된 종목 수
    pub stocks_mapped: usize,
    /// 종목당 평균 테마 수
    pub avg_themes_per_stock: f64,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            empty = self.empty,
            pages = self.pages_fetched,
            stocks = self.stocks_mapped,
            avg_themes = format!("{:.1}", self.avg_themes_per_stock),
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let stats = CollectionStats {
            total: 4,
            success: 3,
            errors: 1,
            ..Default::default()
        };
        assert_eq!(stats.success_rate(), 75.0);
        assert_eq!(CollectionStats::new().success_rate(), 0.0);
    }
}
