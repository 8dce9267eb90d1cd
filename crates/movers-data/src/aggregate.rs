//! 다중 소스 집계.
//!
//! 소스마다 가져오기 → 표 추출 → 정규화를 독립적으로 수행하고, 모든 소스가
//! 끝난 뒤 호출자가 준 순서대로 병합합니다. 실패한 소스는 레코드 없이
//! 실패 목록에만 남습니다.
//!
//! 병합 규칙:
//! 1. 종목명 기준 중복 제거 (먼저 나온 소스 우선)
//! 2. 정렬 키 내림차순 안정 정렬 (동률은 입력 순서 유지)
//! 3. `limit`개로 자르고 1부터 순위 재부여

use std::cmp::Reverse;
use std::collections::HashSet;

use futures::future::join_all;
use movers_core::{ColumnMap, SortMode, StockRecord};
use tracing::{debug, info, instrument, warn};

use crate::error::{DataError, Result};
use crate::parse::parse_report;
use crate::provider::PageFetcher;

/// 집계 대상 소스 (URL + 레이아웃).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub url: String,
    pub columns: ColumnMap,
}

impl Source {
    pub fn new(url: impl Into<String>, columns: ColumnMap) -> Self {
        Self {
            url: url.into(),
            columns,
        }
    }
}

/// 실패한 소스.
#[derive(Debug)]
pub struct SourceFailure {
    pub url: String,
    pub error: DataError,
}

/// 집계 결과.
#[derive(Debug, Default)]
pub struct TopStocks {
    /// 순위가 매겨진 레코드 (rank 1..N)
    pub records: Vec<StockRecord>,
    /// 실패한 소스 목록
    pub failed_sources: Vec<SourceFailure>,
    /// 요청한 소스 수
    pub source_count: usize,
}

impl TopStocks {
    /// 모든 소스가 실패했는지 여부. "행 없음"과 "전체 실패"를 구분합니다.
    pub fn all_failed(&self) -> bool {
        self.source_count > 0 && self.failed_sources.len() == self.source_count
    }

    pub fn is_partial(&self) -> bool {
        !self.failed_sources.is_empty() && !self.all_failed()
    }
}

/// 소스들을 동시에 가져와 병합/정렬/순위 부여합니다.
#[instrument(skip(fetcher, sources), fields(sources = sources.len()))]
pub async fn aggregate<F>(fetcher: &F, sources: &[Source], limit: usize, sort: SortMode) -> TopStocks
where
    F: PageFetcher + ?Sized,
{
    let results = join_all(sources.iter().map(|source| fetch_source(fetcher, source))).await;

    let mut batches = Vec::with_capacity(sources.len());
    let mut failed_sources = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(records) => {
                debug!(url = %source.url, variant = %source.columns.variant, count = records.len(), "소스 수집 완료");
                batches.push(records);
            }
            Err(e) => {
                warn!(url = %source.url, variant = %source.columns.variant, error = %e, "소스 수집 실패, 건너뜀");
                failed_sources.push(SourceFailure {
                    url: source.url.clone(),
                    error: e,
                });
            }
        }
    }

    let records = merge_ranked(batches, limit, sort);
    info!(
        count = records.len(),
        failed = failed_sources.len(),
        sort = %sort,
        "상위 종목 집계 완료"
    );

    TopStocks {
        records,
        failed_sources,
        source_count: sources.len(),
    }
}

async fn fetch_source<F>(fetcher: &F, source: &Source) -> Result<Vec<StockRecord>>
where
    F: PageFetcher + ?Sized,
{
    let html = fetcher.fetch_document(&source.url).await?;
    Ok(parse_report(&html, &source.columns)?)
}

/// 소스별 레코드 묶음을 병합합니다 (입력 순서 = 소스 우선순위).
pub fn merge_ranked(batches: Vec<Vec<StockRecord>>, limit: usize, sort: SortMode) -> Vec<StockRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<StockRecord> = batches
        .into_iter()
        .flatten()
        .filter(|record| {
            let first = seen.insert(record.name.clone());
            if !first {
                debug!(name = %record.name, variant = %record.source_variant, "중복 종목 건너뜀");
            }
            first
        })
        .collect();

    merged.sort_by_key(|record| Reverse(sort.key(record)));
    merged.truncate(limit);
    assign_ranks(&mut merged);
    merged
}

/// 현재 순서대로 1부터 순위를 매깁니다.
pub fn assign_ranks(records: &mut [StockRecord]) {
    for (i, record) in records.iter_mut().enumerate() {
        record.rank = i as u32 + 1;
    }
}
