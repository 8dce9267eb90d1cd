//! 테마 매핑 크롤링 모듈.
//!
//! 테마 목록 페이지를 순회해 테마명/번호를 모으고, 테마마다 구성 종목
//! 페이지를 넘기며 종목명을 수집한 뒤 두 매핑 파일을 한 번에 덮어씁니다.
//!
//! ## 페이지 순회 종료 조건
//! - 새 종목명이 하나도 없는 페이지
//! - "맨뒤" 링크(`td.pgRR a`)가 없는 페이지
//! - 페이지 상한 도달
//!
//! 모든 요청 사이에는 딜레이를 둡니다. 중간에 중단되거나 한 테마라도 실패하면
//! 기존 파일은 그대로 남습니다.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use movers_data::theme::{parse_theme_list, parse_theme_members, ThemeLink};
use movers_data::{DataError, Endpoints, FetchError, HttpFetcher, PageFetcher, ThemeMapping};

use crate::config::{CollectorConfig, ThemeCrawlConfig};
use crate::error::CollectorError;
use crate::{CollectionStats, Result};

/// 요청 사이에 딜레이를 두는 fetcher 래퍼. 첫 요청은 바로 보냅니다.
struct PoliteFetcher<'a, F: ?Sized> {
    inner: &'a F,
    delay: Duration,
    requests: usize,
}

impl<'a, F: PageFetcher + ?Sized> PoliteFetcher<'a, F> {
    fn new(inner: &'a F, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            requests: 0,
        }
    }

    async fn fetch(&mut self, url: &str) -> std::result::Result<String, FetchError> {
        if self.requests > 0 {
            tokio::time::sleep(self.delay).await;
        }
        self.requests += 1;
        self.inner.fetch_document(url).await
    }
}

/// 한 테마의 수집 결과
struct ThemeMembers {
    names: Vec<String>,
    error: Option<DataError>,
}

/// 테마 매핑 동기화 (크롤링 후 파일 저장).
pub async fn sync_themes(config: &CollectorConfig) -> Result<CollectionStats> {
    let fetcher = HttpFetcher::new(&config.http)?;
    let endpoints = Endpoints::new(&config.http.base_url);

    build_and_save(&fetcher, &endpoints, &config.theme_crawl).await
}

/// 크롤링이 모든 테마에서 성공했을 때만 두 매핑 파일을 덮어씁니다.
///
/// 한 테마라도 실패하면 기존 파일을 그대로 두고 `DataSource` 에러를 반환합니다.
pub async fn build_and_save<F>(
    fetcher: &F,
    endpoints: &Endpoints,
    crawl: &ThemeCrawlConfig,
) -> Result<CollectionStats>
where
    F: PageFetcher + ?Sized,
{
    let (mapping, stats) = crawl_themes(fetcher, endpoints, crawl).await?;

    if stats.errors > 0 {
        stats.log_summary("테마 매핑 빌드 (저장 안 함)");
        return Err(CollectorError::DataSource(format!(
            "테마 {}/{}개 수집 실패, 기존 매핑 파일 유지",
            stats.errors, stats.total
        )));
    }

    mapping.save(&crawl.stock_themes_path(), &crawl.theme_map_path())?;
    info!(
        stock_themes = %crawl.stock_themes_path().display(),
        theme_map = %crawl.theme_map_path().display(),
        "테마 매핑 파일 갱신"
    );

    Ok(stats)
}

/// 전체 테마를 크롤링해 매핑을 만듭니다. 파일은 쓰지 않습니다.
pub async fn crawl_themes<F>(
    fetcher: &F,
    endpoints: &Endpoints,
    config: &ThemeCrawlConfig,
) -> Result<(ThemeMapping, CollectionStats)>
where
    F: PageFetcher + ?Sized,
{
    config.validate()?;
    let started = Instant::now();
    let mut client = PoliteFetcher::new(fetcher, config.request_delay());

    info!("테마 목록 수집 시작");
    let themes = discover_themes(&mut client, endpoints, config.max_list_pages).await?;
    if themes.is_empty() {
        return Err(CollectorError::DataSource(
            "테마 목록이 비어 있습니다".to_string(),
        ));
    }
    info!(count = themes.len(), "테마 목록 수집 완료");

    let mut mapping = ThemeMapping::new();
    let mut stats = CollectionStats::new();
    stats.total = themes.len();

    for (i, theme) in themes.iter().enumerate() {
        debug!(
            progress = format!("{}/{}", i + 1, themes.len()),
            theme = %theme.name,
            "테마 구성 종목 수집"
        );
        mapping.insert_theme(&theme.name, &theme.id);

        let members =
            collect_theme_members(&mut client, endpoints, &theme.id, config.max_pages_per_theme).await;
        for name in &members.names {
            mapping.add_member(name, &theme.name);
        }

        match (&members.error, members.names.is_empty()) {
            (Some(e), _) => {
                warn!(theme = %theme.name, id = %theme.id, error = %e, collected = members.names.len(), "테마 수집 실패");
                stats.errors += 1;
            }
            (None, true) => stats.empty += 1,
            (None, false) => stats.success += 1,
        }
    }

    stats.pages_fetched = client.requests;
    stats.stocks_mapped = mapping.stock_count();
    stats.avg_themes_per_stock = mapping.average_themes_per_stock();
    stats.elapsed = started.elapsed();

    Ok((mapping, stats))
}

/// 테마 목록 페이지 순회. 첫 페이지 실패는 오류입니다.
async fn discover_themes<F>(
    client: &mut PoliteFetcher<'_, F>,
    endpoints: &Endpoints,
    max_list_pages: u32,
) -> Result<Vec<ThemeLink>>
where
    F: PageFetcher + ?Sized,
{
    let mut seen = HashSet::new();
    let mut themes = Vec::new();

    for page in 1..=max_list_pages {
        let html = match client.fetch(&endpoints.theme_list(page)).await {
            Ok(html) => html,
            Err(e) if page == 1 => return Err(e.into()),
            Err(e) => {
                warn!(page, error = %e, "테마 목록 페이지 실패, 목록 수집 중단");
                break;
            }
        };

        let listing = parse_theme_list(&html)?;
        let before = themes.len();
        for link in listing.themes {
            if seen.insert(link.name.clone()) {
                themes.push(link);
            }
        }

        if themes.len() == before || !listing.has_next {
            break;
        }
    }

    Ok(themes)
}

/// 한 테마의 구성 종목 페이지 순회.
async fn collect_theme_members<F>(
    client: &mut PoliteFetcher<'_, F>,
    endpoints: &Endpoints,
    theme_id: &str,
    max_pages: u32,
) -> ThemeMembers
where
    F: PageFetcher + ?Sized,
{
    let mut names: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for page in 1..=max_pages {
        let page_result = match client.fetch(&endpoints.theme_detail_page(theme_id, page)).await {
            Ok(html) => parse_theme_members(&html).map_err(DataError::from),
            Err(e) => Err(DataError::from(e)),
        };
        let members = match page_result {
            Ok(members) => members,
            Err(error) => {
                return ThemeMembers {
                    names,
                    error: Some(error),
                }
            }
        };

        let before = names.len();
        for name in members.names {
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }

        if names.len() == before || !members.has_next {
            break;
        }
        if page == max_pages {
            debug!(theme_id, max_pages, "페이지 상한 도달");
        }
    }

    ThemeMembers { names, error: None }
}
