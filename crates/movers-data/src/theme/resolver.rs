//! 런타임 테마 조회.

use std::collections::BTreeSet;

use movers_core::ThemeConstituent;
use tracing::{debug, trace};

use super::ThemeMapping;
use crate::error::Result;
use crate::provider::{NaverClient, PageFetcher};

/// 테마 매핑과 클라이언트를 묶은 조회기. 매핑은 읽기 전용입니다.
pub struct ThemeResolver<'a, F: PageFetcher> {
    mapping: &'a ThemeMapping,
    client: &'a NaverClient<F>,
}

impl<'a, F: PageFetcher> ThemeResolver<'a, F> {
    pub fn new(mapping: &'a ThemeMapping, client: &'a NaverClient<F>) -> Self {
        Self { mapping, client }
    }

    pub fn mapping(&self) -> &ThemeMapping {
        self.mapping
    }

    /// 종목들의 테마 합집합. 매핑이 없는 종목은 건너뜁니다.
    pub fn themes_for<'n, I>(&self, names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut themes = BTreeSet::new();
        for name in names {
            match self.mapping.themes_of(name) {
                Ok(found) => themes.extend(found.iter().cloned()),
                Err(gap) => trace!(%gap, "테마 매핑 없음"),
            }
        }
        themes
    }

    /// 테마 번호
    pub fn id_for(&self, theme: &str) -> Option<&'a str> {
        self.mapping.theme_id(theme).ok()
    }

    /// 테마 구성 종목 (한 페이지)
    pub async fn details_for(&self, theme_id: &str) -> Result<Vec<ThemeConstituent>> {
        self.client.get_theme_details(theme_id).await
    }

    /// 테마명으로 구성 종목 조회. 번호가 없는 테마는 None.
    pub async fn details_for_theme(&self, theme: &str) -> Result<Option<Vec<ThemeConstituent>>> {
        let Some(id) = self.id_for(theme) else {
            debug!(theme, "테마 번호 없음");
            return Ok(None);
        };
        self.details_for(id).await.map(Some)
    }
}
