//! 테마 매핑 파일.
//!
//! 오프라인 크롤러가 만드는 두 개의 JSON 파일을 읽고 씁니다.
//! - `stock_themes.json`: 종목명 → 테마명 목록
//! - `theme_map.json`: 테마명 → 테마 번호 (문자열)
//!
//! 키는 정렬된 상태로 저장됩니다 (`BTreeMap`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MappingError, MappingGap};

/// 종목 ↔ 테마 매핑.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeMapping {
    /// 종목명 → 테마명 목록 (삽입 순서, 중복 없음)
    pub stock_themes: BTreeMap<String, Vec<String>>,
    /// 테마명 → 테마 번호
    pub theme_ids: BTreeMap<String, String>,
}

impl ThemeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 테마 번호 등록
    pub fn insert_theme(&mut self, theme: impl Into<String>, id: impl Into<String>) {
        self.theme_ids.insert(theme.into(), id.into());
    }

    /// 종목을 테마에 추가합니다. 이미 있으면 무시합니다.
    pub fn add_member(&mut self, stock: &str, theme: &str) {
        let themes = self.stock_themes.entry(stock.to_string()).or_default();
        if !themes.iter().any(|t| t == theme) {
            themes.push(theme.to_string());
        }
    }

    /// 종목의 테마 목록
    pub fn themes_of(&self, stock: &str) -> Result<&[String], MappingGap> {
        self.stock_themes
            .get(stock)
            .map(Vec::as_slice)
            .ok_or_else(|| MappingGap::UnmappedStock(stock.to_string()))
    }

    /// 테마 번호
    pub fn theme_id(&self, theme: &str) -> Result<&str, MappingGap> {
        self.theme_ids
            .get(theme)
            .map(String::as_str)
            .ok_or_else(|| MappingGap::MissingThemeId(theme.to_string()))
    }

    pub fn stock_count(&self) -> usize {
        self.stock_themes.len()
    }

    pub fn theme_count(&self) -> usize {
        self.theme_ids.len()
    }

    /// 종목당 평균 테마 수
    pub fn average_themes_per_stock(&self) -> f64 {
        if self.stock_themes.is_empty() {
            return 0.0;
        }
        let total: usize = self.stock_themes.values().map(Vec::len).sum();
        total as f64 / self.stock_themes.len() as f64
    }

    /// 두 파일에서 매핑을 읽습니다.
    pub fn load(stock_themes_path: &Path, theme_ids_path: &Path) -> Result<Self, MappingError> {
        let mapping = Self {
            stock_themes: read_json(stock_themes_path)?,
            theme_ids: read_json(theme_ids_path)?,
        };
        info!(
            stocks = mapping.stock_count(),
            themes = mapping.theme_count(),
            "테마 매핑 로드"
        );
        Ok(mapping)
    }

    /// 읽기에 실패하면 빈 매핑을 돌려줍니다. 테마 없이도 조회는 동작합니다.
    pub fn load_or_empty(stock_themes_path: &Path, theme_ids_path: &Path) -> Self {
        Self::load(stock_themes_path, theme_ids_path).unwrap_or_else(|e| {
            warn!(error = %e, "테마 매핑을 읽지 못해 빈 매핑 사용");
            Self::default()
        })
    }

    /// 두 파일을 덮어씁니다.
    ///
    /// 두 임시 파일을 모두 쓴 뒤에 종목 파일, 테마 번호 파일 순으로 이름을 바꿉니다.
    /// 각 파일의 교체는 원자적이지만 두 파일의 교체는 순서만 보장되는 별개 작업입니다.
    /// 두 rename 사이에 프로세스가 죽으면 종목 파일만 새 것일 수 있고, 이때 번호가
    /// 없는 테마는 조회 시 `MappingGap`으로 건너뜁니다. 실패한 경로에서는 남은 임시
    /// 파일을 지웁니다.
    pub fn save(&self, stock_themes_path: &Path, theme_ids_path: &Path) -> Result<(), MappingError> {
        let stock_tmp = write_temp(stock_themes_path, &self.stock_themes)?;
        let ids_tmp = match write_temp(theme_ids_path, &self.theme_ids) {
            Ok(tmp) => tmp,
            Err(e) => {
                discard_temp(&stock_tmp);
                return Err(e);
            }
        };
        if let Err(e) = rename(&stock_tmp, stock_themes_path) {
            discard_temp(&stock_tmp);
            discard_temp(&ids_tmp);
            return Err(e);
        }
        if let Err(e) = rename(&ids_tmp, theme_ids_path) {
            discard_temp(&ids_tmp);
            return Err(e);
        }
        info!(
            stocks = self.stock_count(),
            themes = self.theme_count(),
            path = %stock_themes_path.display(),
            "테마 매핑 저장"
        );
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, MappingError> {
    let text = fs::read_to_string(path).map_err(|source| MappingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| MappingError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_temp<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, MappingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| MappingError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| MappingError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|source| MappingError::Io {
        path: tmp.clone(),
        source,
    })?;
    Ok(tmp)
}

fn discard_temp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        warn!(path = %tmp.display(), error = %e, "임시 파일 삭제 실패");
    }
}

fn rename(from: &Path, to: &Path) -> Result<(), MappingError> {
    fs::rename(from, to).map_err(|source| MappingError::Io {
        path: to.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ThemeMapping {
        let mut mapping = ThemeMapping::new();
        mapping.insert_theme("반도체", "136");
        mapping.insert_theme("2차전지", "64");
        mapping.add_member("삼성전자", "반도체");
        mapping.add_member("삼성전자", "반도체");
        mapping.add_member("에코프로", "2차전지");
        mapping.add_member("에코프로", "리튬");
        mapping
    }

    #[test]
    fn test_add_member_dedups() {
        let mapping = sample();
        assert_eq!(mapping.themes_of("삼성전자").unwrap(), ["반도체".to_string()]);
        assert_eq!(mapping.average_themes_per_stock(), 1.5);
    }

    #[test]
    fn test_lookup_gaps() {
        let mapping = sample();
        assert_eq!(mapping.theme_id("반도체").unwrap(), "136");
        assert_eq!(
            mapping.theme_id("리튬"),
            Err(MappingGap::MissingThemeId("리튬".to_string()))
        );
        assert_eq!(
            mapping.themes_of("없는종목"),
            Err(MappingGap::UnmappedStock("없는종목".to_string()))
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("movers-mapping-{}", std::process::id()));
        let stock_path = dir.join("stock_themes.json");
        let ids_path = dir.join("theme_map.json");

        let mapping = sample();
        mapping.save(&stock_path, &ids_path).unwrap();

        let loaded = ThemeMapping::load(&stock_path, &ids_path).unwrap();
        assert_eq!(loaded, mapping);
        assert!(!ids_path.with_extension("json.tmp").exists());

        // 키 정렬 + 들여쓰기 출력
        let text = fs::read_to_string(&ids_path).unwrap();
        assert!(text.find("2차전지").unwrap() < text.find("반도체").unwrap());
        assert!(text.contains("\n  "));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_ids_write_removes_stock_temp() {
        let dir = std::env::temp_dir().join(format!("movers-mapping-ids-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let stock_path = dir.join("stock_themes.json");
        fs::write(&stock_path, "{}").unwrap();
        // 디렉터리가 있어야 할 자리에 일반 파일
        let blocker = dir.join("blocker");
        fs::write(&blocker, "").unwrap();
        let ids_path = blocker.join("theme_map.json");

        let result = sample().save(&stock_path, &ids_path);

        assert!(matches!(result, Err(MappingError::Io { .. })));
        assert!(!stock_path.with_extension("json.tmp").exists());
        assert_eq!(fs::read_to_string(&stock_path).unwrap(), "{}");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_rename_removes_both_temps() {
        let dir = std::env::temp_dir().join(format!("movers-mapping-rename-{}", std::process::id()));
        // 종목 파일 경로가 디렉터리라서 rename이 실패
        let stock_path = dir.join("stock_themes.json");
        fs::create_dir_all(&stock_path).unwrap();
        let ids_path = dir.join("theme_map.json");

        let result = sample().save(&stock_path, &ids_path);

        assert!(matches!(result, Err(MappingError::Io { .. })));
        assert!(!stock_path.with_extension("json.tmp").exists());
        assert!(!ids_path.with_extension("json.tmp").exists());
        assert!(!ids_path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_or_empty_on_missing_files() {
        let dir = std::env::temp_dir().join("movers-mapping-missing");
        let mapping = ThemeMapping::load_or_empty(&dir.join("a.json"), &dir.join("b.json"));
        assert_eq!(mapping.stock_count(), 0);
    }
}
