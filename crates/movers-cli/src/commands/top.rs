//! 상위 종목 뷰.

use anyhow::{Context, Result};
use movers_core::{format_rate, format_thousands, AppConfig, SortMode, ThemeConstituent};
use movers_data::{active_themes, ActiveTheme, NaverClient, ThemeMapping, ThemeResolver, ViewFilter, ViewRow};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::output::{format_json, rule, truncate, OutputFormat};
use super::theme::format_constituents_table;

/// 상위 종목 조회 설정.
#[derive(Debug)]
pub struct TopCommandConfig {
    /// 순위 제한 (기본: 설정 파일 값)
    pub limit: Option<usize>,
    /// 정렬 기준
    pub sort: SortMode,
    /// 등락률 하한 (기본: 설정 파일 값)
    pub min_rate: Option<Decimal>,
    /// ETF/ETN 등 상품 포함
    pub include_instruments: bool,
    /// 활성 테마 표시
    pub show_themes: bool,
    /// 구성 종목을 조회할 상위 테마 수
    pub theme_details: usize,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 활성 테마와 (조회했다면) 구성 종목.
#[derive(Debug, Serialize)]
pub struct ThemeSection {
    #[serde(flatten)]
    pub theme: ActiveTheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituents: Option<Vec<ThemeConstituent>>,
}

#[derive(Debug, Serialize)]
struct TopReport<'a> {
    sort: SortMode,
    limit: usize,
    rows: &'a [ViewRow],
    failed_sources: Vec<&'a str>,
    #[serde(skip_serializing_if = "no_sections")]
    active_themes: &'a [ThemeSection],
}

fn no_sections(sections: &&[ThemeSection]) -> bool {
    sections.is_empty()
}

/// 설정 파일 값에 명령행 옵션을 덮어써 뷰 필터를 만듭니다.
pub fn build_filter(app: &AppConfig, config: &TopCommandConfig) -> ViewFilter {
    let mut filter = ViewFilter::from_config(&app.top);
    if let Some(min_rate) = config.min_rate {
        filter.min_rate = Some(min_rate);
    }
    if config.include_instruments {
        filter.excluded_keywords.clear();
    }
    filter
}

/// 상위 종목 조회 및 출력.
pub async fn show_top(app: &AppConfig, config: TopCommandConfig) -> Result<usize> {
    let client = NaverClient::from_config(&app.http).context("Failed to build HTTP client")?;
    let limit = config.limit.unwrap_or(app.top.limit);

    let top = client.get_top_stocks(limit, config.sort).await;
    if top.all_failed() {
        return Err(anyhow::anyhow!(
            "모든 소스 조회 실패 ({}개): {}",
            top.source_count,
            top.failed_sources
                .iter()
                .map(|f| f.error.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        ));
    }
    if top.is_partial() {
        warn!(
            failed = top.failed_sources.len(),
            total = top.source_count,
            "일부 소스 실패, 나머지 결과로 표시"
        );
    }

    let filter = build_filter(app, &config);
    let rows = filter.apply(&top.records);
    info!(ranked = top.records.len(), shown = rows.len(), sort = %config.sort, "상위 종목 뷰 생성");

    let sections = if config.show_themes {
        let mapping =
            ThemeMapping::load_or_empty(&app.themes.stock_themes_path, &app.themes.theme_ids_path);
        load_theme_sections(&client, &mapping, &rows, config.theme_details).await
    } else {
        Vec::new()
    };

    let content = match config.format {
        OutputFormat::Table => {
            let mut content = format_top_table(&rows);
            if !top.failed_sources.is_empty() {
                content.push_str(&format!(
                    "\n(실패한 소스 {}/{})",
                    top.failed_sources.len(),
                    top.source_count
                ));
            }
            if !sections.is_empty() {
                content.push_str("\n\n");
                content.push_str(&format_theme_sections(&sections));
            }
            content
        }
        OutputFormat::Json => format_json(&TopReport {
            sort: config.sort,
            limit,
            rows: &rows,
            failed_sources: top.failed_sources.iter().map(|f| f.url.as_str()).collect(),
            active_themes: &sections,
        })?,
    };
    println!("{}", content);

    Ok(rows.len())
}

/// 활성 테마 목록을 만들고 상위 `detail_count`개 테마의 구성 종목을 순차 조회합니다.
async fn load_theme_sections<F: movers_data::PageFetcher>(
    client: &NaverClient<F>,
    mapping: &ThemeMapping,
    rows: &[ViewRow],
    detail_count: usize,
) -> Vec<ThemeSection> {
    let resolver = ThemeResolver::new(mapping, client);
    let mut sections = Vec::new();

    for (i, theme) in active_themes(rows, mapping).into_iter().enumerate() {
        let constituents = if i < detail_count {
            match resolver.details_for(&theme.id).await {
                Ok(found) => Some(found),
                Err(e) => {
                    warn!(theme = %theme.name, error = %e, "테마 구성 종목 조회 실패");
                    None
                }
            }
        } else {
            None
        };
        sections.push(ThemeSection {
            theme,
            constituents,
        });
    }

    sections
}

/// 상위 종목 표.
pub fn format_top_table(rows: &[ViewRow]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:>4} {:>5} {:<20} {:<8} {:>10} {:>9} {:>14} {:>12} {:>10}\n",
        "#", "RANK", "NAME", "CODE", "PRICE", "RATE", "VOLUME", "AMOUNT(M)", "MCAP(B)"
    ));
    output.push_str(&rule(100));
    output.push('\n');

    for row in rows {
        let record = &row.record;
        output.push_str(&format!(
            "{:>4} {:>5} {:<20} {:<8} {:>10} {:>9} {:>14} {:>12} {:>10}\n",
            row.display_rank,
            row.original_rank,
            truncate(&record.name, 20),
            record.code,
            format_thousands(record.price),
            format_rate(record.rate),
            format_thousands(record.volume),
            format_thousands(record.amount),
            if record.market_cap > 0 {
                format_thousands(record.market_cap)
            } else {
                "-".to_string()
            },
        ));
    }

    output.push_str(&format!("Total: {} stocks", rows.len()));
    output
}

/// 활성 테마 목록 (구성 종목을 조회한 테마는 표 포함).
pub fn format_theme_sections(sections: &[ThemeSection]) -> String {
    let mut output = String::from("Active themes:\n");

    for section in sections {
        output.push_str(&format!(
            "  {} (no={}, {}): {}\n",
            section.theme.name,
            section.theme.id,
            section.theme.members.len(),
            section.theme.members.join(", ")
        ));
        if let Some(constituents) = &section.constituents {
            output.push('\n');
            output.push_str(&format_constituents_table(constituents));
            output.push_str("\n\n");
        }
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use movers_core::{SourceVariant, StockRecord};
    use rust_decimal_macros::dec;

    fn row(display_rank: u32, original_rank: u32, name: &str, market_cap: i64) -> ViewRow {
        ViewRow {
            original_rank,
            display_rank,
            record: StockRecord {
                code: "005930".to_string(),
                name: name.to_string(),
                price: 71_500,
                rate: dec!(-1.24),
                volume: 12_345_678,
                amount: 882_716,
                market_cap,
                rank: original_rank,
                source_variant: SourceVariant::MarketSum,
            },
        }
    }

    fn config() -> TopCommandConfig {
        TopCommandConfig {
            limit: None,
            sort: SortMode::Amount,
            min_rate: None,
            include_instruments: false,
            show_themes: false,
            theme_details: 0,
            format: OutputFormat::Table,
        }
    }

    #[test]
    fn test_build_filter_overrides() {
        let app = AppConfig::default();

        let filter = build_filter(&app, &config());
        assert!(filter.min_rate.is_none());
        assert!(!filter.excluded_keywords.is_empty());

        let filter = build_filter(
            &app,
            &TopCommandConfig {
                min_rate: Some(dec!(4.0)),
                include_instruments: true,
                ..config()
            },
        );
        assert_eq!(filter.min_rate, Some(dec!(4.0)));
        assert!(filter.excluded_keywords.is_empty());
    }

    #[test]
    fn test_top_table() {
        let table = format_top_table(&[row(1, 1, "삼성전자", 4_268_000), row(2, 3, "에코프로", 0)]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("삼성전자"));
        assert!(lines[2].contains("-1.24%"));
        assert!(lines[2].contains("4,268,000"));
        assert!(lines[3].trim_end().ends_with('-'));
        assert_eq!(lines[4], "Total: 2 stocks");
    }

    #[test]
    fn test_theme_sections() {
        let sections = vec![
            ThemeSection {
                theme: ActiveTheme {
                    name: "반도체".to_string(),
                    id: "136".to_string(),
                    members: vec!["삼성전자".to_string(), "SK하이닉스".to_string()],
                },
                constituents: None,
            },
            ThemeSection {
                theme: ActiveTheme {
                    name: "2차전지".to_string(),
                    id: "64".to_string(),
                    members: vec!["에코프로".to_string()],
                },
                constituents: Some(Vec::new()),
            },
        ];

        let text = format_theme_sections(&sections);
        assert!(text.starts_with("Active themes:"));
        assert!(text.contains("반도체 (no=136, 2): 삼성전자, SK하이닉스"));
        assert!(text.ends_with("Total: 0 stocks"));
    }

    #[test]
    fn test_report_json_skips_empty_themes() {
        let rows = [row(1, 1, "삼성전자", 0)];
        let json = format_json(&TopReport {
            sort: SortMode::Volume,
            limit: 30,
            rows: &rows,
            failed_sources: vec!["https://finance.naver.com/sise/sise_quant.naver"],
            active_themes: &[],
        })
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sort"], "volume");
        assert_eq!(value["rows"][0]["display_rank"], 1);
        assert_eq!(value["rows"][0]["record"]["name"], "삼성전자");
        assert!(value.get("active_themes").is_none());
    }
}
