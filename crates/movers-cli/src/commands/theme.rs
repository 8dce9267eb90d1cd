//! 테마 구성 종목 조회.

use anyhow::{Context, Result};
use movers_core::{format_rate, format_thousands, AppConfig, ThemeConstituent};
use movers_data::{NaverClient, ThemeMapping, ThemeResolver};
use serde::Serialize;
use tracing::info;

use super::output::{format_json, rule, truncate, OutputFormat};

/// 테마 조회 설정.
#[derive(Debug)]
pub struct ThemeCommandConfig {
    /// 테마명 또는 테마 번호
    pub query: String,
    /// 출력 형식
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ThemeReport<'a> {
    theme: Option<&'a str>,
    id: &'a str,
    constituents: &'a [ThemeConstituent],
}

/// 테마 구성 종목 조회.
///
/// 숫자만으로 된 입력은 테마 번호로, 그 외에는 매핑 파일에서 번호를 찾습니다.
pub async fn show_theme(app: &AppConfig, config: ThemeCommandConfig) -> Result<usize> {
    let mapping = ThemeMapping::load_or_empty(&app.themes.stock_themes_path, &app.themes.theme_ids_path);
    let client = NaverClient::from_config(&app.http).context("Failed to build HTTP client")?;
    let resolver = ThemeResolver::new(&mapping, &client);

    let (theme, id) = if is_theme_id(&config.query) {
        (None, config.query.as_str())
    } else {
        let id = resolver.id_for(&config.query).ok_or_else(|| {
            anyhow::anyhow!(
                "테마 번호를 찾을 수 없음: {} (movers-collector build-themes로 매핑을 생성하세요)",
                config.query
            )
        })?;
        (Some(config.query.as_str()), id)
    };

    info!(theme = theme.unwrap_or("-"), id, "테마 구성 종목 조회");
    let constituents = resolver
        .details_for(id)
        .await
        .with_context(|| format!("Failed to fetch theme {}", id))?;

    let content = match config.format {
        OutputFormat::Table => {
            let title = format!("테마 {} (no={})", theme.unwrap_or("-"), id);
            format!("{}\n{}", title, format_constituents_table(&constituents))
        }
        OutputFormat::Json => format_json(&ThemeReport {
            theme,
            id,
            constituents: &constituents,
        })?,
    };
    println!("{}", content);

    Ok(constituents.len())
}

fn is_theme_id(query: &str) -> bool {
    !query.is_empty() && query.chars().all(|c| c.is_ascii_digit())
}

/// 테마 구성 종목 표.
pub fn format_constituents_table(constituents: &[ThemeConstituent]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<20} {:<8} {:>10} {:>9} {:>14} {:>12}\n",
        "NAME", "CODE", "PRICE", "RATE", "VOLUME", "AMOUNT(M)"
    ));
    output.push_str(&rule(78));
    output.push('\n');

    for stock in constituents {
        output.push_str(&format!(
            "{:<20} {:<8} {:>10} {:>9} {:>14} {:>12}\n",
            truncate(&stock.name, 20),
            stock.code,
            format_thousands(stock.price),
            format_rate(stock.rate),
            format_thousands(stock.volume),
            format_thousands(stock.amount),
        ));
    }

    output.push_str(&format!("Total: {} stocks", constituents.len()));
    output
}
