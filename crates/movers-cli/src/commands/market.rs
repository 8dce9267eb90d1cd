//! 지수 스냅샷, 지수 일별 추이, 개별 종목 조회.

use anyhow::{Context, Result};
use movers_core::{
    format_rate, format_thousands, AppConfig, Direction, IndexCode, IndexSnapshot, MarketIndices, StockRecord,
};
use movers_data::NaverClient;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::output::{format_json, rule, OutputFormat};

/// 스파크라인 막대 (낮음 → 높음)
const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// 코스피/코스닥 현재 지수 출력.
pub async fn show_indices(app: &AppConfig, format: OutputFormat) -> Result<()> {
    let client = NaverClient::from_config(&app.http).context("Failed to build HTTP client")?;
    let indices = client
        .get_market_indices()
        .await
        .context("Failed to fetch market overview")?;

    if indices.is_empty() {
        warn!("시세 개요 페이지에서 지수를 찾지 못함");
    }

    let content = match format {
        OutputFormat::Table => format_indices(&indices),
        OutputFormat::Json => format_json(&indices)?,
    };
    println!("{}", content);

    Ok(())
}

/// 지수 스냅샷 표.
pub fn format_indices(indices: &MarketIndices) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<8} {:>10} {:>10} {:>9}\n",
        "INDEX", "VALUE", "CHANGE", "RATE"
    ));
    output.push_str(&rule(40));
    output.push('\n');

    for code in IndexCode::ALL {
        match indices.get(code) {
            Some(snapshot) => output.push_str(&format_snapshot_line(snapshot)),
            None => output.push_str(&format!("{:<8} {:>10}\n", code, "N/A")),
        }
    }

    output.trim_end().to_string()
}

fn format_snapshot_line(snapshot: &IndexSnapshot) -> String {
    let arrow = match snapshot.direction {
        Direction::Up => "▲",
        Direction::Down => "▼",
    };
    let change = snapshot
        .change_amount
        .map(|amount| format!("{} {:.2}", arrow, amount.abs()))
        .unwrap_or_else(|| "-".to_string());
    let rate = snapshot
        .change_rate
        .map(format_rate)
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:<8} {:>10.2} {:>10} {:>9}\n",
        snapshot.code, snapshot.value, change, rate
    )
}

/// 개별 종목 출력. 페이지에 종목 정보가 없으면 0을 반환합니다.
pub async fn show_stock(app: &AppConfig, code: &str, format: OutputFormat) -> Result<usize> {
    let client = NaverClient::from_config(&app.http).context("Failed to build HTTP client")?;
    let record = client
        .get_stock_info(code)
        .await
        .with_context(|| format!("Failed to fetch stock {}", code))?;

    let Some(record) = record else {
        println!("종목 정보를 찾을 수 없음: {}", code);
        return Ok(0);
    };

    let content = match format {
        OutputFormat::Table => format_stock(&record),
        OutputFormat::Json => format_json(&record)?,
    };
    println!("{}", content);

    Ok(1)
}

/// 개별 종목 상세.
pub fn format_stock(record: &StockRecord) -> String {
    let mut lines = vec![
        format!("{} ({})", record.name, record.code),
        rule(32),
        format!("{:<10} {:>20}", "현재가", format_thousands(record.price)),
        format!("{:<10} {:>20}", "등락률", format_rate(record.rate)),
        format!("{:<10} {:>20}", "거래량", format_thousands(record.volume)),
        format!("{:<10} {:>20}", "거래대금(M)", format_thousands(record.amount)),
    ];
    if record.market_cap > 0 {
        lines.push(format!(
            "{:<10} {:>20}",
            "시총(억)",
            format_thousands(record.market_cap)
        ));
    }
    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct HistoryReport<'a> {
    index: IndexCode,
    days: usize,
    closes: &'a [Decimal],
}

/// 지수 일별 종가 추이 출력.
pub async fn show_history(app: &AppConfig, index: IndexCode, days: usize, format: OutputFormat) -> Result<usize> {
    let client = NaverClient::from_config(&app.http).context("Failed to build HTTP client")?;
    let closes = client
        .get_index_history(index, days)
        .await
        .with_context(|| format!("Failed to fetch {} history", index))?;
    info!(index = %index, requested = days, received = closes.len(), "지수 추이 조회");

    let content = match format {
        OutputFormat::Table => format_history(index, &closes),
        OutputFormat::Json => format_json(&HistoryReport {
            index,
            days,
            closes: &closes,
        })?,
    };
    println!("{}", content);

    Ok(closes.len())
}

/// 일별 종가 요약과 스파크라인.
pub fn format_history(index: IndexCode, closes: &[Decimal]) -> String {
    let (Some(first), Some(last)) = (closes.first(), closes.last()) else {
        return format!("{}: 데이터 없음", index);
    };
    let low = closes.iter().copied().min().unwrap_or(*first);
    let high = closes.iter().copied().max().unwrap_or(*first);
    let rate = if first.is_zero() {
        Decimal::ZERO
    } else {
        (*last - *first) / *first * Decimal::ONE_HUNDRED
    };

    format!(
        "{} {}일\n{}\n시작 {:.2}  종료 {:.2}  저 {:.2}  고 {:.2}  ({})",
        index,
        closes.len(),
        sparkline(closes),
        first,
        last,
        low,
        high,
        format_rate(rate)
    )
}

/// 값 범위를 8단계 막대로 표시합니다. 모든 값이 같으면 가운데 막대.
pub fn sparkline(values: &[Decimal]) -> String {
    let (Some(low), Some(high)) = (values.iter().min(), values.iter().max()) else {
        return String::new();
    };
    let span = *high - *low;
    let steps = Decimal::from(SPARK_BARS.len() - 1);

    values
        .iter()
        .map(|value| {
            if span.is_zero() {
                return SPARK_BARS[SPARK_BARS.len() / 2];
            }
            let level = ((*value - *low) / span * steps).round();
            let index = level.to_usize().unwrap_or(0);
            SPARK_BARS[index.min(SPARK_BARS.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use movers_core::SourceVariant;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sparkline_levels() {
        assert_eq!(sparkline(&[dec!(1), dec!(4.5), dec!(8)]), "▁▅█");
        assert_eq!(sparkline(&[dec!(2500.1), dec!(2500.1)]), "▅▅");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_history_summary() {
        let text = format_history(IndexCode::Kospi, &[dec!(2500), dec!(2450), dec!(2550)]);
        assert!(text.starts_with("KOSPI 3일"));
        assert!(text.contains("저 2450.00"));
        assert!(text.contains("고 2550.00"));
        assert!(text.ends_with("(+2.00%)"));

        assert_eq!(format_history(IndexCode::Kosdaq, &[]), "KOSDAQ: 데이터 없음");
    }

    #[test]
    fn test_indices_table_marks_missing() {
        let indices = MarketIndices {
            kospi: Some(IndexSnapshot {
                code: IndexCode::Kospi,
                value: dec!(2601.36),
                change_amount: Some(dec!(12.5)),
                change_rate: Some(dec!(-0.48)),
                direction: Direction::Down,
            }),
            kosdaq: None,
        };

        let table = format_indices(&indices);
        assert!(table.contains("2601.36"));
        assert!(table.contains("▼ 12.50"));
        assert!(table.contains("-0.48%"));
        assert!(table.lines().last().unwrap().contains("N/A"));
    }

    #[test]
    fn test_stock_detail() {
        let record = StockRecord {
            code: "005930".to_string(),
            name: "삼성전자".to_string(),
            price: 71_500,
            rate: dec!(1.5),
            volume: 12_345_678,
            amount: 882_715,
            market_cap: 0,
            rank: 0,
            source_variant: SourceVariant::ItemMain,
        };

        let text = format_stock(&record);
        assert!(text.starts_with("삼성전자 (005930)"));
        assert!(text.contains("+1.50%"));
        assert!(!text.contains("시총"));
    }
}
