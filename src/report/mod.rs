// * Report
// * Sector comparison, top-company selection and plain-text rendering for the CLI.

use std::cmp::Ordering;

use crate::refinery::records::{CompanyRecord, MetricName, SectorRecord};

// * Width of the longest bar in a chart, in cells
pub const BAR_WIDTH: usize = 40;

// * Companies shown per industry
pub const TOP_COMPANIES: usize = 10;

// * Descending by value, missing values last
fn desc_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sector_value(record: &SectorRecord, metric: MetricName) -> Option<f64> {
    record.metric(metric).and_then(|m| m.value)
}

/// Selected sectors ordered by `metric`, highest first
pub fn compare_sectors<'a>(
    records: &'a [SectorRecord],
    names: &[String],
    metric: MetricName,
) -> Vec<&'a SectorRecord> {
    let mut selected: Vec<&SectorRecord> = records
        .iter()
        .filter(|r| names.iter().any(|n| n.eq_ignore_ascii_case(&r.name)))
        .collect();
    selected.sort_by(|a, b| desc_missing_last(sector_value(a, metric), sector_value(b, metric)));
    selected
}

/// True when no selected sector has a value for `metric`
pub fn all_missing(records: &[&SectorRecord], metric: MetricName) -> bool {
    records.iter().all(|r| sector_value(r, metric).is_none())
}

/// Largest companies by market cap among those that carry `metric`
pub fn top_companies(records: &[CompanyRecord], metric: MetricName, limit: usize) -> Vec<&CompanyRecord> {
    let mut ranked: Vec<&CompanyRecord> = records
        .iter()
        .filter(|c| c.metric(metric).value.is_some())
        .collect();
    ranked.sort_by(|a, b| desc_missing_last(a.market_cap.value, b.market_cap.value));
    ranked.truncate(limit);
    ranked
}

/// Left-aligned text table
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Horizontal bar chart scaled to the largest absolute value
pub fn render_bars(items: &[(String, Option<f64>)]) -> String {
    let label_width = items.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = items
        .iter()
        .filter_map(|(_, v)| v.map(f64::abs))
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, value) in items {
        let bar = match value {
            Some(v) if max > 0.0 => {
                let len = ((v.abs() / max) * BAR_WIDTH as f64).round() as usize;
                let glyph = if *v < 0.0 { "░" } else { "█" };
                format!("{} {:.2}", glyph.repeat(len.max(1)), v)
            }
            Some(v) => format!("{:.2}", v),
            None => "n/a".to_string(),
        };
        out.push_str(&format!("{:<width$}  {}\n", label, bar, width = label_width));
    }
    out
}

/// Bar chart of `metric` keyed by ticker
pub fn company_bars(records: &[&CompanyRecord], metric: MetricName) -> String {
    let items: Vec<(String, Option<f64>)> = records
        .iter()
        .map(|c| (c.ticker.clone(), c.metric(metric).value))
        .collect();
    render_bars(&items)
}

pub fn sector_table(records: &[&SectorRecord]) -> String {
    let mut headers = vec!["Sector"];
    headers.extend(MetricName::SECTOR.iter().map(|m| m.label()));

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            let mut row = vec![r.name.clone()];
            row.extend(
                MetricName::SECTOR
                    .iter()
                    .map(|m| r.metric(*m).map(|x| x.display.clone()).unwrap_or_default()),
            );
            row
        })
        .collect();

    render_table(&headers, &rows)
}

pub fn company_table(records: &[&CompanyRecord]) -> String {
    let metrics = [
        MetricName::MarketCap,
        MetricName::Pe,
        MetricName::FwdPe,
        MetricName::Ps,
        MetricName::Pb,
        MetricName::Dividend,
        MetricName::Sales,
        MetricName::GrossMargin,
        MetricName::OperatingMargin,
        MetricName::ProfitMargin,
    ];
    let mut headers = vec!["Ticker", "Company"];
    headers.extend(metrics.iter().map(|m| m.label()));

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|c| {
            let mut row = vec![c.ticker.clone(), c.company.clone()];
            row.extend(metrics.iter().map(|m| c.metric(*m).display.clone()));
            row
        })
        .collect();

    render_table(&headers, &rows)
}
