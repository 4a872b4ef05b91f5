// * Typed records built from labeled rows.
// * Each metric keeps the source's display text next to the unit-normalized number.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::refinery::rows::labels::*;
use crate::refinery::rows::RawRecord;
use crate::refinery::values::{Field, ValueKind};

/// One metric cell: cell text for display, normalized value for math
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub display: String,
    pub value: Option<f64>,
}

impl Metric {
    pub fn parse(raw: &str, kind: ValueKind) -> Self {
        Self {
            display: raw.to_string(),
            value: Field::Text(raw.to_string()).normalize(kind).as_number(),
        }
    }
}

/// Metrics the sector and company tables have in common, plus the company-only ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    MarketCap,
    Pe,
    FwdPe,
    Ps,
    Pb,
    Dividend,
    SalesGrowth5y,
    AvgVolume,
    Sales,
    GrossMargin,
    OperatingMargin,
    ProfitMargin,
}

impl MetricName {
    pub const SECTOR: [MetricName; 8] = [
        MetricName::MarketCap,
        MetricName::Pe,
        MetricName::FwdPe,
        MetricName::Ps,
        MetricName::Pb,
        MetricName::Dividend,
        MetricName::SalesGrowth5y,
        MetricName::AvgVolume,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricName::MarketCap => MARKET_CAP,
            MetricName::Pe => PE,
            MetricName::FwdPe => FWD_PE,
            MetricName::Ps => PS,
            MetricName::Pb => PB,
            MetricName::Dividend => DIVIDEND,
            MetricName::SalesGrowth5y => SALES_GROWTH_5Y,
            MetricName::AvgVolume => AVG_VOLUME,
            MetricName::Sales => SALES,
            MetricName::GrossMargin => GROSS_MARGIN,
            MetricName::OperatingMargin => OPERATING_MARGIN,
            MetricName::ProfitMargin => PROFIT_MARGIN,
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            MetricName::MarketCap | MetricName::AvgVolume | MetricName::Sales => {
                ValueKind::Magnitude
            }
            _ => ValueKind::Ratio,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricName::MarketCap => "Total value of outstanding shares (millions)",
            MetricName::Pe => "Price paid per dollar of trailing earnings",
            MetricName::FwdPe => "Price over forecast earnings for the next 12 months",
            MetricName::Ps => "Market cap divided by revenue",
            MetricName::Pb => "Market value relative to book value",
            MetricName::Dividend => "Annual dividends relative to share price (%)",
            MetricName::SalesGrowth5y => "Five-year revenue growth rate (%)",
            MetricName::AvgVolume => "Average trading volume (millions of shares)",
            MetricName::Sales => "Total revenue (millions)",
            MetricName::GrossMargin => "Gross profit over revenue (%)",
            MetricName::OperatingMargin => "Operating income over revenue (%)",
            MetricName::ProfitMargin => "Net income over revenue (%)",
        }
    }
}

/// Typed view over a parsed row
pub trait FromRawRecord: Sized {
    fn from_raw(raw: &RawRecord) -> Self;
}

/// Aggregate statistics for one sector or industry group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    pub name: String,
    pub market_cap: Metric,
    pub pe: Metric,
    pub fwd_pe: Metric,
    pub ps: Metric,
    pub pb: Metric,
    pub dividend: Metric,
    pub sales_growth_5y: Metric,
    pub avg_volume: Metric,
}

impl FromRawRecord for SectorRecord {
    fn from_raw(raw: &RawRecord) -> Self {
        let metric = |name: MetricName| Metric::parse(raw.get_or_na(name.label()), name.kind());
        Self {
            name: raw.get_or_na(SECTOR).to_string(),
            market_cap: metric(MetricName::MarketCap),
            pe: metric(MetricName::Pe),
            fwd_pe: metric(MetricName::FwdPe),
            ps: metric(MetricName::Ps),
            pb: metric(MetricName::Pb),
            dividend: metric(MetricName::Dividend),
            sales_growth_5y: metric(MetricName::SalesGrowth5y),
            avg_volume: metric(MetricName::AvgVolume),
        }
    }
}

impl SectorRecord {
    /// `None` for metrics only companies carry
    pub fn metric(&self, name: MetricName) -> Option<&Metric> {
        match name {
            MetricName::MarketCap => Some(&self.market_cap),
            MetricName::Pe => Some(&self.pe),
            MetricName::FwdPe => Some(&self.fwd_pe),
            MetricName::Ps => Some(&self.ps),
            MetricName::Pb => Some(&self.pb),
            MetricName::Dividend => Some(&self.dividend),
            MetricName::SalesGrowth5y => Some(&self.sales_growth_5y),
            MetricName::AvgVolume => Some(&self.avg_volume),
            _ => None,
        }
    }
}

/// Fundamentals for one listed company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub ticker: String,
    pub company: String,
    pub market_cap: Metric,
    pub pe: Metric,
    pub fwd_pe: Metric,
    pub ps: Metric,
    pub pb: Metric,
    pub dividend: Metric,
    pub sales_growth_5y: Metric,
    pub sales: Metric,
    pub gross_margin: Metric,
    pub operating_margin: Metric,
    pub profit_margin: Metric,
    pub avg_volume: Metric,
}

impl FromRawRecord for CompanyRecord {
    fn from_raw(raw: &RawRecord) -> Self {
        let metric = |name: MetricName| Metric::parse(raw.get_or_na(name.label()), name.kind());
        Self {
            ticker: raw.get_or_na(TICKER).to_string(),
            company: raw.get_or_na(COMPANY).to_string(),
            market_cap: metric(MetricName::MarketCap),
            pe: metric(MetricName::Pe),
            fwd_pe: metric(MetricName::FwdPe),
            ps: metric(MetricName::Ps),
            pb: metric(MetricName::Pb),
            dividend: metric(MetricName::Dividend),
            sales_growth_5y: metric(MetricName::SalesGrowth5y),
            sales: metric(MetricName::Sales),
            gross_margin: metric(MetricName::GrossMargin),
            operating_margin: metric(MetricName::OperatingMargin),
            profit_margin: metric(MetricName::ProfitMargin),
            avg_volume: metric(MetricName::AvgVolume),
        }
    }
}

impl CompanyRecord {
    pub fn metric(&self, name: MetricName) -> &Metric {
        match name {
            MetricName::MarketCap => &self.market_cap,
            MetricName::Pe => &self.pe,
            MetricName::FwdPe => &self.fwd_pe,
            MetricName::Ps => &self.ps,
            MetricName::Pb => &self.pb,
            MetricName::Dividend => &self.dividend,
            MetricName::SalesGrowth5y => &self.sales_growth_5y,
            MetricName::AvgVolume => &self.avg_volume,
            MetricName::Sales => &self.sales,
            MetricName::GrossMargin => &self.gross_margin,
            MetricName::OperatingMargin => &self.operating_margin,
            MetricName::ProfitMargin => &self.profit_margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refinery::rows::{extract_row, TableSchema};

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_sector_record_normalizes_metrics() {
        let row = cells(&["Technology", "500B", "20.5", "18.2", "5.1", "3.2", "1.5%", "12.3%", "10M"]);
        let raw = extract_row(&row, &TableSchema::sector_overview()).unwrap();
        let record = SectorRecord::from_raw(&raw);

        assert_eq!(record.name, "Technology");
        assert_eq!(record.pe.value, Some(20.5));
        assert_eq!(record.market_cap.value, Some(500_000.0));
        assert_eq!(record.market_cap.display, "500B");
        assert_eq!(record.dividend.value, Some(1.5));
        assert_eq!(record.avg_volume.value, Some(10.0));
    }

    #[test]
    fn test_company_record_keeps_missing_values() {
        let row = cells(&[
            "AAPL", "Apple Inc.", "3,000B", "-", "28.1", "7.5", "45.0", "0.5%", "N/A", "383B",
            "45.6%", "29.8%", "25.3%", "55.2M",
        ]);
        let raw = extract_row(&row, &TableSchema::screener()).unwrap();
        let record = CompanyRecord::from_raw(&raw);

        assert_eq!(record.ticker, "AAPL");
        assert_eq!(record.company, "Apple Inc.");
        assert_eq!(record.pe.value, None);
        assert_eq!(record.pe.display, "-");
        assert_eq!(record.sales_growth_5y.value, None);
        assert_eq!(record.market_cap.value, Some(3_000_000.0));
        assert_eq!(record.metric(MetricName::GrossMargin).value, Some(45.6));
        assert_eq!(record.avg_volume.value, Some(55.2));
    }

    #[test]
    fn test_sector_metric_lookup_excludes_company_only_fields() {
        let raw = extract_row(&cells(&["X"; 9]), &TableSchema::sector_overview()).unwrap();
        let record = SectorRecord::from_raw(&raw);
        assert!(record.metric(MetricName::Pe).is_some());
        assert!(record.metric(MetricName::Sales).is_none());
        assert!(MetricName::SECTOR.iter().all(|m| record.metric(*m).is_some()));
    }
}
