// * Row Extractor
// * Maps positional table cells onto a fixed, labeled column schema.
// * Schemas are per page layout; the source's layout drifts, so none is hardcoded as the one truth.

use serde::Serialize;
use tracing::debug;

use crate::config::constants::NOT_AVAILABLE;

// * Column labels shared by the record types
pub mod labels {
    pub const SECTOR: &str = "Sector";
    pub const TICKER: &str = "Ticker";
    pub const COMPANY: &str = "Company";
    pub const MARKET_CAP: &str = "Market cap";
    pub const PE: &str = "P/E";
    pub const FWD_PE: &str = "Fwd P/E";
    pub const PS: &str = "P/S";
    pub const PB: &str = "P/B";
    pub const DIVIDEND: &str = "Dividend";
    pub const SALES_GROWTH_5Y: &str = "Sales 5Y growth";
    pub const SALES: &str = "Sales";
    pub const GROSS_MARGIN: &str = "Gross Margin";
    pub const OPERATING_MARGIN: &str = "Operating Margin";
    pub const PROFIT_MARGIN: &str = "Profit Margin";
    pub const AVG_VOLUME: &str = "Avg. volume";
}

use labels::*;

const SECTOR_LABELS: [&str; 9] = [
    SECTOR, MARKET_CAP, PE, FWD_PE, PS, PB, DIVIDEND, SALES_GROWTH_5Y, AVG_VOLUME,
];

const COMPANY_LABELS: [&str; 14] = [
    TICKER,
    COMPANY,
    MARKET_CAP,
    PE,
    FWD_PE,
    PS,
    PB,
    DIVIDEND,
    SALES_GROWTH_5Y,
    SALES,
    GROSS_MARGIN,
    OPERATING_MARGIN,
    PROFIT_MARGIN,
    AVG_VOLUME,
];

/// One labeled column and the cell position it is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub position: usize,
}

/// Positional layout of one table version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: &'static str,
    /// Rows with fewer cells are dropped
    pub min_cells: usize,
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    fn sequential(name: &'static str, min_cells: usize, offset: usize, labels: &[&'static str]) -> Self {
        let columns = labels
            .iter()
            .enumerate()
            .map(|(i, label)| ColumnSpec {
                label: *label,
                position: i + offset,
            })
            .collect();
        Self {
            name,
            min_cells,
            columns,
        }
    }

    /// Industry overview, name in the first cell
    pub fn sector_overview() -> Self {
        Self::sequential("sector_overview", 9, 0, &SECTOR_LABELS)
    }

    /// Industry overview with a leading "No." column; volume may be cut off
    pub fn sector_overview_numbered() -> Self {
        Self::sequential("sector_overview_numbered", 9, 1, &SECTOR_LABELS)
    }

    /// Screener page, ticker in the first cell; volume may be cut off
    pub fn screener() -> Self {
        Self::sequential("screener", 13, 0, &COMPANY_LABELS)
    }

    /// Screener page with a leading "No." column
    pub fn screener_numbered() -> Self {
        Self::sequential("screener_numbered", 15, 1, &COMPANY_LABELS)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.label)
    }
}

/// Ordered label/text pairs for one table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    pub fields: Vec<(&'static str, String)>,
}

impl RawRecord {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `label`, or the "not available" sentinel
    pub fn get_or_na(&self, label: &str) -> &str {
        self.get(label).unwrap_or(NOT_AVAILABLE)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Maps one row of cells through the schema, or `None` when the row is too short.
pub fn extract_row(cells: &[String], schema: &TableSchema) -> Option<RawRecord> {
    if cells.len() < schema.min_cells {
        return None;
    }

    let fields = schema
        .columns
        .iter()
        .map(|col| {
            let text = cells
                .get(col.position)
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            (col.label, text)
        })
        .collect();

    Some(RawRecord { fields })
}

/// Extracts every data row of a grid. The first row is the header and is skipped.
/// Short rows are dropped without affecting the rest.
pub fn extract_rows(grid: &[Vec<String>], schema: &TableSchema) -> Vec<RawRecord> {
    let mut records = Vec::with_capacity(grid.len().saturating_sub(1));

    for (index, cells) in grid.iter().enumerate().skip(1) {
        match extract_row(cells, schema) {
            Some(record) => records.push(record),
            None => debug!(
                "Dropped row {} of '{}': {} cells < {}",
                index,
                schema.name,
                cells.len(),
                schema.min_cells
            ),
        }
    }

    records
}
