// * The Refinery (Extraction Pipeline)
// * Goal: turn located HTML tables into labeled rows and typed, unit-normalized records.

pub mod records;
pub mod rows;
pub mod tables;
pub mod values;

// * Re-exports for convenient access
pub use records::{CompanyRecord, FromRawRecord, Metric, MetricName, SectorRecord};
pub use rows::{extract_row, extract_rows, ColumnSpec, RawRecord, TableSchema};
pub use tables::{extract_page, RawPage, TableLocator};
pub use values::{normalize, Field, ValueKind};

/// Locates, extracts and types every record of one HTML page
pub fn records_from_html<T: FromRawRecord>(
    html: &str,
    locator: &TableLocator,
    schema: &TableSchema,
) -> Result<Vec<T>, crate::network::errors::FetchError> {
    let page = extract_page(html, locator)?;
    Ok(extract_rows(&page.rows, schema)
        .iter()
        .map(T::from_raw)
        .collect())
}
