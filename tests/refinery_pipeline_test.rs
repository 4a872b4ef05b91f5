use sector_lens::refinery::{
    extract_page, extract_rows, normalize, records_from_html, CompanyRecord, Field, SectorRecord,
    TableLocator, TableSchema, ValueKind,
};

// * Test Suite for locating, extracting and normalizing table data

fn approx(value: Option<f64>, expected: f64) -> bool {
    value.is_some_and(|v| (v - expected).abs() < 1e-9 * expected.abs().max(1.0))
}

const NESTED_LAYOUT: &str = r##"
<html><body>
<table class="layout">
  <tr><td>
    <table class="renamed">
      <tr><td>No.</td><td>Name</td><td>Market Cap</td><td>P/E</td><td>Fwd P/E</td>
          <td>P/S</td><td>P/B</td><td>Dividend</td><td>Sales 5Y</td><td>Volume</td></tr>
      <tr><td>1</td><td><a href="#">Technology</a></td><td>1.2T</td><td>31.4</td><td>25.0</td>
          <td>7.1</td><td>9.8</td><td>0.70%</td><td>14.1%</td><td>250.5M</td></tr>
      <tr><td>2</td><td>Utilities</td><td>45,000</td><td>-</td><td>N/A</td>
          <td>2.4</td><td>1.9</td><td>3.10%</td><td>2.0%</td></tr>
      <tr><td>broken</td></tr>
    </table>
  </td></tr>
</table>
</body></html>
"##;

#[test]
fn test_fingerprint_finds_nested_table_not_wrapper() {
    let page = extract_page(NESTED_LAYOUT, &TableLocator::sector_overview()).unwrap();
    // * Header plus three rows of the inner table, none of the wrapper's
    assert_eq!(page.rows.len(), 4);
    assert_eq!(page.rows[1][1], "Technology");
}

#[test]
fn test_numbered_layout_tolerates_missing_volume() {
    let records: Vec<SectorRecord> = records_from_html(
        NESTED_LAYOUT,
        &TableLocator::sector_overview(),
        &TableSchema::sector_overview_numbered(),
    )
    .unwrap();

    assert_eq!(records.len(), 2);
    let tech = &records[0];
    assert!(approx(tech.market_cap.value, 1_200_000.0));
    assert_eq!(tech.avg_volume.value, Some(250.5));

    let utilities = &records[1];
    assert_eq!(utilities.name, "Utilities");
    assert!(approx(utilities.market_cap.value, 0.045));
    assert_eq!(utilities.pe.value, None);
    assert_eq!(utilities.fwd_pe.value, None);
    assert_eq!(utilities.avg_volume.display, "N/A");
}

#[test]
fn test_short_rows_are_dropped() {
    let page = extract_page(NESTED_LAYOUT, &TableLocator::sector_overview()).unwrap();
    let rows = extract_rows(&page.rows, &TableSchema::sector_overview_numbered());
    assert!(rows.iter().all(|r| r.get("Sector") != Some("broken")));
}

#[test]
fn test_missing_table_is_error() {
    let html = "<html><body><table class='other'><tr><td>Nothing here</td></tr></table></body></html>";
    assert!(extract_page(html, &TableLocator::screener()).is_err());
}

#[test]
fn test_screener_page_with_pagination() {
    let html = r#"
        <table class="screener_table">
          <tr><th>Ticker</th><th>Company</th></tr>
          <tr><td>NVDA</td><td>NVIDIA Corp</td><td>2.2T</td><td>70.1</td><td>35.2</td><td>36.0</td>
              <td>55.0</td><td>0.02%</td><td>64.5%</td><td>60.9B</td><td>72.7%</td><td>54.1%</td><td>48.8%</td></tr>
        </table>
        <table><tr><td id="screener_pagination">
          <a class="screener-pages" href="?r=1">1</a><a class="screener-pages" href="?r=21">2</a>
        </td></tr></table>
    "#;
    let page = extract_page(html, &TableLocator::screener()).unwrap();
    assert!(page.has_page_after(1));
    assert!(!page.has_page_after(2));

    let companies: Vec<CompanyRecord> =
        records_from_html(html, &TableLocator::screener(), &TableSchema::screener()).unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].ticker, "NVDA");
    assert!(approx(companies[0].sales.value, 60_900.0));
    assert_eq!(companies[0].avg_volume.value, None);
}

#[test]
fn test_normalizer_units_are_consistent() {
    assert!(approx(normalize("1.5B", ValueKind::Magnitude), 1_500.0));
    assert!(approx(normalize("1500M", ValueKind::Magnitude), 1_500.0));
    assert!(approx(normalize("1,500,000K", ValueKind::Magnitude), 1_500.0));
    assert!(approx(normalize("1,500,000,000", ValueKind::Magnitude), 1_500.0));
    assert_eq!(normalize("12.3%", ValueKind::Ratio), Some(12.3));
    assert_eq!(normalize("-4.5%", ValueKind::Ratio), Some(-4.5));
}

#[test]
fn test_sentinels_never_become_zero() {
    for raw in ["N/A", "-", "", "  "] {
        assert_eq!(normalize(raw, ValueKind::Ratio), None);
        assert_eq!(normalize(raw, ValueKind::Magnitude), None);
    }
}

#[test]
fn test_field_normalization_is_idempotent() {
    let once = Field::Text("2.5B".to_string()).normalize(ValueKind::Magnitude);
    let twice = once.clone().normalize(ValueKind::Magnitude);
    assert_eq!(once, twice);
    assert_eq!(once.as_number(), Some(2_500.0));
}
