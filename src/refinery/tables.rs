// * Table Locator
// * Finds the data table by class, falling back to a content fingerprint
// * because the source's class names are not stable across layouts.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::network::errors::FetchError;

// * Precompiled CSS selectors for performance
static SELECTOR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("Invalid table selector"));
static SELECTOR_TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid tr selector"));
static SELECTOR_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("Invalid cell selector"));
static SELECTOR_PAGE_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td#screener_pagination a.screener-pages").expect("Invalid pagination link selector")
});
static SELECTOR_PAGINATION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td#screener_pagination").expect("Invalid pagination selector")
});

/// One fetched page reduced to what the extractor needs.
/// `rows` includes the header row first; `page_links` is `None` when the page has no pagination control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    pub rows: Vec<Vec<String>>,
    pub page_links: Option<Vec<String>>,
}

impl RawPage {
    /// Data rows, excluding the header
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// True when a numbered page link points past `current` (1-based)
    pub fn has_page_after(&self, current: u32) -> bool {
        self.page_links.as_ref().is_some_and(|links| {
            links
                .iter()
                .filter_map(|text| text.trim().parse::<u32>().ok())
                .any(|n| n > current)
        })
    }
}

/// How to recognise the data table on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLocator {
    /// CSS class the table normally carries
    pub class: String,
    /// Text found in one of the table's own cells, used when the class is missing
    pub fingerprint: String,
}

impl TableLocator {
    pub fn new(class: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fingerprint: fingerprint.into(),
        }
    }

    /// Industry overview table
    pub fn sector_overview() -> Self {
        Self::new("table-light", "Technology")
    }

    /// Screener table
    pub fn screener() -> Self {
        Self::new("screener_table", "Ticker")
    }

    /// CSS selector for the classed table
    pub fn css_selector(&self) -> String {
        format!("table.{}", self.class)
    }

    /// Locates the table in a parsed document
    pub fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.locate_by_class(document)
            .or_else(|| self.locate_by_fingerprint(document))
    }

    fn locate_by_class<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document
            .select(&SELECTOR_TABLE)
            .find(|table| table.value().classes().any(|c| c == self.class))
    }

    // * A wrapping layout table must not match through its nested data table
    fn locate_by_fingerprint<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        if self.fingerprint.is_empty() {
            return None;
        }

        document.select(&SELECTOR_TABLE).find(|table| {
            table.select(&SELECTOR_CELL).any(|cell| {
                is_owned_by(cell, *table)
                    && cell.select(&SELECTOR_TABLE).next().is_none()
                    && cell_text(cell).contains(&self.fingerprint)
            })
        })
    }
}

// * True when `table` is the nearest enclosing table of `element`
fn is_owned_by(element: ElementRef, table: ElementRef) -> bool {
    element
        .ancestors()
        .find(|node| node.value().as_element().is_some_and(|e| e.name() == "table"))
        .is_some_and(|owner| owner.id() == table.id())
}

fn cell_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Cell text of every row in the table, header row first
pub fn table_grid(table: ElementRef) -> Vec<Vec<String>> {
    table
        .select(&SELECTOR_TR)
        .filter(|row| is_owned_by(*row, table))
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(cell_text)
                .collect()
        })
        .collect()
}

/// Labels of the numbered pagination links, `None` when there is no pagination control
pub fn pagination_links(document: &Html) -> Option<Vec<String>> {
    document.select(&SELECTOR_PAGINATION).next()?;
    Some(
        document
            .select(&SELECTOR_PAGE_LINK)
            .map(cell_text)
            .collect(),
    )
}

/// Parses an HTML document into a `RawPage`
pub fn extract_page(html: &str, locator: &TableLocator) -> Result<RawPage, FetchError> {
    let document = Html::parse_document(html);
    let table = locator.locate(&document).ok_or(FetchError::TableNotFound)?;

    Ok(RawPage {
        rows: table_grid(table),
        page_links: pagination_links(&document),
    })
}
