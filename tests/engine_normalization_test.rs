use sector_lens::engine::normalization::{industry_filter, paginated_url, screener_url, sector_slug};
use url::Url;

// * Test Suite for slugs and listing URLs

#[test]
fn test_slug_strips_punctuation_and_case() {
    assert_eq!(sector_slug("Oil & Gas E&P"), "oilgasep");
    assert_eq!(sector_slug("Semiconductors"), "semiconductors");
    assert_eq!(sector_slug("REIT - Healthcare Facilities"), "reithealthcarefacilities");
}

#[test]
fn test_slug_variants_collide() {
    assert_eq!(sector_slug("Oil & Gas E&P"), sector_slug("oil  gas e-p"));
}

#[test]
fn test_industry_filter() {
    assert_eq!(industry_filter("Software - Application"), "ind_softwareapplication");
}

#[test]
fn test_screener_url_replaces_filter() {
    let url = screener_url("https://finviz.com/screener.ashx?v=152&f=ind_old&c=1", "Banks - Regional").unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();

    assert!(pairs.contains(&("v".to_string(), "152".to_string())));
    assert!(pairs.contains(&("f".to_string(), "ind_banksregional".to_string())));
    assert_eq!(pairs.iter().filter(|(k, _)| k == "f").count(), 1);
    assert_eq!(pairs.iter().filter(|(k, _)| k == "c").count(), 1);
}

#[test]
fn test_screener_url_invalid_base() {
    assert_eq!(screener_url("not_a_url", "Banks"), None);
}

#[test]
fn test_first_page_is_base_url() {
    let base = Url::parse("https://finviz.com/screener.ashx?v=152&f=ind_banks").unwrap();
    assert_eq!(paginated_url(&base, 0, 20), base);
}

#[test]
fn test_later_pages_carry_row_offset() {
    let base = Url::parse("https://finviz.com/screener.ashx?v=152&f=ind_banks").unwrap();
    // * Page index 1 starts at row 21, index 2 at row 41
    assert!(paginated_url(&base, 1, 20).as_str().ends_with("r=21"));
    assert!(paginated_url(&base, 2, 20).as_str().ends_with("r=41"));
}

#[test]
fn test_row_offset_is_replaced_not_appended() {
    let base = Url::parse("https://finviz.com/screener.ashx?v=152&r=21").unwrap();
    let url = paginated_url(&base, 2, 20);
    assert_eq!(url.query_pairs().filter(|(k, _)| k == "r").count(), 1);
    assert!(url.as_str().contains("r=41"));
}
