use url::Url;

use crate::config::constants::SCREENER_COLUMNS;

// * Normalizes a sector or industry name into the source's filter slug.
// * This is also the cache key, so "Oil & Gas E&P" and "oil  gas e&p" share an entry.
// *
// * Logic:
// * 1. Lowercase.
// * 2. Drop whitespace, hyphens, ampersands and every other non-alphanumeric.
pub fn sector_slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// * Screener filter value for an industry, e.g. `ind_semiconductors`
pub fn industry_filter(name: &str) -> String {
    format!("ind_{}", sector_slug(name))
}

// * Builds the screener URL for one industry on top of `base`.
// * Existing `f` / `c` parameters are replaced, everything else is kept.
pub fn screener_url(base: &str, industry: &str) -> Option<Url> {
    let mut url = match Url::parse(base) {
        Ok(u) => u,
        Err(_) => return None,
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "f" && k != "c")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut serializer = url.query_pairs_mut();
        serializer.clear();
        for (k, v) in &kept {
            serializer.append_pair(k, v);
        }
        serializer.append_pair("f", &industry_filter(industry));
        serializer.append_pair("c", SCREENER_COLUMNS);
    }

    Some(url)
}

// * URL of the 0-based `page`; page 0 is the base URL itself.
// * Later pages add the 1-based row offset `r = page * page_size + 1`.
pub fn paginated_url(base: &Url, page: u32, page_size: usize) -> Url {
    let mut url = base.clone();
    if page == 0 {
        return url;
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "r")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let offset = page as usize * page_size + 1;

    {
        let mut serializer = url.query_pairs_mut();
        serializer.clear();
        for (k, v) in &kept {
            serializer.append_pair(k, v);
        }
        serializer.append_pair("r", &offset.to_string());
    }

    url
}
