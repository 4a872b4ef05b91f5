use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};

use crate::network::errors::FetchError;

// * IdentityProfile defines the fixed desktop-browser header set sent on every request.
pub struct IdentityProfile {
    pub chrome_version: &'static str,
    pub user_agent: String,
    pub referer: &'static str,
}

impl IdentityProfile {
    // * A macOS Chrome profile; the source serves its full tables to this agent.
    pub fn desktop_chrome() -> Self {
        let full_version = "123.0.0.0";

        Self {
            chrome_version: "123",
            user_agent: format!(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
                full_version
            ),
            referer: "https://finviz.com/",
        }
    }

    // * Applies the configured profile to a mutable HeaderMap.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<(), FetchError> {
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(REFERER, HeaderValue::from_static(self.referer));
        headers.insert("DNT", HeaderValue::from_static("1"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
        Ok(())
    }

    pub fn headers(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        self.apply_to_headers(&mut headers)?;
        Ok(headers)
    }
}

impl Default for IdentityProfile {
    fn default() -> Self {
        Self::desktop_chrome()
    }
}
