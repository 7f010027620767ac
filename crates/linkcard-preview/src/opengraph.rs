//! Generic page strategy: Open Graph scraping.

use scraper::{Html, Selector};

use crate::error::FetchError;

/// Open Graph tags read from a page. Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenGraph {
    pub title: Option<String>,
    pub description: Option<String>,
    /// First `og:image` (or `og:image:url`) on the page.
    pub image: Option<String>,
    pub url: Option<String>,
}

impl OpenGraph {
    /// Extract Open Graph tags from an HTML document.
    ///
    /// Reads both `property="og:*"` and `name="og:*"`; the first non-empty
    /// value for each key wins.
    pub fn from_html(html: &str) -> Self {
        let mut og = Self::default();
        let Ok(selector) = Selector::parse("meta[content]") else {
            return og;
        };
        let document = Html::parse_document(html);

        for element in document.select(&selector) {
            let el = element.value();
            let Some(key) = el.attr("property").or_else(|| el.attr("name")) else {
                continue;
            };
            let Some(content) = el.attr("content").map(str::trim).filter(|c| !c.is_empty())
            else {
                continue;
            };

            let slot = match key.trim().to_ascii_lowercase().as_str() {
                "og:title" => &mut og.title,
                "og:description" => &mut og.description,
                "og:image" | "og:image:url" | "og:image:secure_url" => &mut og.image,
                "og:url" => &mut og.url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(content.to_string());
            }
        }

        og
    }
}

/// Fetch a page and scrape its Open Graph tags.
pub async fn scrape(http: &reqwest::Client, url: &str) -> Result<OpenGraph, FetchError> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().await?;
    let og = OpenGraph::from_html(&body);

    tracing::debug!(
        url = %url,
        has_title = og.title.is_some(),
        has_image = og.image.is_some(),
        "open graph tags scraped"
    );

    Ok(og)
}
