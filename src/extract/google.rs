//! Google result page extractor.
//!
//! Used for both direct Google scraping and ScraperAPI-rendered pages.

use scraper::Html;
use url::Url;

use super::{
    clean_text, decode_entities, first_non_empty, host_within, regex, selector, window,
    CandidateSet, ResultExtractor, Strategy,
};
use crate::{Candidate, Result};

/// Extracts results from Google search result pages.
///
/// Strategy 1 reads `div.g` result blocks. Strategy 2 scans for
/// `/url?q=` redirect anchors and pairs each with the nearest `<h3>`,
/// which covers the lightweight no-JavaScript layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleHtml;

impl ResultExtractor for GoogleHtml {
    fn name(&self) -> &'static str {
        "google_html"
    }

    fn extract(&self, body: &str) -> Result<Vec<Candidate>> {
        first_non_empty(self.name(), body, &[by_result_blocks as Strategy, by_redirect_links])
    }
}

fn is_own_host(host: &str) -> bool {
    host_within(host, "google.com")
        || host.starts_with("google.")
        || host.contains(".google.")
        || host_within(host, "googleusercontent.com")
        || host_within(host, "gstatic.com")
}

fn by_result_blocks(body: &str) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(body);
    let container_selector = selector("div.g")?;
    let title_selector = selector("h3")?;
    let link_selector = selector("a[href]")?;
    let snippet_selector = selector("div[data-sncf], div.VwiC3b, span.aCOpRe")?;

    let mut set = CandidateSet::new(is_own_host);

    for element in document.select(&container_selector) {
        if set.is_full() {
            break;
        }
        let title = match element.select(&title_selector).next() {
            Some(el) => clean_text(&el.text().collect::<String>()),
            None => continue,
        };

        let url = match element
            .select(&link_selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(resolve_href)
        {
            Some(url) => url,
            None => continue,
        };

        let snippet = element
            .select(&snippet_selector)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .unwrap_or_default();

        let title = if title.is_empty() { url.clone() } else { title };
        set.push(Candidate::new(url, title).with_snippet(snippet));
    }

    Ok(set.into_vec())
}

fn by_redirect_links(body: &str) -> Result<Vec<Candidate>> {
    let link = regex(r#"(?i)<a\s[^>]*href\s*=\s*"(/url\?[^"]+)"[^>]*>"#)?;
    let heading = regex(r#"(?is)<h3[^>]*>(.*?)</h3>"#)?;

    let mut set = CandidateSet::new(is_own_host);

    for caps in link.captures_iter(body) {
        if set.is_full() {
            break;
        }
        let (Some(whole), Some(href)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(url) = resolve_href(&decode_entities(href.as_str())) else {
            continue;
        };
        if url.contains("google.com/search") {
            continue;
        }

        // Prefer a heading after the link; fall back to one just before it.
        let following = window(body, whole.start(), whole.end() + 500);
        let preceding = window(body, whole.start().saturating_sub(200), whole.start());
        let title = [following, preceding]
            .into_iter()
            .find_map(|context| {
                heading
                    .captures(context)
                    .and_then(|c| c.get(1))
                    .map(|m| clean_text(m.as_str()))
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| url.clone());

        set.push(Candidate::new(url, title));
    }

    Ok(set.into_vec())
}

/// Resolves a Google result href, unwrapping `/url?q=<encoded>` redirects.
/// Other relative links are Google navigation and resolve to `None`.
pub(crate) fn resolve_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.starts_with("/url?") {
        let parsed = Url::parse(&format!("https://www.google.com{}", href)).ok()?;
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "q" || key == "url")
            .map(|(_, value)| value.into_owned())
            .filter(|target| target.starts_with("http"));
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    None
}
