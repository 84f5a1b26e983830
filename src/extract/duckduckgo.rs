//! DuckDuckGo HTML endpoint extractor.

use scraper::Html;
use url::Url;

use super::{
    clean_text, decode_entities, first_non_empty, host_within, regex, selector, window,
    CandidateSet, ResultExtractor, Strategy,
};
use crate::{Candidate, Result};

/// Extracts results from `html.duckduckgo.com/html/` pages.
///
/// Strategy 1 walks `.result` blocks with CSS selectors. Strategy 2 scans
/// every anchor for the `result__a` / `result__url` classes, which still
/// works when the block structure around them changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDuckGoHtml;

impl ResultExtractor for DuckDuckGoHtml {
    fn name(&self) -> &'static str {
        "duckduckgo_html"
    }

    fn extract(&self, body: &str) -> Result<Vec<Candidate>> {
        first_non_empty(self.name(), body, &[by_result_blocks as Strategy, by_anchor_classes])
    }
}

fn is_own_host(host: &str) -> bool {
    host_within(host, "duckduckgo.com")
}

fn by_result_blocks(body: &str) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(body);
    let result_selector = selector(".result:not(.result--ad)")?;
    let title_selector = selector(".result__a")?;
    let url_selector = selector(".result__url")?;
    let snippet_selector = selector(".result__snippet")?;

    let mut set = CandidateSet::new(is_own_host);

    for element in document.select(&result_selector) {
        if set.is_full() {
            break;
        }
        let title_elem = element.select(&title_selector).next();
        let href = title_elem
            .and_then(|e| e.value().attr("href"))
            .or_else(|| {
                element
                    .select(&url_selector)
                    .next()
                    .and_then(|e| e.value().attr("href"))
            });
        let Some(url) = href.and_then(resolve_href) else {
            continue;
        };

        let title = title_elem
            .map(|e| clean_text(&e.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| url.clone());
        let snippet = element
            .select(&snippet_selector)
            .next()
            .map(|e| clean_text(&e.text().collect::<String>()))
            .unwrap_or_default();

        set.push(Candidate::new(url, title).with_snippet(snippet));
    }

    Ok(set.into_vec())
}

fn by_anchor_classes(body: &str) -> Result<Vec<Candidate>> {
    let anchor = regex(r#"(?is)<a\s([^>]*)>(.*?)</a>"#)?;
    let class_attr = regex(r#"(?i)class\s*=\s*"([^"]*)""#)?;
    let href_attr = regex(r#"(?i)href\s*=\s*"([^"]*)""#)?;

    let classes_of = |attrs: &str| -> String {
        class_attr
            .captures(attrs)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };

    let mut set = CandidateSet::new(is_own_host);

    for caps in anchor.captures_iter(body) {
        if set.is_full() {
            break;
        }
        let (Some(whole), Some(attrs), Some(inner)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let classes = classes_of(attrs.as_str());
        let is_title = classes.split_whitespace().any(|c| c == "result__a");
        let is_url = classes.split_whitespace().any(|c| c == "result__url");
        if !is_title && !is_url {
            continue;
        }

        let Some(url) = href_attr
            .captures(attrs.as_str())
            .and_then(|c| c.get(1))
            .and_then(|m| resolve_href(&decode_entities(m.as_str())))
        else {
            continue;
        };

        let title = if is_title {
            clean_text(inner.as_str())
        } else {
            // A result__url link carries the display URL; the title sits in
            // the neighbouring result__a anchor.
            let context = window(body, whole.start().saturating_sub(500), whole.end() + 200);
            anchor
                .captures_iter(context)
                .find(|c| {
                    c.get(1).is_some_and(|a| {
                        classes_of(a.as_str())
                            .split_whitespace()
                            .any(|cl| cl == "result__a")
                    })
                })
                .and_then(|c| c.get(2))
                .map(|m| clean_text(m.as_str()))
                .unwrap_or_default()
        };
        let title = if title.is_empty() { url.clone() } else { title };

        set.push(Candidate::new(url, title));
    }

    Ok(set.into_vec())
}

/// Resolves a result href, unwrapping `//duckduckgo.com/l/?uddg=<encoded>`
/// redirects to their destination.
pub(crate) fn resolve_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    let is_redirect = parsed.host_str().is_some_and(|h| host_within(h, "duckduckgo.com"))
        && parsed.path().starts_with("/l/");
    if is_redirect {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(absolute)
    }
}
