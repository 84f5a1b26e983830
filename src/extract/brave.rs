//! Brave Search HTML extractor.

use scraper::Html;

use super::{clean_text, first_non_empty, host_within, selector, CandidateSet, ResultExtractor, Strategy};
use crate::{Candidate, Result};

/// Extracts results from `search.brave.com` pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraveHtml;

impl ResultExtractor for BraveHtml {
    fn name(&self) -> &'static str {
        "brave_html"
    }

    fn extract(&self, body: &str) -> Result<Vec<Candidate>> {
        first_non_empty(self.name(), body, &[by_web_snippets as Strategy, by_external_links])
    }
}

fn is_own_host(host: &str) -> bool {
    host_within(host, "brave.com")
}

fn by_web_snippets(body: &str) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(body);
    let result_selector = selector(r#"div.snippet[data-type="web"]"#)?;
    let title_selector = selector(".search-snippet-title, .title")?;
    let desc_selector = selector(".generic-snippet .content, .snippet-description")?;
    let url_selector = selector(r#"a[href^="http"]"#)?;

    let mut set = CandidateSet::new(is_own_host);

    for element in document.select(&result_selector) {
        if set.is_full() {
            break;
        }
        let url = match element
            .select(&url_selector)
            .next()
            .and_then(|e| e.value().attr("href"))
        {
            Some(url) => url.to_string(),
            None => continue,
        };

        let title = element
            .select(&title_selector)
            .next()
            .map(|e| clean_text(&e.text().collect::<String>()))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let content = element
            .select(&desc_selector)
            .next()
            .map(|e| clean_text(&e.text().collect::<String>()))
            .unwrap_or_default();

        set.push(Candidate::new(url, title).with_snippet(content));
    }

    Ok(set.into_vec())
}

fn by_external_links(body: &str) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(body);
    let link_selector = selector(r#"main a[href^="http"], #results a[href^="http"]"#)?;

    let mut set = CandidateSet::new(is_own_host);

    for link in document.select(&link_selector) {
        if set.is_full() {
            break;
        }
        let Some(url) = link.value().attr("href") else {
            continue;
        };
        let title = clean_text(&link.text().collect::<String>());
        if title.is_empty() {
            continue;
        }
        set.push(Candidate::new(url, title));
    }

    Ok(set.into_vec())
}
