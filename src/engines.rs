//! Engine listing scraped from an instance's preferences page.
//!
//! The JSON API does not expose the engine inventory, so this walks the
//! preferences HTML: one table row per engine, with the URL and category
//! bangs tucked into the engine tooltip.

use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::client::SearxngClient;
use crate::{Result, SearxngrError};

/// One engine known to the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub name: String,
    pub url: String,
    /// `!bang` shortcuts for the engine itself.
    pub bangs: Vec<String>,
    /// `!bang` tokens for the engine's categories.
    pub categories: Vec<String>,
    /// Reliability percentage as displayed, when present.
    pub reliability: Option<String>,
}

/// Fetches and parses the engine listing of the client's instance.
pub fn fetch_engines(client: &SearxngClient) -> Result<Vec<EngineInfo>> {
    parse_preferences(&client.preferences_html()?)
}

/// Extracts engine information from preferences HTML.
pub fn parse_preferences(html: &str) -> Result<Vec<EngineInfo>> {
    let document = Html::parse_document(html);
    let row_selector = selector("tr")?;
    let name_selector = selector("th.name")?;
    let label_selector = selector("th.name label")?;
    let tooltip_selector = selector("div.engine-tooltip")?;
    let link_selector = selector("a")?;
    let bang_selector = selector("td.shortcut span.bang")?;
    let cell_selector = selector("td")?;
    let span_selector = selector("span")?;

    let bang_token = Regex::new(r"^![A-Za-z0-9_]+$")
        .map_err(|e| SearxngrError::Scrape(e.to_string()))?;
    let any_token = Regex::new(r"![A-Za-z0-9_]+")
        .map_err(|e| SearxngrError::Scrape(e.to_string()))?;

    let mut engines: Vec<EngineInfo> = Vec::new();

    for row in document.select(&row_selector) {
        if row.select(&name_selector).next().is_none() {
            continue;
        }

        let name = row
            .select(&label_selector)
            .next()
            .map(|label| label.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        let tooltip = row.select(&tooltip_selector).next();

        let url = tooltip
            .and_then(|tip| tip.select(&link_selector).next())
            .and_then(|link| link.value().attr("href"))
            .unwrap_or_default()
            .to_string();

        let bangs: Vec<String> = row
            .select(&bang_selector)
            .map(|span| span.text().collect::<String>().trim().to_string())
            .filter(|bang| bang_token.is_match(bang))
            .collect();

        let categories = tooltip
            .map(|tip| {
                let text = tip.text().collect::<String>();
                category_bangs(&text, &any_token)
            })
            .unwrap_or_default();

        let reliability = row
            .select(&cell_selector)
            .last()
            .and_then(|cell| cell.select(&span_selector).next())
            .map(|span| span.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty());

        if engines.iter().any(|engine| engine.name == name) {
            continue;
        }
        engines.push(EngineInfo {
            name,
            url,
            bangs,
            categories,
            reliability,
        });
    }

    engines.sort_by_key(|engine| engine.name.to_lowercase());
    Ok(engines)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearxngrError::Scrape(format!("failed to parse selector: {e:?}")))
}

/// Pulls the `!bang` tokens out of the tooltip's categories section.
fn category_bangs(tooltip_text: &str, token: &Regex) -> Vec<String> {
    const MARKER: &str = "!bang for its categories";
    let Some(start) = tooltip_text.find(MARKER) else {
        return Vec::new();
    };
    let tail = &tooltip_text[start + MARKER.len()..];
    let section = &tail[..tail.find("!bang for").unwrap_or(tail.len())];

    let mut bangs: Vec<String> = Vec::new();
    for found in token.find_iter(section) {
        let bang = found.as_str().to_string();
        if !bangs.contains(&bang) {
            bangs.push(bang);
        }
    }
    bangs
}
