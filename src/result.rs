//! Search result records as returned by the backend.
//!
//! The JSON shape is category-dependent; everything beyond title/url/content
//! is optional and typed here so the renderer never probes dynamic maps.
//! Unknown fields are retained in a flattened spillover map, which lets the
//! prompt's raw-record inspector dump a record as it was received.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::Category;

/// Template hint attached to `files` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Template {
    #[serde(rename = "torrent.html")]
    Torrent,
    #[serde(rename = "files.html")]
    Files,
    #[serde(other)]
    Other,
}

/// Media length: float seconds from some engines, preformatted text from others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaLength {
    Seconds(f64),
    Text(String),
}

/// A value engines encode inconsistently as number or string
/// (seeders, leechers, file sizes, coordinates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Postal address sub-fields on `map` results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// One search hit as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    /// Engine that produced this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// All engines that contributed it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub engines: Vec<String>,
    #[serde(
        default,
        rename = "publishedDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<MediaLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, rename = "magnetlink", skip_serializing_if = "Option::is_none")]
    pub magnet_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leech: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Scalar>,
    /// Fields this client does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultRecord {
    /// Contributing engines other than the primary one.
    pub fn co_engines(&self) -> Vec<&str> {
        let primary = self.engine.as_deref();
        self.engines
            .iter()
            .map(String::as_str)
            .filter(|name| Some(*name) != primary)
            .collect()
    }
}

/// JSON envelope around a page of results.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<ResultRecord>,
    #[serde(default)]
    pub unresponsive_engines: Vec<(String, String)>,
}

impl SearchResponse {
    /// Unresponsive-engine pairs with duplicates collapsed, in first-seen order.
    pub fn unique_unresponsive(&self) -> Vec<&(String, String)> {
        let mut seen: Vec<&(String, String)> = Vec::new();
        for pair in &self.unresponsive_engines {
            if !seen.contains(&pair) {
                seen.push(pair);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_deserialization() {
        let json = r#"{"title": "Test", "url": "https://example.com", "content": "c"}"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "Test");
        assert_eq!(record.url, "https://example.com");
        assert!(record.category.is_none());
        assert!(record.engines.is_empty());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_record_with_missing_fields_defaults() {
        let record: ResultRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.url, "");
        assert_eq!(record.content, "");
    }

    #[test]
    fn test_video_record_deserialization() {
        let json = r#"{
            "title": "Video Result",
            "url": "https://videos.example.com/watch",
            "content": "<p>Video search result</p>",
            "engine": "youtube",
            "category": "videos",
            "engines": ["youtube"],
            "author": "Video Author",
            "length": 122.0
        }"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, Some(Category::Videos));
        assert_eq!(record.length, Some(MediaLength::Seconds(122.0)));
        assert_eq!(record.author.as_deref(), Some("Video Author"));
    }

    #[test]
    fn test_length_as_preformatted_text() {
        let json = r#"{"title": "t", "url": "u", "content": "c", "length": "12:34"}"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.length, Some(MediaLength::Text("12:34".to_string())));
    }

    #[test]
    fn test_torrent_record_deserialization() {
        let json = r#"{
            "title": "t",
            "url": "u",
            "content": "c",
            "category": "files",
            "template": "torrent.html",
            "magnetlink": "magnet:?xt=urn:btih:abc",
            "seed": 12,
            "leech": "3",
            "filesize": 734003200
        }"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.template, Some(Template::Torrent));
        assert_eq!(record.seed, Some(Scalar::Int(12)));
        assert_eq!(record.leech, Some(Scalar::Text("3".to_string())));
        assert_eq!(record.magnet_link.as_deref(), Some("magnet:?xt=urn:btih:abc"));
    }

    #[test]
    fn test_unknown_template_falls_back() {
        let json = r#"{"title": "t", "url": "u", "content": "c", "template": "paper.html"}"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.template, Some(Template::Other));
    }

    #[test]
    fn test_map_record_with_address() {
        let json = r#"{
            "title": "t",
            "url": "u",
            "content": "c",
            "category": "map",
            "address": {"house_number": "10", "road": "Main St", "country": "UK"},
            "latitude": 51.5,
            "longitude": -0.12
        }"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        let address = record.address.unwrap();
        assert_eq!(address.house_number.as_deref(), Some("10"));
        assert_eq!(address.locality, None);
        assert_eq!(record.latitude, Some(Scalar::Float(51.5)));
    }

    #[test]
    fn test_extra_fields_preserved() {
        let json = r#"{"title": "t", "url": "u", "content": "c", "score": 1.25, "parsed_url": ["https", "x"]}"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert!(record.extra.contains_key("score"));
        assert!(record.extra.contains_key("parsed_url"));

        let dumped = serde_json::to_value(&record).unwrap();
        assert_eq!(dumped["score"], serde_json::json!(1.25));
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let record: ResultRecord =
            serde_json::from_str(r#"{"title": "t", "url": "u", "content": "c"}"#).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("magnetlink"));
        assert!(!json.contains("publishedDate"));
        assert!(!json.contains("engines"));
    }

    #[test]
    fn test_co_engines_excludes_primary() {
        let json = r#"{
            "title": "t", "url": "u", "content": "c",
            "engine": "qwant",
            "engines": ["qwant", "duckduckgo", "brave"]
        }"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.co_engines(), vec!["duckduckgo", "brave"]);
    }

    #[test]
    fn test_co_engines_without_primary() {
        let json = r#"{"title": "t", "url": "u", "content": "c", "engines": ["a", "b"]}"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.co_engines(), vec!["a", "b"]);
    }

    #[test]
    fn test_envelope_without_results_key() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
        assert!(response.unresponsive_engines.is_empty());
    }

    #[test]
    fn test_envelope_with_results() {
        let json = r#"{"results": [{"title": "a", "url": "u", "content": "c"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].title, "a");
    }

    #[test]
    fn test_unresponsive_engine_pairs() {
        let json = r#"{"unresponsive_engines": [["e1", "timeout"], ["e2", "err"]]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.unresponsive_engines.len(), 2);
        assert_eq!(response.unresponsive_engines[0].0, "e1");
    }

    #[test]
    fn test_unique_unresponsive_collapses_duplicates() {
        let json = r#"{"unresponsive_engines": [
            ["e1", "timeout"], ["e1", "timeout"], ["e2", "err"]
        ]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let unique = response.unique_unresponsive();
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].0, "e1");
        assert_eq!(unique[1].0, "e2");
    }

    #[test]
    fn test_unique_unresponsive_keeps_distinct_errors_per_engine() {
        let json = r#"{"unresponsive_engines": [["e1", "timeout"], ["e1", "error"]]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.unique_unresponsive().len(), 2);
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Int(7).to_string(), "7");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::Text("700 MB".to_string()).to_string(), "700 MB");
    }
}
