//! Search request representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Safe search level, transmitted to the backend as a three-level ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    /// No filtering.
    #[serde(rename = "none")]
    Off = 0,
    /// Moderate filtering.
    Moderate = 1,
    /// Strict filtering.
    #[default]
    Strict = 2,
}

impl SafeSearch {
    /// Ordinal value sent in the `safesearch` parameter.
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl FromStr for SafeSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::Off),
            "moderate" => Ok(Self::Moderate),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "invalid safe search option '{s}'. Use 'none', 'moderate', or 'strict'"
            )),
        }
    }
}

impl fmt::Display for SafeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Off => "none",
            Self::Moderate => "moderate",
            Self::Strict => "strict",
        };
        f.write_str(s)
    }
}

/// Time range filter for search results.
///
/// Parses from both the long keywords and the single-letter shorthands the
/// prompt accepts; always serializes as the long form the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// The long-form keyword sent in the `time_range` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d" | "day" => Ok(Self::Day),
            "w" | "week" => Ok(Self::Week),
            "m" | "month" => Ok(Self::Month),
            "y" | "year" => Ok(Self::Year),
            _ => Err(format!(
                "invalid time range '{s}'. Use 'd', 'day', 'w', 'week', 'm', 'month', 'y', or 'year'"
            )),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result categories known to SearXNG.
///
/// `social+media` is a command-line convenience token; the backend value is
/// the literal `social media` for both GET and POST transports, which is why
/// serialization goes through [`Category::as_backend_str`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    News,
    Videos,
    Images,
    Music,
    Map,
    Science,
    It,
    Files,
    #[serde(rename = "social media")]
    SocialMedia,
    /// Anything the instance reports that this client does not know.
    #[serde(other)]
    Other,
}

impl Category {
    /// Categories a user may select, in the order shown in help text.
    pub const SELECTABLE: [Category; 10] = [
        Category::General,
        Category::News,
        Category::Videos,
        Category::Images,
        Category::Music,
        Category::Map,
        Category::Science,
        Category::It,
        Category::Files,
        Category::SocialMedia,
    ];

    /// The value transmitted to the backend.
    pub fn as_backend_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::News => "news",
            Self::Videos => "videos",
            Self::Images => "images",
            Self::Music => "music",
            Self::Map => "map",
            Self::Science => "science",
            Self::It => "it",
            Self::Files => "files",
            Self::SocialMedia => "social media",
            Self::Other => "other",
        }
    }

    /// The token accepted on the command line and at the prompt.
    pub fn cli_token(self) -> &'static str {
        match self {
            Self::SocialMedia => "social+media",
            other => other.as_backend_str(),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "news" => Ok(Self::News),
            "videos" => Ok(Self::Videos),
            "images" => Ok(Self::Images),
            "music" => Ok(Self::Music),
            "map" => Ok(Self::Map),
            "science" => Ok(Self::Science),
            "it" => Ok(Self::It),
            "files" => Ok(Self::Files),
            "social+media" | "social media" => Ok(Self::SocialMedia),
            _ => {
                let supported: Vec<&str> = Self::SELECTABLE.iter().map(|c| c.cli_token()).collect();
                Err(format!(
                    "invalid category '{}'. Supported categories are: {}",
                    s,
                    supported.join(", ")
                ))
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_backend_str())
    }
}

/// HTTP method used for search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(format!("invalid HTTP method '{s}'. Use 'GET' or 'POST'")),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// One search request with all parameters.
///
/// The session controller keeps a request as its template and only varies
/// `page` while paginating; a new query or filter change rebuilds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The search terms.
    pub query: String,
    /// Optional `site:` filter folded into the query string.
    pub site: Option<String>,
    /// Target categories. When non-empty, takes precedence over `engines`.
    pub categories: Vec<Category>,
    /// Specific engines to use (by name).
    pub engines: Vec<String>,
    /// Language tag (e.g. "en", "de").
    pub language: Option<String>,
    /// Time range filter.
    pub time_range: Option<TimeRange>,
    /// Safe search level.
    pub safe_search: SafeSearch,
    /// Transport method.
    pub method: HttpMethod,
    /// Upstream page number (1-indexed).
    pub page: u32,
}

impl SearchRequest {
    /// Creates a new request with the given terms and default parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            site: None,
            categories: Vec::new(),
            engines: Vec::new(),
            language: None,
            time_range: None,
            safe_search: SafeSearch::default(),
            method: HttpMethod::default(),
            page: 1,
        }
    }

    /// Sets the site filter.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Sets the categories to search.
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Sets specific engines to use.
    pub fn with_engines(mut self, engines: Vec<String>) -> Self {
        self.engines = engines;
        self
    }

    /// Sets the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the time range filter.
    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    /// Sets the safe search level.
    pub fn with_safe_search(mut self, level: SafeSearch) -> Self {
        self.safe_search = level;
        self
    }

    /// Sets the transport method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the upstream page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// The query string actually transmitted, with any site filter applied.
    pub fn effective_query(&self) -> String {
        match &self.site {
            Some(site) => format!("site:{} {}", site, self.query),
            None => self.query.clone(),
        }
    }

    /// Comma-joined category list in backend form, if any.
    pub fn categories_param(&self) -> Option<String> {
        if self.categories.is_empty() {
            return None;
        }
        let joined: Vec<&str> = self
            .categories
            .iter()
            .map(|c| c.as_backend_str())
            .collect();
        Some(joined.join(","))
    }

    /// Comma-joined engine list, if any. Empty when categories are set,
    /// because categories take precedence.
    pub fn engines_param(&self) -> Option<String> {
        if !self.categories.is_empty() || self.engines.is_empty() {
            return None;
        }
        Some(self.engines.join(","))
    }
}
