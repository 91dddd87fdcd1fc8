//! Blocking HTTP client for a SearXNG instance.

use std::time::Duration;

use colored::Colorize;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, USER_AGENT};
use tracing::debug;

use crate::query::{HttpMethod, SearchRequest};
use crate::result::{ResultRecord, SearchResponse};
use crate::{Result, SearxngrError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Backend seam the session controller fetches through.
///
/// The real implementation is [`SearxngClient`]; tests substitute scripted
/// backends to drive the pagination state machine without a network.
pub trait SearchBackend {
    /// Fetches one upstream page of results for the given request.
    fn search(&self, request: &SearchRequest) -> Result<Vec<ResultRecord>>;
}

/// Connection options for [`SearxngClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Instance base URL, e.g. `https://searx.example.com`.
    pub base_url: String,
    /// Optional HTTP Basic credentials.
    pub username: Option<String>,
    pub password: Option<String>,
    /// Connect+read timeout applied to every request.
    pub timeout: Duration,
    /// Verify TLS certificates.
    pub verify_ssl: bool,
    /// Send the `User-Agent: searxngr/<version>` header.
    pub send_user_agent: bool,
    /// Send `Accept: application/json`.
    pub send_accept: bool,
    /// Send `Accept-Encoding: gzip, deflate`.
    pub send_accept_encoding: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: None,
            password: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_ssl: true,
            send_user_agent: true,
            send_accept: true,
            send_accept_encoding: true,
        }
    }
}

/// Client for the search and preferences endpoints of one instance.
pub struct SearxngClient {
    http: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl SearxngClient {
    /// Creates a client from the given options.
    pub fn new(options: ClientOptions) -> Result<Self> {
        if options.base_url.trim().is_empty() {
            return Err(SearxngrError::Config("searxng_url is not set".to_string()));
        }
        let base_url = options.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)?;

        let mut headers = HeaderMap::new();
        if options.send_accept {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        if options.send_accept_encoding {
            headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
        }
        if options.send_user_agent {
            let agent = format!("searxngr/{}", env!("CARGO_PKG_VERSION"));
            headers.insert(
                USER_AGENT,
                HeaderValue::from_str(&agent)
                    .map_err(|e| SearxngrError::Config(e.to_string()))?,
            );
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .danger_accept_invalid_certs(!options.verify_ssl)
            .build()?;

        Ok(Self {
            http,
            base_url,
            username: options.username,
            password: options.password,
        })
    }

    /// The normalized instance base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Assembles the GET request target for a search.
    ///
    /// Unset fields are omitted entirely; `pageno` appears only past the
    /// first page; the finished target is stripped of control characters.
    fn build_get_url(&self, request: &SearchRequest) -> String {
        let mut url = format!(
            "{}/?q={}&format=json",
            self.base_url,
            urlencoding::encode(&request.effective_query())
        );
        if let Some(categories) = request.categories_param() {
            url.push_str(&format!("&categories={}", urlencoding::encode(&categories)));
        }
        if let Some(engines) = request.engines_param() {
            url.push_str(&format!("&engines={}", urlencoding::encode(&engines)));
        }
        if let Some(language) = &request.language {
            url.push_str(&format!("&language={}", urlencoding::encode(language)));
        }
        url.push_str(&format!("&safesearch={}", request.safe_search.ordinal()));
        if let Some(range) = request.time_range {
            url.push_str(&format!("&time_range={}", range.as_str()));
        }
        if request.page > 1 {
            url.push_str(&format!("&pageno={}", request.page));
        }
        strip_unprintable(&url)
    }

    /// Assembles the form body for a POST search.
    fn build_post_form(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("q", strip_unprintable(&request.effective_query())),
            ("format", "json".to_string()),
        ];
        if let Some(categories) = request.categories_param() {
            form.push(("categories", categories));
        }
        if let Some(engines) = request.engines_param() {
            form.push(("engines", engines));
        }
        if let Some(language) = &request.language {
            form.push(("language", language.clone()));
        }
        if request.page > 1 {
            form.push(("pageno", request.page.to_string()));
        }
        form.push(("safesearch", request.safe_search.ordinal().to_string()));
        if let Some(range) = request.time_range {
            form.push(("time_range", range.as_str().to_string()));
        }
        form
    }

    fn send(&self, request: &SearchRequest) -> Result<reqwest::blocking::Response> {
        let builder = match request.method {
            HttpMethod::Get => {
                let url = self.build_get_url(request);
                debug!("searching: {url}");
                self.http.get(url)
            }
            HttpMethod::Post => {
                let url = format!("{}/search", self.base_url);
                let form = self.build_post_form(request);
                debug!("searching: {url} with body: {form:?}");
                self.http.post(url).form(&form)
            }
        };
        let builder = match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_deref()),
            None => builder,
        };
        Ok(builder.send()?)
    }

    /// Fetches the instance preferences page as HTML, for engine listing.
    pub fn preferences_html(&self) -> Result<String> {
        let url = format!("{}/preferences", self.base_url);
        let builder = match &self.username {
            Some(user) => self.http.get(&url).basic_auth(user, self.password.as_deref()),
            None => self.http.get(&url),
        };
        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearxngrError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.text()?)
    }
}

impl SearchBackend for SearxngClient {
    fn search(&self, request: &SearchRequest) -> Result<Vec<ResultRecord>> {
        let response = self.send(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearxngrError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text()?;
        let envelope: SearchResponse = serde_json::from_str(&body)?;

        for (engine, error) in envelope.unique_unresponsive() {
            eprintln!(
                "{} engine '{}' unresponsive: {}",
                "Warning:".yellow().bold(),
                engine,
                error
            );
        }

        debug!("returned {} results", envelope.results.len());
        Ok(envelope.results)
    }
}

/// Drops control characters from a request target.
fn strip_unprintable(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}
