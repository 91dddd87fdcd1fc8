//! Configuration file handling.
//!
//! Settings live in `config.toml` under the user's config directory. The
//! file is created interactively on first run; every key is optional and
//! overridable from the command line.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::{Result, SearxngrError};

/// Config file name inside the searxngr config directory.
pub const CONFIG_FILE: &str = "config.toml";

const SAMPLE_SEARXNG_URL: &str = "https://searxng.example.com";

/// Settings read from the config file. All keys are optional; resolution
/// against command-line flags and built-in defaults happens in the binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub searxng_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub result_count: Option<usize>,
    pub categories: Option<Vec<String>>,
    pub engines: Option<Vec<String>>,
    pub safe_search: Option<String>,
    pub expand: Option<bool>,
    pub language: Option<String>,
    pub http_method: Option<String>,
    pub timeout: Option<u64>,
    pub no_verify_ssl: Option<bool>,
    pub no_user_agent: Option<bool>,
    pub url_handler: Option<String>,
    pub copy_command: Option<String>,
    pub debug: Option<bool>,
}

/// Path of the config file, when a config directory exists for this user.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("searxngr").join(CONFIG_FILE))
}

/// Loads settings from the given file.
pub fn load(path: &Path) -> Result<FileConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()))
        .build()
        .map_err(|e| SearxngrError::Config(e.to_string()))?;
    settings
        .try_deserialize()
        .map_err(|e| SearxngrError::Config(e.to_string()))
}

/// First-run setup: asks for the instance URL on stdin and writes a config
/// file with every other key present but commented out.
pub fn create_default(path: &Path) -> Result<()> {
    print!("Enter your SearXNG instance URL [{SAMPLE_SEARXNG_URL}]: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let url = line.trim();
    let url = if url.is_empty() { SAMPLE_SEARXNG_URL } else { url };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_template(url))?;
    println!("{}", format!("created {}", path.display()).dimmed());
    Ok(())
}

fn default_template(url: &str) -> String {
    format!(
        r#"searxng_url = "{url}"
# username = ""
# password = ""
# result_count = 10
# categories = ["general"]
# engines = ["google", "duckduckgo", "brave"]
# safe_search = "strict"
# expand = false
# language = "en"
# http_method = "GET"
# timeout = 30
# no_verify_ssl = false
# no_user_agent = false
# url_handler = "xdg-open"
# copy_command = "xclip -selection clipboard"
# debug = false
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "searxngr-test-{}-{name}.toml",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let path = temp_config(
            "full",
            r#"
searxng_url = "https://searx.example.com"
username = "user"
password = "secret"
result_count = 20
categories = ["general", "news"]
engines = ["google", "brave"]
safe_search = "moderate"
expand = true
language = "de"
http_method = "POST"
timeout = 10
no_verify_ssl = true
no_user_agent = true
url_handler = "firefox"
copy_command = "wl-copy"
debug = true
"#,
        );
        let config = load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(
            config.searxng_url.as_deref(),
            Some("https://searx.example.com")
        );
        assert_eq!(config.username.as_deref(), Some("user"));
        assert_eq!(config.result_count, Some(20));
        assert_eq!(
            config.categories,
            Some(vec!["general".to_string(), "news".to_string()])
        );
        assert_eq!(config.safe_search.as_deref(), Some("moderate"));
        assert_eq!(config.expand, Some(true));
        assert_eq!(config.http_method.as_deref(), Some("POST"));
        assert_eq!(config.timeout, Some(10));
        assert_eq!(config.no_verify_ssl, Some(true));
        assert_eq!(config.url_handler.as_deref(), Some("firefox"));
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_load_minimal_config() {
        let path = temp_config("minimal", "searxng_url = \"https://x.example\"\n");
        let config = load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.searxng_url.as_deref(), Some("https://x.example"));
        assert_eq!(config.result_count, None);
        assert_eq!(config.engines, None);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let path = std::env::temp_dir().join("searxngr-test-does-not-exist.toml");
        assert!(matches!(load(&path), Err(SearxngrError::Config(_))));
    }

    #[test]
    fn test_default_template_parses() {
        let path = temp_config("template", &default_template("https://searx.example.com"));
        let config = load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(
            config.searxng_url.as_deref(),
            Some("https://searx.example.com")
        );
        // everything else is commented out
        assert_eq!(config, FileConfig {
            searxng_url: Some("https://searx.example.com".to_string()),
            ..Default::default()
        });
    }

    #[test]
    fn test_default_template_mentions_every_key() {
        let template = default_template("u");
        for key in [
            "result_count",
            "categories",
            "engines",
            "safe_search",
            "expand",
            "language",
            "http_method",
            "timeout",
            "no_verify_ssl",
            "no_user_agent",
            "url_handler",
            "copy_command",
            "debug",
        ] {
            assert!(template.contains(key), "missing {key}");
        }
    }
}
