//! Terminal rendering of result windows.
//!
//! Each heterogeneous backend record is normalized into a fixed presentation:
//! numbered title with domain, wrapped plain-text snippet, a category-specific
//! metadata trailer, and the contributing engines.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use colored::Colorize;
use tracing::debug;

use crate::context::SessionContext;
use crate::query::Category;
use crate::result::{MediaLength, ResultRecord, Scalar, Template};

const TITLE_WIDTH: usize = 70;
const MAX_CONTENT_WORDS: usize = 128;
const INDENT: usize = 5;
const FALLBACK_WIDTH: usize = 80;

/// Renders result windows to the terminal.
pub struct Renderer {
    width_override: Option<usize>,
}

impl Renderer {
    /// Creates a renderer that wraps to the live terminal width.
    pub fn new() -> Self {
        Self {
            width_override: None,
        }
    }

    /// Creates a renderer with a fixed wrap width.
    pub fn with_width(width: usize) -> Self {
        Self {
            width_override: Some(width),
        }
    }

    fn width(&self) -> usize {
        self.width_override.unwrap_or_else(|| {
            crossterm::terminal::size()
                .map(|(cols, _)| cols as usize)
                .unwrap_or(FALLBACK_WIDTH)
        })
    }

    /// Prints a window of records. `start_offset` is the buffer position of
    /// the first record, so displayed indices stay valid across windows.
    pub fn print_window(
        &self,
        window: &[ResultRecord],
        start_offset: usize,
        ctx: &SessionContext,
    ) {
        if window.is_empty() {
            println!("\nNo results found.\n");
            return;
        }
        println!();
        for (i, record) in window.iter().enumerate() {
            print!("{}", self.format_record(record, start_offset + i + 1, ctx));
        }
    }

    /// Formats one record. Pure given the record, index, context, and width;
    /// rendering the same record twice yields identical output.
    pub fn format_record(
        &self,
        record: &ResultRecord,
        index: usize,
        ctx: &SessionContext,
    ) -> String {
        let mut out = String::new();

        let mut title = shorten_title(&record.title);
        if title.is_empty() {
            title = "No title".to_string();
        }
        let domain = domain_of(&record.url);
        out.push_str(&format!(
            " {} {} {}\n",
            format!("{index:>2}.").cyan(),
            title.bold().green(),
            format!("[{domain}]").yellow()
        ));

        if ctx.expand && !record.url.is_empty() {
            out.push_str(&format!("     {}\n", record.url.blue()));
        }

        let snippet = clip_words(&html_to_text(&record.content), MAX_CONTENT_WORDS);
        if !snippet.is_empty() {
            for line in wrap(&snippet, self.width().saturating_sub(INDENT)) {
                out.push_str(&format!("     {line}\n"));
            }
        }

        for line in category_trailer(record) {
            out.push_str(&format!("     {line}\n"));
        }

        if let Some(line) = engines_line(record) {
            out.push_str(&format!("     {line}\n"));
        }

        out.push('\n');
        out
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Category-specific metadata lines, dispatched on the record's category tag.
fn category_trailer(record: &ResultRecord) -> Vec<String> {
    let Some(category) = record.category else {
        return Vec::new();
    };
    match category {
        Category::General | Category::It | Category::Other => Vec::new(),
        Category::News | Category::SocialMedia => published_date(record)
            .map(|date| vec![format!("{}", date.cyan().dimmed())])
            .unwrap_or_default(),
        Category::Images => {
            let mut lines = Vec::new();
            if record.resolution.is_some() || record.source.is_some() {
                lines.push(format!(
                    "{} {}",
                    record.resolution.as_deref().unwrap_or("").cyan().dimmed(),
                    record.source.as_deref().unwrap_or("")
                ));
            }
            if let Some(img_src) = &record.img_src {
                lines.push(format!("{}", img_src.blue()));
            }
            lines
        }
        Category::Videos | Category::Music => {
            let length = record.length.as_ref().map(format_length);
            let author = record.author.as_deref();
            if length.is_none() && author.is_none() {
                return Vec::new();
            }
            vec![format!(
                "{} {}",
                length.unwrap_or_default().cyan().dimmed(),
                author.unwrap_or("")
            )]
        }
        Category::Map => {
            let mut lines = Vec::new();
            if let Some(address) = &record.address {
                let street = [
                    address.house_number.as_deref(),
                    address.road.as_deref(),
                ]
                .iter()
                .flatten()
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
                if !street.is_empty() {
                    lines.push(street);
                }
                let mut locality = [
                    address.locality.as_deref(),
                    address.postcode.as_deref(),
                ]
                .iter()
                .flatten()
                .copied()
                .collect::<Vec<_>>()
                .join(", ");
                if let Some(country) = &address.country {
                    if locality.is_empty() {
                        locality = country.clone();
                    } else {
                        locality = format!("{locality}, {country}");
                    }
                }
                if !locality.is_empty() {
                    lines.push(locality);
                }
            }
            if record.latitude.is_some() || record.longitude.is_some() {
                lines.push(format!(
                    "{}",
                    format!(
                        "{}, {}",
                        scalar_or_empty(&record.latitude),
                        scalar_or_empty(&record.longitude)
                    )
                    .cyan()
                    .dimmed()
                ));
            }
            lines
        }
        Category::Science => {
            let mut parts: Vec<String> = Vec::new();
            if let Some(date) = published_date(record) {
                parts.push(format!("{}", date.bold()));
            }
            if let Some(journal) = &record.journal {
                parts.push(journal.clone());
            }
            if let Some(publisher) = &record.publisher {
                parts.push(publisher.clone());
            }
            if parts.is_empty() {
                Vec::new()
            } else {
                vec![format!("{}", parts.join(" ").cyan().dimmed())]
            }
        }
        Category::Files => match record.template {
            Some(Template::Torrent) => {
                let mut lines = Vec::new();
                if let Some(magnet) = &record.magnet_link {
                    lines.push(format!("{}", magnet.blue().dimmed()));
                }
                lines.push(format!(
                    "{} ↑{} seeders, ↓{} leechers",
                    scalar_or_empty(&record.filesize).cyan().dimmed(),
                    scalar_or_empty(&record.seed),
                    scalar_or_empty(&record.leech)
                ));
                lines
            }
            Some(Template::Files) => {
                if record.size.is_none() && record.metadata.is_none() {
                    return Vec::new();
                }
                vec![format!(
                    "{} {}",
                    scalar_or_empty(&record.size).cyan().dimmed(),
                    record.metadata.as_deref().unwrap_or("")
                )]
            }
            _ => Vec::new(),
        },
    }
}

/// Source-engines line: primary engine emphasized, other contributors after.
fn engines_line(record: &ResultRecord) -> Option<String> {
    let primary = record.engine.as_deref()?;
    let others = record.co_engines();
    let line = if others.is_empty() {
        format!("{}", format!("[{primary}]").dimmed().bold())
    } else {
        format!(
            "{} {}",
            format!("[{primary}]").dimmed().bold(),
            format!("+{}", others.join(" +")).dimmed()
        )
    };
    Some(line)
}

fn scalar_or_empty(value: &Option<Scalar>) -> String {
    value.as_ref().map(Scalar::to_string).unwrap_or_default()
}

fn published_date(record: &ResultRecord) -> Option<String> {
    record.published_date.as_deref().and_then(format_date)
}

/// Shortens to at most `TITLE_WIDTH` characters on a word boundary, with an
/// ellipsis placeholder when truncated. Whitespace runs collapse to one space.
fn shorten_title(title: &str) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= TITLE_WIDTH {
        return collapsed;
    }
    let mut out = String::new();
    for word in collapsed.split(' ') {
        let sep = usize::from(!out.is_empty());
        if out.chars().count() + sep + word.chars().count() + 4 > TITLE_WIDTH {
            break;
        }
        if sep == 1 {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.is_empty() {
        out = collapsed.chars().take(TITLE_WIDTH - 3).collect();
        out.push_str("...");
    } else {
        out.push_str(" ...");
    }
    out
}

/// Extracts the host segment of a URL. Without a scheme separator, everything
/// before the first slash; an empty URL yields an empty domain.
fn domain_of(url: &str) -> String {
    let rest = match url.split_once("//") {
        Some((_, rest)) => rest,
        None => url,
    };
    rest.split('/').next().unwrap_or("").to_string()
}

/// Converts an HTML-ish snippet to plain text: tags stripped, entities decoded.
fn html_to_text(html: &str) -> String {
    let mut stripped = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(c),
            _ => {}
        }
    }
    html_escape::decode_html_entities(&stripped).into_owned()
}

/// Caps text at `max` words, marking the cut with an ellipsis.
fn clip_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max {
        format!("{} ...", words[..max].join(" "))
    } else {
        words.join(" ")
    }
}

/// Greedy word wrap to the given width.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Formats float seconds as `MM:SS`; preformatted lengths pass through.
fn format_length(length: &MediaLength) -> String {
    match length {
        MediaLength::Seconds(secs) => {
            let total = secs.max(0.0).floor() as u64;
            format!("{:02}:{:02}", total / 60, total % 60)
        }
        MediaLength::Text(text) => text.clone(),
    }
}

/// Parses the backend's assorted date encodings; unparseable dates degrade to
/// `None` and are only mentioned in debug output.
fn format_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed).map(|dt| dt.date_naive()))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"));
    match date {
        Ok(date) => Some(date.format("%b %-d, %Y").to_string()),
        Err(err) => {
            debug!("unparseable date '{raw}': {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    fn record(json: serde_json::Value) -> ResultRecord {
        serde_json::from_value(json).unwrap()
    }

    fn sample() -> ResultRecord {
        record(serde_json::json!({
            "title": "Test Result 1",
            "url": "https://example.com/result1",
            "content": "<p>This is a test result with some content to display.</p>",
            "engine": "testengine",
            "category": "general",
            "engines": ["testengine", "otherengine"],
        }))
    }

    #[test]
    fn test_format_record_basic() {
        plain();
        let renderer = Renderer::with_width(80);
        let out = renderer.format_record(&sample(), 1, &SessionContext::default());
        assert!(out.contains("Test Result 1"));
        assert!(out.contains("[example.com]"));
        assert!(out.contains("This is a test result"));
        assert!(out.contains("[testengine] +otherengine"));
        assert!(!out.contains("https://example.com/result1"));
    }

    #[test]
    fn test_format_record_expand_shows_url() {
        plain();
        let renderer = Renderer::with_width(80);
        let ctx = SessionContext::new(true, false);
        let out = renderer.format_record(&sample(), 1, &ctx);
        assert!(out.contains("https://example.com/result1"));
    }

    #[test]
    fn test_format_record_is_idempotent() {
        plain();
        let renderer = Renderer::with_width(80);
        let ctx = SessionContext::default();
        let record = sample();
        assert_eq!(
            renderer.format_record(&record, 3, &ctx),
            renderer.format_record(&record, 3, &ctx)
        );
    }

    #[test]
    fn test_news_trailer_has_formatted_date() {
        plain();
        let record = record(serde_json::json!({
            "title": "News Result",
            "url": "https://news.example.com/article",
            "content": "c",
            "category": "news",
            "publishedDate": "2023-01-15T10:30:00Z",
        }));
        let lines = category_trailer(&record);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Jan 15, 2023"));
    }

    #[test]
    fn test_news_trailer_swallows_bad_date() {
        plain();
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "news",
            "publishedDate": "not a date",
        }));
        assert!(category_trailer(&record).is_empty());
    }

    #[test]
    fn test_images_trailer() {
        plain();
        let record = record(serde_json::json!({
            "title": "Image Result",
            "url": "https://images.example.com/photo",
            "content": "c",
            "category": "images",
            "source": "Image Source",
            "resolution": "1920x1080",
            "img_src": "https://example.com/image.jpg",
        }));
        let lines = category_trailer(&record);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1920x1080"));
        assert!(lines[0].contains("Image Source"));
        assert!(lines[1].contains("https://example.com/image.jpg"));
    }

    #[test]
    fn test_videos_trailer_length_and_author() {
        plain();
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "videos",
            "author": "Video Author",
            "length": 125.0,
        }));
        let lines = category_trailer(&record);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("02:05"));
        assert!(lines[0].contains("Video Author"));
    }

    #[test]
    fn test_category_dispatch_is_exclusive() {
        plain();
        // An images record with video-ish fields must never render the
        // videos trailer.
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "images",
            "author": "someone",
            "length": 125.0,
            "img_src": "https://example.com/i.jpg",
        }));
        let lines = category_trailer(&record);
        assert!(lines.iter().all(|l| !l.contains("02:05")));
        assert!(lines.iter().any(|l| l.contains("i.jpg")));
    }

    #[test]
    fn test_music_trailer_matches_videos_format() {
        plain();
        let video = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "videos", "author": "a", "length": 61.0,
        }));
        let music = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "music", "author": "a", "length": 61.0,
        }));
        assert_eq!(category_trailer(&video), category_trailer(&music));
    }

    #[test]
    fn test_map_trailer_address_and_coordinates() {
        plain();
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "map",
            "address": {
                "house_number": "10",
                "road": "Downing Street",
                "locality": "London",
                "postcode": "SW1A 2AA",
                "country": "United Kingdom",
            },
            "latitude": 51.5034,
            "longitude": -0.1276,
        }));
        let lines = category_trailer(&record);
        assert_eq!(lines[0], "10 Downing Street");
        assert_eq!(lines[1], "London, SW1A 2AA, United Kingdom");
        assert!(lines[2].contains("51.5034, -0.1276"));
    }

    #[test]
    fn test_science_trailer() {
        plain();
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "science",
            "publishedDate": "2022-06-01",
            "journal": "Nature",
            "publisher": "Springer",
        }));
        let lines = category_trailer(&record);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Jun 1, 2022"));
        assert!(lines[0].contains("Nature"));
        assert!(lines[0].contains("Springer"));
    }

    #[test]
    fn test_torrent_trailer() {
        plain();
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "files",
            "template": "torrent.html",
            "magnetlink": "magnet:?xt=urn:btih:abc",
            "filesize": "700 MB",
            "seed": 12,
            "leech": 3,
        }));
        let lines = category_trailer(&record);
        assert!(lines[0].contains("magnet:?xt=urn:btih:abc"));
        assert!(lines[1].contains("700 MB"));
        assert!(lines[1].contains("↑12 seeders"));
        assert!(lines[1].contains("↓3 leechers"));
    }

    #[test]
    fn test_files_trailer() {
        plain();
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "files",
            "template": "files.html",
            "size": "4.2 GB",
            "metadata": "application/x-iso9660-image",
        }));
        let lines = category_trailer(&record);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("4.2 GB"));
        assert!(lines[0].contains("application/x-iso9660-image"));
    }

    #[test]
    fn test_general_and_it_have_no_trailer() {
        plain();
        for category in ["general", "it"] {
            let record = record(serde_json::json!({
                "title": "t", "url": "u", "content": "c",
                "category": category,
                "publishedDate": "2023-01-15T10:30:00Z",
                "author": "a",
            }));
            assert!(category_trailer(&record).is_empty());
        }
    }

    #[test]
    fn test_unknown_category_has_no_trailer() {
        plain();
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "category": "packages",
        }));
        assert!(category_trailer(&record).is_empty());
    }

    #[test]
    fn test_engines_line_excludes_primary_from_others() {
        plain();
        let record = record(serde_json::json!({
            "title": "t", "url": "u", "content": "c",
            "engine": "qwant",
            "engines": ["qwant", "duckduckgo"],
        }));
        assert_eq!(engines_line(&record).unwrap(), "[qwant] +duckduckgo");
    }

    #[test]
    fn test_engines_line_absent_without_primary() {
        plain();
        let record = record(serde_json::json!({"title": "t", "url": "u", "content": "c"}));
        assert!(engines_line(&record).is_none());
    }

    #[test]
    fn test_shorten_title_short_passes_through() {
        assert_eq!(shorten_title("short title"), "short title");
    }

    #[test]
    fn test_shorten_title_truncates_with_ellipsis() {
        let long = "word ".repeat(40);
        let short = shorten_title(&long);
        assert!(short.chars().count() <= 70);
        assert!(short.ends_with(" ..."));
    }

    #[test]
    fn test_shorten_title_collapses_whitespace() {
        assert_eq!(shorten_title("a   b\t c"), "a b c");
    }

    #[test]
    fn test_domain_of_with_scheme() {
        assert_eq!(domain_of("https://example.com/path/x"), "example.com");
    }

    #[test]
    fn test_domain_of_without_scheme() {
        assert_eq!(domain_of("example.com/path"), "example.com");
    }

    #[test]
    fn test_domain_of_empty() {
        assert_eq!(domain_of(""), "");
    }

    #[test]
    fn test_html_to_text_strips_tags_and_entities() {
        assert_eq!(
            html_to_text("<p>fish &amp; <b>chips</b></p>"),
            "fish & chips"
        );
    }

    #[test]
    fn test_clip_words_under_limit() {
        assert_eq!(clip_words("one two three", 128), "one two three");
    }

    #[test]
    fn test_clip_words_over_limit() {
        let text = "w ".repeat(200);
        let clipped = clip_words(&text, 128);
        assert!(clipped.ends_with(" ..."));
        assert_eq!(clipped.split_whitespace().count(), 129);
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("aaa bbb ccc ddd", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn test_format_length_minutes_seconds() {
        assert_eq!(format_length(&MediaLength::Seconds(125.0)), "02:05");
        assert_eq!(format_length(&MediaLength::Seconds(122.0)), "02:02");
        assert_eq!(format_length(&MediaLength::Seconds(59.0)), "00:59");
        assert_eq!(format_length(&MediaLength::Seconds(3599.0)), "59:59");
    }

    #[test]
    fn test_format_length_preformatted_passthrough() {
        assert_eq!(
            format_length(&MediaLength::Text("1:02:03".to_string())),
            "1:02:03"
        );
    }

    #[test]
    fn test_format_date_rfc3339() {
        assert_eq!(
            format_date("2023-01-15T10:30:00Z").as_deref(),
            Some("Jan 15, 2023")
        );
    }

    #[test]
    fn test_format_date_naive_formats() {
        assert_eq!(
            format_date("2023-01-15 10:30:00").as_deref(),
            Some("Jan 15, 2023")
        );
        assert_eq!(format_date("2023-01-15").as_deref(), Some("Jan 15, 2023"));
    }

    #[test]
    fn test_format_date_unparseable() {
        assert_eq!(format_date("yesterday-ish"), None);
    }

    #[test]
    fn test_print_window_offset_numbering() {
        plain();
        let renderer = Renderer::with_width(80);
        let out = renderer.format_record(&sample(), 11, &SessionContext::default());
        assert!(out.contains("11."));
    }
}
