//! searxngr CLI - interactive SearXNG terminal client.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use rand::seq::SliceRandom;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use searxngr::config::{self, FileConfig};
use searxngr::engines;
use searxngr::ui::{self, Clipboard, UrlOpener};
use searxngr::{
    Category, ClientOptions, HttpMethod, Renderer, Repl, SafeSearch, SearchRequest, SearxngClient,
    Session, SessionContext, TimeRange,
};

/// Perform a search using SearXNG
#[derive(Parser, Debug)]
#[command(name = "searxngr", version, disable_version_flag = true)]
struct Cli {
    /// Search query
    #[arg(value_name = "QUERY")]
    query: Vec<String>,

    /// SearXNG instance URL
    #[arg(long, value_name = "SEARXNG_URL")]
    searxng_url: Option<String>,

    /// Categories to search in (general, news, videos, images, music, map,
    /// science, it, files, social+media)
    #[arg(short, long, value_name = "CATEGORY", value_delimiter = ',')]
    categories: Vec<String>,

    /// Show debug output
    #[arg(short, long)]
    debug: bool,

    /// Engines to use for the search (default: all available engines)
    #[arg(short, long, value_name = "ENGINE", value_delimiter = ',')]
    engines: Vec<String>,

    /// Show the complete URL in search results
    #[arg(short = 'x', long)]
    expand: bool,

    /// Open the first result in the browser and exit
    #[arg(short = 'j', long)]
    first: bool,

    /// HTTP method for search requests: GET or POST
    #[arg(long, value_name = "METHOD")]
    http_method: Option<String>,

    /// Print all fetched results as a JSON array and exit
    #[arg(long)]
    json: bool,

    /// Search results in a specific language (e.g. 'en', 'de', 'fr')
    #[arg(short, long, value_name = "LANGUAGE")]
    language: Option<String>,

    /// List the instance's engines and exit
    #[arg(long)]
    list_engines: bool,

    /// Open a random result in the browser and exit
    #[arg(long)]
    lucky: bool,

    /// Show results from the news category
    #[arg(short = 'N', long)]
    news: bool,

    /// Do not verify SSL certificates (not recommended)
    #[arg(long)]
    no_verify_ssl: bool,

    /// Search and print results without prompting
    #[arg(long = "np", alias = "noprompt")]
    no_prompt: bool,

    /// Disable the User-Agent header
    #[arg(long = "noua")]
    no_user_agent: bool,

    /// Show N results per page; N=0 uses the server's default page as-is
    #[arg(short, long, value_name = "N")]
    num: Option<usize>,

    /// Safe search filter: none, moderate, or strict
    #[arg(long, value_name = "FILTER")]
    safe_search: Option<String>,

    /// Show results from the social media category
    #[arg(short = 'S', long)]
    social: bool,

    /// Restrict the search with the site: operator
    #[arg(short = 'w', long, value_name = "SITE")]
    site: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Search within a time range: day, week, month, year (or d/w/m/y)
    #[arg(short, long, value_name = "TIME_RANGE")]
    time_range: Option<String>,

    /// Allow unsafe results (same as --safe-search none)
    #[arg(long = "unsafe")]
    unsafe_results: bool,

    /// Command used to open URLs in the browser
    #[arg(long, value_name = "UTIL")]
    url_handler: Option<String>,

    /// Command used to copy URLs to the clipboard
    #[arg(long, value_name = "UTIL")]
    copy_command: Option<String>,

    /// Show results from the videos category
    #[arg(short = 'V', long)]
    videos: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
}

/// Effective settings after merging flags, config file, and defaults.
#[derive(Debug)]
struct Settings {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    categories: Vec<Category>,
    engines: Vec<String>,
    language: Option<String>,
    time_range: Option<TimeRange>,
    site: Option<String>,
    safe_search: SafeSearch,
    method: HttpMethod,
    num: usize,
    timeout: Duration,
    verify_ssl: bool,
    send_user_agent: bool,
    expand: bool,
    debug: bool,
    url_handler: String,
    copy_command: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = config::config_file_path();
    let file_config = match &config_path {
        Some(path) => {
            if !path.exists() {
                config::create_default(path)?;
            }
            config::load(path)?
        }
        None => FileConfig::default(),
    };

    let settings = resolve(&cli, &file_config, config_path.as_deref())?;

    let level = if settings.debug {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let client = SearxngClient::new(ClientOptions {
        base_url: settings.base_url.clone(),
        username: settings.username.clone(),
        password: settings.password.clone(),
        timeout: settings.timeout,
        verify_ssl: settings.verify_ssl,
        send_user_agent: settings.send_user_agent,
        ..Default::default()
    })?;

    if cli.list_engines {
        return run_list_engines(&client);
    }

    if cli.query.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let request = build_request(&settings, cli.query.join(" "));
    let mut session = Session::new(client, request, settings.num);
    session.start()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(session.buffer())?);
        return Ok(());
    }

    let opener = UrlOpener::new(settings.url_handler.as_str());

    if cli.first || cli.lucky {
        let buffer = session.buffer();
        match pick_result(buffer, cli.lucky) {
            Some(url) => opener.open(&url),
            None => println!("\nNo results found.\n"),
        }
        return Ok(());
    }

    let renderer = Renderer::new();
    let ctx = SessionContext::new(settings.expand, settings.debug);
    renderer.print_window(session.window(), session.window_start(), &ctx);

    if cli.no_prompt {
        return Ok(());
    }

    let clipboard = Clipboard::new(settings.copy_command.as_str());
    let mut repl = Repl::new(
        session,
        renderer,
        ctx,
        opener,
        clipboard,
        settings.base_url.clone(),
    );
    repl.run()?;
    Ok(())
}

fn pick_result(buffer: &[searxngr::ResultRecord], lucky: bool) -> Option<String> {
    let record = if lucky {
        buffer.choose(&mut rand::thread_rng())?
    } else {
        buffer.first()?
    };
    if record.url.is_empty() {
        return None;
    }
    Some(record.url.clone())
}

fn run_list_engines(client: &SearxngClient) -> Result<()> {
    let listing = engines::fetch_engines(client)?;
    println!("\nEngines on {}:\n", client.base_url());
    for engine in &listing {
        println!(
            "  {:<28} {:<16} {:>5}  {}",
            engine.name,
            engine.bangs.join(" "),
            engine.reliability.as_deref().unwrap_or("-"),
            engine.url.dimmed()
        );
    }
    println!();
    Ok(())
}

fn build_request(settings: &Settings, query: String) -> SearchRequest {
    let mut request = SearchRequest::new(query)
        .with_categories(settings.categories.clone())
        .with_engines(settings.engines.clone())
        .with_safe_search(settings.safe_search)
        .with_method(settings.method);
    if let Some(site) = &settings.site {
        request = request.with_site(site.clone());
    }
    if let Some(language) = &settings.language {
        request = request.with_language(language.clone());
    }
    if let Some(range) = settings.time_range {
        request = request.with_time_range(range);
    }
    request
}

/// Merges command-line flags over config-file values over built-in defaults,
/// validating user input along the way.
fn resolve(cli: &Cli, file: &FileConfig, config_path: Option<&Path>) -> Result<Settings> {
    let base_url = cli
        .searxng_url
        .clone()
        .or_else(|| file.searxng_url.clone())
        .ok_or_else(|| match config_path {
            Some(path) => anyhow::anyhow!("searxng_url is not set in {}", path.display()),
            None => anyhow::anyhow!("searxng_url is not set"),
        })?;

    let shorthands = [cli.news, cli.videos, cli.social];
    if shorthands.iter().filter(|&&flag| flag).count() > 1 {
        anyhow::bail!("only one of --news, --videos, or --social can be used at a time");
    }

    let mut categories: Vec<Category> = if cli.news {
        vec![Category::News]
    } else if cli.videos {
        vec![Category::Videos]
    } else if cli.social {
        vec![Category::SocialMedia]
    } else {
        let tokens = if !cli.categories.is_empty() {
            cli.categories.clone()
        } else {
            file.categories.clone().unwrap_or_default()
        };
        tokens
            .iter()
            .map(|token| token.parse::<Category>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| anyhow::anyhow!(message))?
    };

    let engines: Vec<String> = if !cli.engines.is_empty() {
        cli.engines.clone()
    } else {
        file.engines.clone().unwrap_or_default()
    };

    if !categories.is_empty() && !engines.is_empty() {
        eprintln!(
            "{} categories take precedence over engines; the engine list is ignored",
            "Warning:".yellow().bold()
        );
    }
    if categories.is_empty() && engines.is_empty() {
        categories = vec![Category::General];
    }

    let safe_search = if cli.unsafe_results {
        SafeSearch::Off
    } else {
        cli.safe_search
            .clone()
            .or_else(|| file.safe_search.clone())
            .as_deref()
            .unwrap_or("strict")
            .parse::<SafeSearch>()
            .map_err(|message| anyhow::anyhow!(message))?
    };

    let time_range = match &cli.time_range {
        Some(token) => Some(
            token
                .parse::<TimeRange>()
                .map_err(|message| anyhow::anyhow!(message))?,
        ),
        None => None,
    };

    let method = cli
        .http_method
        .clone()
        .or_else(|| file.http_method.clone())
        .as_deref()
        .unwrap_or("GET")
        .parse::<HttpMethod>()
        .map_err(|message| anyhow::anyhow!(message))?;

    let num = if cli.first {
        1
    } else {
        cli.num.or(file.result_count).unwrap_or(10)
    };

    Ok(Settings {
        base_url,
        username: file.username.clone(),
        password: file.password.clone(),
        categories,
        engines,
        language: cli.language.clone().or_else(|| file.language.clone()),
        time_range,
        site: cli.site.clone(),
        safe_search,
        method,
        num,
        timeout: Duration::from_secs(cli.timeout.or(file.timeout).unwrap_or(30)),
        verify_ssl: !(cli.no_verify_ssl || file.no_verify_ssl.unwrap_or(false)),
        send_user_agent: !(cli.no_user_agent || file.no_user_agent.unwrap_or(false)),
        expand: cli.expand || file.expand.unwrap_or(false),
        debug: cli.debug || file.debug.unwrap_or(false),
        url_handler: cli
            .url_handler
            .clone()
            .or_else(|| file.url_handler.clone())
            .unwrap_or_else(|| ui::default_url_handler().to_string()),
        copy_command: cli
            .copy_command
            .clone()
            .or_else(|| file.copy_command.clone())
            .unwrap_or_else(|| ui::default_copy_command().to_string()),
    })
}
