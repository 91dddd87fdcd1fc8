//! Interactive read-eval loop.
//!
//! Single-threaded and blocking: each backend fetch holds up the prompt until
//! it returns. Transport failures propagate out of `run` and terminate the
//! process at the top-level handler; everything user-recoverable is reported
//! and the loop re-prompts.

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;

use colored::Colorize;

use crate::client::SearchBackend;
use crate::command::{self, Command};
use crate::context::SessionContext;
use crate::render::Renderer;
use crate::session::Session;
use crate::ui::{Clipboard, UrlOpener};
use crate::Result;

const HELP_TEXT: &str = "
- Enter a search query to perform a new search.
- Type a result index (1, 2, 3, ...) to open that result in the browser.
- 'c <index>' copies the result's URL to the clipboard.
- 'n', 'p', 'f' show the next, previous, and first page of results.
- 't <range>' filters by time: day, week, month, year (or d/w/m/y).
- 'site:<domain>' restricts results to one site; 'site:' clears it.
- 'x' toggles full result URLs, 's' shows settings, 'd' toggles debug.
- 'j <index>' dumps the raw result record as JSON.
- 'q', 'quit', or 'exit' leaves the program; '?' shows this message.
";

enum Flow {
    Continue,
    Quit,
}

/// Drives the prompt: parses lines, dispatches to the session, renders.
pub struct Repl<B: SearchBackend> {
    session: Session<B>,
    renderer: Renderer,
    ctx: SessionContext,
    opener: UrlOpener,
    clipboard: Clipboard,
    instance_url: String,
}

impl<B: SearchBackend> Repl<B> {
    /// Wires the loop around an already-started session.
    pub fn new(
        session: Session<B>,
        renderer: Renderer,
        ctx: SessionContext,
        opener: UrlOpener,
        clipboard: Clipboard,
        instance_url: impl Into<String>,
    ) -> Self {
        Self {
            session,
            renderer,
            ctx,
            opener,
            clipboard,
            instance_url: instance_url.into(),
        }
    }

    /// Runs the loop until quit or end of input.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        loop {
            print!("{} {} ", "searxngr".bold(), "(? for help)".dimmed());
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(());
            }

            match command::parse(&line, self.valid_indices()) {
                Err(message) => eprintln!("{} {message}", "Error:".red().bold()),
                Ok(command) => {
                    if let Flow::Quit = self.dispatch(command)? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Renders the current window.
    pub fn render(&self) {
        self.renderer
            .print_window(self.session.window(), self.session.window_start(), &self.ctx);
        if self.ctx.debug {
            eprintln!(
                "{}",
                format!(
                    "[{} buffered, window {}..{}, phase {:?}]",
                    self.session.buffer().len(),
                    self.session.window_start(),
                    self.session.window_start() + self.session.window().len(),
                    self.session.phase()
                )
                .dimmed()
            );
        }
    }

    fn valid_indices(&self) -> RangeInclusive<usize> {
        let start = self.session.window_start() + 1;
        let end = self.session.window_start() + self.session.window().len();
        start..=end
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Nop => {}
            Command::Help => println!("{HELP_TEXT}"),
            Command::Open(index) => self.open_result(index),
            Command::Copy(index) => {
                let record = &self.session.buffer()[index - 1];
                if record.url.is_empty() {
                    eprintln!(
                        "{} no URL found for the selected result",
                        "Error:".red().bold()
                    );
                } else {
                    self.clipboard.copy(&record.url);
                }
            }
            Command::Next => {
                self.session.next()?;
                self.render();
            }
            Command::Previous => {
                self.session.previous();
                self.render();
            }
            Command::First => {
                self.session.first();
                self.render();
            }
            Command::TimeRange(range) => {
                self.session.set_time_range(Some(range))?;
                self.render();
            }
            Command::Site(site) => {
                self.session.set_site(site)?;
                self.render();
            }
            Command::ToggleExpand => {
                self.ctx.expand = !self.ctx.expand;
                self.render();
            }
            Command::ToggleDebug => {
                self.ctx.debug = !self.ctx.debug;
                println!(
                    "debug {}",
                    if self.ctx.debug { "enabled" } else { "disabled" }
                );
            }
            Command::Settings => self.print_settings(),
            Command::Inspect(index) => {
                let record = &self.session.buffer()[index - 1];
                println!("{}", serde_json::to_string_pretty(record)?);
            }
            Command::Query(query) => {
                self.session.submit_query(query)?;
                self.render();
            }
        }
        Ok(Flow::Continue)
    }

    fn open_result(&self, index: usize) {
        let record = &self.session.buffer()[index - 1];
        if record.url.is_empty() {
            eprintln!(
                "{} no URL found for the selected result",
                "Error:".red().bold()
            );
            return;
        }
        self.opener.open(&record.url);
    }

    fn print_settings(&self) {
        let request = self.session.request();
        let none = || "-".to_string();
        println!();
        println!("  searxng_url  {}", self.instance_url);
        println!("  query        {}", request.query);
        println!(
            "  site         {}",
            request.site.clone().unwrap_or_else(none)
        );
        println!(
            "  categories   {}",
            request.categories_param().unwrap_or_else(none)
        );
        println!(
            "  engines      {}",
            if request.engines.is_empty() {
                none()
            } else {
                request.engines.join(",")
            }
        );
        println!(
            "  language     {}",
            request.language.clone().unwrap_or_else(none)
        );
        println!(
            "  time_range   {}",
            request
                .time_range
                .map(|r| r.as_str().to_string())
                .unwrap_or_else(none)
        );
        println!("  safe_search  {}", request.safe_search);
        println!("  http_method  {}", request.method);
        println!("  num          {}", self.session.num());
        println!("  expand       {}", self.ctx.expand);
        println!("  debug        {}", self.ctx.debug);
        println!();
    }
}
