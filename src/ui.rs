//! URL-opener and clipboard collaborators.
//!
//! Both are external programs; failures are reported as warnings and never
//! end the session.

use std::io::Write;
use std::process::{Command, Stdio};

use colored::Colorize;

/// Platform default for opening URLs in the browser.
pub fn default_url_handler() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Platform default for writing to the clipboard.
pub fn default_copy_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "pbcopy"
    } else if cfg!(target_os = "windows") {
        "clip"
    } else {
        "xclip -selection clipboard"
    }
}

/// Opens URLs through a configurable external command.
pub struct UrlOpener {
    command: String,
}

impl UrlOpener {
    /// Creates an opener around a command line; the URL is appended as the
    /// final argument.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Opens the URL, reporting failure as a warning.
    pub fn open(&self, url: &str) {
        let mut parts = self.command.split_whitespace();
        let Some(program) = parts.next() else {
            warn(&format!("no URL handler configured, cannot open {url}"));
            return;
        };
        match Command::new(program)
            .args(parts)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => {}
            Ok(status) => warn(&format!("'{}' exited with {status}", self.command)),
            Err(err) => warn(&format!("could not run '{}': {err}", self.command)),
        }
    }
}

/// Writes URLs to the clipboard through a configurable external command.
pub struct Clipboard {
    command: String,
}

impl Clipboard {
    /// Creates a clipboard writer around a command line; the text is piped
    /// to the command's stdin.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Copies the text, best-effort.
    pub fn copy(&self, text: &str) {
        let mut parts = self.command.split_whitespace();
        let Some(program) = parts.next() else {
            warn("no copy command configured");
            return;
        };
        let child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(err) => {
                warn(&format!("could not run '{}': {err}", self.command));
                return;
            }
        };
        if let Some(stdin) = child.stdin.as_mut() {
            if let Err(err) = stdin.write_all(text.as_bytes()) {
                warn(&format!("could not write to '{}': {err}", self.command));
            }
        }
        match child.wait() {
            Ok(status) if status.success() => {}
            Ok(status) => warn(&format!("'{}' exited with {status}", self.command)),
            Err(err) => warn(&format!("'{}' failed: {err}", self.command)),
        }
    }
}

fn warn(message: &str) {
    eprintln!("{} {message}", "Warning:".yellow().bold());
}
