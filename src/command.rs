//! Prompt command grammar.
//!
//! One line of input parses to exactly one [`Command`]; anything that is not
//! a recognized command token becomes a fresh free-text query.

use std::ops::RangeInclusive;

use crate::query::TimeRange;

/// One parsed line of prompt input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the program.
    Quit,
    /// Print the help text.
    Help,
    /// Open the result at this 1-based buffer index in the browser.
    Open(usize),
    /// Copy the URL of the result at this index.
    Copy(usize),
    /// Advance the display window.
    Next,
    /// Retreat the display window.
    Previous,
    /// Rewind the display window to the first results.
    First,
    /// Change the time-range filter.
    TimeRange(TimeRange),
    /// Set the site filter, or clear it when `None`.
    Site(Option<String>),
    /// Toggle full-URL display and re-render.
    ToggleExpand,
    /// Dump the current effective settings.
    Settings,
    /// Toggle the debug flag.
    ToggleDebug,
    /// Pretty-print the raw record at this index.
    Inspect(usize),
    /// Run a new free-text query.
    Query(String),
    /// Empty input; re-prompt.
    Nop,
}

/// Parses one line against the prompt grammar.
///
/// `valid_indices` is the range of result numbers currently on display. A
/// bare integer inside it selects a result; outside it the line is treated
/// as a new query (numbers are perfectly good search terms). Malformed
/// arguments to `c`, `j`, and `t` are user errors, not queries.
pub fn parse(line: &str, valid_indices: RangeInclusive<usize>) -> Result<Command, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::Nop);
    }

    match trimmed.to_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "?" => return Ok(Command::Help),
        "n" => return Ok(Command::Next),
        "p" => return Ok(Command::Previous),
        "f" => return Ok(Command::First),
        "x" => return Ok(Command::ToggleExpand),
        "s" => return Ok(Command::Settings),
        "d" => return Ok(Command::ToggleDebug),
        _ => {}
    }

    if let Ok(index) = trimmed.parse::<usize>() {
        if valid_indices.contains(&index) {
            return Ok(Command::Open(index));
        }
        return Ok(Command::Query(trimmed.to_string()));
    }

    if let Some(arg) = trimmed.strip_prefix("c ") {
        return parse_index(arg, &valid_indices).map(Command::Copy);
    }
    if let Some(arg) = trimmed.strip_prefix("j ") {
        return parse_index(arg, &valid_indices).map(Command::Inspect);
    }
    if let Some(arg) = trimmed.strip_prefix("t ") {
        return arg.trim().parse::<TimeRange>().map(Command::TimeRange);
    }
    if let Some(value) = trimmed.strip_prefix("site:") {
        let value = value.trim();
        return Ok(Command::Site(if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }));
    }

    Ok(Command::Query(trimmed.to_string()))
}

fn parse_index(arg: &str, valid_indices: &RangeInclusive<usize>) -> Result<usize, String> {
    let arg = arg.trim();
    let index: usize = arg
        .parse()
        .map_err(|_| format!("invalid index '{arg}'"))?;
    if !valid_indices.contains(&index) {
        return Err(format!(
            "index {index} is out of range ({}-{})",
            valid_indices.start(),
            valid_indices.end()
        ));
    }
    Ok(index)
}
