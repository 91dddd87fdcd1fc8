//! # searxngr
//!
//! An interactive terminal client for SearXNG metasearch instances.
//!
//! The library half of the crate covers:
//!
//! - A blocking HTTP client for the SearXNG JSON API
//! - Typed result records for the category-dependent response shapes
//! - A pagination session that buffers upstream pages until the requested
//!   display window is covered
//! - Terminal rendering with per-category metadata trailers
//! - The interactive prompt grammar
//!
//! ## Example
//!
//! ```rust,no_run
//! use searxngr::{ClientOptions, SearchRequest, SearxngClient, Session};
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = SearxngClient::new(ClientOptions {
//!         base_url: "https://searx.example.com".to_string(),
//!         ..Default::default()
//!     })?;
//!
//!     let request = SearchRequest::new("rust programming");
//!     let mut session = Session::new(client, request, 10);
//!     session.start()?;
//!
//!     for record in session.window() {
//!         println!("{}: {}", record.title, record.url);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod command;
mod context;
mod error;
mod query;
mod render;
mod repl;
mod result;
mod session;

pub mod config;
pub mod engines;
pub mod ui;

pub use client::{ClientOptions, SearchBackend, SearxngClient};
pub use command::Command;
pub use context::SessionContext;
pub use error::{Result, SearxngrError};
pub use query::{Category, HttpMethod, SafeSearch, SearchRequest, TimeRange};
pub use render::Renderer;
pub use repl::Repl;
pub use result::{Address, MediaLength, ResultRecord, Scalar, SearchResponse, Template};
pub use session::{Session, SessionPhase};
