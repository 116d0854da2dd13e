//! # splitsio
//!
//! Client for the [splits.io](https://splits.io) v4 REST API.
//!
//! The crate fetches speedrun timing data (games, categories, runners, runs
//! with per-segment attempt histories) and derives tabular duration matrices
//! for comparison and visualization.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Typed records for the API entities and the [`models::Resource`]
//!   trait binding each entity to its endpoints
//! - [`transport`]: The remote fetch collaborator ([`transport::Transport`])
//!   and its blocking HTTP implementation
//! - [`client`]: The query façade deciding between one-shot and paginated
//!   collection fetches
//! - [`paginator`]: Lazy, page-cached sequence access over remote collections
//! - [`services`]: Duration derivation from a run's split histories
//!
//! ## Example
//!
//! ```no_run
//! use splitsio::{Client, Run};
//!
//! fn main() -> splitsio::Result<()> {
//!     let client = Client::new()?;
//!     let run = Run::from_id_historic(&client, "1vr")?;
//!     let table = run.segment_durations(true, false)?;
//!     for (attempt, row) in table.attempts().iter().zip(table.rows()) {
//!         println!("#{attempt}: {row:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod paginator;
pub mod services;
pub mod transport;

pub use client::Client;
pub use config::{ClientConfig, API_URL, USER_AGENT};
pub use error::{Error, Result};
pub use models::{Category, CategoryCounts, Game, History, Resource, Run, Runner, Segment};
pub use paginator::{Collection, PageLoader, Paginator};
pub use services::DurationTable;
pub use transport::{FetchResponse, HttpTransport, PageMeta, Transport};
