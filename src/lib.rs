//! bls-rs
//!
//! A lightweight Rust library for retrieving U.S. Bureau of Labor
//! Statistics time-series data and reshaping it into tidy tables.
//!
//! ### Features
//! - Fetch one or more series over any year range; ranges wider than the
//!   API's per-request cap are pulled in chunks and merged
//! - "Wide" (one column per series) or "long" (one row per series and
//!   period) output with consistent sorting, with optional gap filling
//!   (linear or forward) across the wide outer join
//! - Look up series IDs from readable descriptors ("unemployment rate for
//!   California, not seasonally adjusted") with list parameters expanded
//!   into every combination
//! - Per-call upstream messages and, for keyed accounts, series catalog
//!   metadata
//!
//! ### Example
//! ```no_run
//! use bls_rs::{Client, FetchOptions, ReturnType, SeriesQuery, Shape, search};
//!
//! // Resolve IDs for the unemployment rate, adjusted and unadjusted.
//! let ids = search(&SeriesQuery::new("ur").sa(vec![true, false]), ReturnType::List)?;
//!
//! let client = Client::default();
//! let result = client.fetch(
//!     &ids,
//!     &FetchOptions {
//!         start_year: Some(2010),
//!         end_year: Some(2020),
//!         shape: Shape::Wide,
//!         ..Default::default()
//!     },
//! )?;
//! println!("{} rows, messages: {:?}", result.table.len(), result.messages);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
mod codes;
pub mod error;
pub mod models;
pub mod search;
pub mod table;

pub use api::{BLS_BASE_URL, Client, FetchResult, IntoSeriesIds, year_chunks};
pub use error::{Error, Result};
pub use models::{ApiResponse, Catalog, FetchOptions, Footnote, GapFill, Observation, Shape};
pub use search::{Param, ParamValue, QueryKey, ReturnType, SearchResult, SeriesQuery, search};
pub use table::{LongRow, LongTable, Table, WideRow, WideTable};
