//! Synchronous client for the **BLS public data API (v2)**.
//!
//! This module drives the `timeseries/data` endpoint: it splits the
//! requested year range into API-sized chunks, POSTs one JSON request per
//! chunk, and hands each response to [`TableBuilder`] for reshaping into a
//! single [`Table`].
//!
//! ### Notes
//! - Without a registration key the API caps one request at 10 years of
//!   data (20 with a key); larger ranges are pulled in chunks and merged.
//! - Advisory messages from the API are logged through the `log` facade at
//!   the client's configured level and returned on the [`FetchResult`].
//! - Network timeouts use a sane default (30s) and can be adjusted by
//!   editing the client builder.
//!
//! Typical usage:
//! ```no_run
//! # use bls_rs::{Client, FetchOptions, Shape};
//! let client = Client::default();
//! let result = client.fetch(
//!     "LNS14000000",
//!     &FetchOptions {
//!         start_year: Some(2015),
//!         end_year: Some(2020),
//!         shape: Shape::Long,
//!         ..Default::default()
//!     },
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use chrono::Datelike;
use log::Level;
use reqwest::blocking::Client as HttpClient;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::{ApiResponse, Catalog, FetchOptions, SeriesRequest, Shape};
use crate::search::SearchResult;
use crate::table::{Table, TableBuilder};

/// The one fixed endpoint this crate talks to.
pub const BLS_BASE_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";

// The API reports credential problems in-band, as message strings.
const KEY_REJECTED: &str = "Please provide a proper key";
const QUOTA_EXHAUSTED: &str = "Request could not be serviced, as the daily";

/// Client for the BLS timeseries endpoint.
///
/// Holds the API key (optional) and the level at which upstream messages
/// are logged. Key presence determines the year limit used both for
/// chunking and for the default range when no years are given.
#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    pub key: Option<String>,
    /// Level at which upstream advisory messages (and the inverted-range
    /// warning) are logged.
    pub message_level: Level,
    /// Fallback start year used when a fetch does not specify one.
    pub default_start_year: Option<i32>,
    /// Fallback end year used when a fetch does not specify one.
    pub default_end_year: Option<i32>,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Client {
    pub fn new(key: Option<String>) -> Self {
        Self::with_message_level(key, Level::Warn)
    }

    pub fn with_message_level(key: Option<String>, message_level: Level) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .user_agent(concat!("bls_rs/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            base_url: BLS_BASE_URL.into(),
            key,
            message_level,
            default_start_year: None,
            default_end_year: None,
            http,
        }
    }

    /// Maximum years of data per request: 10 keyless, 20 with a key.
    pub fn year_limit(&self) -> i32 {
        if self.key.is_some() { 20 } else { 10 }
    }

    /// Fetch one or more series over a year range and reshape the result.
    ///
    /// - `series`: a single ID, a slice/vec of IDs, or the values of a
    ///   [`SearchResult`] mapping.
    /// - `options.start_year`/`end_year` left unset fall back to the
    ///   client's defaults, and from there to the last N years ending at
    ///   the current year (N = [`Client::year_limit`]). An inverted range
    ///   is swapped with a logged warning, not an error.
    ///
    /// Ranges wider than the year limit are pulled in chunks, newest
    /// first, and merged into one table in chronological order.
    ///
    /// ### Errors
    /// - [`Error::Input`] before any request: empty series list, or
    ///   `keep_footnotes` with `Shape::Wide` and more than one series.
    /// - [`Error::Input`] on the first chunk whose response reports a bad
    ///   key or an exhausted daily quota; remaining chunks are skipped.
    /// - Transport and decode failures pass through untouched.
    pub fn fetch(&self, series: impl IntoSeriesIds, options: &FetchOptions) -> Result<FetchResult> {
        let series = series.into_series_ids();
        if series.is_empty() {
            return Err(Error::input("at least one series ID required"));
        }
        if options.keep_footnotes && options.shape == Shape::Wide && series.len() > 1 {
            return Err(Error::input(
                "cannot keep footnotes with more than 1 series in wide shape; \
                 use Shape::Long or drop keep_footnotes",
            ));
        }

        let (start_year, end_year) = self.resolve_years(options.start_year, options.end_year);
        let want_catalog = options.catalog && self.key.is_some();

        let mut builder = TableBuilder::new(options.shape, options.keep_footnotes);
        let mut messages = Vec::new();
        let mut catalog: BTreeMap<String, Catalog> = BTreeMap::new();

        for (chunk_start, chunk_end) in year_chunks(start_year, end_year, self.year_limit()) {
            let resp = self.request_chunk(&series, chunk_start, chunk_end, want_catalog)?;
            messages.extend(resp.message.iter().cloned());
            if want_catalog {
                // Catalog metadata is range-invariant; first sighting wins.
                for series_data in &resp.results.series {
                    if let Some(cat) = &series_data.catalog {
                        catalog
                            .entry(series_data.series_id.clone())
                            .or_insert_with(|| cat.clone());
                    }
                }
            }
            builder.push_response(&resp)?;
        }

        let mut table = builder.finish();
        if let Some(method) = options.fill
            && let Table::Wide(wide) = &mut table
        {
            wide.fill_gaps(method);
        }

        Ok(FetchResult {
            table,
            messages,
            catalog: want_catalog.then_some(catalog),
        })
    }

    /// One POST to the timeseries endpoint. Fails fast on the in-band
    /// credential/quota rejections so a doomed key does not burn through
    /// the remaining chunks; everything else in the message list is
    /// logged and passed along.
    fn request_chunk(
        &self,
        series: &[String],
        start_year: i32,
        end_year: i32,
        catalog: bool,
    ) -> Result<ApiResponse> {
        let body = SeriesRequest {
            seriesid: series,
            startyear: start_year.to_string(),
            endyear: end_year.to_string(),
            registration_key: self.key.as_deref(),
            catalog: catalog.then_some(true),
        };
        let resp: ApiResponse = self
            .http
            .post(&self.base_url)
            .json(&body)
            .send()?
            .json()?;

        check_rejection(&resp.message)?;
        for msg in &resp.message {
            log::log!(self.message_level, "{msg}");
        }
        Ok(resp)
    }

    /// Resolve the effective year range: explicit args, then client
    /// defaults, then the last N years ending now. An inverted range is
    /// swapped with a warning.
    fn resolve_years(&self, start_year: Option<i32>, end_year: Option<i32>) -> (i32, i32) {
        let limit = self.year_limit();
        let start_year = start_year.or(self.default_start_year);
        let mut end_year = end_year.or(self.default_end_year);
        if start_year.is_none() && end_year.is_none() {
            end_year = Some(chrono::Local::now().year());
        }
        let (mut start, mut end) = match (start_year, end_year) {
            (Some(s), Some(e)) => (s, e),
            (None, Some(e)) => (e - (limit - 1), e),
            (Some(s), None) => (s, s + limit - 1),
            (None, None) => unreachable!("end_year was just defaulted"),
        };
        if start > end {
            log::log!(
                self.message_level,
                "start_year {start} is after end_year {end}; values were swapped to continue"
            );
            std::mem::swap(&mut start, &mut end);
        }
        (start, end)
    }
}

/// The API reports a bad registration key or an exhausted daily quota as
/// message strings on an otherwise well-formed response; anything else in
/// the message list is advisory.
fn check_rejection(messages: &[String]) -> Result<()> {
    for msg in messages {
        if msg.contains(KEY_REJECTED) || msg.contains(QUOTA_EXHAUSTED) {
            return Err(Error::input(msg.clone()));
        }
    }
    Ok(())
}

/// Partition an inclusive year range into sub-ranges of at most `limit`
/// years, newest first, so only the oldest chunk may be short.
pub fn year_chunks(start_year: i32, end_year: i32, limit: i32) -> Vec<(i32, i32)> {
    let total = end_year - start_year + 1;
    let n = (total + limit - 1) / limit;
    (0..n)
        .map(|i| {
            (
                (end_year - (i + 1) * limit + 1).max(start_year),
                end_year - i * limit,
            )
        })
        .collect()
}

/// The outcome of one [`Client::fetch`] call. Messages and catalog are
/// scoped to the call; nothing accumulates on the client.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub table: Table,
    /// Upstream advisory strings, in chunk-request order.
    pub messages: Vec<String>,
    catalog: Option<BTreeMap<String, Catalog>>,
}

impl FetchResult {
    /// Catalog metadata keyed by series ID.
    ///
    /// Fails with [`Error::CatalogUnavailable`] when the fetch ran without
    /// an API key (or with catalog retrieval turned off).
    pub fn catalog(&self) -> Result<&BTreeMap<String, Catalog>> {
        self.catalog.as_ref().ok_or(Error::CatalogUnavailable)
    }
}

/// Conversion of the accepted series inputs into a plain ID list: a single
/// ID, an ordered list of IDs, or a mapping whose values are IDs (the keys
/// are discarded).
pub trait IntoSeriesIds {
    fn into_series_ids(self) -> Vec<String>;
}

impl IntoSeriesIds for &str {
    fn into_series_ids(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoSeriesIds for String {
    fn into_series_ids(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoSeriesIds for &[String] {
    fn into_series_ids(self) -> Vec<String> {
        self.to_vec()
    }
}

impl IntoSeriesIds for Vec<String> {
    fn into_series_ids(self) -> Vec<String> {
        self
    }
}

impl IntoSeriesIds for &[&str] {
    fn into_series_ids(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoSeriesIds for Vec<&str> {
    fn into_series_ids(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl<const N: usize> IntoSeriesIds for [&str; N] {
    fn into_series_ids(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoSeriesIds for &SearchResult {
    fn into_series_ids(self) -> Vec<String> {
        self.ids()
    }
}

impl IntoSeriesIds for SearchResult {
    fn into_series_ids(self) -> Vec<String> {
        self.ids()
    }
}

impl<K> IntoSeriesIds for &BTreeMap<K, String> {
    fn into_series_ids(self) -> Vec<String> {
        self.values().cloned().collect()
    }
}

impl<K> IntoSeriesIds for &HashMap<K, String> {
    fn into_series_ids(self) -> Vec<String> {
        self.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{LevelFilter, Metadata, Record};
    use std::sync::Mutex;

    fn keyed() -> Client {
        Client::new(Some("not-a-real-key".into()))
    }

    static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            CAPTURED
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        static LOGGER: CaptureLogger = CaptureLogger;
        // set_logger fails after the first call; that's fine, the capture
        // sink is shared.
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    }

    #[test]
    fn chunks_fit_within_limit() {
        assert_eq!(year_chunks(2000, 2010, 20), vec![(2000, 2010)]);
        assert_eq!(year_chunks(1950, 1980, 20), vec![(1961, 1980), (1950, 1960)]);
        assert_eq!(
            year_chunks(1950, 1980, 10),
            vec![(1971, 1980), (1961, 1970), (1951, 1960), (1950, 1950)]
        );
    }

    #[test]
    fn chunks_reconstruct_the_range_exactly() {
        for (start, end) in [(1990, 1990), (1948, 2020), (2001, 2020)] {
            for limit in [10, 20] {
                let chunks = year_chunks(start, end, limit);
                // newest first, no gaps, no overlaps, oldest may be short
                assert_eq!(chunks[0].1, end);
                assert_eq!(chunks.last().unwrap().0, start);
                for pair in chunks.windows(2) {
                    assert_eq!(pair[1].1 + 1, pair[0].0);
                }
                assert!(chunks.iter().all(|(s, e)| e - s + 1 <= limit));
            }
        }
    }

    #[test]
    fn year_fallback_with_key() {
        let c = keyed();
        let now = chrono::Local::now().year();
        assert_eq!(c.resolve_years(None, None), (now - 19, now));
        assert_eq!(c.resolve_years(None, Some(2003)), (1984, 2003));
        assert_eq!(c.resolve_years(Some(1986), None), (1986, 2005));
    }

    #[test]
    fn year_fallback_without_key() {
        let c = Client::default();
        let now = chrono::Local::now().year();
        assert_eq!(c.resolve_years(None, None), (now - 9, now));
        assert_eq!(c.resolve_years(None, Some(2003)), (1994, 2003));
        assert_eq!(c.resolve_years(Some(1986), None), (1986, 1995));
    }

    #[test]
    fn inverted_range_is_swapped_with_a_warning() {
        capture_logs();
        let c = keyed();
        assert_eq!(c.resolve_years(Some(1980), Some(1950)), (1950, 1980));

        let warnings: Vec<(Level, String)> = CAPTURED
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, msg)| msg.contains("swapped"))
            .cloned()
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].0, Level::Warn);
        assert!(warnings[0].1.contains("1980"));
    }

    #[test]
    fn rejection_messages_abort_the_fetch() {
        let key_msg = vec![
            "REQUEST_NOT_PROCESSED - Please provide a proper key for your request.".to_string(),
        ];
        assert!(matches!(
            check_rejection(&key_msg),
            Err(Error::Input(msg)) if msg.contains("proper key")
        ));

        let quota_msg = vec![
            "Request could not be serviced, as the daily threshold for total number of \
             requests allocated to the user has been reached."
                .to_string(),
        ];
        assert!(matches!(check_rejection(&quota_msg), Err(Error::Input(_))));
    }

    #[test]
    fn advisory_messages_pass_through() {
        let advisory = vec![
            "No Data Available for Series LNS14000000 Year: 1947".to_string(),
            "Series does not exist for Series CUUR0999SA0".to_string(),
        ];
        assert!(check_rejection(&advisory).is_ok());
        assert!(check_rejection(&[]).is_ok());
    }

    #[test]
    fn client_defaults_feed_the_fallback() {
        let mut c = keyed();
        c.default_start_year = Some(1990);
        c.default_end_year = Some(1999);
        assert_eq!(c.resolve_years(None, None), (1990, 1999));
        assert_eq!(c.resolve_years(None, Some(2003)), (1990, 2003));
    }

    #[test]
    fn series_inputs_normalize() {
        assert_eq!("X".into_series_ids(), vec!["X"]);
        assert_eq!(["X", "Y"].into_series_ids(), vec!["X", "Y"]);
        let mut map = BTreeMap::new();
        map.insert("a", "X".to_string());
        map.insert("b", "Y".to_string());
        assert_eq!((&map).into_series_ids(), vec!["X", "Y"]);
    }
}
