use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Output shape of a fetched table.
///
/// `Wide` puts one row per time period with one value column per series;
/// `Long` puts one row per (series, time period) pair with a single value
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Wide,
    Long,
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wide" => Ok(Shape::Wide),
            "long" => Ok(Shape::Long),
            other => Err(Error::input(format!(
                "shape must be either \"wide\" or \"long\", got {other:?}"
            ))),
        }
    }
}

/// How to fill outer-join gaps in a wide table.
///
/// A wide table has a `None` wherever one series lacks an observation for
/// a period another series covers. Gaps before a series' first observation
/// are always left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapFill {
    /// Interpolate linearly between the surrounding observations of the
    /// same series; trailing gaps stay empty.
    Linear,
    /// Carry the last observation forward, including over trailing gaps.
    Forward,
}

/// Options for [`crate::Client::fetch`].
///
/// `start_year`/`end_year` left as `None` fall back to the client's default
/// years, and from there to the last N years ending at the current year,
/// where N is the account's year limit (10 without a key, 20 with one).
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub shape: Shape,
    /// Keep the footnotes field from the data. Only valid in `Wide` shape
    /// when exactly one series is requested.
    pub keep_footnotes: bool,
    /// Request catalog metadata alongside the data. Honored only when the
    /// client has an API key.
    pub catalog: bool,
    /// Fill outer-join gaps in the assembled table. Only meaningful for
    /// `Wide` shape; long tables carry no missing values by construction.
    pub fill: Option<GapFill>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            start_year: None,
            end_year: None,
            shape: Shape::Wide,
            keep_footnotes: false,
            catalog: true,
            fill: None,
        }
    }
}

/// Top-level response from the BLS v2 timeseries endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "responseTime", default)]
    pub response_time: Option<u64>,
    /// Advisory strings from the API; also carries in-band rejections
    /// (bad key, exhausted quota).
    #[serde(default)]
    pub message: Vec<String>,
    #[serde(rename = "Results", default)]
    pub results: ResultSet,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub series: Vec<SeriesData>,
}

/// One series block within a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesData {
    #[serde(rename = "seriesID")]
    pub series_id: String,
    /// Present only when the request carried a key and asked for it.
    #[serde(default)]
    pub catalog: Option<Catalog>,
    #[serde(default)]
    pub data: Vec<Observation>,
}

/// One raw observation. `year` and `value` arrive as strings and are
/// coerced to numbers during table building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub year: String,
    pub period: String,
    #[serde(rename = "periodName")]
    pub period_name: String,
    pub value: String,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
    /// Upstream "this is the most recent observation" flag. Never exposed
    /// in built tables.
    #[serde(default)]
    pub latest: Option<String>,
}

impl Observation {
    pub fn year_num(&self) -> Result<i32, Error> {
        self.year.trim().parse().map_err(|_| Error::Numeric {
            field: "year",
            raw: self.year.clone(),
        })
    }

    pub fn value_num(&self) -> Result<f64, Error> {
        self.value.trim().parse().map_err(|_| Error::Numeric {
            field: "value",
            raw: self.value.clone(),
        })
    }
}

/// A footnote attached to an observation. The API emits `{}` for absent
/// footnotes, so both fields are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Descriptive metadata for a series, available to keyed accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub series_title: Option<String>,
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub seasonality: Option<String>,
    #[serde(default)]
    pub survey_name: Option<String>,
    #[serde(default)]
    pub survey_abbreviation: Option<String>,
    #[serde(default)]
    pub measure_data_type: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
}

/// Request body for the v2 timeseries endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct SeriesRequest<'a> {
    pub seriesid: &'a [String],
    pub startyear: String,
    pub endyear: String,
    #[serde(rename = "registrationKey", skip_serializing_if = "Option::is_none")]
    pub registration_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<bool>,
}
