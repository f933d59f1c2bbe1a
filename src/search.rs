//! Resolver from human-readable descriptors ("unemployment rate for
//! California, seasonally adjusted") to BLS series IDs.
//!
//! A [`SeriesQuery`] may carry lists for any parameter; [`search`] expands
//! every list into the full cross-product of concrete queries, resolves
//! each one against the templates in [`crate::codes`], and shapes the
//! result per [`ReturnType`].

use std::collections::BTreeMap;

use crate::codes::{self, Geo};
use crate::error::{Error, Result};

/// A query parameter that is either one value or a list of values to be
/// expanded into every combination.
#[derive(Debug, Clone, PartialEq)]
pub enum Param<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Param<T> {
    fn values(&self) -> &[T] {
        match self {
            Param::One(v) => std::slice::from_ref(v),
            Param::Many(vs) => vs,
        }
    }
}

impl From<&str> for Param<String> {
    fn from(v: &str) -> Self {
        Param::One(v.to_string())
    }
}

impl From<String> for Param<String> {
    fn from(v: String) -> Self {
        Param::One(v)
    }
}

impl From<Vec<&str>> for Param<String> {
    fn from(vs: Vec<&str>) -> Self {
        Param::Many(vs.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Param<String> {
    fn from(vs: Vec<String>) -> Self {
        Param::Many(vs)
    }
}

impl From<bool> for Param<bool> {
    fn from(v: bool) -> Self {
        Param::One(v)
    }
}

impl From<Vec<bool>> for Param<bool> {
    fn from(vs: Vec<bool>) -> Self {
        Param::Many(vs)
    }
}

/// A parameterized series lookup. Only `data` is required; the other
/// parameters narrow or multiply the resolved series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesQuery {
    data: Param<String>,
    state: Option<Param<String>>,
    msa: Option<Param<String>>,
    region: Option<Param<String>>,
    sa: Option<Param<bool>>,
    sizeclass: Option<Param<String>>,
}

impl SeriesQuery {
    pub fn new(data: impl Into<Param<String>>) -> Self {
        Self {
            data: data.into(),
            state: None,
            msa: None,
            region: None,
            sa: None,
            sizeclass: None,
        }
    }

    /// State name or postal abbreviation.
    pub fn state(mut self, state: impl Into<Param<String>>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Metropolitan statistical area. Carried through expansion and result
    /// keys; no MSA-level series templates are mapped yet.
    pub fn msa(mut self, msa: impl Into<Param<String>>) -> Self {
        self.msa = Some(msa.into());
        self
    }

    /// Census region, for CPI data ("northeast", "midwest", "south", "west").
    pub fn region(mut self, region: impl Into<Param<String>>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Seasonal adjustment. Unspecified acts as adjusted where an adjusted
    /// series exists.
    pub fn sa(mut self, sa: impl Into<Param<bool>>) -> Self {
        self.sa = Some(sa.into());
        self
    }

    /// CPI city size class ("a", "b/c", "d").
    pub fn sizeclass(mut self, sizeclass: impl Into<Param<String>>) -> Self {
        self.sizeclass = Some(sizeclass.into());
        self
    }
}

/// How [`search`] keys its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnType {
    /// Map keyed only by the parameters that actually varied across the
    /// expansion. Falls back to `Full` when nothing varied.
    #[default]
    Short,
    /// Map keyed by every provided parameter, constant or not.
    Full,
    /// Just the series IDs, in expansion order.
    List,
}

/// One (parameter name, value) component of a result key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamValue {
    Bool(bool),
    Text(String),
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Result key: (name, value) pairs sorted by parameter name.
pub type QueryKey = Vec<(String, ParamValue)>;

/// Output of [`search`], shaped per [`ReturnType`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    /// `ReturnType::List`: IDs in expansion order.
    Ids(Vec<String>),
    /// `ReturnType::Short` / `ReturnType::Full`: keyed mapping.
    Keyed(BTreeMap<QueryKey, String>),
}

impl SearchResult {
    /// The resolved series IDs. For keyed results the order follows the
    /// key ordering of the map.
    pub fn ids(&self) -> Vec<String> {
        match self {
            SearchResult::Ids(ids) => ids.clone(),
            SearchResult::Keyed(map) => map.values().cloned().collect(),
        }
    }

    /// Number of resolved series.
    pub fn len(&self) -> usize {
        match self {
            SearchResult::Ids(ids) => ids.len(),
            SearchResult::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fully concrete parameter set, post-expansion.
#[derive(Debug, Clone, PartialEq)]
struct ConcreteQuery {
    data: String,
    state: Option<String>,
    msa: Option<String>,
    region: Option<String>,
    sa: Option<bool>,
    sizeclass: Option<String>,
}

/// Resolve a query into series IDs.
///
/// ```
/// use bls_rs::{search, ReturnType, SearchResult, SeriesQuery};
///
/// let query = SeriesQuery::new("cpi-food-energy").sa(vec![true, false]);
/// let result = search(&query, ReturnType::List)?;
/// assert_eq!(
///     result,
///     SearchResult::Ids(vec!["CUSR0000SA0L1E".into(), "CUUR0000SA0L1E".into()])
/// );
/// # Ok::<(), bls_rs::Error>(())
/// ```
pub fn search(query: &SeriesQuery, return_type: ReturnType) -> Result<SearchResult> {
    let expanded = expand(query);
    if expanded.is_empty() {
        return Err(Error::input(
            "query expanded to no concrete parameter sets (empty list parameter)",
        ));
    }

    if return_type == ReturnType::List {
        let ids = expanded
            .iter()
            .map(resolve_one)
            .collect::<Result<Vec<_>>>()?;
        return Ok(SearchResult::Ids(ids));
    }

    let varying = varying_params(&expanded);
    let keep_all = return_type == ReturnType::Full || varying.is_empty();

    let mut map = BTreeMap::new();
    for concrete in &expanded {
        let key = if keep_all {
            key_of(concrete, None)
        } else {
            key_of(concrete, Some(&varying))
        };
        map.insert(key, resolve_one(concrete)?);
    }
    Ok(SearchResult::Keyed(map))
}

/// Cross-product expansion. Fields are walked in declaration order so the
/// expansion is deterministic and `data` varies slowest.
fn expand(query: &SeriesQuery) -> Vec<ConcreteQuery> {
    fn opt_values<T: Clone>(p: &Option<Param<T>>) -> Vec<Option<T>> {
        match p {
            None => vec![None],
            Some(p) => p.values().iter().cloned().map(Some).collect(),
        }
    }

    let mut out = Vec::new();
    for data in query.data.values() {
        for state in opt_values(&query.state) {
            for msa in opt_values(&query.msa) {
                for region in opt_values(&query.region) {
                    for sa in opt_values(&query.sa) {
                        for sizeclass in opt_values(&query.sizeclass) {
                            out.push(ConcreteQuery {
                                data: data.clone(),
                                state: state.clone(),
                                msa: msa.clone(),
                                region: region.clone(),
                                sa,
                                sizeclass: sizeclass.clone(),
                            });
                        }
                    }
                }
            }
        }
    }
    out
}

/// Names of parameters whose value differs somewhere across the expansion.
/// A list of identical values counts as constant.
fn varying_params(expanded: &[ConcreteQuery]) -> Vec<&'static str> {
    let first = &expanded[0];
    let mut varying = Vec::new();
    if expanded.iter().any(|q| q.data != first.data) {
        varying.push("data");
    }
    if expanded.iter().any(|q| q.msa != first.msa) {
        varying.push("msa");
    }
    if expanded.iter().any(|q| q.region != first.region) {
        varying.push("region");
    }
    if expanded.iter().any(|q| q.sa != first.sa) {
        varying.push("sa");
    }
    if expanded.iter().any(|q| q.sizeclass != first.sizeclass) {
        varying.push("sizeclass");
    }
    if expanded.iter().any(|q| q.state != first.state) {
        varying.push("state");
    }
    varying
}

/// Build a result key from the provided parameters, optionally restricted
/// to a set of names. Components come out sorted by parameter name.
fn key_of(q: &ConcreteQuery, only: Option<&[&'static str]>) -> QueryKey {
    let wanted = |name: &'static str| only.is_none_or(|names| names.contains(&name));
    let mut key = QueryKey::new();
    if wanted("data") {
        key.push(("data".into(), ParamValue::Text(q.data.clone())));
    }
    if let Some(msa) = &q.msa
        && wanted("msa")
    {
        key.push(("msa".into(), ParamValue::Text(msa.clone())));
    }
    if let Some(region) = &q.region
        && wanted("region")
    {
        key.push(("region".into(), ParamValue::Text(region.clone())));
    }
    if let Some(sa) = q.sa
        && wanted("sa")
    {
        key.push(("sa".into(), ParamValue::Bool(sa)));
    }
    if let Some(sizeclass) = &q.sizeclass
        && wanted("sizeclass")
    {
        key.push(("sizeclass".into(), ParamValue::Text(sizeclass.clone())));
    }
    if let Some(state) = &q.state
        && wanted("state")
    {
        key.push(("state".into(), ParamValue::Text(state.clone())));
    }
    key
}

/// Resolve one concrete parameter set to a series ID.
fn resolve_one(q: &ConcreteQuery) -> Result<String> {
    let category = codes::canonical_category(&q.data)
        .ok_or_else(|| Error::input(format!("unrecognized data category {:?}", q.data)))?;
    let is_cpi = category == "cpi";

    let fips = match &q.state {
        None => "00",
        Some(state) => state_to_fips(state)?,
    };
    let geo = if fips != "00" { Geo::State } else { Geo::Us };

    // Regional and size-class CPI series only exist unadjusted.
    let mut sa = q.sa;
    if is_cpi && q.region.is_some() && sa == Some(true) {
        return Err(Error::input(
            "seasonally adjusted data does not exist for regional CPI data",
        ));
    }
    if is_cpi && q.sizeclass.is_some() && sa == Some(true) {
        return Err(Error::input(
            "seasonally adjusted data does not exist for size-class CPI data",
        ));
    }
    if is_cpi && (q.region.is_some() || q.sizeclass.is_some()) {
        sa = Some(false);
    }

    let adjusted = sa.unwrap_or(true);
    let seas = match (geo, is_cpi) {
        (Geo::State, _) | (_, true) => {
            if adjusted {
                "S"
            } else {
                "U"
            }
        }
        (Geo::Us, false) => {
            if adjusted {
                "S1"
            } else {
                "U0"
            }
        }
    };

    let less = if is_cpi {
        cpi_less(&q.data)?
    } else {
        String::new()
    };
    let region = codes::cpi_region(q.region.as_deref())
        .ok_or_else(|| Error::input(format!("unrecognized region {:?}", q.region)))?;
    let sizeclass = codes::size_class(q.sizeclass.as_deref())
        .ok_or_else(|| Error::input(format!("unrecognized size class {:?}", q.sizeclass)))?;

    let template = codes::template(category, geo).ok_or_else(|| {
        Error::input(format!(
            "no {category:?} series is defined for that geography"
        ))
    })?;
    Ok(render(template, seas, fips, region, sizeclass, &less))
}

fn render(
    template: &str,
    seas: &str,
    fips: &str,
    region: &str,
    sizeclass: &str,
    less: &str,
) -> String {
    template
        .replace("{seas}", seas)
        .replace("{fips}", fips)
        .replace("{region}", region)
        .replace("{sizeclass}", sizeclass)
        .replace("{less}", less)
}

/// Item-exclusion suffix for a CPI descriptor like `cpi-food-energy`:
/// map each hyphen token through the exclusion table, sort, concatenate.
fn cpi_less(data: &str) -> Result<String> {
    let mut excluded: Vec<&str> = Vec::new();
    for token in data.split('-') {
        let code = codes::cpi_exclusion(token)
            .ok_or_else(|| Error::input(format!("unrecognized CPI component {token:?}")))?;
        if !code.is_empty() {
            excluded.push(code);
        }
    }
    if excluded.is_empty() {
        return Ok(String::new());
    }
    excluded.sort_unstable();
    // "Less medical care" only exists on its own, and "less shelter and
    // energy" does not exist at all.
    if (excluded.contains(&"5") && excluded.len() > 1) || excluded == ["2", "E"] {
        return Err(Error::input(format!(
            "no CPI series exists for the exclusion combination in {data:?}"
        )));
    }
    Ok(format!("L{}", excluded.concat()))
}

fn state_to_fips(state: &str) -> Result<&'static str> {
    let abbrev = if state.chars().count() > 2 {
        codes::state_abbrev(state)
            .ok_or_else(|| Error::input(format!("unrecognized state {state:?}")))?
    } else {
        state
    };
    codes::state_fips(abbrev).ok_or_else(|| Error::input(format!("unrecognized state {state:?}")))
}
