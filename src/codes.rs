//! Static lookup tables backing the series resolver: state FIPS codes,
//! CPI region/size-class/exclusion codes, and the per-category series-ID
//! templates for each geography.
//!
//! Template placeholders: `{seas}` seasonal-adjustment token, `{fips}`
//! two-digit state FIPS, `{region}` CPI region digit, `{sizeclass}` CPI
//! size-class digit, `{less}` CPI item-exclusion suffix (e.g. `L1E`).

/// Geography a series template is defined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Geo {
    Us,
    State,
}

/// Canonical data-category names, resolved from user-facing aliases.
pub(crate) fn canonical_category(alias: &str) -> Option<&'static str> {
    Some(match alias.to_ascii_lowercase().as_str() {
        "ur" | "unemployment rate" => "ur",
        "unemployment" | "unemployed" => "unemployment",
        "employment" | "employed" => "employment",
        "lf" | "labor force" | "laborforce" => "laborforce",
        "lfpr" | "participation" | "participation rate" => "lfpr",
        "epop" | "employment-population ratio" => "epop",
        s if s.starts_with("cpi") => "cpi",
        _ => return None,
    })
}

/// Series-ID template for a (category, geography) pair. CPS levels use the
/// `S1`/`U0` token alphabet; LAUS and CPI use plain `S`/`U`.
pub(crate) fn template(category: &str, geo: Geo) -> Option<&'static str> {
    match geo {
        Geo::Us => Some(match category {
            "ur" => "LN{seas}4000000",
            "unemployment" => "LN{seas}3000000",
            "employment" => "LN{seas}2000000",
            "laborforce" => "LN{seas}1000000",
            "lfpr" => "LN{seas}1300000",
            "epop" => "LN{seas}2300000",
            "cpi" => "CU{seas}R0{region}{sizeclass}0SA0{less}",
            _ => return None,
        }),
        Geo::State => Some(match category {
            "ur" => "LA{seas}ST{fips}0000000000003",
            "unemployment" => "LA{seas}ST{fips}0000000000004",
            "employment" => "LA{seas}ST{fips}0000000000005",
            "laborforce" => "LA{seas}ST{fips}0000000000006",
            _ => return None,
        }),
    }
}

/// Census region digit used in CPI area codes. `None` means no regional
/// filter (U.S. city average).
pub(crate) fn cpi_region(name: Option<&str>) -> Option<&'static str> {
    let Some(name) = name else { return Some("0") };
    Some(match name.to_ascii_lowercase().as_str() {
        "northeast" => "1",
        "midwest" => "2",
        "south" => "3",
        "west" => "4",
        _ => return None,
    })
}

/// Population size-class digit used in CPI area codes. `None` means all
/// city sizes.
pub(crate) fn size_class(name: Option<&str>) -> Option<&'static str> {
    let Some(name) = name else { return Some("0") };
    Some(match name.to_ascii_lowercase().as_str() {
        "a" => "1",
        "b/c" | "b" | "c" => "2",
        "d" => "3",
        _ => return None,
    })
}

/// Item-exclusion code for one hyphen-separated CPI component token.
/// The leading "cpi" token maps to the empty string.
pub(crate) fn cpi_exclusion(token: &str) -> Option<&'static str> {
    Some(match token.to_ascii_lowercase().as_str() {
        "cpi" => "",
        "food" => "1",
        "shelter" => "2",
        "medical" | "medical-care" => "5",
        "energy" => "E",
        _ => return None,
    })
}

/// Two-digit FIPS code for a postal abbreviation.
pub(crate) fn state_fips(abbrev: &str) -> Option<&'static str> {
    Some(match abbrev.to_ascii_uppercase().as_str() {
        "AL" => "01",
        "AK" => "02",
        "AZ" => "04",
        "AR" => "05",
        "CA" => "06",
        "CO" => "08",
        "CT" => "09",
        "DE" => "10",
        "DC" => "11",
        "FL" => "12",
        "GA" => "13",
        "HI" => "15",
        "ID" => "16",
        "IL" => "17",
        "IN" => "18",
        "IA" => "19",
        "KS" => "20",
        "KY" => "21",
        "LA" => "22",
        "ME" => "23",
        "MD" => "24",
        "MA" => "25",
        "MI" => "26",
        "MN" => "27",
        "MS" => "28",
        "MO" => "29",
        "MT" => "30",
        "NE" => "31",
        "NV" => "32",
        "NH" => "33",
        "NJ" => "34",
        "NM" => "35",
        "NY" => "36",
        "NC" => "37",
        "ND" => "38",
        "OH" => "39",
        "OK" => "40",
        "OR" => "41",
        "PA" => "42",
        "RI" => "44",
        "SC" => "45",
        "SD" => "46",
        "TN" => "47",
        "TX" => "48",
        "UT" => "49",
        "VT" => "50",
        "VA" => "51",
        "WA" => "53",
        "WV" => "54",
        "WI" => "55",
        "WY" => "56",
        "PR" => "72",
        _ => return None,
    })
}

/// Postal abbreviation for a full state name (case-insensitive).
pub(crate) fn state_abbrev(name: &str) -> Option<&'static str> {
    Some(match name.to_ascii_lowercase().as_str() {
        "alabama" => "AL",
        "alaska" => "AK",
        "arizona" => "AZ",
        "arkansas" => "AR",
        "california" => "CA",
        "colorado" => "CO",
        "connecticut" => "CT",
        "delaware" => "DE",
        "district of columbia" => "DC",
        "florida" => "FL",
        "georgia" => "GA",
        "hawaii" => "HI",
        "idaho" => "ID",
        "illinois" => "IL",
        "indiana" => "IN",
        "iowa" => "IA",
        "kansas" => "KS",
        "kentucky" => "KY",
        "louisiana" => "LA",
        "maine" => "ME",
        "maryland" => "MD",
        "massachusetts" => "MA",
        "michigan" => "MI",
        "minnesota" => "MN",
        "mississippi" => "MS",
        "missouri" => "MO",
        "montana" => "MT",
        "nebraska" => "NE",
        "nevada" => "NV",
        "new hampshire" => "NH",
        "new jersey" => "NJ",
        "new mexico" => "NM",
        "new york" => "NY",
        "north carolina" => "NC",
        "north dakota" => "ND",
        "ohio" => "OH",
        "oklahoma" => "OK",
        "oregon" => "OR",
        "pennsylvania" => "PA",
        "puerto rico" => "PR",
        "rhode island" => "RI",
        "south carolina" => "SC",
        "south dakota" => "SD",
        "tennessee" => "TN",
        "texas" => "TX",
        "utah" => "UT",
        "vermont" => "VT",
        "virginia" => "VA",
        "washington" => "WA",
        "west virginia" => "WV",
        "wisconsin" => "WI",
        "wyoming" => "WY",
        _ => return None,
    })
}
