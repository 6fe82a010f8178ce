//! URL state encoding/decoding for shareable views.
//!
//! Facet controls live in the query string so a reload restores the view and
//! links can be shared. Map position (`lat`, `lon`, `zoom`) shares the query
//! string but is owned by the map, so control updates leave it alone.
//!
//! Decoding never fails: every parameter is validated on its own and values
//! outside the known domain are dropped.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::core::selection::FacetSelection;
use crate::core::types::{
    ClimateModel, ClimateScenario, ClimateVarKey, Month, ParseError, SpatialResolution,
};
use crate::core::year_range::{YearRange, YearSpan};

/// Query parameters owned by the facet controls
pub const CONTROL_PARAMS: [&str; 7] = [
    "variable",
    "resolution",
    "scenario",
    "model",
    "difference",
    "month",
    "yearRange",
];

/// Raw control parameters as they appear in a URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlControls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_range: Option<String>,
}

/// Wrap a bare query string in a placeholder URL so it can be read with
/// `query_pairs`, which percent-decodes keys and values
pub fn query_url(query: &str) -> Option<Url> {
    let mut url = Url::parse("http://localhost/").ok()?;
    url.set_query(Some(query.trim_start_matches('?')));
    Some(url)
}

impl UrlControls {
    /// Collect control parameters; the first occurrence of a key wins
    pub fn from_query_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut controls = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "variable" => &mut controls.variable,
                "resolution" => &mut controls.resolution,
                "scenario" => &mut controls.scenario,
                "model" => &mut controls.model,
                "difference" => &mut controls.difference,
                "month" => &mut controls.month,
                "yearRange" => &mut controls.year_range,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        controls
    }

    /// Read the control parameters of a URL
    pub fn from_url(url: &Url) -> Self {
        Self::from_query_pairs(url.query_pairs().map(|(k, v)| (k, v.into_owned())))
    }

    /// Parse a bare query string such as `variable=T_MAX&month=7`
    pub fn from_query(query: &str) -> Self {
        query_url(query).map_or_else(Self::default, |url| Self::from_url(&url))
    }

    /// Set parameters in canonical order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, &str)> {
        let fields = [
            &self.variable,
            &self.resolution,
            &self.scenario,
            &self.model,
            &self.difference,
            &self.month,
            &self.year_range,
        ];
        CONTROL_PARAMS
            .into_iter()
            .zip(fields)
            .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
            .collect()
    }

    /// Form-encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        let mut url = match Url::parse("http://localhost/") {
            Ok(url) => url,
            Err(_) => return String::new(),
        };
        url.query_pairs_mut().extend_pairs(self.to_query_pairs());
        url.query().unwrap_or_default().to_string()
    }
}

/// Encode a selection into URL parameters.
///
/// `difference` and `month` are always written; the rest only when set.
/// The year range is written as its primary value.
pub fn encode_controls(selection: &FacetSelection) -> UrlControls {
    UrlControls {
        variable: Some(selection.variable.as_str().to_string()),
        resolution: Some(selection.resolution.as_str().to_string()),
        scenario: selection.scenario.map(|s| s.as_str().to_string()),
        model: selection.model.map(|m| m.as_str().to_string()),
        difference: Some(selection.show_difference_map.to_string()),
        month: Some(selection.month.to_string()),
        year_range: selection.year_range.as_ref().map(|r| r.value.to_string()),
    }
}

/// Control values that survived validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedControls {
    pub variable: Option<ClimateVarKey>,
    pub resolution: Option<SpatialResolution>,
    pub scenario: Option<ClimateScenario>,
    pub model: Option<ClimateModel>,
    pub difference: Option<bool>,
    pub month: Option<Month>,
    pub year_range: Option<YearRange>,
}

impl DecodedControls {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write every decoded value into `selection`; returns whether anything changed
    pub fn apply_to(&self, selection: &mut FacetSelection) -> bool {
        let before = selection.clone();

        if let Some(variable) = self.variable {
            selection.variable = variable;
        }
        if let Some(resolution) = self.resolution {
            selection.resolution = resolution;
        }
        if let Some(scenario) = self.scenario {
            selection.scenario = Some(scenario);
        }
        if let Some(model) = self.model {
            selection.model = Some(model);
        }
        if let Some(difference) = self.difference {
            selection.show_difference_map = difference;
        }
        if let Some(month) = self.month {
            selection.month = month;
        }
        if let Some(year_range) = &self.year_range {
            selection.year_range = Some(year_range.clone());
        }

        *selection != before
    }
}

fn decode_field<T, E: std::fmt::Display>(
    name: &str,
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Option<T> {
    let raw = raw?;
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Ignoring URL parameter {}={:?}: {}", name, raw, e);
            None
        }
    }
}

/// Validate URL parameters against the known domains.
///
/// `year_ranges` is the year-range facet domain; a `yearRange` parameter
/// resolves to the option whose primary value or alias it names.
pub fn decode_controls(controls: &UrlControls, year_ranges: &[YearRange]) -> DecodedControls {
    let year_range = decode_field("yearRange", controls.year_range.as_deref(), |raw| {
        let span: YearSpan = raw.parse().map_err(|e: ParseError| e.to_string())?;
        year_ranges
            .iter()
            .find(|r| r.matches(span))
            .cloned()
            .ok_or_else(|| format!("no year range covers {span}"))
    });

    DecodedControls {
        variable: decode_field("variable", controls.variable.as_deref(), str::parse),
        resolution: decode_field("resolution", controls.resolution.as_deref(), str::parse),
        scenario: decode_field("scenario", controls.scenario.as_deref(), str::parse),
        model: decode_field("model", controls.model.as_deref(), str::parse),
        difference: decode_field("difference", controls.difference.as_deref(), |raw| match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err("expected true or false"),
        }),
        month: decode_field("month", controls.month.as_deref(), str::parse),
        year_range,
    }
}

/// The URL that should replace `url` after a control change.
///
/// Every control parameter is rewritten from `controls`. Other parameters,
/// including the map view, keep their values and relative order.
pub fn update_url_params(url: &Url, controls: &UrlControls) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !CONTROL_PARAMS.contains(&&**k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut updated = url.clone();
    updated.set_query(None);
    let pairs = controls.to_query_pairs();
    if kept.is_empty() && pairs.is_empty() {
        return updated;
    }
    {
        let mut query = updated.query_pairs_mut();
        query.extend_pairs(kept);
        query.extend_pairs(pairs);
    }
    updated
}

/// Map position stored alongside the controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
}

impl MapView {
    /// Read `lat`, `lon` and `zoom`; `None` unless all three parse
    pub fn from_url(url: &Url) -> Option<Self> {
        let get = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<f64>().ok())
        };
        Some(Self {
            lat: get("lat")?,
            lon: get("lon")?,
            zoom: get("zoom")?,
        })
    }
}

/// Write the map view into `url`, replacing existing values in place
pub fn with_map_view(url: &Url, view: MapView) -> Url {
    let values = [
        ("lat", format!("{:.6}", view.lat)),
        ("lon", format!("{:.6}", view.lon)),
        ("zoom", view.zoom.to_string()),
    ];

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    for (key, value) in values {
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => pairs.push((key.to_string(), value)),
        }
    }

    let mut updated = url.clone();
    updated.set_query(None);
    updated.query_pairs_mut().extend_pairs(pairs);
    updated
}

/// Browser-style location that is replaced, never pushed.
///
/// Control changes overwrite the current entry so the back button leaves
/// the page instead of stepping through every facet tweak.
#[derive(Debug, Clone)]
pub struct UrlHistory {
    location: Url,
    replacements: usize,
}

impl UrlHistory {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            replacements: 0,
        }
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Number of entries; always one
    pub fn len(&self) -> usize {
        1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// How many times the location has been overwritten
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    pub fn replace_state(&mut self, location: Url) {
        self.location = location;
        self.replacements += 1;
    }

    /// Rewrite the control parameters of the current location
    pub fn replace_controls(&mut self, controls: &UrlControls) -> &Url {
        let updated = update_url_params(&self.location, controls);
        self.replace_state(updated);
        &self.location
    }
}
