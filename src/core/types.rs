use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Years strictly before this start year are historical observations.
pub const HISTORICAL_CUTOFF_YEAR: i32 = 2000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown {facet} value '{value}'")]
    UnknownValue { facet: &'static str, value: String },

    #[error("Invalid year range '{0}': expected START-END")]
    InvalidYearRange(String),

    #[error("Invalid month '{0}': expected 1-12")]
    InvalidMonth(String),
}

/// Climate variable identifier as used in URLs and configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClimateVarKey {
    Precipitation,
    TMax,
    TMin,
    CloudCover,
    WetDays,
    FrostDays,
    WindSpeed,
    Radiation,
    DiurnalTempRange,
    VapourPressure,
}

impl ClimateVarKey {
    /// Canonical presentation order
    pub const ALL: [Self; 10] = [
        Self::TMax,
        Self::TMin,
        Self::Precipitation,
        Self::CloudCover,
        Self::WetDays,
        Self::FrostDays,
        Self::WindSpeed,
        Self::Radiation,
        Self::DiurnalTempRange,
        Self::VapourPressure,
    ];

    /// Variables with CMIP6 projections (and therefore difference maps)
    pub const WITH_FUTURE_PREDICTIONS: [Self; 3] = [Self::TMax, Self::TMin, Self::Precipitation];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Precipitation => "PRECIPITATION",
            Self::TMax => "T_MAX",
            Self::TMin => "T_MIN",
            Self::CloudCover => "CLOUD_COVER",
            Self::WetDays => "WET_DAYS",
            Self::FrostDays => "FROST_DAYS",
            Self::WindSpeed => "WIND_SPEED",
            Self::Radiation => "RADIATION",
            Self::DiurnalTempRange => "DIURNAL_TEMP_RANGE",
            Self::VapourPressure => "VAPOUR_PRESSURE",
        }
    }

    /// Variable name as published by the catalog API
    #[must_use]
    pub fn catalog_name(self) -> &'static str {
        match self {
            Self::Precipitation => "Precipitation",
            Self::TMax => "Tmax",
            Self::TMin => "Tmin",
            Self::CloudCover => "CloudCover",
            Self::WetDays => "WetDays",
            Self::FrostDays => "FrostDays",
            Self::WindSpeed => "WindSpeed",
            Self::Radiation => "Radiation",
            Self::DiurnalTempRange => "DiurnalTempRange",
            Self::VapourPressure => "VapourPressure",
        }
    }

    #[must_use]
    pub fn from_catalog_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.catalog_name() == name)
    }

    #[must_use]
    pub fn is_temperature(self) -> bool {
        matches!(self, Self::TMax | Self::TMin | Self::DiurnalTempRange)
    }

    #[must_use]
    pub fn is_precipitation(self) -> bool {
        self == Self::Precipitation
    }

    #[must_use]
    pub fn has_future_predictions(self) -> bool {
        Self::WITH_FUTURE_PREDICTIONS.contains(&self)
    }
}

impl std::fmt::Display for ClimateVarKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClimateVarKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParseError::UnknownValue {
                facet: "variable",
                value: s.to_string(),
            })
    }
}

/// Spatial grid spacing of a rendered layer, in arc minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialResolution {
    #[serde(rename = "2.5m")]
    Min2_5,
    #[serde(rename = "5m")]
    Min5,
    #[default]
    #[serde(rename = "10m")]
    Min10,
    #[serde(rename = "30m")]
    Min30,
}

impl SpatialResolution {
    /// Canonical order, finest to coarsest
    pub const ALL: [Self; 4] = [Self::Min2_5, Self::Min5, Self::Min10, Self::Min30];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min2_5 => "2.5m",
            Self::Min5 => "5m",
            Self::Min10 => "10m",
            Self::Min30 => "30m",
        }
    }

    /// Human label shown next to the resolution selector
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Min30 => "Low",
            Self::Min10 => "Medium",
            Self::Min5 => "High",
            Self::Min2_5 => "Very High",
        }
    }
}

impl std::fmt::Display for SpatialResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpatialResolution {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseError::UnknownValue {
                facet: "resolution",
                value: s.to_string(),
            })
    }
}

/// Shared Socioeconomic Pathway with its radiative forcing level in 2100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateScenario {
    #[serde(rename = "SSP126")]
    Ssp126,
    #[serde(rename = "SSP245")]
    Ssp245,
    #[serde(rename = "SSP370")]
    Ssp370,
    #[serde(rename = "SSP585")]
    Ssp585,
}

impl ClimateScenario {
    pub const ALL: [Self; 4] = [Self::Ssp126, Self::Ssp245, Self::Ssp370, Self::Ssp585];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssp126 => "SSP126",
            Self::Ssp245 => "SSP245",
            Self::Ssp370 => "SSP370",
            Self::Ssp585 => "SSP585",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ssp126 => "SSP1-2.6",
            Self::Ssp245 => "SSP2-4.5",
            Self::Ssp370 => "SSP3-7.0",
            Self::Ssp585 => "SSP5-8.5",
        }
    }
}

impl std::fmt::Display for ClimateScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClimateScenario {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseError::UnknownValue {
                facet: "scenario",
                value: s.to_string(),
            })
    }
}

/// CMIP6 climate model, or the mean across the model ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateModel {
    #[serde(rename = "ENSEMBLE_MEAN")]
    EnsembleMean,
    #[serde(rename = "ACCESS_CM2")]
    AccessCm2,
    #[serde(rename = "BCC_CSM2_MR")]
    BccCsm2Mr,
    #[serde(rename = "CMCC_ESM2")]
    CmccEsm2,
    #[serde(rename = "EC_Earth3_Veg", alias = "EC-Earth3-Veg")]
    EcEarth3Veg,
    #[serde(rename = "FIO_ESM_2_0")]
    FioEsm2_0,
    #[serde(rename = "GFDL_ESM4")]
    GfdlEsm4,
    #[serde(rename = "GISS_E2_1_G")]
    GissE2_1G,
    #[serde(rename = "HadGEM3_GC31_LL")]
    HadGem3Gc31Ll,
    #[serde(rename = "INM_CM5_0")]
    InmCm5_0,
    #[serde(rename = "IPSL_CM6A_LR")]
    IpslCm6aLr,
    #[serde(rename = "MIROC6")]
    Miroc6,
    #[serde(rename = "MPI_ESM1_2_HR")]
    MpiEsm1_2Hr,
    #[serde(rename = "MRI_ESM2_0")]
    MriEsm2_0,
    #[serde(rename = "UKESM1_0_LL")]
    Ukesm1_0Ll,
}

impl ClimateModel {
    /// Canonical order: ensemble mean first, then individual models
    pub const ALL: [Self; 15] = [
        Self::EnsembleMean,
        Self::AccessCm2,
        Self::BccCsm2Mr,
        Self::CmccEsm2,
        Self::EcEarth3Veg,
        Self::FioEsm2_0,
        Self::GfdlEsm4,
        Self::GissE2_1G,
        Self::HadGem3Gc31Ll,
        Self::InmCm5_0,
        Self::IpslCm6aLr,
        Self::Miroc6,
        Self::MpiEsm1_2Hr,
        Self::MriEsm2_0,
        Self::Ukesm1_0Ll,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnsembleMean => "ENSEMBLE_MEAN",
            Self::AccessCm2 => "ACCESS_CM2",
            Self::BccCsm2Mr => "BCC_CSM2_MR",
            Self::CmccEsm2 => "CMCC_ESM2",
            Self::EcEarth3Veg => "EC_Earth3_Veg",
            Self::FioEsm2_0 => "FIO_ESM_2_0",
            Self::GfdlEsm4 => "GFDL_ESM4",
            Self::GissE2_1G => "GISS_E2_1_G",
            Self::HadGem3Gc31Ll => "HadGEM3_GC31_LL",
            Self::InmCm5_0 => "INM_CM5_0",
            Self::IpslCm6aLr => "IPSL_CM6A_LR",
            Self::Miroc6 => "MIROC6",
            Self::MpiEsm1_2Hr => "MPI_ESM1_2_HR",
            Self::MriEsm2_0 => "MRI_ESM2_0",
            Self::Ukesm1_0Ll => "UKESM1_0_LL",
        }
    }
}

impl std::fmt::Display for ClimateModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClimateModel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            // Client links spell this model with dashes
            .find(|m| m.as_str() == s || (*m == Self::EcEarth3Veg && s == "EC-Earth3-Veg"))
            .ok_or_else(|| ParseError::UnknownValue {
                facet: "model",
                value: s.to_string(),
            })
    }
}

/// Calendar month, 1 (January) through 12 (December)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    #[must_use]
    pub fn new(month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self(month))
    }

    /// The current month in local time
    #[must_use]
    pub fn current() -> Self {
        use chrono::Datelike;
        // chrono months are always within 1..=12
        Self(u8::try_from(chrono::Local::now().month()).unwrap_or(1))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (1..=12).map(Self)
    }

    /// All months by meteorological season, December first
    pub fn seasonal() -> impl Iterator<Item = Self> {
        std::iter::once(Self(12)).chain((1..=11).map(Self))
    }

    /// English month name
    pub fn name(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        NAMES[usize::from(self.0 - 1)]
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| ParseError::InvalidMonth(value.to_string()))
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Month {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseError::InvalidMonth(s.to_string()))
    }
}
