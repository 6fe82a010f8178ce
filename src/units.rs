//! Display units for point values and legends.
//!
//! Layers are published in °C and mm/month. Users may prefer °F or inches;
//! the preference is an explicit value handed to every conversion.

use serde::{Deserialize, Serialize};

use crate::core::types::ClimateVarKey;

/// Countries that report temperatures in Fahrenheit
const IMPERIAL_COUNTRIES: [&str; 9] = ["US", "BS", "BZ", "KY", "PW", "FM", "MH", "LR", "MM"];

const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "°F")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecipitationUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "in")]
    Inches,
}

impl PrecipitationUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Inches => "in",
        }
    }
}

/// The user's unit choices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPreferences {
    pub temperature: TemperatureUnit,
    pub precipitation: PrecipitationUnit,
}

impl UnitPreferences {
    /// Preferences for a BCP 47 locale such as `en-US`; metric unless the
    /// region uses imperial units
    pub fn for_locale(locale: &str) -> Self {
        let region = locale.split(['-', '_']).nth(1).map(str::to_ascii_uppercase);
        let imperial = region.is_some_and(|r| IMPERIAL_COUNTRIES.contains(&r.as_str()));
        if imperial {
            Self {
                temperature: TemperatureUnit::Fahrenheit,
                precipitation: PrecipitationUnit::Inches,
            }
        } else {
            Self::default()
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

pub fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Canonical spelling of a unit string (`C` becomes `°C`, `mm` prefixes are kept)
pub fn normalize_unit(unit: &str, variable: ClimateVarKey) -> String {
    if variable.is_temperature() {
        match unit {
            "C" | "°C" => return TemperatureUnit::Celsius.symbol().to_string(),
            "F" | "°F" => return TemperatureUnit::Fahrenheit.symbol().to_string(),
            _ => {}
        }
    }
    unit.to_string()
}

/// The unit a value in `unit` is shown in under `prefs`
pub fn display_unit(unit: &str, variable: ClimateVarKey, prefs: UnitPreferences) -> String {
    if variable.is_temperature() && unit == TemperatureUnit::Celsius.symbol() {
        return prefs.temperature.symbol().to_string();
    }
    if variable.is_precipitation() && unit == "mm/month" {
        return format!("{}/month", prefs.precipitation.symbol());
    }
    unit.to_string()
}

/// Convert a published value to the preferred unit
pub fn convert_value(
    value: f64,
    unit: &str,
    variable: ClimateVarKey,
    prefs: UnitPreferences,
) -> (f64, String) {
    if variable.is_temperature()
        && unit == TemperatureUnit::Celsius.symbol()
        && prefs.temperature == TemperatureUnit::Fahrenheit
    {
        return (
            celsius_to_fahrenheit(value),
            TemperatureUnit::Fahrenheit.symbol().to_string(),
        );
    }
    if variable.is_precipitation()
        && unit == "mm/month"
        && prefs.precipitation == PrecipitationUnit::Inches
    {
        return (mm_to_inches(value), "in/month".to_string());
    }
    (value, unit.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPERIAL: UnitPreferences = UnitPreferences {
        temperature: TemperatureUnit::Fahrenheit,
        precipitation: PrecipitationUnit::Inches,
    };

    #[test]
    fn test_temperature_conversion() {
        let (value, unit) = convert_value(100.0, "°C", ClimateVarKey::TMax, IMPERIAL);
        assert!((value - 212.0).abs() < 1e-9);
        assert_eq!(unit, "°F");

        assert!((fahrenheit_to_celsius(celsius_to_fahrenheit(-40.0)) + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_precipitation_conversion() {
        let (value, unit) = convert_value(254.0, "mm/month", ClimateVarKey::Precipitation, IMPERIAL);
        assert!((value - 10.0).abs() < 1e-9);
        assert_eq!(unit, "in/month");
        assert!((inches_to_mm(1.0) - 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_metric_preferences_leave_values() {
        let prefs = UnitPreferences::default();
        assert_eq!(
            convert_value(12.5, "°C", ClimateVarKey::TMin, prefs),
            (12.5, "°C".to_string())
        );
    }

    #[test]
    fn test_other_variables_untouched() {
        let (value, unit) = convert_value(42.0, "%", ClimateVarKey::CloudCover, IMPERIAL);
        assert_eq!(value, 42.0);
        assert_eq!(unit, "%");
        // Celsius on a non-temperature variable is left as is
        assert_eq!(display_unit("°C", ClimateVarKey::WindSpeed, IMPERIAL), "°C");
    }

    #[test]
    fn test_display_unit() {
        assert_eq!(display_unit("°C", ClimateVarKey::DiurnalTempRange, IMPERIAL), "°F");
        assert_eq!(display_unit("mm/month", ClimateVarKey::Precipitation, IMPERIAL), "in/month");
        assert_eq!(
            display_unit("mm/month", ClimateVarKey::Precipitation, UnitPreferences::default()),
            "mm/month"
        );
    }

    #[test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit("C", ClimateVarKey::TMax), "°C");
        assert_eq!(normalize_unit("F", ClimateVarKey::TMin), "°F");
        assert_eq!(normalize_unit("C", ClimateVarKey::Radiation), "C");
        assert_eq!(normalize_unit("mm/month", ClimateVarKey::Precipitation), "mm/month");
    }

    #[test]
    fn test_for_locale() {
        assert_eq!(UnitPreferences::for_locale("en-US"), IMPERIAL);
        assert_eq!(UnitPreferences::for_locale("my_mm"), IMPERIAL);
        assert_eq!(UnitPreferences::for_locale("nl-NL"), UnitPreferences::default());
        assert_eq!(UnitPreferences::for_locale("en"), UnitPreferences::default());
    }
}
