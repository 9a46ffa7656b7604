//! Unit normalization between provider-native schemas and the SI units every
//! committed daily record uses (°C, mm, m/s, m).

use serde::{Deserialize, Serialize};

const MPH_PER_MS: f64 = 0.44704;
const FT_PER_M: f64 = 0.3048;
const KELVIN_OFFSET: f64 = 273.15;
const KMH_PER_MS: f64 = 3.6;

pub fn mph_to_ms(value: f64) -> f64 {
    value * MPH_PER_MS
}

pub fn kmh_to_ms(value: f64) -> f64 {
    value / KMH_PER_MS
}

pub fn ft_to_m(value: f64) -> f64 {
    value * FT_PER_M
}

pub fn kelvin_to_celsius(value: f64) -> f64 {
    value - KELVIN_OFFSET
}

/// Wind speed from eastward/northward vector components.
pub fn vector_magnitude(u: f64, v: f64) -> f64 {
    u.hypot(v)
}

/// Temperature unit a provider reports in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Celsius,
    Kelvin,
}

/// Wind-speed unit (or representation) a provider reports in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindUnit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    /// Eastward/northward components in m/s; speed is their magnitude.
    VectorComponentsMs,
}

/// Length unit for wave heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightUnit {
    Meters,
    Feet,
}

/// The units a provider's payload arrives in, declared per provider spec so
/// normalization is schema-driven rather than guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSchema {
    pub temperature: TemperatureUnit,
    pub wind: WindUnit,
    pub wave_height: HeightUnit,
}

impl UnitSchema {
    /// Everything already in SI units.
    pub fn si() -> Self {
        Self {
            temperature: TemperatureUnit::Celsius,
            wind: WindUnit::MetersPerSecond,
            wave_height: HeightUnit::Meters,
        }
    }

    /// Stable token used in cache keys, so a schema change invalidates the
    /// entry rather than reinterpreting stored values.
    pub fn cache_token(&self) -> String {
        let temp = match self.temperature {
            TemperatureUnit::Celsius => "c",
            TemperatureUnit::Kelvin => "k",
        };
        let wind = match self.wind {
            WindUnit::MetersPerSecond => "ms",
            WindUnit::KilometersPerHour => "kmh",
            WindUnit::MilesPerHour => "mph",
            WindUnit::VectorComponentsMs => "uv",
        };
        let wave = match self.wave_height {
            HeightUnit::Meters => "m",
            HeightUnit::Feet => "ft",
        };
        format!("{temp}-{wind}-{wave}")
    }

    pub fn temperature_to_celsius(&self, value: f64) -> f64 {
        match self.temperature {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Kelvin => kelvin_to_celsius(value),
        }
    }

    /// Scalar wind speeds only; vector components are combined before this
    /// applies.
    pub fn wind_to_ms(&self, value: f64) -> f64 {
        match self.wind {
            WindUnit::MetersPerSecond | WindUnit::VectorComponentsMs => value,
            WindUnit::KilometersPerHour => kmh_to_ms(value),
            WindUnit::MilesPerHour => mph_to_ms(value),
        }
    }

    pub fn wave_height_to_m(&self, value: f64) -> f64 {
        match self.wave_height {
            HeightUnit::Meters => value,
            HeightUnit::Feet => ft_to_m(value),
        }
    }
}
