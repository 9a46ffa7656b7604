//! Open-Meteo endpoint catalogs: the historical archive (air, rain, wind)
//! and the marine grid (sea temperature, waves).

use crate::sources::provider::{EndpointKind, ProviderSpec};
use crate::sources::units::{HeightUnit, TemperatureUnit, UnitSchema, WindUnit};
use crate::types::metric::Metric;
use crate::types::period::Period;

/// Production base URL of the Open-Meteo historical archive.
pub const ARCHIVE_BASE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
/// Production base URL of the Open-Meteo marine API.
pub const MARINE_BASE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";

pub(crate) fn archive_variables(metric: Metric) -> Option<&'static [&'static str]> {
    match metric {
        Metric::AirTemp => Some(&["temperature_2m_max"]),
        Metric::Rain => Some(&["precipitation_sum"]),
        // The archive reports daily wind in km/h; the unit schema converts.
        Metric::Wind => Some(&["wind_speed_10m_mean"]),
        Metric::SeaTemp | Metric::Wave => None,
    }
}

pub(crate) fn marine_variables(metric: Metric) -> Option<&'static [&'static str]> {
    match metric {
        Metric::SeaTemp => Some(&["sea_surface_temperature"]),
        Metric::Wave => Some(&["wave_height_mean"]),
        _ => None,
    }
}

/// First-priority spec for air temperature, rainfall and wind.
pub fn archive_spec(base_url: impl Into<String>, max_period: Period) -> ProviderSpec {
    ProviderSpec {
        source_id: "open_meteo_archive".into(),
        source_version: "v1".into(),
        priority: 0,
        endpoint: EndpointKind::OpenMeteoArchive,
        base_url: base_url.into(),
        supported_metrics: vec![Metric::AirTemp, Metric::Rain, Metric::Wind],
        proxy_metrics: vec![],
        unit_schema: UnitSchema {
            temperature: TemperatureUnit::Celsius,
            wind: WindUnit::KilometersPerHour,
            wave_height: HeightUnit::Meters,
        },
        max_supported_period: max_period,
    }
}

/// First-priority spec for sea surface temperature and wave height.
pub fn marine_spec(base_url: impl Into<String>, max_period: Period) -> ProviderSpec {
    ProviderSpec {
        source_id: "open_meteo_marine".into(),
        source_version: "v1".into(),
        priority: 0,
        endpoint: EndpointKind::OpenMeteoMarine,
        base_url: base_url.into(),
        supported_metrics: vec![Metric::SeaTemp, Metric::Wave],
        proxy_metrics: vec![],
        unit_schema: UnitSchema::si(),
        max_supported_period: max_period,
    }
}
