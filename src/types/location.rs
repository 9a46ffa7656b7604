//! Location metadata supplied by the caller (configuration loading itself is
//! out of scope; these structs are the already-parsed form).

use serde::{Deserialize, Serialize};

/// A geographical coordinate: latitude first, longitude second, both `f64`.
///
/// # Examples
///
/// ```
/// use littoral::LatLon;
///
/// let fuerteventura = LatLon(28.50, -13.86);
/// assert_eq!(fuerteventura.0, 28.50); // Latitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// How the wave-sampling point for a location was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WavePointMode {
    /// A point moved offshore from the resort so the marine grid has data.
    Offshore,
    /// The resort coordinate itself sits on a marine grid cell.
    Nearshore,
}

/// Coordinate used for wave-height fetches.
///
/// Wave data lives on marine grids that often have no cell at the resort
/// coordinate, so each location carries a separate sampling point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavePoint {
    pub mode: WavePointMode,
    pub lat: f64,
    pub lon: f64,
}

/// One place a monthly climate table is built for.
///
/// `lat`/`lon` drive the air, rain, sea and wind fetches; `wave_point` drives
/// the wave fetch. `location_id` keys cache entries and output rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: String,
    pub country: String,
    pub resort: String,
    pub area: String,
    pub lat: f64,
    pub lon: f64,
    pub wave_point: WavePoint,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Location {
    /// The coordinate a metric is fetched at: the wave point for waves,
    /// the resort coordinate for everything else.
    pub fn coordinate_for(&self, metric: crate::types::metric::Metric) -> LatLon {
        match metric {
            crate::types::metric::Metric::Wave => LatLon(self.wave_point.lat, self.wave_point.lon),
            _ => LatLon(self.lat, self.lon),
        }
    }
}
