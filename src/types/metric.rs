//! Defines the five observed climate metrics a monthly normal is built from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the daily-observation kinds the pipeline resolves, aggregates and
/// scores.
///
/// Every [`crate::DailyRecord`] carries the metric it belongs to, and the
/// resolver guarantees its value is already in the metric's SI unit before it
/// leaves the sources layer.
///
/// # Examples
///
/// ```
/// use littoral::Metric;
///
/// assert_eq!(Metric::Wind.unit(), "m/s");
/// assert_eq!(Metric::SeaTemp.to_string(), "sea_temp");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Daily maximum air temperature, °C.
    AirTemp,
    /// Daily precipitation total, mm.
    Rain,
    /// Daily mean sea surface temperature, °C.
    SeaTemp,
    /// Daily mean wind speed at 10 m, m/s.
    Wind,
    /// Daily mean significant wave height, m.
    Wave,
}

impl Metric {
    /// All metrics, in the order monthly rows list them.
    pub const ALL: [Metric; 5] = [
        Metric::AirTemp,
        Metric::Rain,
        Metric::SeaTemp,
        Metric::Wind,
        Metric::Wave,
    ];

    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Metric::AirTemp => "air_temp",
            Metric::Rain => "rain",
            Metric::SeaTemp => "sea_temp",
            Metric::Wind => "wind",
            Metric::Wave => "wave",
        }
    }

    /// Directory name the cache store files entries for this metric under.
    pub(crate) fn cache_namespace(&self) -> &'static str {
        self.path_segment()
    }

    /// The SI unit every committed daily value of this metric is expressed in.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::AirTemp | Metric::SeaTemp => "°C",
            Metric::Rain => "mm",
            Metric::Wind => "m/s",
            Metric::Wave => "m",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}
