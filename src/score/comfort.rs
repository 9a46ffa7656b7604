//! The comfort-score model: a pure, deterministic formula over five monthly
//! metrics, returning a 0–100 score plus a fixed-key component breakdown.
//!
//! The function does no I/O and keeps no state; identical inputs always give
//! identical outputs, which is what makes per-month "why is this month bad"
//! rankings reproducible.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lower clamp bound of the final score.
const SCORE_MIN: f64 = 0.0;
/// Upper clamp bound of the final score.
const SCORE_MAX: f64 = 100.0;

/// Score units per degree of cold below `cold_air_t`.
const COLD_RATE: f64 = 2.0;
/// Score units per m/s of wind-chill excess above `wind_cold_t`.
const WIND_EX_COLD_RATE: f64 = 1.5;
/// Score units per rain day beyond `rain_t2`.
const WET_RATE: f64 = 0.5;
/// Score units per degree above `heat_air_t` in calm air.
const HEAT_RATE: f64 = 1.5;
/// Flat penalty for the combined hot-wet-still condition.
const BREATH_PENALTY: f64 = 10.0;
/// Score units per m/s above `strong_wind_t`.
const STRONG_WIND_RATE: f64 = 1.5;
/// Maximum rain penalty across the `rain_t1..rain_t2` ramp.
const RAIN_PEN_MAX: f64 = 20.0;
/// Wave penalty at the `wave_t2` breakpoint.
const WAVE_PEN_MID: f64 = 7.5;
/// Maximum wave penalty at and beyond `wave_t3`.
const WAVE_PEN_MAX: f64 = 15.0;
/// Maximum wind-comfort credit from the low-wind ramp.
const BREEZE_MAX: f64 = 5.0;
/// Sea-base value attached to each breakpoint `s0..s4`.
const SEA_TIERS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// How the final clamped score is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round to the nearest whole point.
    Integer,
    /// Round to the nearest multiple of the given step, e.g. 0.1.
    Step(f64),
}

impl Rounding {
    fn apply(&self, value: f64) -> f64 {
        match *self {
            Rounding::Integer => value.round(),
            Rounding::Step(step) => (value / step).round() * step,
        }
    }
}

/// Scoring parameters, loaded once per run and passed by reference.
///
/// All temperatures are °C, wind thresholds m/s, wave thresholds m, rain
/// thresholds in days per month. [`Params::validate`] must pass before the
/// set is used; the scoring function itself never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Air/sea divergence weight, and the ramp span of the warm-breeze term.
    pub ds: f64,
    /// Sea temperature above which the sea base stops rising.
    pub sea_max: f64,
    /// Sea-base breakpoints, strictly increasing; map to 0/25/50/75/100.
    pub s0: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    /// Rain days where the rain penalty starts ramping.
    pub rain_t1: f64,
    /// Rain days where the rain penalty saturates and wetness takes over.
    pub rain_t2: f64,
    /// Air temperature below which cold penalties apply.
    pub cold_air_t: f64,
    /// Wind speed above which cold is wind-enhanced.
    pub wind_cold_t: f64,
    /// Air temperature above which heat terms activate.
    pub heat_air_t: f64,
    /// Wind speed below which heat is unrelieved.
    pub calm_wind_t: f64,
    /// Joint hot-wet-still thresholds.
    pub breath_air_t: f64,
    pub breath_rain_t: f64,
    pub breath_wind_t: f64,
    /// Wind speed above which wind itself is penalized.
    pub strong_wind_t: f64,
    /// Wind band rewarded in warm conditions, with its ramp rate.
    pub breeze_w0: f64,
    pub breeze_w1: f64,
    pub breeze_ramp: f64,
    /// Wave-height breakpoints, strictly increasing.
    pub wave_t1: f64,
    pub wave_t2: f64,
    pub wave_t3: f64,
    pub rounding: Rounding,
}

/// A parameter set that failed validation.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("parameter '{0}' is not a finite number")]
    NotFinite(&'static str),

    #[error("sea breakpoints must be strictly increasing: s0 < s1 < s2 < s3 < s4")]
    SeaBreakpointOrder,

    #[error("rain thresholds must satisfy rain_t1 < rain_t2")]
    RainThresholdOrder,

    #[error("wave breakpoints must be strictly increasing: wave_t1 < wave_t2 < wave_t3")]
    WaveBreakpointOrder,

    #[error("breeze band must satisfy breeze_w0 < breeze_w1")]
    BreezeBandOrder,

    #[error("rounding step must be a finite positive number")]
    InvalidRoundingStep,
}

impl Params {
    /// Checks ordering and finiteness of every recognized field.
    ///
    /// Unknown fields cannot exist (the struct enumerates the full set);
    /// missing fields fail at deserialization, so a `Params` that passes
    /// validation is usable as-is for the whole session.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let named = [
            ("ds", self.ds),
            ("sea_max", self.sea_max),
            ("s0", self.s0),
            ("s1", self.s1),
            ("s2", self.s2),
            ("s3", self.s3),
            ("s4", self.s4),
            ("rain_t1", self.rain_t1),
            ("rain_t2", self.rain_t2),
            ("cold_air_t", self.cold_air_t),
            ("wind_cold_t", self.wind_cold_t),
            ("heat_air_t", self.heat_air_t),
            ("calm_wind_t", self.calm_wind_t),
            ("breath_air_t", self.breath_air_t),
            ("breath_rain_t", self.breath_rain_t),
            ("breath_wind_t", self.breath_wind_t),
            ("strong_wind_t", self.strong_wind_t),
            ("breeze_w0", self.breeze_w0),
            ("breeze_w1", self.breeze_w1),
            ("breeze_ramp", self.breeze_ramp),
            ("wave_t1", self.wave_t1),
            ("wave_t2", self.wave_t2),
            ("wave_t3", self.wave_t3),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite(name));
            }
        }
        if !(self.s0 < self.s1 && self.s1 < self.s2 && self.s2 < self.s3 && self.s3 < self.s4) {
            return Err(ParamsError::SeaBreakpointOrder);
        }
        if self.rain_t1 >= self.rain_t2 {
            return Err(ParamsError::RainThresholdOrder);
        }
        if !(self.wave_t1 < self.wave_t2 && self.wave_t2 < self.wave_t3) {
            return Err(ParamsError::WaveBreakpointOrder);
        }
        if self.breeze_w0 >= self.breeze_w1 {
            return Err(ParamsError::BreezeBandOrder);
        }
        if let Rounding::Step(step) = self.rounding {
            if !step.is_finite() || step <= 0.0 {
                return Err(ParamsError::InvalidRoundingStep);
            }
        }
        Ok(())
    }
}

/// The fixed set of score components.
///
/// The breakdown always contains every variant, zero or not, so downstream
/// rankings can enumerate a stable key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Component {
    SeaBase,
    AirAdj,
    Breeze,
    WarmForBreeze,
    BreezeBonus,
    Cold,
    WindExCold,
    WetPen,
    RainPen,
    HeatPen,
    BreathPen,
    StrongWindPen,
    WavePen,
}

impl Component {
    /// Every component, in formula order.
    pub const ALL: [Component; 13] = [
        Component::SeaBase,
        Component::AirAdj,
        Component::Breeze,
        Component::WarmForBreeze,
        Component::BreezeBonus,
        Component::Cold,
        Component::WindExCold,
        Component::WetPen,
        Component::RainPen,
        Component::HeatPen,
        Component::BreathPen,
        Component::StrongWindPen,
        Component::WavePen,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Component::SeaBase => "SeaBase",
            Component::AirAdj => "AirAdj",
            Component::Breeze => "Breeze",
            Component::WarmForBreeze => "WarmForBreeze",
            Component::BreezeBonus => "BreezeBonus",
            Component::Cold => "Cold",
            Component::WindExCold => "WindExCold",
            Component::WetPen => "WetPen",
            Component::RainPen => "RainPen",
            Component::HeatPen => "HeatPen",
            Component::BreathPen => "BreathPen",
            Component::StrongWindPen => "StrongWindPen",
            Component::WavePen => "WavePen",
        }
    }

    /// Penalty components subtract from the running total; the rest add.
    pub fn is_penalty(&self) -> bool {
        matches!(
            self,
            Component::Cold
                | Component::WindExCold
                | Component::WetPen
                | Component::RainPen
                | Component::HeatPen
                | Component::BreathPen
                | Component::StrongWindPen
                | Component::WavePen
        )
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signed contribution of every component of one score.
///
/// Each value is stored as its magnitude within the formula; penalties are
/// reported positive here and subtracted when summing, mirroring how the
/// formula is written down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    values: [f64; 13],
}

impl ComponentBreakdown {
    /// The component's contribution magnitude.
    pub fn get(&self, component: Component) -> f64 {
        self.values[component as usize]
    }

    /// The component's signed contribution to the raw score.
    pub fn signed(&self, component: Component) -> f64 {
        if component.is_penalty() {
            -self.get(component)
        } else {
            self.get(component)
        }
    }

    /// `(component, magnitude)` pairs in formula order; always all 13.
    pub fn entries(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::ALL.iter().map(|&c| (c, self.get(c)))
    }

    /// Components sorted by contribution magnitude, largest first.
    pub fn ranked(&self) -> Vec<(Component, f64)> {
        let mut entries: Vec<_> = self.entries().collect();
        entries.sort_by_key(|&(_, v)| std::cmp::Reverse(OrderedFloat(v.abs())));
        entries
    }

    /// Penalties only, sorted by magnitude, largest first.
    pub fn top_penalties(&self) -> Vec<(Component, f64)> {
        self.ranked()
            .into_iter()
            .filter(|(c, _)| c.is_penalty())
            .collect()
    }
}

/// One month's computed score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Calendar month, 1..=12.
    pub month: u32,
    /// Clamped and rounded comfort score, 0..=100.
    pub score: f64,
    /// Signed component sum before clamping and rounding.
    pub raw_score: f64,
    pub components: ComponentBreakdown,
}

fn clamp(value: f64, min_value: f64, max_value: f64) -> f64 {
    value.max(min_value).min(max_value)
}

fn interp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if x <= x0 {
        return y0;
    }
    if x >= x1 {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Sea-temperature base: piecewise-linear through the five breakpoints,
/// saturating at `sea_max`.
fn sea_base(sea_c: f64, params: &Params) -> f64 {
    let s = sea_c.min(params.sea_max);
    let stops = [params.s0, params.s1, params.s2, params.s3, params.s4];
    if s <= stops[0] {
        return SEA_TIERS[0];
    }
    for i in 1..stops.len() {
        if s <= stops[i] {
            return interp(s, stops[i - 1], stops[i], SEA_TIERS[i - 1], SEA_TIERS[i]);
        }
    }
    SEA_TIERS[4]
}

/// Computes the comfort score for one month's five metric values.
///
/// Inputs: mean daily-max air °C, mean sea °C, rain days, mean wind m/s,
/// mean significant wave height m. Pure: no I/O, no hidden state, `params`
/// is never mutated. Each component depends only on the five inputs and
/// `params`, never on another component's output.
///
/// Returns the clamped and rounded score together with the full component
/// breakdown (every key present, zero contributions included).
///
/// # Examples
///
/// ```
/// use littoral::{compute_score, Params, Rounding};
///
/// let params = Params {
///     ds: 0.5,
///     sea_max: 26.0,
///     s0: 20.0, s1: 22.0, s2: 24.0, s3: 25.0, s4: 26.0,
///     rain_t1: 8.0, rain_t2: 15.0,
///     cold_air_t: 15.0, wind_cold_t: 6.0,
///     heat_air_t: 32.0, calm_wind_t: 2.0,
///     breath_air_t: 30.0, breath_rain_t: 12.0, breath_wind_t: 3.0,
///     strong_wind_t: 10.0,
///     breeze_w0: 2.0, breeze_w1: 6.0, breeze_ramp: 1.5,
///     wave_t1: 0.5, wave_t2: 1.2, wave_t3: 2.0,
///     rounding: Rounding::Integer,
/// };
/// params.validate().unwrap();
///
/// let (score, components) = compute_score(28.0, 25.0, 3.0, 4.0, 0.6, &params);
/// assert!(score >= 0.0 && score <= 100.0);
/// assert_eq!(components.entries().count(), 13);
/// ```
pub fn compute_score(
    air_c: f64,
    sea_c: f64,
    rain_days: f64,
    wind_ms: f64,
    wave_hs_m: f64,
    params: &Params,
) -> (f64, ComponentBreakdown) {
    let sea_base = sea_base(sea_c, params);

    let air_adj = -(air_c - sea_c).abs() * params.ds;

    let breeze = interp(wind_ms, 0.0, params.breeze_w0, 0.0, BREEZE_MAX);

    let warm_for_breeze = if air_c > params.heat_air_t {
        interp(
            air_c,
            params.heat_air_t,
            params.heat_air_t + params.ds,
            0.0,
            BREEZE_MAX,
        )
    } else {
        0.0
    };

    let breeze_bonus = if params.breeze_w0 < wind_ms && wind_ms < params.breeze_w1 {
        (wind_ms - params.breeze_w0) * params.breeze_ramp
    } else {
        0.0
    };

    let cold = if air_c < params.cold_air_t {
        (params.cold_air_t - air_c) * COLD_RATE
    } else {
        0.0
    };

    let wind_ex_cold = if air_c < params.cold_air_t && wind_ms > params.wind_cold_t {
        (wind_ms - params.wind_cold_t) * WIND_EX_COLD_RATE
    } else {
        0.0
    };

    let rain_pen = clamp(
        interp(rain_days, params.rain_t1, params.rain_t2, 0.0, RAIN_PEN_MAX),
        0.0,
        RAIN_PEN_MAX,
    );

    let wet_pen = if rain_days > params.rain_t2 {
        (rain_days - params.rain_t2) * WET_RATE
    } else {
        0.0
    };

    let heat_pen = if air_c > params.heat_air_t && wind_ms < params.calm_wind_t {
        (air_c - params.heat_air_t) * HEAT_RATE
    } else {
        0.0
    };

    let breath_pen = if air_c > params.breath_air_t
        && rain_days > params.breath_rain_t
        && wind_ms < params.breath_wind_t
    {
        BREATH_PENALTY
    } else {
        0.0
    };

    let strong_wind_pen = if wind_ms > params.strong_wind_t {
        (wind_ms - params.strong_wind_t) * STRONG_WIND_RATE
    } else {
        0.0
    };

    let wave_pen = clamp(
        if wave_hs_m <= params.wave_t1 {
            0.0
        } else if wave_hs_m <= params.wave_t2 {
            interp(wave_hs_m, params.wave_t1, params.wave_t2, 0.0, WAVE_PEN_MID)
        } else {
            interp(
                wave_hs_m,
                params.wave_t2,
                params.wave_t3,
                WAVE_PEN_MID,
                WAVE_PEN_MAX,
            )
        },
        0.0,
        WAVE_PEN_MAX,
    );

    let raw_score = sea_base + air_adj + breeze + warm_for_breeze + breeze_bonus
        - cold
        - wind_ex_cold
        - wet_pen
        - rain_pen
        - heat_pen
        - breath_pen
        - strong_wind_pen
        - wave_pen;

    let score = params
        .rounding
        .apply(clamp(raw_score, SCORE_MIN, SCORE_MAX));

    let breakdown = ComponentBreakdown {
        values: [
            sea_base,
            air_adj,
            breeze,
            warm_for_breeze,
            breeze_bonus,
            cold,
            wind_ex_cold,
            wet_pen,
            rain_pen,
            heat_pen,
            breath_pen,
            strong_wind_pen,
            wave_pen,
        ],
    };

    (score, breakdown)
}

/// Scores one month, bundling the raw/clamped values into a [`ScoreResult`].
pub fn score_month(
    month: u32,
    air_c: f64,
    sea_c: f64,
    rain_days: f64,
    wind_ms: f64,
    wave_hs_m: f64,
    params: &Params,
) -> ScoreResult {
    let (score, components) = compute_score(air_c, sea_c, rain_days, wind_ms, wave_hs_m, params);
    let raw_score = components
        .entries()
        .map(|(c, _)| components.signed(c))
        .sum();
    ScoreResult {
        month,
        score,
        raw_score,
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_params() -> Params {
        Params {
            ds: 0.5,
            sea_max: 26.0,
            s0: 20.0,
            s1: 22.0,
            s2: 24.0,
            s3: 25.0,
            s4: 26.0,
            rain_t1: 8.0,
            rain_t2: 15.0,
            cold_air_t: 15.0,
            wind_cold_t: 6.0,
            heat_air_t: 32.0,
            calm_wind_t: 2.0,
            breath_air_t: 30.0,
            breath_rain_t: 12.0,
            breath_wind_t: 3.0,
            strong_wind_t: 10.0,
            breeze_w0: 2.0,
            breeze_w1: 6.0,
            breeze_ramp: 1.5,
            wave_t1: 0.5,
            wave_t2: 1.2,
            wave_t3: 2.0,
            rounding: Rounding::Integer,
        }
    }

    #[test]
    fn validates_fixture() {
        fixture_params().validate().unwrap();
    }

    #[test]
    fn rejects_unordered_breakpoints() {
        let mut p = fixture_params();
        p.s2 = 30.0;
        assert!(matches!(
            p.validate(),
            Err(ParamsError::SeaBreakpointOrder)
        ));

        let mut p = fixture_params();
        p.wave_t3 = 1.0;
        assert!(matches!(p.validate(), Err(ParamsError::WaveBreakpointOrder)));

        let mut p = fixture_params();
        p.rain_t1 = 20.0;
        assert!(matches!(p.validate(), Err(ParamsError::RainThresholdOrder)));

        let mut p = fixture_params();
        p.ds = f64::NAN;
        assert!(matches!(p.validate(), Err(ParamsError::NotFinite("ds"))));

        let mut p = fixture_params();
        p.rounding = Rounding::Step(0.0);
        assert!(matches!(p.validate(), Err(ParamsError::InvalidRoundingStep)));
    }

    #[test]
    fn warm_dry_month_scores_high() {
        // A = 28, S = 25, R = 3, W = 4, WH = 0.6:
        //   SeaBase 75 (top tier starts at s3), AirAdj -1.5, Breeze 5,
        //   BreezeBonus 3, WavePen 7.5 * 0.1/0.7; everything else zero.
        let params = fixture_params();
        let (score, c) = compute_score(28.0, 25.0, 3.0, 4.0, 0.6, &params);

        assert_eq!(c.get(Component::SeaBase), 75.0);
        assert!((c.get(Component::AirAdj) - (-1.5)).abs() < 1e-12);
        assert_eq!(c.get(Component::Breeze), 5.0);
        assert_eq!(c.get(Component::WarmForBreeze), 0.0);
        assert!((c.get(Component::BreezeBonus) - 3.0).abs() < 1e-12);
        assert_eq!(c.get(Component::RainPen), 0.0);
        assert_eq!(c.get(Component::Cold), 0.0);
        assert_eq!(c.get(Component::StrongWindPen), 0.0);
        let expected_wave = 7.5 * (0.6 - 0.5) / (1.2 - 0.5);
        assert!((c.get(Component::WavePen) - expected_wave).abs() < 1e-12);

        let expected_raw = 75.0 - 1.5 + 5.0 + 3.0 - expected_wave;
        let raw: f64 = Component::ALL.iter().map(|&k| c.signed(k)).sum();
        assert!((raw - expected_raw).abs() < 1e-12);
        assert!((raw - 80.428_571_428_571_43).abs() < 1e-9);
        assert_eq!(score, 80.0);
    }

    #[test]
    fn heavy_rain_strictly_lowers_the_score() {
        let params = fixture_params();
        let (dry_score, dry) = compute_score(28.0, 25.0, 3.0, 4.0, 0.6, &params);
        let (wet_score, wet) = compute_score(28.0, 25.0, 20.0, 4.0, 0.6, &params);

        assert!(wet.get(Component::RainPen) > dry.get(Component::RainPen));
        assert!(wet.get(Component::WetPen) > dry.get(Component::WetPen));
        assert_eq!(wet.get(Component::RainPen), 20.0);
        assert!((wet.get(Component::WetPen) - 2.5).abs() < 1e-12);
        assert!(wet_score < dry_score);
        assert_eq!(wet_score, 58.0);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let params = fixture_params();
        let a = compute_score(19.3, 21.7, 11.0, 7.2, 1.4, &params);
        let b = compute_score(19.3, 21.7, 11.0, 7.2, 1.4, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn score_is_always_clamped() {
        let params = fixture_params();
        // Cold, wet, stormy: the raw sum is far below zero.
        let (terrible, c) = compute_score(-10.0, 5.0, 30.0, 25.0, 6.0, &params);
        let raw: f64 = Component::ALL.iter().map(|&k| c.signed(k)).sum();
        assert!(raw < 0.0);
        assert_eq!(terrible, 0.0);

        // Perfect sea plus every bonus cannot exceed 100 either.
        let (best, _) = compute_score(26.0, 30.0, 0.0, 4.0, 0.0, &params);
        assert!(best <= 100.0);
        assert!(best >= 0.0);
    }

    #[test]
    fn components_are_always_complete() {
        let params = fixture_params();
        let (_, calm) = compute_score(24.0, 24.5, 2.0, 3.0, 0.3, &params);
        let (_, storm) = compute_score(5.0, 8.0, 25.0, 20.0, 4.0, &params);
        for breakdown in [&calm, &storm] {
            let keys: Vec<Component> = breakdown.entries().map(|(c, _)| c).collect();
            assert_eq!(keys, Component::ALL.to_vec());
        }
        // Zero contributions stay enumerable.
        assert_eq!(calm.get(Component::BreathPen), 0.0);
    }

    #[test]
    fn sea_base_tiers_and_saturation() {
        let params = fixture_params();
        let at = |sea: f64| compute_score(25.0, sea, 0.0, 3.0, 0.0, &params).1.get(Component::SeaBase);

        assert_eq!(at(18.0), 0.0);
        assert_eq!(at(20.0), 0.0);
        assert_eq!(at(22.0), 25.0);
        assert_eq!(at(24.0), 50.0);
        assert_eq!(at(25.0), 75.0);
        assert_eq!(at(26.0), 100.0);
        // Midpoint of the s1..s2 segment interpolates.
        assert!((at(23.0) - 37.5).abs() < 1e-12);
        // Beyond sea_max the base saturates.
        assert_eq!(at(29.0), 100.0);
    }

    #[test]
    fn breeze_bonus_only_inside_the_band() {
        let params = fixture_params();
        let bonus = |wind: f64| {
            compute_score(28.0, 25.0, 3.0, wind, 0.0, &params)
                .1
                .get(Component::BreezeBonus)
        };
        assert_eq!(bonus(1.0), 0.0);
        assert_eq!(bonus(2.0), 0.0);
        assert!((bonus(4.0) - 3.0).abs() < 1e-12);
        assert_eq!(bonus(6.0), 0.0);
        assert_eq!(bonus(9.0), 0.0);
    }

    #[test]
    fn cold_wind_compounds_cold_air() {
        let params = fixture_params();
        let (_, calm_cold) = compute_score(10.0, 18.0, 3.0, 4.0, 0.2, &params);
        let (_, windy_cold) = compute_score(10.0, 18.0, 3.0, 9.0, 0.2, &params);
        assert_eq!(calm_cold.get(Component::Cold), 10.0);
        assert_eq!(calm_cold.get(Component::WindExCold), 0.0);
        assert!((windy_cold.get(Component::WindExCold) - 4.5).abs() < 1e-12);
    }

    #[test]
    fn wave_penalty_uses_both_segments() {
        let params = fixture_params();
        let pen = |wave: f64| {
            compute_score(28.0, 25.0, 3.0, 4.0, wave, &params)
                .1
                .get(Component::WavePen)
        };
        assert_eq!(pen(0.4), 0.0);
        assert_eq!(pen(1.2), 7.5);
        assert!((pen(1.6) - 11.25).abs() < 1e-12);
        assert_eq!(pen(2.0), 15.0);
        assert_eq!(pen(3.5), 15.0);
    }

    #[test]
    fn breath_penalty_is_a_joint_condition() {
        let params = fixture_params();
        let pen = |air: f64, rain: f64, wind: f64| {
            compute_score(air, 28.0, rain, wind, 0.2, &params)
                .1
                .get(Component::BreathPen)
        };
        assert_eq!(pen(31.0, 14.0, 2.0), 10.0);
        // Any single condition failing disables it.
        assert_eq!(pen(29.0, 14.0, 2.0), 0.0);
        assert_eq!(pen(31.0, 10.0, 2.0), 0.0);
        assert_eq!(pen(31.0, 14.0, 5.0), 0.0);
    }

    #[test]
    fn rounding_modes() {
        let mut params = fixture_params();
        params.rounding = Rounding::Step(0.1);
        let (score, _) = compute_score(28.0, 25.0, 3.0, 4.0, 0.6, &params);
        assert!((score - 80.4).abs() < 1e-9);

        params.rounding = Rounding::Integer;
        let (score, _) = compute_score(28.0, 25.0, 3.0, 4.0, 0.6, &params);
        assert_eq!(score, 80.0);
    }

    #[test]
    fn ranked_components_sort_by_magnitude() {
        let params = fixture_params();
        let result = score_month(7, 28.0, 25.0, 20.0, 4.0, 0.6, &params);
        let ranked = result.components.ranked();
        assert_eq!(ranked[0].0, Component::SeaBase);
        for window in ranked.windows(2) {
            assert!(window[0].1.abs() >= window[1].1.abs());
        }
        let top = result.components.top_penalties();
        assert_eq!(top[0].0, Component::RainPen);
    }

    #[test]
    fn score_month_reports_raw_sum() {
        let params = fixture_params();
        let result = score_month(1, -10.0, 5.0, 30.0, 25.0, 6.0, &params);
        assert!(result.raw_score < 0.0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.month, 1);
    }
}
