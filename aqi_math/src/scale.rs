//! EPA-style Air Quality Index scale
//!
//! Maps a pollutant concentration onto the 0-500 index through a fixed
//! piecewise-linear breakpoint table, and maps an index value onto one of the
//! six health categories.
//!
//! ```
//! use aqi_math::scale::{calculate_aqi, category_for, AqiCategory};
//!
//! assert_eq!(calculate_aqi(12.0, "pm25"), Some(50));
//! assert_eq!(category_for(51), AqiCategory::Moderate);
//! ```

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lowest value on the index
pub const AQI_MIN: u16 = 0;
/// Highest value on the index; concentrations above every breakpoint saturate here
pub const AQI_MAX: u16 = 500;

/// One row of a breakpoint table: concentrations in `[c_low, c_high]` map
/// linearly onto `[aqi_low, aqi_high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub c_low: f64,
    pub c_high: f64,
    pub aqi_low: u16,
    pub aqi_high: u16,
}

impl Breakpoint {
    const fn new(c_low: f64, c_high: f64, aqi_low: u16, aqi_high: u16) -> Self {
        Self {
            c_low,
            c_high,
            aqi_low,
            aqi_high,
        }
    }

    /// Linear interpolation of a concentration inside this row
    fn interpolate(&self, concentration: f64) -> u16 {
        let aqi_span = f64::from(self.aqi_high - self.aqi_low);
        let c_span = self.c_high - self.c_low;
        let aqi = aqi_span / c_span * (concentration - self.c_low) + f64::from(self.aqi_low);
        aqi.round().clamp(f64::from(AQI_MIN), f64::from(AQI_MAX)) as u16
    }
}

const PM25: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 12.0, 0, 50),
    Breakpoint::new(12.1, 35.4, 51, 100),
    Breakpoint::new(35.5, 55.4, 101, 150),
    Breakpoint::new(55.5, 150.4, 151, 200),
    Breakpoint::new(150.5, 250.4, 201, 300),
    Breakpoint::new(250.5, 500.4, 301, 500),
];

const PM10: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 54.0, 0, 50),
    Breakpoint::new(55.0, 154.0, 51, 100),
    Breakpoint::new(155.0, 254.0, 101, 150),
    Breakpoint::new(255.0, 354.0, 151, 200),
    Breakpoint::new(355.0, 424.0, 201, 300),
    Breakpoint::new(425.0, 604.0, 301, 500),
];

const NO2: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 53.0, 0, 50),
    Breakpoint::new(54.0, 100.0, 51, 100),
    Breakpoint::new(101.0, 360.0, 101, 150),
    Breakpoint::new(361.0, 649.0, 151, 200),
    Breakpoint::new(650.0, 1249.0, 201, 300),
    Breakpoint::new(1250.0, 2049.0, 301, 500),
];

const O3: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 54.0, 0, 50),
    Breakpoint::new(55.0, 70.0, 51, 100),
    Breakpoint::new(71.0, 85.0, 101, 150),
    Breakpoint::new(86.0, 105.0, 151, 200),
    Breakpoint::new(106.0, 200.0, 201, 300),
    Breakpoint::new(201.0, 500.0, 301, 500),
];

const SO2: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 35.0, 0, 50),
    Breakpoint::new(36.0, 75.0, 51, 100),
    Breakpoint::new(76.0, 185.0, 101, 150),
    Breakpoint::new(186.0, 304.0, 151, 200),
    Breakpoint::new(305.0, 604.0, 201, 300),
    Breakpoint::new(605.0, 1004.0, 301, 500),
];

const CO: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 4.4, 0, 50),
    Breakpoint::new(4.5, 9.4, 51, 100),
    Breakpoint::new(9.5, 12.4, 101, 150),
    Breakpoint::new(12.5, 15.4, 151, 200),
    Breakpoint::new(15.5, 30.4, 201, 300),
    Breakpoint::new(30.5, 50.4, 301, 500),
];

/// Pollutants with a breakpoint table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
    O3,
    So2,
    Co,
}

impl Pollutant {
    /// All recognized pollutants, in table order
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Lowercase key used by measurement feeds (`pm25`, `no2`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    /// Breakpoint table for this pollutant, Good through Hazardous
    pub fn breakpoints(&self) -> &'static [Breakpoint; 6] {
        match self {
            Pollutant::Pm25 => &PM25,
            Pollutant::Pm10 => &PM10,
            Pollutant::No2 => &NO2,
            Pollutant::O3 => &O3,
            Pollutant::So2 => &SO2,
            Pollutant::Co => &CO,
        }
    }

    /// Index value for a concentration of this pollutant.
    ///
    /// Returns `None` for negative or non-finite concentrations. A
    /// concentration above the last row saturates at [`AQI_MAX`]; one that
    /// falls in the gap between two rows is interpolated on the upper row.
    pub fn aqi(&self, concentration: f64) -> Option<u16> {
        if !concentration.is_finite() || concentration < 0.0 {
            return None;
        }

        let aqi = self
            .breakpoints()
            .iter()
            .find(|bp| concentration <= bp.c_high)
            .map(|bp| bp.interpolate(concentration))
            .unwrap_or(AQI_MAX);

        Some(aqi)
    }
}

impl FromStr for Pollutant {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Pollutant::ALL
            .iter()
            .copied()
            .find(|p| p.key() == key)
            .ok_or_else(|| MathError::InvalidInput(format!("Unknown pollutant: {:?}", s)))
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Health category of an index value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Step function over the six bands
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category of an index value
pub fn category_for(aqi: u16) -> AqiCategory {
    AqiCategory::from_aqi(aqi)
}

/// Index value for a concentration of the pollutant named by `pollutant`.
///
/// Returns `None` when the concentration is negative or non-finite, or the
/// pollutant key is not one of `pm25`, `pm10`, `no2`, `o3`, `so2`, `co`
/// (case-insensitive).
pub fn calculate_aqi(concentration: f64, pollutant: &str) -> Option<u16> {
    pollutant.parse::<Pollutant>().ok()?.aqi(concentration)
}

/// Whether an index value is strictly above an alert threshold
pub fn is_alert_threshold_exceeded(aqi: u16, threshold: u16) -> bool {
    aqi > threshold
}

/// Daily index aggregated over several pollutants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAqi {
    /// Worst per-pollutant index of the day
    pub aqi: u16,
    /// Category of `aqi`
    pub category: AqiCategory,
    /// Per-pollutant index values that contributed
    pub breakdown: BTreeMap<Pollutant, u16>,
}

impl DailyAqi {
    /// Pollutant responsible for the daily value
    pub fn dominant_pollutant(&self) -> Option<Pollutant> {
        self.breakdown
            .iter()
            .find(|(_, &aqi)| aqi == self.aqi)
            .map(|(pollutant, _)| *pollutant)
    }
}

/// Daily index from a set of `(pollutant, concentration)` measurements.
///
/// The worst pollutant dominates: the daily value is the maximum of the
/// individual values. Unknown pollutants and invalid concentrations are
/// skipped. Returns `None` (category "Unknown") when nothing yields a value.
pub fn calculate_daily_aqi<I, K>(measurements: I) -> Option<DailyAqi>
where
    I: IntoIterator<Item = (K, f64)>,
    K: AsRef<str>,
{
    let mut breakdown = BTreeMap::new();

    for (key, concentration) in measurements {
        let Ok(pollutant) = key.as_ref().parse::<Pollutant>() else {
            continue;
        };
        if let Some(aqi) = pollutant.aqi(concentration) {
            breakdown.insert(pollutant, aqi);
        }
    }

    let aqi = breakdown.values().copied().max()?;

    Some(DailyAqi {
        aqi,
        category: category_for(aqi),
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0)]
    #[case(10.0, 42)]
    #[case(12.0, 50)]
    #[case(12.1, 51)]
    #[case(35.4, 100)]
    #[case(35.5, 101)]
    #[case(55.4, 150)]
    #[case(150.4, 200)]
    #[case(250.4, 300)]
    #[case(500.4, 500)]
    #[case(1000.0, 500)]
    fn test_pm25_breakpoints(#[case] concentration: f64, #[case] expected: u16) {
        assert_eq!(calculate_aqi(concentration, "pm25"), Some(expected));
    }

    #[test]
    fn test_other_pollutants() {
        assert_eq!(calculate_aqi(30.0, "pm10"), Some(28));
        assert_eq!(calculate_aqi(54.0, "pm10"), Some(50));
        assert_eq!(calculate_aqi(154.0, "pm10"), Some(100));
        assert_eq!(calculate_aqi(53.0, "no2"), Some(50));
        assert_eq!(calculate_aqi(100.0, "no2"), Some(100));
        assert_eq!(calculate_aqi(54.0, "o3"), Some(50));
        assert_eq!(calculate_aqi(70.0, "o3"), Some(100));
        assert_eq!(calculate_aqi(35.0, "so2"), Some(50));
        assert_eq!(calculate_aqi(4.4, "co"), Some(50));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(calculate_aqi(-1.0, "pm25"), None);
        assert_eq!(calculate_aqi(f64::NAN, "pm25"), None);
        assert_eq!(calculate_aqi(25.0, "unknown_pollutant"), None);
        assert_eq!(calculate_aqi(25.0, ""), None);
    }

    #[test]
    fn test_pollutant_keys_are_case_insensitive() {
        assert_eq!("PM25".parse::<Pollutant>(), Ok(Pollutant::Pm25));
        assert_eq!(" o3 ".parse::<Pollutant>(), Ok(Pollutant::O3));
        assert_eq!(calculate_aqi(12.0, "PM25"), Some(50));
    }

    #[test]
    fn test_gap_between_rows_uses_upper_row() {
        // 12.05 sits between the Good and Moderate rows
        assert_eq!(calculate_aqi(12.05, "pm25"), Some(51));
    }

    #[test]
    fn test_category_bands() {
        assert_eq!(category_for(0), AqiCategory::Good);
        assert_eq!(category_for(50), AqiCategory::Good);
        assert_eq!(category_for(51), AqiCategory::Moderate);
        assert_eq!(category_for(125), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(category_for(175), AqiCategory::Unhealthy);
        assert_eq!(category_for(250), AqiCategory::VeryUnhealthy);
        assert_eq!(category_for(500), AqiCategory::Hazardous);
        assert_eq!(category_for(500).label(), "Hazardous");
    }

    #[test]
    fn test_category_is_monotonic() {
        let mut previous = category_for(0);
        for aqi in 1..=AQI_MAX {
            let current = category_for(aqi);
            assert!(current >= previous, "category decreased at {}", aqi);
            previous = current;
        }
    }

    #[test]
    fn test_daily_aqi_takes_worst_pollutant() {
        let daily = calculate_daily_aqi([("pm25", 25.0), ("pm10", 45.0), ("no2", 35.0), ("o3", 65.0)])
            .unwrap();

        assert_eq!(daily.breakdown.len(), 4);
        assert_eq!(daily.aqi, *daily.breakdown.values().max().unwrap());
        assert_eq!(daily.aqi, 84);
        assert_eq!(daily.category, category_for(daily.aqi));
        assert_eq!(daily.dominant_pollutant(), Some(Pollutant::O3));
    }

    #[test]
    fn test_daily_aqi_unknown_when_nothing_valid() {
        assert!(calculate_daily_aqi([("lead", 3.0), ("pm25", -2.0)]).is_none());
        assert!(calculate_daily_aqi(Vec::<(String, f64)>::new()).is_none());
    }

    #[test]
    fn test_alert_threshold_is_strict() {
        assert!(!is_alert_threshold_exceeded(75, 100));
        assert!(!is_alert_threshold_exceeded(100, 100));
        assert!(is_alert_threshold_exceeded(101, 100));
    }
}
