use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single completed run usable for fitness estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    /// Distance covered in kilometers
    pub distance_km: f64,

    /// Elapsed time in whole seconds
    pub seconds: u32,

    /// Date the run was completed
    pub date: NaiveDate,
}

impl PerformanceSample {
    /// Pace in seconds per kilometer
    pub fn pace_seconds_per_km(&self) -> f64 {
        f64::from(self.seconds) / self.distance_km
    }
}

/// Predicted finish times for the standard race distances, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RacePredictions {
    /// 5K finish time
    pub time_5k: u32,

    /// 10K finish time
    pub time_10k: u32,

    /// Half marathon (21.0975 km) finish time
    pub time_half_marathon: u32,

    /// Marathon (42.195 km) finish time
    pub time_marathon: u32,
}

impl RacePredictions {
    /// Label/time pairs in distance order, for display
    pub fn entries(&self) -> [(&'static str, u32); 4] {
        [
            ("5K", self.time_5k),
            ("10K", self.time_10k),
            ("Half Marathon", self.time_half_marathon),
            ("Marathon", self.time_marathon),
        ]
    }
}

/// Training paces derived from a VDOT score, in seconds per kilometer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPaces {
    /// Easy/recovery pace
    pub easy: u32,

    /// Marathon race pace
    pub marathon: u32,

    /// Threshold/tempo pace
    pub threshold: u32,

    /// Interval (VO2max) pace
    pub interval: u32,

    /// Repetition (speed work) pace
    pub repetition: u32,
}

impl TrainingPaces {
    /// Label/pace pairs from slowest to fastest intensity, for display
    pub fn entries(&self) -> [(&'static str, u32); 5] {
        [
            ("Easy", self.easy),
            ("Marathon", self.marathon),
            ("Threshold", self.threshold),
            ("Interval", self.interval),
            ("Repetition", self.repetition),
        ]
    }
}

/// Result of inverting a VDOT score to a finish time
///
/// The inversion is a bounded search, not a guaranteed root-find: for
/// targets outside practical running speeds the search can exhaust its
/// interval without reaching tolerance, in which case `converged` is false
/// and `seconds` holds the closest interval bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePrediction {
    /// Predicted elapsed time in seconds
    pub seconds: u32,

    /// Whether the search reached the VDOT tolerance
    pub converged: bool,
}

/// Heart rate zone upper bounds (5-zone model)
///
/// Zone 5 is unbounded above `zone4_max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateZones {
    pub zone1_max: u16, // Active Recovery
    pub zone2_max: u16, // Aerobic Base
    pub zone3_max: u16, // Aerobic
    pub zone4_max: u16, // Lactate Threshold
}

/// Time-in-zone counts for one run
///
/// Counts are samples; at 1 Hz sampling they read directly as seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTally {
    pub zone1: u32,
    pub zone2: u32,
    pub zone3: u32,
    pub zone4: u32,
    pub zone5: u32,
}

impl ZoneTally {
    /// Total samples across all five zones
    pub fn total(&self) -> u32 {
        self.zone1 + self.zone2 + self.zone3 + self.zone4 + self.zone5
    }

    /// Zone/count pairs in zone order, for display
    pub fn entries(&self) -> [(u8, u32); 5] {
        [
            (1, self.zone1),
            (2, self.zone2),
            (3, self.zone3),
            (4, self.zone4),
            (5, self.zone5),
        ]
    }
}

/// Measurement units preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

/// Athlete settings containing thresholds and personal data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteSettings {
    /// Athlete's display name
    pub name: String,

    /// Maximum heart rate, used to derive zone bounds when no custom
    /// bounds are set
    pub max_hr: Option<u16>,

    /// Custom zone 1 upper bound (bpm)
    pub zone1_max: Option<u16>,

    /// Custom zone 2 upper bound (bpm)
    pub zone2_max: Option<u16>,

    /// Custom zone 3 upper bound (bpm)
    pub zone3_max: Option<u16>,

    /// Custom zone 4 upper bound (bpm)
    pub zone4_max: Option<u16>,

    /// Preferred units for pace display
    pub preferred_units: Units,
}

impl Default for AthleteSettings {
    fn default() -> Self {
        Self {
            name: "Athlete".to_string(),
            max_hr: None,
            zone1_max: None,
            zone2_max: None,
            zone3_max: None,
            zone4_max: None,
            preferred_units: Units::Metric,
        }
    }
}

impl AthleteSettings {
    /// All four custom zone bounds, if every one is present and non-zero
    ///
    /// Custom bounds are all-or-nothing: a partial set never mixes with
    /// max-HR-derived bounds.
    pub fn custom_zone_bounds(&self) -> Option<[u16; 4]> {
        match (self.zone1_max, self.zone2_max, self.zone3_max, self.zone4_max) {
            (Some(z1), Some(z2), Some(z3), Some(z4))
                if z1 > 0 && z2 > 0 && z3 > 0 && z4 > 0 =>
            {
                Some([z1, z2, z3, z4])
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pace_seconds_per_km() {
        let sample = PerformanceSample {
            distance_km: 10.0,
            seconds: 2700,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(sample.pace_seconds_per_km(), 270.0);
    }

    #[test]
    fn test_zone_tally_total() {
        let tally = ZoneTally {
            zone1: 2,
            zone2: 1,
            zone3: 1,
            zone4: 1,
            zone5: 1,
        };
        assert_eq!(tally.total(), 6);
        assert_eq!(ZoneTally::default().total(), 0);
    }

    #[test]
    fn test_custom_zone_bounds_all_or_nothing() {
        let mut settings = AthleteSettings {
            zone1_max: Some(130),
            zone2_max: Some(150),
            zone3_max: Some(170),
            zone4_max: Some(190),
            ..Default::default()
        };
        assert_eq!(settings.custom_zone_bounds(), Some([130, 150, 170, 190]));

        // One missing bound disables the whole custom set
        settings.zone3_max = None;
        assert_eq!(settings.custom_zone_bounds(), None);

        // A zero bound counts as missing
        settings.zone3_max = Some(0);
        assert_eq!(settings.custom_zone_bounds(), None);
    }

    #[test]
    fn test_settings_serialization() {
        let settings = AthleteSettings {
            name: "Test Runner".to_string(),
            max_hr: Some(190),
            ..Default::default()
        };

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"max_hr\":190"));

        let deserialized: AthleteSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, settings);
    }
}
