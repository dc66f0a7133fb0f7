//! Heart rate zone resolution and time-in-zone aggregation

use anyhow::{anyhow, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{AthleteSettings, HeartRateZones, ZoneTally};

/// Errors that can occur during zone calculations
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("Missing threshold value: {0}")]
    MissingThreshold(String),
    #[error("Invalid threshold value: {0}")]
    InvalidThreshold(String),
}

/// Zone resolution and aggregation utilities
pub struct ZoneAggregator;

impl ZoneAggregator {
    /// Resolve zone upper bounds from athlete settings.
    ///
    /// Custom bounds win when all four are present and non-zero; otherwise
    /// all four are derived from max heart rate at 60/70/80/90%. The
    /// resolution is all-or-nothing, never a per-boundary mix. With
    /// neither source available this is a configuration error, not a
    /// zero-filled default.
    pub fn resolve_thresholds(settings: &AthleteSettings) -> Result<HeartRateZones> {
        if let Some([z1, z2, z3, z4]) = settings.custom_zone_bounds() {
            if !(z1 < z2 && z2 < z3 && z3 < z4) {
                return Err(anyhow!(ZoneError::InvalidThreshold(format!(
                    "custom zone bounds must be strictly increasing, got {}/{}/{}/{}",
                    z1, z2, z3, z4
                ))));
            }
            return Ok(HeartRateZones {
                zone1_max: z1,
                zone2_max: z2,
                zone3_max: z3,
                zone4_max: z4,
            });
        }

        let max_hr = settings.max_hr.ok_or_else(|| {
            ZoneError::MissingThreshold(
                "either four custom zone bounds or a max heart rate is required".to_string(),
            )
        })?;

        Self::zones_from_max_hr(max_hr)
    }

    /// Derive zone upper bounds as fixed percentages of max heart rate:
    /// 60% / 70% / 80% / 90%
    pub fn zones_from_max_hr(max_hr: u16) -> Result<HeartRateZones> {
        Self::validate_heart_rate(max_hr, "Max HR")?;

        let max_hr_decimal = Decimal::from(max_hr);

        Ok(HeartRateZones {
            zone1_max: Self::calculate_percentage(max_hr_decimal, dec!(0.60))?,
            zone2_max: Self::calculate_percentage(max_hr_decimal, dec!(0.70))?,
            zone3_max: Self::calculate_percentage(max_hr_decimal, dec!(0.80))?,
            zone4_max: Self::calculate_percentage(max_hr_decimal, dec!(0.90))?,
        })
    }

    /// Determine which zone a heart rate sample falls into.
    ///
    /// A sample lands in the lowest zone whose upper bound is at least the
    /// sample value; anything above `zone4_max` is zone 5.
    pub fn zone_for_sample(hr: u16, zones: &HeartRateZones) -> u8 {
        if hr <= zones.zone1_max {
            1
        } else if hr <= zones.zone2_max {
            2
        } else if hr <= zones.zone3_max {
            3
        } else if hr <= zones.zone4_max {
            4
        } else {
            5
        }
    }

    /// Bucket every sample of a heart rate series into its zone.
    ///
    /// The five counts always sum to the input length; an empty series is
    /// a valid all-zero tally.
    pub fn tally_zones(samples: &[u16], zones: &HeartRateZones) -> ZoneTally {
        let mut tally = ZoneTally::default();

        for &hr in samples {
            match Self::zone_for_sample(hr, zones) {
                1 => tally.zone1 += 1,
                2 => tally.zone2 += 1,
                3 => tally.zone3 += 1,
                4 => tally.zone4 += 1,
                _ => tally.zone5 += 1,
            }
        }

        tally
    }

    fn calculate_percentage(value: Decimal, percentage: Decimal) -> Result<u16> {
        let rounded = (value * percentage).round();

        rounded
            .to_u16()
            .ok_or_else(|| anyhow!(ZoneError::InvalidThreshold(format!(
                "derived bound {} does not fit a heart rate",
                rounded
            ))))
    }

    fn validate_heart_rate(hr: u16, field_name: &str) -> Result<()> {
        if !(30..=220).contains(&hr) {
            return Err(anyhow!(ZoneError::InvalidThreshold(format!(
                "{} must be between 30 and 220 bpm, got {}",
                field_name, hr
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn custom_settings() -> AthleteSettings {
        AthleteSettings {
            zone1_max: Some(130),
            zone2_max: Some(150),
            zone3_max: Some(170),
            zone4_max: Some(190),
            ..Default::default()
        }
    }

    #[test]
    fn test_zones_from_max_hr() {
        // 190 × {0.60, 0.70, 0.80, 0.90} = {114, 133, 152, 171}
        let zones = ZoneAggregator::zones_from_max_hr(190).unwrap();
        assert_eq!(zones.zone1_max, 114);
        assert_eq!(zones.zone2_max, 133);
        assert_eq!(zones.zone3_max, 152);
        assert_eq!(zones.zone4_max, 171);
    }

    #[test]
    fn test_custom_bounds_take_precedence() {
        let mut settings = custom_settings();
        settings.max_hr = Some(190);

        let zones = ZoneAggregator::resolve_thresholds(&settings).unwrap();
        assert_eq!(zones.zone1_max, 130);
        assert_eq!(zones.zone4_max, 190);
    }

    #[test]
    fn test_partial_custom_bounds_fall_back_entirely() {
        // With one custom bound missing, all four come from max HR
        let mut settings = custom_settings();
        settings.zone2_max = None;
        settings.max_hr = Some(190);

        let zones = ZoneAggregator::resolve_thresholds(&settings).unwrap();
        assert_eq!(zones.zone1_max, 114);
        assert_eq!(zones.zone2_max, 133);
    }

    #[test]
    fn test_missing_configuration_is_an_error() {
        let settings = AthleteSettings::default();
        let err = ZoneAggregator::resolve_thresholds(&settings).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ZoneError>(),
            Some(ZoneError::MissingThreshold(_))
        ));
    }

    #[test]
    fn test_unordered_custom_bounds_rejected() {
        let mut settings = custom_settings();
        settings.zone3_max = Some(150); // equal to zone2_max
        assert!(ZoneAggregator::resolve_thresholds(&settings).is_err());
    }

    #[test]
    fn test_max_hr_range_validation() {
        assert!(ZoneAggregator::zones_from_max_hr(20).is_err());
        assert!(ZoneAggregator::zones_from_max_hr(221).is_err());
        assert!(ZoneAggregator::zones_from_max_hr(190).is_ok());
    }

    #[test]
    fn test_tally_mixed_intensity_series() {
        let zones = HeartRateZones {
            zone1_max: 130,
            zone2_max: 150,
            zone3_max: 170,
            zone4_max: 190,
        };
        // 50 and 120 are both ≤ 130, so zone 1 holds two samples
        let tally = ZoneAggregator::tally_zones(&[50, 120, 140, 160, 180, 200], &zones);
        assert_eq!(tally.zone1, 2);
        assert_eq!(tally.zone2, 1);
        assert_eq!(tally.zone3, 1);
        assert_eq!(tally.zone4, 1);
        assert_eq!(tally.zone5, 1);
        assert_eq!(tally.total(), 6);
    }

    #[test]
    fn test_boundary_sample_stays_in_lower_zone() {
        let zones = HeartRateZones {
            zone1_max: 130,
            zone2_max: 150,
            zone3_max: 170,
            zone4_max: 190,
        };
        assert_eq!(ZoneAggregator::zone_for_sample(130, &zones), 1);
        assert_eq!(ZoneAggregator::zone_for_sample(131, &zones), 2);
        assert_eq!(ZoneAggregator::zone_for_sample(190, &zones), 4);
        assert_eq!(ZoneAggregator::zone_for_sample(191, &zones), 5);
    }

    #[test]
    fn test_empty_series_is_a_valid_tally() {
        let zones = ZoneAggregator::zones_from_max_hr(190).unwrap();
        let tally = ZoneAggregator::tally_zones(&[], &zones);
        assert_eq!(tally, ZoneTally::default());
    }

    proptest! {
        #[test]
        fn prop_tally_counts_every_sample(samples in proptest::collection::vec(0u16..250, 0..500)) {
            let zones = ZoneAggregator::zones_from_max_hr(190).unwrap();
            let tally = ZoneAggregator::tally_zones(&samples, &zones);
            prop_assert_eq!(tally.total() as usize, samples.len());
        }
    }
}
