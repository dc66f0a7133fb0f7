//! Riegel race-time prediction
//!
//! Extrapolates a finish time at one distance from a performance at
//! another using Riegel's power-law fatigue model:
//! `t2 = t1 * (d2 / d1) ^ 1.06`.

use anyhow::{anyhow, Result};
use std::cmp::Ordering;

use crate::error::CalculationError;
use crate::models::{PerformanceSample, RacePredictions};

/// Empirical fatigue-factor exponent. Fixed, not user-configurable.
pub const RIEGEL_EXPONENT: f64 = 1.06;

/// Race-time predictor based on the Riegel model
pub struct RiegelPredictor;

impl RiegelPredictor {
    /// Predict the finish time at `target_distance_km` from a known
    /// performance, in seconds (fractional seconds floored).
    ///
    /// A target equal to the known distance returns the known time
    /// unchanged, since the distance ratio exponentiates to exactly 1.
    pub fn predict_time(
        known_distance_km: f64,
        known_seconds: u32,
        target_distance_km: f64,
    ) -> Result<u32> {
        Self::validate_distance(known_distance_km, "known_distance_km")?;
        Self::validate_distance(target_distance_km, "target_distance_km")?;
        if known_seconds == 0 {
            return Err(anyhow!(CalculationError::InvalidParameter {
                calculation: "riegel".to_string(),
                parameter: "known_seconds".to_string(),
                value: known_seconds.to_string(),
            }));
        }

        let ratio = target_distance_km / known_distance_km;
        let predicted = f64::from(known_seconds) * ratio.powf(RIEGEL_EXPONENT);

        Ok(predicted.floor() as u32)
    }

    /// Predict finish times for the four standard race distances
    pub fn predict_standard_distances(
        known_distance_km: f64,
        known_seconds: u32,
    ) -> Result<RacePredictions> {
        Ok(RacePredictions {
            time_5k: Self::predict_time(known_distance_km, known_seconds, 5.0)?,
            time_10k: Self::predict_time(known_distance_km, known_seconds, 10.0)?,
            time_half_marathon: Self::predict_time(known_distance_km, known_seconds, 21.0975)?,
            time_marathon: Self::predict_time(known_distance_km, known_seconds, 42.195)?,
        })
    }

    /// Select the reference performance from a history: the sample with
    /// the fastest pace wins, ties broken by encounter order.
    pub fn best_reference(samples: &[PerformanceSample]) -> Option<&PerformanceSample> {
        samples
            .iter()
            .filter(|s| s.distance_km > 0.0 && s.seconds > 0)
            .min_by(|a, b| {
                a.pace_seconds_per_km()
                    .partial_cmp(&b.pace_seconds_per_km())
                    .unwrap_or(Ordering::Equal)
            })
    }

    fn validate_distance(distance_km: f64, parameter: &str) -> Result<()> {
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(anyhow!(CalculationError::InvalidParameter {
                calculation: "riegel".to_string(),
                parameter: parameter.to_string(),
                value: distance_km.to_string(),
            }));
        }
        Ok(())
    }
}
