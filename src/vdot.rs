//! VDOT estimation and inversion
//!
//! Implements Jack Daniels' running-performance model: a VDOT score
//! (aerobic running capacity, typically 20-85) estimated from a single
//! race performance, inverted by bounded search to predict times at other
//! distances, and scaled by fixed intensity factors to derive the named
//! training paces.
//!
//! Two runs with equal VDOT are equivalent in predicted performance across
//! all distances, modulo the model's own approximation error.

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::error::CalculationError;
use crate::models::{PerformanceSample, RacePredictions, TimePrediction, TrainingPaces};

/// Search interval for inverting the model, in seconds (1 min to 10 h)
const SEARCH_MIN_SECONDS: u32 = 60;
const SEARCH_MAX_SECONDS: u32 = 36_000;

/// The inversion stops once the candidate VDOT is this close to target
const VDOT_TOLERANCE: f64 = 0.1;

/// Trailing window for selecting the best recent performance
const RECENT_WINDOW_DAYS: i64 = 30;

/// Intensity multipliers applied to VDOT when deriving training paces.
/// These five constants are the model's entire tuning surface.
const EASY_FACTOR: f64 = 0.72;
const MARATHON_FACTOR: f64 = 0.85;
const THRESHOLD_FACTOR: f64 = 0.855;
const INTERVAL_FACTOR: f64 = 0.975;
const REPETITION_FACTOR: f64 = 1.10;

/// VDOT analyzer for estimation, inversion and pace derivation
pub struct VdotAnalyzer;

impl VdotAnalyzer {
    /// Estimate VDOT from a single performance, rounded to one decimal.
    ///
    /// With `v` the velocity in m/min and `t` the elapsed time in minutes:
    /// `vo2 = -4.60 + 0.182258·v + 0.000104·v²`
    /// `percent_max = 0.8 + 0.1894393·e^(-0.012778·t) + 0.2989558·e^(-0.1932605·t)`
    /// `vdot = vo2 / percent_max`
    ///
    /// The percent-max curve bounds the aerobic share of the effort, so a
    /// short all-out performance does not overstate aerobic capacity.
    pub fn estimate_vdot(distance_km: f64, seconds: u32) -> Result<f64> {
        Self::validate_distance(distance_km)?;
        if seconds == 0 {
            return Err(anyhow!(CalculationError::InvalidParameter {
                calculation: "vdot".to_string(),
                parameter: "seconds".to_string(),
                value: seconds.to_string(),
            }));
        }

        let minutes = f64::from(seconds) / 60.0;
        let velocity = distance_km * 1000.0 / minutes;

        let percent_max = 0.8
            + 0.189_439_3 * (-0.012_778 * minutes).exp()
            + 0.298_955_8 * (-0.193_260_5 * minutes).exp();
        let vo2 = -4.60 + 0.182_258 * velocity + 0.000_104 * velocity * velocity;

        Ok((vo2 / percent_max * 10.0).round() / 10.0)
    }

    /// Invert the model: find the elapsed time at `distance_km` that
    /// produces the target VDOT.
    ///
    /// The forward formula has no closed-form inverse, so this runs a
    /// discrete binary search over seconds in [60, 36000]. A candidate
    /// whose VDOT exceeds the target is too fast, so the low bound moves
    /// up. The search stops within [`VDOT_TOLERANCE`] of the target or
    /// when the interval narrows to one second; in the latter case the
    /// closer interval bound is returned with `converged` false.
    pub fn predict_time_from_vdot(vdot: f64, distance_km: f64) -> Result<TimePrediction> {
        Self::validate_distance(distance_km)?;
        if !vdot.is_finite() || vdot <= 0.0 {
            return Err(anyhow!(CalculationError::InvalidParameter {
                calculation: "vdot_inversion".to_string(),
                parameter: "vdot".to_string(),
                value: vdot.to_string(),
            }));
        }

        let mut low = SEARCH_MIN_SECONDS;
        let mut high = SEARCH_MAX_SECONDS;

        while high - low > 1 {
            let mid = low + (high - low) / 2;
            let candidate = Self::estimate_vdot(distance_km, mid)?;

            if (candidate - vdot).abs() <= VDOT_TOLERANCE {
                return Ok(TimePrediction {
                    seconds: mid,
                    converged: true,
                });
            }

            if candidate > vdot {
                // More time at the same distance lowers the VDOT
                low = mid;
            } else {
                high = mid;
            }
        }

        // Interval exhausted without reaching tolerance; take the closer bound
        let low_delta = (Self::estimate_vdot(distance_km, low)? - vdot).abs();
        let high_delta = (Self::estimate_vdot(distance_km, high)? - vdot).abs();
        let seconds = if low_delta <= high_delta { low } else { high };

        debug!(
            vdot,
            distance_km, seconds, "VDOT inversion did not reach tolerance"
        );

        Ok(TimePrediction {
            seconds,
            converged: false,
        })
    }

    /// Derive the five named training paces from a VDOT score.
    ///
    /// Each pace is the predicted time over one kilometer at the VDOT
    /// scaled by that intensity's factor.
    pub fn derive_training_paces(vdot: f64) -> Result<TrainingPaces> {
        Ok(TrainingPaces {
            easy: Self::pace_for_intensity(vdot, EASY_FACTOR)?,
            marathon: Self::pace_for_intensity(vdot, MARATHON_FACTOR)?,
            threshold: Self::pace_for_intensity(vdot, THRESHOLD_FACTOR)?,
            interval: Self::pace_for_intensity(vdot, INTERVAL_FACTOR)?,
            repetition: Self::pace_for_intensity(vdot, REPETITION_FACTOR)?,
        })
    }

    /// Predict finish times for the four standard race distances
    pub fn derive_race_predictions(vdot: f64) -> Result<RacePredictions> {
        Ok(RacePredictions {
            time_5k: Self::race_time(vdot, 5.0)?,
            time_10k: Self::race_time(vdot, 10.0)?,
            time_half_marathon: Self::race_time(vdot, 21.0975)?,
            time_marathon: Self::race_time(vdot, 42.195)?,
        })
    }

    /// Best VDOT over the trailing 30 days of `as_of`, or `None` when no
    /// performance qualifies.
    ///
    /// The maximum per-sample estimate wins: the strongest recent run is
    /// the best available fitness signal. Samples dated after `as_of` are
    /// not history and are excluded.
    pub fn best_recent_vdot(samples: &[PerformanceSample], as_of: NaiveDate) -> Option<f64> {
        let window_start = as_of - Duration::days(RECENT_WINDOW_DAYS);

        samples
            .iter()
            .filter(|s| s.date >= window_start && s.date <= as_of)
            .filter_map(|s| match Self::estimate_vdot(s.distance_km, s.seconds) {
                Ok(vdot) => Some(vdot),
                Err(err) => {
                    warn!(
                        distance_km = s.distance_km,
                        seconds = s.seconds,
                        %err,
                        "skipping unusable performance sample"
                    );
                    None
                }
            })
            .fold(None, |best, vdot| match best {
                Some(current) if current >= vdot => Some(current),
                _ => Some(vdot),
            })
    }

    fn pace_for_intensity(vdot: f64, factor: f64) -> Result<u32> {
        let prediction = Self::predict_time_from_vdot(vdot * factor, 1.0)?;
        if !prediction.converged {
            debug!(vdot, factor, "training pace inversion did not converge");
        }
        Ok(prediction.seconds)
    }

    fn race_time(vdot: f64, distance_km: f64) -> Result<u32> {
        let prediction = Self::predict_time_from_vdot(vdot, distance_km)?;
        if !prediction.converged {
            debug!(vdot, distance_km, "race prediction did not converge");
        }
        Ok(prediction.seconds)
    }

    fn validate_distance(distance_km: f64) -> Result<()> {
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(anyhow!(CalculationError::InvalidParameter {
                calculation: "vdot".to_string(),
                parameter: "distance_km".to_string(),
                value: distance_km.to_string(),
            }));
        }
        Ok(())
    }
}
