//! Synthetic charge/discharge voltage traces
//!
//! A logistic curve centred on the midpoint of the run, plus Gaussian
//! measurement noise, clamped back into the voltage span. This is a display
//! aid, not an electrochemical model.
//!
//! Duration of a run is `capacity_mAh / (current_A * 1000)` hours.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::cell::CellRecord;
use crate::{Error, Result};

/// Number of samples in every generated curve.
pub const SAMPLE_COUNT: usize = 100;

/// Logistic steepness.
pub const STEEPNESS: f64 = 12.0;

/// Standard deviation of the additive noise (V).
pub const NOISE_STD_DEV: f64 = 0.02;

/// Start voltage of a per-cell charge profile, as a fraction of the cell's
/// measured voltage.
pub const CHARGE_START_FACTOR: f64 = 0.9;

/// Direction of a simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveDirection {
    /// Voltage rises from start to max
    Charge,
    /// Voltage falls from max to min
    Discharge,
}

/// One sample of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Elapsed time (hours)
    pub time_hours: f64,
    /// Voltage (V)
    pub voltage: f64,
}

/// A generated voltage-vs-time trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    direction: CurveDirection,
    points: Vec<CurvePoint>,
}

impl Curve {
    /// Direction of the run.
    #[must_use]
    pub const fn direction(&self) -> CurveDirection {
        self.direction
    }

    /// All samples, in time order.
    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the curve has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total duration (hours).
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.time_hours)
    }

    /// Sample times in minutes (the plotting axis).
    #[must_use]
    pub fn times_minutes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time_hours * 60.0).collect()
    }

    /// Write as two-column CSV (`Time (h),Voltage (V)`).
    ///
    /// # Errors
    ///
    /// Returns `Csv` if the underlying writer fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        writer.write_record(["Time (h)", "Voltage (V)"])?;
        for p in &self.points {
            writer.write_record([p.time_hours.to_string(), p.voltage.to_string()])?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Render as a two-column CSV string.
    ///
    /// # Errors
    ///
    /// Returns `Csv` if encoding fails.
    pub fn to_csv(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| Error::InvalidArgument(format!("CSV output is not UTF-8: {e}")))
    }
}

/// Simulate a charge from `v_start` up to `v_max`.
///
/// `v(t) = v_start + (v_max - v_start) / (1 + exp(-12 (t/t_end - 0.5)))`
/// plus N(0, 0.02) noise, clamped into `[min(v_start, v_max), max(..)]`.
///
/// Sample times are strictly increasing when `capacity_mah > 0`. With zero
/// capacity the run has no duration: every sample sits at `t = 0` and only
/// the voltage varies along the sample index.
///
/// # Errors
///
/// - `DivisionByZero` if `current_a` is zero
/// - `InvalidArgument` if the current is negative, the capacity is
///   negative, or any input is not finite
///
/// # Example
///
/// ```rust
/// use cellbench::curve::charge_curve;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let curve = charge_curve(3.0, 3.4, 3000.0, 1.5, &mut rng)?;
/// assert_eq!(curve.len(), 100);
/// assert!((curve.duration_hours() - 2.0).abs() < 1e-9);
/// # Ok::<(), cellbench::Error>(())
/// ```
pub fn charge_curve<R: Rng + ?Sized>(
    v_start: f64,
    v_max: f64,
    capacity_mah: f64,
    current_a: f64,
    rng: &mut R,
) -> Result<Curve> {
    let t_end = run_duration_hours(capacity_mah, current_a)?;
    check_finite("v_start", v_start)?;
    check_finite("v_max", v_max)?;

    let points = sample(t_end, (v_start, v_max), rng, |fraction| {
        v_start + (v_max - v_start) / (1.0 + (-STEEPNESS * (fraction - 0.5)).exp())
    })?;

    Ok(Curve {
        direction: CurveDirection::Charge,
        points,
    })
}

/// Simulate a discharge from `v_max` down to `v_min`.
///
/// Mirror of [`charge_curve`]:
/// `v(t) = v_min + (v_max - v_min) / (1 + exp(+12 (t/t_end - 0.5)))`,
/// same noise and clamp policy.
///
/// # Errors
///
/// Same as [`charge_curve`].
pub fn discharge_curve<R: Rng + ?Sized>(
    v_max: f64,
    v_min: f64,
    capacity_mah: f64,
    current_a: f64,
    rng: &mut R,
) -> Result<Curve> {
    let t_end = run_duration_hours(capacity_mah, current_a)?;
    check_finite("v_max", v_max)?;
    check_finite("v_min", v_min)?;

    let points = sample(t_end, (v_min, v_max), rng, |fraction| {
        v_min + (v_max - v_min) / (1.0 + (STEEPNESS * (fraction - 0.5)).exp())
    })?;

    Ok(Curve {
        direction: CurveDirection::Discharge,
        points,
    })
}

/// Charge profile for a cell: from 90% of its voltage up to its band max.
///
/// # Errors
///
/// Same as [`charge_curve`].
pub fn charge_profile<R: Rng + ?Sized>(cell: &CellRecord, rng: &mut R) -> Result<Curve> {
    charge_curve(
        cell.voltage() * CHARGE_START_FACTOR,
        cell.max_voltage(),
        cell.capacity(),
        cell.current(),
        rng,
    )
}

/// Discharge profile for a cell: from its voltage down to its band min.
///
/// # Errors
///
/// Same as [`discharge_curve`].
pub fn discharge_profile<R: Rng + ?Sized>(cell: &CellRecord, rng: &mut R) -> Result<Curve> {
    discharge_curve(
        cell.voltage(),
        cell.min_voltage(),
        cell.capacity(),
        cell.current(),
        rng,
    )
}

fn run_duration_hours(capacity_mah: f64, current_a: f64) -> Result<f64> {
    check_finite("capacity", capacity_mah)?;
    check_finite("current", current_a)?;
    if current_a == 0.0 {
        return Err(Error::DivisionByZero(
            "curve simulation requires a non-zero current".to_string(),
        ));
    }
    if current_a < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "current must be positive, got {current_a}"
        )));
    }
    if capacity_mah < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "capacity must be non-negative, got {capacity_mah}"
        )));
    }
    Ok(capacity_mah / (current_a * 1000.0))
}

/// Evaluate `model` at `SAMPLE_COUNT` evenly spaced fractions of `t_end`,
/// add noise and clamp into the span of `bounds`.
///
/// The model takes the sample fraction `i / (N - 1)` directly, which equals
/// `t / t_end` for a positive duration and stays defined for a zero one.
#[allow(clippy::cast_precision_loss)]
fn sample<R, F>(t_end: f64, bounds: (f64, f64), rng: &mut R, model: F) -> Result<Vec<CurvePoint>>
where
    R: Rng + ?Sized,
    F: Fn(f64) -> f64,
{
    let noise = Normal::new(0.0, NOISE_STD_DEV)
        .map_err(|e| Error::InvalidArgument(format!("noise distribution: {e}")))?;
    let lo = bounds.0.min(bounds.1);
    let hi = bounds.0.max(bounds.1);
    let last = (SAMPLE_COUNT - 1) as f64;

    Ok((0..SAMPLE_COUNT)
        .map(|i| {
            let fraction = i as f64 / last;
            let voltage = (model(fraction) + noise.sample(&mut *rng)).clamp(lo, hi);
            CurvePoint {
                time_hours: t_end * fraction,
                voltage,
            }
        })
        .collect())
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("{name} must be finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn test_charge_curve_shape() {
        let curve = charge_curve(2.9, 3.4, 3000.0, 3.0, &mut rng()).unwrap();
        assert_eq!(curve.len(), SAMPLE_COUNT);
        assert_eq!(curve.direction(), CurveDirection::Charge);
        assert!((curve.duration_hours() - 1.0).abs() < 1e-12);
        assert!(curve.points()[0].time_hours.abs() < f64::EPSILON);
        for p in curve.points() {
            assert!((2.9..=3.4).contains(&p.voltage));
        }
        // logistic rises: last quarter above first quarter on average
        let first: f64 = curve.points()[..25].iter().map(|p| p.voltage).sum::<f64>() / 25.0;
        let last: f64 = curve.points()[75..].iter().map(|p| p.voltage).sum::<f64>() / 25.0;
        assert!(last > first);
    }

    #[test]
    fn test_discharge_curve_falls() {
        let curve = discharge_curve(4.0, 3.2, 3000.0, 2.0, &mut rng()).unwrap();
        assert_eq!(curve.direction(), CurveDirection::Discharge);
        let first: f64 = curve.points()[..25].iter().map(|p| p.voltage).sum::<f64>() / 25.0;
        let last: f64 = curve.points()[75..].iter().map(|p| p.voltage).sum::<f64>() / 25.0;
        assert!(first > last);
        for p in curve.points() {
            assert!((3.2..=4.0).contains(&p.voltage));
        }
    }

    #[test]
    fn test_reversed_bounds_clamp() {
        // v_start above v_max: clamp uses min/max of the two
        let curve = charge_curve(3.6, 3.0, 1000.0, 1.0, &mut rng()).unwrap();
        for p in curve.points() {
            assert!((3.0..=3.6).contains(&p.voltage));
        }
    }

    #[test]
    fn test_zero_current_is_division_by_zero() {
        let err = charge_curve(3.0, 3.4, 3000.0, 0.0, &mut rng()).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero(_)));
        let err = discharge_curve(3.4, 3.0, 3000.0, 0.0, &mut rng()).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero(_)));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(matches!(
            charge_curve(3.0, 3.4, 3000.0, -1.0, &mut rng()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            charge_curve(3.0, 3.4, -5.0, 1.0, &mut rng()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            charge_curve(f64::NAN, 3.4, 3000.0, 1.0, &mut rng()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_capacity_has_no_nan() {
        let curve = charge_curve(3.0, 3.4, 0.0, 1.0, &mut rng()).unwrap();
        assert_eq!(curve.len(), SAMPLE_COUNT);
        assert!(curve.points().iter().all(|p| p.voltage.is_finite()));
        assert!(curve.points().iter().all(|p| p.time_hours == 0.0));
    }

    #[test]
    fn test_cell_profiles_use_band() {
        let cell = CellRecord::builder(1, CellType::Nmc)
            .voltage(3.6)
            .current(2.0)
            .capacity(3000.0)
            .build()
            .unwrap();
        let charge = charge_profile(&cell, &mut rng()).unwrap();
        for p in charge.points() {
            assert!(p.voltage >= 3.6 * CHARGE_START_FACTOR - 1e-12 && p.voltage <= 4.0);
        }
        let discharge = discharge_profile(&cell, &mut rng()).unwrap();
        for p in discharge.points() {
            assert!((3.2..=3.6).contains(&p.voltage));
        }
    }

    #[test]
    fn test_minutes_and_csv() {
        let curve = charge_curve(3.0, 3.4, 1000.0, 1.0, &mut rng()).unwrap();
        let minutes = curve.times_minutes();
        assert!((minutes[SAMPLE_COUNT - 1] - 60.0).abs() < 1e-9);
        let csv = curve.to_csv().unwrap();
        assert!(csv.starts_with("Time (h),Voltage (V)\n"));
        assert_eq!(csv.lines().count(), SAMPLE_COUNT + 1);
    }
}
