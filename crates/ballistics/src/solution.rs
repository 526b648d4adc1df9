//! Firing data computation against the range card

use serde::{Deserialize, Serialize};

use crate::error::BallisticsError;
use crate::range_card::{MAX_RANGE_M, MIN_RANGE_M, RANGE_CARD};
use fireline_grid::to_vector;

/// Round to the nearest whole number unless the tenths place is exactly
/// half, in which case the half value is kept.
pub fn half_round(value: f64) -> f64 {
    let tenths = (value * 10.0).round() / 10.0;
    if (tenths.rem_euclid(1.0) - 0.5).abs() < 1e-9 {
        tenths
    } else {
        tenths.round()
    }
}

/// Range between two grids in whole meters.
pub fn range(a: &str, b: &str, centered: bool) -> Result<u32, BallisticsError> {
    let from = to_vector(a, centered)?;
    let to = to_vector(b, centered)?;
    Ok(from.distance(&to).round() as u32)
}

/// Azimuth from `a` to `b` in cardinal degrees, rounded to the nearest
/// half degree and normalized into [0, 360).
pub fn azimuth(a: &str, b: &str, centered: bool) -> Result<f64, BallisticsError> {
    let from = to_vector(a, centered)?;
    let to = to_vector(b, centered)?;

    let mut az = (to.x - from.x).atan2(to.y - from.y).to_degrees();
    az = half_round(az);
    if az < 0.0 {
        az += 360.0;
    }
    if az == 360.0 {
        az = 0.0;
    }
    Ok(az)
}

fn bracket(range_m: u32) -> Result<(usize, u32), BallisticsError> {
    if !(MIN_RANGE_M..=MAX_RANGE_M).contains(&range_m) {
        return Err(BallisticsError::OutOfRange(range_m));
    }
    Ok(((range_m / 50 - 1) as usize, range_m % 50))
}

/// Tube elevation in mils for a known range.
///
/// Exact 50 m multiples read straight from the card; anything else is
/// linearly interpolated between the bracketing rows.
pub fn elevation_for_range(range_m: u32) -> Result<f64, BallisticsError> {
    let (idx, remainder) = bracket(range_m)?;
    let row = &RANGE_CARD[idx];
    if remainder == 0 {
        return Ok(f64::from(row.elevation_mils));
    }
    let next = &RANGE_CARD[idx + 1];
    let slope = (f64::from(next.elevation_mils) - f64::from(row.elevation_mils)) / 50.0;
    Ok(half_round(
        f64::from(row.elevation_mils) + slope * f64::from(remainder),
    ))
}

/// Time of flight in seconds for a known range.
///
/// Uncalibrated (zero) rows still interpolate as zeros; the caveat is the
/// card's, not this function's.
pub fn time_of_flight_for_range(range_m: u32) -> Result<f64, BallisticsError> {
    let (idx, remainder) = bracket(range_m)?;
    let row = &RANGE_CARD[idx];
    if remainder == 0 {
        return Ok(row.time_of_flight_s);
    }
    let next = &RANGE_CARD[idx + 1];
    let slope = (next.time_of_flight_s - row.time_of_flight_s) / 50.0;
    Ok((row.time_of_flight_s + slope * f64::from(remainder)).round())
}

/// Tube elevation in mils between a gun grid and a target grid.
pub fn elevation(gun: &str, target: &str, centered: bool) -> Result<f64, BallisticsError> {
    elevation_for_range(range(gun, target, centered)?)
}

/// Time of flight in seconds between a gun grid and a target grid.
pub fn time_of_flight(gun: &str, target: &str, centered: bool) -> Result<f64, BallisticsError> {
    time_of_flight_for_range(range(gun, target, centered)?)
}

/// Complete firing data for one gun against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireSolution {
    /// Range in whole meters.
    pub range_m: u32,
    /// Azimuth in cardinal degrees.
    pub azimuth_deg: f64,
    /// Tube elevation in mils; `None` when the target is out of the
    /// calibrated band.
    pub elevation_mils: Option<f64>,
    /// Time of flight in seconds; `None` when out of the calibrated band.
    pub time_of_flight_s: Option<f64>,
}

impl FireSolution {
    /// Whether elevation and time of flight are both available.
    pub fn is_complete(&self) -> bool {
        self.elevation_mils.is_some() && self.time_of_flight_s.is_some()
    }
}

/// Compute the full firing data for a gun/target pair.
///
/// Range and azimuth are always well-defined for valid grids; an
/// out-of-band range leaves elevation and time of flight empty so a caller
/// can still display the rest.
pub fn fire_solution(
    gun: &str,
    target: &str,
    centered: bool,
) -> Result<FireSolution, BallisticsError> {
    let range_m = range(gun, target, centered)?;
    let azimuth_deg = azimuth(gun, target, centered)?;

    let (elevation_mils, time_of_flight_s) = match (
        elevation_for_range(range_m),
        time_of_flight_for_range(range_m),
    ) {
        (Ok(el), Ok(tof)) => (Some(el), Some(tof)),
        _ => (None, None),
    };

    Ok(FireSolution {
        range_m,
        azimuth_deg,
        elevation_mils,
        time_of_flight_s,
    })
}
