//! Polar offsets and observer-relative corrections

use crate::convert::{to_grid, to_vector};
use crate::error::GridError;
use crate::vector::Vector;

/// Displace a grid by a bearing and distance.
///
/// The bearing is in cardinal degrees, clockwise from north, and must lie
/// in [0, 360]. The result is re-encoded as a grid token.
pub fn offset(grid: &str, bearing_deg: f64, distance_m: f64) -> Result<String, GridError> {
    let origin = to_vector(grid, false)?;

    if !(0.0..=360.0).contains(&bearing_deg) {
        return Err(GridError::InvalidAzimuth(bearing_deg));
    }

    let radians = bearing_deg.to_radians();
    let dx = radians.sin() * distance_m;
    let dy = radians.cos() * distance_m;

    Ok(to_grid(Vector::new(origin.x + dx, origin.y + dy)))
}

/// Adjust a grid using an observer's bearing and correction tokens.
///
/// The deviation token is `"0"` (none) or `<L|R><meters>`; the range token
/// is `"0"` or `<+|-><meters>`. A deviation rotates the observer bearing by
/// 90 (right) or 270 (left) degrees, a range correction by 0 (further along
/// the line of sight) or 180 (back toward the observer); the shifted bearing
/// is wrapped into [0, 360) before each offset.
pub fn apply_correction(
    grid: &str,
    observer_bearing_deg: f64,
    deviation: &str,
    range_corr: &str,
) -> Result<String, GridError> {
    let mut current = grid.to_string();

    if deviation != "0" {
        let rotation = match deviation.chars().next() {
            Some('R') => 90.0,
            Some('L') => 270.0,
            _ => return Err(GridError::InvalidCorrection(deviation.to_string())),
        };
        let meters = correction_meters(deviation)?;
        let bearing = wrap_bearing(observer_bearing_deg + rotation);
        current = offset(&current, bearing, meters)?;
    }

    if range_corr != "0" {
        let rotation = match range_corr.chars().next() {
            Some('+') => 0.0,
            Some('-') => 180.0,
            _ => return Err(GridError::InvalidCorrection(range_corr.to_string())),
        };
        let meters = correction_meters(range_corr)?;
        let bearing = wrap_bearing(observer_bearing_deg + rotation);
        current = offset(&current, bearing, meters)?;
    }

    Ok(current)
}

fn correction_meters(token: &str) -> Result<f64, GridError> {
    token[1..]
        .parse::<u32>()
        .map(f64::from)
        .map_err(|_| GridError::InvalidCorrection(token.to_string()))
}

fn wrap_bearing(mut bearing: f64) -> f64 {
    if bearing >= 360.0 {
        bearing -= 360.0;
    }
    bearing
}
