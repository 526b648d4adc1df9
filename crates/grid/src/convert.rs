//! Grid token validation and grid/vector conversion

use crate::error::GridError;
use crate::vector::Vector;

/// Side length of a zone cell in meters.
pub const ZONE_SIZE_M: f64 = 300.0;

/// Check a token against the grid grammar.
///
/// A valid grid is a zone designator (one letter followed by a number >= 1)
/// and zero or more dash-separated refinement digits, each in 1..=9.
pub fn valid(grid: &str) -> bool {
    let mut tokens = grid.split('-');

    let zone = match tokens.next() {
        Some(z) if z.len() >= 2 => z,
        _ => return false,
    };

    let mut chars = zone.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    match chars.as_str().parse::<u32>() {
        Ok(n) if n >= 1 => {}
        _ => return false,
    }

    tokens.all(|t| {
        let mut chars = t.chars();
        matches!((chars.next(), chars.next()), (Some('1'..='9'), None))
    })
}

/// Convert a grid token into a vector.
///
/// With `centered` set, the result is the center of the finest cell rather
/// than its northwest corner.
pub fn to_vector(grid: &str, centered: bool) -> Result<Vector, GridError> {
    if !valid(grid) {
        return Err(GridError::InvalidGrid(grid.to_string()));
    }

    let mut tokens = grid.split('-');
    // valid() guarantees the zone token parses.
    let zone = tokens.next().unwrap_or_default();
    let letter = zone
        .chars()
        .next()
        .unwrap_or('A')
        .to_ascii_uppercase();
    let number: u32 = zone[1..].parse().unwrap_or(1);

    let mut x = f64::from(letter as u32 - 'A' as u32) * ZONE_SIZE_M;
    let mut y = -f64::from(number - 1) * ZONE_SIZE_M;

    // Cell size shrinks by a factor of three per refinement digit.
    let mut d = ZONE_SIZE_M;
    for token in tokens {
        d /= 3.0;
        match token {
            "4" | "5" | "6" => y -= d,
            "1" | "2" | "3" => y -= 2.0 * d,
            _ => {}
        }
        match token {
            "2" | "5" | "8" => x += d,
            "3" | "6" | "9" => x += 2.0 * d,
            _ => {}
        }
    }

    if centered {
        x += d / 2.0;
        y -= d / 2.0;
    }

    Ok(Vector { x, y })
}

/// Convert a vector back into a grid token.
///
/// The input is rounded to millimeter precision first so accumulated
/// floating-point drift cannot flip a cell boundary, then zone letter,
/// zone number, and refinement digits are peeled off greedily until the
/// residual offset is below one meter on both axes. Coordinates are clamped
/// to the map quadrant; zone columns clamp to the A..Z band.
pub fn to_grid(vector: Vector) -> String {
    let mut x = round_mm(vector.x.max(0.0));
    let mut y = round_mm(vector.y.abs());

    let mut d = ZONE_SIZE_M;

    let col = ((x / d).floor() as u32).min(25);
    let letter = char::from(b'A' + col as u8);
    x -= f64::from(col) * d;

    let row = (y / d).floor();
    let number = row as u64 + 1;
    y -= row * d;

    let mut grid = format!("{letter}{number}");

    while x > 1.0 || y > 1.0 {
        d /= 3.0;
        let mut digit = b'7';
        while x >= d {
            x -= d;
            digit += 1;
        }
        while y >= d {
            y -= d;
            digit -= 3;
        }
        grid.push('-');
        grid.push(char::from(digit));
    }

    grid
}

fn round_mm(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
