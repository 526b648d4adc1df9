//! Sheaf planning for multi-gun firing groups
//!
//! A sheaf distributes a group's impacts around the true target. Each gun
//! gets an adjusted aim point computed from its position in the group; the
//! adjusted grid then feeds the normal fire-solution path.

use serde::{Deserialize, Serialize};

use crate::error::BallisticsError;
use fireline_grid::offset;

/// Shell types with calibrated burst areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shell {
    /// High explosive, 10 m burst radius.
    He,
    /// Smoke, 20 m burst radius.
    Smk,
}

impl Shell {
    /// Parse a shell label as it appears on the wire.
    pub fn from_label(label: &str) -> Result<Self, BallisticsError> {
        match label.to_ascii_uppercase().as_str() {
            "HE" => Ok(Shell::He),
            "SMK" => Ok(Shell::Smk),
            _ => Err(BallisticsError::UnknownShell(label.to_string())),
        }
    }

    /// Burst radius in meters.
    pub fn burst_radius_m(&self) -> f64 {
        match self {
            Shell::He => 10.0,
            Shell::Smk => 20.0,
        }
    }
}

/// Spatial pattern for a firing group's impacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheafPattern {
    /// Every gun aims at the true target.
    Converged,
    /// Impacts ring the target at the burst radius.
    Circle,
    /// Impacts lie on a lateral line through the target.
    Open,
}

impl SheafPattern {
    /// Parse a sheaf label as the operator enters it.
    pub fn from_label(label: &str) -> Result<Self, BallisticsError> {
        match label.to_ascii_uppercase().as_str() {
            "CONVERGED" => Ok(SheafPattern::Converged),
            "CIRCLE" => Ok(SheafPattern::Circle),
            "OPEN" => Ok(SheafPattern::Open),
            _ => Err(BallisticsError::UnknownSheaf(label.to_string())),
        }
    }
}

/// Compute the adjusted aim point for one gun of a firing group.
///
/// `index` is the gun's 0-based slot within a group of `total` guns. A
/// single-gun group always converges regardless of the requested pattern.
pub fn aim_point(
    target: &str,
    sheaf: &str,
    shell: &str,
    index: usize,
    total: usize,
) -> Result<String, BallisticsError> {
    let mut pattern = SheafPattern::from_label(sheaf)?;
    let burst = Shell::from_label(shell)?.burst_radius_m();

    if total <= 1 {
        pattern = SheafPattern::Converged;
    }

    match pattern {
        SheafPattern::Converged => Ok(target.to_string()),
        SheafPattern::Circle => {
            let bearing = (360.0 / total as f64) * index as f64;
            Ok(offset(target, bearing, burst)?)
        }
        SheafPattern::Open => {
            // Signed lateral slot: positive lies right of the target line,
            // negative left.
            let lateral = (total as f64 * burst / 2.0) - (burst / 2.0) - (index as f64 * burst);
            let bearing = if lateral > 0.0 { 90.0 } else { 270.0 };
            Ok(offset(target, bearing, lateral.abs())?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fireline_grid::{to_vector, Vector};

    const TARGET: &str = "C4-5";

    fn vec_of(grid: &str) -> Vector {
        to_vector(grid, false).unwrap()
    }

    #[test]
    fn test_shell_burst_radii() {
        assert_eq!(Shell::from_label("HE").unwrap().burst_radius_m(), 10.0);
        assert_eq!(Shell::from_label("smk").unwrap().burst_radius_m(), 20.0);
    }

    #[test]
    fn test_unknown_shell_rejected() {
        assert_eq!(
            Shell::from_label("NAPALM"),
            Err(BallisticsError::UnknownShell("NAPALM".to_string()))
        );
    }

    #[test]
    fn test_unknown_sheaf_rejected() {
        assert_eq!(
            SheafPattern::from_label("WEDGE"),
            Err(BallisticsError::UnknownSheaf("WEDGE".to_string()))
        );
    }

    #[test]
    fn test_converged_leaves_target_unchanged() {
        assert_eq!(aim_point(TARGET, "CONVERGED", "HE", 2, 4).unwrap(), TARGET);
    }

    #[test]
    fn test_single_gun_forces_converged() {
        assert_eq!(aim_point(TARGET, "CIRCLE", "HE", 0, 1).unwrap(), TARGET);
        assert_eq!(aim_point(TARGET, "OPEN", "SMK", 0, 1).unwrap(), TARGET);
    }

    #[test]
    fn test_circle_of_four_rings_the_target() {
        // Four HE guns: aim points on a 10 m ring, 90 degrees apart.
        let center = vec_of(TARGET);
        for index in 0..4 {
            let aim = aim_point(TARGET, "CIRCLE", "HE", index, 4).unwrap();
            let bearing = (90.0 * index as f64).to_radians();
            let expected = Vector::new(
                center.x + bearing.sin() * 10.0,
                center.y + bearing.cos() * 10.0,
            );
            let drift = vec_of(&aim).distance(&expected);
            assert!(drift <= 1.5, "gun {index} drifted {drift:.2} m");
        }
    }

    #[test]
    fn test_open_sheaf_lays_a_lateral_line() {
        // Three HE guns: slots at +10, 0, and -10 m laterally.
        let center = vec_of(TARGET);
        let expected_dx = [10.0, 0.0, -10.0];
        for (index, dx) in expected_dx.iter().enumerate() {
            let aim = aim_point(TARGET, "OPEN", "HE", index, 3).unwrap();
            let got = vec_of(&aim);
            assert!((got.x - center.x - dx).abs() <= 1.5, "gun {index}");
            assert!((got.y - center.y).abs() <= 1.5, "gun {index}");
        }
    }

    #[test]
    fn test_open_sheaf_spacing_scales_with_burst() {
        // Smoke doubles the burst radius, so a pair spreads 20 m apart.
        let center = vec_of(TARGET);
        let right = vec_of(&aim_point(TARGET, "OPEN", "SMK", 0, 2).unwrap());
        let left = vec_of(&aim_point(TARGET, "OPEN", "SMK", 1, 2).unwrap());
        assert!((right.x - center.x - 10.0).abs() <= 1.5);
        assert!((left.x - center.x + 10.0).abs() <= 1.5);
    }
}
