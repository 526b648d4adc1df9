//! Queued traffic awaiting delivery to guns

use serde::{Deserialize, Serialize};

/// A computed firing instruction for exactly one gun and one mission.
///
/// Queued at assignment time and held until the gun's RECEIVED report
/// confirms delivery; the grid is the mission's true target while range,
/// azimuth, and elevation already reflect the gun's sheaf aim point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireOrder {
    /// Receiving gun's name.
    pub gun: String,
    /// Mission this order belongs to.
    pub mission_id: String,
    /// The mission's target grid.
    pub grid: String,
    /// Method of control label.
    pub moc: String,
    /// Shell type label.
    pub shell: String,
    /// Rounds to fire.
    pub rounds: u32,
    /// Range to the aim point in meters.
    pub range_m: u32,
    /// Azimuth to the aim point in cardinal degrees.
    pub azimuth_deg: f64,
    /// Tube elevation in mils.
    pub elevation_mils: f64,
    /// Expected time of flight in seconds.
    pub time_of_flight_s: f64,
}

/// Tells one gun that its mission is over.
///
/// Queued when a mission is corrected or closed; delivered on the gun's
/// reports until the gun's acknowledgment discards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndOfMissionNotice {
    /// Receiving gun's name.
    pub gun: String,
    /// The finished mission.
    pub mission_id: String,
}
