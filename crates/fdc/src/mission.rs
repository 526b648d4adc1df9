//! Mission records and status aggregation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Aggregate lifecycle of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MissionStatus {
    /// Created, no guns assigned yet.
    Waiting,
    /// Orders queued; at least one gun has not confirmed receipt.
    Sending,
    /// Every assigned gun confirmed its order.
    Received,
    /// At least one gun has rounds on the way.
    Shot,
    /// Every assigned gun finished. Terminal; never re-evaluated.
    Complete,
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissionStatus::Waiting => "WAITING",
            MissionStatus::Sending => "SENDING",
            MissionStatus::Received => "RECEIVED",
            MissionStatus::Shot => "SHOT",
            MissionStatus::Complete => "COMPLETE",
        };
        f.write_str(label)
    }
}

/// One assigned gun's progress on a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GunMissionStatus {
    /// Order queued, delivery not yet confirmed.
    Sending,
    /// Gun confirmed the order.
    Received,
    /// Gun reported rounds fired.
    Shot,
    /// Gun reported the fire mission finished.
    Complete,
}

/// Operator-entered fields for a new mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRequest {
    /// Caller-chosen unique mission id.
    pub id: String,
    /// Target grid.
    pub grid: String,
    /// How many guns the mission needs.
    pub guns: u32,
    /// Method of control label; opaque to the math.
    pub moc: String,
    /// Sheaf pattern label.
    pub sheaf: String,
    /// Shell type label.
    pub shell: String,
    /// Rounds per gun.
    pub rounds: u32,
}

/// An active fire mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Unique mission id.
    pub id: String,
    /// Target grid; corrections rewrite it.
    pub grid: String,
    /// Requested gun count.
    pub guns: u32,
    /// Method of control label.
    pub moc: String,
    /// Sheaf pattern label.
    pub sheaf: String,
    /// Shell type label.
    pub shell: String,
    /// Rounds per gun.
    pub rounds: u32,
    /// Aggregate status.
    pub status: MissionStatus,
    /// Names of the guns currently assigned.
    pub gun_list: Vec<String>,
    /// Per-gun progress for the current assignment.
    pub gun_status: BTreeMap<String, GunMissionStatus>,
}

impl Mission {
    /// Build a fresh mission from an operator request.
    pub fn from_request(request: MissionRequest) -> Self {
        Self {
            id: request.id,
            grid: request.grid,
            guns: request.guns,
            moc: request.moc,
            sheaf: request.sheaf,
            shell: request.shell,
            rounds: request.rounds,
            status: MissionStatus::Waiting,
            gun_list: Vec::new(),
            gun_status: BTreeMap::new(),
        }
    }

    /// Re-derive the aggregate status from the per-gun map.
    ///
    /// A COMPLETE mission is frozen, and a mission with no per-gun entries
    /// keeps whatever status it has.
    pub fn aggregate_status(&mut self) {
        if self.gun_status.is_empty() || self.status == MissionStatus::Complete {
            return;
        }

        let total = self.gun_status.len();
        let mut sending = 0;
        let mut received = 0;
        let mut shot = 0;
        let mut complete = 0;

        for status in self.gun_status.values() {
            match status {
                GunMissionStatus::Sending => sending += 1,
                GunMissionStatus::Received => received += 1,
                GunMissionStatus::Shot => shot += 1,
                GunMissionStatus::Complete => complete += 1,
            }
        }

        if complete == total {
            self.status = MissionStatus::Complete;
        } else if sending > 0 {
            self.status = MissionStatus::Sending;
        } else if received == total {
            self.status = MissionStatus::Received;
        } else if shot > 0 {
            self.status = MissionStatus::Shot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> Mission {
        Mission::from_request(MissionRequest {
            id: "T1001".to_string(),
            grid: "C4-5".to_string(),
            guns: 2,
            moc: "WR".to_string(),
            sheaf: "CONVERGED".to_string(),
            shell: "HE".to_string(),
            rounds: 4,
        })
    }

    fn set(m: &mut Mission, gun: &str, status: GunMissionStatus) {
        m.gun_status.insert(gun.to_string(), status);
    }

    #[test]
    fn test_new_mission_is_waiting() {
        let m = mission();
        assert_eq!(m.status, MissionStatus::Waiting);
        assert!(m.gun_list.is_empty());
        assert!(m.gun_status.is_empty());
    }

    #[test]
    fn test_empty_gun_map_keeps_current_status() {
        let mut m = mission();
        m.aggregate_status();
        assert_eq!(m.status, MissionStatus::Waiting);
    }

    #[test]
    fn test_any_sending_gun_dominates() {
        let mut m = mission();
        set(&mut m, "g1", GunMissionStatus::Sending);
        set(&mut m, "g2", GunMissionStatus::Shot);
        m.aggregate_status();
        assert_eq!(m.status, MissionStatus::Sending);
    }

    #[test]
    fn test_all_received_becomes_received() {
        let mut m = mission();
        set(&mut m, "g1", GunMissionStatus::Received);
        set(&mut m, "g2", GunMissionStatus::Received);
        m.aggregate_status();
        assert_eq!(m.status, MissionStatus::Received);
    }

    #[test]
    fn test_any_shot_without_sending_becomes_shot() {
        let mut m = mission();
        set(&mut m, "g1", GunMissionStatus::Shot);
        set(&mut m, "g2", GunMissionStatus::Received);
        m.aggregate_status();
        assert_eq!(m.status, MissionStatus::Shot);
    }

    #[test]
    fn test_all_complete_becomes_complete() {
        let mut m = mission();
        set(&mut m, "g1", GunMissionStatus::Complete);
        set(&mut m, "g2", GunMissionStatus::Complete);
        m.aggregate_status();
        assert_eq!(m.status, MissionStatus::Complete);
    }

    #[test]
    fn test_complete_is_frozen_against_stale_reports() {
        let mut m = mission();
        set(&mut m, "g1", GunMissionStatus::Complete);
        set(&mut m, "g2", GunMissionStatus::Complete);
        m.aggregate_status();
        assert_eq!(m.status, MissionStatus::Complete);

        // A stale SHOT report must not thaw the mission.
        set(&mut m, "g1", GunMissionStatus::Shot);
        m.aggregate_status();
        assert_eq!(m.status, MissionStatus::Complete);
    }

    #[test]
    fn test_status_labels_round_trip() {
        let json = serde_json::to_string(&MissionStatus::Waiting).unwrap();
        assert_eq!(json, "\"WAITING\"");
        let back: GunMissionStatus = serde_json::from_str("\"RECEIVED\"").unwrap();
        assert_eq!(back, GunMissionStatus::Received);
    }
}
