//! Gun records and the reporting registry

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status a gun unit reports for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GunStatus {
    /// Not able to fight.
    #[serde(rename = "OUT OF ACTION")]
    OutOfAction,
    /// Relocating.
    #[serde(rename = "MOVING")]
    Moving,
    /// Setting up at a new position.
    #[serde(rename = "EMPLACING")]
    Emplacing,
    /// In position and laid.
    #[serde(rename = "EMPLACED")]
    Emplaced,
}

impl fmt::Display for GunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GunStatus::OutOfAction => "OUT OF ACTION",
            GunStatus::Moving => "MOVING",
            GunStatus::Emplacing => "EMPLACING",
            GunStatus::Emplaced => "EMPLACED",
        };
        f.write_str(label)
    }
}

/// One gun unit as last reported to the FDC.
///
/// The record is replaced wholesale on every report; guns are never
/// explicitly deleted, a stale gun simply stops updating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gun {
    /// Unique unit name, the registry key.
    pub name: String,
    /// The gun's own position.
    pub grid: String,
    /// Free-form ammunition label.
    pub ammo: String,
    /// Operational status.
    pub status: GunStatus,
    /// Whether the gun will accept a mission.
    pub mission_capable: bool,
    /// Mission the gun is currently working, if any.
    pub mission: Option<String>,
}

/// Registry of every gun that has ever reported.
///
/// Iteration order is first-report order; gun selection during assignment
/// uses that order as its documented tie-break.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GunRegistry {
    guns: Vec<Gun>,
}

impl GunRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a gun's report, replacing any previous record in place so
    /// the gun keeps its original position in the iteration order.
    pub fn upsert(&mut self, gun: Gun) {
        match self.guns.iter_mut().find(|g| g.name == gun.name) {
            Some(existing) => *existing = gun,
            None => self.guns.push(gun),
        }
    }

    /// Look up a gun by name.
    pub fn get(&self, name: &str) -> Option<&Gun> {
        self.guns.iter().find(|g| g.name == name)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Gun> {
        self.guns.iter_mut().find(|g| g.name == name)
    }

    /// All guns in first-report order.
    pub fn iter(&self) -> impl Iterator<Item = &Gun> {
        self.guns.iter()
    }

    /// Number of guns that have reported.
    pub fn len(&self) -> usize {
        self.guns.len()
    }

    /// Whether no gun has reported yet.
    pub fn is_empty(&self) -> bool {
        self.guns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gun(name: &str, grid: &str) -> Gun {
        Gun {
            name: name.to_string(),
            grid: grid.to_string(),
            ammo: "40 HE".to_string(),
            status: GunStatus::Emplaced,
            mission_capable: true,
            mission: None,
        }
    }

    #[test]
    fn test_upsert_inserts_and_replaces() {
        let mut registry = GunRegistry::new();
        registry.upsert(gun("g1", "A1-5"));
        assert_eq!(registry.len(), 1);

        let mut updated = gun("g1", "A2-5");
        updated.mission_capable = false;
        registry.upsert(updated);

        assert_eq!(registry.len(), 1);
        let stored = registry.get("g1").unwrap();
        assert_eq!(stored.grid, "A2-5");
        assert!(!stored.mission_capable);
    }

    #[test]
    fn test_iteration_keeps_first_report_order() {
        let mut registry = GunRegistry::new();
        registry.upsert(gun("bravo", "A1"));
        registry.upsert(gun("alpha", "A2"));
        registry.upsert(gun("bravo", "A3"));

        let names: Vec<_> = registry.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["bravo", "alpha"]);
    }

    #[test]
    fn test_status_labels_round_trip() {
        let json = serde_json::to_string(&GunStatus::OutOfAction).unwrap();
        assert_eq!(json, "\"OUT OF ACTION\"");
        let back: GunStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GunStatus::OutOfAction);
    }
}
