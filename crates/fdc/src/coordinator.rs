//! The mission coordinator
//!
//! Owns the gun registry, the mission table, and both delivery queues.
//! Everything here runs on the FDC node's single tick loop; operations
//! either complete or leave the state exactly as they found it.

use tracing::{debug, info, warn};

use crate::error::FdcError;
use crate::gun::{Gun, GunRegistry};
use crate::mission::{GunMissionStatus, Mission, MissionRequest, MissionStatus};
use crate::order::{EndOfMissionNotice, FireOrder};
use fireline_ballistics::{
    aim_point, fire_solution, range, SheafPattern, Shell, MAX_RANGE_M, MIN_RANGE_M,
};
use fireline_grid::{apply_correction, valid};

/// Traffic the coordinator wants delivered to a reporting gun.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// A queued fire order.
    Order(FireOrder),
    /// A queued end-of-mission notice.
    EndOfMission(EndOfMissionNotice),
}

/// The FDC's single owner of all coordination state.
#[derive(Debug, Default)]
pub struct MissionCoordinator {
    guns: GunRegistry,
    missions: Vec<Mission>,
    order_queue: Vec<FireOrder>,
    eom_queue: Vec<EndOfMissionNotice>,
    centered_grids: bool,
}

impl MissionCoordinator {
    /// Create an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute solutions from cell centers instead of northwest corners.
    pub fn use_centered_grids(&mut self, centered: bool) {
        self.centered_grids = centered;
    }

    /// Read-only view of the gun registry.
    pub fn guns(&self) -> &GunRegistry {
        &self.guns
    }

    /// Read-only view of the mission table.
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    /// Fire orders still awaiting a RECEIVED confirmation.
    pub fn pending_orders(&self) -> &[FireOrder] {
        &self.order_queue
    }

    /// End-of-mission notices still awaiting acknowledgment.
    pub fn pending_notices(&self) -> &[EndOfMissionNotice] {
        &self.eom_queue
    }

    fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    fn mission_mut(&mut self, id: &str) -> Option<&mut Mission> {
        self.missions.iter_mut().find(|m| m.id == id)
    }

    /// Register a new mission from operator input.
    ///
    /// The target grid and the sheaf/shell labels are validated here so a
    /// bad mission is rejected at the operator boundary instead of wedging
    /// the assignment pass.
    pub fn create_mission(&mut self, request: MissionRequest) -> Result<(), FdcError> {
        if self.mission(&request.id).is_some() {
            return Err(FdcError::DuplicateMission(request.id));
        }
        if !valid(&request.grid) {
            return Err(fireline_grid::GridError::InvalidGrid(request.grid).into());
        }
        Shell::from_label(&request.shell)?;
        SheafPattern::from_label(&request.sheaf)?;

        info!(mission = %request.id, grid = %request.grid, "mission created");
        self.missions.push(Mission::from_request(request));
        Ok(())
    }

    /// Record a gun's self-report and pick what to send back.
    ///
    /// The reply priority is the wire contract's: an end-of-mission notice
    /// outranks a queued fire order. Neither is dequeued here; orders
    /// leave the queue on the RECEIVED report, notices on their ack.
    pub fn gun_report(&mut self, gun: Gun) -> Option<Directive> {
        let name = gun.name.clone();
        self.guns.upsert(gun);

        if let Some(notice) = self.eom_queue.iter().find(|n| n.gun == name) {
            return Some(Directive::EndOfMission(notice.clone()));
        }

        self.order_queue
            .iter()
            .find(|o| o.gun == name)
            .map(|order| Directive::Order(order.clone()))
    }

    /// Record a gun's progress report for its assigned mission.
    ///
    /// A RECEIVED report confirms delivery and removes the queued order;
    /// later stages just update the per-gun map when the gun is actually
    /// assigned. Reports for missions that no longer exist are dropped.
    pub fn order_status(&mut self, mission_id: &str, gun: &str, status: GunMissionStatus) {
        if status == GunMissionStatus::Received {
            let queued = self
                .order_queue
                .iter()
                .position(|o| o.gun == gun && o.mission_id == mission_id);
            if let Some(index) = queued {
                self.order_queue.remove(index);
                if let Some(mission) = self.mission_mut(mission_id) {
                    mission
                        .gun_status
                        .insert(gun.to_string(), GunMissionStatus::Received);
                }
            }
            return;
        }

        match self.mission_mut(mission_id) {
            Some(mission) if mission.gun_list.iter().any(|g| g == gun) => {
                mission.gun_status.insert(gun.to_string(), status);
            }
            _ => debug!(mission = mission_id, gun, "status report for unassigned gun dropped"),
        }
    }

    /// Discard a delivered end-of-mission notice.
    pub fn eom_ack(&mut self, mission_id: &str, gun: &str) {
        if let Some(index) = self
            .eom_queue
            .iter()
            .position(|n| n.gun == gun && n.mission_id == mission_id)
        {
            self.eom_queue.remove(index);
        }
    }

    /// Re-derive every mission's aggregate status from its per-gun map.
    pub fn aggregate_status(&mut self) {
        for mission in &mut self.missions {
            mission.aggregate_status();
        }
    }

    /// Assign capable guns to waiting missions.
    ///
    /// At most one mission is assigned per tick; the loop re-enters every
    /// cycle, so a backlog drains one mission at a time. Candidate guns are
    /// considered in first-report order (the documented tie-break).
    pub fn assign_missions(&mut self) {
        for index in 0..self.missions.len() {
            if self.missions[index].status != MissionStatus::Waiting {
                continue;
            }
            if self.try_assign(index) {
                return;
            }
        }
    }

    /// Attempt to fill one waiting mission. Returns true when orders were
    /// queued. All solutions are computed before any state is touched so a
    /// failure leaves the mission and every gun untouched.
    fn try_assign(&mut self, mission_index: usize) -> bool {
        let mission = &self.missions[mission_index];

        let candidates: Vec<String> = self
            .guns
            .iter()
            .filter(|gun| gun.mission_capable)
            .filter(|gun| {
                match range(&gun.grid, &mission.grid, self.centered_grids) {
                    Ok(r) => (MIN_RANGE_M..=MAX_RANGE_M).contains(&r),
                    Err(error) => {
                        debug!(gun = %gun.name, %error, "gun skipped during assignment");
                        false
                    }
                }
            })
            .map(|gun| gun.name.clone())
            .collect();

        if candidates.len() < mission.guns as usize {
            return false;
        }

        let selected = &candidates[..mission.guns as usize];
        let orders = match self.compute_orders(mission, selected) {
            Ok(orders) => orders,
            Err(error) => {
                warn!(mission = %mission.id, %error, "assignment aborted, mission stays waiting");
                return false;
            }
        };

        info!(mission = %mission.id, guns = ?selected, "mission assigned");

        for order in &orders {
            if let Some(gun) = self.guns.get_mut(&order.gun) {
                gun.mission_capable = false;
            }
        }

        let selected: Vec<String> = selected.to_vec();
        let mission = &mut self.missions[mission_index];
        for name in &selected {
            mission
                .gun_status
                .insert(name.clone(), GunMissionStatus::Sending);
        }
        mission.gun_list = selected;
        mission.status = MissionStatus::Sending;
        self.order_queue.extend(orders);
        true
    }

    /// Compute one fire order per selected gun, without touching state.
    ///
    /// A sheaf aim point that falls outside the calibrated band falls back
    /// to the converged solution on the true target, which the candidate
    /// filter already proved to be in band.
    fn compute_orders(
        &self,
        mission: &Mission,
        selected: &[String],
    ) -> Result<Vec<FireOrder>, FdcError> {
        let total = selected.len();
        let mut orders = Vec::with_capacity(total);

        for (index, name) in selected.iter().enumerate() {
            let gun = self
                .guns
                .get(name)
                .expect("selected guns come from the registry");

            let aim = aim_point(&mission.grid, &mission.sheaf, &mission.shell, index, total)?;
            let mut solution = fire_solution(&gun.grid, &aim, self.centered_grids)?;
            if !solution.is_complete() {
                debug!(gun = %name, mission = %mission.id, "sheaf aim point out of band, converging");
                solution = fire_solution(&gun.grid, &mission.grid, self.centered_grids)?;
            }

            let (elevation_mils, time_of_flight_s) = match (
                solution.elevation_mils,
                solution.time_of_flight_s,
            ) {
                (Some(el), Some(tof)) => (el, tof),
                _ => {
                    return Err(fireline_ballistics::BallisticsError::OutOfRange(
                        solution.range_m,
                    )
                    .into())
                }
            };

            orders.push(FireOrder {
                gun: name.clone(),
                mission_id: mission.id.clone(),
                grid: mission.grid.clone(),
                moc: mission.moc.clone(),
                shell: mission.shell.clone(),
                rounds: mission.rounds,
                range_m: solution.range_m,
                azimuth_deg: solution.azimuth_deg,
                elevation_mils,
                time_of_flight_s,
            });
        }

        Ok(orders)
    }

    /// Move a mission's target by observer corrections and start it over.
    ///
    /// Every assigned gun gets an end-of-mission notice, the assignment is
    /// cleared, and the mission re-enters WAITING so the next assignment
    /// pass picks it up against the corrected target.
    pub fn correct_mission(
        &mut self,
        mission_id: &str,
        observer_bearing_deg: f64,
        deviation: &str,
        range_corr: &str,
    ) -> Result<(), FdcError> {
        let mission = self
            .mission(mission_id)
            .ok_or_else(|| FdcError::UnknownMission(mission_id.to_string()))?;

        let corrected = apply_correction(&mission.grid, observer_bearing_deg, deviation, range_corr)?;

        info!(mission = mission_id, from = %mission.grid, to = %corrected, "correction applied");

        let notices: Vec<EndOfMissionNotice> = mission
            .gun_list
            .iter()
            .map(|gun| EndOfMissionNotice {
                gun: gun.clone(),
                mission_id: mission_id.to_string(),
            })
            .collect();
        self.eom_queue.extend(notices);

        let mission = self
            .mission_mut(mission_id)
            .expect("mission presence checked above");
        mission.grid = corrected;
        mission.status = MissionStatus::Waiting;
        mission.gun_list.clear();
        mission.gun_status.clear();
        Ok(())
    }

    /// Close a mission for good.
    ///
    /// Assigned guns get end-of-mission notices, undelivered orders are
    /// dropped from the queue, and the record is deleted.
    pub fn end_mission(&mut self, mission_id: &str) -> Result<(), FdcError> {
        let index = self
            .missions
            .iter()
            .position(|m| m.id == mission_id)
            .ok_or_else(|| FdcError::UnknownMission(mission_id.to_string()))?;

        let mission = self.missions.remove(index);
        for gun in &mission.gun_list {
            self.eom_queue.push(EndOfMissionNotice {
                gun: gun.clone(),
                mission_id: mission_id.to_string(),
            });
        }
        self.order_queue.retain(|o| o.mission_id != mission_id);

        info!(mission = mission_id, "end of mission");
        Ok(())
    }
}
