//! One gun unit's local state machine

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fireline_fdc::{FireOrder, Gun, GunMissionStatus, GunStatus};
use fireline_protocol::{EomAck, OrderStatus, Reply, Request};

/// Operator-entered report fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFields {
    /// The gun's own position.
    pub grid: String,
    /// Free-form ammunition label.
    pub ammo: String,
    /// Operational status; unset reports as OUT OF ACTION.
    pub status: Option<GunStatus>,
    /// Whether the crew will accept missions.
    pub mission_capable: bool,
}

/// A gun unit between ticks.
///
/// Holds the crew's report fields, the live fire order if one was accepted,
/// and up to one pending acknowledgment of each kind. Acknowledgments clear
/// only after a send succeeds, so a dropped connection retries them on the
/// next tick.
#[derive(Debug, Clone)]
pub struct GunUnit {
    name: String,
    fields: ReportFields,
    order: Option<FireOrder>,
    pending_status: Option<OrderStatus>,
    pending_eom: Option<EomAck>,
}

impl GunUnit {
    /// Create a unit with empty report fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: ReportFields::default(),
            order: None,
            pending_status: None,
            pending_eom: None,
        }
    }

    /// The unit's name, its registry key at the FDC.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The order currently being worked, if any.
    pub fn current_order(&self) -> Option<&FireOrder> {
        self.order.as_ref()
    }

    /// Update the crew's report fields.
    pub fn report_status(&mut self, fields: ReportFields) {
        self.fields = fields;
    }

    /// The crew fired its rounds; owes the FDC a SHOT report.
    pub fn mark_shot(&mut self) {
        self.queue_status(GunMissionStatus::Shot);
    }

    /// The fire mission is finished; owes the FDC a COMPLETE report.
    pub fn mark_complete(&mut self) {
        self.queue_status(GunMissionStatus::Complete);
    }

    fn queue_status(&mut self, status: GunMissionStatus) {
        match &self.order {
            Some(order) => {
                self.pending_status = Some(OrderStatus {
                    id: order.mission_id.clone(),
                    gun: self.name.clone(),
                    status,
                });
            }
            None => debug!(gun = %self.name, "status trigger ignored, no live order"),
        }
    }

    /// Build the unit's current self-report.
    ///
    /// Blank grid and ammo report as `N/A`, an unset status reports as OUT
    /// OF ACTION, and capability is forced off while an order is held.
    pub fn as_gun(&self) -> Gun {
        let or_na = |s: &str| {
            if s.is_empty() {
                "N/A".to_string()
            } else {
                s.to_string()
            }
        };
        Gun {
            name: self.name.clone(),
            grid: or_na(&self.fields.grid),
            ammo: or_na(&self.fields.ammo),
            status: self.fields.status.unwrap_or(GunStatus::OutOfAction),
            mission_capable: self.fields.mission_capable && self.order.is_none(),
            mission: self.order.as_ref().map(|o| o.mission_id.clone()),
        }
    }

    /// Choose the one message this tick sends.
    ///
    /// Priority: end-of-mission acknowledgment, then order-status
    /// acknowledgment, then the routine self-report.
    pub fn next_outbound(&self) -> Request {
        if let Some(ack) = &self.pending_eom {
            return Request::EomAck(ack.clone());
        }
        if let Some(status) = &self.pending_status {
            return Request::OrderStatus(status.clone());
        }
        Request::GunReport(self.as_gun())
    }

    /// Clear the pending slot a successfully sent message came from.
    pub fn commit_sent(&mut self, sent: &Request) {
        match sent {
            Request::EomAck(_) => self.pending_eom = None,
            Request::OrderStatus(_) => self.pending_status = None,
            Request::GunReport(_) => {}
        }
    }

    /// Apply whatever the FDC sent back this tick.
    pub fn apply_reply(&mut self, reply: Reply) {
        match reply {
            Reply::Order(order) => {
                if self.order.is_some() {
                    debug!(gun = %self.name, mission = %order.mission_id, "order ignored, unit already tasked");
                    return;
                }
                info!(gun = %self.name, mission = %order.mission_id, "fire order accepted");
                self.pending_status = Some(OrderStatus {
                    id: order.mission_id.clone(),
                    gun: self.name.clone(),
                    status: GunMissionStatus::Received,
                });
                self.order = Some(order);
            }
            Reply::EndOfMission(notice) => {
                info!(gun = %self.name, mission = %notice.mission_id, "end of mission received");
                self.pending_eom = Some(EomAck {
                    id: notice.mission_id.clone(),
                    gun: self.name.clone(),
                });
                let matches_current = self
                    .order
                    .as_ref()
                    .map_or(false, |o| o.mission_id == notice.mission_id);
                if matches_current {
                    self.order = None;
                    self.pending_status = None;
                }
            }
        }
    }
}
