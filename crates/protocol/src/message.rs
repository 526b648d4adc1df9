//! Wire flags and the closed message sets
//!
//! Each traffic direction has its own closed set of variants, one per flag,
//! decoded into a statically checked record before dispatch. The flag byte
//! values are the toolkit's originals.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use fireline_fdc::{EndOfMissionNotice, FireOrder, Gun, GunMissionStatus};

/// Flag for a gun status report.
pub const FLAG_GUN: [u8; 2] = *b"AA";
/// Flag for fire-order traffic in either direction.
pub const FLAG_TGT: [u8; 2] = *b"BB";
/// Flag for end-of-mission traffic in either direction.
pub const FLAG_EOM: [u8; 2] = *b"CC";

/// A gun's progress report on a delivered order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatus {
    /// Mission id.
    pub id: String,
    /// Reporting gun.
    pub gun: String,
    /// New per-gun status.
    pub status: GunMissionStatus,
}

/// A gun's acknowledgment of an end-of-mission notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EomAck {
    /// Mission id.
    pub id: String,
    /// Acknowledging gun.
    pub gun: String,
}

/// Traffic a gun unit sends up to the FDC.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Routine self-report; also the poll that pulls queued traffic down.
    GunReport(Gun),
    /// Order receipt/progress report.
    OrderStatus(OrderStatus),
    /// End-of-mission acknowledgment.
    EomAck(EomAck),
}

/// Traffic the FDC sends down to a gun unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A fire order for the reporting gun.
    Order(FireOrder),
    /// The reporting gun's mission is over.
    EndOfMission(EndOfMissionNotice),
}

fn frame(flag: [u8; 2], payload: Vec<u8>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + payload.len());
    bytes.extend_from_slice(&flag);
    bytes.extend(payload);
    bytes
}

fn split(bytes: &[u8]) -> Result<([u8; 2], &[u8]), ProtocolError> {
    if bytes.len() < 2 {
        return Err(ProtocolError::Truncated);
    }
    Ok(([bytes[0], bytes[1]], &bytes[2..]))
}

impl Request {
    /// Serialize into a flagged frame.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let (flag, payload) = match self {
            Request::GunReport(report) => (FLAG_GUN, serde_json::to_vec(report)?),
            Request::OrderStatus(status) => (FLAG_TGT, serde_json::to_vec(status)?),
            Request::EomAck(ack) => (FLAG_EOM, serde_json::to_vec(ack)?),
        };
        Ok(frame(flag, payload))
    }

    /// Decode a frame received by the FDC.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (flag, payload) = split(bytes)?;
        match flag {
            FLAG_GUN => Ok(Request::GunReport(serde_json::from_slice(payload)?)),
            FLAG_TGT => Ok(Request::OrderStatus(serde_json::from_slice(payload)?)),
            FLAG_EOM => Ok(Request::EomAck(serde_json::from_slice(payload)?)),
            other => Err(ProtocolError::UnknownFlag(other)),
        }
    }
}

impl Reply {
    /// Serialize into a flagged frame.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let (flag, payload) = match self {
            Reply::Order(order) => (FLAG_TGT, serde_json::to_vec(order)?),
            Reply::EndOfMission(notice) => (FLAG_EOM, serde_json::to_vec(notice)?),
        };
        Ok(frame(flag, payload))
    }

    /// Decode a frame received by a gun unit.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (flag, payload) = split(bytes)?;
        match flag {
            FLAG_TGT => Ok(Reply::Order(serde_json::from_slice(payload)?)),
            FLAG_EOM => Ok(Reply::EndOfMission(serde_json::from_slice(payload)?)),
            other => Err(ProtocolError::UnknownFlag(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fireline_fdc::GunStatus;

    fn report() -> Gun {
        Gun {
            name: "g1".to_string(),
            grid: "A1-5".to_string(),
            ammo: "32 HE".to_string(),
            status: GunStatus::Emplaced,
            mission_capable: true,
            mission: None,
        }
    }

    fn order() -> FireOrder {
        FireOrder {
            gun: "g1".to_string(),
            mission_id: "T1001".to_string(),
            grid: "C4-5".to_string(),
            moc: "WR".to_string(),
            shell: "HE".to_string(),
            rounds: 4,
            range_m: 425,
            azimuth_deg: 135.5,
            elevation_mils: 1420.0,
            time_of_flight_s: 22.0,
        }
    }

    #[test]
    fn test_gun_report_round_trip() {
        let request = Request::GunReport(report());
        let frame = request.encode().unwrap();
        assert_eq!(&frame[..2], b"AA");
        assert_eq!(Request::decode(&frame).unwrap(), request);
    }

    #[test]
    fn test_order_status_round_trip() {
        let request = Request::OrderStatus(OrderStatus {
            id: "T1001".to_string(),
            gun: "g1".to_string(),
            status: GunMissionStatus::Shot,
        });
        let frame = request.encode().unwrap();
        assert_eq!(&frame[..2], b"BB");
        assert_eq!(Request::decode(&frame).unwrap(), request);
    }

    #[test]
    fn test_eom_ack_round_trip() {
        let request = Request::EomAck(EomAck {
            id: "T1001".to_string(),
            gun: "g1".to_string(),
        });
        let frame = request.encode().unwrap();
        assert_eq!(&frame[..2], b"CC");
        assert_eq!(Request::decode(&frame).unwrap(), request);
    }

    #[test]
    fn test_reply_round_trips() {
        let fire = Reply::Order(order());
        assert_eq!(Reply::decode(&fire.encode().unwrap()).unwrap(), fire);

        let eom = Reply::EndOfMission(EndOfMissionNotice {
            gun: "g1".to_string(),
            mission_id: "T1001".to_string(),
        });
        let frame = eom.encode().unwrap();
        assert_eq!(&frame[..2], b"CC");
        assert_eq!(Reply::decode(&frame).unwrap(), eom);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let mut frame = Request::GunReport(report()).encode().unwrap();
        frame[0] = b'Z';
        assert!(matches!(
            Request::decode(&frame),
            Err(ProtocolError::UnknownFlag(_))
        ));
        assert!(matches!(
            Reply::decode(b"AAxx"),
            Err(ProtocolError::UnknownFlag(_))
        ));
    }

    #[test]
    fn test_truncated_frame_rejected() {
        assert!(matches!(Request::decode(b""), Err(ProtocolError::Truncated)));
        assert!(matches!(Request::decode(b"A"), Err(ProtocolError::Truncated)));
    }

    #[test]
    fn test_garbage_payload_rejected() {
        assert!(matches!(
            Request::decode(b"AAnot json"),
            Err(ProtocolError::Payload(_))
        ));
    }
}
