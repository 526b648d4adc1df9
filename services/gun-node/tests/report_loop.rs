//! Drives a live gun node against a scripted FDC socket.

use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout, Duration};

use fireline_core::config::{FdcEndpointConfig, GunConfig, TimingConfig};
use fireline_fdc::{EndOfMissionNotice, FireOrder, GunMissionStatus, GunStatus};
use fireline_gun_node::GunNode;
use fireline_gun_unit::ReportFields;
use fireline_protocol::{read_frame, send_frame, Reply, Request};

fn test_config(port: u16) -> GunConfig {
    GunConfig {
        unit_id: "g1".to_string(),
        fdc: FdcEndpointConfig {
            host: "127.0.0.1".to_string(),
            port,
        },
        timing: TimingConfig {
            tick_ms: 50,
            read_timeout_ms: 500,
        },
    }
}

fn crew_fields() -> ReportFields {
    ReportFields {
        grid: "A1-5".to_string(),
        ammo: "32 HE".to_string(),
        status: Some(GunStatus::Emplaced),
        mission_capable: true,
    }
}

fn order(mission: &str) -> FireOrder {
    FireOrder {
        gun: "g1".to_string(),
        mission_id: mission.to_string(),
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

/// Take the gun's next message off the listener.
async fn next_request(listener: &TcpListener) -> (TcpStream, Request) {
    let (mut stream, _) = timeout(Duration::from_secs(5), listener.accept())
        .await
        .expect("gun never connected")
        .unwrap();
    let frame = read_frame(&mut stream, Duration::from_secs(2))
        .await
        .unwrap();
    (stream, Request::decode(&frame).unwrap())
}

/// Keep taking messages until one matches; earlier ones get no reply.
async fn next_matching<F>(listener: &TcpListener, what: &str, mut condition: F) -> (TcpStream, Request)
where
    F: FnMut(&Request) -> bool,
{
    for _ in 0..40 {
        let (stream, request) = next_request(listener).await;
        if condition(&request) {
            return (stream, request);
        }
    }
    panic!("never saw: {what}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_report_order_shot_eom_cycle() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let (node, handle) = GunNode::new(test_config(port));
    tokio::spawn(node.run());

    handle.report_status(crew_fields()).await.unwrap();

    // Wait for the crew's fields to show up, then task the gun.
    let (mut stream, request) = next_matching(&listener, "crew report", |r| {
        matches!(r, Request::GunReport(gun) if gun.grid == "A1-5")
    })
    .await;
    if let Request::GunReport(gun) = &request {
        assert_eq!(gun.ammo, "32 HE");
        assert_eq!(gun.status, GunStatus::Emplaced);
        assert!(gun.mission_capable);
    }
    let reply = Reply::Order(order("T1"));
    send_frame(&mut stream, &reply.encode().unwrap())
        .await
        .unwrap();

    // The gun confirms receipt on its next tick.
    let (_stream, request) = next_request(&listener).await;
    match request {
        Request::OrderStatus(status) => {
            assert_eq!(status.id, "T1");
            assert_eq!(status.status, GunMissionStatus::Received);
        }
        other => panic!("expected RECEIVED, got {other:?}"),
    }

    // Routine reports now show the gun tasked and not capable.
    let (_stream, request) = next_matching(&listener, "tasked report", |r| {
        matches!(r, Request::GunReport(_))
    })
    .await;
    if let Request::GunReport(gun) = &request {
        assert_eq!(gun.mission.as_deref(), Some("T1"));
        assert!(!gun.mission_capable);
    }
    assert_eq!(
        handle.snapshot().order.map(|o| o.mission_id),
        Some("T1".to_string())
    );

    // Crew fires; the SHOT report goes up.
    handle.mark_shot().await.unwrap();
    let (_stream, request) = next_matching(&listener, "shot report", |r| {
        matches!(r, Request::OrderStatus(_))
    })
    .await;
    if let Request::OrderStatus(status) = &request {
        assert_eq!(status.status, GunMissionStatus::Shot);
    }

    // FDC ends the mission on the next routine report.
    let (mut stream, _) = next_matching(&listener, "report to answer", |r| {
        matches!(r, Request::GunReport(_))
    })
    .await;
    let eom = Reply::EndOfMission(EndOfMissionNotice {
        gun: "g1".to_string(),
        mission_id: "T1".to_string(),
    });
    send_frame(&mut stream, &eom.encode().unwrap()).await.unwrap();

    // The gun acknowledges, stands down, and is capable again.
    let (_stream, request) = next_matching(&listener, "eom ack", |r| {
        matches!(r, Request::EomAck(_))
    })
    .await;
    if let Request::EomAck(ack) = &request {
        assert_eq!(ack.id, "T1");
        assert_eq!(ack.gun, "g1");
    }

    let (_stream, request) = next_matching(&listener, "stood-down report", |r| {
        matches!(r, Request::GunReport(_))
    })
    .await;
    if let Request::GunReport(gun) = &request {
        assert_eq!(gun.mission, None);
        assert!(gun.mission_capable);
    }
    assert!(handle.snapshot().order.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_fdc_is_absorbed() {
    // Grab a free port, then close it again so connects are refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (node, handle) = GunNode::new(test_config(port));
    tokio::spawn(node.run());

    handle.report_status(crew_fields()).await.unwrap();
    sleep(Duration::from_millis(300)).await;

    // The loop keeps publishing; nothing crashed, nothing is lost.
    let snapshot = handle.snapshot();
    let report = snapshot.report.expect("snapshot published");
    assert_eq!(report.name, "g1");
    assert_eq!(report.grid, "A1-5");
}
