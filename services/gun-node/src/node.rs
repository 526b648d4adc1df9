//! The gun unit's report loop

use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use fireline_core::GunConfig;
use fireline_fdc::{FireOrder, Gun};
use fireline_gun_unit::{GunUnit, ReportFields};
use fireline_protocol::{read_frame, send_frame, Reply};

/// Crew actions fed into the loop from the display collaborator.
#[derive(Debug)]
pub enum UnitIntent {
    /// Update the crew's report fields.
    Report(ReportFields),
    /// Rounds away on the current order.
    MarkShot,
    /// Current fire mission finished.
    MarkComplete,
}

/// Read-only view of the unit published once per tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnitSnapshot {
    /// The report the FDC sees, defaults applied.
    pub report: Option<Gun>,
    /// The order currently being worked.
    pub order: Option<FireOrder>,
}

/// The display collaborator's side of the node.
#[derive(Debug, Clone)]
pub struct GunHandle {
    intents: mpsc::Sender<UnitIntent>,
    snapshot: watch::Receiver<UnitSnapshot>,
}

impl GunHandle {
    /// Update the crew's report fields.
    pub async fn report_status(&self, fields: ReportFields) -> anyhow::Result<()> {
        self.intents
            .send(UnitIntent::Report(fields))
            .await
            .map_err(|_| anyhow::anyhow!("gun node stopped"))
    }

    /// Report rounds fired on the current order.
    pub async fn mark_shot(&self) -> anyhow::Result<()> {
        self.intents
            .send(UnitIntent::MarkShot)
            .await
            .map_err(|_| anyhow::anyhow!("gun node stopped"))
    }

    /// Report the current fire mission finished.
    pub async fn mark_complete(&self) -> anyhow::Result<()> {
        self.intents
            .send(UnitIntent::MarkComplete)
            .await
            .map_err(|_| anyhow::anyhow!("gun node stopped"))
    }

    /// The latest published unit state.
    pub fn snapshot(&self) -> UnitSnapshot {
        self.snapshot.borrow().clone()
    }
}

/// The gun node: unit state and the loop that reports it.
pub struct GunNode {
    config: GunConfig,
    unit: GunUnit,
    intents: mpsc::Receiver<UnitIntent>,
    snapshot_tx: watch::Sender<UnitSnapshot>,
}

impl GunNode {
    /// Create the node and its collaborator handle.
    pub fn new(config: GunConfig) -> (Self, GunHandle) {
        let (intent_tx, intent_rx) = mpsc::channel(32);
        let (snapshot_tx, snapshot_rx) = watch::channel(UnitSnapshot::default());

        let unit = GunUnit::new(config.unit_id.clone());
        info!(unit = %config.unit_id, fdc = %config.fdc.host, port = config.fdc.port, "gun unit up");

        let node = Self {
            config,
            unit,
            intents: intent_rx,
            snapshot_tx,
        };
        let handle = GunHandle {
            intents: intent_tx,
            snapshot: snapshot_rx,
        };
        (node, handle)
    }

    /// Drive the report loop forever.
    pub async fn run(mut self) {
        let mut ticker = interval(Duration::from_millis(self.config.timing.tick_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// One report tick: crew intents, then a single protocol exchange.
    async fn tick(&mut self) {
        self.drain_intents();
        self.exchange().await;
        self.publish_snapshot();
    }

    fn drain_intents(&mut self) {
        while let Ok(intent) = self.intents.try_recv() {
            match intent {
                UnitIntent::Report(fields) => self.unit.report_status(fields),
                UnitIntent::MarkShot => self.unit.mark_shot(),
                UnitIntent::MarkComplete => self.unit.mark_complete(),
            }
        }
    }

    /// Open one connection, send one message, apply the optional reply.
    ///
    /// Every failure is absorbed; the pending acknowledgment (if that is
    /// what was being sent) survives anything short of a successful send,
    /// and the whole exchange is retried on the next tick.
    async fn exchange(&mut self) {
        let outbound = self.unit.next_outbound();

        let endpoint = (self.config.fdc.host.as_str(), self.config.fdc.port);
        let mut stream = match TcpStream::connect(endpoint).await {
            Ok(stream) => stream,
            Err(error) => {
                debug!(%error, "FDC unreachable, retrying next tick");
                return;
            }
        };

        let frame = match outbound.encode() {
            Ok(frame) => frame,
            Err(error) => {
                warn!(%error, "outbound encode failed");
                return;
            }
        };
        if let Err(error) = send_frame(&mut stream, &frame).await {
            debug!(%error, "send failed, retrying next tick");
            return;
        }
        self.unit.commit_sent(&outbound);

        let deadline = Duration::from_millis(self.config.timing.read_timeout_ms);
        match read_frame(&mut stream, deadline).await {
            Ok(frame) if frame.is_empty() => {}
            Ok(frame) => match Reply::decode(&frame) {
                Ok(reply) => self.unit.apply_reply(reply),
                Err(error) => warn!(%error, "undecodable reply dropped"),
            },
            // A silent FDC reads as "no data"; nothing to retry this tick.
            Err(error) => debug!(%error, "no reply this tick"),
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(UnitSnapshot {
            report: Some(self.unit.as_gun()),
            order: self.unit.current_order().cloned(),
        });
    }
}
