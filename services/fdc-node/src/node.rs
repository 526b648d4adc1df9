//! The FDC coordination loop

use std::net::SocketAddr;

use anyhow::Context;
use serde::Serialize;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval, timeout, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use fireline_core::FdcConfig;
use fireline_fdc::{Directive, FdcError, Gun, Mission, MissionCoordinator, MissionRequest};
use fireline_protocol::{read_frame, send_frame, Reply, Request};

/// How long each tick waits for a pending connection before moving on.
const ACCEPT_POLL: Duration = Duration::from_millis(10);

/// Operator actions fed into the loop from the display collaborator.
#[derive(Debug)]
pub enum OperatorIntent {
    /// Register a new fire mission.
    CreateMission {
        /// Operator-entered mission fields.
        request: MissionRequest,
        /// Outcome of the validation.
        reply: oneshot::Sender<Result<(), FdcError>>,
    },
    /// Move a mission's target by observer corrections.
    CorrectMission {
        /// Mission to correct.
        id: String,
        /// Observer-to-target bearing in degrees.
        observer_bearing_deg: f64,
        /// Deviation token, `"0"` for none.
        deviation: String,
        /// Range token, `"0"` for none.
        range_corr: String,
        /// Outcome of the correction.
        reply: oneshot::Sender<Result<(), FdcError>>,
    },
    /// Close a mission for good.
    EndMission {
        /// Mission to close.
        id: String,
        /// Outcome of the close.
        reply: oneshot::Sender<Result<(), FdcError>>,
    },
}

/// Read-only view of the coordinator published once per tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FdcSnapshot {
    /// Every gun that has reported, in first-report order.
    pub guns: Vec<Gun>,
    /// Every active mission.
    pub missions: Vec<Mission>,
}

/// The display collaborator's side of the node.
#[derive(Debug, Clone)]
pub struct FdcHandle {
    intents: mpsc::Sender<OperatorIntent>,
    snapshot: watch::Receiver<FdcSnapshot>,
}

impl FdcHandle {
    /// Register a new fire mission.
    pub async fn create_mission(&self, request: MissionRequest) -> anyhow::Result<()> {
        let (tx, rx) = oneshot::channel();
        self.intents
            .send(OperatorIntent::CreateMission { request, reply: tx })
            .await
            .context("FDC node stopped")?;
        rx.await.context("FDC node stopped")??;
        Ok(())
    }

    /// Apply observer corrections to a mission.
    pub async fn correct_mission(
        &self,
        id: &str,
        observer_bearing_deg: f64,
        deviation: &str,
        range_corr: &str,
    ) -> anyhow::Result<()> {
        let (tx, rx) = oneshot::channel();
        self.intents
            .send(OperatorIntent::CorrectMission {
                id: id.to_string(),
                observer_bearing_deg,
                deviation: deviation.to_string(),
                range_corr: range_corr.to_string(),
                reply: tx,
            })
            .await
            .context("FDC node stopped")?;
        rx.await.context("FDC node stopped")??;
        Ok(())
    }

    /// End a mission.
    pub async fn end_mission(&self, id: &str) -> anyhow::Result<()> {
        let (tx, rx) = oneshot::channel();
        self.intents
            .send(OperatorIntent::EndMission {
                id: id.to_string(),
                reply: tx,
            })
            .await
            .context("FDC node stopped")?;
        rx.await.context("FDC node stopped")??;
        Ok(())
    }

    /// The latest published gun/mission tables.
    pub fn snapshot(&self) -> FdcSnapshot {
        self.snapshot.borrow().clone()
    }
}

/// The FDC node: coordinator, listener, and the loop that drives them.
pub struct FdcNode {
    config: FdcConfig,
    coordinator: MissionCoordinator,
    listener: TcpListener,
    intents: mpsc::Receiver<OperatorIntent>,
    snapshot_tx: watch::Sender<FdcSnapshot>,
}

impl FdcNode {
    /// Bind the accepting socket and create the collaborator handle.
    pub async fn bind(config: FdcConfig) -> anyhow::Result<(Self, FdcHandle)> {
        let listener = TcpListener::bind((config.network.host.as_str(), config.network.port))
            .await
            .with_context(|| {
                format!(
                    "binding {}:{}",
                    config.network.host, config.network.port
                )
            })?;
        info!(unit = %config.unit_id, addr = %listener.local_addr()?, "FDC listening");

        let (intent_tx, intent_rx) = mpsc::channel(32);
        let (snapshot_tx, snapshot_rx) = watch::channel(FdcSnapshot::default());

        let mut coordinator = MissionCoordinator::new();
        coordinator.use_centered_grids(config.centered_grids);

        let node = Self {
            config,
            coordinator,
            listener,
            intents: intent_rx,
            snapshot_tx,
        };
        let handle = FdcHandle {
            intents: intent_tx,
            snapshot: snapshot_rx,
        };
        Ok((node, handle))
    }

    /// The listener's actual address; useful when bound to port 0.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Drive the coordination loop forever.
    pub async fn run(mut self) {
        let mut ticker = interval(Duration::from_millis(self.config.timing.tick_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// One coordination tick: operator intents, inbound traffic, then the
    /// maintenance passes, then the display snapshot.
    async fn tick(&mut self) {
        self.drain_intents();
        self.accept_phase().await;
        self.coordinator.aggregate_status();
        self.coordinator.assign_missions();
        self.publish_snapshot();
    }

    fn drain_intents(&mut self) {
        while let Ok(intent) = self.intents.try_recv() {
            match intent {
                OperatorIntent::CreateMission { request, reply } => {
                    let _ = reply.send(self.coordinator.create_mission(request));
                }
                OperatorIntent::CorrectMission {
                    id,
                    observer_bearing_deg,
                    deviation,
                    range_corr,
                    reply,
                } => {
                    let _ = reply.send(self.coordinator.correct_mission(
                        &id,
                        observer_bearing_deg,
                        &deviation,
                        &range_corr,
                    ));
                }
                OperatorIntent::EndMission { id, reply } => {
                    let _ = reply.send(self.coordinator.end_mission(&id));
                }
            }
        }
    }

    /// Accept and serve inbound connections.
    ///
    /// By default at most one connection is serviced per tick and the rest
    /// wait for the guns' own retry timers; `drain_accepts` services every
    /// pending connection instead.
    async fn accept_phase(&mut self) {
        loop {
            let (stream, peer) = match timeout(ACCEPT_POLL, self.listener.accept()).await {
                Ok(Ok(accepted)) => accepted,
                Ok(Err(error)) => {
                    warn!(%error, "accept failed");
                    break;
                }
                // Nothing pending this tick.
                Err(_) => break,
            };

            self.serve(stream, peer).await;

            if !self.config.network.drain_accepts {
                break;
            }
        }
    }

    /// Read one request, dispatch it, reply at most once, close.
    async fn serve(&mut self, mut stream: TcpStream, peer: SocketAddr) {
        let deadline = Duration::from_millis(self.config.timing.read_timeout_ms);

        let frame = match read_frame(&mut stream, deadline).await {
            Ok(frame) => frame,
            Err(error) => {
                warn!(%peer, %error, "inbound read failed");
                return;
            }
        };
        if frame.is_empty() {
            debug!(%peer, "probe connection");
            return;
        }

        let request = match Request::decode(&frame) {
            Ok(request) => request,
            Err(error) => {
                warn!(%peer, %error, "undecodable message dropped");
                return;
            }
        };

        if let Some(reply) = self.dispatch(request) {
            match reply.encode() {
                Ok(bytes) => {
                    if let Err(error) = send_frame(&mut stream, &bytes).await {
                        // The gun retries on its own timer.
                        debug!(%peer, %error, "reply send failed");
                    }
                }
                Err(error) => warn!(%peer, %error, "reply encode failed"),
            }
        }
    }

    fn dispatch(&mut self, request: Request) -> Option<Reply> {
        match request {
            Request::GunReport(gun) => {
                debug!(gun = %gun.name, "gun report");
                self.coordinator.gun_report(gun).map(|directive| match directive {
                    Directive::Order(order) => Reply::Order(order),
                    Directive::EndOfMission(notice) => Reply::EndOfMission(notice),
                })
            }
            Request::OrderStatus(status) => {
                self.coordinator
                    .order_status(&status.id, &status.gun, status.status);
                None
            }
            Request::EomAck(ack) => {
                self.coordinator.eom_ack(&ack.id, &ack.gun);
                None
            }
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(FdcSnapshot {
            guns: self.coordinator.guns().iter().cloned().collect(),
            missions: self.coordinator.missions().to_vec(),
        });
    }
}
