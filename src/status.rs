//! WebSocket status channel
//!
//! Keeps one long-lived connection to the robot's status server. Outbound
//! messages are full settings documents or per-motor LED patches; inbound
//! messages are robot state documents, validated before they replace the
//! latest snapshot.
//!
//! Lifecycle: `Disconnected → Connecting → Connected → Disconnecting →
//! Disconnected`. A failed handshake or a closed socket always lands back
//! in `Disconnected`.

use crate::commands::LedColor;
use crate::motors::{MotorId, MotorSet};
use crate::session::RobotSession;
use crate::{PoppyError, Result};
use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

/// How long to wait for the robot's close reply after `shutdown`
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Connection lifecycle of the status channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

/// Status as reported to the block host: 0 = error, 1 = warning, 2 = ready
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: u8,
    pub msg: &'static str,
}

/// Settings pushed to the robot for one motor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorSettings {
    pub goal_position: f64,
    pub moving_speed: f64,
    pub torque_limit: f64,
    pub led: LedColor,
}

impl Default for MotorSettings {
    fn default() -> Self {
        Self {
            goal_position: 0.0,
            moving_speed: 500.0,
            torque_limit: 75.0,
            led: LedColor::Off,
        }
    }
}

/// Full settings document, keyed by motor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RobotSettings(pub BTreeMap<MotorId, MotorSettings>);

impl RobotSettings {
    pub fn for_motors(motors: &MotorSet) -> Self {
        Self(
            motors
                .ids()
                .iter()
                .map(|id| (id.clone(), MotorSettings::default()))
                .collect(),
        )
    }

    pub fn motor(&self, id: &MotorId) -> Option<&MotorSettings> {
        self.0.get(id)
    }
}

#[derive(Debug, Serialize)]
struct LedPatch {
    led: LedColor,
}

/// One motor's state as reported by the robot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotorReading {
    pub present_position: Option<f64>,
    pub present_speed: Option<f64>,
    pub present_load: Option<f64>,
    pub present_temperature: Option<f64>,
    pub present_voltage: Option<f64>,
    pub goal_position: Option<f64>,
    pub compliant: Option<bool>,
    pub led: Option<String>,
}

/// Validated robot state document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotSnapshot {
    pub motors: BTreeMap<MotorId, MotorReading>,
    pub received_at: DateTime<Utc>,
}

impl RobotSnapshot {
    /// Parse a state document, rejecting unknown motors and fields
    pub fn parse(text: &str, motors: &MotorSet) -> Result<Self> {
        let readings: BTreeMap<MotorId, MotorReading> = serde_json::from_str(text)?;
        if let Some(unknown) = readings.keys().find(|id| !motors.contains(id.as_str())) {
            return Err(PoppyError::InvalidInput(format!(
                "state document names unknown motor '{}'",
                unknown
            )));
        }
        Ok(Self {
            motors: readings,
            received_at: Utc::now(),
        })
    }

    pub fn motor(&self, id: &str) -> Option<&MotorReading> {
        self.motors.get(&MotorId::new(id))
    }
}

/// Handle to the status connection; clones share the same socket
#[derive(Clone)]
pub struct StatusChannel {
    inner: Arc<ChannelInner>,
}

struct ChannelInner {
    url: String,
    session: Arc<RobotSession>,
    state: watch::Sender<ChannelState>,
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    latest: RwLock<Option<RobotSnapshot>>,
    settings: Mutex<RobotSettings>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StatusChannel {
    pub fn new(url: &str, session: Arc<RobotSession>) -> Self {
        let (state, _) = watch::channel(ChannelState::Disconnected);
        let settings = RobotSettings::for_motors(session.motors());
        Self {
            inner: Arc::new(ChannelInner {
                url: url.trim().to_string(),
                session,
                state,
                outbound: Mutex::new(None),
                latest: RwLock::new(None),
                settings: Mutex::new(settings),
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn state(&self) -> ChannelState {
        *self.inner.state.borrow()
    }

    /// Watch lifecycle transitions
    pub fn subscribe(&self) -> watch::Receiver<ChannelState> {
        self.inner.state.subscribe()
    }

    /// Open the socket in the background
    ///
    /// Returns `false` without doing anything when a socket is already
    /// open or opening, or when called outside a tokio runtime.
    pub fn connect(&self) -> bool {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Cannot open status channel outside a tokio runtime: {}", e);
                return false;
            }
        };
        let claimed = self.inner.state.send_if_modified(|state| {
            if *state == ChannelState::Disconnected {
                *state = ChannelState::Connecting;
                true
            } else {
                false
            }
        });
        if !claimed {
            info!("Status channel already open ({:?})", self.state());
            return false;
        }

        info!("Connecting status channel to {}", self.inner.url);
        let inner = Arc::clone(&self.inner);
        runtime.spawn(inner.run());
        true
    }

    /// Close the socket; the state returns to `Disconnected` once it is closed
    pub fn shutdown(&self) {
        let closing = self.inner.state.send_if_modified(|state| match *state {
            ChannelState::Connected | ChannelState::Connecting => {
                *state = ChannelState::Disconnecting;
                true
            }
            _ => false,
        });
        if !closing {
            debug!("Status channel shutdown requested while {:?}", self.state());
            return;
        }
        info!("Closing status channel");
        // Dropping the sender ends the writer task, which closes the socket.
        lock(&self.inner.outbound).take();
    }

    /// Report status to the host, opening the socket if it is closed
    pub fn poll_status(&self) -> StatusReport {
        match self.state() {
            ChannelState::Disconnected => {
                self.connect();
                StatusReport { status: 0, msg: "Not connected" }
            }
            ChannelState::Connecting => StatusReport { status: 1, msg: "Connecting" },
            ChannelState::Disconnecting => StatusReport { status: 1, msg: "Disconnecting" },
            ChannelState::Connected => StatusReport { status: 2, msg: "Ready" },
        }
    }

    /// Last valid state document received from the robot
    pub fn latest_snapshot(&self) -> Option<RobotSnapshot> {
        self.inner
            .latest
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn log_robot_state(&self) {
        match self.latest_snapshot() {
            Some(snapshot) => match serde_json::to_string(&snapshot) {
                Ok(json) => info!("Robot state: {}", json),
                Err(e) => warn!("Failed to serialize robot state: {}", e),
            },
            None => info!("No robot state received yet"),
        }
    }

    pub fn settings(&self) -> RobotSettings {
        lock(&self.inner.settings).clone()
    }

    /// Send the full local settings document
    pub fn push_settings(&self) -> Result<()> {
        let json = serde_json::to_string(&*lock(&self.inner.settings))?;
        self.send_text(json)
    }

    /// Change LED color of the selected motors through the socket
    pub fn set_led_color(&self, motors: &str, label: &str) -> Result<()> {
        let color = self.inner.session.locale().color(label);
        let selector = self.inner.session.motors().select(motors)?;

        let patch: BTreeMap<&MotorId, LedPatch> = selector
            .ids()
            .iter()
            .map(|id| (id, LedPatch { led: color }))
            .collect();
        let json = serde_json::to_string(&patch)?;
        self.send_text(json)?;

        let mut settings = lock(&self.inner.settings);
        for id in selector.ids() {
            settings.0.entry(id.clone()).or_default().led = color;
        }
        Ok(())
    }

    fn send_text(&self, json: String) -> Result<()> {
        if self.state() != ChannelState::Connected {
            return Err(PoppyError::NotConnected);
        }
        let outbound = lock(&self.inner.outbound);
        let sender = outbound.as_ref().ok_or(PoppyError::NotConnected)?;
        debug!("Status channel send: {}", json);
        sender
            .send(Message::text(json))
            .map_err(|_| PoppyError::NotConnected)
    }
}

impl ChannelInner {
    async fn run(self: Arc<Self>) {
        let stream = match connect_async(self.url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                warn!("Status channel connect to {} failed: {}", self.url, e);
                self.state.send_replace(ChannelState::Disconnected);
                return;
            }
        };
        let (mut write, mut read) = stream.split();

        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        *lock(&self.outbound) = Some(tx);

        let opened = self.state.send_if_modified(|state| {
            if *state == ChannelState::Connecting {
                *state = ChannelState::Connected;
                true
            } else {
                false
            }
        });
        if !opened {
            // Shutdown arrived during the handshake.
            lock(&self.outbound).take();
            let _ = write.close().await;
            self.state.send_replace(ChannelState::Disconnected);
            return;
        }
        info!("Status channel connected to {}", self.url);

        let writer = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(e) = write.send(message).await {
                    warn!("Status channel write failed: {}", e);
                    break;
                }
            }
            let _ = write.close().await;
        });

        let deadline = close_deadline(self.state.subscribe());
        tokio::pin!(deadline);
        loop {
            let frame = tokio::select! {
                frame = read.next() => frame,
                _ = &mut deadline => {
                    warn!("No close reply from {} after {:?}", self.url, CLOSE_TIMEOUT);
                    break;
                }
            };
            match frame {
                Some(Ok(Message::Text(text))) => self.handle_state_document(text.as_str()),
                Some(Ok(Message::Close(_))) => {
                    info!("Status channel closed by robot");
                    break;
                }
                Some(Ok(other)) => debug!("Ignoring status frame: {:?}", other),
                Some(Err(e)) => {
                    warn!("Status channel read failed: {}", e);
                    break;
                }
                None => break,
            }
        }

        lock(&self.outbound).take();
        if tokio::time::timeout(CLOSE_TIMEOUT, writer).await.is_err() {
            warn!("Status channel writer did not finish closing");
        }
        self.state.send_replace(ChannelState::Disconnected);
        info!("Status channel disconnected");
    }

    fn handle_state_document(&self, text: &str) {
        match RobotSnapshot::parse(text, self.session.motors()) {
            Ok(snapshot) => {
                *self
                    .latest
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot);
            }
            Err(e) => warn!("Dropping invalid robot state document: {}", e),
        }
    }
}

/// Resolves `CLOSE_TIMEOUT` after the channel enters `Disconnecting`
async fn close_deadline(mut state: watch::Receiver<ChannelState>) {
    loop {
        if *state.borrow_and_update() == ChannelState::Disconnecting {
            break;
        }
        if state.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
    tokio::time::sleep(CLOSE_TIMEOUT).await;
}
