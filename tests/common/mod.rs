#![allow(dead_code)]

use async_trait::async_trait;
use poppy_ergo::{PoppyError, RobotFacade, RobotSession, RobotTransport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// In-memory robot: records every URL and answers with canned bodies
pub struct MockTransport {
    requests: Mutex<Vec<String>>,
    bodies: Mutex<Vec<(String, String)>>,
    offline: AtomicBool,
    gated: AtomicBool,
    gate: Semaphore,
}

impl MockTransport {
    fn build(offline: bool) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
            offline: AtomicBool::new(offline),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }

    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(false))
    }

    /// A transport whose every request fails like an unreachable host
    pub fn offline() -> Arc<Self> {
        Arc::new(Self::build(true))
    }

    /// Answer `body` to URLs ending with `suffix`
    pub fn respond(&self, suffix: &str, body: &str) {
        self.bodies
            .lock()
            .unwrap()
            .push((suffix.to_string(), body.to_string()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Hold requests until `release` is called
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<String> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RobotTransport for MockTransport {
    async fn get(&self, url: &str) -> poppy_ergo::Result<String> {
        self.requests.lock().unwrap().push(url.to_string());

        if self.gated.load(Ordering::SeqCst) {
            self.gate.acquire().await.unwrap().forget();
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(PoppyError::Transport(format!("connection refused: {}", url)));
        }

        let bodies = self.bodies.lock().unwrap();
        Ok(bodies
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map(|(_, body)| body.clone())
            .unwrap_or_default())
    }
}

pub fn facade_with(transport: &Arc<MockTransport>) -> RobotFacade {
    RobotFacade::with_transport(Arc::new(RobotSession::default()), transport.clone())
}
