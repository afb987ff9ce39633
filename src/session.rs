//! Per-robot session state
//!
//! Everything that is mutable across commands lives here: the current
//! address, the moves being recorded and the active locale. Each façade
//! holds its own session, so several robots can be driven side by side.

use crate::address::RobotAddress;
use crate::locale::Locale;
use crate::motors::MotorSet;
use crate::recording::RecordingSession;
use std::sync::{RwLock, RwLockReadGuard};
use tracing::info;

#[derive(Debug, Default)]
pub struct RobotSession {
    address: RwLock<RobotAddress>,
    locale: RwLock<Locale>,
    motors: MotorSet,
    recordings: RecordingSession,
}

impl RobotSession {
    pub fn new(address: RobotAddress, motors: MotorSet, locale: Locale) -> Self {
        Self {
            address: RwLock::new(address),
            locale: RwLock::new(locale),
            motors,
            recordings: RecordingSession::new(),
        }
    }

    pub fn address(&self) -> RobotAddress {
        self.address
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_address(&self, address: RobotAddress) {
        info!("Robot address set to {}", address);
        *self
            .address
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = address;
    }

    pub fn locale(&self) -> RwLockReadGuard<'_, Locale> {
        self.locale.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_locale(&self, locale: Locale) {
        info!("Locale set to {}", locale.name);
        *self
            .locale
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = locale;
    }

    pub fn motors(&self) -> &MotorSet {
        &self.motors
    }

    pub fn recordings(&self) -> &RecordingSession {
        &self.recordings
    }
}
