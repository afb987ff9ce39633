//! Move recording bookkeeping
//!
//! Tracks which move names have a recorder running on the robot so that the
//! same name is never recorded twice at once. Each name is either idle
//! (absent) or recording (present).

use crate::{PoppyError, Result};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct RecordingSession {
    moves: Mutex<BTreeSet<String>>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        // The set holds plain names; a panic elsewhere cannot leave it half-updated.
        self.moves.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reserve `name` for recording, failing if it is already taken
    ///
    /// The name is released again when the returned reservation is dropped
    /// without [`commit`](Reservation::commit), including when the future
    /// holding it is cancelled.
    pub fn begin(&self, name: &str) -> Result<Reservation<'_>> {
        if self.lock().insert(name.to_string()) {
            Ok(Reservation {
                session: self,
                name: Some(name.to_string()),
            })
        } else {
            Err(PoppyError::AlreadyRecording(name.to_string()))
        }
    }

    /// Return `name` to idle. Returns whether it was recording.
    pub fn finish(&self, name: &str) -> bool {
        self.lock().remove(name)
    }

    pub fn is_recording(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    pub fn active(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }
}

/// Pending claim on a move name
#[must_use = "dropping a reservation releases the name"]
#[derive(Debug)]
pub struct Reservation<'a> {
    session: &'a RecordingSession,
    name: Option<String>,
}

impl Reservation<'_> {
    /// Keep the name recording after the reservation goes away
    pub fn commit(mut self) {
        self.name = None;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if let Some(name) = self.name.take() {
            self.session.finish(&name);
        }
    }
}
