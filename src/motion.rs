//! Completion tracking for timed moves

use std::time::Duration;

/// Returned once a goto request has been accepted by the robot
///
/// When the caller asked to wait, [`settled`](Self::settled) resolves after
/// the requested movement duration. Arrival is presumed, not measured: the
/// robot is never polled.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a motion handle does nothing unless `settled` is awaited"]
pub struct MotionHandle {
    settle_after: Option<Duration>,
}

impl MotionHandle {
    pub(crate) fn new(duration_secs: f64, wait: bool) -> Self {
        let settle_after = wait.then(|| Duration::from_millis(seconds_to_millis(duration_secs)));
        Self { settle_after }
    }

    /// Whether `settled` will wait for the movement duration
    pub fn will_settle(&self) -> bool {
        self.settle_after.is_some()
    }

    pub fn settle_after(&self) -> Option<Duration> {
        self.settle_after
    }

    /// Resolve once the movement is presumed complete
    pub async fn settled(self) {
        if let Some(delay) = self.settle_after {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Callers validate that `secs` is finite and non-negative
fn seconds_to_millis(secs: f64) -> u64 {
    (secs * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_delay_in_millis() {
        let handle = MotionHandle::new(2.0, true);
        assert_eq!(handle.settle_after(), Some(Duration::from_millis(2000)));

        let handle = MotionHandle::new(0.25, true);
        assert_eq!(handle.settle_after(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_no_wait_means_no_settle() {
        let handle = MotionHandle::new(2.0, false);
        assert!(!handle.will_settle());
        assert_eq!(handle.settle_after(), None);
    }
}
