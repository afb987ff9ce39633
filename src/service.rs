//! ErgoService - high-level wrapper for embedding the client
//!
//! Builds the session, façade and (optionally) status channel from one
//! configuration so callers do not have to wire them by hand.

use crate::config::Config;
use crate::facade::RobotFacade;
use crate::session::RobotSession;
use crate::transport::{HttpTransport, RobotTransport};
use crate::Result;
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "status-channel")]
use crate::status::StatusChannel;

#[derive(Clone)]
pub struct ErgoService {
    facade: RobotFacade,
    #[cfg(feature = "status-channel")]
    status: StatusChannel,
}

impl ErgoService {
    /// Create a service from a YAML configuration file
    pub fn new_with_config(config_path: &str) -> Result<Self> {
        let config = Config::load_from_path(config_path)?;
        Ok(Self::new(&config))
    }

    /// Create a service from a YAML configuration string
    pub fn new_with_config_str(config_str: &str) -> Result<Self> {
        let config = Config::load_from_str(config_str)?;
        Ok(Self::new(&config))
    }

    /// Create a service talking HTTP to the configured robot
    pub fn new(config: &Config) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: &Config, transport: Arc<dyn RobotTransport>) -> Self {
        let session = Arc::new(RobotSession::new(
            config.address(),
            config.motor_set(),
            config.locale(),
        ));
        info!(
            "Ergo Jr service ready (robot {}, locale {})",
            session.address(),
            config.locale.name
        );

        Self {
            facade: RobotFacade::with_transport(Arc::clone(&session), transport),
            #[cfg(feature = "status-channel")]
            status: StatusChannel::new(&config.status_url(), session),
        }
    }

    /// Command façade
    pub fn commands(&self) -> &RobotFacade {
        &self.facade
    }

    pub fn session(&self) -> &Arc<RobotSession> {
        self.facade.session()
    }

    /// WebSocket status channel sharing the façade's session
    #[cfg(feature = "status-channel")]
    pub fn status(&self) -> &StatusChannel {
        &self.status
    }

    /// Close the status channel if it is open
    pub fn shutdown(&self) {
        #[cfg(feature = "status-channel")]
        self.status.shutdown();
        info!("Ergo Jr service shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_from_config_str() {
        let service = ErgoService::new_with_config_str(
            "robot:\n  host: 192.168.1.20:8080\nlocale:\n  name: en\n",
        )
        .unwrap();
        assert_eq!(service.commands().robot_url().as_str(), "http://192.168.1.20:8080");
        assert_eq!(service.session().locale().name, "en");
    }

    #[cfg(feature = "status-channel")]
    #[test]
    fn test_status_channel_shares_session() {
        let service = ErgoService::new_with_config_str("motors: [m1, m2]").unwrap();
        assert_eq!(service.status().url(), "ws://poppy.local:9009");
        assert_eq!(service.status().settings().0.len(), 2);
    }
}
