//! Poppy Ergo Jr - command façade for the robot's REST and WebSocket API
//!
//! Exposes the robot's control endpoint as a small set of named async
//! commands (motor position, compliance, LED color, registers, move
//! recording and playback, behaviors) suitable for driving from a
//! visual-programming host or any other frontend.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use poppy_ergo::ErgoService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ErgoService::new_with_config("config/default_config.yaml")?;
//!     let robot = service.commands();
//!
//!     if robot.test_connection().await {
//!         robot.set_led_color("m1,m2", "rouge").await?;
//!         robot
//!             .set_motors_position_and_wait("", 0.0, 2.0, true)
//!             .await?
//!             .settled()
//!             .await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **ErgoService**: builds everything from a YAML configuration
//! - **RobotFacade**: one async operation per robot command
//! - **RobotSession**: per-robot address, recording set and locale
//! - **RobotTransport**: GET-only transport seam (reqwest in production)
//! - **StatusChannel**: optional WebSocket state stream
//! - **blocks**: block table and dispatcher for the host environment

pub mod address;
pub mod blocks;
pub mod commands;
pub mod config;
pub mod error;
pub mod facade;
pub mod locale;
pub mod motion;
pub mod motors;
pub mod recording;
pub mod routes;
pub mod service;
pub mod session;
#[cfg(feature = "status-channel")]
pub mod status;
pub mod transport;

pub use address::RobotAddress;
pub use blocks::{BlockOutput, Descriptor};
pub use commands::{Compliance, LedColor, MoveCommand};
pub use config::Config;
pub use error::{PoppyError, Result};
pub use facade::RobotFacade;
pub use locale::{LabelTable, Locale};
pub use motion::MotionHandle;
pub use motors::{MotorId, MotorSelector, MotorSet, RegisterAssignment};
pub use recording::{RecordingSession, Reservation};
pub use service::ErgoService;
pub use session::RobotSession;
pub use transport::{HttpTransport, RobotTransport};

#[cfg(feature = "status-channel")]
pub use status::{ChannelState, RobotSettings, RobotSnapshot, StatusChannel, StatusReport};
