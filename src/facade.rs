//! RobotFacade - one async operation per robot command
//!
//! Each operation normalizes its inputs, issues a single GET against the
//! session's current address and resolves exactly once. Invalid input is
//! rejected before anything is sent; transport failures come back as
//! `Err`, never as a panic.

use crate::address::RobotAddress;
use crate::commands::{Compliance, LedColor, MoveCommand};
use crate::motion::MotionHandle;
use crate::motors::MotorSelector;
use crate::routes;
use crate::session::RobotSession;
use crate::transport::{HttpTransport, RobotTransport};
use crate::{PoppyError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Register holding the compliance flag
pub const COMPLIANT_REGISTER: &str = "compliant";
/// Register holding the LED color
pub const LED_REGISTER: &str = "led";

/// Delimiter of register values in query responses
const VALUE_DELIMITER: char = ';';
/// Delimiter of motor names in query responses
const NAME_DELIMITER: char = '/';

/// Command façade for one robot
///
/// Cloning is cheap and clones share the same session, so concurrent calls
/// see the same address and recording set. Calls are not serialized against
/// each other.
#[derive(Clone)]
pub struct RobotFacade {
    session: Arc<RobotSession>,
    transport: Arc<dyn RobotTransport>,
}

impl RobotFacade {
    /// Façade over HTTP with a default session
    pub fn new() -> Self {
        Self::with_transport(Arc::new(RobotSession::default()), Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(session: Arc<RobotSession>, transport: Arc<dyn RobotTransport>) -> Self {
        Self { session, transport }
    }

    pub fn session(&self) -> &Arc<RobotSession> {
        &self.session
    }

    // --- address ---------------------------------------------------------

    pub fn robot_url(&self) -> RobotAddress {
        self.session.address()
    }

    /// Point the façade at another robot. Blank input restores the default.
    pub fn set_robot_url(&self, url: &str) -> RobotAddress {
        let address = RobotAddress::parse(url);
        self.session.set_address(address.clone());
        address
    }

    pub fn set_robot_host(&self, scheme: &str, host: &str) -> RobotAddress {
        let address = RobotAddress::from_parts(scheme, host);
        self.session.set_address(address.clone());
        address
    }

    /// Whether the robot answers at its current address
    pub async fn test_connection(&self) -> bool {
        let address = self.session.address();
        match self.transport.get(address.as_str()).await {
            Ok(_) => {
                info!("Robot reachable at {}", address);
                true
            }
            Err(e) => {
                warn!("Robot unreachable at {}: {}", address, e);
                false
            }
        }
    }

    // --- motors ----------------------------------------------------------

    /// Move the selected motors to `position` (degrees) over `duration` seconds
    pub async fn set_motors_position(
        &self,
        motors: &str,
        position: f64,
        duration: f64,
    ) -> Result<()> {
        let selector = self.select(motors)?;
        validate_motion(position, duration)?;
        self.send(&routes::goto(&selector.goto(position, duration))).await?;
        Ok(())
    }

    /// Like [`set_motors_position`](Self::set_motors_position), with a handle
    /// that resolves after `duration` when `wait` is set
    pub async fn set_motors_position_and_wait(
        &self,
        motors: &str,
        position: f64,
        duration: f64,
        wait: bool,
    ) -> Result<MotionHandle> {
        self.set_motors_position(motors, position, duration).await?;
        Ok(MotionHandle::new(duration, wait))
    }

    /// Set compliance from a localized label ("rigide", "stiff", ...)
    pub async fn set_motors_compliance(&self, motors: &str, label: &str) -> Result<()> {
        let compliance = self.session.locale().compliance(label);
        self.set_compliance(motors, compliance).await
    }

    pub async fn set_compliance(&self, motors: &str, compliance: Compliance) -> Result<()> {
        let selector = self.select(motors)?;
        let value = compliance.register_value().to_string();
        self.write_registers(&selector, COMPLIANT_REGISTER, &value).await
    }

    pub async fn set_motors_register(
        &self,
        motors: &str,
        register: &str,
        value: &str,
    ) -> Result<()> {
        let register = register.trim();
        if register.is_empty() {
            return Err(PoppyError::InvalidInput("register name is empty".to_string()));
        }
        let selector = self.select(motors)?;
        self.write_registers(&selector, register, value.trim()).await
    }

    /// Set LED color from a localized label. Unknown colors switch the LED off.
    pub async fn set_led_color(&self, motors: &str, label: &str) -> Result<()> {
        let color = self.session.locale().color(label);
        self.set_led(motors, color).await
    }

    pub async fn set_led(&self, motors: &str, color: LedColor) -> Result<()> {
        let selector = self.select(motors)?;
        self.write_registers(&selector, LED_REGISTER, color.as_str()).await
    }

    /// Read one register from each selected motor, in selector order
    pub async fn get_motors_register(&self, motors: &str, register: &str) -> Result<Vec<String>> {
        let register = register.trim();
        if register.is_empty() {
            return Err(PoppyError::InvalidInput("register name is empty".to_string()));
        }
        let selector = self.select(motors)?;
        let body = self.send(&routes::get_register(&selector, register)).await?;
        Ok(split_body(&body, VALUE_DELIMITER))
    }

    /// Names of the motors the robot reports
    pub async fn get_motors_names(&self) -> Result<Vec<String>> {
        let body = self.send(&routes::motor_names()).await?;
        Ok(split_body(&body, NAME_DELIMITER))
    }

    // --- behaviors -------------------------------------------------------

    pub async fn start_behavior(&self, behavior: &str) -> Result<()> {
        self.update_primitive(MoveCommand::Start, behavior).await
    }

    pub async fn stop_behavior(&self, behavior: &str) -> Result<()> {
        self.update_primitive(MoveCommand::Stop, behavior).await
    }

    /// Apply a localized move command ("démarrer", "pause", ...) to a primitive
    pub async fn update_move(&self, command: &str, name: &str) -> Result<()> {
        let command = self.session.locale().move_command(command);
        self.update_primitive(command, name).await
    }

    pub async fn update_primitive(&self, command: MoveCommand, name: &str) -> Result<()> {
        let name = required_name(name, "behavior")?;
        self.send(&routes::primitive(name, command)).await?;
        Ok(())
    }

    // --- moves -----------------------------------------------------------

    /// Start recording `move_name` on the selected motors
    ///
    /// Fails without sending anything if the name is blank or already being
    /// recorded by this session. The name is only kept once the robot
    /// accepted the request; a failed or cancelled call releases it.
    pub async fn create_and_record_move(&self, move_name: &str, motors: &str) -> Result<()> {
        let move_name = required_name(move_name, "move")?;
        let selector = self.select(motors)?;
        let reservation = self.session.recordings().begin(move_name)?;

        self.send(&routes::record_start(move_name, &selector)).await?;
        reservation.commit();
        info!("Recording move '{}' on {}", move_name, selector.to_display_list());
        Ok(())
    }

    /// Stop recording `move_name`
    ///
    /// The move leaves the recording set only when the robot acknowledged
    /// the stop; after a transport failure it stays recording so the stop
    /// can be retried.
    pub async fn stop_move_record(&self, move_name: &str) -> Result<()> {
        let move_name = required_name(move_name, "move")?;
        self.send(&routes::record_stop(move_name)).await?;
        if !self.session.recordings().finish(move_name) {
            debug!("Move '{}' was not recorded by this session", move_name);
        }
        info!("Stopped recording move '{}'", move_name);
        Ok(())
    }

    pub async fn delete_move(&self, move_name: &str) -> Result<()> {
        let move_name = required_name(move_name, "move")?;
        self.send(&routes::record_remove(move_name)).await?;
        Ok(())
    }

    /// Play a recorded move, optionally at a speed factor
    pub async fn play_move(&self, move_name: &str, speed: Option<f64>) -> Result<()> {
        let move_name = required_name(move_name, "move")?;
        if let Some(speed) = speed {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(PoppyError::InvalidInput(format!("invalid playback speed {}", speed)));
            }
        }
        self.send(&routes::play_start(move_name, speed)).await?;
        Ok(())
    }

    pub async fn stop_move(&self, move_name: &str) -> Result<()> {
        let move_name = required_name(move_name, "move")?;
        self.send(&routes::play_stop(move_name)).await?;
        Ok(())
    }

    // --- internals -------------------------------------------------------

    fn select(&self, motors: &str) -> Result<MotorSelector> {
        self.session.motors().select(motors)
    }

    async fn write_registers(
        &self,
        selector: &MotorSelector,
        register: &str,
        value: &str,
    ) -> Result<()> {
        self.send(&routes::set_registers(&selector.assign(register, value))).await?;
        Ok(())
    }

    async fn send(&self, path: &str) -> Result<String> {
        let url = self.session.address().join(path);
        debug!("Sending {}", url);
        self.transport.get(&url).await.map_err(|e| {
            warn!("Request {} failed: {}", url, e);
            e
        })
    }
}

impl Default for RobotFacade {
    fn default() -> Self {
        Self::new()
    }
}

fn required_name<'a>(name: &'a str, kind: &str) -> Result<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PoppyError::InvalidInput(format!("{} name is empty", kind)));
    }
    Ok(name)
}

fn validate_motion(position: f64, duration: f64) -> Result<()> {
    if !position.is_finite() {
        return Err(PoppyError::InvalidInput(format!("invalid position {}", position)));
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(PoppyError::InvalidInput(format!("invalid duration {}", duration)));
    }
    Ok(())
}

/// Split a plain-text response, keeping positions
///
/// Interior empty fields are kept so values stay aligned with the
/// selector; only one trailing delimiter is ignored.
fn split_body(body: &str, delimiter: char) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        return Vec::new();
    }
    let body = body.strip_suffix(delimiter).unwrap_or(body);
    body.split(delimiter).map(|part| part.trim().to_string()).collect()
}
