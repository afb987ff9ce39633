//! REST routes of the robot's control server
//!
//! Pure path builders; the façade joins them onto the current address.

use crate::commands::MoveCommand;
use crate::motors::{join, GotoAssignment, MotorSelector, RegisterAssignment, FIELD_SEPARATOR};

pub const MOVE_RECORDER: &str = "MoveRecorder";
pub const MOVE_PLAYER: &str = "MovePlayer";

/// Percent-encode a user-supplied name for use as one path segment
fn segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Register names and values are encoded so `#`, `/`, `:` and `;` cannot
/// split the batch or end the path
pub fn set_registers(assignments: &[RegisterAssignment]) -> String {
    let batch = join(assignments.iter().map(|a| {
        format!(
            "{}{sep}{}{sep}{}",
            a.motor,
            segment(&a.register),
            segment(&a.value),
            sep = FIELD_SEPARATOR
        )
    }));
    format!("motors/set/registers/{}", batch)
}

pub fn goto(assignments: &[GotoAssignment]) -> String {
    format!("motors/set/goto/{}", join(assignments))
}

pub fn get_register(motors: &MotorSelector, register: &str) -> String {
    format!("motors/{}/get/{}", motors.to_path_list(), segment(register))
}

pub fn motor_names() -> String {
    "motors/motors".to_string()
}

pub fn primitive(name: &str, command: MoveCommand) -> String {
    format!("primitive/{}/{}", segment(name), command.route_segment())
}

pub fn record_start(move_name: &str, motors: &MotorSelector) -> String {
    format!(
        "primitive/{}/{}/start/{}",
        MOVE_RECORDER,
        segment(move_name),
        motors.to_path_list()
    )
}

pub fn record_stop(move_name: &str) -> String {
    format!("primitive/{}/{}/stop", MOVE_RECORDER, segment(move_name))
}

pub fn record_remove(move_name: &str) -> String {
    format!("primitive/{}/{}/remove", MOVE_RECORDER, segment(move_name))
}

/// Start playback; the speed segment is only sent when it differs from 1
pub fn play_start(move_name: &str, speed: Option<f64>) -> String {
    let base = format!("primitive/{}/{}/start", MOVE_PLAYER, segment(move_name));
    match speed {
        Some(speed) if speed != 1.0 => format!("{}/{}", base, speed),
        _ => base,
    }
}

pub fn play_stop(move_name: &str) -> String {
    format!("primitive/{}/{}/stop", MOVE_PLAYER, segment(move_name))
}
