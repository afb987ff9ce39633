//! Block table handed to the visual-programming host
//!
//! The host shows one block per operation and fills its drop-down menus
//! from this table. Blocks serialize in the host's compact array form,
//! `[kind, label, operation, default...]`.

use crate::commands::{Compliance, LedColor, MoveCommand};
use crate::facade::RobotFacade;
use crate::locale::Locale;
use crate::motors::MotorSet;
use crate::{PoppyError, Result};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const DOCUMENTATION_URL: &str = "https://poppy-project.github.io/scratch-extensions/";

/// Register names offered in the register menus
pub const REGISTERS: [&str; 6] = [
    "goal_position",
    "present_position",
    "moving_speed",
    "compliant",
    "led",
    "present_temperature",
];

/// Primitives shipped with the Ergo Jr software
pub const BEHAVIORS: [&str; 6] = [
    "dance",
    "base_posture",
    "rest_posture",
    "curious_posture",
    "tetris_posture",
    "safe_power_up",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Runs and returns immediately
    Command,
    /// Runs until the operation completes
    Wait,
    /// Returns a value
    Reporter,
    /// Returns a value once the operation completes
    AsyncReporter,
}

impl BlockKind {
    fn code(&self) -> &'static str {
        match self {
            BlockKind::Command => " ",
            BlockKind::Wait => "w",
            BlockKind::Reporter => "r",
            BlockKind::AsyncReporter => "R",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    pub kind: BlockKind,
    pub label: &'static str,
    pub operation: &'static str,
    pub defaults: Vec<Value>,
}

impl Serialize for BlockSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3 + self.defaults.len()))?;
        seq.serialize_element(self.kind.code())?;
        seq.serialize_element(self.label)?;
        seq.serialize_element(self.operation)?;
        for value in &self.defaults {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Descriptor {
    pub blocks: Vec<BlockSpec>,
    pub menus: BTreeMap<&'static str, Vec<String>>,
    pub url: &'static str,
}

impl Descriptor {
    pub fn block(&self, operation: &str) -> Option<&BlockSpec> {
        self.blocks.iter().find(|block| block.operation == operation)
    }
}

fn block(
    kind: BlockKind,
    label: &'static str,
    operation: &'static str,
    defaults: Vec<Value>,
) -> BlockSpec {
    BlockSpec {
        kind,
        label,
        operation,
        defaults,
    }
}

/// Build the block table with menus labelled for `locale`
pub fn descriptor(locale: &Locale, motors: &MotorSet) -> Descriptor {
    use BlockKind::*;

    let off = locale.menu(&locale.colors, [LedColor::Off.as_str()]).remove(0);
    let compliant = locale
        .menu(&locale.compliance, [Compliance::Compliant.as_str()])
        .remove(0);
    let start = locale
        .menu(&locale.move_commands, [MoveCommand::Start.as_str()])
        .remove(0);
    let yes = locale.menu(&locale.answers, ["yes"]).remove(0);

    let blocks = vec![
        block(Reporter, "Robot URL", "robot_url", vec![]),
        block(Command, "Set robot URL to %s", "set_robot_url", vec![json!("")]),
        block(
            Command,
            "Set robot host to %m.schemes %s",
            "set_robot_host",
            vec![json!("http"), json!("poppy.local:8080")],
        ),
        block(AsyncReporter, "Test robot connection", "test_connection", vec![]),
        block(
            Wait,
            "Set motor(s) %m.motors %m.compliance",
            "set_motors_compliance",
            vec![json!("all"), json!(compliant)],
        ),
        block(
            Wait,
            "Set motor(s) %m.motors to position %n in %n seconds",
            "set_motors_position",
            vec![json!("all"), json!(0), json!(2)],
        ),
        block(
            Wait,
            "Set motor(s) %m.motors to position %n in %n seconds, wait %m.answers",
            "set_motors_position_and_wait",
            vec![json!("all"), json!(0), json!(2), json!(yes)],
        ),
        block(
            Wait,
            "Set %m.registers of motor(s) %m.motors to %s",
            "set_motors_register",
            vec![json!("goal_position"), json!("all"), json!("")],
        ),
        block(
            Wait,
            "Set LED color to %m.colors for motor(s) %m.motors",
            "set_led_color",
            vec![json!(off), json!("all")],
        ),
        block(
            AsyncReporter,
            "%m.registers of motor(s) %m.motors",
            "get_motors_register",
            vec![json!("present_position"), json!("all")],
        ),
        block(AsyncReporter, "Motor names", "get_motors_names", vec![]),
        block(Wait, "Start behavior %m.behaviors", "start_behavior", vec![json!(BEHAVIORS[0])]),
        block(Wait, "Stop behavior %m.behaviors", "stop_behavior", vec![json!(BEHAVIORS[0])]),
        block(Wait, "%m.moveCommands behavior %s", "update_move", vec![json!(start), json!("")]),
        block(
            Wait,
            "Record move %s on motor(s) %m.motors",
            "create_and_record_move",
            vec![json!(""), json!("all")],
        ),
        block(Wait, "Stop recording move %s", "stop_move_record", vec![json!("")]),
        block(Wait, "Delete move %s", "delete_move", vec![json!("")]),
        block(Wait, "Play move %s | speed × %n", "play_move", vec![json!(""), json!(1)]),
        block(Wait, "Stop move %s", "stop_move", vec![json!("")]),
    ];

    let mut motor_menu: Vec<String> = motors.ids().iter().map(|id| id.to_string()).collect();
    motor_menu.push("all".to_string());

    let mut menus = BTreeMap::new();
    menus.insert("schemes", vec!["http".to_string(), "https".to_string()]);
    menus.insert("motors", motor_menu);
    menus.insert(
        "compliance",
        locale.menu(&locale.compliance, Compliance::ALL.iter().map(|c| c.as_str())),
    );
    menus.insert("registers", REGISTERS.iter().map(|r| r.to_string()).collect());
    menus.insert(
        "colors",
        locale.menu(&locale.colors, LedColor::ALL.iter().map(|c| c.as_str())),
    );
    menus.insert("answers", locale.menu(&locale.answers, ["yes", "no"]));
    menus.insert(
        "moveCommands",
        locale.menu(&locale.move_commands, MoveCommand::ALL.iter().map(|c| c.as_str())),
    );
    menus.insert("behaviors", BEHAVIORS.iter().map(|b| b.to_string()).collect());

    Descriptor {
        blocks,
        menus,
        url: DOCUMENTATION_URL,
    }
}

/// Value a block hands back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockOutput {
    Done,
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

fn arg<'a>(args: &'a [String], index: usize) -> &'a str {
    args.get(index).map(String::as_str).unwrap_or("")
}

fn number(args: &[String], index: usize, default: f64) -> Result<f64> {
    let raw = arg(args, index).trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.replace(',', ".")
        .parse()
        .map_err(|_| PoppyError::InvalidInput(format!("'{}' is not a number", raw)))
}

/// Run the operation named by a block with the host's string arguments
///
/// Missing arguments are treated as blank. `set_motors_position_and_wait`
/// resolves after the movement duration when its last argument is "yes" in
/// the session locale.
pub async fn invoke(facade: &RobotFacade, operation: &str, args: &[String]) -> Result<BlockOutput> {
    let output = match operation {
        "robot_url" => BlockOutput::Text(facade.robot_url().to_string()),
        "set_robot_url" => BlockOutput::Text(facade.set_robot_url(arg(args, 0)).to_string()),
        "set_robot_host" => {
            BlockOutput::Text(facade.set_robot_host(arg(args, 0), arg(args, 1)).to_string())
        }
        "test_connection" => BlockOutput::Flag(facade.test_connection().await),
        "set_motors_compliance" => {
            facade.set_motors_compliance(arg(args, 0), arg(args, 1)).await?;
            BlockOutput::Done
        }
        "set_motors_position" => {
            let position = number(args, 1, 0.0)?;
            let duration = number(args, 2, 2.0)?;
            facade.set_motors_position(arg(args, 0), position, duration).await?;
            BlockOutput::Done
        }
        "set_motors_position_and_wait" => {
            let position = number(args, 1, 0.0)?;
            let duration = number(args, 2, 2.0)?;
            let wait = facade.session().locale().answer(arg(args, 3));
            facade
                .set_motors_position_and_wait(arg(args, 0), position, duration, wait)
                .await?
                .settled()
                .await;
            BlockOutput::Done
        }
        "set_motors_register" => {
            facade.set_motors_register(arg(args, 1), arg(args, 0), arg(args, 2)).await?;
            BlockOutput::Done
        }
        "set_led_color" => {
            facade.set_led_color(arg(args, 1), arg(args, 0)).await?;
            BlockOutput::Done
        }
        "get_motors_register" => {
            BlockOutput::List(facade.get_motors_register(arg(args, 1), arg(args, 0)).await?)
        }
        "get_motors_names" => BlockOutput::List(facade.get_motors_names().await?),
        "start_behavior" => {
            facade.start_behavior(arg(args, 0)).await?;
            BlockOutput::Done
        }
        "stop_behavior" => {
            facade.stop_behavior(arg(args, 0)).await?;
            BlockOutput::Done
        }
        "update_move" => {
            facade.update_move(arg(args, 0), arg(args, 1)).await?;
            BlockOutput::Done
        }
        "create_and_record_move" => {
            facade.create_and_record_move(arg(args, 0), arg(args, 1)).await?;
            BlockOutput::Done
        }
        "stop_move_record" => {
            facade.stop_move_record(arg(args, 0)).await?;
            BlockOutput::Done
        }
        "delete_move" => {
            facade.delete_move(arg(args, 0)).await?;
            BlockOutput::Done
        }
        "play_move" => {
            let speed = number(args, 1, 1.0)?;
            facade.play_move(arg(args, 0), Some(speed)).await?;
            BlockOutput::Done
        }
        "stop_move" => {
            facade.stop_move(arg(args, 0)).await?;
            BlockOutput::Done
        }
        other => {
            return Err(PoppyError::InvalidInput(format!("unknown operation '{}'", other)));
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_serializes_as_array() {
        let spec = block(BlockKind::Wait, "Stop move %s", "stop_move", vec![json!("")]);
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!(["w", "Stop move %s", "stop_move", ""])
        );
    }

    #[test]
    fn test_french_menus() {
        let descriptor = descriptor(&Locale::french(), &MotorSet::ergo_jr());
        assert_eq!(descriptor.menus["colors"][1], "rouge");
        assert_eq!(descriptor.menus["compliance"], vec!["souple", "rigide"]);
        assert_eq!(descriptor.menus["answers"], vec!["oui", "non"]);
        assert_eq!(descriptor.menus["motors"].last().unwrap(), "all");
        assert_eq!(descriptor.menus["motors"].len(), 7);
    }

    #[test]
    fn test_defaults_use_locale_labels() {
        let descriptor = descriptor(&Locale::french(), &MotorSet::ergo_jr());
        let led = descriptor.block("set_led_color").unwrap();
        assert_eq!(led.defaults[0], json!("éteint"));
        let wait = descriptor.block("set_motors_position_and_wait").unwrap();
        assert_eq!(wait.defaults[3], json!("oui"));
    }

    #[test]
    fn test_number_parsing() {
        let args = vec!["m1".to_string(), "12,5".to_string(), "".to_string()];
        assert_eq!(number(&args, 1, 0.0).unwrap(), 12.5);
        assert_eq!(number(&args, 2, 2.0).unwrap(), 2.0);
        assert_eq!(number(&args, 5, 1.0).unwrap(), 1.0);
        assert!(number(&["abc".to_string()], 0, 0.0).is_err());
    }
}
