//! Enumerated command arguments
//!
//! Canonical tokens for the menu-driven inputs (LED colors, compliance and
//! move commands). Localized labels are resolved to these through a
//! [`Locale`](crate::locale::Locale).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// LED colors supported by the XL-320 servos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    #[default]
    Off,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Pink,
    White,
}

impl LedColor {
    pub const ALL: [LedColor; 8] = [
        LedColor::Off,
        LedColor::Red,
        LedColor::Green,
        LedColor::Blue,
        LedColor::Yellow,
        LedColor::Cyan,
        LedColor::Pink,
        LedColor::White,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LedColor::Off => "off",
            LedColor::Red => "red",
            LedColor::Green => "green",
            LedColor::Blue => "blue",
            LedColor::Yellow => "yellow",
            LedColor::Cyan => "cyan",
            LedColor::Pink => "pink",
            LedColor::White => "white",
        }
    }
}

impl FromStr for LedColor {
    type Err = ();

    fn from_str(token: &str) -> std::result::Result<Self, Self::Err> {
        LedColor::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(token.trim()))
            .ok_or(())
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Servo compliance mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compliance {
    /// Motor can be moved by hand
    #[default]
    Compliant,
    /// Motor holds its position
    Stiff,
}

impl Compliance {
    pub const ALL: [Compliance; 2] = [Compliance::Compliant, Compliance::Stiff];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compliance::Compliant => "compliant",
            Compliance::Stiff => "stiff",
        }
    }

    /// Value written to the `compliant` register
    pub fn register_value(&self) -> u8 {
        match self {
            Compliance::Stiff => 0,
            Compliance::Compliant => 1,
        }
    }
}

impl FromStr for Compliance {
    type Err = ();

    fn from_str(token: &str) -> std::result::Result<Self, Self::Err> {
        Compliance::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(token.trim()))
            .ok_or(())
    }
}

/// Playback command for a named move or primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCommand {
    Start,
    Pause,
    Stop,
    Restart,
}

impl MoveCommand {
    pub const ALL: [MoveCommand; 4] = [
        MoveCommand::Start,
        MoveCommand::Pause,
        MoveCommand::Stop,
        MoveCommand::Restart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveCommand::Start => "start",
            MoveCommand::Pause => "pause",
            MoveCommand::Stop => "stop",
            MoveCommand::Restart => "restart",
        }
    }

    /// Path segment understood by the robot's primitive manager
    pub fn route_segment(&self) -> &'static str {
        match self {
            MoveCommand::Start => "start",
            MoveCommand::Pause => "pause",
            MoveCommand::Stop => "stop",
            MoveCommand::Restart => "resume",
        }
    }
}

impl FromStr for MoveCommand {
    type Err = ();

    fn from_str(token: &str) -> std::result::Result<Self, Self::Err> {
        MoveCommand::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(token.trim()))
            .ok_or(())
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_register_values() {
        assert_eq!(Compliance::Stiff.register_value(), 0);
        assert_eq!(Compliance::Compliant.register_value(), 1);
    }

    #[test]
    fn test_canonical_tokens_parse_case_insensitively() {
        assert_eq!("Red".parse::<LedColor>(), Ok(LedColor::Red));
        assert_eq!(" stiff ".parse::<Compliance>(), Ok(Compliance::Stiff));
        assert_eq!("PAUSE".parse::<MoveCommand>(), Ok(MoveCommand::Pause));
        assert!("purple".parse::<LedColor>().is_err());
    }

    #[test]
    fn test_restart_maps_to_resume_route() {
        assert_eq!(MoveCommand::Restart.route_segment(), "resume");
        assert_eq!(MoveCommand::Stop.route_segment(), "stop");
    }
}
