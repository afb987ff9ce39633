//! Motor selection and request parameter formatting
//!
//! The robot's REST API addresses motors by name and packs batched
//! assignments into a single path segment: tuples are `:`-joined and
//! separated by `;`, e.g. `m1:led:red;m2:led:red`.

use crate::{PoppyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between tuples in a batch request
pub const BATCH_SEPARATOR: &str = ";";
/// Separator between fields of a tuple
pub const FIELD_SEPARATOR: &str = ":";

/// Motor identifier, e.g. `m1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotorId(String);

impl MotorId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MotorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of motors a robot exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotorSet(Vec<MotorId>);

impl MotorSet {
    pub fn new(ids: Vec<MotorId>) -> Self {
        Self(ids)
    }

    /// The six motors of an Ergo Jr, `m1` to `m6`
    pub fn ergo_jr() -> Self {
        Self((1..=6).map(|i| MotorId(format!("m{}", i))).collect())
    }

    pub fn ids(&self) -> &[MotorId] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|id| id.as_str() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a free-text selector into motors of this set
    ///
    /// Accepts comma, semicolon or whitespace separated names. Blank input
    /// and the keyword `all` select every motor. Duplicates are dropped.
    pub fn select(&self, input: &str) -> Result<MotorSelector> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("all") {
            return Ok(MotorSelector(self.0.clone()));
        }

        let mut selected: Vec<MotorId> = Vec::new();
        for token in input.split(is_selector_separator).filter(|t| !t.is_empty()) {
            if token.eq_ignore_ascii_case("all") {
                return Ok(MotorSelector(self.0.clone()));
            }
            if !self.contains(token) {
                return Err(PoppyError::InvalidInput(format!("Unknown motor '{}'", token)));
            }
            if !selected.iter().any(|id| id.as_str() == token) {
                selected.push(MotorId::new(token));
            }
        }

        if selected.is_empty() {
            return Ok(MotorSelector(self.0.clone()));
        }
        Ok(MotorSelector(selected))
    }
}

impl Default for MotorSet {
    fn default() -> Self {
        Self::ergo_jr()
    }
}

fn is_selector_separator(c: char) -> bool {
    matches!(c, ',' | ';') || c.is_whitespace()
}

/// A non-empty, ordered list of motors targeted by one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotorSelector(Vec<MotorId>);

impl MotorSelector {
    pub fn ids(&self) -> &[MotorId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `m1;m2;m3`, as used in `/motors/{...}/get/...` and recorder routes
    pub fn to_path_list(&self) -> String {
        join(self.0.iter().map(MotorId::to_string))
    }

    /// `m1,m2,m3`, the form shown to users
    pub fn to_display_list(&self) -> String {
        self.0
            .iter()
            .map(MotorId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// One register assignment per selected motor
    pub fn assign(&self, register: &str, value: impl fmt::Display) -> Vec<RegisterAssignment> {
        let value = value.to_string();
        self.0
            .iter()
            .map(|motor| RegisterAssignment {
                motor: motor.clone(),
                register: register.trim().to_string(),
                value: value.trim().to_string(),
            })
            .collect()
    }

    /// One goto assignment per selected motor
    pub fn goto(&self, position: f64, duration: f64) -> Vec<GotoAssignment> {
        self.0
            .iter()
            .map(|motor| GotoAssignment {
                motor: motor.clone(),
                position,
                duration,
            })
            .collect()
    }
}

/// `(motor, register, value)` triple of a batch register write
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterAssignment {
    pub motor: MotorId,
    pub register: String,
    pub value: String,
}

impl fmt::Display for RegisterAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.motor,
            self.register,
            self.value,
            sep = FIELD_SEPARATOR
        )
    }
}

/// `(motor, position, duration)` triple of a batch goto
#[derive(Debug, Clone, PartialEq)]
pub struct GotoAssignment {
    pub motor: MotorId,
    pub position: f64,
    pub duration: f64,
}

impl fmt::Display for GotoAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.motor,
            self.position,
            self.duration,
            sep = FIELD_SEPARATOR
        )
    }
}

/// Join batch items with the `;` separator
pub fn join<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(BATCH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_selector_expands_to_all_motors() {
        let motors = MotorSet::ergo_jr();
        for input in ["", "   ", "\t", "all", " ALL "] {
            let selector = motors.select(input).unwrap();
            assert_eq!(selector.to_display_list(), "m1,m2,m3,m4,m5,m6", "input {:?}", input);
        }
    }

    #[test]
    fn test_selector_trims_and_dedups() {
        let motors = MotorSet::ergo_jr();
        let selector = motors.select(" m3 , m1,m3 ").unwrap();
        assert_eq!(selector.to_path_list(), "m3;m1");
    }

    #[test]
    fn test_selector_separators_only_is_all() {
        let motors = MotorSet::ergo_jr();
        assert_eq!(motors.select(" , ,").unwrap().len(), 6);
    }

    #[test]
    fn test_unknown_motor_rejected() {
        let motors = MotorSet::ergo_jr();
        let err = motors.select("m1,m9").unwrap_err();
        assert!(err.is_rejected_input());
    }

    #[test]
    fn test_register_batch_format() {
        let motors = MotorSet::ergo_jr();
        let selector = motors.select("m1,m2").unwrap();
        assert_eq!(join(selector.assign("led", "red")), "m1:led:red;m2:led:red");
    }

    #[test]
    fn test_goto_batch_format() {
        let motors = MotorSet::ergo_jr();
        let selector = motors.select("m1;m2").unwrap();
        assert_eq!(join(selector.goto(30.0, 2.0)), "m1:30:2;m2:30:2");
        assert_eq!(join(selector.goto(-12.5, 0.5)), "m1:-12.5:0.5;m2:-12.5:0.5");
    }

    #[test]
    fn test_custom_motor_set() {
        let motors = MotorSet::new(vec![MotorId::new("base"), MotorId::new("head")]);
        assert_eq!(motors.select("").unwrap().to_path_list(), "base;head");
        assert!(motors.select("m1").is_err());
    }
}
