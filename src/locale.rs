//! Localized labels for menu inputs
//!
//! Blocks shown to learners use labels in their own language ("rouge",
//! "rigide", "oui"). A [`Locale`] maps those labels to canonical tokens and
//! back. Tables are plain data so new languages can be added from the YAML
//! configuration without touching the façade.

use crate::commands::{Compliance, LedColor, MoveCommand};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Bidirectional label ↔ token table
///
/// Label lookups ignore case and surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    by_label: HashMap<String, String>,
    by_token: HashMap<String, String>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table = Self::new();
        for (label, token) in pairs {
            table.insert(label, token);
        }
        table
    }

    /// Add or replace a label. The last label inserted for a token is the
    /// one used when displaying that token.
    pub fn insert(&mut self, label: &str, token: &str) {
        let label = label.trim();
        let token = token.trim();
        self.by_label.insert(label.to_lowercase(), token.to_string());
        self.by_token.insert(token.to_string(), label.to_string());
    }

    pub fn token_for(&self, label: &str) -> Option<&str> {
        self.by_label
            .get(&label.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn label_for(&self, token: &str) -> Option<&str> {
        self.by_token.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    pub fn extend(&mut self, overrides: &BTreeMap<String, String>) {
        for (label, token) in overrides {
            self.insert(label, token);
        }
    }
}

/// Label overrides read from configuration, keyed label → token
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LabelOverrides {
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub compliance: BTreeMap<String, String>,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    #[serde(default)]
    pub move_commands: BTreeMap<String, String>,
}

/// Complete set of label tables for one language
#[derive(Debug, Clone, PartialEq)]
pub struct Locale {
    pub name: String,
    pub colors: LabelTable,
    pub compliance: LabelTable,
    pub answers: LabelTable,
    pub move_commands: LabelTable,
}

const YES: &str = "yes";
const NO: &str = "no";

impl Locale {
    pub fn french() -> Self {
        Self {
            name: "fr".to_string(),
            colors: LabelTable::from_pairs([
                ("éteint", "off"),
                ("rouge", "red"),
                ("vert", "green"),
                ("bleu", "blue"),
                ("jaune", "yellow"),
                ("cyan", "cyan"),
                ("rose", "pink"),
                ("blanc", "white"),
            ]),
            compliance: LabelTable::from_pairs([("souple", "compliant"), ("rigide", "stiff")]),
            answers: LabelTable::from_pairs([("oui", YES), ("non", NO)]),
            move_commands: LabelTable::from_pairs([
                ("démarrer", "start"),
                ("pause", "pause"),
                ("arrêter", "stop"),
                ("reprendre", "restart"),
            ]),
        }
    }

    pub fn english() -> Self {
        let identity = |tokens: &[&'static str]| {
            LabelTable::from_pairs(tokens.iter().map(|token| (*token, *token)))
        };
        Self {
            name: "en".to_string(),
            colors: identity(&LedColor::ALL.map(|c| c.as_str())),
            compliance: identity(&Compliance::ALL.map(|c| c.as_str())),
            answers: identity(&[YES, NO]),
            move_commands: identity(&MoveCommand::ALL.map(|c| c.as_str())),
        }
    }

    /// Look up a built-in locale by name, defaulting to French
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "en" | "english" => Self::english(),
            _ => Self::french(),
        }
    }

    pub fn with_overrides(mut self, overrides: &LabelOverrides) -> Self {
        self.colors.extend(&overrides.colors);
        self.compliance.extend(&overrides.compliance);
        self.answers.extend(&overrides.answers);
        self.move_commands.extend(&overrides.move_commands);
        self
    }

    /// Resolve a color label. Unknown labels turn the LED off.
    pub fn color(&self, label: &str) -> LedColor {
        resolve(&self.colors, label).unwrap_or_else(|| {
            debug!("Unknown color label '{}', using off", label.trim());
            LedColor::Off
        })
    }

    /// Resolve a compliance label. Anything that is not "stiff" is compliant.
    pub fn compliance(&self, label: &str) -> Compliance {
        resolve(&self.compliance, label).unwrap_or(Compliance::Compliant)
    }

    /// Resolve a yes/no label. Unknown answers are "no".
    pub fn answer(&self, label: &str) -> bool {
        let token = self
            .answers
            .token_for(label)
            .unwrap_or_else(|| label.trim());
        token.eq_ignore_ascii_case(YES)
    }

    /// Resolve a move command label. Unknown commands stop the move.
    pub fn move_command(&self, label: &str) -> MoveCommand {
        resolve(&self.move_commands, label).unwrap_or_else(|| {
            debug!("Unknown move command '{}', using stop", label.trim());
            MoveCommand::Stop
        })
    }

    /// Display labels for a menu, in the order of the canonical tokens
    pub fn menu<'a>(
        &self,
        table: &LabelTable,
        tokens: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        tokens
            .into_iter()
            .map(|token| table.label_for(token).unwrap_or(token).to_string())
            .collect()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::french()
    }
}

/// Label first, then the canonical token itself
fn resolve<T: std::str::FromStr>(table: &LabelTable, label: &str) -> Option<T> {
    table
        .token_for(label)
        .and_then(|token| token.parse().ok())
        .or_else(|| label.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_french_colors_resolve() {
        let locale = Locale::french();
        assert_eq!(locale.color("rouge"), LedColor::Red);
        assert_eq!(locale.color("  Bleu "), LedColor::Blue);
        assert_eq!(locale.color("éteint"), LedColor::Off);
    }

    #[test]
    fn test_unknown_color_is_off() {
        let locale = Locale::french();
        assert_eq!(locale.color("violet"), LedColor::Off);
        assert_eq!(locale.color(""), LedColor::Off);
    }

    #[test]
    fn test_canonical_token_accepted_in_any_locale() {
        let locale = Locale::french();
        assert_eq!(locale.color("green"), LedColor::Green);
        assert_eq!(locale.compliance("stiff"), Compliance::Stiff);
    }

    #[test]
    fn test_compliance_defaults_to_compliant() {
        let locale = Locale::french();
        assert_eq!(locale.compliance("rigide"), Compliance::Stiff);
        assert_eq!(locale.compliance("souple"), Compliance::Compliant);
        assert_eq!(locale.compliance("n'importe quoi"), Compliance::Compliant);
    }

    #[test]
    fn test_answers() {
        let fr = Locale::french();
        assert!(fr.answer("oui"));
        assert!(fr.answer("OUI"));
        assert!(!fr.answer("non"));
        assert!(!fr.answer("peut-être"));

        let en = Locale::english();
        assert!(en.answer("yes"));
        assert!(!en.answer("oui"));
    }

    #[test]
    fn test_table_is_bidirectional() {
        let table = LabelTable::from_pairs([("rouge", "red")]);
        assert_eq!(table.token_for("ROUGE"), Some("red"));
        assert_eq!(table.label_for("red"), Some("rouge"));
        assert_eq!(table.label_for("blue"), None);
    }

    #[test]
    fn test_overrides_add_labels() {
        let mut overrides = LabelOverrides::default();
        overrides.colors.insert("rot".to_string(), "red".to_string());
        let locale = Locale::french().with_overrides(&overrides);
        assert_eq!(locale.color("rot"), LedColor::Red);
        assert_eq!(locale.color("rouge"), LedColor::Red);
    }

    #[test]
    fn test_menu_follows_token_order() {
        let locale = Locale::french();
        let menu = locale.menu(&locale.colors, LedColor::ALL.iter().map(|c| c.as_str()));
        assert_eq!(menu[0], "éteint");
        assert_eq!(menu[1], "rouge");
        assert_eq!(menu.len(), 8);
    }

    #[test]
    fn test_unknown_move_command_stops() {
        let locale = Locale::french();
        assert_eq!(locale.move_command("reprendre"), MoveCommand::Restart);
        assert_eq!(locale.move_command("danser"), MoveCommand::Stop);
    }
}
