//! Robot control endpoint address

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_HOST: &str = "poppy.local:8080";

/// Base URL of the robot's REST endpoint, e.g. `http://poppy.local:8080`
///
/// Only blank input is treated specially (it resets to the default);
/// anything else is taken as given, minus trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RobotAddress(String);

impl RobotAddress {
    pub fn parse(url: &str) -> Self {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Self::default();
        }
        Self(url.to_string())
    }

    /// Build from a scheme and `host[:port]`, each defaulting when blank
    pub fn from_parts(scheme: &str, host: &str) -> Self {
        let scheme = match scheme.trim() {
            "" => DEFAULT_SCHEME,
            s => s,
        };
        let host = match host.trim().trim_end_matches('/') {
            "" => DEFAULT_HOST,
            h => h,
        };
        Self(format!("{}://{}", scheme, host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full URL for a path relative to the robot root
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl Default for RobotAddress {
    fn default() -> Self {
        Self(format!("{}://{}", DEFAULT_SCHEME, DEFAULT_HOST))
    }
}

impl fmt::Display for RobotAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_resets_to_default() {
        assert_eq!(RobotAddress::parse("").as_str(), "http://poppy.local:8080");
        assert_eq!(RobotAddress::parse("   ").as_str(), "http://poppy.local:8080");
    }

    #[test]
    fn test_trailing_slash_removed() {
        let address = RobotAddress::parse(" http://10.0.0.4:8080/ ");
        assert_eq!(address.as_str(), "http://10.0.0.4:8080");
        assert_eq!(address.join("/motors/motors"), "http://10.0.0.4:8080/motors/motors");
    }

    #[test]
    fn test_from_parts_defaults() {
        assert_eq!(RobotAddress::from_parts("", "").as_str(), "http://poppy.local:8080");
        assert_eq!(
            RobotAddress::from_parts("https", "ergo.lan:443").as_str(),
            "https://ergo.lan:443"
        );
    }
}
