// Module selector
// Which of the three coaching topics a session runs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three coaching modules of the Story / Solution / Success framework.
///
/// Serializes as the lowercase literal (`"story"`, `"solution"`, `"success"`),
/// which is also the only accepted input for [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Story,
    Solution,
    Success,
}

impl ModuleType {
    /// All modules in framework order.
    pub const ALL: [ModuleType; 3] = [ModuleType::Story, ModuleType::Solution, ModuleType::Success];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Story => "story",
            ModuleType::Solution => "solution",
            ModuleType::Success => "success",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected module selector string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown module '{0}' (expected story, solution or success)")]
pub struct UnknownModule(pub String);

impl FromStr for ModuleType {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "story" => Ok(ModuleType::Story),
            "solution" => Ok(ModuleType::Solution),
            "success" => Ok(ModuleType::Success),
            other => Err(UnknownModule(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_literals_only() {
        assert_eq!("story".parse::<ModuleType>(), Ok(ModuleType::Story));
        assert_eq!("solution".parse::<ModuleType>(), Ok(ModuleType::Solution));
        assert_eq!("success".parse::<ModuleType>(), Ok(ModuleType::Success));
        assert!("Story".parse::<ModuleType>().is_err());
        assert!(" story".parse::<ModuleType>().is_err());
        assert!("warmup".parse::<ModuleType>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_literal() {
        let json = serde_json::to_string(&ModuleType::Solution).unwrap();
        assert_eq!(json, "\"solution\"");
        let back: ModuleType = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(back, ModuleType::Success);
    }
}
