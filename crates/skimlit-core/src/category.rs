//! The closed set of rhetorical roles a sentence of an abstract can play.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rhetorical category assigned to one line of an abstract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Background,
    Objective,
    #[serde(alias = "METHODS")]
    Method,
    #[serde(alias = "RESULTS")]
    Result,
    #[serde(alias = "CONCLUSIONS")]
    Conclusion,
}

impl Category {
    /// All categories in reading order of a structured abstract.
    pub const ALL: [Category; 5] = [
        Self::Background,
        Self::Objective,
        Self::Method,
        Self::Result,
        Self::Conclusion,
    ];

    /// Output order of models trained on PubMed RCT (alphabetical label encoding).
    pub const ENCODER_ORDER: [Category; 5] = [
        Self::Background,
        Self::Conclusion,
        Self::Method,
        Self::Objective,
        Self::Result,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Background => "BACKGROUND",
            Self::Objective => "OBJECTIVE",
            Self::Method => "METHOD",
            Self::Result => "RESULT",
            Self::Conclusion => "CONCLUSION",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label string is not one of the five categories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category label: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive; accepts the plural spellings used by PubMed RCT label files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BACKGROUND" => Ok(Self::Background),
            "OBJECTIVE" | "OBJECTIVES" => Ok(Self::Objective),
            "METHOD" | "METHODS" => Ok(Self::Method),
            "RESULT" | "RESULTS" => Ok(Self::Result),
            "CONCLUSION" | "CONCLUSIONS" => Ok(Self::Conclusion),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
