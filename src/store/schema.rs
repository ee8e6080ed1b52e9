use serde::{Deserialize, Serialize};

use crate::model::QuizResult;

const SCHEMA_VERSION: u32 = 1;

/// Append-only quiz outcome history, as persisted on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultHistoryData {
    pub schema_version: u32,
    pub results: Vec<QuizResult>,
}

impl Default for ResultHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

/// Miscellaneous best-effort flags (currently only the home banner).
/// Absent or unreadable data reads as all-false.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlagsData {
    #[serde(default)]
    pub banner_dismissed: bool,
}
