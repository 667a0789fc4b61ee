//! Turn audit log.

use serde::{Deserialize, Serialize};

/// Which transition produced a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogTag {
    Skip,
    DrawTwo,
    Choose,
    SelectTarget,
    Resolve,
    CheckWin,
}

impl LogTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogTag::Skip => "skip",
            LogTag::DrawTwo => "drawTwo",
            LogTag::Choose => "choose",
            LogTag::SelectTarget => "selectTarget",
            LogTag::Resolve => "resolve",
            LogTag::CheckWin => "checkWin",
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry: a tag and a message that starts with `"<tag>: "`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tag: LogTag,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(tag: LogTag, detail: impl std::fmt::Display) -> Self {
        Self {
            tag,
            message: format!("{tag}: {detail}"),
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
