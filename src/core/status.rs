//! Provider call status and AMD verdict classification.

use std::fmt;

/// Call lifecycle status as reported in `CallStatus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStatus {
    Queued,
    Initiated,
    Ringing,
    InProgress,
    Completed,
    Busy,
    Failed,
    NoAnswer,
    Canceled,
    Other(String),
}

impl CallStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "queued" => Self::Queued,
            "initiated" => Self::Initiated,
            "ringing" => Self::Ringing,
            "in-progress" | "answered" => Self::InProgress,
            "completed" => Self::Completed,
            "busy" => Self::Busy,
            "failed" => Self::Failed,
            "no-answer" => Self::NoAnswer,
            "canceled" => Self::Canceled,
            _ => Self::Other(value.to_string()),
        }
    }

    /// No further progress events are expected after a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Busy | Self::Failed | Self::NoAnswer | Self::Canceled
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Initiated => "initiated",
            Self::Ringing => "ringing",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Busy => "busy",
            Self::Failed => "failed",
            Self::NoAnswer => "no-answer",
            Self::Canceled => "canceled",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AMD classification as reported in `AnsweredBy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnsweredBy {
    Human,
    /// Any `machine_*` verdict, e.g. `machine_start` or `machine_end_beep`
    Machine(String),
    Fax,
    Unknown,
    Other(String),
}

impl AnsweredBy {
    pub fn parse(value: &str) -> Self {
        let lower = value.trim().to_ascii_lowercase();
        if lower == "human" {
            Self::Human
        } else if lower.contains("machine") {
            Self::Machine(lower)
        } else if lower.contains("fax") {
            Self::Fax
        } else if lower == "unknown" {
            Self::Unknown
        } else {
            Self::Other(value.to_string())
        }
    }

    /// Short upper-case label for operational logs.
    pub fn label(&self) -> String {
        match self {
            Self::Human => "HUMAN".to_string(),
            Self::Machine(kind) => kind.to_ascii_uppercase(),
            Self::Fax => "FAX".to_string(),
            Self::Unknown => "UNKNOWN".to_string(),
            Self::Other(raw) => raw.to_ascii_uppercase(),
        }
    }
}
