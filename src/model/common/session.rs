use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single voting session.
///
/// `is_active` is the whole state machine (Inactive <-> Active);
/// `display_results` is an independent flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingSession {
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub display_results: bool,
}

impl VotingSession {
    /// Human-readable status.
    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "Voting Active"
        } else {
            "Voting Inactive"
        }
    }
}
