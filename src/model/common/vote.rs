use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    common::{candidate::CandidateId, voter::VoterDetails},
    mongodb::Id,
};

/// A single recorded vote. Votes are never modified once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Id,
    /// Snapshot of the voter at the time of voting.
    pub voter_details: VoterDetails,
    /// Not checked against the candidate list.
    pub candidate_id: CandidateId,
    pub timestamp: DateTime<Utc>,
}

/// Why a vote was refused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum VoteRejection {
    #[error("Voting is not currently active")]
    SessionInactive,
    #[error("This index number has already been used to vote")]
    AlreadyVoted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages() {
        assert_eq!(
            "Voting is not currently active",
            VoteRejection::SessionInactive.to_string()
        );
        assert_eq!(
            "This index number has already been used to vote",
            VoteRejection::AlreadyVoted.to_string()
        );
    }
}
