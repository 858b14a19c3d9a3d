use serde::{Deserialize, Serialize};

use crate::model::common::Candidate;

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingResult {
    pub candidate: Candidate,
    pub vote_count: u64,
    /// Share of all recorded votes, 0 to 100.
    pub percentage: f64,
}

/// Counts over the voter records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterStats {
    pub total_voters: u64,
    pub voted_count: u64,
    pub not_voted_count: u64,
}

impl VoterStats {
    /// Percentage of known voters who have voted, rounded; 0 with no voters.
    pub fn turnout(&self) -> u64 {
        if self.total_voters == 0 {
            return 0;
        }
        (self.voted_count as f64 / self.total_voters as f64 * 100.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turnout_rounds() {
        let stats = VoterStats {
            total_voters: 3,
            voted_count: 2,
            not_voted_count: 1,
        };
        assert_eq!(stats.turnout(), 67);
        assert_eq!(VoterStats::default().turnout(), 0);
    }
}
