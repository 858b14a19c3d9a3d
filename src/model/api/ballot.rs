use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateId, VoterDetails};

/// A ballot that the voter wishes to cast for a specific candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotSpec {
    pub voter_details: VoterDetails,
    pub candidate_id: CandidateId,
}
