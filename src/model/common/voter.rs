use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The minimum age at which a voter may take part.
pub const MINIMUM_VOTING_AGE: u32 = 18;

/// Details a voter submits about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterDetails {
    pub full_name: String,
    pub age: u32,
    pub location: String,
    /// The key voters are told apart by.
    pub index_number: String,
}

impl VoterDetails {
    /// Check the details are complete enough to vote with.
    /// Checks run in form order and stop at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::MissingFullName);
        }
        if self.age < MINIMUM_VOTING_AGE {
            return Err(ValidationError::Underage);
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::MissingLocation);
        }
        if self.index_number.trim().is_empty() {
            return Err(ValidationError::MissingIndexNumber);
        }
        Ok(())
    }
}

/// Problems with user input, caught before any state is touched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your full name")]
    MissingFullName,
    #[error("You must be at least 18 years old to vote")]
    Underage,
    #[error("Please enter your location")]
    MissingLocation,
    #[error("Please enter your index number")]
    MissingIndexNumber,
    #[error("Please enter a candidate name")]
    MissingCandidateName,
    #[error("Please select a candidate")]
    NoCandidateSelected,
}

/// Per-voter bookkeeping, keyed by index number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRecord {
    /// Always equal to `voter_details.index_number`.
    pub id: String,
    pub voter_details: VoterDetails,
    pub has_voted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl VoterRecord {
    /// A record for a voter who has just cast their vote.
    pub fn voted(voter_details: VoterDetails, at: DateTime<Utc>) -> Self {
        Self {
            id: voter_details.index_number.clone(),
            voter_details,
            has_voted: true,
            timestamp: Some(at),
        }
    }

    /// Stand-in record for an index number nobody has registered yet.
    pub fn placeholder(index_number: &str) -> Self {
        Self {
            id: index_number.to_string(),
            voter_details: VoterDetails {
                full_name: format!("Voter {index_number}"),
                age: 25,
                location: "Demo City".to_string(),
                index_number: index_number.to_string(),
            },
            has_voted: false,
            timestamp: None,
        }
    }
}
