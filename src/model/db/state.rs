use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::common::{Candidate, Vote, VoterRecord, VotingSession};

/// The fixed key the whole voting state is stored under.
pub const STORAGE_NAME: &str = "voting-system-storage";

/// Everything the voting store owns. Serialised as a single blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingState {
    #[serde(default)]
    pub is_admin_logged_in: bool,
    #[serde(default)]
    pub voting_session: VotingSession,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub voters: Vec<VoterRecord>,
}

/// The voting state as stored in the database, under its storage key.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(rename = "_id")]
    pub key: String,
    #[serde(flatten)]
    pub state: VotingState,
}

impl StoredState {
    /// Wrap the state under the fixed storage key.
    pub fn new(state: VotingState) -> Self {
        Self {
            key: STORAGE_NAME.to_string(),
            state,
        }
    }
}

impl Deref for StoredState {
    type Target = VotingState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl DerefMut for StoredState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}
