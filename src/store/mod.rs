//! The voting store: sole owner of session, candidate, vote and voter state.
//!
//! [`VotingStore`] itself is synchronous and performs no I/O; every command is
//! total, and "failure" is a `false`/`None` return. [`SharedStore`] puts it
//! behind a lock and persists the state through a [`Repository`] after each
//! command.

mod repository;
mod shared;

use chrono::Utc;
use log::{debug, info, warn};

pub use repository::{MemoryRepository, MongoRepository, Repository};
pub use shared::SharedStore;

use crate::model::{
    api::{
        candidate::CandidateSpec,
        results::{VoterStats, VotingResult},
    },
    common::{
        Candidate, CandidateId, Vote, VoteRejection, VoterDetails, VoterRecord, VotingSession,
    },
    db::VotingState,
    mongodb::Id,
};

/// The password used when none is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Behaviour switches for the store, taken from the application config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Plaintext shared admin password.
    pub admin_password: String,
    /// Fabricate a placeholder voter when looking up an unknown index number.
    pub demo_voter_lookup: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            demo_voter_lookup: false,
        }
    }
}

/// The voting state plus the commands and queries over it.
#[derive(Debug, Clone, Default)]
pub struct VotingStore {
    state: VotingState,
    settings: StoreSettings,
}

impl VotingStore {
    /// Wrap an existing (e.g. freshly loaded) state.
    pub fn new(state: VotingState, settings: StoreSettings) -> Self {
        Self { state, settings }
    }

    /// The full state, e.g. for persisting.
    pub fn state(&self) -> &VotingState {
        &self.state
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn session(&self) -> &VotingSession {
        &self.state.voting_session
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.state.candidates
    }

    pub fn votes(&self) -> &[Vote] {
        &self.state.votes
    }

    pub fn voters(&self) -> &[VoterRecord] {
        &self.state.voters
    }

    pub fn is_admin_logged_in(&self) -> bool {
        self.state.is_admin_logged_in
    }

    /// Look up a voter record without side effects.
    pub fn find_voter(&self, index_number: &str) -> Option<&VoterRecord> {
        self.state
            .voters
            .iter()
            .find(|v| v.voter_details.index_number == index_number)
    }

    // Commands

    /// Log in as admin. Succeeds iff the password matches exactly.
    pub fn admin_login(&mut self, password: &str) -> bool {
        let valid = password == self.settings.admin_password;
        if valid {
            self.state.is_admin_logged_in = true;
            info!("Admin logged in");
        } else {
            warn!("Rejected admin login attempt");
        }
        valid
    }

    pub fn admin_logout(&mut self) {
        self.state.is_admin_logged_in = false;
        info!("Admin logged out");
    }

    /// Open voting. Results are hidden from voters and any previous end time
    /// is forgotten. The candidate count is not checked here.
    pub fn start_voting(&mut self) {
        self.state.voting_session = VotingSession {
            is_active: true,
            start_time: Some(Utc::now()),
            end_time: None,
            display_results: false,
        };
        info!("Voting started");
    }

    /// Close voting. Result visibility is left as it was.
    pub fn stop_voting(&mut self) {
        let session = &mut self.state.voting_session;
        session.is_active = false;
        session.end_time = Some(Utc::now());
        info!("Voting stopped");
    }

    pub fn show_results(&mut self) {
        self.state.voting_session.display_results = true;
        debug!("Results now visible to voters");
    }

    pub fn hide_results(&mut self) {
        self.state.voting_session.display_results = false;
        debug!("Results now hidden from voters");
    }

    /// Append a new candidate with a freshly generated ID.
    /// The spec is stored as given; validate it with [`CandidateSpec::normalized`] first.
    pub fn add_candidate(&mut self, spec: CandidateSpec) -> Candidate {
        let candidate = Candidate {
            id: Id::new(),
            name: spec.name,
            description: spec.description,
            image_url: spec.image_url,
        };
        info!("Added candidate {} ({})", candidate.name, candidate.id);
        self.state.candidates.push(candidate.clone());
        candidate
    }

    /// Remove a candidate, returning whether one was removed.
    /// Votes already cast for it are kept.
    pub fn remove_candidate(&mut self, id: CandidateId) -> bool {
        let before = self.state.candidates.len();
        self.state.candidates.retain(|c| c.id != id);
        let removed = self.state.candidates.len() != before;
        if removed {
            info!("Removed candidate {id}");
        }
        removed
    }

    /// Cast a vote, returning whether it was recorded.
    pub fn cast_vote(&mut self, voter_details: VoterDetails, candidate_id: CandidateId) -> bool {
        self.try_cast_vote(voter_details, candidate_id).is_ok()
    }

    /// Cast a vote, explaining any refusal.
    ///
    /// The candidate ID is not checked: a vote for an unknown candidate is
    /// recorded but never shows up in the results.
    pub fn try_cast_vote(
        &mut self,
        voter_details: VoterDetails,
        candidate_id: CandidateId,
    ) -> Result<Vote, VoteRejection> {
        if !self.state.voting_session.is_active {
            warn!(
                "Vote from {} refused: voting is not active",
                voter_details.index_number
            );
            return Err(VoteRejection::SessionInactive);
        }
        let index_number = voter_details.index_number.clone();
        if self.find_voter(&index_number).map_or(false, |v| v.has_voted) {
            warn!("Vote from {index_number} refused: already voted");
            return Err(VoteRejection::AlreadyVoted);
        }

        let now = Utc::now();
        let vote = Vote {
            id: Id::new(),
            voter_details: voter_details.clone(),
            candidate_id,
            timestamp: now,
        };
        self.state.votes.push(vote.clone());
        self.upsert_voter(VoterRecord::voted(voter_details, now));
        info!("Recorded vote {} from {index_number}", vote.id);
        Ok(vote)
    }

    /// Look up a voter by index number.
    ///
    /// With demo lookup enabled, an unknown index number gets a placeholder
    /// record inserted (not yet voted) and returned.
    pub fn get_voter_details_by_index(&mut self, index_number: &str) -> Option<VoterRecord> {
        if let Some(voter) = self.find_voter(index_number) {
            return Some(voter.clone());
        }
        if !self.settings.demo_voter_lookup {
            return None;
        }
        let placeholder = VoterRecord::placeholder(index_number);
        debug!("Created placeholder voter for {index_number}");
        self.upsert_voter(placeholder.clone());
        Some(placeholder)
    }

    /// Replace any record with the same index number, then append.
    fn upsert_voter(&mut self, record: VoterRecord) {
        let index_number = &record.voter_details.index_number;
        self.state
            .voters
            .retain(|v| &v.voter_details.index_number != index_number);
        self.state.voters.push(record);
    }

    // Queries

    /// Per-candidate tallies, most votes first.
    ///
    /// Percentages are taken over every recorded vote, including votes for
    /// candidates that have since been removed. Ties keep candidate order.
    pub fn get_voting_results(&self) -> Vec<VotingResult> {
        let total_votes = self.state.votes.len();
        let mut results: Vec<VotingResult> = self
            .state
            .candidates
            .iter()
            .map(|candidate| {
                let vote_count = self
                    .state
                    .votes
                    .iter()
                    .filter(|v| v.candidate_id == candidate.id)
                    .count();
                let percentage = if total_votes > 0 {
                    vote_count as f64 / total_votes as f64 * 100.0
                } else {
                    0.0
                };
                VotingResult {
                    candidate: candidate.clone(),
                    vote_count: vote_count as u64,
                    percentage,
                }
            })
            .collect();
        results.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
        results
    }

    pub fn get_voter_stats(&self) -> VoterStats {
        let total_voters = self.state.voters.len() as u64;
        let voted_count = self.state.voters.iter().filter(|v| v.has_voted).count() as u64;
        VoterStats {
            total_voters,
            voted_count,
            not_voted_count: total_voters - voted_count,
        }
    }
}
