pub mod candidate;
pub mod session;
pub mod vote;
pub mod voter;

pub use candidate::{Candidate, CandidateId};
pub use session::VotingSession;
pub use vote::{Vote, VoteRejection};
pub use voter::{ValidationError, VoterDetails, VoterRecord, MINIMUM_VOTING_AGE};
