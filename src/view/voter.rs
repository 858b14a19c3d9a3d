use std::fmt::{Display, Formatter};

use crate::model::{
    api::ballot::BallotSpec,
    common::{
        Candidate, CandidateId, ValidationError, VoteRejection, VoterDetails, VoterRecord,
        VotingSession,
    },
};

/// Shown when the final submission is refused for any reason.
pub const CAST_FAILED: &str = "Failed to cast vote. Please try again.";

/// Where the voter is in the ballot form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Details,
    Candidate,
    Confirm,
    Submitted,
}

/// What the voter actually sees, taking the session into account.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Screen {
    Results,
    Inactive,
    Step(Step),
}

/// The multi-step voting form: details, candidate choice, confirmation.
#[derive(Debug, Clone)]
pub struct VoterFlow {
    step: Step,
    voter_details: VoterDetails,
    selected: Option<CandidateId>,
    error: Option<String>,
}

impl Default for VoterFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl VoterFlow {
    pub fn new() -> Self {
        Self {
            step: Step::Details,
            voter_details: VoterDetails::default(),
            selected: None,
            error: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn voter_details(&self) -> &VoterDetails {
        &self.voter_details
    }

    pub fn selected_candidate(&self) -> Option<CandidateId> {
        self.selected
    }

    /// Published results take over the whole screen, then an inactive
    /// session does, whatever step the form is on.
    pub fn screen(&self, session: &VotingSession) -> Screen {
        if session.display_results {
            Screen::Results
        } else if !session.is_active {
            Screen::Inactive
        } else {
            Screen::Step(self.step)
        }
    }

    /// Step 1. `existing` is the voter's record, if one is known.
    pub fn submit_details(
        &mut self,
        voter_details: VoterDetails,
        session: &VotingSession,
        existing: Option<&VoterRecord>,
    ) -> bool {
        self.voter_details = voter_details;
        if let Err(e) = self.voter_details.validate() {
            return self.fail(e.to_string());
        }
        if !session.is_active {
            return self.fail(VoteRejection::SessionInactive.to_string());
        }
        if existing.map_or(false, |record| record.has_voted) {
            return self.fail(VoteRejection::AlreadyVoted.to_string());
        }
        self.advance(Step::Candidate)
    }

    pub fn select_candidate(&mut self, candidate_id: CandidateId) {
        self.selected = Some(candidate_id);
    }

    /// Step 2.
    pub fn submit_candidate(&mut self) -> bool {
        if self.selected.is_none() {
            return self.fail(ValidationError::NoCandidateSelected.to_string());
        }
        self.advance(Step::Confirm)
    }

    /// The ballot to send, once the voter has reached the confirmation step.
    pub fn ballot(&self) -> Option<BallotSpec> {
        match (self.step, self.selected) {
            (Step::Confirm, Some(candidate_id)) => Some(BallotSpec {
                voter_details: self.voter_details.clone(),
                candidate_id,
            }),
            _ => None,
        }
    }

    /// Step 3: record whether the vote was accepted.
    pub fn record_cast(&mut self, accepted: bool) {
        if accepted {
            self.advance(Step::Submitted);
        } else {
            self.fail(CAST_FAILED);
        }
    }

    /// Go back one step, keeping what was entered.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Candidate => Step::Details,
            Step::Confirm => Step::Candidate,
            step => step,
        };
        self.error = None;
    }

    /// The confirmation summary.
    pub fn summary<'a>(&'a self, candidates: &'a [Candidate]) -> Summary<'a> {
        Summary {
            flow: self,
            candidates,
        }
    }

    fn advance(&mut self, step: Step) -> bool {
        self.step = step;
        self.error = None;
        true
    }

    fn fail(&mut self, message: impl Into<String>) -> bool {
        self.error = Some(message.into());
        false
    }
}

/// What the voter is about to submit, shown before the final confirmation.
pub struct Summary<'a> {
    flow: &'a VoterFlow,
    candidates: &'a [Candidate],
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let details = &self.flow.voter_details;
        let choice = self
            .flow
            .selected
            .and_then(|id| self.candidates.iter().find(|c| c.id == id))
            .map_or("(no candidate)", |c| c.name.as_str());

        writeln!(f, "Full name:    {}", details.full_name)?;
        writeln!(f, "Age:          {}", details.age)?;
        writeln!(f, "Location:     {}", details.location)?;
        writeln!(f, "Index number: {}", details.index_number)?;
        writeln!(f, "Candidate:    {choice}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::model::mongodb::Id;

    use super::*;

    fn active() -> VotingSession {
        VotingSession {
            is_active: true,
            start_time: Some(Utc::now()),
            ..Default::default()
        }
    }

    fn at_confirm() -> (VoterFlow, CandidateId) {
        let mut flow = VoterFlow::new();
        assert!(flow.submit_details(VoterDetails::example(), &active(), None));
        let id = Id::new();
        flow.select_candidate(id);
        assert!(flow.submit_candidate());
        (flow, id)
    }

    #[test]
    fn happy_path() {
        let (mut flow, id) = at_confirm();
        assert_eq!(Step::Confirm, flow.step());

        let ballot = flow.ballot().unwrap();
        assert_eq!(id, ballot.candidate_id);
        assert_eq!(VoterDetails::example(), ballot.voter_details);

        flow.record_cast(true);
        assert_eq!(Step::Submitted, flow.step());
        assert_eq!(None, flow.error());
        assert_eq!(Screen::Step(Step::Submitted), flow.screen(&active()));
    }

    #[test]
    fn details_are_validated_in_order() {
        let mut flow = VoterFlow::new();
        let details = VoterDetails {
            full_name: "".to_string(),
            age: 12,
            ..VoterDetails::example()
        };

        assert!(!flow.submit_details(details, &active(), None));
        assert_eq!(Some("Please enter your full name"), flow.error());
        assert_eq!(Step::Details, flow.step());

        let details = VoterDetails {
            age: 17,
            ..VoterDetails::example()
        };
        assert!(!flow.submit_details(details, &active(), None));
        assert_eq!(Some("You must be at least 18 years old to vote"), flow.error());
    }

    #[test]
    fn details_rejected_when_inactive() {
        let mut flow = VoterFlow::new();

        assert!(!flow.submit_details(
            VoterDetails::example(),
            &VotingSession::default(),
            None
        ));
        assert_eq!(Some("Voting is not currently active"), flow.error());
    }

    #[test]
    fn details_rejected_when_already_voted() {
        let mut flow = VoterFlow::new();
        let record = VoterRecord::voted(VoterDetails::example(), Utc::now());

        assert!(!flow.submit_details(VoterDetails::example(), &active(), Some(&record)));
        assert_eq!(
            Some("This index number has already been used to vote"),
            flow.error()
        );

        // A known voter who has not voted yet may continue.
        let record = VoterRecord::placeholder("v1");
        assert!(flow.submit_details(VoterDetails::example(), &active(), Some(&record)));
        assert_eq!(None, flow.error());
    }

    #[test]
    fn candidate_required() {
        let mut flow = VoterFlow::new();
        flow.submit_details(VoterDetails::example(), &active(), None);

        assert!(!flow.submit_candidate());
        assert_eq!(Some("Please select a candidate"), flow.error());
        assert_eq!(Step::Candidate, flow.step());
        assert_eq!(None, flow.ballot());
    }

    #[test]
    fn failed_cast_stays_on_confirm() {
        let (mut flow, _) = at_confirm();

        flow.record_cast(false);

        assert_eq!(Step::Confirm, flow.step());
        assert_eq!(Some(CAST_FAILED), flow.error());
    }

    #[test]
    fn back_keeps_entries() {
        let (mut flow, id) = at_confirm();

        flow.back();
        assert_eq!(Step::Candidate, flow.step());
        assert_eq!(Some(id), flow.selected_candidate());

        flow.back();
        assert_eq!(Step::Details, flow.step());
        assert_eq!(&VoterDetails::example(), flow.voter_details());

        flow.back();
        assert_eq!(Step::Details, flow.step());
    }

    #[test]
    fn screen_prefers_results_then_inactive() {
        let (flow, _) = at_confirm();

        let published = VotingSession {
            display_results: true,
            ..Default::default()
        };
        assert_eq!(Screen::Results, flow.screen(&published));

        let published_while_active = VotingSession {
            display_results: true,
            ..active()
        };
        assert_eq!(Screen::Results, flow.screen(&published_while_active));

        assert_eq!(Screen::Inactive, flow.screen(&VotingSession::default()));
        assert_eq!(Screen::Step(Step::Confirm), flow.screen(&active()));
    }

    #[test]
    fn summary_names_candidate() {
        let candidate = Candidate::example();
        let mut flow = VoterFlow::new();
        flow.submit_details(VoterDetails::example(), &active(), None);
        flow.select_candidate(candidate.id);
        flow.submit_candidate();

        let summary = flow.summary(&[candidate]).to_string();
        assert!(summary.contains("Full name:    Ada Lovelace"));
        assert!(summary.contains("Candidate:    Alice"));
    }
}
