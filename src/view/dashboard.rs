use std::fmt::{Display, Formatter};

use crate::model::{
    api::results::{VoterStats, VotingResult},
    common::VotingSession,
};
use crate::view::format_percentage;

/// Which admin controls can be used right now.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub stop: bool,
    /// `None` while voting is active; the toggle is hidden then.
    pub results_toggle: Option<ResultsToggle>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResultsToggle {
    pub enabled: bool,
    /// `true` if pressing it shows results, `false` if it hides them.
    pub shows: bool,
}

/// The admin overview.
#[derive(Debug, Clone)]
pub struct AdminDashboard {
    pub session: VotingSession,
    pub stats: VoterStats,
    pub candidate_count: usize,
    pub results: Vec<VotingResult>,
}

impl AdminDashboard {
    pub fn status_label(&self) -> &'static str {
        self.session.status_label()
    }

    pub fn turnout(&self) -> u64 {
        self.stats.turnout()
    }

    pub fn total_votes(&self) -> u64 {
        self.results.iter().map(|r| r.vote_count).sum()
    }

    pub fn controls(&self) -> Controls {
        let has_candidates = self.candidate_count > 0;
        Controls {
            start: !self.session.is_active && has_candidates,
            stop: self.session.is_active,
            results_toggle: (!self.session.is_active).then_some(ResultsToggle {
                enabled: has_candidates,
                shows: !self.session.display_results,
            }),
        }
    }
}

impl Display for AdminDashboard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Voting System Admin  [{}]", self.status_label())?;
        writeln!(f)?;
        writeln!(f, "Candidates:    {}", self.candidate_count)?;
        writeln!(f, "Total votes:   {}", self.total_votes())?;
        writeln!(f, "Voted:         {}", self.stats.voted_count)?;
        writeln!(f, "Not voted:     {}", self.stats.not_voted_count)?;
        writeln!(f, "Turnout:       {}%", self.turnout())?;
        writeln!(f)?;

        if self.results.is_empty() {
            writeln!(f, "No candidates available")?;
        }
        for result in &self.results {
            writeln!(
                f,
                "{:<24} {} votes ({})",
                result.candidate.name,
                result.vote_count,
                format_percentage(result.percentage)
            )?;
        }

        let controls = self.controls();
        let mut available = Vec::new();
        if controls.start {
            available.push("start");
        }
        if controls.stop {
            available.push("stop");
        }
        if let Some(toggle) = controls.results_toggle.filter(|t| t.enabled) {
            available.push(if toggle.shows { "display" } else { "hide" });
        }
        if !available.is_empty() {
            writeln!(f)?;
            writeln!(f, "Available: {}", available.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::common::Candidate;

    use super::*;

    fn dashboard(session: VotingSession, candidate_count: usize) -> AdminDashboard {
        AdminDashboard {
            session,
            stats: VoterStats::default(),
            candidate_count,
            results: Vec::new(),
        }
    }

    #[test]
    fn controls_follow_session() {
        let inactive = dashboard(VotingSession::default(), 0);
        assert_eq!(
            Controls {
                start: false,
                stop: false,
                results_toggle: Some(ResultsToggle {
                    enabled: false,
                    shows: true
                }),
            },
            inactive.controls()
        );

        let ready = dashboard(VotingSession::default(), 2);
        assert!(ready.controls().start);
        assert!(ready.controls().results_toggle.unwrap().enabled);

        let active = dashboard(
            VotingSession {
                is_active: true,
                ..Default::default()
            },
            2,
        );
        assert_eq!(
            Controls {
                start: false,
                stop: true,
                results_toggle: None,
            },
            active.controls()
        );

        let published = dashboard(
            VotingSession {
                display_results: true,
                ..Default::default()
            },
            2,
        );
        assert!(!published.controls().results_toggle.unwrap().shows);
    }

    #[test]
    fn turnout_is_rounded() {
        let mut view = dashboard(VotingSession::default(), 1);
        assert_eq!(0, view.turnout());

        view.stats = VoterStats {
            total_voters: 3,
            voted_count: 2,
            not_voted_count: 1,
        };
        assert_eq!(67, view.turnout());
    }

    #[test]
    fn render_summary() {
        let mut view = dashboard(
            VotingSession {
                is_active: true,
                ..Default::default()
            },
            1,
        );
        view.results = vec![VotingResult {
            candidate: Candidate::example(),
            vote_count: 2,
            percentage: 100.0,
        }];
        view.stats = VoterStats {
            total_voters: 2,
            voted_count: 2,
            not_voted_count: 0,
        };

        let rendered = view.to_string();
        assert!(rendered.contains("[Voting Active]"));
        assert!(rendered.contains("Total votes:   2"));
        assert!(rendered.contains("Turnout:       100%"));
        assert!(rendered.contains("2 votes (100.0%)"));
        assert!(rendered.contains("Available: stop"));
    }
}
