use std::fmt::{Display, Formatter};

use crate::model::{
    api::results::{VoterStats, VotingResult},
    common::VotingSession,
};
use crate::view::format_percentage;

/// The published results as voters see them.
#[derive(Debug, Clone)]
pub struct ResultsView {
    pub session: VotingSession,
    pub stats: VoterStats,
    /// Already ranked, highest vote count first.
    pub results: Vec<VotingResult>,
}

impl ResultsView {
    pub fn total_votes(&self) -> u64 {
        self.results.iter().map(|r| r.vote_count).sum()
    }

    /// The leader, if anyone has any votes.
    pub fn winner(&self) -> Option<&VotingResult> {
        self.results.first().filter(|r| r.vote_count > 0)
    }
}

impl Display for ResultsView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Voting Results")?;
        if let Some(end_time) = self.session.end_time {
            writeln!(
                f,
                "Voting ended on {}",
                end_time.format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total votes:   {}", self.total_votes())?;
        writeln!(
            f,
            "Voter turnout: {} out of {} registered ({}%)",
            self.stats.voted_count,
            self.stats.total_voters,
            self.stats.turnout()
        )?;
        writeln!(f)?;

        if self.results.is_empty() {
            return writeln!(f, "No results available");
        }

        for (rank, result) in self.results.iter().enumerate() {
            writeln!(
                f,
                "{:>2}. {:<24} {:>5} votes  {:>6}",
                rank + 1,
                result.candidate.name,
                result.vote_count,
                format_percentage(result.percentage)
            )?;
        }

        if let Some(winner) = self.winner() {
            writeln!(f)?;
            writeln!(
                f,
                "{} wins with {} votes ({})",
                winner.candidate.name,
                winner.vote_count,
                format_percentage(winner.percentage)
            )?;
            if let Some(description) = &winner.candidate.description {
                writeln!(f, "{description}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::model::common::Candidate;

    use super::*;

    fn result(candidate: Candidate, vote_count: u64, percentage: f64) -> VotingResult {
        VotingResult {
            candidate,
            vote_count,
            percentage,
        }
    }

    #[test]
    fn ranking_and_winner() {
        let view = ResultsView {
            session: VotingSession {
                end_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 17, 30, 0).unwrap()),
                display_results: true,
                ..Default::default()
            },
            stats: VoterStats {
                total_voters: 3,
                voted_count: 3,
                not_voted_count: 0,
            },
            results: vec![
                result(Candidate::example2(), 2, 200.0 / 3.0),
                result(Candidate::example(), 1, 100.0 / 3.0),
            ],
        };

        let rendered = view.to_string();
        assert!(rendered.contains("Voting ended on 2024-05-01 17:30:00 UTC"));
        assert!(rendered.contains("Total votes:   3"));
        assert!(rendered.contains("3 out of 3 registered (100%)"));
        assert!(rendered.contains(" 1. Bob"));
        assert!(rendered.contains(" 2. Alice"));
        assert!(rendered.contains("66.7%"));
        assert!(rendered.contains("Bob wins with 2 votes (66.7%)"));
        assert_eq!(3, view.total_votes());
    }

    #[test]
    fn no_winner_without_votes() {
        let view = ResultsView {
            session: VotingSession::default(),
            stats: VoterStats::default(),
            results: vec![result(Candidate::example(), 0, 0.0)],
        };

        assert!(view.winner().is_none());
        let rendered = view.to_string();
        assert!(!rendered.contains("wins"));
        assert!(!rendered.contains("Voting ended"));
        assert!(rendered.contains("0 out of 0 registered (0%)"));
    }

    #[test]
    fn empty_results() {
        let view = ResultsView {
            session: VotingSession::default(),
            stats: VoterStats::default(),
            results: Vec::new(),
        };

        assert!(view.to_string().contains("No results available"));
    }
}
