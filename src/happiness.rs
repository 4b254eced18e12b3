//! Happiness of a group of participants, from membership alone.
//!
//! Two policies exist and a problem uses exactly one of them:
//!
//! * [`ScoringPolicy::Participant`]: each member scores the number of liked
//!   co-occupants minus `(2 * disliked co-occupants)^1.5`, so a second
//!   disliked tent mate hurts more than the first.
//! * [`ScoringPolicy::Group`]: the group scores its liked pairs minus
//!   `dislike_weight` times its disliked pairs. Pairs are directed, a mutual
//!   like counts twice.
//!
//! Which tent type ends up housing the group never matters.

use crate::error::TentError;
use crate::roster::{ParticipantId, Roster};

pub const DEFAULT_DISLIKE_WEIGHT: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScoringPolicy {
    #[default]
    Participant,
    Group {
        dislike_weight: f64,
    },
}

impl ScoringPolicy {
    pub fn group() -> Self {
        ScoringPolicy::Group {
            dislike_weight: DEFAULT_DISLIKE_WEIGHT,
        }
    }
}

pub struct Scorer<'a> {
    roster: &'a Roster,
    policy: ScoringPolicy,
}

impl<'a> Scorer<'a> {
    pub fn new(roster: &'a Roster, policy: ScoringPolicy) -> Result<Self, TentError> {
        if let ScoringPolicy::Group { dislike_weight } = policy {
            // A weight of 1 or less lets a like cancel a dislike.
            if !dislike_weight.is_finite() || dislike_weight <= 1.0 {
                return Err(TentError::Configuration(format!(
                    "dislike weight must be greater than 1, got {dislike_weight}"
                )));
            }
        }
        Ok(Scorer { roster, policy })
    }

    /// Contribution of `id` to the score of a group with the given members.
    pub fn participant_happiness(&self, id: ParticipantId, members: &[ParticipantId]) -> f64 {
        let participant = self.roster.participant(id);
        let liked = members
            .iter()
            .filter(|&m| participant.likes().contains(m))
            .count() as f64;
        let disliked = members
            .iter()
            .filter(|&m| participant.dislikes().contains(m))
            .count() as f64;

        match self.policy {
            ScoringPolicy::Participant => liked - (2.0 * disliked).powf(1.5),
            ScoringPolicy::Group { dislike_weight } => liked - dislike_weight * disliked,
        }
    }

    pub fn group_score(&self, members: &[ParticipantId]) -> f64 {
        members
            .iter()
            .map(|&id| self.participant_happiness(id, members))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Preference;

    const EPS: f64 = 1e-9;

    // 0 likes 1 and 2, dislikes 3 and 4; 1 likes 0.
    fn roster() -> Roster {
        let names: Vec<String> = (0..6).map(|i| format!("p{i}")).collect();
        let prefs = vec![
            Preference::new(&[1, 2], &[3, 4]),
            Preference::new(&[0], &[]),
            Preference::default(),
            Preference::default(),
            Preference::default(),
            Preference::default(),
        ];
        Roster::from_indexed(&[names], prefs).unwrap()
    }

    #[test]
    fn participant_policy_penalizes_dislikes_convexly() {
        let roster = roster();
        let scorer = Scorer::new(&roster, ScoringPolicy::Participant).unwrap();

        assert!((scorer.group_score(&[0, 1]) - 2.0).abs() < EPS);
        assert!((scorer.group_score(&[0, 1, 2]) - 3.0).abs() < EPS);

        let one = scorer.participant_happiness(0, &[0, 3]);
        assert!((one - -(2.0f64.powf(1.5))).abs() < EPS);
        let two = scorer.participant_happiness(0, &[0, 3, 4]);
        assert!((two - -8.0).abs() < EPS);
        // the second disliked tent mate costs more than the first
        assert!(one - two > -one);
    }

    #[test]
    fn group_policy_weighs_dislikes_above_likes() {
        let roster = roster();
        let scorer = Scorer::new(&roster, ScoringPolicy::group()).unwrap();

        assert!((scorer.group_score(&[0, 1]) - 2.0).abs() < EPS);
        assert!((scorer.group_score(&[0, 2, 3]) - (1.0 - 1.01)).abs() < EPS);
        assert!((scorer.group_score(&[0, 3, 4]) - -2.02).abs() < EPS);
    }

    #[test]
    fn group_score_is_monotone_in_likes_and_dislikes() {
        let roster = roster();
        let scorer = Scorer::new(&roster, ScoringPolicy::group()).unwrap();

        let base = scorer.group_score(&[0, 5]);
        assert!(scorer.group_score(&[0, 2, 5]) >= base);
        assert!(scorer.group_score(&[0, 3, 5]) <= base);
    }

    #[test]
    fn participant_scores_sum_to_group_score() {
        let roster = roster();
        for policy in [ScoringPolicy::Participant, ScoringPolicy::group()] {
            let scorer = Scorer::new(&roster, policy).unwrap();
            let members = [0, 1, 2, 3];
            let sum: f64 = members
                .iter()
                .map(|&p| scorer.participant_happiness(p, &members))
                .sum();
            assert!((sum - scorer.group_score(&members)).abs() < EPS);
        }
    }

    #[test]
    fn weak_dislike_weight_is_rejected() {
        let roster = roster();
        let policy = ScoringPolicy::Group {
            dislike_weight: 1.0,
        };
        assert!(matches!(
            Scorer::new(&roster, policy),
            Err(TentError::Configuration(_))
        ));
    }
}
