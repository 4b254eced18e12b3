//! The set partitioning formulation.
//!
//! One binary variable per candidate group says whether that group becomes a
//! real tent. The objective sums the happiness of all chosen groups, and the
//! constraints make the chosen groups a partition that fits the inventory.
//!
//! Equal-happiness partitions are told apart by a small bonus of
//! `weight * size^2` per chosen group, which prefers fewer and larger tents.
//! The bonus of a whole partition stays below [`TIE_BREAK_BUDGET`], so it
//! never outweighs a real happiness difference larger than that.

use good_lp::{Constraint, Expression, ProblemVariables, Variable, variable, variables};
use tracing::debug;

use crate::candidates::Candidate;
use crate::error::TentError;
use crate::happiness::Scorer;
use crate::roster::Roster;
use crate::tents::Inventory;

/// A constraint row with a name to report when the model turns out infeasible.
pub struct LabelledConstraint {
    pub label: String,
    pub constraint: Constraint,
}

pub const TIE_BREAK_BUDGET: f64 = 1e-3;

pub struct TentModel {
    pub variables: ProblemVariables,
    /// Decision variable of each candidate, in candidate order.
    pub selectors: Vec<Variable>,
    /// Indices of the candidates containing each participant, indexed by id.
    pub memberships: Vec<Vec<usize>>,
    pub objective: Expression,
    pub constraints: Vec<LabelledConstraint>,
}

/// Candidates too big for a tier, and how many larger tents can take them.
#[derive(Debug, Clone, PartialEq)]
pub struct TierRow {
    pub capacity: u32,
    pub candidates: Vec<usize>,
    pub tents_above: u64,
}

impl TentModel {
    pub fn labels(&self) -> Vec<String> {
        self.constraints.iter().map(|c| c.label.clone()).collect()
    }
}

pub fn build_model(
    roster: &Roster,
    inventory: &Inventory,
    candidates: &[Candidate],
    scorer: &Scorer,
) -> Result<TentModel, TentError> {
    let max_capacity = inventory.max_capacity();
    if let Some(too_big) = candidates.iter().find(|c| c.size() > max_capacity) {
        return Err(TentError::Configuration(format!(
            "candidate of {} members exceeds the largest tent ({max_capacity})",
            too_big.size()
        )));
    }

    let (variables, selectors) = init_variables(candidates);
    let weight = tie_break_weight(roster.len(), max_capacity);
    let objective = create_objective_function(candidates, &selectors, scorer, weight);
    let memberships = collect_memberships(roster, candidates)?;

    let mut constraints = Vec::new();
    constrain_tent_count(&mut constraints, inventory, &selectors);
    constrain_larger_tents(&mut constraints, inventory, candidates, &selectors);
    constrain_one_tent_per_participant(&mut constraints, roster, &memberships, &selectors);

    Ok(TentModel {
        variables,
        selectors,
        memberships,
        objective,
        constraints,
    })
}

fn init_variables(candidates: &[Candidate]) -> (ProblemVariables, Vec<Variable>) {
    let mut problem_vars = variables!();
    let selectors = candidates
        .iter()
        .map(|_| problem_vars.add(variable().binary()))
        .collect();
    (problem_vars, selectors)
}

/// Per-unit tie-break weight. A partition's `sum(size^2)` is at most
/// `participants * max_capacity`, which scales its bonus into the budget.
pub fn tie_break_weight(participants: usize, max_capacity: usize) -> f64 {
    TIE_BREAK_BUDGET / (participants.max(1) * max_capacity.max(1)) as f64
}

pub fn tie_break(size: usize, weight: f64) -> f64 {
    weight * (size * size) as f64
}

fn create_objective_function(
    candidates: &[Candidate],
    selectors: &[Variable],
    scorer: &Scorer,
    weight: f64,
) -> Expression {
    let mut objective = Expression::with_capacity(candidates.len());
    for (candidate, &selected) in candidates.iter().zip(selectors) {
        let score = scorer.group_score(&candidate.members);
        objective.add_mul(score + tie_break(candidate.size(), weight), selected);
    }
    objective
}

/// No more tents than exist.
fn constrain_tent_count(
    constraints: &mut Vec<LabelledConstraint>,
    inventory: &Inventory,
    selectors: &[Variable],
) {
    let chosen = selectors
        .iter()
        .fold(Expression::from(0.0), |sum, &selected| sum + selected);
    constraints.push(LabelledConstraint {
        label: "max_tents".into(),
        constraint: chosen.leq(inventory.total_count() as f64),
    });
}

/// A group too big for tier `t` needs a tent of a strictly larger tier, so
/// at most that many such groups may be chosen. The largest tier gets no row.
pub fn tier_rows(inventory: &Inventory, candidates: &[Candidate]) -> Vec<TierRow> {
    inventory
        .tiers()
        .iter()
        .enumerate()
        .filter_map(|(index, tier)| {
            let larger: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.size() > tier.capacity as usize)
                .map(|(i, _)| i)
                .collect();
            (!larger.is_empty()).then(|| TierRow {
                capacity: tier.capacity,
                candidates: larger,
                tents_above: inventory.count_above(index),
            })
        })
        .collect()
}

fn constrain_larger_tents(
    constraints: &mut Vec<LabelledConstraint>,
    inventory: &Inventory,
    candidates: &[Candidate],
    selectors: &[Variable],
) {
    for row in tier_rows(inventory, candidates) {
        debug!(
            capacity = row.capacity,
            groups = row.candidates.len(),
            tents_above = row.tents_above,
            "tier constraint"
        );
        let chosen = row
            .candidates
            .iter()
            .fold(Expression::from(0.0), |sum, &i| sum + selectors[i]);
        constraints.push(LabelledConstraint {
            label: format!("larger_than_{}", row.capacity),
            constraint: chosen.leq(row.tents_above as f64),
        });
    }
}

fn collect_memberships(
    roster: &Roster,
    candidates: &[Candidate],
) -> Result<Vec<Vec<usize>>, TentError> {
    let mut memberships = vec![Vec::new(); roster.len()];
    for (index, candidate) in candidates.iter().enumerate() {
        for &member in &candidate.members {
            let Some(slot) = memberships.get_mut(member as usize) else {
                return Err(TentError::DataIntegrity(format!(
                    "candidate refers to unknown participant {member}"
                )));
            };
            slot.push(index);
        }
    }
    Ok(memberships)
}

/// Every participant sleeps in exactly one chosen tent.
fn constrain_one_tent_per_participant(
    constraints: &mut Vec<LabelledConstraint>,
    roster: &Roster,
    memberships: &[Vec<usize>],
    selectors: &[Variable],
) {
    for (participant, indices) in roster.participants().iter().zip(memberships) {
        let mut occupancy = Expression::with_capacity(indices.len());
        for &i in indices {
            occupancy.add_mul(1.0, selectors[i]);
        }
        constraints.push(LabelledConstraint {
            label: format!("accommodate_{}", participant.name),
            constraint: occupancy.eq(1.0),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::all_candidates;
    use crate::happiness::ScoringPolicy;
    use crate::roster::Preference;
    use crate::tents::TentType;

    fn roster(n: usize) -> Roster {
        let names: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
        Roster::from_indexed(&[names], vec![Preference::default(); n]).unwrap()
    }

    #[test]
    fn one_variable_per_candidate_and_labelled_rows() {
        let roster = roster(4);
        let inventory = Inventory::new(vec![TentType::new(2, 1), TentType::new(4, 1)]).unwrap();
        let scorer = Scorer::new(&roster, ScoringPolicy::Participant).unwrap();
        let candidates = all_candidates(&roster, inventory.max_capacity());

        let model = build_model(&roster, &inventory, &candidates, &scorer).unwrap();

        assert_eq!(model.selectors.len(), 15);
        // the largest tier has no bigger groups and gets no row
        assert_eq!(
            model.labels(),
            vec![
                "max_tents",
                "larger_than_2",
                "accommodate_p0",
                "accommodate_p1",
                "accommodate_p2",
                "accommodate_p3",
            ]
        );
    }

    #[test]
    fn tier_rows_hold_exactly_the_groups_too_big_for_the_tier() {
        let roster = roster(5);
        let inventory = Inventory::new(vec![
            TentType::new(2, 2),
            TentType::new(3, 1),
            TentType::new(5, 1),
        ])
        .unwrap();
        let candidates = all_candidates(&roster, inventory.max_capacity());

        let rows = tier_rows(&inventory, &candidates);

        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.capacity, r.candidates.len(), r.tents_above))
            .collect();
        // sizes 3..=5 are 10 + 5 + 1 groups, sizes 4..=5 are 5 + 1
        assert_eq!(summary, vec![(2, 16, 2), (3, 6, 1)]);
        for row in &rows {
            assert!(
                row.candidates
                    .iter()
                    .all(|&i| candidates[i].size() > row.capacity as usize)
            );
        }
    }

    #[test]
    fn memberships_list_every_candidate_of_a_participant() {
        let roster = roster(3);
        let inventory = Inventory::new(vec![TentType::new(3, 1)]).unwrap();
        let scorer = Scorer::new(&roster, ScoringPolicy::Participant).unwrap();
        let candidates = all_candidates(&roster, 3);

        let model = build_model(&roster, &inventory, &candidates, &scorer).unwrap();

        for (id, indices) in model.memberships.iter().enumerate() {
            assert_eq!(indices.len(), 4);
            assert!(indices.iter().all(|&i| candidates[i].contains(id as u32)));
        }
    }

    #[test]
    fn tie_break_prefers_fewer_larger_tents_within_budget() {
        let weight = tie_break_weight(4, 4);
        let bonus = |sizes: &[usize]| -> f64 { sizes.iter().map(|&s| tie_break(s, weight)).sum() };

        assert!(bonus(&[4]) > bonus(&[3, 1]));
        assert!(bonus(&[3, 1]) > bonus(&[2, 2]));
        assert!(bonus(&[2, 2]) > bonus(&[2, 1, 1]));
        assert!(bonus(&[4]) <= TIE_BREAK_BUDGET);
    }

    #[test]
    fn oversized_candidates_are_rejected() {
        let roster = roster(3);
        let inventory = Inventory::new(vec![TentType::new(2, 2)]).unwrap();
        let scorer = Scorer::new(&roster, ScoringPolicy::Participant).unwrap();
        let candidates = all_candidates(&roster, 3);

        let result = build_model(&roster, &inventory, &candidates, &scorer);
        assert!(matches!(result, Err(TentError::Configuration(_))));
    }
}
