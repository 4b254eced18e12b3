//! Turning solver output back into tents.

use tracing::debug;

use crate::candidates::Candidate;
use crate::error::TentError;
use crate::happiness::Scorer;
use crate::roster::Roster;
use crate::solver::{SolveStatus, SolvedModel};
use crate::tents::Inventory;

/// How far a solved value may stray from 0 or 1.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct HousedGroup {
    pub group: Candidate,
    /// Capacity of the tent the group sleeps in.
    pub capacity: u32,
    pub happiness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub status: SolveStatus,
    /// Sorted by pool, then members.
    pub groups: Vec<HousedGroup>,
    /// Happiness of each participant, indexed by id.
    pub happiness: Vec<f64>,
    pub objective: f64,
    /// Number of candidate groups the solver chose from.
    pub candidates: usize,
}

pub fn interpret(
    roster: &Roster,
    inventory: &Inventory,
    scorer: &Scorer,
    candidates: &[Candidate],
    solved: &SolvedModel,
) -> Result<Assignment, TentError> {
    let groups = selected_groups(candidates, &solved.values)?;
    validate_partition(roster, &groups)?;
    let capacities = house(inventory, &groups)?;

    let mut happiness = vec![0.0; roster.len()];
    let groups: Vec<HousedGroup> = groups
        .into_iter()
        .zip(capacities)
        .map(|(group, capacity)| {
            for &member in &group.members {
                happiness[member as usize] = scorer.participant_happiness(member, &group.members);
            }
            let group_happiness = scorer.group_score(&group.members);
            debug!(members = ?group.members, capacity, happiness = group_happiness, "tent");
            HousedGroup {
                group,
                capacity,
                happiness: group_happiness,
            }
        })
        .collect();
    let objective = groups.iter().map(|g| g.happiness).sum();

    Ok(Assignment {
        status: solved.status,
        groups,
        happiness,
        objective,
        candidates: candidates.len(),
    })
}

/// Candidates whose variable is 1, in canonical order.
pub fn selected_groups(
    candidates: &[Candidate],
    values: &[f64],
) -> Result<Vec<Candidate>, TentError> {
    if candidates.len() != values.len() {
        return Err(TentError::InternalConsistency(format!(
            "{} values for {} candidates",
            values.len(),
            candidates.len()
        )));
    }

    let mut selected = Vec::new();
    for (candidate, &value) in candidates.iter().zip(values) {
        if value.abs() > INTEGRALITY_TOLERANCE && (value - 1.0).abs() > INTEGRALITY_TOLERANCE {
            return Err(TentError::InternalConsistency(format!(
                "group {:?} has non-binary value {value}",
                candidate.members
            )));
        }
        if value > 0.5 {
            selected.push(candidate.clone());
        }
    }
    selected.sort();
    Ok(selected)
}

/// Every participant must be in exactly one group.
pub fn validate_partition(roster: &Roster, groups: &[Candidate]) -> Result<(), TentError> {
    let mut seen = vec![0usize; roster.len()];
    for group in groups {
        for &member in &group.members {
            match seen.get_mut(member as usize) {
                Some(count) => *count += 1,
                None => {
                    return Err(TentError::InternalConsistency(format!(
                        "unknown participant {member} in a tent"
                    )));
                }
            }
        }
    }

    if let Some((id, &count)) = seen.iter().enumerate().find(|(_, c)| **c != 1) {
        return Err(TentError::InternalConsistency(format!(
            "{} is in {count} tents",
            roster.name(id as u32)
        )));
    }
    Ok(())
}

/// Give each group the smallest free tent that holds it, smallest groups first.
///
/// Returns the tent capacity of each group in `groups` order. Any solution
/// within the tent count and tier constraints can be housed this way.
pub fn house(inventory: &Inventory, groups: &[Candidate]) -> Result<Vec<u32>, TentError> {
    let tiers = inventory.tiers();
    let mut remaining: Vec<u32> = tiers.iter().map(|t| t.count).collect();
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by_key(|&i| groups[i].size());

    let mut capacities = vec![0; groups.len()];
    for i in order {
        let size = groups[i].size();
        let tier = (0..tiers.len())
            .find(|&t| tiers[t].capacity as usize >= size && remaining[t] > 0);
        let Some(tier) = tier else {
            return Err(TentError::InternalConsistency(format!(
                "no tent left for group {:?}",
                groups[i].members
            )));
        };
        remaining[tier] -= 1;
        capacities[i] = tiers[tier].capacity;
    }
    Ok(capacities)
}
