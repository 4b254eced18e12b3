use itertools::Itertools;

use crate::roster::{ParticipantId, Roster};

/// A possible tent occupancy: members of one pool, ascending by id.
///
/// The sorted member list is the stable key of the group's decision variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate {
    pub pool: usize,
    pub members: Vec<ParticipantId>,
}

impl Candidate {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.members.binary_search(&id).is_ok()
    }
}

/// Every non-empty subset of `pool` with at most `max_capacity` members.
///
/// Subsets are emitted by size, then lexicographically, and their members
/// keep the order of `pool`.
pub fn pool_candidates(
    pool: &[ParticipantId],
    max_capacity: usize,
) -> impl Iterator<Item = Vec<ParticipantId>> + '_ {
    (1..=max_capacity.min(pool.len())).flat_map(move |size| pool.iter().copied().combinations(size))
}

/// Candidates of all pools; members of different pools are never mixed.
pub fn all_candidates(roster: &Roster, max_capacity: usize) -> Vec<Candidate> {
    roster
        .pools()
        .iter()
        .enumerate()
        .flat_map(|(pool, ids)| {
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            pool_candidates(&sorted, max_capacity)
                .map(|members| Candidate { pool, members })
                .collect::<Vec<_>>()
        })
        .collect()
}
