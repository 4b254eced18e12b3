//! Participants, their pools and their like/dislike preferences.
//!
//! Ids are assigned contiguously in pool order: the first pool holds ids
//! `[0, len(pool 0))`, the second continues from there, and so on. Every
//! participant carries its own id, pool, display name and preference sets,
//! so nothing downstream has to keep parallel lists aligned.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::TentError;
use crate::types::NamedPreference;

pub type ParticipantId = u32;

/// Raw preference entry of one participant, referring to others by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preference {
    pub likes: Vec<ParticipantId>,
    pub dislikes: Vec<ParticipantId>,
}

impl Preference {
    pub fn new(likes: &[ParticipantId], dislikes: &[ParticipantId]) -> Self {
        Preference {
            likes: likes.to_vec(),
            dislikes: dislikes.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub pool: usize,
    pub name: String,
    likes: HashSet<ParticipantId>,
    dislikes: HashSet<ParticipantId>,
}

impl Participant {
    pub fn likes(&self) -> &HashSet<ParticipantId> {
        &self.likes
    }

    pub fn dislikes(&self) -> &HashSet<ParticipantId> {
        &self.dislikes
    }
}

/// The Preference Store: immutable after construction.
#[derive(Debug, Clone)]
pub struct Roster {
    participants: Vec<Participant>,
    pools: Vec<Vec<ParticipantId>>,
}

impl Roster {
    /// Build a roster from per-pool display names and one preference entry
    /// per participant, indexed by participant id.
    pub fn from_indexed(
        pools: &[Vec<String>],
        preferences: Vec<Preference>,
    ) -> Result<Self, TentError> {
        let universe: usize = pools.iter().map(Vec::len).sum();
        if universe == 0 {
            return Err(TentError::Configuration("no participants".into()));
        }
        if preferences.len() < universe {
            return Err(TentError::DataIntegrity(format!(
                "preference entries cover {} of {universe} participants",
                preferences.len()
            )));
        }
        if preferences.len() > universe {
            return Err(TentError::DataIntegrity(format!(
                "{} preference entries for {universe} participants",
                preferences.len()
            )));
        }

        let mut participants = Vec::with_capacity(universe);
        let mut pool_ids = Vec::with_capacity(pools.len());
        let mut preferences = preferences.into_iter();
        let mut next_id: ParticipantId = 0;

        for (pool, names) in pools.iter().enumerate() {
            let mut ids = Vec::with_capacity(names.len());
            for name in names {
                let id = next_id;
                next_id += 1;
                let preference = preferences.next().unwrap_or_default();
                let likes = checked_references(id, name, &preference.likes, universe)?;
                let dislikes = checked_references(id, name, &preference.dislikes, universe)?;
                participants.push(Participant {
                    id,
                    pool,
                    name: name.clone(),
                    likes,
                    dislikes,
                });
                ids.push(id);
            }
            pool_ids.push(ids);
        }

        Ok(Roster {
            participants,
            pools: pool_ids,
        })
    }

    /// Build a roster from display names, with preferences keyed by name.
    ///
    /// Participants without an entry in `preferences` like and dislike nobody.
    pub fn from_named(
        pools: &[Vec<String>],
        preferences: &BTreeMap<String, NamedPreference>,
    ) -> Result<Self, TentError> {
        let mut ids = HashMap::new();
        for (id, name) in pools.iter().flatten().enumerate() {
            if ids.insert(name.as_str(), id as ParticipantId).is_some() {
                return Err(TentError::DataIntegrity(format!(
                    "participant name {name:?} appears more than once"
                )));
            }
        }

        if let Some(unknown) = preferences.keys().find(|n| !ids.contains_key(n.as_str())) {
            return Err(TentError::DataIntegrity(format!(
                "preferences given for unknown participant {unknown:?}"
            )));
        }

        let resolve = |owner: &str, names: &[String]| -> Result<Vec<ParticipantId>, TentError> {
            names
                .iter()
                .map(|n| {
                    ids.get(n.as_str()).copied().ok_or_else(|| {
                        TentError::DataIntegrity(format!(
                            "{owner:?} refers to unknown participant {n:?}"
                        ))
                    })
                })
                .collect()
        };

        let indexed = pools
            .iter()
            .flatten()
            .map(|name| match preferences.get(name) {
                Some(pref) => Ok(Preference {
                    likes: resolve(name, &pref.likes)?,
                    dislikes: resolve(name, &pref.dislikes)?,
                }),
                None => Ok(Preference::default()),
            })
            .collect::<Result<Vec<_>, TentError>>()?;

        Self::from_indexed(pools, indexed)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn pools(&self) -> &[Vec<ParticipantId>] {
        &self.pools
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> &Participant {
        &self.participants[id as usize]
    }

    pub fn likes(&self, id: ParticipantId) -> &HashSet<ParticipantId> {
        self.participant(id).likes()
    }

    pub fn dislikes(&self, id: ParticipantId) -> &HashSet<ParticipantId> {
        self.participant(id).dislikes()
    }

    pub fn name(&self, id: ParticipantId) -> &str {
        &self.participant(id).name
    }
}

fn checked_references(
    owner: ParticipantId,
    name: &str,
    references: &[ParticipantId],
    universe: usize,
) -> Result<HashSet<ParticipantId>, TentError> {
    references
        .iter()
        .map(|&other| {
            if other as usize >= universe {
                Err(TentError::DataIntegrity(format!(
                    "{name:?} refers to participant {other}, but only {universe} exist"
                )))
            } else if other == owner {
                Err(TentError::DataIntegrity(format!(
                    "{name:?} lists themselves as a preference"
                )))
            } else {
                Ok(other)
            }
        })
        .collect()
}
