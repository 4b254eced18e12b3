use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::solver::{SolveStatus, SolverConfig};
use crate::tents::TentType;

/// A problem file.
#[derive(Debug, Serialize, Deserialize)]
pub struct Problem {
    /// Tent types, ascending by capacity.
    pub tents: Vec<TentType>,
    /// Display names per pool; members of different pools never share a tent.
    pub pools: Vec<Vec<String>>,
    #[serde(default)]
    pub preferences: BTreeMap<String, NamedPreference>,
    #[serde(default)]
    pub scoring: Scoring,
    #[serde(rename = "dislikeWeight")]
    pub dislike_weight: Option<f64>,
    #[serde(default)]
    pub solver: SolverConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedPreference {
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    #[default]
    Participant,
    Group,
}

/// The report of a solved problem.
#[derive(Debug, Serialize, Deserialize)]
pub struct Plan {
    pub status: SolveStatus,
    pub objective: f64,
    /// How many candidate groups the model chose from.
    pub candidates: usize,
    pub tents: Vec<TentReport>,
    pub happiness: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TentReport {
    pub capacity: u32,
    pub members: Vec<String>,
    pub happiness: f64,
}
