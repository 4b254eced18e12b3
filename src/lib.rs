mod candidates;
mod error;
mod happiness;
mod interpret;
mod model;
mod roster;
mod solver;
mod tents;
mod types;

pub use candidates::{Candidate, all_candidates, pool_candidates};
pub use error::TentError;
pub use happiness::{DEFAULT_DISLIKE_WEIGHT, Scorer, ScoringPolicy};
pub use interpret::{Assignment, HousedGroup, INTEGRALITY_TOLERANCE, interpret};
pub use model::{LabelledConstraint, TentModel, build_model};
pub use roster::{Participant, ParticipantId, Preference, Roster};
pub use solver::{CbcSolver, MilpSolver, SolveStatus, SolvedModel, SolverConfig};
pub use tents::{Inventory, TentType};
pub use types::{NamedPreference, Plan, Problem, Scoring, TentReport};

use tracing::info;

impl Problem {
    /// Solve with CBC, configured by the problem's `solver` section.
    pub fn solve(&self) -> Result<Plan, TentError> {
        self.solve_with(&CbcSolver::new(self.solver.clone()))
    }

    pub fn solve_with(&self, solver: &impl MilpSolver) -> Result<Plan, TentError> {
        let roster = Roster::from_named(&self.pools, &self.preferences)?;
        let inventory = Inventory::new(self.tents.clone())?;
        let policy = self.scoring_policy();

        let assignment = plan(&roster, &inventory, policy, solver)?;
        Ok(create_plan(&roster, &assignment))
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        match self.scoring {
            Scoring::Participant => ScoringPolicy::Participant,
            Scoring::Group => ScoringPolicy::Group {
                dislike_weight: self.dislike_weight.unwrap_or(DEFAULT_DISLIKE_WEIGHT),
            },
        }
    }
}

/// Run the whole pipeline: check beds, enumerate and score candidates,
/// build the model, solve it once and read the tents back.
pub fn plan(
    roster: &Roster,
    inventory: &Inventory,
    policy: ScoringPolicy,
    solver: &impl MilpSolver,
) -> Result<Assignment, TentError> {
    inventory.ensure_beds(roster.len())?;
    let scorer = Scorer::new(roster, policy)?;

    let candidates = all_candidates(roster, inventory.max_capacity());
    info!(
        participants = roster.len(),
        pools = roster.pools().len(),
        candidates = candidates.len(),
        ?policy,
        "enumerated candidate groups"
    );

    let model = build_model(roster, inventory, &candidates, &scorer)?;
    let solved = solver.solve(model)?;
    let assignment = interpret(roster, inventory, &scorer, &candidates, &solved)?;

    info!(
        status = ?assignment.status,
        objective = assignment.objective,
        tents = assignment.groups.len(),
        "assigned tents"
    );
    Ok(assignment)
}

/// Convert an assignment into the named report
fn create_plan(roster: &Roster, assignment: &Assignment) -> Plan {
    let tents = assignment
        .groups
        .iter()
        .map(|housed| TentReport {
            capacity: housed.capacity,
            members: housed
                .group
                .members
                .iter()
                .map(|&id| roster.name(id).to_owned())
                .collect(),
            happiness: housed.happiness,
        })
        .collect();

    let happiness = roster
        .participants()
        .iter()
        .map(|p| (p.name.clone(), assignment.happiness[p.id as usize]))
        .collect();

    Plan {
        status: assignment.status,
        objective: assignment.objective,
        candidates: assignment.candidates,
        tents,
        happiness,
    }
}
