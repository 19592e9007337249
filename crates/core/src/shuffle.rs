//! Team shuffle planning
//!
//! Shuffle the roster, then deal players alternately onto team 1 and team 2. Only
//! players whose current team differs from the dealt team need a switch command, which
//! keeps the number of `AdminForceTeamChange` calls down while the dealt teams differ in
//! size by at most one.
//!
//! The permutation is a uniform Fisher-Yates shuffle driven by any [`Rng`]; pass a
//! seeded `StdRng` for reproducible plans. Issuing the switches is the adapter's job; this
//! module is pure.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{PlayerRecord, TEAM_ONE, TEAM_TWO};

/// Where one player ends up after the shuffle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAssignment {
    pub player_id: u32,
    pub name: String,
    /// Argument for `AdminForceTeamChange`.
    pub any_id: String,
    pub current_team: Option<u32>,
    pub target_team: u32,
}

impl TeamAssignment {
    pub fn needs_switch(&self) -> bool {
        self.current_team != Some(self.target_team)
    }
}

/// Full outcome of a shuffle, in dealt order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShufflePlan {
    pub assignments: Vec<TeamAssignment>,
}

impl ShufflePlan {
    /// Assignments that require a team-change command.
    pub fn switches(&self) -> impl Iterator<Item = &TeamAssignment> {
        self.assignments.iter().filter(|a| a.needs_switch())
    }

    /// Players dealt onto team 1 and team 2.
    pub fn team_sizes(&self) -> (usize, usize) {
        let one = self
            .assignments
            .iter()
            .filter(|a| a.target_team == TEAM_ONE)
            .count();
        (one, self.assignments.len() - one)
    }
}

/// Shuffle `players` with `rng` and deal them alternately, starting with team 1.
pub fn plan_team_shuffle<R: Rng + ?Sized>(players: &[PlayerRecord], rng: &mut R) -> ShufflePlan {
    let mut order: Vec<&PlayerRecord> = players.iter().collect();
    order.shuffle(rng);

    let assignments = order
        .into_iter()
        .enumerate()
        .map(|(i, p)| TeamAssignment {
            player_id: p.player_id,
            name: p.name.clone(),
            any_id: p.any_id(),
            current_team: p.team_id,
            target_team: if i % 2 == 0 { TEAM_ONE } else { TEAM_TWO },
        })
        .collect();

    ShufflePlan { assignments }
}
