//! Final standings: one leaderboard per role.

use crate::models::{Battle, Contestant, Role, RolePool};
use serde::{Deserialize, Serialize};

/// Two independent leaderboards, highest points first. Rows are not paired across roles.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    pub leads: Vec<Contestant>,
    pub follows: Vec<Contestant>,
}

impl Standings {
    pub fn for_role(&self, role: Role) -> &[Contestant] {
        match role {
            Role::Lead => &self.leads,
            Role::Follow => &self.follows,
        }
    }
}

/// Every contestant of each role exactly once, sorted by points descending.
///
/// Rows start in placement order (queue front to back, then anyone still on stage or waiting
/// for a rematch, then the round winner) and the sort is stable, so equal points keep that
/// order. Safe to call at any time, including before the battle is finished.
pub fn finalize_results(battle: &Battle) -> Standings {
    Standings {
        leads: leaderboard(&battle.leads),
        follows: leaderboard(&battle.follows),
    }
}

fn leaderboard(pool: &RolePool) -> Vec<Contestant> {
    let mut rows: Vec<Contestant> = pool
        .placed_ids()
        .into_iter()
        .filter_map(|id| pool.contestant(id).cloned())
        .collect();
    rows.sort_by(|a, b| b.points.cmp(&a.points));
    rows
}
