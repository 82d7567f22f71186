//! BattleView: serializable snapshot of what a driver shows between ballots.

use crate::models::battle::{Battle, BattleId, BattleState, Pair};
use crate::models::contestant::{Contestant, Role};
use serde::{Deserialize, Serialize};

/// A couple on stage with current points.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PairView {
    pub lead: Contestant,
    pub follow: Contestant,
}

impl PairView {
    fn from_pair(battle: &Battle, pair: Pair) -> Self {
        Self {
            lead: battle.leads.contestant(pair.lead).cloned().unwrap_or_default(),
            follow: battle.follows.contestant(pair.follow).cloned().unwrap_or_default(),
        }
    }
}

/// Display state of a battle (for API / terminal).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BattleView {
    pub id: BattleId,
    pub state: BattleState,
    pub round: u32,
    pub pair_1: PairView,
    pub pair_2: PairView,
    pub guest_judges: Vec<String>,
    pub contestant_judges: Vec<String>,
    /// Waiting leads, front first.
    pub leads: Vec<Contestant>,
    /// Waiting follows, front first.
    pub follows: Vec<Contestant>,
    pub initial_leads: Vec<String>,
    pub initial_follows: Vec<String>,
    pub crowned_lead: Option<String>,
    pub crowned_follow: Option<String>,
}

impl BattleView {
    pub fn from_battle(b: &Battle) -> Self {
        let queued = |role: Role| -> Vec<Contestant> {
            b.pool(role).queued().into_iter().cloned().collect()
        };
        let initial = |role: Role| -> Vec<String> {
            b.pool(role).roster.iter().map(|c| c.name.clone()).collect()
        };
        let crowned = |role: Role| b.pool(role).crowned.map(|id| b.pool(role).name(id));
        Self {
            id: b.id,
            state: b.state,
            round: b.round_num(),
            pair_1: PairView::from_pair(b, b.pairs[0]),
            pair_2: PairView::from_pair(b, b.pairs[1]),
            guest_judges: b.guest_judges.clone(),
            contestant_judges: b.contestant_judges().to_vec(),
            leads: queued(Role::Lead),
            follows: queued(Role::Follow),
            initial_leads: initial(Role::Lead),
            initial_follows: initial(Role::Follow),
            crowned_lead: crowned(Role::Lead),
            crowned_follow: crowned(Role::Follow),
        }
    }
}

impl Battle {
    /// Current display state.
    pub fn view(&self) -> BattleView {
        BattleView::from_battle(self)
    }
}
