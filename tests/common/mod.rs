//! Shared helpers for integration tests.
#![allow(dead_code)]

use hustle_battle::{start_battle_with_rng, Battle, ContestantId, Decision, Role, Vote};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const GUESTS: [&str; 2] = ["Kenji", "Diane"];

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

/// Battle with `n` leads (Lead1..) and `n` follows (Follow1..), judged by Kenji and Diane.
pub fn battle_with(n: usize) -> Battle {
    let leads: Vec<String> = (1..=n).map(|i| format!("Lead{i}")).collect();
    let follows: Vec<String> = (1..=n).map(|i| format!("Follow{i}")).collect();
    let guests: Vec<String> = GUESTS.iter().map(|g| g.to_string()).collect();
    start_battle_with_rng(&leads, &follows, &guests, &mut rng()).unwrap()
}

/// Every guest casts `decision`.
pub fn guest_votes(decision: Decision) -> Vec<Vote> {
    GUESTS.iter().map(|g| Vote::new(*g, decision)).collect()
}

/// Unanimous guest ballots for `target`, who must be in the role's live matchup.
pub fn votes_for(battle: &Battle, role: Role, target: ContestantId) -> Vec<Vote> {
    let [first, _] = battle.pool(role).matchup.unwrap();
    guest_votes(if first == target {
        Decision::First
    } else {
        Decision::Second
    })
}

pub fn matchup(battle: &Battle, role: Role) -> [ContestantId; 2] {
    battle.pool(role).matchup.unwrap()
}

pub fn name(battle: &Battle, role: Role, id: ContestantId) -> String {
    battle.pool(role).name(id)
}

pub fn points(battle: &Battle, role: Role, id: ContestantId) -> u32 {
    battle.pool(role).contestant(id).unwrap().points
}

/// Every contestant of the role sits in exactly one place.
pub fn assert_roster_conserved(battle: &Battle, role: Role) {
    let pool = battle.pool(role);
    let mut placed = pool.placed_ids();
    assert_eq!(placed.len(), pool.total(), "{role} placements: {placed:?}");
    placed.sort();
    placed.dedup();
    assert_eq!(placed.len(), pool.total(), "{role} placed twice");
    let mut roster: Vec<ContestantId> = pool.roster.iter().map(|c| c.id).collect();
    roster.sort();
    assert_eq!(placed, roster);
}
