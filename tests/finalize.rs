//! Integration tests for final standings.

mod common;

use common::*;
use hustle_battle::{finalize_results, judge_round, next_round_with_rng, Decision, Role};

#[test]
fn early_finalize_lists_everyone_in_placement_order() {
    let b = battle_with(4);
    let standings = finalize_results(&b);

    for role in Role::ALL {
        let rows = standings.for_role(role);
        let ids: Vec<_> = rows.iter().map(|c| c.id).collect();
        assert_eq!(ids, b.pool(role).placed_ids());
        assert!(rows.iter().all(|c| c.points == 0));
    }
    // Finalizing never touches the battle.
    assert_eq!(b.round_num(), 1);
    assert!(b.leads.matchup.is_some());
}

#[test]
fn winner_leads_and_ties_keep_queue_order() {
    let mut b = battle_with(4);
    let [winner, loser] = matchup(&b, Role::Lead);
    let queued: Vec<_> = b.leads.queue.iter().copied().collect();

    judge_round(&mut b, Role::Lead, &guest_votes(Decision::First)).unwrap();
    let standings = finalize_results(&b);

    let ids: Vec<_> = standings.leads.iter().map(|c| c.id).collect();
    let mut expected = vec![winner];
    expected.extend(queued);
    expected.push(loser);
    assert_eq!(ids, expected);
    assert_eq!(standings.leads[0].points, 1);
    assert_eq!(standings.follows.len(), 4);
}

#[test]
fn standings_follow_points_after_several_rounds() {
    let mut b = battle_with(5);
    let mut r = rng();
    for _ in 0..6 {
        judge_round(&mut b, Role::Lead, &guest_votes(Decision::Second)).unwrap();
        judge_round(&mut b, Role::Follow, &guest_votes(Decision::First)).unwrap();
        hustle_battle::check_for_win(&mut b);
        next_round_with_rng(&mut b, &mut r).unwrap();
    }
    let standings = finalize_results(&b);
    for role in Role::ALL {
        let rows = standings.for_role(role);
        assert_eq!(rows.len(), 5);
        assert!(rows.windows(2).all(|w| w[0].points >= w[1].points));
        let total: u32 = rows.iter().map(|c| c.points).sum();
        assert_eq!(total, 6);
        let mut ids: Vec<_> = rows.iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
