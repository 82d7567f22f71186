//! Integration tests for round advancement: pairing priority, anti-repeat swap, conservation.

mod common;

use common::*;
use hustle_battle::{
    check_for_win, judge_round, next_round_with_rng, BattleError, Decision, Pair, Role, Vote,
};
use rand::Rng;

#[test]
fn winner_stays_on_and_faces_queue_front() {
    let mut b = battle_with(4);
    let mut r = rng();
    let [lead_1, _] = matchup(&b, Role::Lead);
    let [_, follow_2] = matchup(&b, Role::Follow);
    let next_lead = *b.leads.queue.front().unwrap();
    let next_follow = *b.follows.queue.front().unwrap();

    judge_round(&mut b, Role::Lead, &guest_votes(Decision::First)).unwrap();
    judge_round(&mut b, Role::Follow, &guest_votes(Decision::Second)).unwrap();
    check_for_win(&mut b);
    next_round_with_rng(&mut b, &mut r).unwrap();

    assert_eq!(b.round_num(), 2);
    assert_eq!(b.rounds.len(), 1);
    assert_eq!(matchup(&b, Role::Lead), [lead_1, next_lead]);
    let follows = matchup(&b, Role::Follow);
    assert!(follows.contains(&follow_2) && follows.contains(&next_follow));
    assert_eq!(b.leads.round_winner, None);
    assert_roster_conserved(&b, Role::Lead);
    assert_roster_conserved(&b, Role::Follow);
}

#[test]
fn tie_pair_is_rematched() {
    let mut b = battle_with(4);
    let mut r = rng();
    let tied = matchup(&b, Role::Lead);
    judge_round(&mut b, Role::Lead, &guest_votes(Decision::Tie)).unwrap();
    judge_round(&mut b, Role::Follow, &guest_votes(Decision::First)).unwrap();
    next_round_with_rng(&mut b, &mut r).unwrap();

    assert_eq!(matchup(&b, Role::Lead), tied);
    assert_eq!(b.leads.tie_pair, None);
    assert!(tied.iter().all(|&id| points(&b, Role::Lead, id) == 0));
}

#[test]
fn double_tie_swaps_follows_to_avoid_repeat_couples() {
    let mut b = battle_with(4);
    let mut r = rng();
    for _ in 0..3 {
        let previous = b.pairs;
        judge_round(&mut b, Role::Lead, &guest_votes(Decision::Tie)).unwrap();
        judge_round(&mut b, Role::Follow, &guest_votes(Decision::Tie)).unwrap();
        next_round_with_rng(&mut b, &mut r).unwrap();

        assert!(b.pairs.iter().all(|p| !previous.contains(p)));
        assert_eq!(b.pairs[0].lead, previous[0].lead);
        assert_eq!(b.pairs[0].follow, previous[1].follow);
    }
}

#[test]
fn round_winners_are_not_coupled_next_round() {
    let mut b = battle_with(6);
    let mut r = rng();
    for _ in 0..3 {
        let winners = b.pairs[0];
        judge_round(&mut b, Role::Lead, &guest_votes(Decision::First)).unwrap();
        judge_round(&mut b, Role::Follow, &guest_votes(Decision::First)).unwrap();
        assert_eq!(b.current_round.winner(Role::Lead), Some(name(&b, Role::Lead, winners.lead).as_str()));
        assert_eq!(b.current_round.winner(Role::Follow), Some(name(&b, Role::Follow, winners.follow).as_str()));
        check_for_win(&mut b);
        next_round_with_rng(&mut b, &mut r).unwrap();

        assert!(!b.pairs.contains(&winners));
        assert_eq!(b.pair_names(0).lead, name(&b, Role::Lead, winners.lead));
    }
}

#[test]
fn advance_requires_both_roles_judged() {
    let mut b = battle_with(4);
    let mut r = rng();
    judge_round(&mut b, Role::Lead, &guest_votes(Decision::First)).unwrap();
    assert_eq!(next_round_with_rng(&mut b, &mut r), Err(BattleError::IncompleteResults));
    assert_eq!(b.round_num(), 1);
}

#[test]
fn queue_underflow_is_detected_before_changes() {
    let mut b = battle_with(2);
    let mut r = rng();
    judge_round(&mut b, Role::Lead, &guest_votes(Decision::First)).unwrap();
    judge_round(&mut b, Role::Follow, &guest_votes(Decision::First)).unwrap();
    // Each queue now holds the loser, enough for one challenger.
    next_round_with_rng(&mut b, &mut r).unwrap();
    assert_roster_conserved(&b, Role::Lead);

    // Tie the leads and hand-empty the follow queue: follows cannot draw a challenger.
    judge_round(&mut b, Role::Lead, &guest_votes(Decision::Tie)).unwrap();
    judge_round(&mut b, Role::Follow, &guest_votes(Decision::First)).unwrap();
    let drained: Vec<_> = b.follows.queue.drain(..).collect();
    let lead_tie = b.leads.tie_pair;
    assert_eq!(
        next_round_with_rng(&mut b, &mut r),
        Err(BattleError::QueueUnderflow(Role::Follow))
    );
    assert_eq!(b.leads.tie_pair, lead_tie);
    assert_eq!(b.round_num(), 2);
    b.follows.queue.extend(drained);
    next_round_with_rng(&mut b, &mut r).unwrap();
    assert_eq!(b.round_num(), 3);
}

#[test]
fn peer_judges_come_from_the_queues() {
    let mut b = battle_with(5);
    let mut r = rng();
    for _ in 0..4 {
        let judges = b.contestant_judges().to_vec();
        assert_eq!(judges.len(), 3);
        for j in &judges {
            let queued = b
                .leads
                .queued()
                .iter()
                .chain(b.follows.queued().iter())
                .any(|c| &c.name == j);
            assert!(queued, "{j} is on stage");
        }
        judge_round(&mut b, Role::Lead, &guest_votes(Decision::First)).unwrap();
        judge_round(&mut b, Role::Follow, &guest_votes(Decision::Second)).unwrap();
        check_for_win(&mut b);
        next_round_with_rng(&mut b, &mut r).unwrap();
    }
}

#[test]
fn random_battle_conserves_rosters_and_avoids_repeats() {
    let mut b = battle_with(6);
    let mut r = rng();
    for _ in 0..80 {
        if b.is_finished() {
            break;
        }
        let previous = b.pairs;
        for role in Role::ALL {
            let mut votes: Vec<Vote> = GUESTS
                .iter()
                .map(|g| Vote::new(*g, Decision::try_from(r.gen_range(1..=4u8)).unwrap()))
                .collect();
            for peer in b.contestant_judges().to_vec() {
                votes.push(Vote::new(peer, Decision::try_from(r.gen_range(1..=2u8)).unwrap()));
            }
            judge_round(&mut b, role, &votes).unwrap();
            assert_roster_conserved(&b, Role::Lead);
            assert_roster_conserved(&b, Role::Follow);
        }
        check_for_win(&mut b);
        next_round_with_rng(&mut b, &mut r).unwrap();
        assert_roster_conserved(&b, Role::Lead);
        assert_roster_conserved(&b, Role::Follow);

        if !b.is_finished() {
            let crossed = [
                Pair {
                    lead: b.pairs[0].lead,
                    follow: b.pairs[1].follow,
                },
                Pair {
                    lead: b.pairs[1].lead,
                    follow: b.pairs[0].follow,
                },
            ];
            let repeats = |pairs: &[Pair; 2]| pairs.iter().any(|p| previous.contains(p));
            // A repeat is only allowed when the other arrangement repeats too.
            assert!(!repeats(&b.pairs) || repeats(&crossed));
        }
    }
}
