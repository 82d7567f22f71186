//! Round advancement: archive the closed round, pick the next pairs, avoid back-to-back repeats.

use crate::logic::setup::select_contestant_judges;
use crate::models::{Battle, BattleError, ContestantId, Pair, Role};
use rand::Rng;

/// Advance with `rand::thread_rng()` for peer judge selection. See [`next_round_with_rng`].
pub fn next_round(battle: &mut Battle) -> Result<(), BattleError> {
    next_round_with_rng(battle, &mut rand::thread_rng())
}

/// Close the current round and open the next one.
///
/// Each role picks its two dancers via [`RolePool::next_matchup`](crate::RolePool::next_matchup).
/// A staying lead winner goes on pair 1 and a staying follow winner on pair 2. The follows are
/// then swapped between the pairs when that is the only way to avoid repeating a couple from
/// the previous round or putting both previous round winners together.
///
/// No-op once the battle is finished. Both roles must have been judged. Queue shortages are
/// detected before anything changes.
pub fn next_round_with_rng<R: Rng + ?Sized>(battle: &mut Battle, rng: &mut R) -> Result<(), BattleError> {
    if battle.is_finished() {
        return Ok(());
    }
    if Role::ALL.iter().any(|&r| battle.pool(r).matchup.is_some()) {
        return Err(BattleError::IncompleteResults);
    }
    battle.leads.check_next_matchup()?;
    battle.follows.check_next_matchup()?;

    let previous = battle.pairs;
    let winners = previous_winners(battle);

    let leads = battle.leads.next_matchup(true)?;
    let mut follows = battle.follows.next_matchup(false)?;

    let straight = couples(leads, follows);
    let crossed = couples(leads, [follows[1], follows[0]]);
    let pairs = if conflicts(&straight, &previous, winners) && !conflicts(&crossed, &previous, winners) {
        follows.swap(0, 1);
        crossed
    } else {
        straight
    };

    battle.leads.matchup = Some(leads);
    battle.follows.matchup = Some(follows);
    battle.pairs = pairs;

    let round_num = battle.round_num() + 1;
    let judges = select_contestant_judges(battle, rng);
    let opened = battle.open_round(round_num, judges);
    let closed = std::mem::replace(&mut battle.current_round, opened);
    battle.rounds.push(closed);

    log::info!(
        "Round {}: {} & {} vs {} & {}",
        round_num,
        battle.current_round.pair_1.lead,
        battle.current_round.pair_1.follow,
        battle.current_round.pair_2.lead,
        battle.current_round.pair_2.follow
    );
    Ok(())
}

fn couples(leads: [ContestantId; 2], follows: [ContestantId; 2]) -> [Pair; 2] {
    [
        Pair {
            lead: leads[0],
            follow: follows[0],
        },
        Pair {
            lead: leads[1],
            follow: follows[1],
        },
    ]
}

/// Lead and follow who each won their battle by scoring in the closing round.
fn previous_winners(battle: &Battle) -> Option<(ContestantId, ContestantId)> {
    let round = &battle.current_round;
    Some((round.winner_id(Role::Lead)?, round.winner_id(Role::Follow)?))
}

fn conflicts(pairs: &[Pair; 2], previous: &[Pair; 2], winners: Option<(ContestantId, ContestantId)>) -> bool {
    pairs.iter().any(|p| {
        previous.contains(p) || winners.is_some_and(|(lead, follow)| p.lead == lead && p.follow == follow)
    })
}
