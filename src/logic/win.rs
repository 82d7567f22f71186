//! Win detection: crowning a role champion once they reach the win threshold.

use crate::logic::judging::{judge_round, JudgeResult};
use crate::models::{Battle, BattleError, BattleState, Crowning, Role, Vote};

/// Check both roles after a full round has been judged.
///
/// A role's round winner is crowned once their points reach `total - 1`. Each role is crowned
/// at most once per battle; later calls never repeat a crowning. When only one role has a
/// champion, that champion is marked to retire to the queue on the next round advance. When
/// both roles have one, the battle is finished.
///
/// Returns the crownings that happened in this call (usually empty).
pub fn check_for_win(battle: &mut Battle) -> Vec<Crowning> {
    let mut crowned = Vec::new();
    for role in Role::ALL {
        let pool = battle.pool_mut(role);
        if pool.has_winner() {
            continue;
        }
        let Some(holder) = pool.round_winner else {
            continue;
        };
        let threshold = pool.win_threshold();
        let Some(champion) = pool.contestant(holder) else {
            continue;
        };
        if champion.points >= threshold {
            let name = champion.name.clone();
            pool.crowned = Some(holder);
            log::info!("{} crowned for the {} with {} points", name, role.plural(), threshold);
            crowned.push(Crowning { role, name });
        }
    }

    if battle.leads.has_winner() && battle.follows.has_winner() {
        battle.state = BattleState::Finished;
        log::info!("Battle {} finished after round {}", battle.id, battle.round_num());
    } else {
        for crowning in &crowned {
            battle.pool_mut(crowning.role).retire_pending = true;
        }
    }

    battle.current_round.win_messages.extend(crowned.iter().cloned());
    crowned
}

/// Judge one role and, once both roles of the round have an outcome, check for a champion.
/// Roles may be judged in either order; the check runs exactly when the round is complete.
pub fn judge_and_check_for_win(
    battle: &mut Battle,
    role: Role,
    votes: &[Vote],
) -> Result<(JudgeResult, Vec<Crowning>), BattleError> {
    let result = judge_round(battle, role, votes)?;
    let crowned = if battle.current_round.is_judged() {
        check_for_win(battle)
    } else {
        Vec::new()
    };
    Ok((result, crowned))
}
