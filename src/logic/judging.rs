//! Judging one role's matchup: weighted ballots, unanimous tie / no contest, winner bookkeeping.

use crate::models::{Battle, BattleError, BattleState, ContestantId, Decision, Outcome, Role, Vote};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Score for a guest judge's vote.
pub const GUEST_VOTE_WEIGHT: u32 = 2;
/// Score for a peer (contestant) judge's vote.
pub const CONTESTANT_VOTE_WEIGHT: u32 = 1;

/// Outcome of judging one matchup, plus which judges backed the winner.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct JudgeResult {
    pub outcome: Outcome,
    /// Guest judges who voted for the winner (empty for tie / no contest).
    pub guest_votes: Vec<String>,
    /// Peer judges who voted for the winner (empty for tie / no contest).
    pub contestant_votes: Vec<String>,
}

impl JudgeResult {
    fn unattributed(outcome: Outcome) -> Self {
        Self {
            outcome,
            guest_votes: Vec::new(),
            contestant_votes: Vec::new(),
        }
    }
}

/// Check ballots at the driver boundary: every judge is a guest or one of this round's peer
/// judges, nobody votes twice, and peers only vote 1 or 2.
pub fn validate_votes(battle: &Battle, votes: &[Vote]) -> Result<(), BattleError> {
    let mut seen = HashSet::new();
    for vote in votes {
        let is_guest = battle.is_guest(&vote.judge);
        if !is_guest && !battle.contestant_judges().contains(&vote.judge) {
            return Err(BattleError::UnknownJudge(vote.judge.clone()));
        }
        if !seen.insert(vote.judge.as_str()) {
            return Err(BattleError::DuplicateVote(vote.judge.clone()));
        }
        if !is_guest && vote.decision.is_guest_only() {
            return Err(BattleError::GuestOnlyDecision {
                judge: vote.judge.clone(),
            });
        }
    }
    Ok(())
}

/// Judge the live matchup of `role`: contestant 1 dances in pair 1, contestant 2 in pair 2.
///
/// Any judge who is not a guest counts as a peer judge. Peer tie / no-contest ballots are
/// ignored.
///
/// 1. Every guest votes tie: no points, both wait in the tie pair for a rematch.
/// 2. Every guest votes no contest: both go to the back of the queue (in matchup order) and
///    the front of the queue becomes round winner without a point.
/// 3. Otherwise guests score 2, peers 1, a guest tie vote scores 1 for each side. The higher
///    score wins, contestant 1 on equal scores. Winner gains a point and holds the round-winner
///    slot; loser goes to the back of the queue.
pub fn judge_round(battle: &mut Battle, role: Role, votes: &[Vote]) -> Result<JudgeResult, BattleError> {
    if battle.state != BattleState::InProgress {
        return Err(BattleError::InvalidState);
    }
    let [first, second] = battle
        .pool(role)
        .matchup
        .ok_or(BattleError::AlreadyJudged(role))?;

    let guest_count = battle.guest_judges.len();
    let unanimous = |decision: Decision| {
        guest_count > 0
            && votes
                .iter()
                .filter(|v| battle.is_guest(&v.judge) && v.decision == decision)
                .count()
                == guest_count
    };
    let is_tie = unanimous(Decision::Tie);
    let is_no_contest = !is_tie && unanimous(Decision::NoContest);
    if is_no_contest && battle.pool(role).queue.is_empty() {
        return Err(BattleError::QueueUnderflow(role));
    }

    let ballots = battle.current_round.votes_mut(role);
    for vote in votes {
        ballots.insert(vote.judge.clone(), vote.decision);
    }

    let result = if is_tie {
        let pool = battle.pool_mut(role);
        pool.matchup = None;
        pool.tie_pair = Some([first, second]);
        JudgeResult::unattributed(Outcome::Tie {
            first: pool.name(first),
            second: pool.name(second),
        })
    } else if is_no_contest {
        let pool = battle.pool_mut(role);
        let advanced = pool.pop_front()?;
        pool.matchup = None;
        pool.queue.push_back(first);
        pool.queue.push_back(second);
        pool.round_winner = Some(advanced);
        JudgeResult::unattributed(Outcome::NoContest {
            advanced: pool.name(advanced),
        })
    } else {
        score_matchup(battle, role, [first, second], votes)
    };

    log::debug!("Round {} {} battle: {}", battle.round_num(), role, result.outcome);
    battle.current_round.set_outcome(role, result.outcome.clone());
    Ok(result)
}

fn score_matchup(battle: &mut Battle, role: Role, matchup: [ContestantId; 2], votes: &[Vote]) -> JudgeResult {
    let [first, second] = matchup;
    let (mut first_score, mut second_score) = (0, 0);
    for vote in votes {
        let is_guest = battle.is_guest(&vote.judge);
        let weight = if is_guest {
            GUEST_VOTE_WEIGHT
        } else {
            CONTESTANT_VOTE_WEIGHT
        };
        match vote.decision {
            Decision::First => first_score += weight,
            Decision::Second => second_score += weight,
            Decision::Tie if is_guest => {
                first_score += 1;
                second_score += 1;
            }
            _ => {}
        }
    }

    let (winner, loser, winning_decision) = if first_score >= second_score {
        (first, second, Decision::First)
    } else {
        (second, first, Decision::Second)
    };

    let (guest_votes, contestant_votes): (Vec<&Vote>, Vec<&Vote>) = votes
        .iter()
        .filter(|v| v.decision == winning_decision)
        .partition(|v| battle.is_guest(&v.judge));

    let pool = battle.pool_mut(role);
    if let Some(c) = pool.contestant_mut(winner) {
        c.add_point();
    }
    pool.matchup = None;
    pool.queue.push_back(loser);
    pool.round_winner = Some(winner);
    let name = pool.name(winner);
    battle.current_round.set_winner_id(role, winner);

    JudgeResult {
        outcome: Outcome::Winner { name },
        guest_votes: guest_votes.into_iter().map(|v| v.judge.clone()).collect(),
        contestant_votes: contestant_votes.into_iter().map(|v| v.judge.clone()).collect(),
    }
}
