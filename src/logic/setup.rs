//! Setup: build a battle from name lists and draw peer judges.

use crate::models::{Battle, BattleError, Contestant, Role, RolePool};
use rand::seq::SliceRandom;
use rand::Rng;

/// Start a battle with `rand::thread_rng()`. See [`start_battle_with_rng`].
pub fn start_battle<S: AsRef<str>>(
    lead_names: &[S],
    follow_names: &[S],
    guest_judge_names: &[S],
) -> Result<Battle, BattleError> {
    start_battle_with_rng(lead_names, follow_names, guest_judge_names, &mut rand::thread_rng())
}

/// Start a battle.
///
/// 1. Trim every name and drop blanks; reject duplicates within a role.
/// 2. Require equal lead/follow counts (at least 2 each) and at least one guest judge.
///    Judges are identified by name, so no name may be shared across roles or with a guest.
/// 3. Shuffle leads and follows independently.
/// 4. First two of each role form pair 1 and pair 2; the rest queue up in shuffled order.
/// 5. Draw peer judges and open round 1.
pub fn start_battle_with_rng<S: AsRef<str>, R: Rng + ?Sized>(
    lead_names: &[S],
    follow_names: &[S],
    guest_judge_names: &[S],
    rng: &mut R,
) -> Result<Battle, BattleError> {
    let mut leads = build_roster(Role::Lead, lead_names)?;
    let mut follows = build_roster(Role::Follow, follow_names)?;
    if leads.len() != follows.len() {
        return Err(BattleError::RosterMismatch {
            leads: leads.len(),
            follows: follows.len(),
        });
    }
    let guests = clean_names(guest_judge_names);
    if guests.is_empty() {
        return Err(BattleError::NoGuestJudges);
    }
    check_name_clashes(&leads, &follows, &guests)?;

    leads.shuffle(rng);
    follows.shuffle(rng);

    let leads = RolePool::new(Role::Lead, leads)?;
    let follows = RolePool::new(Role::Follow, follows)?;
    let mut battle = Battle::from_pools(leads, follows, guests, Vec::new())?;
    battle.current_round.contestant_judges = select_contestant_judges(&battle, rng);

    log::info!(
        "Started battle {} with {} leads, {} follows, judges: {}",
        battle.id,
        battle.leads.total(),
        battle.follows.total(),
        battle.guest_judges.join(", ")
    );
    Ok(battle)
}

/// Pick up to `num_contestant_judges` peer judges from everyone waiting in either queue.
/// Judges stay in their queue; this only labels them for the round.
pub fn select_contestant_judges<R: Rng + ?Sized>(battle: &Battle, rng: &mut R) -> Vec<String> {
    let mut eligible: Vec<String> = battle
        .leads
        .queued()
        .into_iter()
        .chain(battle.follows.queued())
        .map(|c| c.name.clone())
        .collect();
    eligible.shuffle(rng);
    eligible.truncate(battle.num_contestant_judges);
    eligible
}

fn clean_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_name_clashes(leads: &[Contestant], follows: &[Contestant], guests: &[String]) -> Result<(), BattleError> {
    let mut seen: Vec<&str> = Vec::new();
    let names = leads
        .iter()
        .chain(follows)
        .map(|c| c.name.as_str())
        .chain(guests.iter().map(String::as_str));
    for name in names {
        if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            return Err(BattleError::NameClash(name.to_string()));
        }
        seen.push(name);
    }
    Ok(())
}

fn build_roster<S: AsRef<str>>(role: Role, names: &[S]) -> Result<Vec<Contestant>, BattleError> {
    let mut roster: Vec<Contestant> = Vec::new();
    for name in clean_names(names) {
        if roster.iter().any(|c| c.name.eq_ignore_ascii_case(&name)) {
            return Err(BattleError::DuplicateName { role, name });
        }
        roster.push(Contestant::new(name));
    }
    if roster.len() < 2 {
        return Err(BattleError::NotEnoughContestants {
            role,
            count: roster.len(),
        });
    }
    Ok(roster)
}
