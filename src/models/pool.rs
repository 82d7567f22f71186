//! RolePool: every contestant of one role and where each of them currently is.

use crate::models::battle::BattleError;
use crate::models::contestant::{Contestant, ContestantId, Role};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// All contestants of one role. Each id sits in exactly one of: `queue`, `matchup`,
/// `tie_pair`, `round_winner`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RolePool {
    pub role: Role,
    /// Every contestant of this role, in the initial shuffled order. Never grows or shrinks.
    pub roster: Vec<Contestant>,
    /// Waiting contestants; front battles next.
    pub queue: VecDeque<ContestantId>,
    /// Live, unjudged matchup: [pair 1 dancer, pair 2 dancer].
    pub matchup: Option<[ContestantId; 2]>,
    /// Tied matchup waiting to be re-danced next round.
    pub tie_pair: Option<[ContestantId; 2]>,
    /// Winner of the latest judging (or the contestant advanced by a no contest).
    pub round_winner: Option<ContestantId>,
    /// Contestant who first reached the win threshold. Set once.
    pub crowned: Option<ContestantId>,
    /// Crowned contestant goes back to the queue on the next round advance.
    pub retire_pending: bool,
}

impl RolePool {
    /// Build a pool from contestants already in battle order: the first two dance, the rest wait.
    pub fn new(role: Role, roster: Vec<Contestant>) -> Result<Self, BattleError> {
        if roster.len() < 2 {
            return Err(BattleError::NotEnoughContestants {
                role,
                count: roster.len(),
            });
        }
        let matchup = [roster[0].id, roster[1].id];
        let queue = roster.iter().skip(2).map(|c| c.id).collect();
        Ok(Self {
            role,
            roster,
            queue,
            matchup: Some(matchup),
            tie_pair: None,
            round_winner: None,
            crowned: None,
            retire_pending: false,
        })
    }

    /// Total contestants of this role, fixed for the whole battle.
    pub fn total(&self) -> usize {
        self.roster.len()
    }

    /// Points needed to be crowned: one win over every other contestant's count.
    pub fn win_threshold(&self) -> u32 {
        self.total().saturating_sub(1) as u32
    }

    pub fn has_winner(&self) -> bool {
        self.crowned.is_some()
    }

    pub fn contestant(&self, id: ContestantId) -> Option<&Contestant> {
        self.roster.iter().find(|c| c.id == id)
    }

    pub fn contestant_mut(&mut self, id: ContestantId) -> Option<&mut Contestant> {
        self.roster.iter_mut().find(|c| c.id == id)
    }

    /// Lookup by exact name (names are unique within a role).
    pub fn find_by_name(&self, name: &str) -> Option<&Contestant> {
        self.roster.iter().find(|c| c.name == name)
    }

    /// Name for an id, or empty if unknown.
    pub fn name(&self, id: ContestantId) -> String {
        self.contestant(id).map(|c| c.name.clone()).unwrap_or_default()
    }

    /// Contestants currently waiting, front first.
    pub fn queued(&self) -> Vec<&Contestant> {
        self.queue.iter().filter_map(|&id| self.contestant(id)).collect()
    }

    /// Every placed id in placement order: queue, live matchup, tie pair, round winner.
    pub fn placed_ids(&self) -> Vec<ContestantId> {
        let mut ids: Vec<ContestantId> = self.queue.iter().copied().collect();
        ids.extend(self.matchup.iter().flatten().copied());
        ids.extend(self.tie_pair.iter().flatten().copied());
        ids.extend(self.round_winner);
        ids
    }

    /// Take the front of the queue. An empty queue means the roster is too small.
    pub fn pop_front(&mut self) -> Result<ContestantId, BattleError> {
        self.queue
            .pop_front()
            .ok_or(BattleError::QueueUnderflow(self.role))
    }

    /// How many queue draws the next round advance needs, and how many ids it can draw from.
    fn draws(&self) -> (usize, usize) {
        let queued = self.queue.len();
        if self.tie_pair.is_some() {
            (0, queued)
        } else if self.retire_pending && self.round_winner.is_some() {
            (2, queued + 1)
        } else if self.round_winner.is_some() {
            (1, queued)
        } else {
            (2, queued)
        }
    }

    /// Fail before mutation if `next_matchup` would run the queue dry.
    pub fn check_next_matchup(&self) -> Result<(), BattleError> {
        let (needed, available) = self.draws();
        if available < needed {
            return Err(BattleError::QueueUnderflow(self.role));
        }
        Ok(())
    }

    /// Pick the two contestants for the next round, in priority order:
    /// 1. a pending tie pair is re-danced unchanged;
    /// 2. a freshly crowned contestant retires to the back of the queue and two fresh
    ///    contestants are drawn;
    /// 3. the round winner stays on and faces the front of the queue;
    /// 4. otherwise two fresh contestants are drawn.
    ///
    /// `holder_first` puts a staying round winner on pair 1, otherwise on pair 2.
    pub fn next_matchup(&mut self, holder_first: bool) -> Result<[ContestantId; 2], BattleError> {
        self.check_next_matchup()?;
        if let Some(pair) = self.tie_pair.take() {
            return Ok(pair);
        }
        if self.retire_pending {
            self.retire_pending = false;
            if let Some(retiree) = self.round_winner.take() {
                log::info!("Crowned {} {} retires to the queue", self.role, self.name(retiree));
                self.queue.push_back(retiree);
            }
            return Ok([self.pop_front()?, self.pop_front()?]);
        }
        if let Some(holder) = self.round_winner.take() {
            let challenger = self.pop_front()?;
            return Ok(if holder_first {
                [holder, challenger]
            } else {
                [challenger, holder]
            });
        }
        Ok([self.pop_front()?, self.pop_front()?])
    }
}
