//! Battle (the tournament engine state), BattleState and BattleError.

use crate::models::contestant::{ContestantId, Role};
use crate::models::pool::RolePool;
use crate::models::round::{PairNames, Round};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during battle operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BattleError {
    /// Fewer than two contestants for a role.
    NotEnoughContestants { role: Role, count: usize },
    /// Lead and follow rosters must be the same size.
    RosterMismatch { leads: usize, follows: usize },
    /// A name appears twice in one role (names are unique, case-insensitive).
    DuplicateName { role: Role, name: String },
    /// Ballots are keyed by name, so a name may belong to only one participant: a name shared by
    /// a lead and a follow, by a contestant and a guest judge, or by two guest judges.
    NameClash(String),
    /// At least one guest judge is required.
    NoGuestJudges,
    /// Ballot value outside 1..=4.
    InvalidDecision(u8),
    /// A peer judge cast tie or no contest.
    GuestOnlyDecision { judge: String },
    /// Ballot from someone who is neither a guest judge nor a peer judge this round.
    UnknownJudge(String),
    /// The same judge cast two ballots for one matchup.
    DuplicateVote(String),
    /// This role's matchup has already been judged this round.
    AlreadyJudged(Role),
    /// Not every matchup of the round has been judged.
    IncompleteResults,
    /// The role's queue ran dry; the roster is too small for the rotation.
    QueueUnderflow(Role),
    /// Battle is not in a state that allows this action.
    InvalidState,
}

impl std::fmt::Display for BattleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BattleError::NotEnoughContestants { role, count } => {
                write!(f, "Need at least 2 {}, got {}", role.plural(), count)
            }
            BattleError::RosterMismatch { leads, follows } => write!(
                f,
                "Lead and follow counts must match ({} leads, {} follows)",
                leads, follows
            ),
            BattleError::DuplicateName { role, name } => {
                write!(f, "A {} named {} already exists", role, name)
            }
            BattleError::NameClash(name) => {
                write!(f, "{} is used by more than one contestant or judge", name)
            }
            BattleError::NoGuestJudges => write!(f, "Need at least one guest judge"),
            BattleError::InvalidDecision(v) => write!(f, "Invalid vote {} (must be 1-4)", v),
            BattleError::GuestOnlyDecision { judge } => {
                write!(f, "{} is a contestant judge and may only vote 1 or 2", judge)
            }
            BattleError::UnknownJudge(name) => write!(f, "{} is not judging this round", name),
            BattleError::DuplicateVote(name) => write!(f, "{} voted more than once", name),
            BattleError::AlreadyJudged(role) => write!(f, "The {} battle was already judged", role),
            BattleError::IncompleteResults => write!(f, "Not all battles of this round have a result"),
            BattleError::QueueUnderflow(role) => {
                write!(f, "No {} left in the queue; roster too small", role.plural())
            }
            BattleError::InvalidState => write!(f, "Invalid state for this action"),
        }
    }
}

impl std::error::Error for BattleError {}

/// Unique identifier for a battle.
pub type BattleId = Uuid;

/// Peer judges drawn per round when enough contestants are queued.
pub const DEFAULT_CONTESTANT_JUDGES: usize = 3;

/// Current phase of the battle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleState {
    /// Rounds are being danced.
    #[default]
    InProgress,
    /// Both roles have a crowned winner.
    Finished,
}

/// A (lead, follow) couple on stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub lead: ContestantId,
    pub follow: ContestantId,
}

/// Full battle state: both role pools, the two live pairs, judges and round history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    pub state: BattleState,
    pub leads: RolePool,
    pub follows: RolePool,
    pub guest_judges: Vec<String>,
    pub num_contestant_judges: usize,
    /// Couples on stage this round: [pair 1, pair 2].
    pub pairs: [Pair; 2],
    pub current_round: Round,
    /// Closed rounds, oldest first.
    pub rounds: Vec<Round>,
    pub created_at: DateTime<Utc>,
}

impl Battle {
    /// Assemble a battle from two pools already in battle order. Use `start_battle` to build one
    /// from names.
    pub fn from_pools(
        leads: RolePool,
        follows: RolePool,
        guest_judges: Vec<String>,
        contestant_judges: Vec<String>,
    ) -> Result<Self, BattleError> {
        let [l1, l2] = leads.matchup.ok_or(BattleError::InvalidState)?;
        let [f1, f2] = follows.matchup.ok_or(BattleError::InvalidState)?;
        let pairs = [
            Pair { lead: l1, follow: f1 },
            Pair { lead: l2, follow: f2 },
        ];
        let mut battle = Self {
            id: Uuid::new_v4(),
            state: BattleState::InProgress,
            leads,
            follows,
            guest_judges,
            num_contestant_judges: DEFAULT_CONTESTANT_JUDGES,
            pairs,
            current_round: Round::new(1, PairNames::default(), PairNames::default(), Vec::new(), Vec::new()),
            rounds: Vec::new(),
            created_at: Utc::now(),
        };
        battle.current_round = battle.open_round(1, contestant_judges);
        Ok(battle)
    }

    /// Fresh round record for the current pairs.
    pub(crate) fn open_round(&self, round_num: u32, contestant_judges: Vec<String>) -> Round {
        Round::new(
            round_num,
            self.pair_names(0),
            self.pair_names(1),
            self.guest_judges.clone(),
            contestant_judges,
        )
    }

    pub fn pool(&self, role: Role) -> &RolePool {
        match role {
            Role::Lead => &self.leads,
            Role::Follow => &self.follows,
        }
    }

    pub fn pool_mut(&mut self, role: Role) -> &mut RolePool {
        match role {
            Role::Lead => &mut self.leads,
            Role::Follow => &mut self.follows,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == BattleState::Finished
    }

    pub fn round_num(&self) -> u32 {
        self.current_round.round_num
    }

    /// Names of pair `index` (0 or 1).
    pub fn pair_names(&self, index: usize) -> PairNames {
        let pair = self.pairs[index];
        PairNames {
            lead: self.leads.name(pair.lead),
            follow: self.follows.name(pair.follow),
        }
    }

    pub fn contestant_judges(&self) -> &[String] {
        &self.current_round.contestant_judges
    }

    pub fn is_guest(&self, judge: &str) -> bool {
        self.guest_judges.iter().any(|g| g == judge)
    }

    /// Closed rounds plus the current one if anything has been judged in it.
    pub fn round_history(&self) -> impl Iterator<Item = &Round> {
        let current = Some(&self.current_round).filter(|r| r.has_outcome());
        self.rounds.iter().chain(current)
    }
}
