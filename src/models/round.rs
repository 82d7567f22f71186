//! Round record: pair snapshot, ballots, outcomes and crowning messages for one round.

use crate::models::battle::BattleError;
use crate::models::contestant::{ContestantId, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single judge's ballot for one matchup. Serialized as 1..=4.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Decision {
    /// Vote for contestant 1 (the pair 1 dancer).
    First,
    /// Vote for contestant 2 (the pair 2 dancer).
    Second,
    /// Declare a tie. Guest judges only.
    Tie,
    /// Declare no contest. Guest judges only.
    NoContest,
}

impl Decision {
    /// Tie and no-contest may only be cast by guest judges.
    pub fn is_guest_only(self) -> bool {
        matches!(self, Decision::Tie | Decision::NoContest)
    }
}

impl TryFrom<u8> for Decision {
    type Error = BattleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Decision::First),
            2 => Ok(Decision::Second),
            3 => Ok(Decision::Tie),
            4 => Ok(Decision::NoContest),
            other => Err(BattleError::InvalidDecision(other)),
        }
    }
}

impl From<Decision> for u8 {
    fn from(d: Decision) -> Self {
        match d {
            Decision::First => 1,
            Decision::Second => 2,
            Decision::Tie => 3,
            Decision::NoContest => 4,
        }
    }
}

/// One judge's ballot as submitted by a driver.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub judge: String,
    #[serde(alias = "vote")]
    pub decision: Decision,
}

impl Vote {
    pub fn new(judge: impl Into<String>, decision: Decision) -> Self {
        Self {
            judge: judge.into(),
            decision,
        }
    }
}

/// Song played for a round, supplied by the driver.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SongInfo {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

/// How a role's matchup was decided.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Normal scoring produced a winner (awarded one point).
    Winner { name: String },
    /// Unanimous guest tie: no points, both re-paired next round.
    Tie { first: String, second: String },
    /// Unanimous guest no-contest: `advanced` is the contestant pulled from the queue.
    NoContest { advanced: String },
}

impl Outcome {
    /// Name of the scored winner, if any.
    pub fn winner(&self) -> Option<&str> {
        match self {
            Outcome::Winner { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner { name } => write!(f, "{}", name),
            Outcome::Tie { first, second } => write!(f, "Tie between {} and {}", first, second),
            Outcome::NoContest { .. } => write!(f, "No Contest"),
        }
    }
}

/// A contestant reaching the win threshold for their role. Happens once per role.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Crowning {
    pub role: Role,
    pub name: String,
}

impl fmt::Display for Crowning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has won for the {}!", self.name, self.role.plural())
    }
}

/// A (lead, follow) pair of names as shown on stage.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PairNames {
    pub lead: String,
    pub follow: String,
}

/// One round of the battle. Frozen once the next round opens.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub round_num: u32,
    pub pair_1: PairNames,
    pub pair_2: PairNames,
    /// Guest judges.
    pub judges: Vec<String>,
    /// Peer judges drawn from the queues for this round.
    pub contestant_judges: Vec<String>,
    pub lead_votes: HashMap<String, Decision>,
    pub follow_votes: HashMap<String, Decision>,
    pub lead_outcome: Option<Outcome>,
    pub follow_outcome: Option<Outcome>,
    /// Contestant who won the lead battle by scoring (not set for tie / no contest).
    #[serde(default)]
    pub lead_winner: Option<ContestantId>,
    #[serde(default)]
    pub follow_winner: Option<ContestantId>,
    pub win_messages: Vec<Crowning>,
    pub song_info: Option<SongInfo>,
    pub started_at: DateTime<Utc>,
}

impl Round {
    pub fn new(
        round_num: u32,
        pair_1: PairNames,
        pair_2: PairNames,
        judges: Vec<String>,
        contestant_judges: Vec<String>,
    ) -> Self {
        Self {
            round_num,
            pair_1,
            pair_2,
            judges,
            contestant_judges,
            lead_votes: HashMap::new(),
            follow_votes: HashMap::new(),
            lead_outcome: None,
            follow_outcome: None,
            lead_winner: None,
            follow_winner: None,
            win_messages: Vec::new(),
            song_info: None,
            started_at: Utc::now(),
        }
    }

    pub fn votes(&self, role: Role) -> &HashMap<String, Decision> {
        match role {
            Role::Lead => &self.lead_votes,
            Role::Follow => &self.follow_votes,
        }
    }

    pub fn votes_mut(&mut self, role: Role) -> &mut HashMap<String, Decision> {
        match role {
            Role::Lead => &mut self.lead_votes,
            Role::Follow => &mut self.follow_votes,
        }
    }

    pub fn outcome(&self, role: Role) -> Option<&Outcome> {
        match role {
            Role::Lead => self.lead_outcome.as_ref(),
            Role::Follow => self.follow_outcome.as_ref(),
        }
    }

    pub fn set_outcome(&mut self, role: Role, outcome: Outcome) {
        match role {
            Role::Lead => self.lead_outcome = Some(outcome),
            Role::Follow => self.follow_outcome = Some(outcome),
        }
    }

    /// Id of the contestant who won `role` by scoring this round.
    pub fn winner_id(&self, role: Role) -> Option<ContestantId> {
        match role {
            Role::Lead => self.lead_winner,
            Role::Follow => self.follow_winner,
        }
    }

    pub fn set_winner_id(&mut self, role: Role, id: ContestantId) {
        match role {
            Role::Lead => self.lead_winner = Some(id),
            Role::Follow => self.follow_winner = Some(id),
        }
    }

    /// Both roles have been judged.
    pub fn is_judged(&self) -> bool {
        self.lead_outcome.is_some() && self.follow_outcome.is_some()
    }

    /// Name of the contestant who won `role` by scoring this round.
    pub fn winner(&self, role: Role) -> Option<&str> {
        self.outcome(role).and_then(Outcome::winner)
    }

    /// True once at least one role has been judged.
    pub fn has_outcome(&self) -> bool {
        self.lead_outcome.is_some() || self.follow_outcome.is_some()
    }

    /// Guest judges followed by peer judges, in ballot order.
    pub fn all_judges(&self) -> impl Iterator<Item = &String> {
        self.judges.iter().chain(self.contestant_judges.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_accepts_one_through_four() {
        assert_eq!(Decision::try_from(1), Ok(Decision::First));
        assert_eq!(Decision::try_from(4), Ok(Decision::NoContest));
        assert_eq!(Decision::try_from(5), Err(BattleError::InvalidDecision(5)));
        assert_eq!(Decision::try_from(0), Err(BattleError::InvalidDecision(0)));
    }

    #[test]
    fn vote_deserializes_from_driver_json() {
        let v: Vote = serde_json::from_str(r#"{"judge":"Kenji","vote":3}"#).unwrap();
        assert_eq!(v, Vote::new("Kenji", Decision::Tie));
        assert!(serde_json::from_str::<Vote>(r#"{"judge":"Kenji","vote":7}"#).is_err());
    }

    #[test]
    fn outcome_display() {
        let tie = Outcome::Tie {
            first: "Logan".into(),
            second: "Ian".into(),
        };
        assert_eq!(tie.to_string(), "Tie between Logan and Ian");
        assert_eq!(tie.winner(), None);
        let crown = Crowning {
            role: Role::Follow,
            name: "Reina".into(),
        };
        assert_eq!(crown.to_string(), "Reina has won for the follows!");
    }
}
