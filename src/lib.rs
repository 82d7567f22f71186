//! Lead/follow dance battle: library with the battle engine, CSV export and server config.

pub mod config;
pub mod export;
pub mod logic;
pub mod models;

pub use logic::{
    check_for_win, finalize_results, judge_and_check_for_win, judge_round, next_round, next_round_with_rng,
    select_contestant_judges, start_battle, start_battle_with_rng, validate_votes, JudgeResult,
    Standings, CONTESTANT_VOTE_WEIGHT, GUEST_VOTE_WEIGHT,
};
pub use models::{
    Battle, BattleError, BattleId, BattleState, BattleView, Contestant, ContestantId, Crowning,
    Decision, Outcome, Pair, PairNames, PairView, RolePool, Role, Round, SongInfo, Vote,
    DEFAULT_CONTESTANT_JUDGES,
};
