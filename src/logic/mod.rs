//! Battle logic: setup, judging, win detection, round rotation, final standings.

mod finalize;
mod judging;
mod rotation;
mod setup;
mod win;

pub use finalize::{finalize_results, Standings};
pub use judging::{judge_round, validate_votes, JudgeResult, CONTESTANT_VOTE_WEIGHT, GUEST_VOTE_WEIGHT};
pub use rotation::{next_round, next_round_with_rng};
pub use setup::{select_contestant_judges, start_battle, start_battle_with_rng};
pub use win::{check_for_win, judge_and_check_for_win};
