//! Data structures for the dance battle: contestants, role pools, rounds, battle state.

mod battle;
mod contestant;
mod pool;
mod round;
mod view;

pub use battle::{Battle, BattleError, BattleId, BattleState, Pair, DEFAULT_CONTESTANT_JUDGES};
pub use contestant::{Contestant, ContestantId, Role};
pub use pool::RolePool;
pub use round::{Crowning, Decision, Outcome, PairNames, Round, SongInfo, Vote};
pub use view::{BattleView, PairView};
