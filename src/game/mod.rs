pub mod havannah;
pub mod player;

pub use havannah::{HavannahAction, HavannahConfig, HavannahEnv};
pub use player::Player;
