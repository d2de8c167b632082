pub mod immortal;
pub mod manager;
pub mod report;
pub mod roster;
pub mod scoreboard;

pub use immortal::Immortal;
pub use manager::ArenaManager;
pub use report::{ImmortalSnapshot, RunReport};
pub use roster::Roster;
pub use scoreboard::ScoreBoard;
